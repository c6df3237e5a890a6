use glam::Vec3;

use super::{ActorId, Coordinate, Facing};

/// Mutable pose of a resolver-driven actor.
///
/// The handle to the in-flight movement operation lives with the session
/// driver as an `Option<TravelTask>` slot per actor; replacing or dropping
/// the slot is the cancellation path.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorState {
    pub id: ActorId,
    pub current_tile: Coordinate,
    pub previous_tile: Coordinate,
    pub facing: Facing,
    /// World transform anchor; rests on tile snap positions between travels.
    pub position: Vec3,
}

impl ActorState {
    /// Creates an actor standing on `start`. The caller is expected to lift
    /// `position` onto the tile's snap anchor once the board is known.
    pub fn new(id: ActorId, start: Coordinate, facing: Facing) -> Self {
        Self {
            id,
            current_tile: start,
            previous_tile: start,
            facing,
            position: start.to_world(),
        }
    }

    /// Moves the actor onto `tile`, remembering where it came from.
    pub fn place(&mut self, tile: Coordinate, position: Vec3) {
        self.previous_tile = self.current_tile;
        self.current_tile = tile;
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_tracks_previous_tile() {
        let mut actor = ActorState::new(ActorId::PLAYER, Coordinate::ORIGIN, Facing::North);
        let next = Coordinate::new(0, 1);
        actor.place(next, next.to_world());
        assert_eq!(actor.previous_tile, Coordinate::ORIGIN);
        assert_eq!(actor.current_tile, next);
    }
}
