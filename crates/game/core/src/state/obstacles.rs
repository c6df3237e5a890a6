use std::collections::BTreeMap;

use crate::card::Card;
use crate::config::GameConfig;
use crate::engine::{Signal, SignalQueue};
use crate::error::{ErrorSeverity, GameError};

use super::{ActorId, Coordinate};

/// Track state for a wall that ping-pongs between the ends of its track.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovingWall {
    track: Vec<Coordinate>,
    index: usize,
    default_index: usize,
    forward: bool,
}

impl MovingWall {
    pub fn new(track: Vec<Coordinate>, start_index: usize) -> Result<Self, ObstacleError> {
        if track.is_empty() || start_index >= track.len() {
            return Err(ObstacleError::InvalidTrack { start_index });
        }
        Ok(Self {
            track,
            index: start_index,
            default_index: start_index,
            forward: true,
        })
    }

    pub fn current(&self) -> Coordinate {
        self.track[self.index]
    }

    pub fn track(&self) -> &[Coordinate] {
        &self.track
    }

    /// Track slot and heading after one advance, reversing at either end.
    fn advanced(&self) -> (usize, bool) {
        if self.track.len() < 2 {
            return (self.index, self.forward);
        }
        let mut forward = self.forward;
        if forward && self.index + 1 == self.track.len() {
            forward = false;
        }
        if !forward && self.index == 0 {
            forward = true;
        }
        let index = if forward { self.index + 1 } else { self.index - 1 };
        (index, forward)
    }

    fn reset(&mut self) {
        self.index = self.default_index;
        self.forward = true;
    }
}

/// Obstacle variants and their variant-specific data.
#[derive(Clone, Debug, PartialEq, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ObstacleKind {
    Spike,
    Spring,
    Ramp,
    TurnTable,
    MovingWall(MovingWall),
    Finish,
}

/// A stateful obstacle occupying one tile.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstacleState {
    kind: ObstacleKind,
    is_active: bool,
    default_active: bool,
    card: Option<Card>,
}

impl ObstacleState {
    pub fn new(kind: ObstacleKind, active: bool) -> Self {
        Self {
            kind,
            is_active: active,
            default_active: active,
            card: None,
        }
    }

    /// Attaches the card injected into the action queue when an actor
    /// arrives on this obstacle while it is active.
    pub fn with_card(mut self, card: Card) -> Self {
        self.card = Some(card);
        self
    }

    pub fn kind(&self) -> &ObstacleKind {
        &self.kind
    }

    pub fn kind_name(&self) -> &str {
        self.kind.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn card(&self) -> Option<Card> {
        self.card
    }

    /// Restores the authored default, including the wall's track slot.
    pub fn set_to_default(&mut self) {
        self.is_active = self.default_active;
        if let ObstacleKind::MovingWall(wall) = &mut self.kind {
            wall.reset();
        }
    }
}

/// Outcome of triggering an obstacle, carried on the emitted signal.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerEffect {
    SpikeToggled { is_active: bool },
    SpringBounced { is_active: bool },
    RampToggled { is_active: bool },
    TurnTableToggled { is_active: bool },
    /// Wall advanced one track slot; playback should take `duration` seconds.
    WallAdvanced { to: Coordinate, duration: f32 },
    /// Wall could not move: single-cell track or next cell occupied.
    WallHeld { at: Coordinate },
    FinishReached,
}

/// Errors raised by obstacle placement and triggering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ObstacleError {
    #[error("no obstacle registered at {coordinate}")]
    NotFound { coordinate: Coordinate },
    #[error("tile {coordinate} already holds an obstacle")]
    TileOccupied { coordinate: Coordinate },
    #[error("moving wall track is empty or start index {start_index} is out of range")]
    InvalidTrack { start_index: usize },
}

impl GameError for ObstacleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound { .. } => ErrorSeverity::Recoverable,
            Self::TileOccupied { .. } | Self::InvalidTrack { .. } => ErrorSeverity::Validation,
        }
    }
}

/// Flat registry mapping tile coordinates to the obstacle occupying them.
///
/// At most one obstacle per tile; triggering is synchronous logical state
/// mutation plus signal emission, with any timed playback delegated to the
/// collaborators consuming the signals.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObstacleRegistry {
    obstacles: BTreeMap<Coordinate, ObstacleState>,
}

impl ObstacleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        coordinate: Coordinate,
        obstacle: ObstacleState,
    ) -> Result<(), ObstacleError> {
        if self.obstacles.contains_key(&coordinate) {
            return Err(ObstacleError::TileOccupied { coordinate });
        }
        self.obstacles.insert(coordinate, obstacle);
        Ok(())
    }

    pub fn obstacle_at(&self, coordinate: Coordinate) -> Option<&ObstacleState> {
        self.obstacles.get(&coordinate)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Coordinate, &ObstacleState)> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Applies the variant-specific trigger effect and queues the matching
    /// signals. Moving walls re-key the registry to their new track cell.
    pub fn trigger(
        &mut self,
        coordinate: Coordinate,
        actor: ActorId,
        signals: &mut SignalQueue,
    ) -> Result<TriggerEffect, ObstacleError> {
        // Resolve a wall's step up front; it needs a second map lookup and
        // a re-key that cannot happen under the mutable entry borrow.
        let wall_step = match self.obstacles.get(&coordinate) {
            None => return Err(ObstacleError::NotFound { coordinate }),
            Some(state) => match &state.kind {
                ObstacleKind::MovingWall(wall) => {
                    let (index, forward) = wall.advanced();
                    Some((index, forward, wall.track[index]))
                }
                _ => None,
            },
        };

        let effect = match wall_step {
            Some((index, forward, to)) => {
                if to == coordinate || self.obstacles.contains_key(&to) {
                    TriggerEffect::WallHeld { at: coordinate }
                } else if let Some(mut state) = self.obstacles.remove(&coordinate) {
                    if let ObstacleKind::MovingWall(wall) = &mut state.kind {
                        wall.index = index;
                        wall.forward = forward;
                    }
                    self.obstacles.insert(to, state);
                    let tiles = (to.to_world() - coordinate.to_world()).length()
                        / GameConfig::TILE_SIZE;
                    let duration =
                        (tiles / GameConfig::WALL_SPEED).min(GameConfig::MAX_WALL_MOVE_SECONDS);
                    TriggerEffect::WallAdvanced { to, duration }
                } else {
                    return Err(ObstacleError::NotFound { coordinate });
                }
            }
            None => {
                let Some(state) = self.obstacles.get_mut(&coordinate) else {
                    return Err(ObstacleError::NotFound { coordinate });
                };
                match &state.kind {
                    ObstacleKind::Spike => {
                        state.is_active = !state.is_active;
                        signals.push(Signal::ActorKnockedBack {
                            actor,
                            from: coordinate,
                        });
                        TriggerEffect::SpikeToggled {
                            is_active: state.is_active,
                        }
                    }
                    ObstacleKind::Spring => {
                        state.is_active = !state.is_active;
                        TriggerEffect::SpringBounced {
                            is_active: state.is_active,
                        }
                    }
                    ObstacleKind::Ramp => {
                        state.is_active = !state.is_active;
                        TriggerEffect::RampToggled {
                            is_active: state.is_active,
                        }
                    }
                    ObstacleKind::TurnTable => {
                        state.is_active = !state.is_active;
                        TriggerEffect::TurnTableToggled {
                            is_active: state.is_active,
                        }
                    }
                    ObstacleKind::Finish => {
                        signals.push(Signal::LevelComplete { actor });
                        TriggerEffect::FinishReached
                    }
                    ObstacleKind::MovingWall(_) => {
                        return Err(ObstacleError::NotFound { coordinate });
                    }
                }
            }
        };

        signals.push(Signal::ObstacleTriggered {
            actor,
            coordinate,
            effect,
        });
        Ok(effect)
    }

    /// Resets every obstacle to its authored default. Must run at level
    /// (re)load before any turn begins; walls re-key to their home cell.
    pub fn reset_to_defaults(&mut self) {
        let obstacles = std::mem::take(&mut self.obstacles);
        for (coordinate, mut state) in obstacles {
            state.set_to_default();
            let home = match &state.kind {
                ObstacleKind::MovingWall(wall) => wall.current(),
                _ => coordinate,
            };
            self.obstacles.insert(home, state);
        }
    }
}
