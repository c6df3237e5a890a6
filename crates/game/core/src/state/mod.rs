//! Mutable puzzle state: actors, the per-turn action queue, and obstacle
//! states layered on top of the static board.
mod actor;
mod common;
mod obstacles;
mod queue;

pub use actor::ActorState;
pub use common::{ActorId, Coordinate, Facing};
pub use obstacles::{
    MovingWall, ObstacleError, ObstacleKind, ObstacleRegistry, ObstacleState, TriggerEffect,
};
pub use queue::ActionQueue;
