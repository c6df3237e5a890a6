//! Typed events published per topic.

use game_core::{ActorId, Coordinate, TriggerEffect};
use serde::{Deserialize, Serialize};

/// Turn-resolution events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TurnEvent {
    /// An action finished with the actor standing on `tile`.
    ReachedDestination { actor: ActorId, tile: Coordinate },
    /// A spike demanded the actor be knocked back.
    ActorKnockedBack { actor: ActorId, from: Coordinate },
    /// The actor's committed order fully resolved and the machine idles.
    ActionsResolved { actor: ActorId },
}

/// Obstacle events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ObstacleEvent {
    Triggered {
        actor: ActorId,
        coordinate: Coordinate,
        effect: TriggerEffect,
    },
}

/// Session lifecycle events, including the explicit terminal conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    LevelComplete { actor: ActorId },
    ActorDied { actor: ActorId, cause: DeathCause },
    /// The deck ran dry with the level unfinished.
    OutOfCards { actor: ActorId },
}

/// Terminal conditions that end an actor's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    FellInHole,
    Spiked,
}
