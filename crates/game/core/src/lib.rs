//! Deterministic puzzle rules shared across the runtime and offline tools.
//!
//! `game-core` defines the canonical logic of the card-driven grid puzzle:
//! the static tile board, stateful obstacles, the physical-shuffle deck
//! engine, and the turn resolver that walks an ordered card list one action
//! at a time. All actor mutation flows through [`engine::TurnResolver`] and
//! the [`engine::TravelTask`]s it hands to the driving session; supporting
//! crates depend on the types re-exported here.
pub mod board;
pub mod card;
pub mod config;
pub mod deck;
pub mod engine;
pub mod error;
pub mod state;

pub use board::{GridError, Tile, TileGrid};
pub use card::{Card, CardKind};
pub use config::GameConfig;
pub use deck::{Deck, DeckError, GameRng};
pub use engine::{
    Directive, InterruptCause, ResolverPhase, Signal, SignalQueue, SkipReason, TravelOutcome,
    TravelPath, TravelProgress, TravelTask, TurnResolver,
};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    ActionQueue, ActorId, ActorState, Coordinate, Facing, MovingWall, ObstacleError, ObstacleKind,
    ObstacleRegistry, ObstacleState, TriggerEffect,
};
