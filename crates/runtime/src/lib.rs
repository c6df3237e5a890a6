//! Session orchestration for the puzzle core.
//!
//! The runtime owns the per-level state (board, obstacle registry, deck,
//! actors) and drives the turn resolvers tick by tick. Clients either hold
//! a [`GameSession`] directly, or talk to a background [`SessionWorker`]
//! through a cloneable [`SessionHandle`] and observe the game on the
//! topic-based [`EventBus`].

pub mod error;
pub mod events;
pub mod session;
pub mod worker;

pub use error::{Result, RuntimeError};
pub use events::{DeathCause, Event, EventBus, ObstacleEvent, SessionEvent, Topic, TurnEvent};
pub use session::{CardId, DealtCard, GameSession, SessionConfig, SessionSnapshot};
pub use worker::{SessionHandle, SessionWorker};
