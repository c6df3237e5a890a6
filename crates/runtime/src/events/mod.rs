//! Event types and the topic-based bus the session publishes on.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{DeathCause, ObstacleEvent, SessionEvent, TurnEvent};
