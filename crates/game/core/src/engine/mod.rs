//! Turn resolution: the card state machine and its travel executor.
//!
//! [`TurnResolver`] walks an ordered card list one action at a time,
//! handing long-running movements to the driver as [`TravelTask`]s polled
//! once per tick. Outbound notifications accumulate in a [`SignalQueue`]
//! drained by the session; the core never calls subscribers directly.

mod resolver;
mod signals;
mod travel;

pub use resolver::{Directive, InterruptCause, ResolverPhase, TurnResolver};
pub use signals::{Signal, SignalQueue, SkipReason};
pub use travel::{TravelOutcome, TravelPath, TravelProgress, TravelTask};
