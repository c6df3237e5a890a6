use crate::card::Card;
use crate::state::{ActorId, Coordinate, TriggerEffect};

/// Why the resolver skipped a queued card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkipReason {
    /// No tile registered where the action wanted to go.
    NoTile,
    /// A card kind the resolver does not execute (hand-phase cards and
    /// future kinds). Skipping keeps the machine from deadlocking.
    UnhandledCard,
}

/// Fire-and-forget notification emitted by the core.
///
/// The session fans these out to however many subscribers it has; the core
/// neither knows nor cares.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Signal {
    /// An action finished with the actor standing on `tile`.
    ReachedDestination { actor: ActorId, tile: Coordinate },
    /// An obstacle changed state in response to the actor.
    ObstacleTriggered {
        actor: ActorId,
        coordinate: Coordinate,
        effect: TriggerEffect,
    },
    /// The finish tile was reached.
    LevelComplete { actor: ActorId },
    /// A spike demands the actor be knocked back.
    ActorKnockedBack { actor: ActorId, from: Coordinate },
    /// Terminal: the actor plunged into a hole.
    ActorFell { actor: ActorId, tile: Coordinate },
    /// Diagnostic: a queued card was skipped. Logged by the session, never
    /// broadcast.
    ActionSkipped {
        actor: ActorId,
        card: Card,
        reason: SkipReason,
    },
}

/// FIFO of pending signals, drained by the driving session each tick.
#[derive(Clone, Debug, Default)]
pub struct SignalQueue {
    signals: Vec<Signal>,
}

impl SignalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, signal: Signal) {
        self.signals.push(signal);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Signal> + '_ {
        self.signals.drain(..)
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}
