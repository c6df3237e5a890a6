//! Background session worker and its client-facing handle.
//!
//! The worker owns the [`GameSession`] and is the only place state is
//! touched: commands arrive over an mpsc channel and a fixed tick interval
//! drives in-flight travels between commands. [`SessionHandle`] is the
//! cloneable facade clients and async tasks share.

use std::time::Duration;

use game_core::{ActorId, Card, InterruptCause};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::session::{DealtCard, GameSession, SessionSnapshot};

/// Fixed simulation timestep for the background driver.
const TICK_SECONDS: f32 = 1.0 / 60.0;

/// Commands processed by the session worker.
pub enum Command {
    PlayCards {
        actor: ActorId,
        cards: Vec<Card>,
        reply: oneshot::Sender<Result<()>>,
    },
    DealHand {
        count: usize,
        reply: oneshot::Sender<Vec<DealtCard>>,
    },
    Interrupt {
        actor: ActorId,
        cause: InterruptCause,
        reply: oneshot::Sender<Result<()>>,
    },
    QuerySnapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    ResetLevel {
        reply: oneshot::Sender<()>,
    },
    /// Shutdown the worker gracefully.
    Shutdown,
}

/// Background task that owns the session and processes commands.
pub struct SessionWorker {
    session: GameSession,
    command_rx: mpsc::Receiver<Command>,
}

impl SessionWorker {
    /// Spawns the worker and returns the client handle plus its join
    /// handle.
    pub fn spawn(session: GameSession) -> (SessionHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let bus = session.bus().clone();
        let worker = Self {
            session,
            command_rx,
        };
        let join = tokio::spawn(worker.run());
        (SessionHandle { command_tx, bus }, join)
    }

    async fn run(mut self) {
        let mut ticker = tokio::time::interval(Duration::from_secs_f32(TICK_SECONDS));
        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(Command::Shutdown) => {
                        debug!("shutdown command received");
                        break;
                    }
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                _ = ticker.tick() => self.session.tick(TICK_SECONDS),
            }
        }
        debug!("session worker stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::PlayCards {
                actor,
                cards,
                reply,
            } => {
                let result = self.session.play_cards(actor, cards);
                if reply.send(result).is_err() {
                    debug!("PlayCards reply channel closed (caller dropped)");
                }
            }
            Command::DealHand { count, reply } => {
                if reply.send(self.session.deal_hand(count)).is_err() {
                    debug!("DealHand reply channel closed (caller dropped)");
                }
            }
            Command::Interrupt {
                actor,
                cause,
                reply,
            } => {
                let result = self.session.interrupt(actor, cause);
                if reply.send(result).is_err() {
                    debug!("Interrupt reply channel closed (caller dropped)");
                }
            }
            Command::QuerySnapshot { reply } => {
                if reply.send(self.session.snapshot()).is_err() {
                    debug!("QuerySnapshot reply channel closed (caller dropped)");
                }
            }
            Command::ResetLevel { reply } => {
                self.session.reset_level();
                if reply.send(()).is_err() {
                    debug!("ResetLevel reply channel closed (caller dropped)");
                }
            }
            // Shutdown breaks the run loop before reaching here.
            Command::Shutdown => {}
        }
    }
}

/// Cloneable client-facing handle to a running session worker.
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
    bus: EventBus,
}

impl SessionHandle {
    /// Commits an ordered card list for one actor.
    pub async fn play_cards(&self, actor: ActorId, cards: Vec<Card>) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::PlayCards {
                actor,
                cards,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::WorkerClosed)?;
        reply_rx.await.map_err(|_| RuntimeError::WorkerClosed)?
    }

    /// Deals up to `count` cards into a hand.
    pub async fn deal_hand(&self, count: usize) -> Result<Vec<DealtCard>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::DealHand {
                count,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::WorkerClosed)?;
        reply_rx.await.map_err(|_| RuntimeError::WorkerClosed)
    }

    /// Raises an external interruption for an actor.
    pub async fn interrupt(&self, actor: ActorId, cause: InterruptCause) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Interrupt {
                actor,
                cause,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::WorkerClosed)?;
        reply_rx.await.map_err(|_| RuntimeError::WorkerClosed)?
    }

    /// Queries the logical state snapshot.
    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::QuerySnapshot { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::WorkerClosed)?;
        reply_rx.await.map_err(|_| RuntimeError::WorkerClosed)
    }

    /// Restores the level to its authored state.
    pub async fn reset_level(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::ResetLevel { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::WorkerClosed)?;
        reply_rx.await.map_err(|_| RuntimeError::WorkerClosed)
    }

    /// Stops the worker gracefully. Pending commands ahead of the shutdown
    /// are still processed.
    pub async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::WorkerClosed)
    }

    /// Subscribes to a topic on the session's event bus.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }
}
