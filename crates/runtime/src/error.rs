//! Runtime error types.

use game_core::ActorId;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("unknown actor {0}")]
    UnknownActor(ActorId),

    #[error("actor {0} is dead; reset the level to continue")]
    ActorDead(ActorId),

    #[error("actor {0} is still resolving its previous action order")]
    TurnInProgress(ActorId),

    #[error("session worker channel closed")]
    WorkerClosed,
}
