//! Error types surfaced by the lobby and room workers.
//!
//! Rule violations inside a challenge never appear here; they travel back to
//! the caller as [`combat_core::ActionResult`] failures.
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RoomError>;

/// Seat bookkeeping failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LobbyError {
    #[error("seat {0} does not exist")]
    UnknownSeat(usize),

    #[error("seat {seat} is already taken by {participant}")]
    SeatTaken { seat: usize, participant: String },

    #[error("{participant} already sits in seat {seat}")]
    AlreadySeated { seat: usize, participant: String },

    #[error("{0} is not seated in this room")]
    NotSeated(String),
}

/// Failures talking to a room worker.
#[derive(Debug, Error)]
pub enum RoomError {
    #[error("room worker command channel closed")]
    CommandChannelClosed,

    #[error("room worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("room worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Lobby(#[from] LobbyError),
}
