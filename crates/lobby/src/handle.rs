//! Cloneable façade for talking to a room worker.
//!
//! [`RoomHandle`] hides the channel plumbing; every participant connection
//! can hold its own clone.
use tokio::sync::{broadcast, mpsc, oneshot};

use combat_core::{ActionResult, ChallengeState, Point, UnitId};

use crate::error::{Result, RoomError};
use crate::events::{EventBus, RoomEvent};
use crate::lobby::PlayerAction;
use crate::worker::Command;

/// Client-facing handle to one room.
#[derive(Clone)]
pub struct RoomHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RoomHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    pub(crate) fn command_tx(&self) -> &mpsc::Sender<Command> {
        &self.command_tx
    }

    /// Seat `participant` as player `seat`.
    pub async fn set_player(&self, seat: usize, participant: impl Into<String>) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::SetPlayer {
                seat,
                participant: participant.into(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::CommandChannelClosed)?;

        Ok(reply_rx.await.map_err(RoomError::ReplyChannelClosed)??)
    }

    /// Apply an action for `participant`. Rule violations come back as a
    /// failed [`ActionResult`], not as an error.
    pub async fn act(
        &self,
        participant: impl Into<String>,
        action: PlayerAction,
    ) -> Result<ActionResult> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Act {
                participant: participant.into(),
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::CommandChannelClosed)?;

        reply_rx.await.map_err(RoomError::ReplyChannelClosed)
    }

    pub async fn ready(&self, participant: impl Into<String>) -> Result<ActionResult> {
        self.act(participant, PlayerAction::Ready).await
    }

    pub async fn activate(
        &self,
        participant: impl Into<String>,
        placements: Vec<(UnitId, Point)>,
    ) -> Result<ActionResult> {
        self.act(participant, PlayerAction::Activate { placements })
            .await
    }

    pub async fn move_units(
        &self,
        participant: impl Into<String>,
        moves: Vec<(UnitId, Point)>,
    ) -> Result<ActionResult> {
        self.act(participant, PlayerAction::Move { moves }).await
    }

    pub async fn attack(
        &self,
        participant: impl Into<String>,
        targets: Vec<(UnitId, Vec<UnitId>)>,
    ) -> Result<ActionResult> {
        self.act(participant, PlayerAction::Attack { targets }).await
    }

    pub async fn pass(&self, participant: impl Into<String>) -> Result<ActionResult> {
        self.act(participant, PlayerAction::Pass).await
    }

    pub async fn leave(&self, participant: impl Into<String>) -> Result<ActionResult> {
        self.act(participant, PlayerAction::Leave).await
    }

    /// Query the current snapshot (read-only).
    pub async fn state(&self) -> Result<ChallengeState> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryState { reply: reply_tx })
            .await
            .map_err(|_| RoomError::CommandChannelClosed)?;

        reply_rx.await.map_err(RoomError::ReplyChannelClosed)
    }

    /// Subscribe to room events. Events published before the call are not
    /// replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.event_bus.subscribe()
    }
}
