//! Room orchestrator.
//!
//! A [`Room`] owns the worker task for one challenge and hands out
//! [`RoomHandle`]s to participants.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::RoomConfig;
use crate::error::{Result, RoomError};
use crate::events::EventBus;
use crate::handle::RoomHandle;
use crate::lobby::Lobby;
use crate::worker::{Command, RoomWorker};

/// One running challenge and its background worker.
pub struct Room {
    handle: RoomHandle,
    worker: JoinHandle<()>,
}

impl Room {
    /// Spawns the worker for `lobby` on the current tokio runtime.
    pub fn start(lobby: Lobby, config: RoomConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(config.event_buffer_size);

        info!(
            players = lobby.challenge().player_count(),
            turn_timeout = ?config.turn_timeout,
            "room started"
        );
        let worker = RoomWorker::new(lobby, command_rx, event_bus.clone(), config.turn_timeout);
        let worker = tokio::spawn(worker.run());

        Self {
            handle: RoomHandle::new(command_tx, event_bus),
            worker,
        }
    }

    /// Get a cloneable handle to this room.
    pub fn handle(&self) -> RoomHandle {
        self.handle.clone()
    }

    /// Stops the worker and waits for it to exit. Handles still held
    /// elsewhere start failing with [`RoomError::CommandChannelClosed`].
    pub async fn shutdown(self) -> Result<()> {
        // The worker may already be gone; the join below reports how it ended.
        let _ = self.handle.command_tx().send(Command::Shutdown).await;
        drop(self.handle);

        self.worker.await.map_err(RoomError::WorkerJoin)
    }
}
