//! Events broadcast by a room worker.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use combat_core::{ChallengeState, PlayerResult};

/// Something every subscriber of a room should hear about.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    /// A participant took a seat.
    PlayerSeated { seat: usize, participant: String },
    /// The challenge changed; carries the fresh snapshot.
    StateChanged { state: Arc<ChallengeState> },
    /// The turn clock ran out and the player's turn was passed.
    TurnTimedOut { player: usize },
    /// The challenge is over.
    Finished {
        winner: Option<usize>,
        results: Vec<PlayerResult>,
    },
}

impl RoomEvent {
    /// JSON form for relaying over a transport.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Best-effort fan-out of [`RoomEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<RoomEvent>,
}

impl EventBus {
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: RoomEvent) {
        if self.tx.send(event).is_err() {
            // No subscribers - this is normal, not an error
            tracing::trace!("room event dropped without subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.tx.subscribe()
    }
}
