//! Room worker that owns the authoritative [`Lobby`].
//!
//! Every operation on the room arrives as a [`Command`] and is applied in
//! arrival order, so the challenge never sees concurrent mutation. After each
//! change the worker publishes a fresh snapshot and, when a turn clock is
//! configured, restarts it whenever the turn changes hands.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info};

use combat_core::{ActionResult, ChallengeState};

use crate::error::LobbyError;
use crate::events::{EventBus, RoomEvent};
use crate::lobby::{Lobby, PlayerAction};

/// Commands that can be sent to the room worker.
pub enum Command {
    /// Bind a participant to a seat.
    SetPlayer {
        seat: usize,
        participant: String,
        reply: oneshot::Sender<Result<(), LobbyError>>,
    },
    /// Apply an action for a seated participant.
    Act {
        participant: String,
        action: PlayerAction,
        reply: oneshot::Sender<ActionResult>,
    },
    /// Query the current snapshot (read-only).
    QueryState {
        reply: oneshot::Sender<ChallengeState>,
    },
    /// Stop the worker.
    Shutdown,
}

/// Identifies one player's turn: the clock restarts when this changes.
type TurnKey = (u32, usize);

/// Background task that serialises every operation on one room.
pub struct RoomWorker {
    lobby: Lobby,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    turn_timeout: Option<Duration>,
    clock: Option<(TurnKey, Instant)>,
    finished_announced: bool,
}

impl RoomWorker {
    pub fn new(
        lobby: Lobby,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        turn_timeout: Option<Duration>,
    ) -> Self {
        Self {
            lobby,
            command_rx,
            event_bus,
            turn_timeout,
            clock: None,
            finished_announced: false,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        self.reset_clock();
        loop {
            let deadline = self.clock.map(|(_, deadline)| deadline);
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                _ = expire(deadline) => self.handle_timeout(),
            }
        }
        debug!("room worker stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetPlayer {
                seat,
                participant,
                reply,
            } => {
                let result = self.lobby.set_player(seat, participant.clone());
                if result.is_ok() {
                    self.event_bus
                        .publish(RoomEvent::PlayerSeated { seat, participant });
                }
                if reply.send(result).is_err() {
                    debug!("SetPlayer reply channel closed (caller dropped)");
                }
            }
            Command::Act {
                participant,
                action,
                reply,
            } => {
                let result = self.lobby.apply(&participant, &action);
                if result.success {
                    self.after_change();
                }
                if reply.send(result).is_err() {
                    debug!("Act reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.lobby.state()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown => {}
        }
    }

    fn handle_timeout(&mut self) {
        let Some(player) = self.lobby.end_turn() else {
            self.clock = None;
            return;
        };
        info!(player, "turn clock expired");
        self.event_bus.publish(RoomEvent::TurnTimedOut { player });
        self.after_change();
    }

    /// Publishes the new snapshot, announces the end once, and restarts the
    /// turn clock if the turn moved on.
    fn after_change(&mut self) {
        let state = Arc::new(self.lobby.state());
        self.event_bus.publish(RoomEvent::StateChanged {
            state: Arc::clone(&state),
        });

        if self.lobby.challenge().is_finished() && !self.finished_announced {
            self.finished_announced = true;
            let results = state.players.iter().map(|player| player.result).collect();
            info!(winner = ?state.winner, "room finished");
            self.event_bus.publish(RoomEvent::Finished {
                winner: state.winner,
                results,
            });
        }

        self.reset_clock();
    }

    fn reset_clock(&mut self) {
        let Some(timeout) = self.turn_timeout else {
            return;
        };
        let challenge = self.lobby.challenge();
        if !challenge.is_started() {
            self.clock = None;
            return;
        }
        let Some(turn) = challenge.turn() else {
            self.clock = None;
            return;
        };

        let key = (challenge.rounds_left(), turn);
        match self.clock {
            Some((current, _)) if current == key => {}
            _ => self.clock = Some((key, Instant::now() + timeout)),
        }
    }
}

/// Resolves at `deadline`, or never when there is none.
async fn expire(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
