//! Seats around a challenge.
//!
//! A [`Lobby`] binds participants to player slots and forwards their
//! actions to the challenge, translating outcomes into [`ActionResult`]s.

use serde::{Deserialize, Serialize};
use tracing::debug;

use combat_core::{ActionError, ActionResult, Challenge, ChallengeState, Phase, Point, UnitId};

use crate::error::LobbyError;

/// An action a seated participant can take.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerAction {
    Ready,
    Activate { placements: Vec<(UnitId, Point)> },
    Move { moves: Vec<(UnitId, Point)> },
    Attack { targets: Vec<(UnitId, Vec<UnitId>)> },
    Pass,
    Leave,
}

impl PlayerAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Activate { .. } => "activate",
            Self::Move { .. } => "move",
            Self::Attack { .. } => "attack",
            Self::Pass => "pass",
            Self::Leave => "leave",
        }
    }
}

/// Player roster wrapped around one challenge.
#[derive(Debug)]
pub struct Lobby {
    challenge: Challenge,
    seats: Vec<Option<String>>,
}

impl Lobby {
    pub fn new(challenge: Challenge) -> Self {
        let seats = vec![None; challenge.player_count()];
        Self { challenge, seats }
    }

    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    pub fn seats(&self) -> &[Option<String>] {
        &self.seats
    }

    pub fn state(&self) -> ChallengeState {
        self.challenge.state()
    }

    /// Binds `participant` to player slot `seat`. Rebinding the same
    /// participant to the same seat is a no-op.
    pub fn set_player(
        &mut self,
        seat: usize,
        participant: impl Into<String>,
    ) -> Result<(), LobbyError> {
        let participant = participant.into();
        let current = self.seats.get(seat).ok_or(LobbyError::UnknownSeat(seat))?;

        match current {
            Some(holder) if *holder == participant => return Ok(()),
            Some(holder) => {
                return Err(LobbyError::SeatTaken {
                    seat,
                    participant: holder.clone(),
                });
            }
            None => {}
        }
        if let Some(other) = self.seat_of(&participant) {
            return Err(LobbyError::AlreadySeated {
                seat: other,
                participant,
            });
        }

        debug!(seat, %participant, "participant seated");
        self.seats[seat] = Some(participant);
        Ok(())
    }

    pub fn seat_of(&self, participant: &str) -> Option<usize> {
        self.seats
            .iter()
            .position(|seat| seat.as_deref() == Some(participant))
    }

    /// Applies `action` on behalf of `participant`.
    pub fn apply(&mut self, participant: &str, action: &PlayerAction) -> ActionResult {
        let Some(player) = self.seat_of(participant) else {
            let error = LobbyError::NotSeated(participant.to_owned());
            return ActionResult::failure(error.to_string());
        };

        let result = self.dispatch(player, action);
        match &result {
            Ok(()) => debug!(player, action = action.name(), "action applied"),
            Err(error) => debug!(player, action = action.name(), %error, "action rejected"),
        }
        result.into()
    }

    fn dispatch(&mut self, player: usize, action: &PlayerAction) -> Result<(), ActionError> {
        match action {
            PlayerAction::Ready => self.challenge.set_ready(player),
            PlayerAction::Activate { placements } => self.challenge.activate(player, placements),
            PlayerAction::Move { moves } => self.challenge.move_units(player, moves),
            PlayerAction::Attack { targets } => self.challenge.set_target(player, targets),
            PlayerAction::Pass => self.challenge.pass(player),
            PlayerAction::Leave => self.challenge.leave(player),
        }
    }

    /// Ends the current player's turn, whatever phase it is in. Returns the
    /// player whose turn was ended, or `None` when no turn is running.
    pub fn end_turn(&mut self) -> Option<usize> {
        if !self.challenge.is_started() {
            return None;
        }
        let player = self.challenge.turn()?;

        if self.challenge.phase() == Phase::Move {
            self.challenge.pass(player).ok()?;
        }
        if self.challenge.turn() == Some(player) && self.challenge.phase() == Phase::Attack {
            self.challenge.pass(player).ok()?;
        }
        Some(player)
    }
}

#[cfg(test)]
mod tests {
    use combat_core::{BaseStats, ChallengeConfig, UnitTemplate};

    use super::*;

    fn lobby() -> Lobby {
        let squad = |id: u32, x: i32| {
            vec![
                UnitTemplate::new(UnitId(id), "soldier", BaseStats::new(1000, 500, 5.0, 3))
                    .at(Point::new(x, 0)),
            ]
        };
        let challenge =
            Challenge::new(vec![squad(1, 0), squad(2, 3)], ChallengeConfig::default()).unwrap();
        Lobby::new(challenge)
    }

    #[test]
    fn seats_bind_once() {
        let mut lobby = lobby();
        lobby.set_player(0, "ada").unwrap();
        lobby.set_player(0, "ada").unwrap();

        assert_eq!(
            lobby.set_player(0, "bob"),
            Err(LobbyError::SeatTaken {
                seat: 0,
                participant: "ada".into()
            })
        );
        assert_eq!(
            lobby.set_player(1, "ada"),
            Err(LobbyError::AlreadySeated {
                seat: 0,
                participant: "ada".into()
            })
        );
        assert_eq!(lobby.set_player(2, "bob"), Err(LobbyError::UnknownSeat(2)));
        assert_eq!(lobby.seat_of("ada"), Some(0));
    }

    #[test]
    fn unseated_participants_are_refused() {
        let mut lobby = lobby();
        let result = lobby.apply("mallory", &PlayerAction::Ready);
        assert!(!result.success);
        assert_eq!(result.message, "mallory is not seated in this room");
    }

    #[test]
    fn actions_are_forwarded_to_the_seated_player() {
        let mut lobby = lobby();
        lobby.set_player(0, "ada").unwrap();
        lobby.set_player(1, "bob").unwrap();

        assert!(lobby.apply("ada", &PlayerAction::Ready).success);
        assert!(lobby.apply("bob", &PlayerAction::Ready).success);
        assert!(lobby.state().started);

        let refused = lobby.apply("bob", &PlayerAction::Pass);
        assert_eq!(refused.message, "It is not your turn");

        let moved = lobby.apply(
            "ada",
            &PlayerAction::Move {
                moves: vec![(UnitId(1), Point::new(1, 0))],
            },
        );
        assert!(moved.success);
        assert_eq!(lobby.challenge().phase(), Phase::Attack);
    }

    #[test]
    fn end_turn_passes_remaining_phases() {
        let mut lobby = lobby();
        assert_eq!(lobby.end_turn(), None);

        lobby.set_player(0, "ada").unwrap();
        lobby.set_player(1, "bob").unwrap();
        lobby.apply("ada", &PlayerAction::Ready);
        lobby.apply("bob", &PlayerAction::Ready);

        assert_eq!(lobby.end_turn(), Some(0));
        assert_eq!(lobby.challenge().turn(), Some(1));
        assert_eq!(lobby.challenge().phase(), Phase::Move);
    }

    #[test]
    fn actions_round_trip_through_json() {
        let action: PlayerAction =
            serde_json::from_str(r#"{"type":"attack","targets":[[1,[2]]]}"#).unwrap();
        assert_eq!(
            action,
            PlayerAction::Attack {
                targets: vec![(UnitId(1), vec![UnitId(2)])]
            }
        );
    }
}
