//! Read-only views of a challenge for the session layer.

use super::{Challenge, ChallengeStatus, LogEntry, Phase, PlayerResult};
use crate::grid::{Area, Point};
use crate::unit::{StatBlock, Unit, UnitId};

/// What a player sees of one unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitView {
    pub id: UnitId,
    pub player: usize,
    pub name: String,
    pub description: String,
    pub image: String,
    pub position: Option<Point>,
    pub weight: i32,
    pub stats: StatBlock,
}

impl From<&Unit> for UnitView {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id(),
            player: unit.player(),
            name: unit.info().name.clone(),
            description: unit.description(),
            image: unit.info().image.clone(),
            position: unit.position(),
            weight: unit.weight(),
            stats: unit.stats(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerView {
    pub player: usize,
    pub ready: bool,
    pub eliminated: bool,
    pub initial_units: usize,
    pub total_weight: i32,
    pub defeated_weight: i32,
    /// Frozen raw score, once eliminated or finished.
    pub recorded: Option<f64>,
    pub result: PlayerResult,
}

/// Full snapshot of a challenge.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChallengeState {
    pub status: ChallengeStatus,
    pub started: bool,
    pub winner: Option<usize>,
    pub rounds_left: u32,
    pub turn: Option<usize>,
    pub phase: Phase,
    pub width: u32,
    pub height: u32,
    pub restricted_areas: Vec<Vec<Area>>,
    pub units: Vec<UnitView>,
    pub inactive: Vec<UnitView>,
    pub players: Vec<PlayerView>,
    pub log: Vec<LogEntry>,
}

impl Challenge {
    /// Builds a snapshot. Derived stats are recomputed for every unit.
    pub fn state(&self) -> ChallengeState {
        let players = self
            .scores
            .iter()
            .enumerate()
            .map(|(player, score)| PlayerView {
                player,
                ready: score.ready,
                eliminated: score.eliminated,
                initial_units: score.initial_units,
                total_weight: score.total_weight,
                defeated_weight: score.defeated_weight,
                recorded: score.recorded,
                result: self.player_result(player).unwrap_or(PlayerResult {
                    raw: 0.0,
                    multiplier: 0.0,
                    score: 0.0,
                }),
            })
            .collect();

        ChallengeState {
            status: self.status(),
            started: self.started,
            winner: self.winner,
            rounds_left: self.rounds_left,
            turn: self.turn,
            phase: self.phase,
            width: self.grid.width(),
            height: self.grid.height(),
            restricted_areas: self.config.restricted_areas.clone(),
            units: self.units.iter().flatten().map(UnitView::from).collect(),
            inactive: self.inactive.iter().flatten().map(UnitView::from).collect(),
            players,
            log: self.log.entries().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::soldier;
    use super::*;
    use crate::config::ChallengeConfig;
    use crate::unit::{BaseStats, UnitInfo, UnitTemplate};

    #[test]
    fn snapshot_lists_active_and_inactive_units() {
        let reserve = UnitTemplate::new(UnitId(2), "reserve", BaseStats::default()).with_info(
            UnitInfo {
                name: "Reserve".into(),
                description: "Waits.".into(),
                image: "reserve.png".into(),
            },
        );
        let challenge = Challenge::new(
            vec![vec![soldier(1, 0, 0), reserve], vec![soldier(3, 9, 9)]],
            ChallengeConfig::default(),
        )
        .unwrap();
        let state = challenge.state();

        assert_eq!(state.status, ChallengeStatus::AwaitingReady);
        assert_eq!((state.width, state.height), (10, 10));
        assert_eq!(state.units.len(), 2);
        assert_eq!(state.inactive.len(), 1);
        assert_eq!(state.inactive[0].image, "reserve.png");
        assert_eq!(state.inactive[0].position, None);
        assert_eq!(state.units[1].player, 1);
        assert_eq!(state.units[0].stats.damage, 500);
        assert_eq!(state.players.len(), 2);
        assert!(state.log.is_empty());
    }
}
