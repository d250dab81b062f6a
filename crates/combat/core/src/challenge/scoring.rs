//! Per-player bookkeeping and score computation.

use super::Challenge;
use crate::config::ChallengeConfig;

/// Bookkeeping kept for each player slot.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerScore {
    pub ready: bool,
    pub eliminated: bool,
    /// Raw score frozen when the player was eliminated or the challenge ended.
    pub recorded: Option<f64>,
    pub initial_units: usize,
    /// Weight of the whole squad at construction.
    pub total_weight: i32,
    /// Weight of this player's units that were defeated or forfeited.
    pub defeated_weight: i32,
}

/// Final standing of one player.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerResult {
    pub raw: f64,
    pub multiplier: f64,
    pub score: f64,
}

impl Challenge {
    /// Opponents' defeated weight shared across the opponent count. Frozen
    /// once recorded.
    pub fn raw_score(&self, player: usize) -> f64 {
        match self.scores.get(player) {
            Some(score) => score.recorded.unwrap_or_else(|| self.live_raw_score(player)),
            None => 0.0,
        }
    }

    pub(crate) fn live_raw_score(&self, player: usize) -> f64 {
        let opponents = self.scores.len().saturating_sub(1);
        if opponents == 0 {
            return 0.0;
        }

        let defeated: i32 = self
            .scores
            .iter()
            .enumerate()
            .filter(|&(other, _)| other != player)
            .map(|(_, score)| score.defeated_weight)
            .sum();
        f64::from(defeated) / opponents as f64
    }

    /// 15x for an outright win over every opposing unit, 5x for defeating at
    /// least half the opposing weight, 1x otherwise, 0x with no opposition.
    pub fn score_multiplier(&self, player: usize) -> f64 {
        let (total, defeated) = self
            .scores
            .iter()
            .enumerate()
            .filter(|&(other, _)| other != player)
            .fold((0i64, 0i64), |(total, defeated), (_, score)| {
                (
                    total + i64::from(score.total_weight),
                    defeated + i64::from(score.defeated_weight),
                )
            });

        if total <= 0 {
            0.0
        } else if self.winner == Some(player) && defeated >= total {
            ChallengeConfig::TOTAL_VICTORY_MULTIPLIER
        } else if defeated * 2 >= total {
            ChallengeConfig::MAJORITY_MULTIPLIER
        } else {
            ChallengeConfig::BASE_MULTIPLIER
        }
    }

    pub fn player_result(&self, player: usize) -> Option<PlayerResult> {
        self.scores.get(player)?;
        let raw = self.raw_score(player);
        let multiplier = self.score_multiplier(player);
        Some(PlayerResult {
            raw,
            multiplier,
            score: raw * multiplier,
        })
    }

    pub(crate) fn record_score(&mut self, player: usize) {
        let raw = self.live_raw_score(player);
        if let Some(score) = self.scores.get_mut(player) {
            if score.recorded.is_none() {
                score.recorded = Some(raw);
            }
        }
    }
}
