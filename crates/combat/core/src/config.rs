use crate::grid::Area;

/// Challenge configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChallengeConfig {
    pub width: u32,
    pub height: u32,
    /// Rounds played before the challenge times out without a winner.
    pub max_rounds: u32,
    /// Shared movement budget for all of a player's moves in one turn.
    pub move_limit: u32,
    /// Upper bound on simultaneous exchanges applied per round. The actual
    /// count is also capped by the hits that would fell the first unit.
    pub exchanges_per_round: u32,
    /// Per-player rectangles where that player may not activate units.
    pub restricted_areas: Vec<Vec<Area>>,
}

impl ChallengeConfig {
    // ===== compile-time constants =====
    /// Path-length allowance per point of speed. Deliberately generous:
    /// overshooting speed is penalised, not forbidden.
    pub const MOVE_ALLOWANCE_FACTOR: u32 = 11;
    /// Rounds of history kept in the action log.
    pub const LOG_ROUNDS_KEPT: u32 = 2;
    pub const TOTAL_VICTORY_MULTIPLIER: f64 = 15.0;
    pub const MAJORITY_MULTIPLIER: f64 = 5.0;
    pub const BASE_MULTIPLIER: f64 = 1.0;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_WIDTH: u32 = 10;
    pub const DEFAULT_HEIGHT: u32 = 10;
    pub const DEFAULT_MAX_ROUNDS: u32 = 20;
    pub const DEFAULT_MOVE_LIMIT: u32 = 12;
    pub const DEFAULT_EXCHANGES_PER_ROUND: u32 = 1;

    pub fn new() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            max_rounds: Self::DEFAULT_MAX_ROUNDS,
            move_limit: Self::DEFAULT_MOVE_LIMIT,
            exchanges_per_round: Self::DEFAULT_EXCHANGES_PER_ROUND,
            restricted_areas: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    #[must_use]
    pub fn with_move_limit(mut self, move_limit: u32) -> Self {
        self.move_limit = move_limit;
        self
    }

    #[must_use]
    pub fn with_exchanges_per_round(mut self, exchanges: u32) -> Self {
        self.exchanges_per_round = exchanges;
        self
    }

    #[must_use]
    pub fn with_restricted_areas(mut self, restricted_areas: Vec<Vec<Area>>) -> Self {
        self.restricted_areas = restricted_areas;
        self
    }

    /// Restricted areas for `player`; empty when none are configured.
    pub fn restrictions_for(&self, player: usize) -> &[Area] {
        self.restricted_areas
            .get(player)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self::new()
    }
}
