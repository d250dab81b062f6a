//! Turn-based challenge: state machine, action validation and round
//! resolution.
//!
//! A [`Challenge`] owns the [`Grid`] and every [`Unit`]. Callers drive it with
//! player actions; each action is validated in full before anything is
//! mutated, so a rejected action leaves the challenge untouched.
//!
//! # Lifecycle
//!
//! ```text
//! awaiting ready ──(all players ready)──▶ in progress ──(win/draw/timeout)──▶ finished
//! ```
//!
//! Within a player's turn the phase goes `Move → Attack`. After the attack
//! phase the turn passes to the next eligible player; when the last one has
//! played, the round is resolved.
//!
//! A challenge is single-threaded state. The session layer must serialise
//! every operation against one instance.

mod actions;
mod log;
mod resolution;
mod scoring;
mod snapshot;

use std::collections::{BTreeMap, HashMap, HashSet};

pub use log::{ActionLog, LogAction, LogEntry};
pub use scoring::{PlayerResult, PlayerScore};
pub use snapshot::{ChallengeState, PlayerView, UnitView};

use crate::config::ChallengeConfig;
use crate::error::{ActionError, SetupError};
use crate::grid::Grid;
use crate::unit::{Unit, UnitEvent, UnitId, UnitTemplate};

/// Sub-step of a player's turn.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Move and activate units.
    #[default]
    Move,
    /// Declare targets.
    Attack,
}

impl Phase {
    /// Numeric phase: 0 for move/activate, 1 for attack.
    pub const fn index(self) -> u8 {
        match self {
            Phase::Move => 0,
            Phase::Attack => 1,
        }
    }

    /// One of `move`, `attack`.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Coarse lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ChallengeStatus {
    AwaitingReady,
    InProgress,
    Finished,
}

/// Combat session between several players' squads.
#[derive(Clone, Debug)]
pub struct Challenge {
    config: ChallengeConfig,
    grid: Grid,
    /// Units on the battlefield, per player.
    units: Vec<Vec<Unit>>,
    /// Units not yet placed, per player.
    inactive: Vec<Vec<Unit>>,
    scores: Vec<PlayerScore>,
    /// Active unit id to `(player, index into units[player])`.
    id_map: HashMap<UnitId, (usize, usize)>,
    /// Defender to attackers declared this round.
    attack_map: BTreeMap<UnitId, Vec<UnitId>>,
    /// Unit to extra hits owed for over-speed moves this round.
    penalty_map: BTreeMap<UnitId, u32>,
    log: ActionLog,
    /// Active player, `None` once finished.
    turn: Option<usize>,
    phase: Phase,
    rounds_left: u32,
    winner: Option<usize>,
    started: bool,
}

impl Challenge {
    /// Builds a challenge from one squad of templates per player.
    ///
    /// Templates with a starting position are placed immediately; the rest
    /// wait to be activated.
    pub fn new(
        squads: Vec<Vec<UnitTemplate>>,
        config: ChallengeConfig,
    ) -> Result<Self, SetupError> {
        if squads.is_empty() {
            return Err(SetupError::NoPlayers);
        }
        if config.width == 0 || config.height == 0 {
            return Err(SetupError::EmptyGrid {
                width: config.width,
                height: config.height,
            });
        }

        let mut grid = Grid::new(config.width, config.height);
        let mut seen = HashSet::new();
        let mut units = Vec::with_capacity(squads.len());
        let mut inactive = Vec::with_capacity(squads.len());
        let mut scores = Vec::with_capacity(squads.len());

        for (player, squad) in squads.into_iter().enumerate() {
            let mut active_units = Vec::new();
            let mut waiting = Vec::new();
            let mut score = PlayerScore {
                initial_units: squad.len(),
                ..PlayerScore::default()
            };

            for template in squad {
                if !seen.insert(template.id) {
                    return Err(SetupError::DuplicateUnitId(template.id));
                }
                score.total_weight += template.weight;

                let unit = Unit::from_template(template, player);
                match unit.position() {
                    Some(position) => {
                        let index = grid.point_to_index(position).ok_or(
                            SetupError::StartOutOfBounds {
                                unit: unit.id(),
                                position,
                            },
                        )?;
                        if !grid.place(index, player) {
                            return Err(SetupError::StartOccupied {
                                unit: unit.id(),
                                position,
                            });
                        }
                        active_units.push(unit);
                    }
                    None => waiting.push(unit),
                }
            }

            units.push(active_units);
            inactive.push(waiting);
            scores.push(score);
        }

        let rounds_left = config.max_rounds.max(1);
        let mut challenge = Self {
            config,
            grid,
            units,
            inactive,
            scores,
            id_map: HashMap::new(),
            attack_map: BTreeMap::new(),
            penalty_map: BTreeMap::new(),
            log: ActionLog::default(),
            turn: Some(0),
            phase: Phase::Move,
            rounds_left,
            winner: None,
            started: false,
        };
        challenge.rebuild_id_map();

        Ok(challenge)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn config(&self) -> &ChallengeConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player_count(&self) -> usize {
        self.scores.len()
    }

    pub fn status(&self) -> ChallengeStatus {
        match (self.started, self.turn) {
            (_, None) => ChallengeStatus::Finished,
            (false, Some(_)) => ChallengeStatus::AwaitingReady,
            (true, Some(_)) => ChallengeStatus::InProgress,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.turn.is_none()
    }

    pub fn turn(&self) -> Option<usize> {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rounds_left(&self) -> u32 {
        self.rounds_left
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn scores(&self) -> &[PlayerScore] {
        &self.scores
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    /// Active units of `player`.
    pub fn units(&self, player: usize) -> &[Unit] {
        self.units.get(player).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Inactive units of `player`.
    pub fn inactive(&self, player: usize) -> &[Unit] {
        self.inactive.get(player).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Active unit by id.
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        let &(player, index) = self.id_map.get(&id)?;
        self.units.get(player)?.get(index)
    }

    /// Unit standing on `index`, if any.
    pub fn unit_at(&self, index: usize) -> Option<&Unit> {
        let player = self.grid.committed_player_at(index)?;
        let point = self.grid.index_to_point(index);
        self.units
            .get(player)?
            .iter()
            .find(|unit| unit.position() == Some(point))
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        let &(player, index) = self.id_map.get(&id)?;
        self.units.get_mut(player)?.get_mut(index)
    }

    /// Players still in the running.
    pub fn remaining_players(&self) -> Vec<usize> {
        (0..self.scores.len())
            .filter(|&player| !self.scores[player].eliminated)
            .collect()
    }

    // ========================================================================
    // Bookkeeping
    // ========================================================================

    pub(crate) fn rebuild_id_map(&mut self) {
        self.id_map.clear();
        for (player, units) in self.units.iter().enumerate() {
            for (index, unit) in units.iter().enumerate() {
                self.id_map.insert(unit.id(), (player, index));
            }
        }
    }

    /// Removes active units, freeing their cells. Ids that are not active are
    /// skipped. Returns the removed units.
    pub(crate) fn remove_units(&mut self, ids: &[UnitId]) -> Vec<Unit> {
        let doomed: HashSet<UnitId> = ids.iter().copied().collect();
        let mut removed = Vec::new();

        for units in &mut self.units {
            let (gone, kept): (Vec<Unit>, Vec<Unit>) = std::mem::take(units)
                .into_iter()
                .partition(|unit| doomed.contains(&unit.id()));
            *units = kept;
            removed.extend(gone);
        }

        for unit in &removed {
            if let Some(index) = unit
                .position()
                .and_then(|position| self.grid.point_to_index(position))
            {
                self.grid.vacate(index);
            }
        }

        self.rebuild_id_map();
        removed
    }

    pub(crate) fn check_player(&self, player: usize) -> Result<(), ActionError> {
        if player < self.scores.len() {
            Ok(())
        } else {
            Err(ActionError::UnknownPlayer(player))
        }
    }

    /// Ensures `player` may act in `phase` right now.
    pub(crate) fn ensure_turn(
        &self,
        player: usize,
        phase: Phase,
        action: &'static str,
    ) -> Result<(), ActionError> {
        self.check_player(player)?;
        if self.is_finished() {
            return Err(ActionError::Finished);
        }
        if !self.started {
            return Err(ActionError::NotStarted);
        }
        if self.turn != Some(player) {
            return Err(ActionError::NotYourTurn);
        }
        if self.phase != phase {
            return Err(ActionError::WrongPhase {
                action,
                expected: phase.name(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Turn flow
    // ========================================================================

    /// A player takes turns while ready, not eliminated and holding units.
    fn is_eligible(&self, player: usize) -> bool {
        let Some(score) = self.scores.get(player) else {
            return false;
        };
        score.ready
            && !score.eliminated
            && (!self.units[player].is_empty() || !self.inactive[player].is_empty())
    }

    fn next_eligible(&self, from: usize) -> Option<usize> {
        (from..self.scores.len()).find(|&player| self.is_eligible(player))
    }

    pub(crate) fn start(&mut self) {
        self.started = true;
        for unit in self.units.iter_mut().flatten() {
            unit.update(UnitEvent::RoundStart);
        }

        tracing::info!(
            players = self.scores.len(),
            rounds = self.rounds_left,
            "challenge started"
        );

        self.phase = Phase::Move;
        match self.next_eligible(0) {
            Some(player) => self.turn = Some(player),
            None => self.finish_round(),
        }
    }

    /// Ends the current phase: move passes to attack, attack passes the turn.
    pub(crate) fn end_phase(&mut self) {
        match self.phase {
            Phase::Move => self.phase = Phase::Attack,
            Phase::Attack => self.advance_turn(),
        }
    }

    /// Hands the turn to the next eligible player, resolving the round when
    /// everyone has played.
    pub(crate) fn advance_turn(&mut self) {
        let Some(current) = self.turn else {
            return;
        };
        self.phase = Phase::Move;

        if let Some(next) = self.next_eligible(current + 1) {
            self.turn = Some(next);
            return;
        }

        self.finish_round();
        if self.is_finished() {
            return;
        }

        match self.next_eligible(0) {
            Some(player) => self.turn = Some(player),
            None => {
                tracing::warn!("no eligible player after round resolution");
                self.finish(None);
            }
        }
    }

    pub(crate) fn finish(&mut self, winner: Option<usize>) {
        self.winner = winner;
        self.turn = None;
        self.attack_map.clear();
        self.penalty_map.clear();
        for player in 0..self.scores.len() {
            self.record_score(player);
        }

        tracing::info!(?winner, rounds_left = self.rounds_left, "challenge finished");
    }
}
