//! Recent-history action log exposed in snapshots.

use crate::config::ChallengeConfig;
use crate::grid::Point;
use crate::unit::UnitId;

/// What happened, with kind-specific payload.
#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum LogAction {
    Move {
        unit: UnitId,
        from: Point,
        to: Point,
        distance: u32,
    },
    Attack {
        unit: UnitId,
        targets: Vec<UnitId>,
    },
    Defeat {
        unit: UnitId,
        player: usize,
        by: Vec<UnitId>,
    },
    Activate {
        unit: UnitId,
        position: Point,
    },
}

impl LogAction {
    /// One of `move`, `attack`, `defeat`, `activate`.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    /// Rounds left when the action happened.
    pub rounds_left: u32,
    pub action: LogAction,
}

/// Append-only log pruned to the most recent rounds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionLog {
    entries: Vec<LogEntry>,
}

impl ActionLog {
    pub fn push(&mut self, rounds_left: u32, action: LogAction) {
        self.entries.push(LogEntry {
            rounds_left,
            action,
        });
    }

    /// Drops entries older than the last [`ChallengeConfig::LOG_ROUNDS_KEPT`]
    /// rounds, counting the round now starting.
    pub fn prune(&mut self, rounds_left: u32) {
        let horizon = rounds_left.saturating_add(ChallengeConfig::LOG_ROUNDS_KEPT);
        self.entries.retain(|entry| entry.rounds_left < horizon);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
