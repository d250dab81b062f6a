//! Deterministic combat rules for grid-based squad challenges.
//!
//! `combat-core` owns the battlefield ([`grid::Grid`]), the ability-driven
//! unit model ([`unit::Unit`]) and the turn/phase state machine
//! ([`challenge::Challenge`]). Everything is synchronous and free of I/O;
//! session layers drive a challenge through its action methods and read it
//! back through [`Challenge::state`].
pub mod challenge;
pub mod config;
pub mod error;
pub mod grid;
pub mod unit;

pub use challenge::{
    ActionLog, Challenge, ChallengeState, ChallengeStatus, LogAction, LogEntry, Phase,
    PlayerResult, PlayerScore, PlayerView, UnitView,
};
pub use config::ChallengeConfig;
pub use error::{ActionError, ActionResult, ErrorSeverity, GameError, SetupError};
pub use grid::{Area, Grid, Point, PriorityQueue, TempMoves, TANK_MARGIN};
pub use unit::{
    BaseStats, DefaultBehavior, StatBlock, Unit, UnitBehavior, UnitEvent, UnitId, UnitInfo,
    UnitTemplate,
};
