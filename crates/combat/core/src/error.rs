//! Error infrastructure for combat-core.
//!
//! Every failure a caller can trigger is a variant of [`ActionError`] (rule
//! and input errors raised by challenge operations) or [`SetupError`]
//! (rejected construction input). Both carry a user-displayable message and
//! implement [`GameError`] for classification.
//!
//! Failed operations never partially apply: the challenge is left exactly
//! as it was, phase and turn included.

use crate::grid::Point;
use crate::unit::UnitId;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same action may succeed later (wrong turn, wrong phase).
    Recoverable,

    /// Invalid input that should not be retried without changes.
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all combat-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

// ============================================================================
// Action Errors
// ============================================================================

/// Reasons a player action is rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ActionError {
    #[error("Player {0} is not part of this challenge")]
    UnknownPlayer(usize),

    #[error("The challenge has not started yet")]
    NotStarted,

    #[error("The challenge has already started")]
    AlreadyStarted,

    #[error("The challenge is over")]
    Finished,

    #[error("Units cannot be activated after readying up")]
    AlreadyReady,

    #[error("It is not your turn")]
    NotYourTurn,

    #[error("You can only {action} during the {expected} phase")]
    WrongPhase {
        action: &'static str,
        expected: &'static str,
    },

    #[error("Unit {0} does not exist")]
    UnitNotFound(UnitId),

    #[error("Unit {0} does not belong to you")]
    NotYourUnit(UnitId),

    #[error("Unit {0} appears more than once")]
    DuplicateUnit(UnitId),

    #[error("Unit {0} is not waiting to be activated")]
    NotInactive(UnitId),

    #[error("{0} is outside the battlefield")]
    OutOfBounds(Point),

    #[error("{0} is already occupied")]
    Occupied(Point),

    #[error("{0} is in a restricted area")]
    RestrictedArea(Point),

    #[error("Two units cannot be activated on {0}")]
    ActivationCollision(Point),

    #[error("Unit {0} cannot move")]
    Immobile(UnitId),

    #[error("Unit {unit} cannot reach {destination}")]
    InvalidMove { unit: UnitId, destination: Point },

    #[error("Moves use {used} cells but only {limit} are allowed per turn")]
    MoveLimitExceeded { used: u32, limit: u32 },

    #[error("Unit {0} cannot target your own units")]
    SelfTarget(UnitId),

    #[error("Unit {unit} targets {target} more than once")]
    DuplicateTarget { unit: UnitId, target: UnitId },

    #[error("Unit {unit} can target at most {max} units (got {count})")]
    TooManyTargets { unit: UnitId, count: usize, max: u32 },

    #[error("Unit {0} has a target that is out of range or tanked")]
    InvalidAttack(UnitId),

    #[error("Unit {0} is missing from the battlefield")]
    OccupancyDesync(UnitId),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            NotStarted | NotYourTurn | WrongPhase { .. } => ErrorSeverity::Recoverable,
            OccupancyDesync(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            UnknownPlayer(_) => "ACTION_UNKNOWN_PLAYER",
            NotStarted => "ACTION_NOT_STARTED",
            AlreadyStarted => "ACTION_ALREADY_STARTED",
            Finished => "ACTION_FINISHED",
            AlreadyReady => "ACTION_ALREADY_READY",
            NotYourTurn => "ACTION_NOT_YOUR_TURN",
            WrongPhase { .. } => "ACTION_WRONG_PHASE",
            UnitNotFound(_) => "ACTION_UNIT_NOT_FOUND",
            NotYourUnit(_) => "ACTION_NOT_YOUR_UNIT",
            DuplicateUnit(_) => "ACTION_DUPLICATE_UNIT",
            NotInactive(_) => "ACTION_NOT_INACTIVE",
            OutOfBounds(_) => "ACTION_OUT_OF_BOUNDS",
            Occupied(_) => "ACTION_OCCUPIED",
            RestrictedArea(_) => "ACTION_RESTRICTED_AREA",
            ActivationCollision(_) => "ACTION_ACTIVATION_COLLISION",
            Immobile(_) => "ACTION_IMMOBILE",
            InvalidMove { .. } => "ACTION_INVALID_MOVE",
            MoveLimitExceeded { .. } => "ACTION_MOVE_LIMIT_EXCEEDED",
            SelfTarget(_) => "ACTION_SELF_TARGET",
            DuplicateTarget { .. } => "ACTION_DUPLICATE_TARGET",
            TooManyTargets { .. } => "ACTION_TOO_MANY_TARGETS",
            InvalidAttack(_) => "ACTION_INVALID_ATTACK",
            OccupancyDesync(_) => "ACTION_OCCUPANCY_DESYNC",
        }
    }
}

/// Outcome of a player action as reported to the session layer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionResult {
    pub success: bool,
    /// Empty on success, a user-displayable reason on failure.
    pub message: String,
}

impl ActionResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: String::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<Result<(), ActionError>> for ActionResult {
    fn from(result: Result<(), ActionError>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(error) => Self::failure(error.to_string()),
        }
    }
}

// ============================================================================
// Setup Errors
// ============================================================================

/// Reasons a challenge cannot be constructed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetupError {
    #[error("a challenge needs at least one player")]
    NoPlayers,

    #[error("grid must have a positive size (got {width}x{height})")]
    EmptyGrid { width: u32, height: u32 },

    #[error("unit id {0} is used more than once")]
    DuplicateUnitId(UnitId),

    #[error("unit {unit} starts outside the grid at {position}")]
    StartOutOfBounds { unit: UnitId, position: Point },

    #[error("unit {unit} starts on occupied cell {position}")]
    StartOccupied { unit: UnitId, position: Point },
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoPlayers => "SETUP_NO_PLAYERS",
            Self::EmptyGrid { .. } => "SETUP_EMPTY_GRID",
            Self::DuplicateUnitId(_) => "SETUP_DUPLICATE_UNIT_ID",
            Self::StartOutOfBounds { .. } => "SETUP_START_OUT_OF_BOUNDS",
            Self::StartOccupied { .. } => "SETUP_START_OCCUPIED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_conversion_carries_message() {
        let ok: ActionResult = Ok(()).into();
        assert!(ok.success);
        assert!(ok.message.is_empty());

        let failed: ActionResult = Err(ActionError::Occupied(Point::new(2, 3))).into();
        assert!(!failed.success);
        assert_eq!(failed.message, "(2, 3) is already occupied");
    }

    #[test]
    fn severities() {
        assert!(ActionError::NotYourTurn.severity().is_recoverable());
        assert_eq!(
            ActionError::InvalidAttack(UnitId(1)).severity(),
            ErrorSeverity::Validation
        );
        assert_eq!(
            ActionError::OccupancyDesync(UnitId(1)).error_code(),
            "ACTION_OCCUPANCY_DESYNC"
        );
    }
}
