//! Error codes for the game server API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses and websocket toasts.

use core::fmt;

use super::domain::ValidationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Intent validation
    /// Intent not allowed in the current game status
    PhaseMismatch,
    /// Actor is not in the current game
    NotInGame,
    /// Actor is dead
    DeadActor,
    /// Role does not permit the action
    WrongRole,
    /// Target is not acceptable
    InvalidTarget,
    /// Per-night or per-game limit reached
    AlreadyActed,
    /// Start preconditions failed
    InvalidStart,
    /// Unknown action or bad payload
    MalformedIntent,

    // Request
    /// Missing or invalid player identity header
    InvalidHeader,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// No current game
    GameNotFound,
    /// Player not found
    PlayerNotFound,
    /// Role not found
    RoleNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Optimistic lock conflict
    OptimisticLock,
    /// Unique constraint violation
    UniqueViolation,
    /// Generic conflict
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
    /// Data corruption detected
    DataCorruption,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::NotInGame => "NOT_IN_GAME",
            Self::DeadActor => "DEAD_ACTOR",
            Self::WrongRole => "WRONG_ROLE",
            Self::InvalidTarget => "INVALID_TARGET",
            Self::AlreadyActed => "ALREADY_ACTED",
            Self::InvalidStart => "INVALID_START",
            Self::MalformedIntent => "MALFORMED_INTENT",

            Self::InvalidHeader => "INVALID_HEADER",
            Self::BadRequest => "BAD_REQUEST",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::RoleNotFound => "ROLE_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }

    /// True for the codes a player can cause with a bad intent.
    pub const fn is_intent_rejection(&self) -> bool {
        matches!(
            self,
            Self::PhaseMismatch
                | Self::NotInGame
                | Self::DeadActor
                | Self::WrongRole
                | Self::InvalidTarget
                | Self::AlreadyActed
                | Self::InvalidStart
                | Self::MalformedIntent
        )
    }
}

impl From<ValidationKind> for ErrorCode {
    fn from(kind: ValidationKind) -> Self {
        match kind {
            ValidationKind::PhaseMismatch => Self::PhaseMismatch,
            ValidationKind::NotInGame => Self::NotInGame,
            ValidationKind::DeadActor => Self::DeadActor,
            ValidationKind::WrongRole => Self::WrongRole,
            ValidationKind::InvalidTarget => Self::InvalidTarget,
            ValidationKind::AlreadyActed => Self::AlreadyActed,
            ValidationKind::InvalidStart => Self::InvalidStart,
            ValidationKind::MalformedIntent => Self::MalformedIntent,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
