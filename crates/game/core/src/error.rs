//! Common error infrastructure for grimoire-core.
//!
//! This module provides the shared severity classification and the
//! [`GameError`] trait implemented by every error type in the crate.
//! Domain-specific errors live next to the component that raises them:
//!
//! - [`ContentError`]: data-authoring bugs (missing balance keys, empty
//!   weighted choices, enemies with no viable behavior). Always fatal.
//! - [`crate::spell::CastError`]: a spell failed its cast conditions.
//!   Recoverable; the caller may choose differently.
//! - [`crate::engine::CombatError`]: everything the engine surfaces to the
//!   orchestrating layer.

use crate::state::AfflictionType;
use crate::spell::StatKey;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the attempted action was rejected, state is unchanged
/// - **Validation**: the caller used the API out of order
/// - **Internal**: an engine invariant did not hold (a bug)
/// - **Fatal**: content or configuration is broken; combat cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Recoverable error - retry with the same or an alternative action.
    ///
    /// Examples: spell on cooldown, not enough mana
    Recoverable,

    /// Validation error - invalid call for the current combat phase.
    ///
    /// Examples: queueing a spell during the enemy turn
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - content is broken, combat is aborted.
    ///
    /// Examples: missing balance key, no passing behavior predicate
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error aborts combat resolution.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all grimoire-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// This is useful for error categorization, metrics, and testing.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Content or configuration errors.
///
/// These indicate a data-authoring bug, never a runtime condition to recover
/// from. The engine aborts combat when one surfaces.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("balance table has no value for {owner}.{stat} (level {level:?})")]
    MissingBalanceKey {
        owner: String,
        stat: String,
        level: Option<u32>,
    },

    #[error("spell '{spell}' has no stat {stat}")]
    MissingStat { spell: String, stat: StatKey },

    #[error("effect reads stat {stat} outside of a spell")]
    StatOutsideSpell { stat: StatKey },

    #[error("unknown spell '{0}'")]
    UnknownSpell(String),

    #[error("enemy '{enemy}' has no action '{action}'")]
    UnknownAction { enemy: String, action: String },

    #[error("unknown enemy '{0}'")]
    UnknownEnemy(String),

    #[error("affliction {0} is missing from the affliction catalog")]
    UnknownAffliction(AfflictionType),

    #[error("weighted choice has no entries")]
    EmptyWeightedChoice,

    #[error("weighted choice entry has non-positive weight")]
    NonPositiveWeight,

    #[error("enemy '{enemy}' has no passing behavior predicate on turn {turn}")]
    NoViableBehavior { enemy: String, turn: u32 },

    #[error("enemy '{enemy}' excluded every candidate action on turn {turn}")]
    AllCandidatesExcluded { enemy: String, turn: u32 },

    #[error("enemy action '{action}' queues {spells} spells, the queue holds {capacity}")]
    ActionTooLong {
        action: String,
        spells: usize,
        capacity: usize,
    },

    #[error("enemy spell queue is full, cannot queue '{spell}'")]
    EnemyQueueOverflow { spell: String },
}

impl GameError for ContentError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use ContentError::*;
        match self {
            MissingBalanceKey { .. } => "CONTENT_MISSING_BALANCE_KEY",
            MissingStat { .. } => "CONTENT_MISSING_STAT",
            StatOutsideSpell { .. } => "CONTENT_STAT_OUTSIDE_SPELL",
            UnknownSpell(_) => "CONTENT_UNKNOWN_SPELL",
            UnknownAction { .. } => "CONTENT_UNKNOWN_ACTION",
            UnknownEnemy(_) => "CONTENT_UNKNOWN_ENEMY",
            UnknownAffliction(_) => "CONTENT_UNKNOWN_AFFLICTION",
            EmptyWeightedChoice => "CONTENT_EMPTY_WEIGHTED_CHOICE",
            NonPositiveWeight => "CONTENT_NON_POSITIVE_WEIGHT",
            NoViableBehavior { .. } => "CONTENT_NO_VIABLE_BEHAVIOR",
            AllCandidatesExcluded { .. } => "CONTENT_ALL_CANDIDATES_EXCLUDED",
            ActionTooLong { .. } => "CONTENT_ACTION_TOO_LONG",
            EnemyQueueOverflow { .. } => "CONTENT_ENEMY_QUEUE_OVERFLOW",
        }
    }
}
