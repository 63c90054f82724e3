//! Errors surfaced by the combat engine.

use crate::error::{ContentError, ErrorSeverity, GameError};
use crate::spell::CastError;
use crate::state::CombatPhase;

/// Errors surfaced to the orchestrating layer.
///
/// Recoverable and validation errors leave state untouched. Fatal errors
/// abort combat: the engine moves to [`CombatPhase::CombatEnd`] without an
/// outcome.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error(transparent)]
    Cast(#[from] CastError),

    #[error("content error: {0}")]
    Content(#[from] ContentError),

    #[error("operation requires phase {expected}, combat is in {actual}")]
    InvalidPhase {
        expected: CombatPhase,
        actual: CombatPhase,
    },

    #[error("combat is over")]
    CombatOver,
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CombatError::Cast(err) => err.severity(),
            CombatError::Content(err) => err.severity(),
            CombatError::InvalidPhase { .. } | CombatError::CombatOver => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CombatError::Cast(err) => err.error_code(),
            CombatError::Content(err) => err.error_code(),
            CombatError::InvalidPhase { .. } => "COMBAT_INVALID_PHASE",
            CombatError::CombatOver => "COMBAT_OVER",
        }
    }
}
