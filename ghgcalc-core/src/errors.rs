use thiserror::Error;

use crate::compute::ArithmeticError;
use crate::expression::ExpressionError;

/// Error type for registry lookups and formula evaluation.
///
/// None of these are fatal: the dispatcher returns them to the caller and leaves
/// the result history untouched.
#[derive(Error, Debug)]
pub enum GhgError {
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
    #[error("Unknown formula '{0}'")]
    UnknownFormula(String),
    #[error("Formula '{0}' is registered more than once")]
    DuplicateFormula(String),
    #[error("Formula {formula} expects {expected} input(s), got {actual}")]
    InputCountMismatch {
        formula: String,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid number for '{field}': '{value}'")]
    InvalidNumber { field: String, value: String },
    #[error("Formula {formula} requires parallel lists of equal length, got lengths {lengths:?}")]
    MismatchedListLengths {
        formula: String,
        lengths: Vec<usize>,
    },
    #[error("Formula {formula} could not be computed: {cause}")]
    Computation {
        formula: String,
        cause: ArithmeticError,
    },
    #[error(transparent)]
    Expression(#[from] ExpressionError),
    #[error("Export failed: {0}")]
    Export(#[from] std::io::Error),
    #[error("Invalid settings: {0}")]
    Settings(String),
}

impl GhgError {
    /// Whether the error was caused by the selection rather than by the inputs.
    pub fn is_selection_error(&self) -> bool {
        matches!(
            self,
            GhgError::UnknownCategory(_) | GhgError::UnknownFormula(_)
        )
    }
}

/// Convenience type for `Result<T, GhgError>`.
pub type GhgResult<T> = Result<T, GhgError>;
