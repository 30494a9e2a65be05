//! error type for malformed filter expressions

use thiserror::Error;

use super::types::Operator;

/// raised when an expression cannot be compiled or reduced to a single boolean
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// `)` with no open `(` before it
    #[error("invalid filter expression: unmatched ')' at position {position}")]
    UnmatchedClose { position: usize },

    /// `(` never closed
    #[error("invalid filter expression: unclosed '(' at position {position}")]
    UnclosedOpen { position: usize },

    /// operator reached with fewer operands on the stack than it consumes
    #[error(
        "invalid filter expression: insufficient operands for operator '{operator}' at position {position}"
    )]
    MissingOperands { operator: Operator, position: usize },
}

impl FilterError {
    /// character offset in the expression where the problem was found
    pub fn position(&self) -> usize {
        match self {
            FilterError::UnmatchedClose { position }
            | FilterError::UnclosedOpen { position }
            | FilterError::MissingOperands { position, .. } => *position,
        }
    }
}
