use thiserror::Error;

/// Errors raised while compiling a pattern.
///
/// Only the strict dialect produces them; the lenient dialect recovers
/// from every malformed input. Positions are zero-based character
/// indices into the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("invalid character {ch:?} at position {position}")]
    InvalidPattern { ch: char, position: usize },

    #[error("unbalanced parenthesis at position {position}")]
    UnbalancedGroup { position: usize },

    #[error("operator {op:?} at position {position} is missing an operand")]
    DanglingOperator { op: char, position: usize },

    #[error("empty group at position {position}")]
    EmptyGroup { position: usize },
}

impl CompileError {
    /// Character index in the pattern the error points at.
    pub fn position(&self) -> usize {
        match *self {
            CompileError::InvalidPattern { position, .. }
            | CompileError::UnbalancedGroup { position }
            | CompileError::DanglingOperator { position, .. }
            | CompileError::EmptyGroup { position } => position,
        }
    }
}
