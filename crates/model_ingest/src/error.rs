//! Error types for model building and directive reading

use thiserror::Error;

use crate::builder::BuilderPhase;
use crate::model::AttributeKind;

/// Result type alias for builder operations
pub type Result<T, E = BuildError> = std::result::Result<T, E>;

/// Errors raised while building a model
#[derive(Error, Debug)]
pub enum BuildError {
    /// An operation was called out of lifecycle order
    #[error("Protocol violation in `{operation}`: {reason}")]
    ProtocolViolation {
        /// Name of the rejected operation
        operation: &'static str,
        /// Why the operation was rejected
        reason: String,
    },

    /// A geometry index resolved outside its sequence
    ///
    /// Recoverable: the builder logs it and treats the attribute as absent.
    #[error("{kind} index {index} is out of range (1 to {len})")]
    IndexOutOfRange {
        /// Sequence the index refers to
        kind: AttributeKind,
        /// Index as written in the directive
        index: i64,
        /// Length of the sequence when the directive was applied
        len: usize,
    },

    /// Malformed directive text
    #[error("Line {line}: {message}")]
    Parse {
        /// 1-based source line
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    /// Operation rejected because the builder is in the wrong phase
    pub fn wrong_phase(operation: &'static str, phase: BuilderPhase) -> Self {
        Self::ProtocolViolation {
            operation,
            reason: format!("not allowed while the builder is {phase}"),
        }
    }

    /// Material setter called with no material being parsed
    pub fn no_material_target(operation: &'static str) -> Self {
        Self::ProtocolViolation {
            operation,
            reason: "no material is being parsed (call begin_material first)".to_string(),
        }
    }

    /// Create a parse error for a source line
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Whether this error is a lifecycle protocol violation
    pub const fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::ProtocolViolation { .. })
    }
}
