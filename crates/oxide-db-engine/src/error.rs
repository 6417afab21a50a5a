//! Error types for the engine.

use oxide_db_core::ParseError;

/// Errors that can occur while executing statements or pulling rows.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The input failed to parse; carries the message and offending token.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Invalid operator/type combination, wrong literal kind for a column,
    /// or mismatched BYTES lengths.
    #[error("type error: {0}")]
    Type(String),

    /// Duplicate KEY/UNIQUE value or autoincrement conflict.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Unknown table, unknown column, qualifier mismatch, or duplicate
    /// CREATE.
    #[error("name error: {0}")]
    Name(String),

    /// Mutation of a virtual table, an unexecutable join kind or plan step,
    /// or UPDATE at execution.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Invariant violation inside the engine.
    #[error("internal error: {0}")]
    Internal(String),

    /// I/O failure during CSV export.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        Self::Type(message.into())
    }

    pub(crate) fn constraint(message: impl Into<String>) -> Self {
        Self::Constraint(message.into())
    }

    pub(crate) fn name(message: impl Into<String>) -> Self {
        Self::Name(message.into())
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
