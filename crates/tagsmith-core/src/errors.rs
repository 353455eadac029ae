//! Cross-cutting error types for tagsmith.
//!
//! Only conditions that abort a run live here. Per-file and per-declaration
//! problems are recorded as [`crate::ScanError`]s on the model instead.

use thiserror::Error;

/// Errors that stop a generation run before or outside of scanning.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An include/exclude glob is syntactically invalid.
    #[error("Invalid source pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// Filesystem access failed while expanding source patterns.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Build a [`CoreError::Pattern`] from any displayable cause.
    pub fn pattern(pattern: &str, cause: impl std::fmt::Display) -> Self {
        Self::Pattern {
            pattern: pattern.to_string(),
            message: cause.to_string(),
        }
    }
}
