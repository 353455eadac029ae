//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// An explicitly requested config file does not exist.
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The resolved configuration failed validation. Holds every problem found.
    #[error("invalid configuration:\n  {}", errors.join("\n  "))]
    Invalid { errors: Vec<String> },
}
