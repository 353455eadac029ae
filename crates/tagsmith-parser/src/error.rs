//! Parser error types for tagsmith-parser.

/// Errors that can occur while parsing a Go source file.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("Parse failed at line {line}: {message}")]
    ParseFailed { line: usize, message: String },

    #[error("Missing package clause")]
    MissingPackageClause,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParserError {
    /// Best-effort 1-based line of the failure, 0 when unknown.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::ParseFailed { line, .. } => *line,
            Self::MissingPackageClause | Self::Io(_) => 0,
        }
    }
}
