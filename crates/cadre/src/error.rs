//! Error types for the plugin facade and the CLI.

use cadre_relief::RewriteError;

/// Error type for Cadre operations.
#[derive(Debug, thiserror::Error)]
pub enum CadreError {
    /// A file could not be rewritten.
    #[error("{0}")]
    Rewrite(#[from] RewriteError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Options file is not valid JSON for [`crate::CadreOptions`].
    #[error("Invalid options: {0}")]
    Options(#[from] serde_json::Error),
}

/// Result type for Cadre operations.
pub type CadreResult<T> = Result<T, CadreError>;
