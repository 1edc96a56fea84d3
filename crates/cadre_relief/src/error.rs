//! Rewrite error types.

/// Error raised while rewriting a document.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    /// The document could not be parsed. Fatal for compiled output.
    #[error("Failed to parse {id}: {message}")]
    Parse { id: String, message: String },

    /// An edit referred to an invalid position of the original text.
    #[error("Invalid edit at offset {offset}: {message}")]
    Splice { offset: usize, message: String },

    /// The source map could not be serialized.
    #[error("Failed to serialize source map: {0}")]
    SourceMap(#[from] sourcemap::Error),
}
