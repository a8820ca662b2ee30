//! Error types for document tree decoding.

/// Error decoding a document tree.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AstError {
    /// The input is not a valid JSON document tree.
    #[error("invalid document tree: {0}")]
    Json(#[from] serde_json::Error),
}
