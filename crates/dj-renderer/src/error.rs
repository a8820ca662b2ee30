//! Error types for override maps and the compiler facade.

use dj_ast::AstError;

/// Error building an override map or compiling a document.
///
/// Rendering itself never fails: unknown kinds, dangling references and
/// malformed raw HTML all degrade to empty output.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// Override map names a kind that does not exist.
    #[error("unknown component kind: {0}")]
    UnknownKind(String),

    /// Plain tag override is not a usable element name.
    #[error("invalid tag {tag:?} for component kind {kind}")]
    InvalidTag { kind: String, tag: String },

    /// Source could not be decoded into a document tree.
    #[error(transparent)]
    Ast(#[from] AstError),
}
