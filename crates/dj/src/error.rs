//! CLI error types.

use std::path::PathBuf;

use dj_ast::AstError;
use dj_config::ConfigError;
use dj_renderer::RenderError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Document { path: PathBuf, source: AstError },

    #[error("{0}")]
    Render(#[from] RenderError),
}
