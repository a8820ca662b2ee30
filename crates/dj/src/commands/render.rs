//! `dj render` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use dj_config::{CliSettings, Config};
use dj_renderer::{Compiler, Components, DocumentRenderer, Html};

use super::read_input;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// JSON AST files to render (default: read stdin).
    files: Vec<PathBuf>,

    /// Path to configuration file (default: auto-discover dj.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Compile cache capacity (overrides config).
    #[arg(long, env = "DJ_CACHE_CAPACITY")]
    cache_capacity: Option<usize>,

    /// Enable verbose output (debug logs and a summary line).
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, an input cannot be read or
    /// is not a valid document tree.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            cache_capacity: self.cache_capacity,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let components = Components::from_tag_overrides(&config.render.overrides)?;
        let renderer = DocumentRenderer::new().with_components(components);
        let mut compiler = Compiler::new(config.cache.capacity);

        let mut count = 0;
        if self.files.is_empty() {
            let source = read_input(None)?;
            output.markup(&render_document(
                &mut compiler,
                &renderer,
                Path::new("<stdin>"),
                &source,
            )?)?;
            count += 1;
        } else {
            for path in &self.files {
                let source = read_input(Some(path))?;
                output.markup(&render_document(&mut compiler, &renderer, path, &source)?)?;
                count += 1;
            }
        }

        tracing::info!(documents = count, cached = compiler.len(), "Render complete");
        if self.verbose {
            output.success(&format!("Rendered {count} document(s)"));
        }
        Ok(())
    }
}

/// Render one source to markup. Blank sources render to an empty string.
fn render_document(
    compiler: &mut Compiler,
    renderer: &DocumentRenderer,
    path: &Path,
    source: &str,
) -> Result<String, CliError> {
    let html = compiler
        .render_source(source, renderer)
        .map_err(|source| CliError::Document {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(html.as_ref().map(Html::to_markup).unwrap_or_default())
}
