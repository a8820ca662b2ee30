//! `dj sanitize` command implementation.

use std::path::PathBuf;

use clap::Args;
use dj_renderer::Html;
use dj_renderer::raw_html::sanitize_fragment;

use super::read_input;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sanitize command.
#[derive(Args)]
pub(crate) struct SanitizeArgs {
    /// HTML fragment file (default: read stdin).
    file: Option<PathBuf>,
}

impl SanitizeArgs {
    /// Execute the sanitize command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let source = read_input(self.file.as_deref())?;
        Output::new().markup(&sanitize(&source))?;
        Ok(())
    }
}

fn sanitize(source: &str) -> String {
    Html::fragment(sanitize_fragment(source, "raw")).to_markup()
}
