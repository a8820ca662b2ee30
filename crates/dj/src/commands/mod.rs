//! CLI command implementations.

pub(crate) mod render;
pub(crate) mod sanitize;

pub(crate) use render::RenderArgs;
pub(crate) use sanitize::SanitizeArgs;

use std::io::{self, Read};
use std::path::Path;

use crate::error::CliError;

/// Read a file, or stdin when no path is given.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}
