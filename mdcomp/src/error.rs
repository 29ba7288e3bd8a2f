use std::{io, path::PathBuf};

use mdcomp_config::ConfigError;
use mdcomp_core::{CompileError, Diagnostic};
use thiserror::Error;

/// Top-level error type for the mdcomp crate.
#[derive(Debug, Error)]
pub enum MdcompError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Compile(#[from] CompileError),

  #[error("No {0} file specified. Pass it as an argument or set it in the config file.")]
  MissingPath(&'static str),

  /// Raised in strict mode when includes were dropped.
  #[error("{} include(s) could not be resolved:\n- {}", .0.len(), join_diagnostics(.0))]
  DroppedIncludes(Vec<Diagnostic>),

  #[error("Failed to write {}: {source}", path.display())]
  Write {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
}

fn join_diagnostics(diagnostics: &[Diagnostic]) -> String {
  diagnostics
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join("\n- ")
}
