use std::{io, path::PathBuf};

use thiserror::Error;

/// Error type for document compilation.
///
/// Only failures to read a source file abort a compile. Missing or cyclic
/// includes are dropped and reported as [`crate::Diagnostic`]s instead.
#[derive(Debug, Error)]
pub enum CompileError {
  #[error("Source file does not exist: {}", .0.display())]
  NotFound(PathBuf),

  #[error("Failed to read {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Source file is not valid UTF-8: {}", path.display())]
  Utf8 { path: PathBuf },
}

/// Result type for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;
