//! The work behind each subcommand, kept apart from `main` so it can be
//! exercised by the integration tests.
use std::{fs, path::Path};

use log::{debug, info, warn};
use mdcomp_config::Config;
use mdcomp_core::{Compilation, Compiler};

use crate::error::MdcompError;

/// Compile the document described by `config` and write it to the configured
/// output file.
///
/// Dropped includes are logged as warnings when `report_diagnostics` or
/// strict mode is set. In strict mode they fail the run before anything is
/// written.
///
/// # Errors
///
/// Returns an error if the paths are invalid, a source file cannot be read,
/// strict mode rejects the result, or the output cannot be written.
pub fn compile_document(
  config: &Config,
  report_diagnostics: bool,
) -> Result<Compilation, MdcompError> {
  let (input, output) = config.validate_paths()?;

  info!("Compiling {}", input.display());
  let compilation = Compiler::new(config.compile_options()).compile(&input)?;

  if report_diagnostics || config.strict {
    for diagnostic in &compilation.diagnostics {
      warn!("Dropped {diagnostic}");
    }
  }
  if config.strict && !compilation.diagnostics.is_empty() {
    return Err(MdcompError::DroppedIncludes(compilation.diagnostics));
  }

  save_document(&output, &compilation.content)?;
  info!("Compiled document written to {}", output.display());

  Ok(compilation)
}

/// Compile the configured input and return its table of contents.
///
/// Headings always receive anchors here so that the entries link to them.
///
/// # Errors
///
/// Returns an error if no input is configured or a source file cannot be
/// read.
pub fn document_toc(config: &Config) -> Result<String, MdcompError> {
  let input = config
    .resolved_input()
    .ok_or(MdcompError::MissingPath("input"))?;

  let mut options = config.compile_options();
  options.insert_toc = true;

  let compilation = Compiler::new(options).compile(&input)?;
  debug!(
    "Generated table of contents with {} entries",
    compilation.toc.lines().count()
  );
  Ok(compilation.toc)
}

/// Write a compiled document, trimmed and ending in a single newline.
///
/// # Errors
///
/// Returns [`MdcompError::Write`] if the file cannot be written.
pub fn save_document(path: &Path, content: &str) -> Result<(), MdcompError> {
  let mut text = content.trim().to_string();
  text.push('\n');

  fs::write(path, text).map_err(|source| {
    MdcompError::Write {
      path: path.to_path_buf(),
      source,
    }
  })
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_save_document_normalizes_trailing_whitespace() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.md");

    save_document(&path, "\n\n# Doc\n\nBody\n\n\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "# Doc\n\nBody\n");
  }

  #[test]
  fn test_save_document_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing/out.md");

    let err = save_document(&path, "text").unwrap_err();
    assert!(matches!(err, MdcompError::Write { .. }));
    assert!(err.to_string().contains("out.md"));
  }

  #[test]
  fn test_document_toc_requires_input() {
    let err = document_toc(&Config::default()).unwrap_err();
    assert!(matches!(err, MdcompError::MissingPath("input")));
  }
}
