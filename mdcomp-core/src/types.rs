//! Types for the mdcomp-core public API.
use std::{fmt, ops::Range, path::PathBuf};

use serde::{Deserialize, Serialize};

/// A heading line parsed from a Markdown document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Heading {
  /// Heading level, the number of leading `#` characters.
  pub level:  usize,
  /// Trimmed heading text, without the anchor annotation.
  pub text:   String,
  /// Contents of the trailing `{...}` annotation, e.g. `#getting-started`.
  pub anchor: Option<String>,
}

impl fmt::Display for Heading {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", "#".repeat(self.level), self.text)?;
    if let Some(anchor) = &self.anchor {
      write!(f, " {{{anchor}}}")?;
    }
    Ok(())
  }
}

/// A heading together with the byte span of the line it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingMatch {
  /// Byte range of the line, excluding its line terminator.
  pub span:    Range<usize>,
  pub heading: Heading,
}

/// An include directive of the form `:[label](path)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
  /// Byte range of the directive line, excluding its line terminator.
  pub span:    Range<usize>,
  /// The directive exactly as written, trailing whitespace included.
  pub literal: String,
  pub label:   String,
  /// Target path as written in the directive, before normalization.
  pub target:  String,
}

/// Why an include directive was dropped from the output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
  /// The target file does not exist.
  MissingInclude,
  /// The target file is already being expanded further up the include chain.
  CyclicInclude,
}

impl fmt::Display for DiagnosticKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::MissingInclude => f.write_str("missing include"),
      Self::CyclicInclude => f.write_str("cyclic include"),
    }
  }
}

/// Record of an include directive that was silently removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
  pub kind:   DiagnosticKind,
  /// File containing the directive.
  pub file:   PathBuf,
  /// Resolved path of the include target.
  pub target: PathBuf,
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}: {} (in {})",
      self.kind,
      self.target.display(),
      self.file.display()
    )
  }
}

/// Result of compiling a root document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Compilation {
  /// The fully assembled document.
  pub content: String,

  /// The generated table of contents, whether or not it was inserted.
  pub toc: String,

  /// Includes that were dropped while assembling the document.
  pub diagnostics: Vec<Diagnostic>,
}
