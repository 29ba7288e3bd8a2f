//! The document compiler.
//!
//! Each source file goes through the same pipeline:
//!
//! 1. line endings are normalized and tabs expanded,
//! 2. headings are rewritten (shifted one level down when the file is
//!    included and heading adjustment is enabled, anchored when a TOC is to
//!    be inserted),
//! 3. include directives are replaced by the compiled target files.
//!
//! Once the root file is assembled, the table of contents is built from it
//! and optionally spliced in.
use std::path::{Path, PathBuf};

use log::debug;

use crate::{
  error::CompileResult,
  headings::rewrite_headings,
  include::{OpenFiles, resolve_includes},
  path::{default_root_dir, normalize_path},
  source::{FsSource, SourceProvider},
  toc::{build_toc, insert_toc, strip_placeholders},
  types::{Compilation, Diagnostic, DiagnosticKind},
  utils::{clean_path, normalize_whitespace},
};

/// Options controlling a compile run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
  /// Shift the headings of every included file one level down.
  pub adjust_heading_levels: bool,

  /// Insert the generated table of contents into the output. Also makes
  /// every heading receive an anchor id so the TOC entries can link to it.
  pub insert_toc: bool,

  /// Directory substituted for the `$ROOT/` path shortcut.
  pub root_dir: PathBuf,
}

impl Default for CompileOptions {
  fn default() -> Self {
    Self {
      adjust_heading_levels: false,
      insert_toc:            false,
      root_dir:              default_root_dir()
        .unwrap_or_else(|| PathBuf::from(".")),
    }
  }
}

/// Builder for constructing [`CompileOptions`] with method chaining.
#[derive(Debug, Clone, Default)]
pub struct CompileOptionsBuilder {
  options: CompileOptions,
}

impl CompileOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Enable or disable heading level adjustment for included files.
  #[must_use]
  pub const fn adjust_heading_levels(mut self, enabled: bool) -> Self {
    self.options.adjust_heading_levels = enabled;
    self
  }

  /// Enable or disable TOC insertion.
  #[must_use]
  pub const fn insert_toc(mut self, enabled: bool) -> Self {
    self.options.insert_toc = enabled;
    self
  }

  /// Set the directory `$ROOT/` expands to.
  #[must_use]
  pub fn root_dir<P: Into<PathBuf>>(mut self, root_dir: P) -> Self {
    self.options.root_dir = root_dir.into();
    self
  }

  /// Build the final [`CompileOptions`].
  #[must_use]
  pub fn build(self) -> CompileOptions {
    self.options
  }
}

/// Compiles a root Markdown file and its includes into one document.
#[derive(Debug, Clone)]
pub struct Compiler<S = FsSource> {
  options: CompileOptions,
  source:  S,
}

impl Compiler<FsSource> {
  /// Create a compiler reading from the filesystem.
  #[must_use]
  pub const fn new(options: CompileOptions) -> Self {
    Self {
      options,
      source: FsSource,
    }
  }
}

impl<S: SourceProvider> Compiler<S> {
  /// Create a compiler reading from `source`.
  #[must_use]
  pub const fn with_source(options: CompileOptions, source: S) -> Self {
    Self { options, source }
  }

  #[must_use]
  pub const fn options(&self) -> &CompileOptions {
    &self.options
  }

  /// Compile the document rooted at `input`.
  ///
  /// Include targets are resolved relative to the directory containing
  /// `input`, whatever file the directive appears in.
  ///
  /// # Errors
  ///
  /// Returns an error if `input`, or an included file that exists, cannot be
  /// read. Missing and cyclic includes are not errors; they are removed and
  /// listed in [`Compilation::diagnostics`].
  pub fn compile<P: AsRef<Path>>(&self, input: P) -> CompileResult<Compilation> {
    let input = clean_path(input.as_ref());
    let input_dir = input.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut open = OpenFiles::new();
    let mut diagnostics = Vec::new();
    let content =
      self.compile_file(&input_dir, &input, &mut open, &mut diagnostics)?;

    let toc = build_toc(&content);
    let content = if self.options.insert_toc {
      insert_toc(&content, &toc)
    } else {
      content
    };
    let content = strip_placeholders(&content);

    debug!(
      "Compiled {} ({} dropped includes)",
      input.display(),
      diagnostics.len()
    );

    Ok(Compilation {
      content,
      toc,
      diagnostics,
    })
  }

  fn compile_file(
    &self,
    input_dir: &Path,
    path: &Path,
    open: &mut OpenFiles,
    diagnostics: &mut Vec<Diagnostic>,
  ) -> CompileResult<String> {
    debug!("Compiling {}", path.display());

    let nested = !open.is_empty();
    let text = normalize_whitespace(&self.source.read(path)?);
    let text = rewrite_headings(
      &text,
      nested && self.options.adjust_heading_levels,
      self.options.insert_toc,
    );

    resolve_includes(&text, path, open, |directive, open| {
      let target = self.resolve_target(input_dir, &directive.target);

      let dropped = if open.contains(&target) {
        Some(DiagnosticKind::CyclicInclude)
      } else if !self.source.exists(&target) {
        Some(DiagnosticKind::MissingInclude)
      } else {
        None
      };

      if let Some(kind) = dropped {
        debug!(
          "Dropping {kind} {} in {}",
          target.display(),
          path.display()
        );
        diagnostics.push(Diagnostic {
          kind,
          file: path.to_path_buf(),
          target,
        });
        return Ok(None);
      }

      self
        .compile_file(input_dir, &target, open, diagnostics)
        .map(Some)
    })
  }

  /// Resolve an include target to the path used for reading and for cycle
  /// detection.
  fn resolve_target(&self, input_dir: &Path, target: &str) -> PathBuf {
    let normalized = normalize_path(target, &self.options.root_dir);
    let path = Path::new(&normalized);
    if path.is_absolute() {
      clean_path(path)
    } else {
      clean_path(&input_dir.join(path))
    }
  }
}

/// Compile `input` from the filesystem with `options`.
///
/// # Errors
///
/// See [`Compiler::compile`].
pub fn compile_path<P: AsRef<Path>>(
  input: P,
  options: CompileOptions,
) -> CompileResult<Compilation> {
  Compiler::new(options).compile(input)
}
