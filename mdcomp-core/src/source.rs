//! Where source documents are read from.
use std::{
  collections::HashMap,
  fs,
  io,
  path::{Path, PathBuf},
};

use crate::{
  error::{CompileError, CompileResult},
  utils::clean_path,
};

/// Read access to source documents.
///
/// Paths handed to a provider have already been resolved against the input
/// directory and lexically cleaned.
pub trait SourceProvider {
  /// Whether `path` names a readable document.
  fn exists(&self, path: &Path) -> bool;

  /// Read the document at `path`.
  ///
  /// # Errors
  ///
  /// Returns [`CompileError::NotFound`] if there is no such document, or
  /// another [`CompileError`] if it cannot be read as UTF-8 text.
  fn read(&self, path: &Path) -> CompileResult<String>;
}

impl<T: SourceProvider + ?Sized> SourceProvider for &T {
  fn exists(&self, path: &Path) -> bool {
    (**self).exists(path)
  }

  fn read(&self, path: &Path) -> CompileResult<String> {
    (**self).read(path)
  }
}

/// Reads documents from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSource;

impl SourceProvider for FsSource {
  fn exists(&self, path: &Path) -> bool {
    path.is_file()
  }

  fn read(&self, path: &Path) -> CompileResult<String> {
    let bytes = fs::read(path).map_err(|source| {
      if source.kind() == io::ErrorKind::NotFound {
        CompileError::NotFound(path.to_path_buf())
      } else {
        CompileError::Io {
          path: path.to_path_buf(),
          source,
        }
      }
    })?;

    String::from_utf8(bytes).map_err(|_| {
      CompileError::Utf8 {
        path: path.to_path_buf(),
      }
    })
  }
}

/// Serves documents from memory, for tests and for callers that assemble
/// sources themselves.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
  files: HashMap<PathBuf, String>,
}

impl MemorySource {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a document, replacing any previous one at the same path.
  pub fn insert<P: AsRef<Path>, S: Into<String>>(&mut self, path: P, content: S) {
    self
      .files
      .insert(clean_path(path.as_ref()), content.into());
  }

  /// Builder-style variant of [`MemorySource::insert`].
  #[must_use]
  pub fn with_file<P: AsRef<Path>, S: Into<String>>(
    mut self,
    path: P,
    content: S,
  ) -> Self {
    self.insert(path, content);
    self
  }
}

impl SourceProvider for MemorySource {
  fn exists(&self, path: &Path) -> bool {
    self.files.contains_key(&clean_path(path))
  }

  fn read(&self, path: &Path) -> CompileResult<String> {
    self
      .files
      .get(&clean_path(path))
      .cloned()
      .ok_or_else(|| CompileError::NotFound(path.to_path_buf()))
  }
}
