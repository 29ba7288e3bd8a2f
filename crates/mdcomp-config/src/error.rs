use std::io;

use thiserror::Error;

/// Error type for mdcomp-config operations
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration error: {0}")]
  Config(String),

  /// One entry per problem found with the input or output path.
  #[error("The following errors were found:\n- {}", .0.join("\n- "))]
  InvalidPaths(Vec<String>),

  #[error("Unsupported config format: {0}")]
  UnsupportedFormat(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("TOML error: {0}")]
  Toml(#[from] toml::de::Error),
}
