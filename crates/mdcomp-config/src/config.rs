use std::{
  fs,
  path::{Path, PathBuf},
  sync::OnceLock,
};

use mdcomp_core::{
  CompileOptions,
  path::{default_root_dir, normalize_path},
};
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, templates};

/// Extension required for both the input and the output file.
pub const MARKDOWN_EXTENSION: &str = "md";

/// Configuration for the mdcomp document compiler.
///
/// Fields are typically loaded from a TOML or JSON config file and then
/// overridden by `--config KEY=VALUE` flags and CLI arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Root Markdown file to compile.
  pub input: Option<PathBuf>,

  /// File the compiled document is written to.
  pub output: Option<PathBuf>,

  /// Whether to shift the headings of included files down one level.
  pub adjust_headings: bool,

  /// Whether to insert the generated table of contents.
  pub insert_toc: bool,

  /// Directory `$ROOT/` expands to. Falls back to [`default_root_dir`].
  #[serde(skip_serializing_if = "Option::is_none")]
  pub root_dir: Option<PathBuf>,

  /// Whether dropped includes should fail the compile.
  pub strict: bool,
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Arguments
  ///
  /// * `path` - Path to the configuration file.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::Io`] if the file cannot be read,
  /// [`ConfigError::Json`] or [`ConfigError::Toml`] if it cannot be parsed, and
  /// [`ConfigError::Config`] if the format is unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    log::debug!("Reading config file: {}", path.display());
    let content = fs::read_to_string(path)?;

    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
      return Err(ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      )));
    };

    match ext.to_lowercase().as_str() {
      "json" => Ok(serde_json::from_str(&content)?),
      "toml" => Ok(toml::from_str(&content)?),
      _ => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from config files and `KEY=VALUE` overrides.
  ///
  /// Explicit config files are merged in order, later files taking
  /// precedence. Without any, a config file discovered in the working
  /// directory is used, or the defaults when there is none.
  ///
  /// # Errors
  ///
  /// Returns an error if a config file cannot be loaded or an override is
  /// invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged_config = Self::from_file(first)?;
      for config_path in rest {
        merged_config.merge(Self::from_file(config_path)?);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }

      merged_config
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config)?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    Ok(config)
  }

  /// Apply configuration overrides from `KEY=VALUE` strings.
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not in `KEY=VALUE` format, names an
  /// unknown key, or has a value of the wrong type.
  ///
  /// # Example
  ///
  /// ```rust
  /// use mdcomp_config::Config;
  ///
  /// let mut config = Config::default();
  /// config
  ///   .apply_overrides(&["insert_toc=yes".to_string(), "output=out.md".to_string()])
  ///   .unwrap();
  /// assert!(config.insert_toc);
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single configuration override by key.
  ///
  /// An empty value clears optional path fields.
  ///
  /// # Errors
  ///
  /// Returns an error for unknown keys and invalid boolean values.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "input" => self.input = optional_path(value),
      "output" => self.output = optional_path(value),
      "root_dir" => self.root_dir = optional_path(value),
      "adjust_headings" => self.adjust_headings = parse_bool(key, value)?,
      "insert_toc" => self.insert_toc = parse_bool(key, value)?,
      "strict" => self.strict = parse_bool(key, value)?,
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'. See documentation for \
           supported keys."
        )));
      },
    }

    Ok(())
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: Other's [`Some`] value replaces this config's
  ///   value
  /// - Plain fields: Other's value always replaces
  pub fn merge(&mut self, other: Self) {
    if other.input.is_some() {
      self.input = other.input;
    }
    if other.output.is_some() {
      self.output = other.output;
    }
    if other.root_dir.is_some() {
      self.root_dir = other.root_dir;
    }
    self.adjust_headings = other.adjust_headings;
    self.insert_toc = other.insert_toc;
    self.strict = other.strict;
  }

  /// Search for config files in the working directory.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let current_dir = std::env::current_dir().ok()?;
        Self::find_config_file_in(&current_dir)
      })
      .clone()
  }

  /// Search for config files in `dir`.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    [
      "mdcomp.toml",
      "mdcomp.json",
      ".mdcomp.toml",
      ".mdcomp.json",
    ]
    .iter()
    .map(|filename| dir.join(filename))
    .find(|config_path| config_path.is_file())
  }

  /// Directory `$ROOT/` expands to.
  #[must_use]
  pub fn resolved_root_dir(&self) -> PathBuf {
    self
      .root_dir
      .clone()
      .or_else(default_root_dir)
      .unwrap_or_else(|| PathBuf::from("."))
  }

  /// The input path, normalized and with `$ROOT/` expanded.
  #[must_use]
  pub fn resolved_input(&self) -> Option<PathBuf> {
    self.input.as_deref().map(|path| self.resolve(path))
  }

  /// The output path, normalized and with `$ROOT/` expanded.
  #[must_use]
  pub fn resolved_output(&self) -> Option<PathBuf> {
    self.output.as_deref().map(|path| self.resolve(path))
  }

  fn resolve(&self, path: &Path) -> PathBuf {
    PathBuf::from(normalize_path(
      &path.to_string_lossy(),
      &self.resolved_root_dir(),
    ))
  }

  /// Options for the core compiler.
  #[must_use]
  pub fn compile_options(&self) -> CompileOptions {
    CompileOptions {
      adjust_heading_levels: self.adjust_headings,
      insert_toc:            self.insert_toc,
      root_dir:              self.resolved_root_dir(),
    }
  }

  /// Validate the input and output paths, returning them resolved.
  ///
  /// The input must be an existing `.md` file. The output must have a `.md`
  /// extension and live in an existing directory. Every problem found is
  /// reported, not just the first.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::InvalidPaths`] listing each problem.
  pub fn validate_paths(&self) -> Result<(PathBuf, PathBuf), ConfigError> {
    let mut errors = Vec::new();
    let input = self.resolved_input();
    let output = self.resolved_output();

    match &input {
      None => errors.push("No input file specified.".to_string()),
      Some(input) => {
        if !has_markdown_extension(input) {
          errors.push("Input file must have a '.md' file extension.".to_string());
        } else if !input.is_file() {
          errors.push(format!(
            "Input file ({}) does not exist. Please check the path and file \
             name.",
            input.display()
          ));
        }
      },
    }

    match &output {
      None => errors.push("No output file specified.".to_string()),
      Some(output) => {
        if !has_markdown_extension(output) {
          errors
            .push("Output file must have a '.md' file extension.".to_string());
        } else if let Some(dir) = output.parent()
          && !dir.as_os_str().is_empty()
          && !dir.is_dir()
        {
          errors.push(format!(
            "Output directory ({}) does not exist. Please fix or create it.",
            dir.display()
          ));
        }
      },
    }

    match (input, output) {
      (Some(input), Some(output)) if errors.is_empty() => Ok((input, output)),
      _ => Err(ConfigError::InvalidPaths(errors)),
    }
  }

  /// Write a default configuration file with commented explanations.
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = templates::get_template(format)?;

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

fn has_markdown_extension(path: &Path) -> bool {
  path.extension().and_then(|ext| ext.to_str()) == Some(MARKDOWN_EXTENSION)
}

fn optional_path(value: &str) -> Option<PathBuf> {
  (!value.is_empty()).then(|| PathBuf::from(value))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::useless_vec,
    clippy::unwrap_used,
    clippy::field_reassign_with_default,
    reason = "Fine in tests"
  )]

  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_config_merge_option_fields() {
    let mut base = Config::default();
    base.input = Some(PathBuf::from("base.md"));
    base.output = None;

    let mut override_config = Config::default();
    override_config.input = None; // should not replace
    override_config.output = Some(PathBuf::from("out.md"));

    base.merge(override_config);

    assert_eq!(base.input, Some(PathBuf::from("base.md")));
    assert_eq!(base.output, Some(PathBuf::from("out.md")));
  }

  #[test]
  fn test_config_merge_boolean_fields() {
    let mut base = Config::default();
    base.insert_toc = true;
    base.strict = false;

    let mut override_config = Config::default();
    override_config.insert_toc = false;
    override_config.strict = true;

    base.merge(override_config);

    assert!(!base.insert_toc);
    assert!(base.strict);
  }

  #[test]
  fn test_apply_overrides_boolean() {
    let mut config = Config::default();

    config
      .apply_overrides(&vec![
        "insert_toc=yes".to_string(),
        "adjust_headings=1".to_string(),
        "strict=false".to_string(),
      ])
      .unwrap();

    assert!(config.insert_toc);
    assert!(config.adjust_headings);
    assert!(!config.strict);
  }

  #[test]
  fn test_apply_overrides_path() {
    let mut config = Config::default();

    config
      .apply_overrides(&vec![
        "input = docs/index.md".to_string(),
        "root_dir=/srv".to_string(),
      ])
      .unwrap();

    assert_eq!(config.input, Some(PathBuf::from("docs/index.md")));
    assert_eq!(config.root_dir, Some(PathBuf::from("/srv")));

    config.apply_override("root_dir", "").unwrap();
    assert_eq!(config.root_dir, None);
  }

  #[test]
  fn test_apply_overrides_invalid_format() {
    let mut config = Config::default();

    let result = config.apply_overrides(&vec!["no_equals_sign".to_string()]);

    assert!(result.is_err());
    assert!(
      result
        .unwrap_err()
        .to_string()
        .contains("Expected KEY=VALUE")
    );
  }

  #[test]
  fn test_apply_overrides_unknown_key() {
    let mut config = Config::default();

    let result = config.apply_overrides(&vec!["title=value".to_string()]);

    assert!(result.is_err());
    assert!(
      result
        .unwrap_err()
        .to_string()
        .contains("Unknown configuration key")
    );
  }

  #[test]
  fn test_apply_overrides_invalid_boolean() {
    let mut config = Config::default();

    let result = config.apply_overrides(&vec!["insert_toc=maybe".to_string()]);

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Invalid boolean"));
  }

  #[test]
  fn test_from_file_toml_and_json() {
    let dir = tempdir().unwrap();
    let toml_path = dir.path().join("mdcomp.toml");
    let json_path = dir.path().join("mdcomp.json");
    fs::write(&toml_path, "input = \"a.md\"\ninsert_toc = true\n").unwrap();
    fs::write(&json_path, r#"{ "output": "b.md", "strict": true }"#).unwrap();

    let from_toml = Config::from_file(&toml_path).unwrap();
    assert_eq!(from_toml.input, Some(PathBuf::from("a.md")));
    assert!(from_toml.insert_toc);

    let from_json = Config::from_file(&json_path).unwrap();
    assert_eq!(from_json.output, Some(PathBuf::from("b.md")));
    assert!(from_json.strict);
  }

  #[test]
  fn test_from_file_error_kinds() {
    let dir = tempdir().unwrap();
    let toml_path = dir.path().join("broken.toml");
    let json_path = dir.path().join("broken.json");
    fs::write(&toml_path, "input = ").unwrap();
    fs::write(&json_path, "{ \"input\": ").unwrap();

    assert!(matches!(
      Config::from_file(&toml_path),
      Err(ConfigError::Toml(_))
    ));
    assert!(matches!(
      Config::from_file(&json_path),
      Err(ConfigError::Json(_))
    ));
    assert!(matches!(
      Config::from_file(dir.path().join("absent.toml")),
      Err(ConfigError::Io(_))
    ));
  }

  #[test]
  fn test_from_file_rejects_wrongly_typed_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mdcomp.toml");
    fs::write(&path, "insert_toc = \"sometimes\"\n").unwrap();

    let err = Config::from_file(&path).unwrap_err();
    assert!(err.to_string().starts_with("TOML error:"));
  }

  #[test]
  fn test_from_file_rejects_unknown_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mdcomp.yaml");
    fs::write(&path, "input: a.md").unwrap();

    let err = Config::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Unsupported config file format"));
  }

  #[test]
  fn test_load_merges_files_in_order() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.toml");
    let second = dir.path().join("second.toml");
    fs::write(&first, "input = \"a.md\"\noutput = \"a-out.md\"\n").unwrap();
    fs::write(&second, "output = \"b-out.md\"\ninsert_toc = true\n").unwrap();

    let config =
      Config::load(&[first, second], &["strict=yes".to_string()]).unwrap();

    assert_eq!(config.input, Some(PathBuf::from("a.md")));
    assert_eq!(config.output, Some(PathBuf::from("b-out.md")));
    assert!(config.insert_toc);
    assert!(config.strict);
  }

  #[test]
  fn test_find_config_file_in() {
    let dir = tempdir().unwrap();
    assert_eq!(Config::find_config_file_in(dir.path()), None);

    fs::write(dir.path().join(".mdcomp.json"), "{}").unwrap();
    fs::write(dir.path().join("mdcomp.toml"), "").unwrap();
    assert_eq!(
      Config::find_config_file_in(dir.path()),
      Some(dir.path().join("mdcomp.toml"))
    );
  }

  #[test]
  fn test_validate_paths_accepts_valid_paths() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.md");
    fs::write(&input, "# In").unwrap();

    let config = Config {
      input: Some(input.clone()),
      output: Some(dir.path().join("out.md")),
      ..Default::default()
    };
    let (valid_input, valid_output) = config.validate_paths().unwrap();
    assert_eq!(valid_input, input);
    assert_eq!(valid_output, dir.path().join("out.md"));
  }

  #[test]
  fn test_validate_paths_reports_every_problem() {
    let dir = tempdir().unwrap();
    let config = Config {
      input: Some(dir.path().join("missing.md")),
      output: Some(dir.path().join("nowhere/out.md")),
      ..Default::default()
    };

    let err = config.validate_paths().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPaths(_)));
    let message = err.to_string();
    let errors: Vec<&str> = message.lines().skip(1).collect();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].contains("does not exist"));
    assert!(errors[1].starts_with("- Output directory"));
  }

  #[test]
  fn test_validate_paths_requires_both_paths() {
    let err = Config::default().validate_paths().unwrap_err().to_string();
    assert!(err.contains("No input file specified."));
    assert!(err.contains("No output file specified."));
  }

  #[test]
  fn test_validate_paths_requires_markdown_extensions() {
    let config = Config {
      input: Some(PathBuf::from("in.txt")),
      output: Some(PathBuf::from("out")),
      ..Default::default()
    };

    let err = config.validate_paths().unwrap_err().to_string();
    assert!(err.contains("Input file must have a '.md' file extension."));
    assert!(err.contains("Output file must have a '.md' file extension."));
  }

  #[test]
  fn test_resolved_paths_expand_root() {
    let config = Config {
      input: Some(PathBuf::from("$ROOT/docs/index.md")),
      output: Some(PathBuf::from(" out.md ")),
      root_dir: Some(PathBuf::from("/srv/project")),
      ..Default::default()
    };

    assert_eq!(
      config.resolved_input(),
      Some(PathBuf::from("/srv/project/docs/index.md"))
    );
    assert_eq!(config.resolved_output(), Some(PathBuf::from("out.md")));
    assert_eq!(config.compile_options().root_dir, PathBuf::from("/srv/project"));
  }

  #[test]
  fn test_generate_default_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mdcomp.toml");

    Config::generate_default_config("toml", &path).unwrap();
    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.input, Some(PathBuf::from("docs/index.md")));

    assert!(Config::generate_default_config("ini", &path).is_err());
  }
}
