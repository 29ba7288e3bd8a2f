use crate::error::ConfigError;

/// Default configuration template in TOML, commented so that a freshly
/// generated file explains itself.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# mdcomp configuration file

# Root Markdown file to compile. Must have a .md extension.
# A leading "$ROOT/" is replaced with the root directory (see below).
input = "docs/index.md"

# Compiled output file. Must have a .md extension and its directory must exist.
output = "build/README.md"

# Shift the headings of every included file down one level (# => ##).
adjust_headings = false

# Insert the generated table of contents. The TOC replaces the first
# [[_TOC_]] line, or follows the first heading if there is none.
insert_toc = false

# Directory that "$ROOT/" expands to in paths and include directives.
# Defaults to the parent of the directory containing the mdcomp executable.
# root_dir = "/path/to/project"

# Fail instead of silently dropping includes that are missing or cyclic.
strict = false
"#;

/// Default configuration template in JSON.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "input": "docs/index.md",
  "output": "build/README.md",
  "adjust_headings": false,
  "insert_toc": false,
  "strict": false
}
"#;

/// Get the default configuration template for `format` (`toml` or `json`).
///
/// # Errors
///
/// Returns [`ConfigError::UnsupportedFormat`] for any other format.
pub fn get_template(format: &str) -> Result<&'static str, ConfigError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(ConfigError::UnsupportedFormat(format.to_string())),
  }
}
