use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mdcomp_config::Config;

/// Command line interface for mdcomp
#[derive(Parser, Debug)]
#[command(author, version, about = "mdcomp: Markdown document compiler")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`]). Without one, the document
  /// described by the configuration is compiled.
  #[command(subcommand)]
  pub command: Option<Commands>,

  /// Enable verbose debug logging and report dropped includes
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", global = true, action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the mdcomp CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new mdcomp configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "mdcomp.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Compile a document and write the result.
  Compile {
    /// Root Markdown file to compile.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// File to write the compiled document to.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Shift the headings of included files down one level.
    #[arg(long = "adjust-headings", action = clap::ArgAction::SetTrue)]
    adjust_headings: bool,

    /// Insert the generated table of contents.
    #[arg(long = "toc", action = clap::ArgAction::SetTrue)]
    insert_toc: bool,

    /// Directory the `$ROOT/` path shortcut expands to.
    #[arg(long = "root-dir")]
    root_dir: Option<PathBuf>,

    /// Fail if any include directive had to be dropped.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    strict: bool,
  },

  /// Print the table of contents of a document.
  Toc {
    /// Root Markdown file to read.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Shift the headings of included files down one level.
    #[arg(long = "adjust-headings", action = clap::ArgAction::SetTrue)]
    adjust_headings: bool,

    /// Directory the `$ROOT/` path shortcut expands to.
    #[arg(long = "root-dir")]
    root_dir: Option<PathBuf>,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

impl Commands {
  /// Apply the arguments of a `compile` or `toc` invocation on top of a
  /// loaded configuration. Flags can only enable options, never disable
  /// ones set in a config file.
  pub fn apply_to(&self, config: &mut Config) {
    match self {
      Self::Compile {
        input,
        output,
        adjust_headings,
        insert_toc,
        root_dir,
        strict,
      } => {
        if let Some(input) = input {
          config.input = Some(input.clone());
        }
        if let Some(output) = output {
          config.output = Some(output.clone());
        }
        if let Some(root_dir) = root_dir {
          config.root_dir = Some(root_dir.clone());
        }
        config.adjust_headings |= *adjust_headings;
        config.insert_toc |= *insert_toc;
        config.strict |= *strict;
      },
      Self::Toc {
        input,
        adjust_headings,
        root_dir,
      } => {
        if let Some(input) = input {
          config.input = Some(input.clone());
        }
        if let Some(root_dir) = root_dir {
          config.root_dir = Some(root_dir.clone());
        }
        config.adjust_headings |= *adjust_headings;
      },
      Self::Init { .. } => {},
    }
  }
}
