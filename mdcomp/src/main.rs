use std::{
  fs,
  io::{self, Write},
};

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use mdcomp::{
  cli::{Cli, Commands},
  commands::{compile_document, document_toc},
};
use mdcomp_config::Config;

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  if let Some(Commands::Init {
    output,
    format,
    force,
  }) = &cli.command
  {
    // Check if file already exists and that we're not forcing overwrite
    if output.exists() && !force {
      bail!(
        "Configuration file already exists: {}. Use --force to overwrite.",
        output.display()
      );
    }

    // Create parent directories if needed
    if let Some(parent) = output.parent()
      && !parent.as_os_str().is_empty()
      && !parent.exists()
    {
      fs::create_dir_all(parent).wrap_err_with(|| {
        format!("Failed to create directory: {}", parent.display())
      })?;
      info!("Created directory: {}", parent.display());
    }

    Config::generate_default_config(format, output).wrap_err_with(|| {
      format!("Failed to generate configuration file: {}", output.display())
    })?;

    info!(
      "Configuration file created successfully. Edit it to point at your \
       document."
    );
    return Ok(());
  }

  // Create configuration from config files, overrides and CLI arguments
  let mut config = Config::load(&cli.config_files, &cli.config_overrides)
    .wrap_err("Failed to load configuration")?;
  if let Some(command) = &cli.command {
    command.apply_to(&mut config);
  }

  if let Some(Commands::Toc { .. }) = &cli.command {
    let toc = document_toc(&config)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{toc}").wrap_err("Failed to write to stdout")?;
    return Ok(());
  }

  let compilation = compile_document(&config, cli.verbose)?;
  info!(
    "Done: {} lines, {} dropped include(s)",
    compilation.content.lines().count(),
    compilation.diagnostics.len()
  );

  Ok(())
}
