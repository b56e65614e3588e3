pub mod cli;
pub mod commands;
pub mod config;
pub mod datastore;
pub mod render;

use std::ffi::OsString;

use clap::Parser;
use tracing::{
  debug,
  info
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    backend = ?cli.backend,
    "starting tareas CLI"
  );

  let mut cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  cfg.apply_overrides(
    cli.api.as_deref(),
    cli.data.as_deref()
  );
  debug!(loaded_file = ?cfg.loaded_file, "configuration ready");

  let command =
    cli.command.unwrap_or_else(|| {
      cli::Command::List(
        cli::ListArgs::default()
      )
    });
  let renderer =
    render::Renderer::for_stdout();

  commands::dispatch(
    &cfg,
    cli.backend,
    command,
    &renderer
  )?;

  info!("done");
  Ok(())
}
