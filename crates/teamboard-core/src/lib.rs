pub mod api;
pub mod auth;
pub mod board;
pub mod calendar;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod layout;
pub mod notify;
pub mod project;
pub mod render;
pub mod task;

use std::ffi::OsString;

use anyhow::Context;
use clap::Parser;
use tracing::info;

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(
      raw_args
    );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting teamboard CLI"
  );

  let cfg = config::AppConfig::load(
    cli.config.as_deref()
  )
  .context(
    "failed to load configuration"
  )?;

  let renderer =
    render::Renderer::new(&cfg);
  let inv = cli::Invocation::parse(
    cli.rest
  )?;

  commands::dispatch(
    &cfg, &renderer, inv
  )?;

  info!("done");
  Ok(())
}
