//! linkres CLI entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Parse configuration**: load `linkres.toml` (or `--config`), apply
//!    environment overrides, and validate it.
//! 2. **Wire observability**: an `EnvFilter`-driven `tracing-subscriber` with
//!    JSON or pretty output on stderr, plus an OpenTelemetry OTLP exporter
//!    when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
//! 3. **Construct infrastructure**: the platform's `SecretClient` and
//!    `ElementClient`, injected into the engine's `LinkResolver`.
//! 4. **Dispatch** the `classify`, `url`, `resolve` or `open` subcommand.

mod commands;
mod config;
mod console;
mod observability;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use commands::Cli;
use config::{CliConfig, DEFAULT_CONFIG_PATH};
use console::ConsoleBrowser;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _telemetry = observability::init(cli.log_format)?;

    let (path, explicit) = match &cli.config {
        Some(path) => (path.as_path(), true),
        None => (Path::new(DEFAULT_CONFIG_PATH), false),
    };
    let mut config = CliConfig::load(path, explicit)?;
    config.apply_env(|name| std::env::var(name).ok());

    let resolver = commands::compose(&config)?;
    let status = commands::run(
        cli.command,
        resolver,
        ConsoleBrowser::stdout(),
        &mut std::io::stdout(),
    )
    .await?;
    Ok(status.into())
}
