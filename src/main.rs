use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use netlab_report::cli::{Cli, ReportCommandHandler};
use netlab_report::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics are warnings, so show them unless RUST_LOG says otherwise
    let default_filter = if cli.verbose {
        "warn,netlab_report=debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let config = AppConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(cli.log_dir, cli.hosts);
    config.validate().context("Invalid configuration")?;

    let handler = ReportCommandHandler::new(config);
    handler.handle(cli.command).await?;

    Ok(())
}
