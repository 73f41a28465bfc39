//! top-movers - post the day's liquid KRX top gainers to a Discord webhook.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use movers_common::logging::init_logging;
use movers_common::Config;
use movers_notifier::data::KrxProvider;
use movers_notifier::date::{local_today, resolve_target_date};
use movers_notifier::notification::WebhookNotifier;
use movers_notifier::MoversService;

#[derive(Parser, Debug)]
#[command(name = "top-movers")]
#[command(version)]
#[command(about = "Daily KRX top-movers leaderboard for Discord.", long_about = None)]
struct Cli {
    /// Trading date to report (YYYYMMDD). Defaults to TARGET_DATE, then today.
    #[arg(long, value_name = "YYYYMMDD")]
    date: Option<String>,

    /// Build and print the report without sending it
    #[arg(long)]
    dry_run: bool,

    /// JSON config file (defaults to ~/.top-movers/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_with_env(cli.config.as_deref()).context("Failed to load configuration")?;

    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    tracing::info!("top-movers v{}", env!("CARGO_PKG_VERSION"));

    let date = resolve_target_date(
        cli.date.as_deref().or_else(|| config.target_date()),
        local_today(),
    );

    let provider = Arc::new(KrxProvider::from_config(&config)?);
    let notifier = WebhookNotifier::from_config(&config)?;

    let service = MoversService::new(config, provider, notifier);
    let outcome = service.run(&date, cli.dry_run).await?;

    tracing::debug!(?outcome, "Exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["top-movers", "--date", "20240105", "--dry-run"]);
        assert_eq!(cli.date.as_deref(), Some("20240105"));
        assert!(cli.dry_run);
        assert!(cli.config.is_none());
    }
}
