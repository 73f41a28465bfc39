//! Top Movers - daily KRX leaderboard of liquid stocks with the largest gains.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Date         │──▶│ Market Data  │──▶│ Screener     │──▶│ Notification │
//! │ Resolver     │   │ (KRX)        │   │ filter/rank  │   │ (webhook)    │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! A run is a single sequential pass:
//! 1. Fetch the day's price-change table. An empty table means the market was
//!    closed and the run stops there.
//! 2. Restrict rows to listed stocks, then to turnover ≥ the threshold.
//! 3. Rank by percentage change and keep the top N.
//! 4. Print the report, then post it to the webhook in ≤2000-character chunks.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod data;
pub mod date;
pub mod notification;
pub mod screener;

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing::Instrument;

use movers_common::logging::generate_run_id;
use movers_common::{Config, Error, Result};

use crate::data::{fetch_stock_tickers, MarketDataProvider};
use crate::notification::WebhookNotifier;
use crate::screener::report::{market_closed_message, no_qualifying_message};
use crate::screener::{render, Report, ScreenOutcome, ScreenerEngine};

/// Status line printed after a successful delivery.
pub const DELIVERED_MESSAGE: &str = "📨 디스코드 발송 완료.";

/// Status line printed when no webhook is configured.
pub const NO_WEBHOOK_MESSAGE: &str =
    "⚠️ DISCORD_WEBHOOK_URL 환경변수가 없어 디스코드 발송을 건너뜁니다.";

/// What happened to a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Every chunk was accepted by the webhook
    Sent { chunks: usize },
    /// No webhook configured
    Skipped,
    /// Delivery suppressed with `--dry-run`
    DryRun,
}

/// Benign result of a run. Failures are returned as errors instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The provider returned no rows for the date
    MarketClosed { date: String },
    /// No stock met the turnover threshold
    NoQualifying { date: String },
    Reported { report: Report, delivery: Delivery },
}

/// Destination for the report and status lines (stdout by default).
pub type Output = Arc<Mutex<dyn Write + Send>>;

/// Pipeline driver.
pub struct MoversService {
    config: Config,
    provider: Arc<dyn MarketDataProvider>,
    notifier: Option<WebhookNotifier>,
    engine: ScreenerEngine,
    output: Output,
}

impl MoversService {
    pub fn new(
        config: Config,
        provider: Arc<dyn MarketDataProvider>,
        notifier: Option<WebhookNotifier>,
    ) -> Self {
        let engine = ScreenerEngine::from_config(&config.screener);
        Self {
            config,
            provider,
            notifier,
            engine,
            output: Arc::new(Mutex::new(io::stdout())),
        }
    }

    /// Write the report and status lines somewhere other than stdout.
    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    fn emit(&self, text: impl fmt::Display) -> Result<()> {
        let mut out = self
            .output
            .lock()
            .map_err(|_| Error::Io(io::Error::other("output lock poisoned")))?;
        writeln!(out, "{}", text)?;
        out.flush()?;
        Ok(())
    }

    /// Run the whole pipeline for `date` (`YYYYMMDD`).
    pub async fn run(&self, date: &str, dry_run: bool) -> Result<RunOutcome> {
        let span = tracing::info_span!(
            "run",
            run_id = %generate_run_id(),
            date = %date,
            provider = self.provider.name(),
            market = %self.config.screener.market
        );

        self.run_inner(date, dry_run).instrument(span).await
    }

    async fn run_inner(&self, date: &str, dry_run: bool) -> Result<RunOutcome> {
        let provider_name = self.provider.name();

        let rows = self
            .provider
            .fetch_price_changes(date)
            .await
            .map_err(|e| e.into_error(provider_name))?;

        if rows.is_empty() {
            tracing::info!("Empty price table, market closed");
            self.emit(market_closed_message(date))?;
            return Ok(RunOutcome::MarketClosed {
                date: date.to_string(),
            });
        }

        let universe = fetch_stock_tickers(self.provider.as_ref())
            .await
            .map_err(|e| e.into_error(provider_name))?;

        tracing::info!(rows = rows.len(), tickers = universe.len(), "Market data fetched");

        let result = match self.engine.screen(date, rows, &universe) {
            ScreenOutcome::Ranked(result) => result,
            ScreenOutcome::NoQualifying { .. } => {
                tracing::info!(
                    min_trading_value = self.engine.min_trading_value(),
                    "No stock met the turnover threshold"
                );
                self.emit(no_qualifying_message(date, self.engine.min_trading_value()))?;
                return Ok(RunOutcome::NoQualifying {
                    date: date.to_string(),
                });
            }
        };

        let report = render(&result);
        self.emit(&report)?;

        let delivery = if dry_run {
            tracing::info!("Dry run, skipping delivery");
            Delivery::DryRun
        } else if let Some(ref notifier) = self.notifier {
            let chunks = notifier.deliver(&report).await?;
            self.emit(format!("\n{}", DELIVERED_MESSAGE))?;
            Delivery::Sent { chunks }
        } else {
            tracing::warn!("No webhook configured, skipping delivery");
            self.emit(format!("\n{}", NO_WEBHOOK_MESSAGE))?;
            Delivery::Skipped
        };

        tracing::info!(
            fetched = result.total_fetched,
            listed = result.stocks.len(),
            qualifying = result.qualifying_count,
            ?delivery,
            "Run complete"
        );

        Ok(RunOutcome::Reported { report, delivery })
    }
}
