//! Screener engine module.
//!
//! Filters a day's price-change table down to liquid listed stocks and
//! ranks them by percentage gain. Pure and deterministic: no I/O happens here.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

use movers_common::util::krw_to_eok_tenths;
use movers_common::ScreenerConfig;

use crate::data::{MarketRow, TickerUniverse};

// ============================================================================
// Ranked Stock
// ============================================================================

/// A stock retained in the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStock {
    pub row: MarketRow,
    /// Turnover in 억 as tenths (rounded half-up), e.g. `5235` = 523.5억
    pub trading_value_eok_tenths: u64,
}

impl RankedStock {
    fn from_row(row: MarketRow) -> Self {
        let trading_value_eok_tenths = krw_to_eok_tenths(row.trading_value);
        Self {
            row,
            trading_value_eok_tenths,
        }
    }
}

// ============================================================================
// Filter Funnel
// ============================================================================

/// Filtering stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterStage {
    /// Drop tickers outside the stock listing (ETF, ETN, ...)
    Universe,
    /// Drop tickers below the turnover threshold
    Liquidity,
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universe => write!(f, "universe"),
            Self::Liquidity => write!(f, "liquidity"),
        }
    }
}

/// Counts for one filtering stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterResult {
    pub stage: FilterStage,
    pub passed: usize,
    pub eliminated: usize,
}

// ============================================================================
// Screener Result
// ============================================================================

/// Result of a screening pass that found qualifying stocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerResult {
    /// Target date (`YYYYMMDD`)
    pub date: String,
    /// Rows fetched from the provider
    pub total_fetched: usize,
    /// Stocks that passed every filter, before truncation to `top_n`
    pub qualifying_count: usize,
    /// Top stocks, sorted by percentage change descending
    pub stocks: Vec<RankedStock>,
    pub filter_results: Vec<FilterResult>,
    /// Turnover threshold applied (KRW)
    pub min_trading_value: u64,
    pub top_n: usize,
}

/// Screening outcome.
#[derive(Debug, Clone)]
pub enum ScreenOutcome {
    /// Nothing met the turnover threshold
    NoQualifying { filter_results: Vec<FilterResult> },
    Ranked(ScreenerResult),
}

// ============================================================================
// Screener Engine
// ============================================================================

/// Universe filter, liquidity filter and ranking.
#[derive(Debug, Clone)]
pub struct ScreenerEngine {
    min_trading_value: u64,
    top_n: usize,
}

impl ScreenerEngine {
    pub fn new(min_trading_value: u64, top_n: usize) -> Self {
        Self {
            min_trading_value,
            top_n,
        }
    }

    pub fn from_config(config: &ScreenerConfig) -> Self {
        Self::new(config.min_trading_value, config.top_n)
    }

    pub fn min_trading_value(&self) -> u64 {
        self.min_trading_value
    }

    /// Run every stage over one day's rows.
    pub fn screen(&self, date: &str, rows: Vec<MarketRow>, universe: &TickerUniverse) -> ScreenOutcome {
        let total_fetched = rows.len();

        let stocks = filter_universe(rows, universe);
        let universe_stage = FilterResult {
            stage: FilterStage::Universe,
            passed: stocks.len(),
            eliminated: total_fetched - stocks.len(),
        };

        let before_liquidity = stocks.len();
        let liquid = self.filter_liquidity(stocks);
        let liquidity_stage = FilterResult {
            stage: FilterStage::Liquidity,
            passed: liquid.len(),
            eliminated: before_liquidity - liquid.len(),
        };

        let filter_results = vec![universe_stage, liquidity_stage];
        for fr in &filter_results {
            debug!(
                stage = %fr.stage,
                passed = fr.passed,
                eliminated = fr.eliminated,
                "Filter stage complete"
            );
        }

        if liquid.is_empty() {
            return ScreenOutcome::NoQualifying { filter_results };
        }

        let qualifying_count = liquid.len();
        let stocks = self.rank(liquid);

        ScreenOutcome::Ranked(ScreenerResult {
            date: date.to_string(),
            total_fetched,
            qualifying_count,
            stocks,
            filter_results,
            min_trading_value: self.min_trading_value,
            top_n: self.top_n,
        })
    }

    /// Keep rows whose turnover meets the threshold (inclusive).
    pub fn filter_liquidity(&self, rows: Vec<MarketRow>) -> Vec<MarketRow> {
        rows.into_iter()
            .filter(|r| r.trading_value >= self.min_trading_value)
            .collect()
    }

    /// Stable sort by percentage change descending and keep the first `top_n`.
    ///
    /// Ties keep provider order.
    pub fn rank(&self, mut rows: Vec<MarketRow>) -> Vec<RankedStock> {
        rows.sort_by(|a, b| {
            b.change_pct
                .partial_cmp(&a.change_pct)
                .unwrap_or(Ordering::Equal)
        });

        rows.into_iter()
            .take(self.top_n)
            .map(RankedStock::from_row)
            .collect()
    }
}

impl Default for ScreenerEngine {
    fn default() -> Self {
        Self::from_config(&ScreenerConfig::default())
    }
}

/// Keep rows whose ticker is in the universe.
pub fn filter_universe(rows: Vec<MarketRow>, universe: &TickerUniverse) -> Vec<MarketRow> {
    rows.into_iter()
        .filter(|r| universe.contains(&r.ticker))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EOK: u64 = 100_000_000;

    fn row(ticker: &str, change_pct: f64, trading_value: u64) -> MarketRow {
        MarketRow {
            ticker: ticker.into(),
            name: format!("종목{}", ticker),
            close: 10_000,
            change_pct,
            trading_value,
        }
    }

    fn universe_of(tickers: &[&str]) -> TickerUniverse {
        tickers.iter().map(|t| t.to_string()).collect()
    }

    fn ranked(outcome: ScreenOutcome) -> ScreenerResult {
        match outcome {
            ScreenOutcome::Ranked(result) => result,
            other => panic!("expected ranked outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_ranks_by_change_descending() {
        let engine = ScreenerEngine::default();
        let rows = vec![
            row("000001", 12.3, 600 * EOK),
            row("000002", 30.1, 700 * EOK),
            row("000003", 5.0, 800 * EOK),
        ];
        let universe = universe_of(&["000001", "000002", "000003"]);

        let result = ranked(engine.screen("20240105", rows, &universe));
        let changes: Vec<f64> = result.stocks.iter().map(|s| s.row.change_pct).collect();
        assert_eq!(changes, vec![30.1, 12.3, 5.0]);
        assert_eq!(result.qualifying_count, 3);
        assert_eq!(result.date, "20240105");
    }

    #[test]
    fn test_universe_filter_drops_funds() {
        let engine = ScreenerEngine::default();
        let rows = vec![
            row("069500", 9.0, 900 * EOK), // ETF
            row("005930", 2.0, 900 * EOK),
        ];
        let result = ranked(engine.screen("20240105", rows, &universe_of(&["005930"])));

        assert_eq!(result.stocks.len(), 1);
        assert_eq!(result.stocks[0].row.ticker, "005930");
        assert_eq!(
            result.filter_results[0],
            FilterResult {
                stage: FilterStage::Universe,
                passed: 1,
                eliminated: 1
            }
        );
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let engine = ScreenerEngine::new(500 * EOK, 10);
        let rows = vec![
            row("000001", 3.0, 500 * EOK),
            row("000002", 4.0, 500 * EOK - 1),
        ];
        let result = ranked(engine.screen("20240105", rows, &universe_of(&["000001", "000002"])));

        assert_eq!(result.qualifying_count, 1);
        assert_eq!(result.stocks[0].row.ticker, "000001");
    }

    #[test]
    fn test_no_qualifying() {
        let engine = ScreenerEngine::default();
        let rows = vec![row("000001", 29.9, 10 * EOK), row("000002", 15.0, 499 * EOK)];

        match engine.screen("20240105", rows, &universe_of(&["000001", "000002"])) {
            ScreenOutcome::NoQualifying { filter_results } => {
                assert_eq!(filter_results[1].passed, 0);
                assert_eq!(filter_results[1].eliminated, 2);
            }
            other => panic!("expected no qualifying, got {:?}", other),
        }
    }

    #[test]
    fn test_top_n_truncation_keeps_qualifying_count() {
        let engine = ScreenerEngine::default();
        let rows: Vec<MarketRow> = (0..15)
            .map(|i| row(&format!("{:06}", i), i as f64, 1_000 * EOK))
            .collect();
        let tickers: Vec<String> = rows.iter().map(|r| r.ticker.clone()).collect();
        let universe: TickerUniverse = tickers.into_iter().collect();

        let result = ranked(engine.screen("20240105", rows, &universe));
        assert_eq!(result.stocks.len(), 10);
        assert_eq!(result.qualifying_count, 15);
        assert_eq!(result.stocks[0].row.change_pct, 14.0);
    }

    #[test]
    fn test_ties_keep_provider_order() {
        let engine = ScreenerEngine::default();
        let rows = vec![
            row("000003", 7.5, 600 * EOK),
            row("000001", 7.5, 600 * EOK),
            row("000002", 9.0, 600 * EOK),
            row("000004", 7.5, 600 * EOK),
        ];
        let stocks = engine.rank(rows);
        let order: Vec<&str> = stocks.iter().map(|s| s.row.ticker.as_str()).collect();
        assert_eq!(order, vec!["000002", "000003", "000001", "000004"]);
    }

    #[test]
    fn test_derived_eok() {
        let engine = ScreenerEngine::default();
        let stocks = engine.rank(vec![row("000001", 1.0, 52_345_000_000)]);
        assert_eq!(stocks[0].trading_value_eok_tenths, 5235);
    }

    proptest! {
        #[test]
        fn prop_screen_invariants(
            entries in prop::collection::vec((0u8..40, -30.0f64..30.0, 0u64..2_000 * EOK), 0..60),
            top_n in 1usize..15,
        ) {
            let rows: Vec<MarketRow> = entries
                .iter()
                .map(|(t, c, v)| row(&format!("{:06}", t), *c, *v))
                .collect();
            // Even tickers are stocks, odd ones are funds
            let universe: TickerUniverse = (0u8..40)
                .filter(|t| t % 2 == 0)
                .map(|t| format!("{:06}", t))
                .collect();
            let engine = ScreenerEngine::new(500 * EOK, top_n);

            if let ScreenOutcome::Ranked(result) = engine.screen("20240105", rows, &universe) {
                prop_assert!(result.stocks.len() <= top_n);
                prop_assert!(result.stocks.len() <= result.qualifying_count);
                for stock in &result.stocks {
                    prop_assert!(universe.contains(&stock.row.ticker));
                    prop_assert!(stock.row.trading_value >= 500 * EOK);
                }
                for pair in result.stocks.windows(2) {
                    prop_assert!(pair[0].row.change_pct >= pair[1].row.change_pct);
                }
            }
        }
    }
}
