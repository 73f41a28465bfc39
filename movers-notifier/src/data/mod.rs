//! Market data module for KRX equities.
//!
//! Provides the daily price-change table and the ticker universe used to
//! exclude fund-like instruments. ETFs and ETNs trade on their own boards and
//! never appear in the stock listing, so every listed ticker is a stock.
//!
//! # Data Sources
//! - **KRX data portal** (`data.krx.co.kr`): public JSON endpoints, no API key

mod krx;
mod provider;

pub use krx::KrxProvider;
pub use provider::{MarketDataProvider, ProviderError};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// Core Data Types
// ============================================================================

/// One ticker's record for the target date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRow {
    /// Six-character KRX short code (e.g., "005930")
    pub ticker: String,
    /// Display name (e.g., "삼성전자")
    pub name: String,
    /// Closing price in KRW
    pub close: u64,
    /// Percentage change versus the previous close
    pub change_pct: f64,
    /// Daily turnover value (거래대금) in KRW
    pub trading_value: u64,
}

/// One entry of the provider's instrument listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub ticker: String,
    pub name: String,
    /// Market segment label (KOSPI, KOSDAQ, KONEX)
    pub market: String,
    /// Provider security-group label (주권, 부동산투자회사, ...), informational only
    pub group: String,
}

/// Tickers on the provider's stock listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerUniverse {
    tickers: HashSet<String>,
}

impl TickerUniverse {
    /// Every ticker of a listing. Classification is the provider's job.
    pub fn from_listings(listings: &[Listing]) -> Self {
        listings.iter().map(|l| l.ticker.clone()).collect()
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.tickers.contains(ticker)
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

impl FromIterator<String> for TickerUniverse {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            tickers: iter.into_iter().collect(),
        }
    }
}

/// Fetch the stock listing as a ticker universe.
pub async fn fetch_stock_tickers(
    provider: &dyn MarketDataProvider,
) -> Result<TickerUniverse, ProviderError> {
    let listings = provider.fetch_listings().await?;
    let universe = TickerUniverse::from_listings(&listings);

    tracing::debug!(
        provider = provider.name(),
        listed = listings.len(),
        tickers = universe.len(),
        "Ticker universe loaded"
    );

    Ok(universe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn listing(ticker: &str, group: &str) -> Listing {
        Listing {
            ticker: ticker.into(),
            name: format!("name-{}", ticker),
            market: "KOSPI".into(),
            group: group.into(),
        }
    }

    struct StaticListings(Vec<Listing>);

    #[async_trait]
    impl MarketDataProvider for StaticListings {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn fetch_price_changes(&self, _date: &str) -> Result<Vec<MarketRow>, ProviderError> {
            Ok(Vec::new())
        }

        async fn fetch_listings(&self) -> Result<Vec<Listing>, ProviderError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_universe_keeps_every_listed_group() {
        let universe = TickerUniverse::from_listings(&[
            listing("005930", "주권"),
            listing("900110", "외국주권"),
            listing("330590", "부동산투자회사"),
        ]);

        assert_eq!(universe.len(), 3);
        assert!(universe.contains("005930"));
        assert!(universe.contains("900110"));
        assert!(universe.contains("330590"));
        // ETFs are never on the stock listing
        assert!(!universe.contains("069500"));
    }

    #[test]
    fn test_fetch_stock_tickers() {
        let provider = StaticListings(vec![
            listing("000660", "주권"),
            listing("088980", "인프라투융자회사"),
        ]);

        let universe = tokio_test::block_on(fetch_stock_tickers(&provider)).unwrap();
        assert_eq!(universe.len(), 2);
        assert!(universe.contains("000660"));
        assert!(universe.contains("088980"));
    }
}
