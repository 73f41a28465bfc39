//! Data provider abstraction for daily market data.
//!
//! Defines the `MarketDataProvider` trait the pipeline fetches through, so the
//! KRX adapter can be swapped for a stub in tests.

use async_trait::async_trait;
use std::fmt;

use super::{Listing, MarketRow};

// ============================================================================
// Provider Error
// ============================================================================

/// Errors specific to data providers.
///
/// Every variant is fatal to the run; there is no retry.
#[derive(Debug, Clone)]
pub enum ProviderError {
    /// Network error (connection failed, timeout)
    Network(String),
    /// Non-success HTTP status
    Http { status: u16, body: String },
    /// Payload could not be decoded
    Parse(String),
    /// Provider refused the request or is down
    Unavailable(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Http { status, body } => {
                write!(f, "HTTP {}", status)?;
                if !body.is_empty() {
                    write!(f, ": {}", body)?;
                }
                Ok(())
            }
            Self::Parse(msg) => write!(f, "Failed to parse response: {}", msg),
            Self::Unavailable(msg) => write!(f, "Provider unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

impl ProviderError {
    /// Attach the provider name and lift into the shared error type.
    pub fn into_error(self, provider: &str) -> movers_common::Error {
        movers_common::Error::Provider {
            provider: provider.to_string(),
            message: self.to_string(),
        }
    }
}

// ============================================================================
// Data Provider Trait
// ============================================================================

/// Trait for daily market data providers.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Get the provider name (e.g., "krx")
    fn name(&self) -> &'static str;

    /// Fetch the single-day price-change table for `date` (`YYYYMMDD`).
    ///
    /// The query uses `date` as both start and end of the range. An empty
    /// vector means the market was closed that day; it is not an error.
    async fn fetch_price_changes(&self, date: &str) -> Result<Vec<MarketRow>, ProviderError>;

    /// Fetch every tradable instrument listing with its classification.
    async fn fetch_listings(&self) -> Result<Vec<Listing>, ProviderError>;
}
