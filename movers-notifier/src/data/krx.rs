//! KRX adapter for Korean equity market data.
//!
//! Queries the public JSON endpoints behind the KRX data portal
//! (`data.krx.co.kr`). Every report is a form POST to a single endpoint,
//! selected by its `bld` identifier.
//!
//! # Reports
//! - `MDCSTAT01602`: price change over a period (전종목 등락률)
//! - `MDCSTAT01901`: basic info for every listed issue (전종목 기본정보)
//!
//! Numbers arrive as strings with thousands separators; `-` and empty
//! strings stand for zero.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use movers_common::util::truncate_with_ellipsis;
use movers_common::{Config, Market};

use super::provider::{MarketDataProvider, ProviderError};
use super::{Listing, MarketRow};

// ============================================================================
// Constants
// ============================================================================

const JSON_ENDPOINT_PATH: &str = "/comm/bldAttendant/getJsonData.cmd";

const PRICE_CHANGE_BLD: &str = "dbms/MDC/STAT/standard/MDCSTAT01602";

const LISTING_BLD: &str = "dbms/MDC/STAT/standard/MDCSTAT01901";

const REFERER: &str = "http://data.krx.co.kr/contents/MDC/MDI/mdiLoader";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// KRX `mktId` parameter for a market segment.
fn market_id(market: Market) -> &'static str {
    match market {
        Market::All => "ALL",
        Market::Kospi => "STK",
        Market::Kosdaq => "KSQ",
        Market::Konex => "KNX",
    }
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct KrxResponse<T> {
    #[serde(rename = "OutBlock_1")]
    out_block: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct PriceChangeRecord {
    #[serde(rename = "ISU_SRT_CD")]
    ticker: String,
    #[serde(rename = "ISU_ABBRV")]
    name: String,
    #[serde(rename = "TDD_CLSPRC", default)]
    close: String,
    #[serde(rename = "FLUC_RT", default)]
    change_pct: String,
    #[serde(rename = "ACC_TRDVAL", default)]
    trading_value: String,
}

#[derive(Debug, Deserialize)]
struct ListingRecord {
    #[serde(rename = "ISU_SRT_CD")]
    ticker: String,
    #[serde(rename = "ISU_ABBRV")]
    name: String,
    #[serde(rename = "MKT_TP_NM", default)]
    market: String,
    #[serde(rename = "SECUGRP_NM", default)]
    group: String,
}

impl PriceChangeRecord {
    fn into_row(self) -> Result<MarketRow, ProviderError> {
        Ok(MarketRow {
            close: parse_krx_u64("TDD_CLSPRC", &self.close)?,
            change_pct: parse_krx_f64("FLUC_RT", &self.change_pct)?,
            trading_value: parse_krx_u64("ACC_TRDVAL", &self.trading_value)?,
            ticker: self.ticker.trim().to_string(),
            name: self.name.trim().to_string(),
        })
    }
}

impl From<ListingRecord> for Listing {
    fn from(record: ListingRecord) -> Self {
        Self {
            ticker: record.ticker.trim().to_string(),
            name: record.name.trim().to_string(),
            market: record.market.trim().to_string(),
            group: record.group.trim().to_string(),
        }
    }
}

// ============================================================================
// Number Parsing
// ============================================================================

/// Strip separators; `None` when the field means zero.
fn normalize_number(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    Some(trimmed.replace(',', ""))
}

fn parse_krx_u64(field: &str, raw: &str) -> Result<u64, ProviderError> {
    match normalize_number(raw) {
        None => Ok(0),
        Some(digits) => digits
            .parse()
            .map_err(|_| ProviderError::Parse(format!("{} is not an integer: {:?}", field, raw))),
    }
}

fn parse_krx_f64(field: &str, raw: &str) -> Result<f64, ProviderError> {
    match normalize_number(raw) {
        None => Ok(0.0),
        Some(digits) => match digits.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ProviderError::Parse(format!(
                "{} is not a number: {:?}",
                field, raw
            ))),
        },
    }
}

// ============================================================================
// KRX Provider
// ============================================================================

/// KRX data portal adapter.
pub struct KrxProvider {
    client: reqwest::Client,
    endpoint: String,
    market: Market,
}

impl KrxProvider {
    /// Create an adapter against `base_url` (scheme + host, no path).
    pub fn new(base_url: &str, market: Market, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), JSON_ENDPOINT_PATH),
            market,
        })
    }

    /// Create from config.
    pub fn from_config(config: &Config) -> movers_common::Result<Self> {
        Self::new(
            &config.provider.base_url,
            config.screener.market,
            Duration::from_secs(config.provider.timeout_secs),
        )
        .map_err(|e| e.into_error("krx"))
    }

    /// POST one report query and return its `OutBlock_1` rows.
    async fn query<T: DeserializeOwned>(
        &self,
        bld: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, ProviderError> {
        let mut form: Vec<(&str, &str)> = vec![("bld", bld), ("locale", "ko_KR")];
        form.extend_from_slice(params);

        debug!(endpoint = %self.endpoint, bld = bld, "Querying KRX");

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::REFERER, REFERER)
            .form(&form)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body: truncate_with_ellipsis(&body, 200),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let parsed: KrxResponse<T> = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Parse(format!("{} ({})", e, bld)))?;

        parsed
            .out_block
            .ok_or_else(|| ProviderError::Parse(format!("missing OutBlock_1 ({})", bld)))
    }
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for KrxProvider {
    fn name(&self) -> &'static str {
        "krx"
    }

    async fn fetch_price_changes(&self, date: &str) -> Result<Vec<MarketRow>, ProviderError> {
        let records: Vec<PriceChangeRecord> = self
            .query(
                PRICE_CHANGE_BLD,
                &[
                    ("mktId", market_id(self.market)),
                    ("strtDd", date),
                    ("endDd", date),
                    ("adjStkPrc_check", "Y"),
                    ("adjStkPrc", "2"),
                ],
            )
            .await?;

        let rows = records
            .into_iter()
            .map(PriceChangeRecord::into_row)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(date = date, market = %self.market, rows = rows.len(), "Price changes fetched");
        Ok(rows)
    }

    async fn fetch_listings(&self) -> Result<Vec<Listing>, ProviderError> {
        let records: Vec<ListingRecord> = self
            .query(LISTING_BLD, &[("mktId", "ALL"), ("share", "1")])
            .await?;

        Ok(records.into_iter().map(Listing::from).collect())
    }
}
