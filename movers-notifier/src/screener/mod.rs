//! Top movers screener.
//!
//! ```text
//! price changes ──▶ universe filter ──▶ liquidity filter ──▶ rank ──▶ report
//!                   (stocks only)       (turnover ≥ 500억)   (top N)
//! ```

pub mod engine;
pub mod report;

pub use engine::{
    FilterResult, FilterStage, RankedStock, ScreenOutcome, ScreenerEngine, ScreenerResult,
};
pub use report::{render, Report};
