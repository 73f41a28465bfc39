//! Movers Common - Shared configuration, errors, logging and formatting for the
//! top-movers notifier.
//!
//! This crate provides:
//! - Layered configuration (defaults, JSON file, environment) and validation
//! - The error taxonomy shared by every pipeline stage
//! - Logging setup
//! - Number and text formatting used by the report

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod util;
pub mod validation;

pub use config::{
    Config, Market, ObservabilityConfig, ProviderConfig, ScreenerConfig, WebhookConfig,
};
pub use error::{Error, Result, ResultExt};
pub use validation::{Validate, ValidationError, ValidationResult};
