//! Configuration validation.
//!
//! Runs once after all configuration layers are merged, so a bad value fails
//! the run before any network traffic. The webhook URL is the exception: its
//! shape is not checked here, and a bad one fails at delivery time, after the
//! report has been printed.

use thiserror::Error;

use crate::config::{Config, ObservabilityConfig, ProviderConfig, ScreenerConfig, WebhookConfig};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid URL for {field}: {reason}")]
    InvalidUrl { field: String, reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors: Vec<ValidationError> = [
            self.webhook.validate(),
            self.screener.validate(),
            self.provider.validate(),
            self.observability.validate(),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }
}

/// Require an absolute http(s) URL.
fn validate_http_url(field: &str, raw: &str) -> ValidationResult<()> {
    let parsed = url::Url::parse(raw).map_err(|e| ValidationError::InvalidUrl {
        field: field.into(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ValidationError::InvalidUrl {
            field: field.into(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

impl Validate for WebhookConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "webhook.timeout_secs".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(())
    }
}

impl Validate for ScreenerConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.top_n == 0 {
            return Err(ValidationError::InvalidValue {
                field: "screener.top_n".into(),
                reason: "must be at least 1".into(),
            });
        }

        if self.min_trading_value == 0 {
            return Err(ValidationError::InvalidValue {
                field: "screener.min_trading_value".into(),
                reason: "must be greater than 0".into(),
            });
        }

        Ok(())
    }
}

impl Validate for ProviderConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "provider.timeout_secs".into(),
                reason: "must be at least 1".into(),
            });
        }

        validate_http_url("provider.base_url", &self.base_url)
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            });
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.log_format.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            });
        }

        Ok(())
    }
}
