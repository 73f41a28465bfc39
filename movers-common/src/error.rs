//! Error types for the top-movers notifier.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type alias using the notifier error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the notifier.
///
/// Benign outcomes (market closed, nothing qualified, no webhook configured)
/// are not errors; every variant here aborts the run with a non-zero exit.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    /// Market data provider failed (network, HTTP status, malformed payload)
    #[error("Market data provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },

    /// Webhook delivery failed (network, timeout, non-2xx status)
    #[error("Webhook delivery failed: {0}")]
    Transport(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an error with additional context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this is a webhook delivery error.
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::WithContext { source, .. } => source.is_transport(),
            _ => false,
        }
    }

    /// Check if this is a market data provider error.
    pub fn is_provider(&self) -> bool {
        match self {
            Self::Provider { .. } => true,
            Self::WithContext { source, .. } => source.is_provider(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to any error type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert!(Error::Transport("HTTP 500".into()).is_transport());
        assert!(!Error::Transport("HTTP 500".into()).is_provider());

        let err = Error::Provider {
            provider: "krx".into(),
            message: "timeout".into(),
        };
        assert!(err.is_provider());
        assert!(err.to_string().contains("krx"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::Transport("HTTP 502".into());
        let with_ctx = err.with_context("sending chunk 2/3");
        assert!(matches!(with_ctx, Error::WithContext { .. }));
        assert!(with_ctx.is_transport());
        assert!(with_ctx.to_string().starts_with("sending chunk 2/3"));
    }

    #[test]
    fn test_result_ext_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = result.context("reading config").unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }
}
