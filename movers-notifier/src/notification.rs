//! Notification module for posting reports to a Discord webhook.
//!
//! Delivery is strictly sequential and all-or-nothing per chunk: the first
//! failed request aborts the remaining chunks and is returned as an error.

pub mod format;

use serde::Serialize;
use std::time::Duration;

use movers_common::util::truncate_with_ellipsis;
use movers_common::{Config, Error, Result};

use crate::screener::Report;

use self::format::{split_lines, MAX_MESSAGE_LENGTH};

/// Webhook request body
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Client for a single Discord webhook.
pub struct WebhookNotifier {
    webhook_url: String,
    max_message_length: usize,
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// Create a notifier with a per-request timeout.
    pub fn new(webhook_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            webhook_url: webhook_url.into(),
            max_message_length: MAX_MESSAGE_LENGTH,
            client,
        })
    }

    /// Create from config. `None` when no webhook URL is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        config
            .webhook_url()
            .map(|url| Self::new(url, Duration::from_secs(config.webhook.timeout_secs)))
            .transpose()
    }

    /// Override the per-message character limit.
    pub fn with_max_message_length(mut self, max_message_length: usize) -> Self {
        self.max_message_length = max_message_length;
        self
    }

    /// Scheme and host of the webhook, safe to log (the path carries the token).
    pub fn endpoint_label(&self) -> String {
        match reqwest::Url::parse(&self.webhook_url) {
            Ok(url) => format!("{}://{}", url.scheme(), url.host_str().unwrap_or("?")),
            Err(_) => "<invalid url>".to_string(),
        }
    }

    /// Post one message. Any non-2xx status is an error.
    pub async fn send_message(&self, content: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&WebhookPayload { content })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Transport(format!("request timed out: {}", e))
                } else {
                    Error::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "HTTP {}: {}",
                status,
                truncate_with_ellipsis(&error_text, 200)
            )));
        }

        Ok(())
    }

    /// Split the report and send every chunk in order.
    ///
    /// Returns the number of chunks sent. Stops at the first failure.
    pub async fn deliver(&self, report: &Report) -> Result<usize> {
        let chunks = split_lines(report.lines(), self.max_message_length);
        let total = chunks.len();

        tracing::debug!(
            endpoint = %self.endpoint_label(),
            chars = report.char_len(),
            chunks = total,
            "Delivering report"
        );

        for (i, chunk) in chunks.iter().enumerate() {
            self.send_message(chunk)
                .await
                .map_err(|e| e.with_context(format!("sending chunk {}/{}", i + 1, total)))?;

            tracing::info!(chunk = i + 1, total, "Webhook message sent");
        }

        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_without_url() {
        let config = Config::default();
        assert!(WebhookNotifier::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_from_config_with_url() {
        let mut config = Config::default();
        config.webhook.url = Some("https://discord.com/api/webhooks/123/secret-token".into());

        let notifier = WebhookNotifier::from_config(&config).unwrap().unwrap();
        assert_eq!(notifier.endpoint_label(), "https://discord.com");
        assert_eq!(notifier.max_message_length, MAX_MESSAGE_LENGTH);
    }

    #[test]
    fn test_payload_shape() {
        let body = serde_json::to_value(WebhookPayload { content: "hello" }).unwrap();
        assert_eq!(body, serde_json::json!({ "content": "hello" }));
    }
}
