//! Webhook notifier with bounded retry.

use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::config::Config;
use crate::error::NotifyError;
use crate::retry::RetryPolicy;

/// Discord-compatible webhook payload: one text message per call.
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Posts rendered alert messages to the configured webhook.
#[derive(Debug, Clone)]
pub struct Notifier {
    /// HTTP client for webhook posts.
    http: reqwest::Client,
    /// Webhook endpoint.
    webhook_url: String,
    /// Retry policy for delivery.
    retry: RetryPolicy,
    /// Log instead of posting.
    dry_run: bool,
}

impl Notifier {
    /// Create a notifier from config.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.http_timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            webhook_url: config.discord_webhook_url.clone(),
            retry: RetryPolicy::from_config(config),
            dry_run: config.dry_run,
        }
    }

    /// Deliver one message. Exhausted retries are logged and swallowed; a
    /// failed notification never aborts the run or blocks persistence.
    #[instrument(skip(self, message))]
    pub async fn notify(&self, message: &str) {
        if self.dry_run {
            info!("[dry-run] would notify:\n{message}");
            return;
        }

        match self.retry.run("webhook post", || self.post_once(message)).await {
            Ok(()) => debug!("notification delivered"),
            Err(e) => error!("notification dropped after retries: {e}"),
        }
    }

    async fn post_once(&self, message: &str) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(&self.webhook_url)
            .json(&WebhookPayload { content: message })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(NotifyError::BadStatus { status, body })
        }
    }
}
