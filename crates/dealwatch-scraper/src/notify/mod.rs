//! Discord webhook delivery.
//!
//! One POST per listing. A 429 is retried exactly once after the server's
//! requested wait plus a buffer; every other failure is reported as
//! [`DeliveryResult::Failed`] without retrying. After each call that reached
//! the network the notifier sleeps for a fixed inter-call delay so a burst of
//! new deals does not trip the webhook's rate limit.

mod payload;

use std::time::Duration;

use dealwatch_core::ListingRecord;
use reqwest::Client;

use crate::client::extract_domain;
use crate::error::ScraperError;
use crate::profile::SourceBranding;
use crate::rate_limit::{retry_after_from_response, retry_on_rate_limit};

pub use payload::{Embed, EmbedField, EmbedThumbnail, WebhookMessage};

/// Retries allowed after a 429.
const RATE_LIMIT_RETRIES: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    Delivered { attempts: u32 },
    /// No webhook URL is configured; nothing was sent.
    Disabled,
    Failed { attempts: u32, error: String },
}

impl DeliveryResult {
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryResult::Delivered { .. })
    }
}

pub struct WebhookNotifier {
    client: Client,
    webhook_url: Option<String>,
    inter_call_delay: Duration,
    rate_limit_buffer: Duration,
}

impl std::fmt::Debug for WebhookNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookNotifier")
            .field("webhook_url", &self.webhook_url.as_ref().map(|_| "[redacted]"))
            .field("inter_call_delay", &self.inter_call_delay)
            .field("rate_limit_buffer", &self.rate_limit_buffer)
            .finish_non_exhaustive()
    }
}

impl WebhookNotifier {
    /// Creates a notifier. `webhook_url` of `None` yields a disabled notifier
    /// whose [`notify`](Self::notify) never touches the network.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn new(
        webhook_url: Option<String>,
        timeout_secs: u64,
        inter_call_delay: Duration,
        rate_limit_buffer: Duration,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            webhook_url: webhook_url.filter(|url| !url.trim().is_empty()),
            inter_call_delay,
            rate_limit_buffer,
        })
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Announces `record` to the webhook under `branding`.
    pub async fn notify(&self, record: &ListingRecord, branding: &SourceBranding) -> DeliveryResult {
        let Some(url) = self.webhook_url.as_deref() else {
            return DeliveryResult::Disabled;
        };

        let message = WebhookMessage::for_listing(record, branding);
        let mut attempts = 0u32;
        let result = retry_on_rate_limit(RATE_LIMIT_RETRIES, self.rate_limit_buffer, || {
            attempts += 1;
            self.post(url, &message)
        })
        .await;

        if !self.inter_call_delay.is_zero() {
            tokio::time::sleep(self.inter_call_delay).await;
        }

        match result {
            Ok(()) => DeliveryResult::Delivered { attempts },
            Err(e) => {
                tracing::warn!(
                    source = %branding.label,
                    link = %record.link,
                    attempts,
                    error = %e,
                    "webhook delivery failed"
                );
                DeliveryResult::Failed {
                    attempts,
                    error: e.to_string(),
                }
            }
        }
    }

    async fn post(&self, url: &str, message: &WebhookMessage) -> Result<(), ScraperError> {
        let response = self
            .client
            .post(url)
            .json(message)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let header = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let body = response.text().await.unwrap_or_default();
            return Err(ScraperError::RateLimited {
                domain: extract_domain(url),
                retry_after: retry_after_from_response(header.as_deref(), &body),
            });
        }

        if !status.is_success() {
            // The webhook URL embeds its token; report the host only.
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: extract_domain(url),
            });
        }

        Ok(())
    }
}
