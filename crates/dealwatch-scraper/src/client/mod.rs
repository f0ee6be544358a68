//! Page fetching for deal listing pages.
//!
//! The pagination driver only depends on [`PageFetcher`]; [`HttpFetcher`] is
//! the plain-HTTP implementation. A headless-browser fetcher for
//! JavaScript-rendered sites would implement the same trait.

mod origin;

use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::rate_limit::retry_after_from_response;

pub use origin::{extract_origin, resolve_url};
pub(crate) use origin::{check_http_url, extract_domain};

/// Source of rendered page HTML.
pub trait PageFetcher {
    /// Fetches the HTML for `url`.
    ///
    /// Any error is terminal for the current pagination run; implementations
    /// should not retry internally.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, ScraperError>> + Send;
}

/// HTTP client for deal listing pages, sending browser-like request headers.
///
/// Handles rate limiting (429), not-found (404), other non-2xx responses, and
/// bot-challenge interstitials as typed errors. No retries: a failed page ends
/// pagination for that source.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates an `HttpFetcher` with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches one listing page and returns its body.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429.
    /// - [`ScraperError::NotFound`]: HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::BotChallenge`]: 2xx body is a challenge interstitial.
    /// - [`ScraperError::Http`]: network, timeout, or TLS failure.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let referer = extract_origin(url);
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-GB,en-US;q=0.9,en;q=0.8")
            .header(reqwest::header::REFERER, &referer)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after_from_response(
                response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok()),
                "",
            );
            return Err(ScraperError::RateLimited {
                domain: extract_domain(url),
                retry_after,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        if looks_like_bot_challenge(&body) {
            return Err(ScraperError::BotChallenge {
                url: url.to_owned(),
            });
        }

        Ok(body)
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        self.fetch_html(url).await
    }
}

fn looks_like_bot_challenge(body: &str) -> bool {
    let lowered = body.to_ascii_lowercase();
    let has_cloudflare_banner = lowered.contains("attention required! | cloudflare");
    let has_challenge_platform = lowered.contains("/cdn-cgi/challenge-platform/");
    let has_just_a_moment = lowered.contains("just a moment...");
    let has_cookie_gate = lowered.contains("please enable cookies");
    let has_cf_chl = lowered.contains("cf-chl-");

    has_cloudflare_banner
        || has_challenge_platform
        || (has_just_a_moment && has_cookie_gate)
        || (has_just_a_moment && has_cf_chl)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
