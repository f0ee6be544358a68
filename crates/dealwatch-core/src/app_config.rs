use std::path::PathBuf;

/// Runtime settings for a scrape-and-notify run, resolved once at startup.
///
/// Components never read the process environment themselves; the binary
/// builds this value and hands the relevant fields to each constructor.
#[derive(Clone)]
pub struct AppConfig {
    /// Discord-style webhook destination. `None` disables delivery.
    pub webhook_url: Option<String>,
    pub max_pages: u32,
    pub search_term: Option<String>,
    pub seen_path: PathBuf,
    pub sources_path: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub page_delay_min_ms: u64,
    pub page_delay_max_ms: u64,
    pub notify_delay_ms: u64,
    pub rate_limit_buffer_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Webhook URLs embed their auth token in the path.
        f.debug_struct("AppConfig")
            .field(
                "webhook_url",
                &self.webhook_url.as_ref().map(|_| "[redacted]"),
            )
            .field("max_pages", &self.max_pages)
            .field("search_term", &self.search_term)
            .field("seen_path", &self.seen_path)
            .field("sources_path", &self.sources_path)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("page_delay_min_ms", &self.page_delay_min_ms)
            .field("page_delay_max_ms", &self.page_delay_max_ms)
            .field("notify_delay_ms", &self.notify_delay_ms)
            .field("rate_limit_buffer_ms", &self.rate_limit_buffer_ms)
            .finish()
    }
}

impl AppConfig {
    /// Returns `true` when a webhook destination is configured.
    #[must_use]
    pub fn delivery_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }
}
