//! The `run` command: scrape every selected source once.
//!
//! Sources run sequentially against one shared seen set, which is saved once
//! at the end. A source that fails mid-run only loses its remaining pages;
//! the command still exits successfully so a scheduler does not retry a run
//! that already announced deals.

use std::time::Duration;

use dealwatch_core::AppConfig;
use dealwatch_scraper::{
    run_source, HttpFetcher, PageDelay, RunOptions, SeenStore, SourceProfile, SourceSummary,
    WebhookNotifier,
};

/// Command-line overrides for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RunRequest {
    pub source: Option<String>,
    pub max_pages: Option<u32>,
    pub search: Option<String>,
    pub dry_run: bool,
}

impl RunRequest {
    /// Search term from the command line, else from config. Blank disables search.
    fn search_term<'a>(&'a self, config: &'a AppConfig) -> Option<&'a str> {
        self.search
            .as_deref()
            .or(config.search_term.as_deref())
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    fn options(&self, config: &AppConfig) -> RunOptions {
        RunOptions {
            max_pages: self.max_pages.unwrap_or(config.max_pages),
            page_delay: PageDelay {
                min_ms: config.page_delay_min_ms,
                max_ms: config.page_delay_max_ms,
            },
            dry_run: self.dry_run,
        }
    }
}

/// Compiles the sources selected by `request` into scraping profiles.
///
/// # Errors
///
/// Returns an error if the sources file cannot be loaded, a selector does not
/// compile, or `--source` names no enabled source.
pub(crate) fn build_profiles(
    config: &AppConfig,
    request: &RunRequest,
) -> anyhow::Result<Vec<SourceProfile>> {
    let sources = dealwatch_core::load_sources(&config.sources_path)?;
    let selected = sources.selected(request.source.as_deref());
    if selected.is_empty() {
        match &request.source {
            Some(name) => anyhow::bail!(
                "no enabled source named '{name}' in {}",
                config.sources_path.display()
            ),
            None => anyhow::bail!("no enabled sources in {}", config.sources_path.display()),
        }
    }

    let search_term = request.search_term(config);
    selected
        .into_iter()
        .map(|source| SourceProfile::from_config(source, search_term).map_err(Into::into))
        .collect()
}

/// Runs the scrape and prints a per-source summary.
///
/// # Errors
///
/// Returns an error only for setup failures (sources file, HTTP client
/// construction). Scrape, delivery, and seen-set save failures are logged.
pub(crate) async fn run_scrape(config: &AppConfig, request: RunRequest) -> anyhow::Result<()> {
    let profiles = build_profiles(config, &request)?;
    let options = request.options(config);

    let fetcher = HttpFetcher::new(config.request_timeout_secs, &config.user_agent)?;
    let notifier = WebhookNotifier::new(
        config.webhook_url.clone(),
        config.request_timeout_secs,
        Duration::from_millis(config.notify_delay_ms),
        Duration::from_millis(config.rate_limit_buffer_ms),
    )?;
    if !config.delivery_enabled() && !options.dry_run {
        tracing::warn!("DISCORD_WEBHOOK_URL is not set; new deals will be logged but not sent");
    }

    let store = SeenStore::new(&config.seen_path);
    let mut seen = store.load();

    tracing::info!(
        sources = profiles.len(),
        max_pages = options.max_pages,
        search = request.search_term(config).unwrap_or(""),
        dry_run = options.dry_run,
        "starting run"
    );

    let mut total = SourceSummary {
        source: "total".to_owned(),
        ..SourceSummary::default()
    };
    for profile in &profiles {
        let summary = run_source(&fetcher, profile, &notifier, &mut seen, &options).await;
        println!("{summary}");
        total.absorb(&summary);
    }

    if options.dry_run {
        println!("dry-run: seen-deals file not updated");
    } else if let Err(e) = store.save(&seen) {
        tracing::error!(error = %e, "failed to save seen deals");
    }

    println!("{total}");
    Ok(())
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
