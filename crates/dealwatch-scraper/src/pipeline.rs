//! Per-source scrape run: paginate, normalize, dedupe, notify.

use std::collections::HashSet;
use std::fmt;

use crate::client::PageFetcher;
use crate::normalize::normalize;
use crate::notify::{DeliveryResult, WebhookNotifier};
use crate::pagination::{PageDelay, PaginationDriver};
use crate::profile::SourceProfile;
use crate::seen::SeenSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub max_pages: u32,
    pub page_delay: PageDelay,
    /// Extract and dedupe, but send nothing and leave the seen set untouched.
    pub dry_run: bool,
}

/// Counters for one source run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSummary {
    pub source: String,
    pub pages: u32,
    /// Raw listing fragments extracted across all pages.
    pub listings: usize,
    pub rejected: usize,
    pub already_seen: usize,
    pub notified: usize,
    pub failed: usize,
    /// New listings not sent because no webhook is configured (or dry run).
    pub disabled: usize,
}

impl SourceSummary {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_owned(),
            ..Self::default()
        }
    }

    /// Adds `other`'s counters into `self`, keeping `self.source`.
    pub fn absorb(&mut self, other: &SourceSummary) {
        self.pages += other.pages;
        self.listings += other.listings;
        self.rejected += other.rejected;
        self.already_seen += other.already_seen;
        self.notified += other.notified;
        self.failed += other.failed;
        self.disabled += other.disabled;
    }
}

impl fmt::Display for SourceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} page(s), {} listing(s), {} rejected, {} already seen, {} notified, {} failed, {} not sent",
            self.source,
            self.pages,
            self.listings,
            self.rejected,
            self.already_seen,
            self.notified,
            self.failed,
            self.disabled
        )
    }
}

/// Runs one source to completion.
///
/// Each page is fully processed before the next is fetched. A link enters
/// `seen` only after the webhook accepted it, so failed deliveries are retried
/// on the next run. Within one run a link is handled at most once whatever the
/// delivery outcome; repeats count as already seen.
pub async fn run_source<F: PageFetcher>(
    fetcher: &F,
    profile: &SourceProfile,
    notifier: &WebhookNotifier,
    seen: &mut SeenSet,
    options: &RunOptions,
) -> SourceSummary {
    let mut summary = SourceSummary::new(&profile.name);
    let mut driver = PaginationDriver::new(fetcher, profile, options.max_pages, options.page_delay);
    let mut handled: HashSet<String> = HashSet::new();

    while let Some(page) = driver.next_page().await {
        summary.pages += 1;
        summary.listings += page.listings.len();

        for raw in page.listings {
            let record = match normalize(raw, &profile.base_origin) {
                Ok(record) => record,
                Err(rejected) => {
                    tracing::debug!(
                        source = %profile.name,
                        page = page.page,
                        reason = %rejected.reason,
                        title = %rejected.raw.title,
                        link = %rejected.raw.link,
                        price = %rejected.raw.price,
                        "skipping listing"
                    );
                    summary.rejected += 1;
                    continue;
                }
            };

            if seen.contains(&record.link) || !handled.insert(record.link.clone()) {
                summary.already_seen += 1;
                continue;
            }

            if options.dry_run {
                tracing::info!(
                    source = %profile.name,
                    title = %record.title,
                    link = %record.link,
                    price = %record.price,
                    "new deal (dry run)"
                );
                summary.disabled += 1;
                continue;
            }

            match notifier.notify(&record, &profile.branding).await {
                DeliveryResult::Delivered { attempts } => {
                    tracing::info!(
                        source = %profile.name,
                        title = %record.title,
                        attempts,
                        "announced new deal"
                    );
                    seen.insert(record.link);
                    summary.notified += 1;
                }
                DeliveryResult::Disabled => {
                    tracing::info!(
                        source = %profile.name,
                        title = %record.title,
                        link = %record.link,
                        "new deal (webhook not configured)"
                    );
                    summary.disabled += 1;
                }
                DeliveryResult::Failed { .. } => summary.failed += 1,
            }
        }
    }

    tracing::info!(
        source = %summary.source,
        pages = summary.pages,
        listings = summary.listings,
        notified = summary.notified,
        failed = summary.failed,
        "source finished"
    );
    summary
}
