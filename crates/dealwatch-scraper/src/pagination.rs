//! Page-by-page traversal of a deal source.
//!
//! The driver is a small state machine:
//!
//! ```text
//! Fetching -> Extracting -> DecidingNext -> Fetching | Stopped
//! ```
//!
//! It yields one page of raw listings per [`PaginationDriver::next_page`] call,
//! so the caller finishes normalizing and notifying a page before the next
//! fetch starts. A fetch failure stops the source; pages already yielded stay
//! processed.

use std::fmt;
use std::time::Duration;

use scraper::ElementRef;

use crate::client::{resolve_url, PageFetcher};
use crate::extract::CandidateLocator;
use crate::normalize::RawListing;
use crate::profile::SourceProfile;

/// Attributes that may carry the next-page target, in preference order.
/// Load-more buttons commonly use `data-href` instead of `href`.
const NEXT_TARGET_ATTRIBUTES: [&str; 2] = ["href", "data-href"];

/// What the next-page locator found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextTarget {
    /// No next-page or load-more element on the page.
    Missing,
    /// An element was found but carries no usable target.
    NoTarget,
    /// Raw (possibly relative) target of the next page.
    Url(String),
}

/// Finds the next-page affordance under `root`.
#[must_use]
pub fn find_next_target(root: ElementRef<'_>, locator: &CandidateLocator) -> NextTarget {
    let mut affordance_seen = false;
    for selector in locator.selectors() {
        for node in root.select(selector) {
            affordance_seen = true;
            let target = NEXT_TARGET_ATTRIBUTES
                .iter()
                .filter_map(|attr| node.value().attr(attr))
                .map(str::trim)
                .find(|value| !value.is_empty() && *value != "#");
            if let Some(target) = target {
                return NextTarget::Url(target.to_owned());
            }
        }
    }
    if affordance_seen {
        NextTarget::NoTarget
    } else {
        NextTarget::Missing
    }
}

/// Position of the driver: the URL to fetch and its 1-based page number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    pub url: String,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    PageBudgetExhausted,
    NoListings,
    NoNextAffordance,
    AffordanceWithoutTarget,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::PageBudgetExhausted => "page budget exhausted",
            StopReason::NoListings => "page had no listings",
            StopReason::NoNextAffordance => "no next-page link",
            StopReason::AffordanceWithoutTarget => "next-page link has no usable target",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Continue(PageCursor),
    Stop(StopReason),
}

/// Decides whether to fetch another page after `cursor` was processed.
///
/// Checks run in order: page budget, empty page, missing affordance, missing
/// or unresolvable target. `max_pages` of 0 is treated as 1.
#[must_use]
pub fn decide_next(
    cursor: &PageCursor,
    max_pages: u32,
    fragment_count: usize,
    next: &NextTarget,
    base_origin: &str,
) -> Decision {
    if cursor.page >= max_pages.max(1) {
        return Decision::Stop(StopReason::PageBudgetExhausted);
    }
    if fragment_count == 0 {
        return Decision::Stop(StopReason::NoListings);
    }
    match next {
        NextTarget::Missing => Decision::Stop(StopReason::NoNextAffordance),
        NextTarget::NoTarget => Decision::Stop(StopReason::AffordanceWithoutTarget),
        NextTarget::Url(href) => match resolve_url(base_origin, href) {
            Ok(url) => Decision::Continue(PageCursor {
                url,
                page: cursor.page + 1,
            }),
            Err(e) => {
                tracing::debug!(href = %href, error = %e, "next-page target is not a usable URL");
                Decision::Stop(StopReason::AffordanceWithoutTarget)
            }
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Fetching,
    Extracting,
    DecidingNext,
    Stopped,
}

/// Random politeness delay applied between page fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDelay {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl PageDelay {
    #[must_use]
    pub fn none() -> Self {
        Self {
            min_ms: 0,
            max_ms: 0,
        }
    }

    #[must_use]
    pub fn sample(&self) -> Duration {
        let lo = self.min_ms.min(self.max_ms);
        let hi = self.min_ms.max(self.max_ms);
        if hi == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::random_range(lo..=hi))
    }

    pub async fn wait(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// One fetched page worth of raw listings.
#[derive(Debug)]
pub struct PageListings {
    pub page: u32,
    pub url: String,
    pub listings: Vec<RawListing>,
}

pub struct PaginationDriver<'a, F> {
    fetcher: &'a F,
    profile: &'a SourceProfile,
    max_pages: u32,
    delay: PageDelay,
    state: DriverState,
    cursor: Option<PageCursor>,
    stop_reason: Option<StopReason>,
}

impl<'a, F: PageFetcher> PaginationDriver<'a, F> {
    #[must_use]
    pub fn new(
        fetcher: &'a F,
        profile: &'a SourceProfile,
        max_pages: u32,
        delay: PageDelay,
    ) -> Self {
        Self {
            fetcher,
            profile,
            max_pages: max_pages.max(1),
            delay,
            state: DriverState::Fetching,
            cursor: Some(PageCursor {
                url: profile.entry_url.clone(),
                page: 1,
            }),
            stop_reason: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Why the driver stopped, if it stopped for a reason other than a fetch failure.
    #[must_use]
    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stop_reason.as_ref()
    }

    /// Fetches and extracts the next page.
    ///
    /// Returns `None` once the driver is [`DriverState::Stopped`], including
    /// when the fetch of the pending page fails.
    pub async fn next_page(&mut self) -> Option<PageListings> {
        if self.state == DriverState::Stopped {
            return None;
        }
        let Some(cursor) = self.cursor.take() else {
            self.state = DriverState::Stopped;
            return None;
        };

        if cursor.page > 1 {
            self.delay.wait().await;
        }

        self.state = DriverState::Fetching;
        let html = match self.fetcher.fetch(&cursor.url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(
                    source = %self.profile.name,
                    url = %cursor.url,
                    page = cursor.page,
                    error = %e,
                    "page fetch failed; stopping source"
                );
                self.state = DriverState::Stopped;
                return None;
            }
        };

        self.state = DriverState::Extracting;
        let parsed = self.profile.parse_page(&html);
        tracing::debug!(
            source = %self.profile.name,
            page = cursor.page,
            fragments = parsed.fragment_count,
            "extracted page"
        );

        self.state = DriverState::DecidingNext;
        match decide_next(
            &cursor,
            self.max_pages,
            parsed.fragment_count,
            &parsed.next,
            &self.profile.base_origin,
        ) {
            Decision::Continue(next) => {
                self.cursor = Some(next);
                self.state = DriverState::Fetching;
            }
            Decision::Stop(reason) => {
                tracing::debug!(
                    source = %self.profile.name,
                    page = cursor.page,
                    reason = %reason,
                    "pagination stopped"
                );
                self.stop_reason = Some(reason);
                self.state = DriverState::Stopped;
            }
        }

        Some(PageListings {
            page: cursor.page,
            url: cursor.url,
            listings: parsed.listings,
        })
    }
}

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;
