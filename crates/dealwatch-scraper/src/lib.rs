pub mod client;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod notify;
pub mod pagination;
pub mod pipeline;
pub mod profile;
pub(crate) mod rate_limit;
pub mod seen;

pub use client::{extract_origin, resolve_url, HttpFetcher, PageFetcher};
pub use error::ScraperError;
pub use extract::{CandidateLocator, RawField};
pub use normalize::{normalize, RawListing, RejectReason, Rejected};
pub use notify::{DeliveryResult, WebhookMessage, WebhookNotifier};
pub use pagination::{DriverState, PageDelay, PageListings, PaginationDriver, StopReason};
pub use pipeline::{run_source, RunOptions, SourceSummary};
pub use profile::{SourceBranding, SourceProfile};
pub use seen::{SeenSet, SeenStore};
