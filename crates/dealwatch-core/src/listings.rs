use serde::{Deserialize, Serialize};

/// A deal listing scraped from a source page, normalized for deduplication
/// and notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub title: String,
    /// Absolute URL of the deal page. Doubles as the deduplication key.
    pub link: String,
    /// Price text exactly as the site renders it, e.g. `"£9.99"` or `"FREE"`.
    pub price: String,
    /// Popularity annotation, e.g. `"🔥 412° Heat"` or `"👍 18 Likes"`.
    pub metric_label: Option<String>,
    /// Absolute thumbnail URL.
    pub image_url: Option<String>,
    pub discount_label: Option<String>,
}

impl ListingRecord {
    /// Returns the thumbnail URL when one was found and is non-empty.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|u| !u.is_empty())
    }

    /// Returns the discount annotation when present and non-empty.
    #[must_use]
    pub fn discount(&self) -> Option<&str> {
        self.discount_label.as_deref().filter(|d| !d.is_empty())
    }

    /// Returns the popularity annotation when present and non-empty.
    #[must_use]
    pub fn metric(&self) -> Option<&str> {
        self.metric_label.as_deref().filter(|m| !m.is_empty())
    }
}
