//! Normalization from raw extracted fields to [`dealwatch_core::ListingRecord`].

use std::fmt;

use dealwatch_core::ListingRecord;
use thiserror::Error;

use crate::client::resolve_url;
use crate::extract::RawField;

/// Field values pulled from one listing fragment, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawListing {
    pub title: RawField,
    pub link: RawField,
    pub price: RawField,
    pub metric: RawField,
    pub image: RawField,
    pub discount: RawField,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// One or more of `title`, `link`, `price` was not located.
    MissingFields(Vec<&'static str>),
    /// The link was located but cannot be turned into an absolute http(s) URL.
    InvalidLink(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingFields(fields) => write!(f, "missing {}", fields.join(", ")),
            RejectReason::InvalidLink(reason) => write!(f, "invalid link: {reason}"),
        }
    }
}

/// A listing that could not become a [`ListingRecord`]. Carries the raw
/// fields so callers can log what was extracted.
#[derive(Debug, Clone, Error)]
#[error("listing rejected: {reason}")]
pub struct Rejected {
    pub reason: RejectReason,
    pub raw: RawListing,
}

/// Normalizes a [`RawListing`] into a [`ListingRecord`].
///
/// Relative links and image URLs are resolved against `base_origin`. Optional
/// fields that were not located become `None`; an image URL that cannot be
/// resolved is dropped rather than rejecting the listing.
///
/// # Errors
///
/// Returns [`Rejected`] if `title`, `link`, or `price` is
/// [`RawField::Unavailable`], or if the link cannot be resolved.
pub fn normalize(raw: RawListing, base_origin: &str) -> Result<ListingRecord, Rejected> {
    let missing: Vec<&'static str> = [
        ("title", &raw.title),
        ("link", &raw.link),
        ("price", &raw.price),
    ]
    .into_iter()
    .filter(|(_, field)| !field.is_available())
    .map(|(name, _)| name)
    .collect();

    if !missing.is_empty() {
        return Err(Rejected {
            reason: RejectReason::MissingFields(missing),
            raw,
        });
    }

    let link = match resolve_url(base_origin, raw.link.as_deref().unwrap_or_default()) {
        Ok(link) => link,
        Err(e) => {
            return Err(Rejected {
                reason: RejectReason::InvalidLink(e.to_string()),
                raw,
            })
        }
    };

    let image_url = raw
        .image
        .as_deref()
        .filter(|src| !src.is_empty())
        .and_then(|src| match resolve_url(base_origin, src) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!(src, error = %e, "dropping unresolvable image URL");
                None
            }
        });

    Ok(ListingRecord {
        title: raw.title.into_option().unwrap_or_default(),
        link,
        price: raw.price.into_option().unwrap_or_default(),
        metric_label: raw.metric.into_option(),
        image_url,
        discount_label: raw.discount.into_option(),
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
