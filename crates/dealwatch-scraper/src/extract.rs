//! Field extraction with ordered fallback selectors.
//!
//! Deal sites rename their CSS classes often, so every logical field is
//! described by a [`CandidateLocator`]: a list of selectors tried in order.
//! The first selector that matches wins and the remaining ones are never
//! evaluated. A miss is not an error; it yields [`RawField::Unavailable`] and
//! the normalizer decides whether the listing is still usable.

use std::fmt;

use scraper::{ElementRef, Html, Selector};

use crate::error::ScraperError;

/// A value located in a listing fragment, or the explicit "not found" marker.
///
/// `Found("")` is a found-but-empty value and is distinct from `Unavailable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawField {
    Found(String),
    Unavailable,
}

impl RawField {
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, RawField::Found(_))
    }

    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            RawField::Found(value) => Some(value.as_str()),
            RawField::Unavailable => None,
        }
    }

    #[must_use]
    pub fn into_option(self) -> Option<String> {
        match self {
            RawField::Found(value) => Some(value),
            RawField::Unavailable => None,
        }
    }
}

impl fmt::Display for RawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawField::Found(value) => f.write_str(value),
            RawField::Unavailable => f.write_str("unavailable"),
        }
    }
}

/// Ordered selector strategies for one logical field.
#[derive(Debug, Clone, Default)]
pub struct CandidateLocator {
    candidates: Vec<(String, Selector)>,
}

impl CandidateLocator {
    /// Compiles `selectors` in order. Blank entries are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] for the first selector that
    /// does not parse as CSS.
    pub fn parse<I, S>(
        source_name: &str,
        field: &'static str,
        selectors: I,
    ) -> Result<Self, ScraperError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut candidates = Vec::new();
        for raw in selectors {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            let selector = Selector::parse(raw).map_err(|e| ScraperError::InvalidSelector {
                source_name: source_name.to_owned(),
                field,
                selector: raw.to_owned(),
                reason: e.to_string(),
            })?;
            candidates.push((raw.to_owned(), selector));
        }
        Ok(Self { candidates })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub(crate) fn selectors(&self) -> impl Iterator<Item = &Selector> {
        self.candidates.iter().map(|(_, selector)| selector)
    }
}

/// Locates one field inside `fragment`.
///
/// Candidates are evaluated in order. Without `attribute`, the first candidate
/// selecting any node wins and its trimmed text content is returned. With
/// `attribute`, the first candidate selecting a node that carries the
/// attribute wins and the trimmed attribute value is returned.
#[must_use]
pub fn extract(
    fragment: ElementRef<'_>,
    candidates: &CandidateLocator,
    attribute: Option<&str>,
) -> RawField {
    for selector in candidates.selectors() {
        let found = match attribute {
            Some(attr) => fragment
                .select(selector)
                .find_map(|node| node.value().attr(attr))
                .map(|value| value.trim().to_owned()),
            None => fragment
                .select(selector)
                .next()
                .map(|node| node.text().collect::<String>().trim().to_owned()),
        };
        if let Some(value) = found {
            return RawField::Found(value);
        }
    }
    RawField::Unavailable
}

/// Like [`extract`] with an attribute, but tries several attribute names per
/// node in order (e.g. `data-src` before `src` for lazy-loaded images).
///
/// Blank attribute values fall through to the next attribute name, since lazy
/// loaders commonly leave placeholder attributes empty.
#[must_use]
pub fn extract_any_attribute<S: AsRef<str>>(
    fragment: ElementRef<'_>,
    candidates: &CandidateLocator,
    attributes: &[S],
) -> RawField {
    for selector in candidates.selectors() {
        for node in fragment.select(selector) {
            let value = attributes
                .iter()
                .filter_map(|attr| node.value().attr(attr.as_ref()))
                .map(str::trim)
                .find(|value| !value.is_empty());
            if let Some(value) = value {
                return RawField::Found(value.to_owned());
            }
        }
    }
    RawField::Unavailable
}

/// Returns the listing fragments of a page: the nodes matched by the first
/// candidate that selects at least one node.
#[must_use]
pub fn select_fragments<'a>(document: &'a Html, candidates: &CandidateLocator) -> Vec<ElementRef<'a>> {
    for selector in candidates.selectors() {
        let nodes: Vec<ElementRef<'a>> = document.select(selector).collect();
        if !nodes.is_empty() {
            return nodes;
        }
    }
    Vec::new()
}
