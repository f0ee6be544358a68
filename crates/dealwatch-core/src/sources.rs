use std::collections::HashSet;
use std::path::Path;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Candidate CSS selectors per logical field of a deal card.
///
/// Each list is ordered by preference: the first selector that matches wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectorConfig {
    pub listing: Vec<String>,
    pub title: Vec<String>,
    pub link: Vec<String>,
    #[serde(default = "default_link_attribute")]
    pub link_attribute: String,
    pub price: Vec<String>,
    #[serde(default)]
    pub metric: Vec<String>,
    #[serde(default)]
    pub image: Vec<String>,
    #[serde(default = "default_image_attributes")]
    pub image_attributes: Vec<String>,
    #[serde(default)]
    pub discount: Vec<String>,
    #[serde(default)]
    pub next_page: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Scheme + host used to absolutize relative links, e.g. `https://www.hotukdeals.com`.
    pub base_origin: String,
    pub start_url: String,
    /// Search URL template with a `{query}` placeholder.
    pub search_url: Option<String>,
    /// Embed accent color as `#RRGGBB`.
    pub color: String,
    pub avatar_url: Option<String>,
    /// Template for the popularity label; `{}` is replaced with the scraped value.
    pub metric_template: Option<String>,
    /// Value substituted when the metric selector misses.
    pub metric_default: Option<String>,
    pub discount_fallback: Option<String>,
    pub selectors: SelectorConfig,
}

impl SourceConfig {
    /// Returns the first page to fetch, honoring an optional search term.
    ///
    /// The term is percent-encoded into the `{query}` placeholder. Sources
    /// without a `search_url` ignore the term and use `start_url`.
    #[must_use]
    pub fn entry_url(&self, search_term: Option<&str>) -> String {
        match (search_term, self.search_url.as_deref()) {
            (Some(term), Some(template)) => template.replace(
                "{query}",
                &utf8_percent_encode(term.trim(), NON_ALPHANUMERIC).to_string(),
            ),
            _ => self.start_url.clone(),
        }
    }

    /// Returns the embed color parsed from `#RRGGBB`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the color is not a 6-digit hex value.
    pub fn color_value(&self) -> Result<u32, ConfigError> {
        parse_color(&self.color)
    }
}

#[derive(Debug, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<SourceConfig>,
}

impl SourcesFile {
    /// Enabled sources, optionally narrowed to a single name (case-insensitive).
    #[must_use]
    pub fn selected(&self, name_filter: Option<&str>) -> Vec<&SourceConfig> {
        self.sources
            .iter()
            .filter(|s| s.enabled)
            .filter(|s| name_filter.is_none_or(|n| s.name.eq_ignore_ascii_case(n)))
            .collect()
    }
}

fn default_enabled() -> bool {
    true
}

fn default_link_attribute() -> String {
    "href".to_string()
}

fn default_image_attributes() -> Vec<String> {
    vec!["data-src".to_string(), "src".to_string()]
}

/// Parses an embed color written as `#RRGGBB` (the leading `#` is optional).
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] if the value is not exactly six hex digits.
pub fn parse_color(raw: &str) -> Result<u32, ConfigError> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return Err(ConfigError::Validation(format!(
            "color '{raw}' must be six hex digits like #FFA500"
        )));
    }
    u32::from_str_radix(hex, 16)
        .map_err(|e| ConfigError::Validation(format!("color '{raw}' is not valid hex: {e}")))
}

/// Load and validate the source profiles from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourcesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let sources_file: SourcesFile = serde_yaml::from_str(&content)?;

    validate_sources(&sources_file)?;

    Ok(sources_file)
}

fn validate_sources(sources_file: &SourcesFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for source in &sources_file.sources {
        if source.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(source.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate source name: '{}'",
                source.name
            )));
        }

        for (field, url) in [
            ("base_origin", &source.base_origin),
            ("start_url", &source.start_url),
        ] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::Validation(format!(
                    "source '{}' has {field} '{url}'; must be an absolute http(s) URL",
                    source.name
                )));
            }
        }

        if let Some(template) = &source.search_url {
            if !template.contains("{query}") {
                return Err(ConfigError::Validation(format!(
                    "source '{}' search_url must contain a {{query}} placeholder",
                    source.name
                )));
            }
        }

        source.color_value().map_err(|e| {
            ConfigError::Validation(format!("source '{}': {e}", source.name))
        })?;

        let selectors = &source.selectors;
        for (field, candidates) in [
            ("listing", &selectors.listing),
            ("title", &selectors.title),
            ("link", &selectors.link),
            ("price", &selectors.price),
        ] {
            if candidates.iter().all(|c| c.trim().is_empty()) {
                return Err(ConfigError::Validation(format!(
                    "source '{}' needs at least one {field} selector",
                    source.name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "sources_test.rs"]
mod tests;
