//! Compiled per-source scraping profiles.
//!
//! A [`SourceProfile`] is built once from a [`SourceConfig`]: selectors are
//! parsed up front so a typo in `config/sources.yaml` fails at startup rather
//! than silently yielding empty pages mid-run.

use dealwatch_core::SourceConfig;
use scraper::{ElementRef, Html};

use crate::client::check_http_url;
use crate::error::ScraperError;
use crate::extract::{extract, extract_any_attribute, select_fragments, CandidateLocator, RawField};
use crate::normalize::RawListing;
use crate::pagination::{find_next_target, NextTarget};

/// Display identity of a source in webhook messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBranding {
    pub label: String,
    pub color: u32,
    pub avatar_url: Option<String>,
}

/// Everything extracted from one fetched page.
#[derive(Debug)]
pub struct ParsedPage {
    /// Number of listing fragments located, including ones later rejected.
    pub fragment_count: usize,
    pub listings: Vec<RawListing>,
    pub next: NextTarget,
}

#[derive(Debug, Clone)]
pub struct SourceProfile {
    pub name: String,
    pub base_origin: String,
    /// First page to fetch (the search page when a search term is configured).
    pub entry_url: String,
    pub branding: SourceBranding,
    metric_template: Option<String>,
    metric_default: Option<String>,
    discount_fallback: Option<String>,
    link_attribute: String,
    image_attributes: Vec<String>,
    listing: CandidateLocator,
    title: CandidateLocator,
    link: CandidateLocator,
    price: CandidateLocator,
    metric: CandidateLocator,
    image: CandidateLocator,
    discount: CandidateLocator,
    next_page: CandidateLocator,
}

impl SourceProfile {
    /// Compiles `config` into a profile.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if the origin or entry page is not an
    ///   absolute `http(s)` URL.
    /// - [`ScraperError::InvalidSelector`] if any selector fails to parse.
    /// - [`ScraperError::Config`] if the embed color is malformed.
    pub fn from_config(
        config: &SourceConfig,
        search_term: Option<&str>,
    ) -> Result<Self, ScraperError> {
        let name = config.name.as_str();
        let s = &config.selectors;
        let color = config.color_value()?;
        check_http_url(&config.base_origin)?;
        let entry_url = config.entry_url(search_term);
        check_http_url(&entry_url)?;

        Ok(Self {
            name: config.name.clone(),
            base_origin: config.base_origin.trim_end_matches('/').to_owned(),
            entry_url,
            branding: SourceBranding {
                label: config.name.clone(),
                color,
                avatar_url: config.avatar_url.clone(),
            },
            metric_template: config.metric_template.clone(),
            metric_default: config.metric_default.clone(),
            discount_fallback: config.discount_fallback.clone(),
            link_attribute: s.link_attribute.clone(),
            image_attributes: s.image_attributes.clone(),
            listing: CandidateLocator::parse(name, "listing", &s.listing)?,
            title: CandidateLocator::parse(name, "title", &s.title)?,
            link: CandidateLocator::parse(name, "link", &s.link)?,
            price: CandidateLocator::parse(name, "price", &s.price)?,
            metric: CandidateLocator::parse(name, "metric", &s.metric)?,
            image: CandidateLocator::parse(name, "image", &s.image)?,
            discount: CandidateLocator::parse(name, "discount", &s.discount)?,
            next_page: CandidateLocator::parse(name, "next_page", &s.next_page)?,
        })
    }

    /// Parses a page body into raw listings and the next-page affordance.
    #[must_use]
    pub fn parse_page(&self, html: &str) -> ParsedPage {
        let document = Html::parse_document(html);
        let fragments = select_fragments(&document, &self.listing);
        let listings = fragments
            .iter()
            .map(|fragment| self.extract_listing(*fragment))
            .collect();
        let next = find_next_target(document.root_element(), &self.next_page);

        ParsedPage {
            fragment_count: fragments.len(),
            listings,
            next,
        }
    }

    /// Extracts every field of one listing fragment.
    #[must_use]
    pub fn extract_listing(&self, fragment: ElementRef<'_>) -> RawListing {
        let metric = match extract(fragment, &self.metric, None) {
            RawField::Found(value) => RawField::Found(self.format_metric(&value)),
            RawField::Unavailable => self
                .metric_default
                .as_deref()
                .map_or(RawField::Unavailable, |default| {
                    RawField::Found(self.format_metric(default))
                }),
        };

        let discount = match extract(fragment, &self.discount, None) {
            RawField::Unavailable => self
                .discount_fallback
                .clone()
                .map_or(RawField::Unavailable, RawField::Found),
            found => found,
        };

        RawListing {
            title: extract(fragment, &self.title, None),
            link: extract(fragment, &self.link, Some(self.link_attribute.as_str())),
            price: extract(fragment, &self.price, None),
            metric,
            image: extract_any_attribute(fragment, &self.image, &self.image_attributes),
            discount,
        }
    }

    fn format_metric(&self, value: &str) -> String {
        match &self.metric_template {
            Some(template) => template.replace("{}", value),
            None => value.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use dealwatch_core::SelectorConfig;

    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    fn hukd_config() -> SourceConfig {
        SourceConfig {
            name: "HotUKDeals".to_owned(),
            enabled: true,
            base_origin: "https://www.hotukdeals.com/".to_owned(),
            start_url: "https://www.hotukdeals.com/".to_owned(),
            search_url: Some("https://www.hotukdeals.com/search?q={query}".to_owned()),
            color: "#FFA500".to_owned(),
            avatar_url: None,
            metric_template: Some("🔥 {} Heat".to_owned()),
            metric_default: None,
            discount_fallback: Some("Check deal page for discount details".to_owned()),
            selectors: SelectorConfig {
                listing: strings(&["div[data-deal-id][data-card-type='deal']", "article.thread"]),
                title: strings(&["a.cept-deal-title", "a.thread-link"]),
                link: strings(&["a.cept-deal-title", "a.thread-link"]),
                link_attribute: "href".to_owned(),
                price: strings(&["span.thread-price"]),
                metric: strings(&["span.cept-vote-temp"]),
                image: strings(&["img.cept-img-loaded", "img"]),
                image_attributes: strings(&["data-src", "src"]),
                discount: strings(&["span.discount"]),
                next_page: strings(&["a.pagination-next"]),
            },
        }
    }

    const PAGE: &str = r#"<html><body>
        <div data-deal-id="1" data-card-type="deal">
            <a class="cept-deal-title" href="/deals/air-fryer-1">Ninja Air Fryer</a>
            <span class="thread-price">£89.99</span>
            <span class="cept-vote-temp">512°</span>
            <img class="cept-img-loaded" src="https://static.hotukdeals.com/1.jpg">
            <span class="discount">-35%</span>
        </div>
        <div data-deal-id="2" data-card-type="deal">
            <a class="cept-deal-title" href="/deals/lego-2">LEGO Set</a>
            <img data-src="/img/2.jpg">
        </div>
        <a class="pagination-next" href="/?page=2">Next</a>
    </body></html>"#;

    #[test]
    fn from_config_trims_trailing_slash_from_origin() {
        let profile = SourceProfile::from_config(&hukd_config(), None).unwrap();
        assert_eq!(profile.base_origin, "https://www.hotukdeals.com");
        assert_eq!(profile.entry_url, "https://www.hotukdeals.com/");
        assert_eq!(profile.branding.color, 0x00FF_A500);
        assert_eq!(profile.branding.label, "HotUKDeals");
    }

    #[test]
    fn from_config_uses_search_url_for_term() {
        let profile = SourceProfile::from_config(&hukd_config(), Some("tv")).unwrap();
        assert_eq!(profile.entry_url, "https://www.hotukdeals.com/search?q=tv");
    }

    #[test]
    fn from_config_rejects_invalid_selector() {
        let mut config = hukd_config();
        config.selectors.price = strings(&["span..price"]);
        let err = SourceProfile::from_config(&config, None).unwrap_err();
        assert!(
            matches!(err, ScraperError::InvalidSelector { field: "price", .. }),
            "expected InvalidSelector, got: {err:?}"
        );
    }

    #[test]
    fn from_config_rejects_bad_color() {
        let mut config = hukd_config();
        config.color = "orange".to_owned();
        let err = SourceProfile::from_config(&config, None).unwrap_err();
        assert!(matches!(err, ScraperError::Config(_)));
    }

    #[test]
    fn from_config_rejects_origin_without_host() {
        let mut config = hukd_config();
        config.base_origin = "https://".to_owned();
        let err = SourceProfile::from_config(&config, None).unwrap_err();
        assert!(
            matches!(err, ScraperError::InvalidUrl { ref url, .. } if url == "https://"),
            "expected InvalidUrl, got: {err:?}"
        );
    }

    #[test]
    fn from_config_rejects_start_url_with_space_in_host() {
        let mut config = hukd_config();
        config.start_url = "https://exa mple.com".to_owned();
        let err = SourceProfile::from_config(&config, None).unwrap_err();
        assert!(
            matches!(err, ScraperError::InvalidUrl { ref url, .. } if url == "https://exa mple.com"),
            "expected InvalidUrl, got: {err:?}"
        );
    }

    #[test]
    fn parse_page_extracts_all_fragments() {
        let profile = SourceProfile::from_config(&hukd_config(), None).unwrap();
        let page = profile.parse_page(PAGE);
        assert_eq!(page.fragment_count, 2);
        assert_eq!(page.listings.len(), 2);
        assert_eq!(page.next, NextTarget::Url("/?page=2".to_owned()));

        let first = &page.listings[0];
        assert_eq!(first.title, RawField::Found("Ninja Air Fryer".to_owned()));
        assert_eq!(first.link, RawField::Found("/deals/air-fryer-1".to_owned()));
        assert_eq!(first.price, RawField::Found("£89.99".to_owned()));
        assert_eq!(first.metric, RawField::Found("🔥 512° Heat".to_owned()));
        assert_eq!(
            first.image,
            RawField::Found("https://static.hotukdeals.com/1.jpg".to_owned())
        );
        assert_eq!(first.discount, RawField::Found("-35%".to_owned()));
    }

    #[test]
    fn missing_optional_fields_use_fallbacks() {
        let profile = SourceProfile::from_config(&hukd_config(), None).unwrap();
        let page = profile.parse_page(PAGE);
        let second = &page.listings[1];
        assert_eq!(second.price, RawField::Unavailable);
        assert_eq!(second.metric, RawField::Unavailable);
        assert_eq!(second.image, RawField::Found("/img/2.jpg".to_owned()));
        assert_eq!(
            second.discount,
            RawField::Found("Check deal page for discount details".to_owned())
        );
    }

    #[test]
    fn metric_default_is_formatted_when_metric_missing() {
        let mut config = hukd_config();
        config.metric_template = Some("👍 {} Likes".to_owned());
        config.metric_default = Some("0".to_owned());
        let profile = SourceProfile::from_config(&config, None).unwrap();
        let page = profile.parse_page(PAGE);
        assert_eq!(
            page.listings[1].metric,
            RawField::Found("👍 0 Likes".to_owned())
        );
    }

    #[test]
    fn parse_page_without_listings() {
        let profile = SourceProfile::from_config(&hukd_config(), None).unwrap();
        let page = profile.parse_page("<html><body><p>No deals today</p></body></html>");
        assert_eq!(page.fragment_count, 0);
        assert!(page.listings.is_empty());
        assert_eq!(page.next, NextTarget::Missing);
    }
}
