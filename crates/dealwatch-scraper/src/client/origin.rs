//! URL origin, domain, and relative-link resolution utilities.

use reqwest::Url;

use crate::error::ScraperError;

/// Extracts the scheme+host origin from a URL.
///
/// Given `"https://www.hotukdeals.com/hot?page=2"`, returns `"https://www.hotukdeals.com"`.
#[must_use]
pub fn extract_origin(url: &str) -> String {
    Url::parse(url).map_or_else(
        |e| {
            tracing::warn!(
                url,
                error = %e,
                "could not parse URL, falling back to string split for origin extraction; check config/sources.yaml"
            );
            // fallback: take "https://host" by splitting on '/' and taking first 3 parts
            url.trim_end_matches('/')
                .splitn(4, '/')
                .take(3)
                .collect::<Vec<_>>()
                .join("/")
        },
        |u| u.origin().ascii_serialization(),
    )
}

/// Extracts the hostname from a URL for use in error messages.
///
/// Falls back to the full URL string if parsing fails.
pub(crate) fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

/// Checks that `url` is an absolute `http(s)` URL with a host.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] naming what is wrong with `url`.
pub(crate) fn check_http_url(url: &str) -> Result<(), ScraperError> {
    let invalid = |reason: String| ScraperError::InvalidUrl {
        url: url.to_owned(),
        reason,
    };
    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme \"{}\"", parsed.scheme())));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_owned()));
    }
    Ok(())
}

/// Resolves `href` to an absolute `http(s)` URL.
///
/// Links that already carry a scheme are returned as written (after trimming)
/// so that deduplication keys stay stable across runs. Relative and
/// protocol-relative links are joined onto `base_origin`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] when `href` is blank, uses a non-HTTP
/// scheme (`javascript:`, `mailto:`), or cannot be joined onto `base_origin`.
pub fn resolve_url(base_origin: &str, href: &str) -> Result<String, ScraperError> {
    let href = href.trim();
    let invalid = |reason: String| ScraperError::InvalidUrl {
        url: href.to_owned(),
        reason,
    };

    if href.is_empty() {
        return Err(invalid("link is empty".to_owned()));
    }

    if let Ok(absolute) = Url::parse(href) {
        return if matches!(absolute.scheme(), "http" | "https") {
            Ok(href.to_owned())
        } else {
            Err(invalid(format!("unsupported scheme \"{}\"", absolute.scheme())))
        };
    }

    let base = Url::parse(base_origin)
        .map_err(|e| invalid(format!("base origin \"{base_origin}\" is not a valid URL: {e}")))?;
    let joined = base
        .join(href)
        .map_err(|e| invalid(format!("cannot resolve against {base_origin}: {e}")))?;
    Ok(joined.to_string())
}
