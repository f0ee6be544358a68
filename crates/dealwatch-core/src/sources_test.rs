use std::path::Path;

use super::*;

fn make_source(name: &str) -> SourceConfig {
    SourceConfig {
        name: name.to_string(),
        enabled: true,
        base_origin: "https://www.example.com".to_string(),
        start_url: "https://www.example.com/deals".to_string(),
        search_url: Some("https://www.example.com/search?q={query}".to_string()),
        color: "#FFA500".to_string(),
        avatar_url: None,
        metric_template: Some("🔥 {} Heat".to_string()),
        metric_default: None,
        discount_fallback: None,
        selectors: SelectorConfig {
            listing: vec!["div.deal".to_string()],
            title: vec!["a.title".to_string()],
            link: vec!["a.title".to_string()],
            link_attribute: "href".to_string(),
            price: vec!["span.price".to_string()],
            ..SelectorConfig::default()
        },
    }
}

#[test]
fn parse_color_with_hash() {
    assert_eq!(parse_color("#FFA500").unwrap(), 0x00FF_A500);
}

#[test]
fn parse_color_without_hash() {
    assert_eq!(parse_color("1e90ff").unwrap(), 0x001E_90FF);
}

#[test]
fn parse_color_rejects_short_value() {
    let err = parse_color("#FFF").unwrap_err();
    assert!(err.to_string().contains("six hex digits"));
}

#[test]
fn parse_color_rejects_non_hex() {
    assert!(parse_color("#GGGGGG").is_err());
}

#[test]
fn entry_url_without_search_term_uses_start_url() {
    let source = make_source("Example");
    assert_eq!(source.entry_url(None), "https://www.example.com/deals");
}

#[test]
fn entry_url_encodes_search_term() {
    let source = make_source("Example");
    assert_eq!(
        source.entry_url(Some("air fryer & co")),
        "https://www.example.com/search?q=air%20fryer%20%26%20co"
    );
}

#[test]
fn entry_url_ignores_term_without_search_template() {
    let mut source = make_source("Example");
    source.search_url = None;
    assert_eq!(
        source.entry_url(Some("lego")),
        "https://www.example.com/deals"
    );
}

#[test]
fn validate_accepts_valid_sources() {
    let file = SourcesFile {
        sources: vec![make_source("HotUKDeals"), make_source("LatestDeals")],
    };
    assert!(validate_sources(&file).is_ok());
}

#[test]
fn validate_rejects_empty_name() {
    let file = SourcesFile {
        sources: vec![make_source("  ")],
    };
    let err = validate_sources(&file).unwrap_err();
    assert!(err.to_string().contains("non-empty"));
}

#[test]
fn validate_rejects_duplicate_name() {
    let file = SourcesFile {
        sources: vec![make_source("HotUKDeals"), make_source("hotukdeals")],
    };
    let err = validate_sources(&file).unwrap_err();
    assert!(err.to_string().contains("duplicate source name"));
}

#[test]
fn validate_rejects_relative_start_url() {
    let mut source = make_source("Example");
    source.start_url = "/deals".to_string();
    let file = SourcesFile {
        sources: vec![source],
    };
    let err = validate_sources(&file).unwrap_err();
    assert!(err.to_string().contains("start_url"));
}

#[test]
fn validate_rejects_search_url_without_placeholder() {
    let mut source = make_source("Example");
    source.search_url = Some("https://www.example.com/search".to_string());
    let file = SourcesFile {
        sources: vec![source],
    };
    let err = validate_sources(&file).unwrap_err();
    assert!(err.to_string().contains("{query}"));
}

#[test]
fn validate_rejects_bad_color() {
    let mut source = make_source("Example");
    source.color = "orange".to_string();
    let file = SourcesFile {
        sources: vec![source],
    };
    let err = validate_sources(&file).unwrap_err();
    assert!(err.to_string().contains("Example"));
}

#[test]
fn validate_rejects_missing_price_selector() {
    let mut source = make_source("Example");
    source.selectors.price = vec![];
    let file = SourcesFile {
        sources: vec![source],
    };
    let err = validate_sources(&file).unwrap_err();
    assert!(err.to_string().contains("price selector"));
}

#[test]
fn selected_skips_disabled_and_filters_by_name() {
    let mut disabled = make_source("Disabled");
    disabled.enabled = false;
    let file = SourcesFile {
        sources: vec![
            make_source("HotUKDeals"),
            make_source("LatestDeals"),
            disabled,
        ],
    };
    assert_eq!(file.selected(None).len(), 2);

    let only = file.selected(Some("latestdeals"));
    assert_eq!(only.len(), 1);
    assert_eq!(only[0].name, "LatestDeals");

    assert!(file.selected(Some("Disabled")).is_empty());
}

#[test]
fn selector_defaults_apply_when_omitted() {
    let yaml = r##"
sources:
  - name: Minimal
    base_origin: https://www.example.com
    start_url: https://www.example.com/
    color: "#000000"
    selectors:
      listing: ["div.deal"]
      title: ["a"]
      link: ["a"]
      price: [".price"]
"##;
    let file: SourcesFile = serde_yaml::from_str(yaml).unwrap();
    let source = &file.sources[0];
    assert!(source.enabled);
    assert_eq!(source.selectors.link_attribute, "href");
    assert_eq!(source.selectors.image_attributes, vec!["data-src", "src"]);
    assert!(source.selectors.next_page.is_empty());
    assert!(validate_sources(&file).is_ok());
}

#[test]
fn load_sources_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("sources.yaml");
    assert!(
        path.exists(),
        "sources.yaml missing at {path:?}; required for this test"
    );
    let result = load_sources(&path);
    assert!(result.is_ok(), "failed to load sources.yaml: {result:?}");
    let file = result.unwrap();
    assert_eq!(file.sources.len(), 2);
    assert!(file.sources.iter().any(|s| s.name == "HotUKDeals"));
}

#[test]
fn load_sources_missing_file_is_io_error() {
    let result = load_sources(Path::new("/nonexistent/dealwatch/sources.yaml"));
    assert!(matches!(result, Err(ConfigError::SourcesFileIo { .. })));
}
