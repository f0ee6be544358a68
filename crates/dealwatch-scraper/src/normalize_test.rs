use super::*;

fn found(value: &str) -> RawField {
    RawField::Found(value.to_owned())
}

fn make_raw(title: RawField, link: RawField, price: RawField) -> RawListing {
    RawListing {
        title,
        link,
        price,
        metric: RawField::Unavailable,
        image: RawField::Unavailable,
        discount: RawField::Unavailable,
    }
}

#[test]
fn accepts_complete_listing_and_resolves_relative_link() {
    let raw = make_raw(found("Widget"), found("/p/1"), found("£9.99"));
    let record = normalize(raw, "https://example.com").unwrap();
    assert_eq!(record.title, "Widget");
    assert_eq!(record.link, "https://example.com/p/1");
    assert_eq!(record.price, "£9.99");
}

#[test]
fn optional_fields_default_to_none() {
    let raw = make_raw(found("Widget"), found("/p/1"), found("£9.99"));
    let record = normalize(raw, "https://example.com").unwrap();
    assert!(record.metric_label.is_none());
    assert!(record.image_url.is_none());
    assert!(record.discount_label.is_none());
}

#[test]
fn rejects_unavailable_link() {
    let raw = make_raw(found("Widget"), RawField::Unavailable, found("£9.99"));
    let rejected = normalize(raw, "https://example.com").unwrap_err();
    assert_eq!(rejected.reason, RejectReason::MissingFields(vec!["link"]));
    assert_eq!(rejected.raw.title, found("Widget"));
}

#[test]
fn rejects_unavailable_title() {
    let raw = make_raw(RawField::Unavailable, found("/p/1"), found("£9.99"));
    let rejected = normalize(raw, "https://example.com").unwrap_err();
    assert_eq!(rejected.reason, RejectReason::MissingFields(vec!["title"]));
}

#[test]
fn rejects_unavailable_price() {
    let raw = make_raw(found("Widget"), found("/p/1"), RawField::Unavailable);
    let rejected = normalize(raw, "https://example.com").unwrap_err();
    assert_eq!(rejected.reason, RejectReason::MissingFields(vec!["price"]));
}

#[test]
fn rejection_lists_every_missing_field_in_order() {
    let raw = make_raw(RawField::Unavailable, found("/p/1"), RawField::Unavailable);
    let rejected = normalize(raw, "https://example.com").unwrap_err();
    assert_eq!(
        rejected.reason,
        RejectReason::MissingFields(vec!["title", "price"])
    );
    assert_eq!(
        rejected.to_string(),
        "listing rejected: missing title, price"
    );
}

#[test]
fn literal_unavailable_text_is_a_found_value() {
    // Only the sentinel rejects; scraped text that happens to read "unavailable" does not.
    let raw = make_raw(found("Widget"), found("/p/1"), found("unavailable"));
    let record = normalize(raw, "https://example.com").unwrap();
    assert_eq!(record.price, "unavailable");
}

#[test]
fn empty_price_is_accepted_as_found() {
    let raw = make_raw(found("Widget"), found("/p/1"), found(""));
    let record = normalize(raw, "https://example.com").unwrap();
    assert_eq!(record.price, "");
}

#[test]
fn absolute_link_is_kept_verbatim() {
    let raw = make_raw(
        found("Widget"),
        found("https://www.latestdeals.co.uk/deals/widget"),
        found("£1"),
    );
    let record = normalize(raw, "https://www.latestdeals.co.uk").unwrap();
    assert_eq!(record.link, "https://www.latestdeals.co.uk/deals/widget");
}

#[test]
fn rejects_javascript_link() {
    let raw = make_raw(found("Widget"), found("javascript:void(0)"), found("£1"));
    let rejected = normalize(raw, "https://example.com").unwrap_err();
    assert!(matches!(rejected.reason, RejectReason::InvalidLink(_)));
}

#[test]
fn image_url_is_resolved_against_origin() {
    let mut raw = make_raw(found("Widget"), found("/p/1"), found("£1"));
    raw.image = found("/img/widget.jpg");
    let record = normalize(raw, "https://example.com").unwrap();
    assert_eq!(
        record.image_url.as_deref(),
        Some("https://example.com/img/widget.jpg")
    );
}

#[test]
fn empty_image_url_becomes_none() {
    let mut raw = make_raw(found("Widget"), found("/p/1"), found("£1"));
    raw.image = found("");
    let record = normalize(raw, "https://example.com").unwrap();
    assert!(record.image_url.is_none());
}

#[test]
fn metric_and_discount_pass_through() {
    let mut raw = make_raw(found("Widget"), found("/p/1"), found("£1"));
    raw.metric = found("🔥 512° Heat");
    raw.discount = found("-40%");
    let record = normalize(raw, "https://example.com").unwrap();
    assert_eq!(record.metric_label.as_deref(), Some("🔥 512° Heat"));
    assert_eq!(record.discount_label.as_deref(), Some("-40%"));
}
