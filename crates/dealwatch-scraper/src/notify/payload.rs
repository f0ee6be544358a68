//! Discord webhook message body.

use dealwatch_core::ListingRecord;
use serde::Serialize;

use crate::profile::SourceBranding;

const MAX_TITLE_CHARS: usize = 256;
const MAX_FIELD_VALUE_CHARS: usize = 1024;

/// Discord rejects empty field values.
const EMPTY_FIELD_VALUE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookMessage {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    pub url: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedThumbnail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedThumbnail {
    pub url: String,
}

impl EmbedField {
    fn new(name: &str, value: &str, inline: bool) -> Self {
        let value = if value.trim().is_empty() {
            EMPTY_FIELD_VALUE.to_owned()
        } else {
            truncate_chars(value, MAX_FIELD_VALUE_CHARS)
        };
        Self {
            name: name.to_owned(),
            value,
            inline,
        }
    }
}

impl WebhookMessage {
    /// Builds the single-embed message announcing `record`.
    #[must_use]
    pub fn for_listing(record: &ListingRecord, branding: &SourceBranding) -> Self {
        let mut fields = vec![
            EmbedField::new("Price", &record.price, true),
            EmbedField::new("Source", &branding.label, true),
        ];
        if let Some(discount) = record.discount() {
            fields.push(EmbedField::new("Discount Info", discount, false));
        }
        if let Some(metric) = record.metric() {
            fields.push(EmbedField::new("Popularity", metric, true));
        }

        Self {
            username: format!("{} Deal Bot", branding.label),
            avatar_url: branding.avatar_url.clone(),
            embeds: vec![Embed {
                title: truncate_chars(&record.title, MAX_TITLE_CHARS),
                url: record.link.clone(),
                color: branding.color,
                fields,
                thumbnail: record.thumbnail().map(|url| EmbedThumbnail {
                    url: url.to_owned(),
                }),
            }],
        }
    }
}

fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_owned(),
        None => value.to_owned(),
    }
}
