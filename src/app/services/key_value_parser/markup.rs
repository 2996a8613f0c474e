//! Markup stripping for RSS and HTML observation blocks
//!
//! NDBC latest-observation feeds wrap the readings in a `<description>`
//! element, usually as entity-escaped or CDATA-wrapped HTML with one
//! `<strong>Label:</strong> value<br />` pair per line. Stripping keeps those
//! line breaks so labeled patterns never run across two readings.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static DESCRIPTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<description[^>]*>(.*?)</description>").unwrap());

static PUB_DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<pubDate[^>]*>\s*(.*?)\s*</pubDate>").unwrap());

static LINE_BREAK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s*(?:br|/?p|/?div|/?li)\b[^>]*>").unwrap());

static ANY_TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

static TAG_DETECT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s*/?[a-z!][^>]*>|&lt;\s*/?[a-z]").unwrap());

static HORIZONTAL_SPACE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

/// Entities decoded before tags are removed; `&amp;` goes last in each pass
const ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&nbsp;", " "),
    ("&#160;", " "),
    ("&deg;", "°"),
    ("&#176;", "°"),
    ("&amp;", "&"),
];

/// Escaped HTML inside RSS can itself carry entities (`&amp;#176;`)
const ENTITY_PASSES: usize = 2;

/// True when the text contains tags or escaped tags
pub fn has_markup(raw: &str) -> bool {
    TAG_DETECT_PATTERN.is_match(raw)
}

/// Replace the common HTML entities NDBC emits
pub fn decode_entities(text: &str) -> String {
    let mut decoded = text.to_string();
    for _ in 0..ENTITY_PASSES {
        if !decoded.contains('&') {
            break;
        }
        decoded = ENTITIES
            .iter()
            .fold(decoded, |acc, (entity, replacement)| {
                acc.replace(entity, replacement)
            });
    }
    decoded
}

/// Reduce an RSS document or HTML fragment to plain text
///
/// When the text has `<description>` elements only their contents are kept,
/// joined by newlines. Plain text passes through with nothing but entity
/// decoding.
pub fn strip_markup(raw: &str) -> String {
    let descriptions: Vec<&str> = DESCRIPTION_PATTERN
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    let body = if descriptions.is_empty() {
        raw.to_string()
    } else {
        descriptions.join("\n")
    };

    let body = body.replace("<![CDATA[", "").replace("]]>", "");
    let body = decode_entities(&body);
    let body = LINE_BREAK_TAG_PATTERN.replace_all(&body, "\n");
    let body = ANY_TAG_PATTERN.replace_all(&body, " ");

    body.lines()
        .map(|line| HORIZONTAL_SPACE_PATTERN.replace_all(line.trim(), " ").into_owned())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Publication time of the first RSS item carrying an RFC 2822 `<pubDate>`
pub fn pub_date(raw: &str) -> Option<DateTime<Utc>> {
    PUB_DATE_PATTERN
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| DateTime::parse_from_rfc2822(m.as_str()).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
