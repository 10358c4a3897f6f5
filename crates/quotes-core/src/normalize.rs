//! Record normalizer
//!
//! Turns permissive input (persisted blobs, import files, remote payloads)
//! into well-formed [`Quote`] values. Normalization never fails; whether the
//! result may be stored is decided separately by [`validate`].

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::models::{Quote, QuoteId, RawQuote, Source, DEFAULT_AUTHOR, DEFAULT_CATEGORY};
use crate::util::non_blank;

/// Fill every missing field of `raw` with its default.
///
/// The id is generated in the `fallback` namespace when absent, and the
/// source falls back to `fallback` when absent or unrecognized. Text is
/// trimmed but may end up empty; callers reject such quotes via [`validate`].
#[must_use]
pub fn normalize(raw: RawQuote, fallback: Source) -> Quote {
    let id = non_blank(raw.id).map_or_else(|| QuoteId::generate(fallback), QuoteId::from);
    let text = raw
        .text
        .map(|text| text.trim().to_string())
        .unwrap_or_default();
    let author =
        non_blank(raw.author).unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
    let category =
        non_blank(raw.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let updated_at = raw
        .updated_at
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or_else(Utc::now);
    let source = raw
        .source
        .as_deref()
        .and_then(|source| source.parse().ok())
        .unwrap_or(fallback);

    Quote {
        id,
        text,
        author,
        category,
        updated_at,
        source,
    }
}

/// Fallback source for a raw record: its own `source` when recognized,
/// otherwise `local`.
#[must_use]
pub fn own_source(raw: &RawQuote) -> Source {
    raw.source
        .as_deref()
        .and_then(|source| source.parse().ok())
        .unwrap_or(Source::Local)
}

/// Reject quotes whose text or category is empty after trimming.
pub fn validate(quote: &Quote) -> Result<(), ValidationError> {
    if quote.text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    if quote.category.trim().is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    Ok(())
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fills_defaults_for_missing_fields() {
        let quote = normalize(
            RawQuote {
                text: Some("  Be here now  ".to_string()),
                ..RawQuote::default()
            },
            Source::Local,
        );

        assert_eq!(quote.text, "Be here now");
        assert_eq!(quote.author, DEFAULT_AUTHOR);
        assert_eq!(quote.category, DEFAULT_CATEGORY);
        assert_eq!(quote.source, Source::Local);
        assert!(quote.id.as_str().starts_with("local-"));
    }

    #[test]
    fn keeps_supplied_values() {
        let raw = RawQuote {
            id: Some("srv-3".to_string()),
            text: Some("Changed".to_string()),
            author: Some("User 1".to_string()),
            category: Some("User 1".to_string()),
            updated_at: Some("2024-03-01T12:00:00+02:00".to_string()),
            source: Some("server".to_string()),
        };

        let quote = normalize(raw, Source::Local);
        assert_eq!(quote.id.as_str(), "srv-3");
        assert_eq!(quote.author, "User 1");
        assert_eq!(quote.source, Source::Server);
        assert_eq!(quote.updated_at.to_rfc3339(), "2024-03-01T10:00:00+00:00");
    }

    #[test]
    fn generated_ids_use_fallback_namespace() {
        let quote = normalize(RawQuote::new("Hi", "Life"), Source::Server);
        assert!(quote.id.as_str().starts_with("server-"));
        assert_eq!(quote.source, Source::Server);
    }

    #[test]
    fn unparseable_timestamp_is_restamped() {
        let before = Utc::now();
        let quote = normalize(
            RawQuote {
                updated_at: Some("yesterday".to_string()),
                ..RawQuote::new("Hi", "Life")
            },
            Source::Local,
        );
        assert!(quote.updated_at >= before);
    }

    #[test]
    fn unknown_source_uses_fallback() {
        let raw = RawQuote {
            source: Some("carrier-pigeon".to_string()),
            ..RawQuote::new("Hi", "Life")
        };
        assert_eq!(own_source(&raw), Source::Local);
        assert_eq!(normalize(raw, Source::Server).source, Source::Server);
    }

    #[test]
    fn validate_rejects_blank_text() {
        let quote = normalize(RawQuote::new("   ", "Life"), Source::Local);
        assert_eq!(validate(&quote), Err(ValidationError::EmptyText));
    }

    #[test]
    fn blank_category_defaults_instead_of_failing() {
        let quote = normalize(RawQuote::new("Hi", "  "), Source::Local);
        assert_eq!(quote.category, DEFAULT_CATEGORY);
        assert_eq!(validate(&quote), Ok(()));
    }
}
