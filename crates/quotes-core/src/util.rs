//! Small text helpers shared by the normalizer, adapters and config.

/// Trimmed text, or `None` when nothing but whitespace is left.
pub fn non_blank(value: Option<String>) -> Option<String> {
    let trimmed = value?.trim().to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Whether `value` names an http(s) endpoint with something after the scheme.
pub fn is_web_endpoint(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    ["http://", "https://"].iter().any(|scheme| {
        lower
            .strip_prefix(scheme)
            .is_some_and(|rest| !rest.trim().is_empty())
    })
}

/// Response body excerpt for error messages, capped at 180 characters.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_drops_whitespace_only_fields() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("\n\t ".to_string())), None);
        assert_eq!(
            non_blank(Some("  Marcus Aurelius ".to_string())),
            Some("Marcus Aurelius".to_string())
        );
    }

    #[test]
    fn web_endpoint_needs_scheme_and_host() {
        assert!(is_web_endpoint("https://jsonplaceholder.typicode.com/posts?_limit=10"));
        assert!(is_web_endpoint("HTTP://127.0.0.1:8080/quotes"));
        assert!(!is_web_endpoint("https://"));
        assert!(!is_web_endpoint("file:///tmp/quotes.json"));
        assert!(!is_web_endpoint("jsonplaceholder.typicode.com/posts"));
    }

    #[test]
    fn compact_text_caps_long_error_bodies() {
        let body = "quote ".repeat(100);
        assert_eq!(compact_text(&body).chars().count(), 180);
        assert_eq!(compact_text("  Not Found  "), "Not Found");
    }
}
