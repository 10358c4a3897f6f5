//! Quote export helpers.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::models::Quote;

/// Export output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// Render quotes as a pretty-printed JSON array.
///
/// Field names match the persisted replica, so the output can be imported
/// again or used as a file remote.
pub fn render_json_export(quotes: &[Quote]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(quotes)
}

/// Render quotes as Markdown, grouped by category in sorted order.
#[must_use]
pub fn render_markdown_export(quotes: &[Quote]) -> String {
    let mut categories = quotes
        .iter()
        .map(|quote| quote.category.as_str())
        .collect::<Vec<_>>();
    categories.sort_unstable();
    categories.dedup();

    let mut output = String::from("# Quotes\n");
    for category in categories {
        let _ = writeln!(output);
        let _ = writeln!(output, "## {category}");
        let _ = writeln!(output);
        for quote in quotes.iter().filter(|quote| quote.category == category) {
            let _ = writeln!(output, "> {}", quote.text);
            let _ = writeln!(output, ">");
            let _ = writeln!(output, "> — {}", quote.author);
            let _ = writeln!(output);
            let _ = writeln!(
                output,
                "<!-- id: {} | source: {} | updated: {} -->",
                quote.id,
                quote.source,
                quote.updated_at.to_rfc3339()
            );
            let _ = writeln!(output);
        }
    }

    output
}

/// Render quotes based on selected export format.
pub fn render_quotes_export(quotes: &[Quote], format: ExportFormat) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(quotes),
        ExportFormat::Markdown => Ok(render_markdown_export(quotes)),
    }
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("quotes-export-{timestamp_ms}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawQuote, Source};
    use crate::normalize::normalize;

    fn quote(id: &str, text: &str, category: &str) -> Quote {
        normalize(
            RawQuote::new(text, category)
                .with_id(id)
                .with_author("Ada"),
            Source::Local,
        )
    }

    #[test]
    fn json_export_uses_persisted_field_names() {
        let rendered = render_json_export(&[quote("x", "Hello", "Life")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value[0]["id"], "x");
        assert_eq!(value[0]["source"], "local");
        assert!(value[0].get("updatedAt").is_some());
    }

    #[test]
    fn markdown_export_groups_by_category() {
        let rendered = render_markdown_export(&[
            quote("1", "Work hard", "Work"),
            quote("2", "Live well", "Life"),
        ]);

        let life = rendered.find("## Life").unwrap();
        let work = rendered.find("## Work").unwrap();
        assert!(life < work);
        assert!(rendered.contains("> Live well\n>\n> — Ada"));
        assert!(rendered.contains("<!-- id: 1 | source: local |"));
    }

    #[test]
    fn suggested_export_file_name_uses_format_extension() {
        assert_eq!(
            suggested_export_file_name(ExportFormat::Json, 123),
            "quotes-export-123.json"
        );
        assert_eq!(
            suggested_export_file_name(ExportFormat::Markdown, 456),
            "quotes-export-456.md"
        );
    }
}
