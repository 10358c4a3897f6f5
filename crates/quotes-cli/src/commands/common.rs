use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use quotes_core::config::SyncConfig;
use quotes_core::db::LibSqlBlobStore;
use quotes_core::{CategoryFilter, Conflict, LoadOptions, Quote, QuoteService};
use serde::Serialize;

use crate::config_file::CliConfig;
use crate::error::CliError;

pub type CliQuoteService = QuoteService<LibSqlBlobStore>;

#[derive(Debug, Serialize)]
pub struct ConflictItem {
    pub id: String,
    pub local_text: String,
    pub local_author: String,
    pub local_category: String,
    pub server_text: String,
    pub server_author: String,
    pub server_category: String,
    pub detected_at: String,
}

pub async fn open_service(db_path: &Path, config: &SyncConfig) -> Result<CliQuoteService, CliError> {
    let store = LibSqlBlobStore::open(db_path).await?;
    let options = LoadOptions {
        seed_defaults: config.seed_defaults,
    };
    Ok(QuoteService::open(store, options).await?)
}

/// Explicit category wins; otherwise the saved filter applies.
pub async fn effective_filter(service: &CliQuoteService, category: Option<&str>) -> CategoryFilter {
    match category {
        Some(category) => CategoryFilter::parse(category),
        None => service.selected_category().await,
    }
}

pub fn format_quote_lines(quotes: &[Quote]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    quotes
        .iter()
        .map(|quote| {
            let short_id = short_id(quote.id.as_str());
            let preview = quote_preview(&quote.text, 48);
            let relative_time = format_relative_time(quote.updated_at.timestamp_millis(), now_ms);
            format!(
                "{short_id:<14}  {preview:<48}  {:<16}  [{}]  {relative_time}",
                quote.author, quote.category
            )
        })
        .collect()
}

pub fn conflict_to_item(conflict: &Conflict) -> ConflictItem {
    ConflictItem {
        id: conflict.id.to_string(),
        local_text: conflict.local.text.clone(),
        local_author: conflict.local.author.clone(),
        local_category: conflict.local.category.clone(),
        server_text: conflict.server.text.clone(),
        server_author: conflict.server.author.clone(),
        server_category: conflict.server.category.clone(),
        detected_at: format_timestamp(conflict.timestamp),
    }
}

pub fn format_conflict_lines(conflicts: &[Conflict]) -> Vec<String> {
    conflicts
        .iter()
        .map(|conflict| {
            format!(
                "{}  {}\n  local:  {}\n  server: {}",
                format_timestamp(conflict.timestamp),
                conflict.id,
                conflict.local.display_line(),
                conflict.server.display_line()
            )
        })
        .collect()
}

pub fn short_id(id: &str) -> String {
    id.chars().take(14).collect()
}

pub fn quote_preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let month = 30 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < month {
        format!("{}d ago", diff / day)
    } else {
        format!("{}mo ago", diff / month)
    }
}

/// Quote text from arguments, falling back to piped stdin.
pub fn resolve_quote_text(text_parts: &[String]) -> Result<String, CliError> {
    if let Some(text) = normalize_text(&text_parts.join(" ")) {
        return Ok(text);
    }

    if let Some(text) = read_piped_stdin()? {
        return Ok(text);
    }

    Err(CliError::EmptyText)
}

pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_quote_identifier(id: &str) -> Result<String, CliError> {
    normalize_text(id).ok_or(CliError::EmptyQuoteId)
}

fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_text(&buffer))
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>, config: &CliConfig) -> PathBuf {
    cli_db_path
        .or_else(|| config.db_path.clone())
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quotes")
        .join("quotes.db")
}
