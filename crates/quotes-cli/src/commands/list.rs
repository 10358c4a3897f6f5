use std::path::Path;

use quotes_core::config::SyncConfig;

use crate::commands::common::{effective_filter, format_quote_lines, open_service};
use crate::error::CliError;

pub async fn run_list(
    category: Option<&str>,
    limit: Option<usize>,
    as_json: bool,
    db_path: &Path,
    config: &SyncConfig,
) -> Result<(), CliError> {
    let service = open_service(db_path, config).await?;
    let filter = effective_filter(&service, category).await;
    let mut quotes = service.by_category(&filter).await;
    if let Some(limit) = limit {
        quotes.truncate(limit);
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&quotes)?);
    } else if quotes.is_empty() {
        println!("No quotes in {}.", filter.as_str());
    } else {
        for line in format_quote_lines(&quotes) {
            println!("{line}");
        }
    }

    Ok(())
}
