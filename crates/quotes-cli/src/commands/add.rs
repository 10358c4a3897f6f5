use std::path::Path;

use quotes_core::config::SyncConfig;
use quotes_core::RawQuote;

use crate::commands::common::{open_service, resolve_quote_text};
use crate::error::CliError;

pub async fn run_add(
    text_parts: &[String],
    author: Option<String>,
    category: Option<String>,
    db_path: &Path,
    config: &SyncConfig,
) -> Result<(), CliError> {
    let text = resolve_quote_text(text_parts)?;

    let service = open_service(db_path, config).await?;
    let quote = service
        .add(RawQuote {
            text: Some(text),
            author,
            category,
            ..RawQuote::default()
        })
        .await?;

    println!("{}", quote.id);
    Ok(())
}
