use std::path::Path;

use quotes_core::config::SyncConfig;

use crate::commands::common::{effective_filter, open_service};
use crate::error::CliError;

pub async fn run_random(
    category: Option<&str>,
    db_path: &Path,
    config: &SyncConfig,
) -> Result<(), CliError> {
    let service = open_service(db_path, config).await?;
    let filter = effective_filter(&service, category).await;

    match service.random(&filter).await {
        Some(quote) => println!("{}", quote.display_line()),
        None => println!("No quotes in {}.", filter.as_str()),
    }
    Ok(())
}
