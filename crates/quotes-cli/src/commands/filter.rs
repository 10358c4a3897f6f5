use std::path::Path;

use quotes_core::config::SyncConfig;
use quotes_core::CategoryFilter;

use crate::commands::common::open_service;
use crate::error::CliError;

pub async fn run_filter(
    category: Option<&str>,
    clear: bool,
    db_path: &Path,
    config: &SyncConfig,
) -> Result<(), CliError> {
    let service = open_service(db_path, config).await?;

    let filter = match (category, clear) {
        (_, true) => CategoryFilter::All,
        (Some(category), false) => CategoryFilter::parse(category),
        (None, false) => {
            println!("{}", service.selected_category().await.as_str());
            return Ok(());
        }
    };

    service.set_selected_category(filter.clone()).await?;
    println!("{}", filter.as_str());
    Ok(())
}
