use std::path::Path;

use quotes_core::config::SyncConfig;

use crate::commands::common::open_service;
use crate::error::CliError;

pub async fn run_categories(db_path: &Path, config: &SyncConfig) -> Result<(), CliError> {
    let service = open_service(db_path, config).await?;
    let selected = service.selected_category().await;

    for category in service.categories().await {
        let marker = if selected.as_str() == category { "*" } else { " " };
        println!("{marker} {category}");
    }
    Ok(())
}
