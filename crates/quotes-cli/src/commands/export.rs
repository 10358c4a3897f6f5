use std::path::Path;

use quotes_core::config::SyncConfig;
use quotes_core::export::render_quotes_export;

use crate::cli::ExportFormat;
use crate::commands::common::open_service;
use crate::error::CliError;

pub async fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    db_path: &Path,
    config: &SyncConfig,
) -> Result<(), CliError> {
    let service = open_service(db_path, config).await?;
    let quotes = service.list().await;
    let rendered = render_quotes_export(&quotes, format.into())?;

    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}
