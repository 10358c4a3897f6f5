use std::path::Path;

use quotes_core::config::SyncConfig;
use quotes_core::RawQuote;
use serde_json::Value;

use crate::commands::common::open_service;
use crate::error::CliError;

/// Parse an import document: a JSON array of quote-shaped objects.
pub fn parse_import(raw: &str) -> Result<Vec<RawQuote>, CliError> {
    let payload = serde_json::from_str::<Value>(raw)
        .map_err(|error| CliError::InvalidImport(format!("not JSON: {error}")))?;
    let Value::Array(entries) = payload else {
        return Err(CliError::InvalidImport(
            "expected a JSON array of quotes".to_string(),
        ));
    };
    Ok(entries.iter().map(RawQuote::from_json).collect())
}

pub async fn run_import(path: &Path, db_path: &Path, config: &SyncConfig) -> Result<(), CliError> {
    let raws = parse_import(&std::fs::read_to_string(path)?)?;

    let service = open_service(db_path, config).await?;
    let report = service.import(raws).await?;

    println!(
        "Imported {} quote(s), rejected {}",
        report.imported, report.rejected
    );
    for (index, error) in &report.errors {
        eprintln!("  entry {index}: {error}");
    }
    Ok(())
}
