//! Output serialization for the scraped dataset.
//!
//! # Submodules
//!
//! - [`json`]: the extension-entry array consumed by the browser extension
//! - [`csv`]: a flat `name,abbrv,rank,source` table
//!
//! [`write_output`] routes the rendered text to a file, to stdout, or to
//! both: an output path of `-` means stdout only, and `--stdout` mirrors
//! the text to stdout even when a file is written. Errors in the scrape
//! never reach the artifact — an empty run still writes an empty array or
//! a header-only CSV.

pub mod csv;
pub mod json;

use std::path::PathBuf;

use chrono::Local;
use tokio::fs;
use tracing::info;

use crate::cli::OutputFormat;
use crate::errors::ScrapeError;
use crate::models::ConferenceRow;

/// Serialize `rows` in the requested format and deliver the result.
///
/// Parent directories of the output path are created as needed. The JSON
/// path stamps every entry with today's local date as `last_updated`.
pub async fn write_output(
    rows: &[ConferenceRow],
    output: &str,
    format: OutputFormat,
    stdout: bool,
) -> Result<(), ScrapeError> {
    let output_path = (output != "-").then(|| PathBuf::from(output));
    let last_updated = Local::now().format("%Y-%m-%d").to_string();

    let mut text = match format {
        OutputFormat::Json => json::render(rows, &last_updated)?,
        OutputFormat::Csv => csv::render(rows),
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }

    if let Some(path) = &output_path {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(path, &text).await?;
        info!(count = rows.len(), path = %path.display(), "Wrote conference rows");
    }

    if stdout || output_path.is_none() {
        print!("{text}");
    }

    Ok(())
}
