//! JSON rendering of the extension dataset.
//!
//! The output is a pretty-printed array of fixed-shape objects (see
//! [`ConferenceRow::to_extension_entry`]) so the file diffs cleanly when
//! the dataset is refreshed and committed.

use serde_json::Value;

use crate::errors::ScrapeError;
use crate::models::ConferenceRow;

/// Render the rows as the extension-entry JSON array.
pub fn render(rows: &[ConferenceRow], last_updated: &str) -> Result<String, ScrapeError> {
    let entries: Vec<Value> = rows
        .iter()
        .map(|row| row.to_extension_entry(last_updated))
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}
