//! Data models for dataset metadata and normalized conference rows.
//!
//! This module defines the two core data structures of the pipeline:
//! - [`DatasetMeta`]: descriptive metadata about one embedded dataset,
//!   extracted from inline `setData*` helpers on the landing page
//! - [`ConferenceRow`]: the canonical output unit representing one ranked
//!   conference, built by the row normalizer
//!
//! Both are created once per scrape run and never mutated afterwards.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Default landing page hosting the embedded datasets.
///
/// Also emitted verbatim as the `source_url` field of every JSON entry so
/// the downstream extension can attribute its data.
pub const BASE_URL: &str = "http://www.conferenceranks.com/";

/// Dataset identifier attached to rows scraped through the fallback
/// table path, where no `data/*.js` resource exists to derive one from.
pub const FALLBACK_DATASET_ID: &str = "html";

/// Source label attached to rows scraped through the fallback table path.
pub const FALLBACK_SOURCE: &str = "ConferenceRanks.com";

/// Metadata describing one embedded dataset, keyed by its identifier.
///
/// Extracted from the inline `setData<Id>` helper functions on the landing
/// page. All fields are optional in the markup; missing ones stay empty.
/// The year, when present, is a 4-digit string (e.g. `"2021"`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatasetMeta {
    /// Lowercased dataset identifier (e.g. `"era2010"`).
    pub id: String,
    /// Display name of the ranking source (e.g. `"CORE"`). Empty when the
    /// markup carried none; callers supply the uppercased-id fallback.
    pub name: String,
    /// Free-text description of the dataset.
    pub description: String,
    /// 4-digit publication year, or empty.
    pub year: String,
}

/// One normalized conference row, the unit of output.
///
/// # Invariants
///
/// - `name` is non-empty and trimmed
/// - `aliases` contains no duplicates and no empty strings, in first-seen
///   order, starting with `name` and including `abbrv` when present
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConferenceRow {
    /// Full conference name.
    pub name: String,
    /// Abbreviation, possibly empty.
    pub abbrv: String,
    /// Rank or classification label, free-form (taxonomies vary by source).
    pub rank: String,
    /// Resolved source attribution label (e.g. `"CORE 2021"`).
    pub source: String,
    /// Identifier of the dataset this row came from.
    pub dataset_id: String,
    /// Deduplicated lookup aliases for the extension's matcher.
    pub aliases: Vec<String>,
}

impl ConferenceRow {
    /// Build the JSON object consumed by the browser extension.
    ///
    /// The shape is fixed: `type` is always `"conference"`, `source_url` is
    /// always the landing page, and `last_updated` is the supplied
    /// `YYYY-MM-DD` date.
    pub fn to_extension_entry(&self, last_updated: &str) -> Value {
        json!({
            "type": "conference",
            "name": self.name,
            "abbrv": self.abbrv,
            "aliases": self.aliases,
            "rank": self.rank,
            "source": self.source,
            "source_url": BASE_URL,
            "last_updated": last_updated,
        })
    }

    /// The four fields serialized on the CSV path, in header order.
    pub fn csv_fields(&self) -> [&str; 4] {
        [&self.name, &self.abbrv, &self.rank, &self.source]
    }
}
