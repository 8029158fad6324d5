//! Row normalization: field-synonym resolution, alias deduplication, and
//! source-label attribution.
//!
//! The datasets disagree on field names (`abbrv` vs `abbrev`, `rank` vs
//! `class`), so each canonical field resolves through an ordered list of
//! candidate keys. Adding a new synonym is a one-line table edit.
//!
//! Two entry points produce [`ConferenceRow`] lists:
//! - [`rows_from_payload`] for decoded dataset payloads
//! - [`row_from_cells`] for raw table cells on the fallback path

use itertools::Itertools;
use serde_json::{Map, Value};

use crate::models::{ConferenceRow, DatasetMeta, FALLBACK_DATASET_ID, FALLBACK_SOURCE};

/// Candidate keys for the abbreviation field, first present key wins.
const ABBRV_KEYS: &[&str] = &["abbrv", "abbrev"];

/// Candidate keys for the rank field, first present key wins.
const RANK_KEYS: &[&str] = &["rank", "class"];

/// Extra alias-like keys folded into the alias list after name and abbrv.
const EXTRA_ALIAS_KEYS: &[&str] = &["abbr", "alternate-name"];

/// Deduplicate and trim a list of candidate alias strings.
///
/// Empty and whitespace-only entries are dropped; the first occurrence of
/// each remaining string wins, so order is preserved. Pure function.
pub fn dedupe_aliases<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|value| value.as_ref().trim().to_string())
        .filter(|value| !value.is_empty())
        .unique()
        .collect()
}

/// Resolve the human-readable source label for a dataset.
///
/// Prefers the descriptor's display name; a missing descriptor or empty
/// name falls back to the uppercased identifier. Either way the year is
/// appended when the descriptor carries one.
pub fn dataset_source_name(dataset_id: &str, meta: Option<&DatasetMeta>) -> String {
    let mut label = match meta {
        Some(meta) if !meta.name.is_empty() => meta.name.clone(),
        _ => dataset_id.to_uppercase(),
    };
    if let Some(meta) = meta {
        if !meta.year.is_empty() {
            label = format!("{} {}", label, meta.year);
        }
    }
    label
}

/// Render a payload value as trimmed text. Non-string scalars keep their
/// JSON rendering; null becomes empty.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Resolve a field through its ordered candidate keys. The first key
/// present in the record wins, even if its value is empty.
fn resolve_field(item: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| item.get(*key))
        .map(value_text)
        .unwrap_or_default()
}

/// Normalize decoded payload records into conference rows.
///
/// Non-object items are skipped, as are records whose name is empty after
/// trimming. Every produced row carries the given dataset identifier and
/// resolved source label.
pub fn rows_from_payload(payload: &[Value], dataset_id: &str, source: &str) -> Vec<ConferenceRow> {
    let mut rows = Vec::new();

    for item in payload {
        let Some(record) = item.as_object() else {
            continue;
        };
        let name = record.get("name").map(value_text).unwrap_or_default();
        if name.is_empty() {
            continue;
        }

        let abbrv = resolve_field(record, ABBRV_KEYS);
        let rank = resolve_field(record, RANK_KEYS);

        let mut candidates = vec![name.clone(), abbrv.clone()];
        for key in EXTRA_ALIAS_KEYS {
            candidates.push(record.get(*key).map(value_text).unwrap_or_default());
        }
        let aliases = dedupe_aliases(candidates);

        rows.push(ConferenceRow {
            name,
            abbrv,
            rank,
            source: source.to_string(),
            dataset_id: dataset_id.to_string(),
            aliases,
        });
    }

    rows
}

/// Normalize one raw table row from the fallback path.
///
/// Expects exactly 4 cells: name, abbreviation, rank, and a trailing cell
/// that is discarded. Any other cell count, or an empty name, yields
/// `None`. Fallback rows are attributed to the landing page itself.
pub fn row_from_cells(cells: &[String]) -> Option<ConferenceRow> {
    let [name, abbrv, rank, _] = cells else {
        return None;
    };
    let name = name.trim().to_string();
    if name.is_empty() {
        return None;
    }
    let abbrv = abbrv.trim().to_string();
    let rank = rank.trim().to_string();
    let aliases = dedupe_aliases([name.as_str(), abbrv.as_str()]);

    Some(ConferenceRow {
        name,
        abbrv,
        rank,
        source: FALLBACK_SOURCE.to_string(),
        dataset_id: FALLBACK_DATASET_ID.to_string(),
        aliases,
    })
}
