//! Extraction of dataset metadata, script references, and array payloads.
//!
//! The landing page embeds its data in two places:
//!
//! 1. Inline `setData<Id>` helper functions whose first statement assigns a
//!    `dataset` object literal — these carry the display name, description,
//!    and year of each ranking source.
//! 2. `<script src="data/...">` tags referencing the actual dataset files.
//!
//! The dataset files themselves are JavaScript, not JSON: a variable
//! assignment (or similar wrapper) around one big JSON array. Rather than
//! parse the JavaScript, [`parse_dataset_payload`] scans for the outermost
//! brackets and decodes the substring between them — the wrapper code never
//! itself contains a valid top-level array, so the scan is sufficient.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::errors::ScrapeError;
use crate::models::DatasetMeta;

static SET_DATA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)function\s+setData([A-Za-z0-9_]+)\s*\(rank_data\)\s*\{\s*var\s+dataset\s*=\s*\{(.*?)\};",
    )
    .unwrap()
});

static META_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"name\s*:\s*'([^']*)'").unwrap());

static META_DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"description\s*:\s*'([^']*)'").unwrap());

static META_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"year\s*:\s*([0-9]{4})").unwrap());

static DATASET_SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<script[^>]+src=["'](data/[^"']+)["']"#).unwrap());

/// Extract per-dataset metadata from the inline `setData*` helpers.
///
/// Identifiers are lowercased. Optional fields default to empty strings; in
/// particular an absent name is left empty here so the source-label
/// resolution can apply its uppercased-id fallback uniformly.
///
/// Duplicate identifiers are last-write-wins, matching the upstream page
/// behavior. Never fails — markup without any helper yields an empty map.
pub fn parse_dataset_metadata(html: &str) -> HashMap<String, DatasetMeta> {
    let mut metas = HashMap::new();

    for captures in SET_DATA_RE.captures_iter(html) {
        let dataset_id = captures[1].to_lowercase();
        let body = &captures[2];

        let field = |re: &Regex| {
            re.captures(body)
                .map(|c| c[1].to_string())
                .unwrap_or_default()
        };

        let meta = DatasetMeta {
            id: dataset_id.clone(),
            name: field(&META_NAME_RE),
            description: field(&META_DESCRIPTION_RE),
            year: field(&META_YEAR_RE),
        };
        metas.insert(dataset_id, meta);
    }

    let mut keys: Vec<&String> = metas.keys().collect();
    keys.sort();
    debug!(?keys, "Discovered dataset metadata");
    metas
}

/// Extract the dataset script references from the landing page markup.
///
/// Returns the relative `data/...` locators, deduplicated, in first-seen
/// order. Possibly empty; the orchestrator treats that as the signal to
/// fall back to table scraping.
pub fn extract_dataset_scripts(html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut scripts = Vec::new();

    for captures in DATASET_SCRIPT_RE.captures_iter(html) {
        let src = captures[1].to_string();
        if seen.insert(src.clone()) {
            scripts.push(src);
        }
    }

    debug!(?scripts, "Dataset scripts");
    scripts
}

/// Decode the JSON array embedded in a dataset script body.
///
/// Scans for the first `[` and the last `]` and decodes the inclusive
/// substring. Fails with [`ScrapeError::Payload`] when either bracket is
/// missing or the closing one does not come after the opening one, and with
/// [`ScrapeError::Json`] when the substring is not a valid array.
pub fn parse_dataset_payload(raw_script: &str) -> Result<Vec<Value>, ScrapeError> {
    let start = raw_script.find('[').ok_or(ScrapeError::Payload)?;
    let end = raw_script.rfind(']').ok_or(ScrapeError::Payload)?;
    if end <= start {
        return Err(ScrapeError::Payload);
    }

    let blob = &raw_script[start..=end];
    Ok(serde_json::from_str(blob)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LANDING_SNIPPET: &str = r#"
        <script type="text/javascript">
        function setDataEra2010(rank_data) {
            var dataset = {
                name: 'ERA',
                description: 'Excellence in Research for Australia',
                year: 2010
            };
            draw(dataset, rank_data);
        };
        function setDataQualis2012(rank_data) {
            var dataset = { name: 'Qualis' };
            draw(dataset, rank_data);
        };
        </script>
        <script src="data/era2010.min.js"></script>
        <SCRIPT SRC='data/qualis2012.min.js'></SCRIPT>
        <script src="data/era2010.min.js"></script>
        <script src="js/vendor/jquery.js"></script>
    "#;

    #[test]
    fn test_metadata_fields() {
        let metas = parse_dataset_metadata(LANDING_SNIPPET);
        assert_eq!(metas.len(), 2);

        let era = &metas["era2010"];
        assert_eq!(era.id, "era2010");
        assert_eq!(era.name, "ERA");
        assert_eq!(era.description, "Excellence in Research for Australia");
        assert_eq!(era.year, "2010");

        let qualis = &metas["qualis2012"];
        assert_eq!(qualis.name, "Qualis");
        assert_eq!(qualis.description, "");
        assert_eq!(qualis.year, "");
    }

    #[test]
    fn test_metadata_missing_name_stays_empty() {
        let html = r#"
            function setDataGgs2021(rank_data) {
                var dataset = { year: 2021 };
            };
        "#;
        let metas = parse_dataset_metadata(html);
        assert_eq!(metas["ggs2021"].name, "");
        assert_eq!(metas["ggs2021"].year, "2021");
    }

    #[test]
    fn test_metadata_duplicate_id_last_write_wins() {
        let html = r#"
            function setDataCore2021(rank_data) {
                var dataset = { name: 'First' };
            };
            function setDataCore2021(rank_data) {
                var dataset = { name: 'Second' };
            };
        "#;
        let metas = parse_dataset_metadata(html);
        assert_eq!(metas.len(), 1);
        assert_eq!(metas["core2021"].name, "Second");
    }

    #[test]
    fn test_metadata_absent_yields_empty_map() {
        assert!(parse_dataset_metadata("<html><body></body></html>").is_empty());
    }

    #[test]
    fn test_script_extraction_dedupes_preserving_order() {
        let scripts = extract_dataset_scripts(LANDING_SNIPPET);
        assert_eq!(
            scripts,
            vec!["data/era2010.min.js", "data/qualis2012.min.js"]
        );
    }

    #[test]
    fn test_script_extraction_ignores_non_data_sources() {
        let scripts = extract_dataset_scripts(r#"<script src="js/app.js"></script>"#);
        assert!(scripts.is_empty());
    }

    #[test]
    fn test_payload_parse_with_wrapper() {
        let payload = parse_dataset_payload(r#"var x = [{"name":"A"}];"#).unwrap();
        assert_eq!(payload.len(), 1);
        assert_eq!(payload[0]["name"], "A");
    }

    #[test]
    fn test_payload_parse_no_opening_bracket() {
        let err = parse_dataset_payload("var x = 1;").unwrap_err();
        assert!(matches!(err, ScrapeError::Payload));
    }

    #[test]
    fn test_payload_parse_brackets_out_of_order() {
        let err = parse_dataset_payload("] oops [").unwrap_err();
        assert!(matches!(err, ScrapeError::Payload));
    }

    #[test]
    fn test_payload_parse_invalid_json() {
        let err = parse_dataset_payload("var x = [not json];").unwrap_err();
        assert!(matches!(err, ScrapeError::Json(_)));
    }
}
