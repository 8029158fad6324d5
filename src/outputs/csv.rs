//! CSV rendering of the scraped rows.
//!
//! Fixed header `name,abbrv,rank,source`; fields containing a comma,
//! double quote, or newline are quoted with doubled inner quotes.

use itertools::Itertools;

use crate::models::ConferenceRow;

/// Column header, matching [`ConferenceRow::csv_fields`] order.
pub const CSV_HEADER: &str = "name,abbrv,rank,source";

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render the rows as a CSV document, header included.
pub fn render(rows: &[ConferenceRow]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for row in rows {
        let line = row.csv_fields().iter().map(|f| escape_field(f)).join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}
