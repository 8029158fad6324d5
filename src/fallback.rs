//! Fallback table scraping for the rendered landing page.
//!
//! Used only when the landing page references no `data/*.js` scripts at
//! all — typically after an upstream layout change. Only the first rendered
//! page of the `#datatable` element is available in that case, so the
//! fallback yields a reduced dataset rather than failing the run.

use scraper::{Html, Selector};
use tracing::{info, warn};

use crate::models::ConferenceRow;
use crate::normalize::row_from_cells;

/// Parse conference rows directly out of the rendered `#datatable`.
///
/// Rows that do not have exactly 4 cells (header rows, decorations) are
/// skipped. A missing table logs a warning and yields no rows.
pub fn parse_first_page(html: &str) -> Vec<ConferenceRow> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table#datatable").unwrap();
    let tr_selector = Selector::parse("tr").unwrap();
    let td_selector = Selector::parse("td").unwrap();

    let Some(table) = document.select(&table_selector).next() else {
        warn!("Could not locate #datatable in HTML; fallback parsing aborted");
        return Vec::new();
    };

    let mut rows = Vec::new();
    for tr in table.select(&tr_selector) {
        let cells: Vec<String> = tr
            .select(&td_selector)
            .map(|td| td.text().collect::<Vec<_>>().join(" ").trim().to_string())
            .collect();
        if let Some(row) = row_from_cells(&cells) {
            rows.push(row);
        }
    }

    info!(count = rows.len(), "Parsed fallback table rows");
    rows
}
