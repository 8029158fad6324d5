//! Scrape orchestration: landing page fetch, per-dataset loop, fallback.
//!
//! One run is strictly sequential. The landing page is fetched first and
//! its failure is fatal; each dataset resource is then fetched in document
//! order, and a failure there only skips that one resource. The optional
//! inter-fetch delay is a courtesy throttle on a sequential stream, not a
//! concurrency control — there is no parallel fetching.
//!
//! HTTP access goes through the [`Fetch`] seam so the orchestrator can be
//! driven by an in-memory fetcher in tests.

use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use url::Url;

use crate::errors::ScrapeError;
use crate::extract::{extract_dataset_scripts, parse_dataset_metadata, parse_dataset_payload};
use crate::fallback;
use crate::models::{ConferenceRow, DatasetMeta};
use crate::normalize::{dataset_source_name, rows_from_payload};

/// Browser-like identification sent with every request; the site serves
/// plain scripts either way but some mirrors reject default client agents.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_5) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

const LANDING_TIMEOUT: Duration = Duration::from_secs(30);
const DATASET_TIMEOUT: Duration = Duration::from_secs(60);

/// Minimal HTTP seam: fetch a URL and return its body as text.
///
/// Non-success statuses are errors. The production implementation is
/// [`HttpFetcher`]; tests substitute an in-memory map.
pub trait Fetch {
    async fn get_text(&self, url: &str, timeout: Duration) -> Result<String, ScrapeError>;
}

/// [`Fetch`] implementation backed by a shared `reqwest` client.
#[derive(Debug)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, ScrapeError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn get_text(&self, url: &str, timeout: Duration) -> Result<String, ScrapeError> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Http {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.text().await?)
    }
}

/// Derive the dataset identifier from a script locator: the filename text
/// before the first `.`, lowercased (`data/era2010.min.js` -> `era2010`).
fn dataset_id_from_src(script_src: &str) -> String {
    let file = script_src.rsplit('/').next().unwrap_or(script_src);
    let stem = file.split('.').next().unwrap_or(file);
    stem.to_lowercase()
}

/// Fetch one dataset script and normalize its payload into rows.
async fn fetch_dataset_rows<F: Fetch>(
    fetcher: &F,
    base: &Url,
    script_src: &str,
    meta: Option<&DatasetMeta>,
) -> Result<Vec<ConferenceRow>, ScrapeError> {
    let url = base.join(script_src)?;
    info!(%url, "Downloading dataset");

    let body = fetcher.get_text(url.as_str(), DATASET_TIMEOUT).await?;
    let payload = parse_dataset_payload(&body)?;

    let dataset_id = dataset_id_from_src(script_src);
    let source_name = dataset_source_name(&dataset_id, meta);
    let rows = rows_from_payload(&payload, &dataset_id, &source_name);

    info!(count = rows.len(), source = %source_name, "Parsed dataset rows");
    Ok(rows)
}

/// Run one full scrape and return the accumulated conference rows.
///
/// Fails only when the landing page itself cannot be fetched. If the page
/// references dataset scripts, each is processed in order with
/// per-resource failure isolation; otherwise the rendered table is parsed
/// directly. The two paths are mutually exclusive.
///
/// When `max_rows` is set, the result is truncated to exactly that count
/// and, on the dataset path, remaining resources are not fetched.
#[instrument(level = "info", skip(fetcher))]
pub async fn scrape_conferences<F: Fetch>(
    fetcher: &F,
    base_url: &str,
    delay: Duration,
    max_rows: Option<usize>,
) -> Result<Vec<ConferenceRow>, ScrapeError> {
    info!("Fetching landing page");
    let html = fetcher.get_text(base_url, LANDING_TIMEOUT).await?;
    let base = Url::parse(base_url)?;

    let metas = parse_dataset_metadata(&html);
    let dataset_scripts = extract_dataset_scripts(&html);

    if dataset_scripts.is_empty() {
        warn!("No dataset scripts found; falling back to parsing first rendered page only");
        let mut rows = fallback::parse_first_page(&html);
        if let Some(cap) = max_rows {
            rows.truncate(cap);
        }
        return Ok(rows);
    }

    let mut rows: Vec<ConferenceRow> = Vec::new();
    let last = dataset_scripts.len() - 1;

    for (index, script_src) in dataset_scripts.iter().enumerate() {
        let dataset_id = dataset_id_from_src(script_src);
        let meta = metas.get(&dataset_id);

        let batch = match fetch_dataset_rows(fetcher, &base, script_src, meta).await {
            Ok(batch) => batch,
            Err(e) => {
                error!(script = %script_src, error = %e, "Failed to process dataset; skipping");
                continue;
            }
        };
        rows.extend(batch);

        if let Some(cap) = max_rows {
            if rows.len() >= cap {
                info!(max_rows = cap, "Reached row cap; stopping early");
                rows.truncate(cap);
                return Ok(rows);
            }
        }
        if !delay.is_zero() && index < last {
            sleep(delay).await;
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    const BASE: &str = "http://www.conferenceranks.com/";

    /// In-memory [`Fetch`] backed by a URL -> body map; records every hit.
    struct MapFetcher {
        pages: HashMap<String, String>,
        hits: RefCell<Vec<String>>,
    }

    impl MapFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
                hits: RefCell::new(Vec::new()),
            }
        }

        fn hits(&self) -> Vec<String> {
            self.hits.borrow().clone()
        }
    }

    impl Fetch for MapFetcher {
        async fn get_text(&self, url: &str, _timeout: Duration) -> Result<String, ScrapeError> {
            self.hits.borrow_mut().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ScrapeError::Http {
                    url: url.to_string(),
                    status: reqwest::StatusCode::NOT_FOUND,
                })
        }
    }

    const TWO_DATASET_LANDING: &str = r#"
        <script>
        function setDataEra2010(rank_data) {
            var dataset = { name: 'ERA', year: 2010 };
        };
        function setDataCore2021(rank_data) {
            var dataset = { name: 'CORE', year: 2021 };
        };
        </script>
        <script src="data/era2010.min.js"></script>
        <script src="data/core2021.min.js"></script>
    "#;

    #[test]
    fn test_dataset_id_from_src() {
        assert_eq!(dataset_id_from_src("data/era2010.min.js"), "era2010");
        assert_eq!(dataset_id_from_src("data/Qualis2012.js"), "qualis2012");
        assert_eq!(dataset_id_from_src("plain"), "plain");
    }

    #[tokio::test]
    async fn test_two_datasets_yield_attributed_rows() {
        let fetcher = MapFetcher::new(&[
            (BASE, TWO_DATASET_LANDING),
            (
                "http://www.conferenceranks.com/data/era2010.min.js",
                r#"var d = [{"name":"Conf One","abbrv":"C1","rank":"A"}];"#,
            ),
            (
                "http://www.conferenceranks.com/data/core2021.min.js",
                r#"var d = [{"name":"Conf Two","abbrv":"C2","rank":"B"}];"#,
            ),
        ]);

        let rows = scrape_conferences(&fetcher, BASE, Duration::ZERO, None)
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].dataset_id, "era2010");
        assert_eq!(rows[0].source, "ERA 2010");
        assert_eq!(rows[1].dataset_id, "core2021");
        assert_eq!(rows[1].source, "CORE 2021");
    }

    #[tokio::test]
    async fn test_row_cap_halts_before_next_fetch() {
        let fetcher = MapFetcher::new(&[
            (BASE, TWO_DATASET_LANDING),
            (
                "http://www.conferenceranks.com/data/era2010.min.js",
                r#"var d = [{"name":"Conf One"}];"#,
            ),
            (
                "http://www.conferenceranks.com/data/core2021.min.js",
                r#"var d = [{"name":"Conf Two"}];"#,
            ),
        ]);

        let rows = scrape_conferences(&fetcher, BASE, Duration::ZERO, Some(1))
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Conf One");
        // Landing page plus the first dataset only.
        assert_eq!(fetcher.hits().len(), 2);
    }

    #[tokio::test]
    async fn test_row_cap_truncates_within_batch() {
        let fetcher = MapFetcher::new(&[
            (BASE, TWO_DATASET_LANDING),
            (
                "http://www.conferenceranks.com/data/era2010.min.js",
                r#"var d = [{"name":"Conf One"},{"name":"Conf Two"},{"name":"Conf Three"}];"#,
            ),
            (
                "http://www.conferenceranks.com/data/core2021.min.js",
                r#"var d = [{"name":"Conf Four"}];"#,
            ),
        ]);

        let rows = scrape_conferences(&fetcher, BASE, Duration::ZERO, Some(2))
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "Conf Two");
    }

    #[tokio::test]
    async fn test_bad_resource_is_skipped_not_fatal() {
        let fetcher = MapFetcher::new(&[
            (BASE, TWO_DATASET_LANDING),
            // era2010 is missing from the map -> 404 on fetch.
            (
                "http://www.conferenceranks.com/data/core2021.min.js",
                r#"var d = [{"name":"Conf Two"}];"#,
            ),
        ]);

        let rows = scrape_conferences(&fetcher, BASE, Duration::ZERO, None)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].dataset_id, "core2021");
    }

    #[tokio::test]
    async fn test_unparseable_payload_is_skipped() {
        let fetcher = MapFetcher::new(&[
            (BASE, TWO_DATASET_LANDING),
            (
                "http://www.conferenceranks.com/data/era2010.min.js",
                "document.write('no array here');",
            ),
            (
                "http://www.conferenceranks.com/data/core2021.min.js",
                r#"var d = [{"name":"Conf Two"}];"#,
            ),
        ]);

        let rows = scrape_conferences(&fetcher, BASE, Duration::ZERO, None)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Conf Two");
    }

    #[tokio::test]
    async fn test_landing_failure_is_fatal() {
        let fetcher = MapFetcher::new(&[]);
        let result = scrape_conferences(&fetcher, BASE, Duration::ZERO, None).await;
        assert!(matches!(result, Err(ScrapeError::Http { .. })));
    }

    #[tokio::test]
    async fn test_no_scripts_falls_back_to_table() {
        let landing = r#"
            <html><body>
            <table id="datatable">
                <tr><td>Fallback Conf</td><td>FC</td><td>A</td><td>x</td></tr>
                <tr><td>Second Conf</td><td>SC</td><td>B</td><td>y</td></tr>
            </table>
            </body></html>
        "#;
        let fetcher = MapFetcher::new(&[(BASE, landing)]);

        let rows = scrape_conferences(&fetcher, BASE, Duration::ZERO, Some(1))
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Fallback Conf");
        assert_eq!(rows[0].dataset_id, "html");
        // Only the landing page was ever fetched.
        assert_eq!(fetcher.hits(), vec![BASE.to_string()]);
    }
}
