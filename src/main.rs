//! # Conference Ranks Scraper
//!
//! A scraper for conferenceranks.com that rebuilds the conference ranking
//! dataset consumed by the scholar-rank browser extension.
//!
//! ## Pipeline
//!
//! 1. **Fetch**: download the landing page HTML
//! 2. **Discover**: extract dataset metadata and `data/*.js` references
//! 3. **Collect**: fetch each dataset sequentially, decode the embedded
//!    JSON array, and normalize rows (falling back to scraping the
//!    rendered table when no dataset scripts exist)
//! 4. **Output**: serialize the aggregate as JSON or CSV
//!
//! ## Usage
//!
//! ```sh
//! confrank_scraper --verbose
//! confrank_scraper --output data/conferences.json --stdout
//! ```
//!
//! Exits 0 on success (including zero rows extracted, which only warns)
//! and 1 on a landing-page fetch error or any unexpected failure.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod errors;
mod extract;
mod fallback;
mod models;
mod normalize;
mod outputs;
mod scrape;

use cli::Cli;
use scrape::{HttpFetcher, scrape_conferences};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    // --- Tracing init ---
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    debug!(?args, "Parsed CLI arguments");

    let fetcher = match HttpFetcher::new() {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    let delay = Duration::from_secs_f64(args.delay.max(0.0));
    let rows = match scrape_conferences(&fetcher, &args.base_url, delay, args.max_rows).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Error while scraping");
            return ExitCode::FAILURE;
        }
    };

    if rows.is_empty() {
        warn!("No conference rows extracted");
    }

    if let Err(e) = outputs::write_output(&rows, &args.output, args.format, args.stdout).await {
        error!(error = %e, path = %args.output, "Failed to write output");
        return ExitCode::FAILURE;
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, count = rows.len(), "Execution complete");
    ExitCode::SUCCESS
}
