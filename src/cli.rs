//! Command-line interface definitions for the conference ranks scraper.
//!
//! This module defines the CLI arguments and options using the `clap`
//! crate. Defaults match the published extension workflow: JSON output
//! into the extension's data directory, with a half-second courtesy
//! throttle between dataset downloads.

use clap::{Parser, ValueEnum};

use crate::models::BASE_URL;

/// Command-line arguments for the scraper.
///
/// # Examples
///
/// ```sh
/// # Rebuild the extension dataset with verbose logging
/// confrank_scraper --verbose
///
/// # Write CSV to a custom path and also print it
/// confrank_scraper --output out/conferences.csv --format csv --stdout
///
/// # Print JSON to stdout only
/// confrank_scraper --output -
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Landing page URL hosting the embedded datasets
    #[arg(long, default_value = BASE_URL)]
    pub base_url: String,

    /// Seconds to sleep between dataset downloads (courtesy throttle)
    #[arg(long, default_value_t = 0.5)]
    pub delay: f64,

    /// Stop after collecting this many rows
    #[arg(long)]
    pub max_rows: Option<usize>,

    /// Output path for the structured dataset ("-" prints to stdout only)
    #[arg(short, long, default_value = "extension/scholar-rank/data/conferences.json")]
    pub output: String,

    /// Serialization format (json integrates with the extension)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Also print the dataset to stdout
    #[arg(long)]
    pub stdout: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Serialization format for the output artifact.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}
