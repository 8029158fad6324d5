//! Error taxonomy for the scrape pipeline.
//!
//! Failures split into two classes with very different blast radii:
//!
//! - A landing-page failure ([`ScrapeError::Http`] or a transport error on
//!   the first fetch) is fatal and aborts the run with exit code 1.
//! - A failure on a single dataset resource (fetch, bracket scan, or JSON
//!   decode) is logged and skipped; the run continues with the remaining
//!   resources.
//!
//! The caller decides which class applies — the variants themselves carry no
//! retry or recovery policy. There are no retries anywhere.

use thiserror::Error;

/// Errors produced while fetching pages or decoding dataset payloads.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The server answered with a non-success status.
    #[error("request to {url} failed with status {status}")]
    Http {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The dataset script contained no bracketed array payload, or the
    /// closing bracket preceded the opening one.
    #[error("unable to locate JSON array in dataset script")]
    Payload,

    /// The bracketed substring was not a valid JSON array.
    #[error("dataset payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Connection, TLS, or timeout failure from the HTTP client.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A resource locator could not be resolved against the base URL.
    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// Filesystem failure while writing the output artifact.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
