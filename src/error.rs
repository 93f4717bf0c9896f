// src/error.rs
// =============================================================================
// Error types for the library.
//
// Two families:
// - Fatal errors (PipelineError) abort a whole run and reach the caller
//   as a distinct failure outcome.
// - Per-row failures are NOT errors here; they are encoded as data in the
//   result table (see pipeline::Enrichment).
//
// FetchError is shared: on the search page it becomes fatal
// (PipelineError::SearchFetchFailed), on a detail page it becomes a
// placeholder value in that row's POWER_UNITS cell.
// =============================================================================

use thiserror::Error;

/// Why a single HTTP fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Connection, DNS, TLS or body read failure
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The server answered with a non-success status code
    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),
}

/// The search page did not have the structure we depend on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("result table not found: page has {found} table(s), expected at least {expected}")]
    TableNotFound { found: usize, expected: usize },
}

/// Fatal outcome of a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("search term is empty")]
    EmptyInput,

    #[error("failed to fetch search page: {0}")]
    SearchFetchFailed(#[source] FetchError),

    #[error("failed to parse search page: {0}")]
    SearchParseFailed(#[source] ParseError),

    /// The configured site origin is not a valid base URL
    #[error("invalid site origin {origin:?}: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    /// The HTTP client itself could not be constructed
    #[error("could not build HTTP client: {0}")]
    Client(String),
}
