// src/lib.rs
// =============================================================================
// fmcsa_search: keyword search against the FMCSA SAFER carrier registry.
//
// A search fetches the registry's keyword results page, pulls out one row per
// carrier, follows each carrier's snapshot link to read its power units, and
// returns the lot as a table that can be printed or exported as CSV.
//
// Modules:
// - fetch: HTTP transport, per-URL cache
// - extract: HTML parsing of search and detail pages
// - pipeline: the orchestrator and the result table
// - export: CSV output
// - config, error, telemetry: settings, error types, logging setup
// =============================================================================

pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod telemetry;

pub use config::ScrapeConfig;
pub use error::{FetchError, ParseError, PipelineError};
pub use pipeline::{CarrierRow, Enrichment, NullProgress, ProgressSink, ResultTable, Scraper, COLUMNS};
