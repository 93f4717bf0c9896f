// src/pipeline/mod.rs
// =============================================================================
// The scrape pipeline: search page -> rows -> enriched rows -> table.
//
// Submodules:
// - run: the Scraper (orchestrator) and the ResultTable it produces
// - enrich: per-row detail page lookup, failures encoded as values
// - progress: the ProgressSink trait the front end implements
// =============================================================================

mod enrich;
mod progress;
mod run;

pub use enrich::{enrich, Enrichment};
pub use progress::{NullProgress, ProgressSink};
pub use run::{CarrierRow, ResultTable, Scraper, COLUMNS};
