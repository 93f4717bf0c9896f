// src/pipeline/run.rs
// =============================================================================
// The orchestrator: search term in, enriched carrier table out.
//
// How a run goes:
// 1. Validate the term (empty -> EmptyInput, no network call)
// 2. Fetch and parse the search page (either failing is fatal)
// 3. Enrich every row from its detail page, in extraction order
// 4. Report (processed, total) after each row
// 5. Return the table, even when every enrichment failed
//
// With concurrency > 1 several detail pages are fetched at once, but rows
// are still collected in extraction order (stream::buffered, not
// buffer_unordered), so output order and progress never depend on which
// fetch finishes first.
// =============================================================================

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::pin::pin;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

use super::enrich::{enrich, Enrichment};
use super::progress::ProgressSink;
use crate::config::ScrapeConfig;
use crate::error::PipelineError;
use crate::extract::{build_search_url, extract_rows, RowDescriptor, SearchTerm};
use crate::fetch::{Fetcher, ReqwestTransport, Transport};

/// Column headings of the produced table, in order.
/// Consumers diff exports against these exact strings.
pub const COLUMNS: [&str; 4] = ["CARRIER/DBA NAME", "LOCATION", "CARRIER_LINK", "POWER_UNITS"];

/// One fully enriched carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarrierRow {
    #[serde(rename = "CARRIER/DBA NAME")]
    pub name: String,
    #[serde(rename = "LOCATION")]
    pub location: String,
    #[serde(rename = "CARRIER_LINK")]
    pub carrier_link: String,
    #[serde(rename = "POWER_UNITS")]
    pub power_units: Enrichment,
}

impl CarrierRow {
    pub fn new(row: RowDescriptor, power_units: Enrichment) -> Self {
        Self {
            name: row.name,
            location: row.location,
            carrier_link: row.detail_link,
            power_units,
        }
    }

    /// Cell values as text, in COLUMNS order
    pub fn cells(&self) -> [String; 4] {
        [
            self.name.clone(),
            self.location.clone(),
            self.carrier_link.clone(),
            self.power_units.to_string(),
        ]
    }
}

/// The result of a run, rows in the order the search page listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<CarrierRow>,
}

impl ResultTable {
    pub fn new(rows: Vec<CarrierRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[CarrierRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose POWER_UNITS cell holds a failure marker
    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|row| row.power_units.is_failure()).count()
    }
}

pub struct Scraper {
    fetcher: Fetcher,
    config: ScrapeConfig,
    base: Url,
}

impl Scraper {
    /// A scraper talking to the network through reqwest.
    pub fn new(config: ScrapeConfig) -> Result<Self, PipelineError> {
        let transport =
            ReqwestTransport::new().map_err(|e| PipelineError::Client(e.to_string()))?;
        Self::with_transport(Arc::new(transport), config)
    }

    /// A scraper using the given transport (fakes in tests, for instance).
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        config: ScrapeConfig,
    ) -> Result<Self, PipelineError> {
        // A trailing '/' keeps any sub-path when the search path is joined on
        let origin = config.origin.clone();
        let config = config.with_origin(origin);

        let base = Url::parse(&config.origin).map_err(|e| PipelineError::InvalidOrigin {
            origin: config.origin.clone(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(PipelineError::InvalidOrigin {
                origin: config.origin.clone(),
                reason: "cannot be used as a base URL".to_string(),
            });
        }

        Ok(Self {
            fetcher: Fetcher::new(transport, &config),
            config,
            base,
        })
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    // Runs one search end to end.
    //
    // Parameters:
    //   term: raw search text as typed by the user
    //   progress: receives (processed, total) as rows complete
    //
    // Returns: one row per extracted result, or a fatal PipelineError
    pub async fn run<P>(&self, term: &str, progress: &mut P) -> Result<ResultTable, PipelineError>
    where
        P: ProgressSink + ?Sized,
    {
        let term = SearchTerm::parse(term)?;
        let url = build_search_url(&self.base, &term).map_err(|e| PipelineError::InvalidOrigin {
            origin: self.config.origin.clone(),
            reason: e.to_string(),
        })?;
        info!(term = %term.as_str(), %url, "searching carrier registry");

        let page = self
            .fetcher
            .fetch(url.as_str())
            .await
            .map_err(PipelineError::SearchFetchFailed)?;

        let descriptors =
            extract_rows(&page.text(), &self.base).map_err(PipelineError::SearchParseFailed)?;

        let total = descriptors.len();
        info!(total, "search page parsed");
        progress.begin(total);

        let concurrency = self.config.concurrency.max(1);
        let mut enriched = pin!(stream::iter(descriptors)
            .map(|row| async move {
                let power_units = enrich(&self.fetcher, &row.detail_link).await;
                CarrierRow::new(row, power_units)
            })
            .buffered(concurrency));

        let mut rows = Vec::with_capacity(total);
        while let Some(row) = enriched.next().await {
            if row.power_units.is_failure() {
                warn!(
                    carrier = %row.name,
                    url = %row.carrier_link,
                    power_units = %row.power_units,
                    "enrichment failed"
                );
            }
            rows.push(row);
            progress.report(rows.len(), total);
        }
        progress.finish();

        let table = ResultTable::new(rows);
        info!(rows = table.len(), failed = table.failed_count(), "search complete");
        Ok(table)
    }
}
