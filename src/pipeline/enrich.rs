// src/pipeline/enrich.rs
// =============================================================================
// The detail enricher: follow one carrier link and read its power units.
//
// This never fails. Every way a detail page can go wrong becomes a variant of
// Enrichment, and each variant renders to the fixed text that ends up in the
// POWER_UNITS column:
//
//   Value(v)       -> v
//   NotFound       -> "Data not found"
//   Timeout        -> "Timeout Error"
//   NetworkError   -> "Network Error"
//   HttpStatus(s)  -> "Error: HTTP s"
//
// One bad detail page only ever affects its own row.
// =============================================================================

use serde::{Serialize, Serializer};
use std::fmt;
use tracing::debug;

use crate::error::FetchError;
use crate::extract::extract_detail_cell;
use crate::fetch::Fetcher;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    /// Text found in the enrichment cell
    Value(String),
    /// The page loaded but the expected row/cell was absent
    NotFound,
    Timeout,
    NetworkError,
    HttpStatus(u16),
}

impl Enrichment {
    /// True for every variant except Value
    pub fn is_failure(&self) -> bool {
        !matches!(self, Enrichment::Value(_))
    }
}

impl From<FetchError> for Enrichment {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Timeout => Enrichment::Timeout,
            FetchError::NetworkFailure(_) => Enrichment::NetworkError,
            FetchError::UnexpectedStatus(status) => Enrichment::HttpStatus(status),
        }
    }
}

impl fmt::Display for Enrichment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Enrichment::Value(value) => f.write_str(value),
            Enrichment::NotFound => f.write_str("Data not found"),
            Enrichment::Timeout => f.write_str("Timeout Error"),
            Enrichment::NetworkError => f.write_str("Network Error"),
            Enrichment::HttpStatus(status) => write!(f, "Error: HTTP {status}"),
        }
    }
}

// Exported tables carry the rendered text, not the variant
impl Serialize for Enrichment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// Fetches a carrier's detail page and extracts its power units.
pub async fn enrich(fetcher: &Fetcher, detail_link: &str) -> Enrichment {
    let page = match fetcher.fetch(detail_link).await {
        Ok(page) => page,
        Err(error) => {
            debug!(url = %detail_link, %error, "detail fetch failed");
            return error.into();
        }
    };

    match extract_detail_cell(&page.text()) {
        Some(value) => Enrichment::Value(value),
        None => Enrichment::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScrapeConfig;
    use crate::fetch::{FetchResponse, FetchResult, Transport};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    // Answers every request with the same canned result
    struct FixedTransport(FetchResult);

    #[async_trait]
    impl Transport for FixedTransport {
        async fn get(&self, _url: &str, _timeout: Duration) -> FetchResult {
            self.0.clone()
        }
    }

    async fn enrich_with(result: FetchResult) -> Enrichment {
        let fetcher = Fetcher::new(Arc::new(FixedTransport(result)), &ScrapeConfig::default());
        enrich(&fetcher, "https://safer.fmcsa.dot.gov/query.asp?n=1").await
    }

    fn html(body: String) -> FetchResult {
        Ok(FetchResponse::ok(body))
    }

    #[tokio::test]
    async fn test_extracts_value() {
        let mut rows = String::new();
        for i in 1..=17 {
            rows.push_str(&format!("<tr><td>{}</td></tr>", if i == 17 { "12" } else { "-" }));
        }
        let result = enrich_with(html(format!("<table>{rows}</table>"))).await;
        assert_eq!(result, Enrichment::Value("12".to_string()));
        assert_eq!(result.to_string(), "12");
        assert!(!result.is_failure());
    }

    #[tokio::test]
    async fn test_missing_row_is_data_not_found() {
        let result = enrich_with(html("<table><tr><td>1</td></tr></table>".to_string())).await;
        assert_eq!(result.to_string(), "Data not found");
    }

    #[tokio::test]
    async fn test_http_404_mentions_status() {
        let result = enrich_with(Err(FetchError::UnexpectedStatus(404))).await;
        assert_eq!(result.to_string(), "Error: HTTP 404");
        assert!(result.is_failure());
    }

    #[tokio::test]
    async fn test_transport_failures_render_fixed_text() {
        assert_eq!(
            enrich_with(Err(FetchError::Timeout)).await.to_string(),
            "Timeout Error"
        );
        assert_eq!(
            enrich_with(Err(FetchError::NetworkFailure("reset".into())))
                .await
                .to_string(),
            "Network Error"
        );
    }

    #[test]
    fn test_serializes_as_rendered_text() {
        let json = serde_json::to_string(&Enrichment::HttpStatus(500)).unwrap();
        assert_eq!(json, "\"Error: HTTP 500\"");
    }
}
