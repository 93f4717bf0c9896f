// src/extract/search.rs
// =============================================================================
// The keyword search page.
//
// Two jobs:
// 1. Turn a raw search term into the registry's query URL
// 2. Pull one RowDescriptor out of every usable row of the result table
//
// The result table is the third <table> in document order. Its first row
// holds headings. Every following row is a candidate; rows without an anchor
// in the first cell, or with fewer than two cells, are layout noise from the
// site and are skipped quietly.
// =============================================================================

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use scraper::{ElementRef, Html};
use serde::Serialize;
use tracing::debug;
use url::Url;

use super::{cell_text, selector, HEADER_ROWS, MIN_RESULT_CELLS, RESULT_TABLE_INDEX, SEARCH_PATH};
use crate::error::{ParseError, PipelineError};

// Characters left alone when encoding the search string: the unreserved
// set plus '/'. Everything else, including the '*' wildcards, is escaped.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// A validated, non-empty search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    // Rejects empty and whitespace-only input before anything touches
    // the network. Surrounding whitespace is dropped.
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The term as the registry expects it: uppercased, wrapped in wildcards
    pub fn query_value(&self) -> String {
        format!("*{}*", self.0.to_uppercase())
    }
}

/// One carrier row from the search results, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowDescriptor {
    pub name: String,
    pub location: String,
    pub detail_link: String,
}

// Builds the keyword search URL.
//
// The search path is joined onto `base`, so `base` should end in '/' when
// the registry lives below a sub-path (Scraper normalizes this).
//
// Example:
//   base = "https://safer.fmcsa.dot.gov/", term = "acme corp"
//   -> "https://safer.fmcsa.dot.gov/keywordx.asp?searchstring=%2AACME%20CORP%2A&SEARCHTYPE="
pub fn build_search_url(base: &Url, term: &SearchTerm) -> Result<Url, url::ParseError> {
    let encoded = utf8_percent_encode(&term.query_value(), QUERY_ENCODE_SET).to_string();
    let mut url = base.join(SEARCH_PATH)?;
    url.set_query(Some(&format!("searchstring={encoded}&SEARCHTYPE=")));
    Ok(url)
}

// Extracts the result rows from a search page.
//
// Parameters:
//   html: the search page markup
//   base: site origin, used to absolutize relative detail links
//
// Returns: rows in document order, or TableNotFound if the page has fewer
// than three tables
pub fn extract_rows(html: &str, base: &Url) -> Result<Vec<RowDescriptor>, ParseError> {
    let document = Html::parse_document(html);

    let tables: Vec<ElementRef<'_>> = document.select(&selector("table")).collect();
    let table = tables
        .get(RESULT_TABLE_INDEX)
        .ok_or(ParseError::TableNotFound {
            found: tables.len(),
            expected: RESULT_TABLE_INDEX + 1,
        })?;

    let row_selector = selector("tr");
    let cell_selector = selector("td, th");
    let anchor_selector = selector("a");

    let mut rows = Vec::new();
    for (index, row) in table.select(&row_selector).skip(HEADER_ROWS).enumerate() {
        let cells: Vec<ElementRef<'_>> = row.select(&cell_selector).collect();

        match parse_row(&cells, &anchor_selector, base) {
            Some(descriptor) => rows.push(descriptor),
            None => debug!(row = index + HEADER_ROWS, cells = cells.len(), "skipping result row"),
        }
    }

    Ok(rows)
}

fn parse_row(
    cells: &[ElementRef<'_>],
    anchor_selector: &scraper::Selector,
    base: &Url,
) -> Option<RowDescriptor> {
    if cells.len() < MIN_RESULT_CELLS {
        return None;
    }

    let href = cells[0]
        .select(anchor_selector)
        .next()?
        .value()
        .attr("href")?
        .trim();
    if href.is_empty() {
        return None;
    }

    Some(RowDescriptor {
        name: cell_text(cells[0]),
        location: cell_text(cells[1]),
        detail_link: resolve_link(base, href)?,
    })
}

// Absolute hrefs (anything with a scheme) pass through untouched; relative
// ones are joined onto the site origin.
//
// Examples:
//   "query.asp?searchtype=ANY&query_param=USDOT&query_string=123"
//     -> "https://safer.fmcsa.dot.gov/query.asp?searchtype=ANY&query_param=USDOT&query_string=123"
//   "https://other.example/x" -> "https://other.example/x"
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    match Url::parse(href) {
        Ok(_) => Some(href.to_string()),
        Err(_) => base.join(href).ok().map(|url| url.to_string()),
    }
}
