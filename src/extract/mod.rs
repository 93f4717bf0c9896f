// src/extract/mod.rs
// =============================================================================
// HTML extraction for the two page kinds we scrape.
//
// Submodules:
// - search: the keyword search page (query URL + result table rows)
// - detail: the carrier snapshot page (one cell at a fixed row)
//
// The registry publishes no API, so everything here depends on where things
// sit in its rendered markup. Those positions are collected below and
// nowhere else; if the site layout changes, these constants and the two
// submodules are the only places that need to follow.
// =============================================================================

mod detail;
mod search;

pub use detail::extract_detail_cell;
pub use search::{build_search_url, extract_rows, RowDescriptor, SearchTerm};

use scraper::{ElementRef, Selector};

/// Path of the keyword search endpoint, relative to the site origin
pub const SEARCH_PATH: &str = "keywordx.asp";

/// Zero-based index of the result table among all `<table>` elements
pub const RESULT_TABLE_INDEX: usize = 2;

/// Rows at the top of the result table that hold column headings
pub const HEADER_ROWS: usize = 1;

/// A result row needs at least name and location cells
pub const MIN_RESULT_CELLS: usize = 2;

/// One-based position, in document order, of the table row on the detail
/// page whose first cell holds the power units count
pub const DETAIL_ROW_POSITION: usize = 17;

// Compiles one of the constant selectors used in this module.
// The inputs are literals checked by the tests below, so failure here is a
// programming error, not a runtime condition.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

// All text inside an element, with surrounding whitespace (including
// non-breaking spaces) removed.
pub(crate) fn cell_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
