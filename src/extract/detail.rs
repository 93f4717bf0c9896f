// src/extract/detail.rs
// =============================================================================
// The carrier snapshot (detail) page.
//
// We want a single value: the text of the first <td> of the 17th table row,
// counting rows across the whole document rather than inside one table.
// Whatever sits in that cell is returned as-is (trimmed). There is no check
// that it looks like a number.
// =============================================================================

use scraper::{ElementRef, Html};

use super::{cell_text, selector, DETAIL_ROW_POSITION};

// Returns the trimmed text of the enrichment cell, or None when the page has
// fewer rows than expected or that row has no data cell.
pub fn extract_detail_cell(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let row = document
        .select(&selector("table tr"))
        .nth(DETAIL_ROW_POSITION - 1)?;

    let cell = row
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "td")?;

    Some(cell_text(cell))
}
