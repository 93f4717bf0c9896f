// src/export.rs
// =============================================================================
// CSV export of a ResultTable.
//
// Format:
// - Header row with the exact COLUMNS strings, always present (even for an
//   empty table)
// - One record per carrier, cells in COLUMNS order
// - Standard quoting: fields containing commas, quotes or newlines are
//   quoted, embedded quotes doubled (the csv crate's defaults)
// =============================================================================

use std::io;
use std::path::Path;

use crate::pipeline::{ResultTable, COLUMNS};

// Writes `table` as CSV into any writer.
pub fn write_csv<W: io::Write>(table: &ResultTable, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(COLUMNS)?;
    for row in table.rows() {
        csv_writer.write_record(row.cells())?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_csv_file(table: &ResultTable, path: impl AsRef<Path>) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_csv(table, io::BufWriter::new(file))
}

pub fn to_csv_string(table: &ResultTable) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Parsed CSV: header cells plus one Vec per record
pub type CsvRows = (Vec<String>, Vec<Vec<String>>);

// Reads an exported table back into plain strings.
pub fn read_csv<R: io::Read>(reader: R) -> Result<CsvRows, csv::Error> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

    let mut records: Vec<Vec<String>> = Vec::new();
    for record in csv_reader.records() {
        records.push(record?.iter().map(str::to_string).collect());
    }
    Ok((headers, records))
}

// Default export file name for a search term.
//
// Example: "acme trucking" -> "acme_trucking_carriers.csv"
pub fn default_file_name(term: &str) -> String {
    format!("{}_carriers.csv", term.trim().replace(' ', "_"))
}
