// src/main.rs
// =============================================================================
// Entry point of the fmcsa-search CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr)
// 3. Check the search term before anything is printed or fetched
// 4. Run the search pipeline with a terminal progress line
// 5. Print the table (or JSON) and optionally write the CSV export
// 6. Exit with proper code (0 = carriers found, 1 = no results, 2 = error)
//
// Rust concepts used:
// - async/await: the pipeline fetches pages over the network
// - Result<T, E> and anyhow: errors bubble up with `?` and get context
// - Traits: TerminalProgress plugs into the pipeline as a ProgressSink
// =============================================================================

// Module declarations - only the CLI lives in the binary, the rest is the library
mod cli; // src/cli.rs - command-line parsing

use std::io::Write; // gives us .flush() on stderr

// anyhow::Result lets us return any error type with the ? operator,
// and .context() adds a human-readable line on top of it
use anyhow::{Context, Result};
use clap::Parser; // Parser trait enables the parse() method
use cli::{Cli, Commands, SearchArgs};

use fmcsa_search::extract::SearchTerm;
use fmcsa_search::{export, telemetry, PipelineError, ProgressSink, ResultTable, Scraper};

// The #[tokio::main] attribute turns our async main into a real main function
// by starting a tokio runtime and running the future inside it
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("❌ Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Parses arguments, sets up logging and dispatches the subcommand.
//
// Returns: the process exit code
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    telemetry::init_tracing("warn");

    match cli.command {
        Commands::Search(args) => handle_search(&args).await,
    }
}

// Handles the 'search' subcommand
//
// Returns:
//   Ok(0) when carriers were found
//   Ok(1) when the search ran but the table is empty
//   Ok(2) when the term is blank
//   Err(..) for fatal failures (mapped to exit code 2 in main)
async fn handle_search(args: &SearchArgs) -> Result<i32> {
    // A blank term gets the warning only, never the "Searching" banner
    let Some(banner) = search_banner(&args.term) else {
        println!("⚠️  Please enter a search term.");
        return Ok(2);
    };

    let scraper = Scraper::new(args.scrape_config())?;

    println!("{}", banner);

    let mut progress = TerminalProgress::new(!args.quiet);
    let table = match scraper.run(&args.term, &mut progress).await {
        Ok(table) => table,
        Err(PipelineError::EmptyInput) => {
            println!("⚠️  Please enter a search term.");
            return Ok(2);
        }
        Err(e) => return Err(e).context("search failed"),
    };

    if table.is_empty() {
        println!("⚠️  No results found.");
        return Ok(1);
    }

    println!("✅ Found {} carriers!", table.len());
    print_results(&table, args.json)?;

    if let Some(path) = args.csv_path() {
        export::write_csv_file(&table, &path)
            .with_context(|| format!("could not write {}", path.display()))?;
        println!("💾 Saved CSV to {}", path.display());
    }

    Ok(0)
}

// The line printed before a search starts, or None for a blank term.
//
// Example:
//   "  acme "  -> Some("🔍 Searching carriers matching: acme")
//   "   "      -> None
fn search_banner(raw: &str) -> Option<String> {
    let term = SearchTerm::parse(raw).ok()?;
    Some(format!("🔍 Searching carriers matching: {}", term.as_str()))
}

// Prints the table either as aligned columns or JSON
fn print_results(table: &ResultTable, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(table)?;
        println!("{}", json_output);
    } else {
        print_table(table);
    }
    Ok(())
}

fn print_table(table: &ResultTable) {
    println!(
        "{:<40} {:<25} {:<15}",
        "CARRIER/DBA NAME", "LOCATION", "POWER_UNITS"
    );
    println!("{}", "=".repeat(82));

    for row in table.rows() {
        println!(
            "{:<40} {:<25} {:<15}",
            truncate(&row.name, 40),
            truncate(&row.location, 25),
            row.power_units.to_string()
        );
    }

    println!();

    let failed = table.failed_count();
    println!("📊 Summary:");
    println!("   ✅ With power units: {}", table.len() - failed);
    println!("   ⚠️  Unavailable: {}", failed);
    println!("   📋 Total: {}", table.len());
}

// Shortens `text` to at most `width` characters, marking the cut with "..."
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

// Renders "Processing carrier X of Y" on a single, rewritten stderr line.
struct TerminalProgress {
    enabled: bool,
}

impl TerminalProgress {
    fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl ProgressSink for TerminalProgress {
    fn report(&mut self, processed: usize, total: usize) {
        if self.enabled {
            eprint!("\r⏳ Processing carrier {} of {}", processed, total);
            let _ = std::io::stderr().flush();
        }
    }

    fn finish(&mut self) {
        if self.enabled {
            // Clear the progress line
            eprint!("\r{}\r", " ".repeat(60));
            let _ = std::io::stderr().flush();
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is `let ... else`?
//    - `let Some(banner) = expr else { ... };` binds banner when expr is Some
//    - Otherwise the else block runs, and it must leave the function
//      (here with `return Ok(2)`)
//
// 2. Why does main() not return Result?
//    - We want exact exit codes (0, 1, 2), so main() maps the outcome itself
//      and calls std::process::exit()
//
// 3. What does `?` do after .ok()?
//    - .ok() turns Result<T, E> into Option<T>
//    - Inside a function returning Option, `?` returns None early on None
//
// 4. Why is TerminalProgress a struct and not a closure?
//    - The pipeline takes anything implementing the ProgressSink trait
//    - A struct can implement several trait methods (report, finish)
// -----------------------------------------------------------------------------
