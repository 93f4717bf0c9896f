// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// The flags only shape a ScrapeConfig; nothing here talks to the network.
//
// Rust concepts:
// - Structs: SearchArgs groups the flags of the 'search' subcommand
// - Enums: Commands lists the subcommands (one for now)
// - Derive macros: Parser / Subcommand / Args generate the parsing code
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use fmcsa_search::config::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, DEFAULT_TIMEOUT};
use fmcsa_search::ScrapeConfig;

#[derive(Parser, Debug)]
#[command(
    name = "fmcsa-search",
    version,
    about = "Search the FMCSA SAFER registry for carriers and their power units",
    long_about = "fmcsa-search runs a keyword search against the FMCSA SAFER carrier registry, \
                  follows every result to its snapshot page to read the number of power units, \
                  and prints or exports the resulting table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search carriers by name keyword
    ///
    /// Example: fmcsa-search search "acme trucking" --csv
    Search(SearchArgs),
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Keyword to search for (case-insensitive; matched anywhere in the name)
    pub term: String,

    /// Print the table as JSON instead of aligned columns
    #[arg(long)]
    pub json: bool,

    /// Also write <TERM>_carriers.csv in the current directory
    #[arg(long)]
    pub csv: bool,

    /// Write the CSV export to this path (implies --csv)
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Timeout for each page fetch, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Number of carrier pages fetched at once (1 = one at a time)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=32))]
    pub concurrency: u16,

    /// How long fetched pages stay cached, in seconds (0 disables caching)
    #[arg(long, default_value_t = DEFAULT_CACHE_TTL.as_secs())]
    pub cache_ttl_secs: u64,

    /// Maximum number of cached pages (0 disables caching)
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: usize,

    /// Do not show the progress line
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl SearchArgs {
    pub fn scrape_config(&self) -> ScrapeConfig {
        ScrapeConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            cache_capacity: self.cache_capacity,
            concurrency: usize::from(self.concurrency),
            ..ScrapeConfig::default()
        }
    }

    /// Where the CSV export goes, if one was requested
    pub fn csv_path(&self) -> Option<PathBuf> {
        match (&self.output, self.csv) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(PathBuf::from(fmcsa_search::export::default_file_name(
                &self.term,
            ))),
            (None, false) => None,
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a separate SearchArgs struct?
//    - #[derive(clap::Args)] lets the subcommand's flags live in their own
//      type, so they can carry helper methods like scrape_config()
//
// 2. What does value_parser!(u16).range(1..=32) do?
//    - clap rejects --concurrency 0 or --concurrency 500 before we ever run
//
// 3. What is `..ScrapeConfig::default()`?
//    - Struct update syntax: fields we don't list are copied from the default
//    - That is how the registry origin stays at its built-in value
//
// 4. Why does csv_path() match on a tuple?
//    - (output, csv) covers all four flag combinations in one place
//    - `_` means "don't care": an explicit -o path wins either way
//
// 5. Where do the /// comments go?
//    - clap turns doc comments on fields into the --help text
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> SearchArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Search(args) => args,
        }
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["fmcsa-search", "search", "acme"]);
        assert_eq!(args.term, "acme");
        assert!(args.csv_path().is_none());

        let config = args.scrape_config();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.concurrency, 1);
        assert!(config.cache_enabled());
    }

    #[test]
    fn test_csv_flag_uses_default_file_name() {
        let args = parse(&["fmcsa-search", "search", "acme trucking", "--csv"]);
        assert_eq!(args.csv_path(), Some(PathBuf::from("acme_trucking_carriers.csv")));
    }

    #[test]
    fn test_output_path_wins() {
        let args = parse(&["fmcsa-search", "search", "acme", "-o", "out.csv"]);
        assert_eq!(args.csv_path(), Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        assert!(Cli::try_parse_from(["fmcsa-search", "search", "acme", "--concurrency", "0"]).is_err());
    }
}
