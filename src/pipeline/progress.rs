// src/pipeline/progress.rs
// Progress reporting for the enrichment loop. The pipeline only reports
// counts; rendering them is up to the front end.

/// Receives `(processed, total)` as rows finish enriching.
///
/// `processed` never decreases within a run, whatever the concurrency.
pub trait ProgressSink {
    /// Called once, after the search page is parsed, with the row count.
    fn begin(&mut self, _total: usize) {}

    fn report(&mut self, processed: usize, total: usize);

    /// Called once at the end of a run that got as far as `begin`.
    fn finish(&mut self) {}
}

/// A sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&mut self, _processed: usize, _total: usize) {}
}
