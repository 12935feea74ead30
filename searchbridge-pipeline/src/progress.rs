//! Progress reporting seam.
//!
//! The indexer reports progress through this trait so the pipeline stays
//! renderer-agnostic; the console binary plugs in a progress bar, tests
//! plug in a recorder.

/// Observer for bulk-indexing progress.
pub trait ProgressSink: Send + Sync {
    /// A run over `total` records is starting.
    fn begin(&self, _total: u64) {}

    /// `done` of `total` records have been submitted so far. Values are
    /// monotonically non-decreasing within a run.
    fn advance(&self, _done: u64, _total: u64) {}

    /// The run is over.
    fn finish(&self) {}
}

/// Sink that reports nothing.
pub struct NoProgress;

impl ProgressSink for NoProgress {}
