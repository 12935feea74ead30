//! Progress bar sink for indexing runs.

use std::sync::Mutex;

use indicatif::ProgressBar;

use searchbridge_pipeline::ProgressSink;

/// Progress sink that draws an in-terminal bar.
#[derive(Default)]
pub struct BarProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl BarProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for BarProgress {
    fn begin(&self, total: u64) {
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(ProgressBar::new(total));
        }
    }

    fn advance(&self, done: u64, _total: u64) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                bar.set_position(done);
            }
        }
    }

    fn finish(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(bar) = guard.take() {
                bar.finish_and_clear();
            }
        }
    }
}
