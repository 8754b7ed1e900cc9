//! Sync progress reporting.

/// Trait for receiving sync progress updates.
pub trait SyncProgress {
    /// Called after each row is processed.
    fn on_row(&self, current: usize, total: usize, slug: Option<&str>);

    /// Called when a phase starts (e.g., "Importing 120 rows").
    fn on_phase(&self, message: &str);

    /// Called when the sync is complete.
    fn on_complete(&self, message: &str);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl SyncProgress for SilentProgress {
    fn on_row(&self, _current: usize, _total: usize, _slug: Option<&str>) {}
    fn on_phase(&self, _message: &str) {}
    fn on_complete(&self, _message: &str) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl SyncProgress for LogProgress {
    fn on_row(&self, current: usize, total: usize, slug: Option<&str>) {
        if current.is_multiple_of(50) || current == total {
            log::info!("  [{}/{}] {}", current, total, slug.unwrap_or("-"));
        }
    }

    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }
}
