//! Import the master profile sheet into the group tables.
//!
//! This crate owns the sync loop: mapping each sheet row to records, writing
//! them through a `GroupRepository` in dependency order, and counting the
//! outcome of every write.

pub mod progress;
pub mod sync;

pub use progress::{LogProgress, SilentProgress, SyncProgress};
pub use sync::{Clock, FixedClock, RowOutcome, SyncStats, SystemClock, sync_row, sync_rows};
