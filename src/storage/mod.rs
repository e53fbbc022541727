//! Storage abstractions for the baseline snapshot.
//!
//! The baseline is a single JSON file holding the last persisted listing as
//! a flat array of records. It is always replaced whole, never patched.
//!
//! ## Absent vs. unreadable
//!
//! An absent file means the watcher has never run: the next check
//! establishes a baseline. A file that exists but cannot be read or decoded
//! is a [`Persistence`](crate::error::AppError::Persistence) error and the
//! check aborts without touching it. Building with the `lenient-state`
//! feature instead logs a warning and treats it as a first run.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::AnimalRecord;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for baseline storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the baseline, or `None` if none has been established.
    async fn load(&self) -> Result<Option<Vec<AnimalRecord>>>;

    /// Replace the baseline.
    async fn save(&self, records: &[AnimalRecord]) -> Result<()>;
}
