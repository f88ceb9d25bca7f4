//! Long-running worker handlers.
//!
//! - [`PurgeWorker`] - searches for matching resources and deletes them on a
//!   fixed interval

mod purge;

pub use purge::{CycleOutcome, PurgeSummary, PurgeWorker};
