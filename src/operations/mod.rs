//! High-level operations
//!
//! - InstallOperation: checkout into the installation root
//! - UpdateOperation: pull the clone, then refresh components from it
//! - RollbackOperation / CleanupOperation: work on update snapshots
//! - BackupOperation: installation root back into the checkout
//!
//! Operations take a [`Layout`](crate::layout::Layout) and return reports;
//! printing is left to the command handlers.

pub mod backup;
pub mod install;
mod sync;
pub mod update;

pub use backup::BackupOperation;
pub use install::{InstallOperation, InstallOptions, InstallSummary};
pub use update::{
    CleanupOperation, RollbackOperation, RollbackSummary, UpdateOperation, UpdateOptions,
    UpdateOutcome, UpdateSummary,
};
