//! Command implementations for the tresor CLI
//!
//! Each command resolves nothing itself: it receives the [`Layout`]
//! computed in `main`, runs the matching operation and prints the summary.
//!
//! [`Layout`]: crate::layout::Layout

pub mod backup;
pub mod completions;
pub mod install;
pub mod update;
pub mod version;
