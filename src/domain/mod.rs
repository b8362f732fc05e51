//! Domain models for Tresor
//!
//! Pure value types describing what gets synchronised. No filesystem side
//! effects apart from counting.

pub mod component;
pub mod counts;

pub use component::{Component, UpdateScope};
pub use counts::MarkdownCounts;
