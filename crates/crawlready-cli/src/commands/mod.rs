//! Command implementations.

pub mod analyze;
pub mod crawl;
pub mod discover;
