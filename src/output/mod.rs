//! Output module for persisting crawl results
//!
//! This module handles:
//! - The append-only record writer interface
//! - Newline-delimited JSON output
//! - Crawl statistics

mod jsonl;
pub mod stats;
mod traits;

pub use jsonl::JsonlWriter;
pub use stats::CrawlStats;
pub use traits::{OutputError, OutputResult, RecordWriter};
