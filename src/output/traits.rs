//! Output writer trait and error types
//!
//! This module defines the append-only sink interface the crawler hands
//! finished records to.

use crate::page::PageRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Writer used before it was opened")]
    NotOpen,

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for record sinks
///
/// Writers are opened once at crawl start, receive records in discovery
/// order, and are closed on every exit path of the crawl.
#[async_trait]
pub trait RecordWriter: Send {
    /// Acquires the underlying resource (file handle, connection, ...)
    async fn open(&mut self) -> OutputResult<()>;

    /// Appends one record
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::NotOpen`] when called outside of `open`/`close`.
    async fn write(&mut self, record: PageRecord) -> OutputResult<()>;

    /// Releases the underlying resource. Calling it twice is a no-op.
    async fn close(&mut self) -> OutputResult<()>;
}
