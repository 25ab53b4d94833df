//! Newline-delimited JSON output

use crate::output::traits::{OutputError, OutputResult, RecordWriter};
use crate::page::PageRecord;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Writes one JSON object per line to a file
///
/// The file is created (or truncated) on `open`. Every record is flushed
/// before `write` returns, so lines already written survive a crawl that is
/// dropped before `close`.
#[derive(Debug)]
pub struct JsonlWriter {
    path: PathBuf,
    file: Option<BufWriter<File>>,
    records_written: u64,
}

impl JsonlWriter {
    /// Creates a writer targeting `path`; nothing is touched until `open`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            file: None,
            records_written: 0,
        }
    }

    /// Returns the output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of records written since the last `open`
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Returns true while the file handle is held
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }
}

#[async_trait]
impl RecordWriter for JsonlWriter {
    async fn open(&mut self) -> OutputResult<()> {
        if self.file.is_some() {
            return Ok(());
        }

        let file = File::create(&self.path).await?;
        self.file = Some(BufWriter::new(file));
        self.records_written = 0;
        tracing::debug!("Opened output file {}", self.path.display());
        Ok(())
    }

    async fn write(&mut self, record: PageRecord) -> OutputResult<()> {
        let file = self.file.as_mut().ok_or(OutputError::NotOpen)?;

        let mut line = record.to_json_line()?;
        line.push('\n');
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        self.records_written += 1;
        Ok(())
    }

    async fn close(&mut self) -> OutputResult<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.shutdown().await?;
            tracing::debug!(
                "Closed output file {} ({} records)",
                self.path.display(),
                self.records_written
            );
        }
        Ok(())
    }
}
