use crate::page::{ContentType, Page, Signals};
use serde::{Deserialize, Serialize};

/// One output record per successfully extracted page
///
/// Built once from a processed [`Page`] and its [`Signals`]; the crawler
/// gives up ownership when it hands the record to the writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub title: String,
    pub url: String,
    pub timestamp: String,
    pub text: String,
    pub word_count: usize,
    pub character_count: usize,
    pub reading_time_minutes: f64,
    pub language: String,
    pub content_type: ContentType,
}

impl PageRecord {
    /// Assembles a record from a processed page and its signals
    pub fn new(page: Page, signals: Signals) -> Self {
        Self {
            title: page.title,
            url: page.url,
            timestamp: page.timestamp,
            text: page.text,
            word_count: signals.word_count,
            character_count: signals.character_count,
            reading_time_minutes: signals.reading_time_minutes,
            language: signals.language,
            content_type: signals.content_type,
        }
    }

    /// Serializes the record as a single JSON line (without the newline)
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
