use serde::{Deserialize, Serialize};
use std::fmt;

/// Language code used when detection fails
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Average reading speed used for the reading-time estimate
const WORDS_PER_MINUTE: f64 = 200.0;

/// Coarse classification of what a page is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Documentation,
    Article,
    Product,
    Help,
    LongForm,
    ContentPage,
    Other,
}

impl ContentType {
    /// Returns the label written to output records
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Documentation => "documentation",
            Self::Article => "article",
            Self::Product => "product",
            Self::Help => "help",
            Self::LongForm => "long_form",
            Self::ContentPage => "content_page",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analytics signals derived from a page's processed text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    pub word_count: usize,
    pub character_count: usize,
    pub reading_time_minutes: f64,
    /// ISO 639-3 code, or [`UNKNOWN_LANGUAGE`]
    pub language: String,
    pub content_type: ContentType,
}

/// Estimated reading time in minutes, rounded to two decimals
///
/// # Examples
///
/// ```
/// use site_trawl::page::reading_time_minutes;
///
/// assert_eq!(reading_time_minutes(400), 2.0);
/// assert_eq!(reading_time_minutes(0), 0.0);
/// ```
pub fn reading_time_minutes(word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    let minutes = word_count as f64 / WORDS_PER_MINUTE;
    ((minutes * 100.0).round() / 100.0).max(0.0)
}
