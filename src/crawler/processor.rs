//! Text processing and signal derivation
//!
//! Cleans extracted page text and derives the analytics signals stored
//! alongside it: counts, reading time, language and a content-type label.

use crate::page::{reading_time_minutes, ContentType, Page, Signals, UNKNOWN_LANGUAGE};
use url::Url;

/// Word count above which a page without a path hint is long-form
const LONG_FORM_WORDS: usize = 800;

/// Word count above which a page without a path hint is a content page
const CONTENT_PAGE_WORDS: usize = 200;

/// Path keywords, checked in order; the first bucket with a match wins
const PATH_BUCKETS: &[(ContentType, &[&str])] = &[
    (
        ContentType::Documentation,
        &["doc", "docs", "documentation", "guide", "guides", "manual", "reference", "api"],
    ),
    (
        ContentType::Article,
        &["blog", "article", "articles", "news", "post", "posts"],
    ),
    (
        ContentType::Product,
        &["product", "products", "shop", "store", "pricing"],
    ),
    (ContentType::Help, &["help", "support", "faq", "faqs"]),
];

/// Derives final text and signals from an extracted page
pub trait TextProcessor: Send + Sync {
    fn derive_signals(&self, page: Page) -> (Page, Signals);
}

/// Default text processor
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicTextProcessor;

impl BasicTextProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl TextProcessor for BasicTextProcessor {
    fn derive_signals(&self, mut page: Page) -> (Page, Signals) {
        page.text = clean_text(&page.text);

        let word_count = page.text.split_whitespace().count();
        let signals = Signals {
            word_count,
            character_count: page.text.chars().count(),
            reading_time_minutes: reading_time_minutes(word_count),
            language: detect_language(&page.text),
            content_type: classify_content(&page.url, word_count),
        };

        (page, signals)
    }
}

/// Trims the text and collapses runs of the same whitespace character
///
/// `"a  b\n\n\nc"` becomes `"a b\nc"`; mixed runs such as `" \n"` are kept.
pub fn clean_text(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut previous: Option<char> = None;

    for c in text.trim().chars() {
        if c.is_whitespace() && previous == Some(c) {
            continue;
        }
        cleaned.push(c);
        previous = Some(c);
    }

    cleaned
}

/// Returns the ISO 639-3 code of the text's language, or `"unknown"`
pub fn detect_language(text: &str) -> String {
    whatlang::detect(text)
        .map(|info| info.lang().code().to_string())
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string())
}

/// Labels a page by URL path keywords first, then by length
pub fn classify_content(url: &str, word_count: usize) -> ContentType {
    if let Some(content_type) = classify_by_path(url) {
        return content_type;
    }

    if word_count > LONG_FORM_WORDS {
        ContentType::LongForm
    } else if word_count > CONTENT_PAGE_WORDS {
        ContentType::ContentPage
    } else {
        ContentType::Other
    }
}

fn classify_by_path(url: &str) -> Option<ContentType> {
    let parsed = Url::parse(url).ok()?;
    let path = parsed.path().to_lowercase();
    let tokens: Vec<&str> = path
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect();

    PATH_BUCKETS
        .iter()
        .find(|(_, keywords)| tokens.iter().any(|token| keywords.contains(token)))
        .map(|(content_type, _)| *content_type)
}
