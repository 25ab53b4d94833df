//! HTML content extraction
//!
//! This module turns a fetched response into:
//! - A [`Page`] (title, URL, timestamp, body text) when there is content
//! - The raw `href` values of every anchor, in document order
//!
//! Link filtering is not done here; the crawler resolves and filters the raw
//! hrefs against the crawl's domain root.

use crate::config::ParserConfig;
use crate::crawler::fetcher::FetchedPage;
use crate::page::Page;
use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Elements whose text never counts as page content
const NON_CONTENT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracts a page and its raw links from a fetched response
pub trait PageParser: Send {
    /// Returns the page (None when no content could be extracted) and the
    /// raw hrefs found in the document. Links are returned either way.
    fn process_page(&mut self, url: &str, response: &FetchedPage) -> (Option<Page>, Vec<String>);
}

/// scraper-based parser with boilerplate stripping
///
/// Boilerplate selectors are learned from the first page processed: only
/// the candidates that occur on that page are stripped from every later page.
/// With learning disabled all candidates are always stripped.
pub struct HtmlPageParser {
    candidates: Vec<Selector>,
    learned: Option<Vec<Selector>>,
    learn_from_first_page: bool,
    title_selector: Selector,
    body_selector: Selector,
    anchor_selector: Selector,
}

impl HtmlPageParser {
    /// Creates a parser; selectors that fail to parse are skipped with a warning
    pub fn new<S: AsRef<str>>(boilerplate_selectors: &[S], learn_from_first_page: bool) -> Self {
        let candidates = boilerplate_selectors
            .iter()
            .filter_map(|raw| match Selector::parse(raw.as_ref()) {
                Ok(selector) => Some(selector),
                Err(e) => {
                    tracing::warn!("Ignoring invalid selector '{}': {:?}", raw.as_ref(), e);
                    None
                }
            })
            .collect();

        Self {
            candidates,
            learned: None,
            learn_from_first_page,
            title_selector: static_selector("title"),
            body_selector: static_selector("body"),
            anchor_selector: static_selector("a[href]"),
        }
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(&config.boilerplate_selectors, config.learn_from_first_page)
    }

    /// Returns the selectors currently stripped from page text
    fn active_selectors(&self) -> &[Selector] {
        match &self.learned {
            Some(learned) => learned,
            None => &self.candidates,
        }
    }

    fn learn_selectors(&mut self, document: &Html) {
        if !self.learn_from_first_page || self.learned.is_some() {
            return;
        }

        let present: Vec<Selector> = self
            .candidates
            .iter()
            .filter(|selector| document.select(selector).next().is_some())
            .cloned()
            .collect();
        tracing::debug!(
            "Learned {} of {} boilerplate selectors from first page",
            present.len(),
            self.candidates.len()
        );
        self.learned = Some(present);
    }

    fn extract_title(&self, document: &Html) -> String {
        document
            .select(&self.title_selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    fn extract_links(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.anchor_selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect()
    }

    /// Returns the body text with boilerplate removed, or None without a body
    fn extract_content(&mut self, document: &Html) -> Option<String> {
        self.learn_selectors(document);

        let body = document.select(&self.body_selector).next()?;

        let mut excluded = HashSet::new();
        for selector in self.active_selectors() {
            for element in document.select(selector) {
                excluded.insert(element.id());
            }
        }

        let mut text = String::new();
        for node in body.descendants() {
            let Some(fragment) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().any(|ancestor| {
                excluded.contains(&ancestor.id())
                    || ElementRef::wrap(ancestor)
                        .map_or(false, |e| NON_CONTENT_ELEMENTS.contains(&e.value().name()))
            });
            if !hidden {
                text.push_str(fragment);
            }
        }

        Some(text)
    }
}

impl Default for HtmlPageParser {
    fn default() -> Self {
        Self::from_config(&ParserConfig::default())
    }
}

impl PageParser for HtmlPageParser {
    fn process_page(&mut self, url: &str, response: &FetchedPage) -> (Option<Page>, Vec<String>) {
        let document = Html::parse_document(&response.body);

        let title = self.extract_title(&document);
        let links = self.extract_links(&document);
        let content = self.extract_content(&document);

        let page = content
            .filter(|text| !text.trim().is_empty())
            .map(|text| Page {
                title,
                url: url.to_string(),
                timestamp: Utc::now().to_rfc3339(),
                text,
            });

        if page.is_none() {
            tracing::debug!("No content extracted from {}", url);
        }

        (page, links)
    }
}

/// Parses a selector known to be valid
fn static_selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|_| unreachable!("static selector {} is valid", css))
}
