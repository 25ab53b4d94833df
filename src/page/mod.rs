//! Page data model
//!
//! A [`Page`] is what content extraction produces, [`Signals`] is what text
//! processing derives from it, and a [`PageRecord`] is the immutable
//! combination of both that gets handed to the output writer.

mod record;
mod signals;

pub use record::PageRecord;
pub use signals::{reading_time_minutes, ContentType, Signals, UNKNOWN_LANGUAGE};

use serde::{Deserialize, Serialize};

/// Content extracted from a single fetched page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Text of the `<title>` element, empty if absent
    pub title: String,

    /// Canonical URL the page was crawled under
    pub url: String,

    /// Extraction time, RFC 3339 in UTC
    pub timestamp: String,

    /// Body text
    pub text: String,
}
