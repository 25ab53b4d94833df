//! URL handling module for Site-Trawl
//!
//! This module provides the pure URL functions the crawler depends on:
//! domain-root extraction, canonical normalization, and link resolution
//! with same-domain and path-policy filtering.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::{domain_root, DomainRoot};
pub use filter::{resolve_and_filter, LinkPolicy, DEFAULT_DENIED_PATH_KEYWORDS};
pub use normalize::normalize_url;
