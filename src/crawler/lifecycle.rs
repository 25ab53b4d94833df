//! Scoped resource release
//!
//! Resources are registered in the order they are acquired and released in
//! reverse order, on every exit path of a crawl.

/// Resources the crawler acquires for the duration of one crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// The fetcher's HTTP client and its connection pool
    HttpClient,
    /// The writer's output handle
    OutputSink,
}

/// Ordered list of pending release actions
#[derive(Debug, Default)]
pub struct ReleaseStack {
    pending: Vec<Resource>,
}

impl ReleaseStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `resource` was acquired and must be released
    pub fn register(&mut self, resource: Resource) {
        self.pending.push(resource);
    }

    /// Takes the most recently acquired resource still pending
    pub fn next_release(&mut self) -> Option<Resource> {
        self.pending.pop()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
