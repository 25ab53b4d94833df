//! Traversal frontier
//!
//! The frontier decides the visit order among discovered-but-unvisited URLs.
//! De-duplication is not its job: the crawler only pushes URLs it has never
//! seen before.

use std::collections::VecDeque;

/// Ordering policy over pending URLs
pub trait Frontier: Send {
    /// Adds a canonical URL
    fn push(&mut self, url: String);

    /// Removes and returns the next URL to visit
    fn pop(&mut self) -> Option<String>;

    /// Returns the number of pending URLs
    fn len(&self) -> usize;

    /// Returns true when nothing is pending
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// FIFO frontier: pages are visited in non-decreasing depth order
#[derive(Debug, Default)]
pub struct BreadthFirstFrontier {
    queue: VecDeque<String>,
}

impl BreadthFirstFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for BreadthFirstFrontier {
    fn push(&mut self, url: String) {
        self.queue.push_back(url);
    }

    fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}

/// LIFO frontier: follows the most recently discovered link first
///
/// Depth ordering is not monotonic with this frontier; the crawler's pop-time
/// depth check keeps the depth limit intact.
#[derive(Debug, Default)]
pub struct DepthFirstFrontier {
    stack: Vec<String>,
}

impl DepthFirstFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for DepthFirstFrontier {
    fn push(&mut self, url: String) {
        self.stack.push(url);
    }

    fn pop(&mut self) -> Option<String> {
        self.stack.pop()
    }

    fn len(&self) -> usize {
        self.stack.len()
    }
}
