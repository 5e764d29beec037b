//! Per-domain frontier of URLs waiting to be visited
//!
//! The frontier is a LIFO stack: the most recently discovered link is
//! visited next, so the crawl explores one branch depth-first before
//! backtracking to its siblings. Every URL ever pushed is remembered in the
//! `seen` set and is never admitted twice.

use std::collections::HashSet;
use url::Url;

/// LIFO worklist with deduplication for a single domain crawl
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be visited (top of the stack is the end)
    pending: Vec<Url>,

    /// Every URL that has been pushed, visited or not
    seen: HashSet<Url>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a URL onto the stack unless it has been seen before
    ///
    /// Returns true if the URL was admitted.
    pub fn push(&mut self, url: Url) -> bool {
        if self.is_seen(&url) {
            return false;
        }

        self.seen.insert(url.clone());
        self.pending.push(url);
        true
    }

    /// Removes and returns the most recently pushed URL
    pub fn pop(&mut self) -> Option<Url> {
        self.pending.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of URLs waiting to be visited
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_seen(&self, url: &Url) -> bool {
        self.seen.contains(url)
    }

    /// Number of distinct URLs ever admitted
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}
