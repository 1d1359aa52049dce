//! Scheduler for managing the crawl frontier
//!
//! This module handles:
//! - The FIFO frontier queue (breadth-first order)
//! - The visited set, keyed by canonical URL
//! - Enforcing the page cap

use crate::url::{canonicalize, CanonicalUrl};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Scheduler manages the frontier queue and the visited set
///
/// A URL is marked visited at the moment it is handed out by
/// [`Scheduler::next_url`], so it counts against the page cap whether the
/// fetch succeeds or not.
#[derive(Debug)]
pub struct Scheduler {
    /// URLs waiting to be fetched, in discovery order
    frontier: VecDeque<Url>,

    /// Canonical URLs already handed out
    visited: HashSet<CanonicalUrl>,

    max_pages: usize,
}

impl Scheduler {
    /// Creates an empty scheduler that hands out at most `max_pages` URLs
    pub fn new(max_pages: usize) -> Self {
        Self {
            frontier: VecDeque::new(),
            visited: HashSet::new(),
            max_pages,
        }
    }

    /// Appends a URL to the back of the frontier
    ///
    /// URLs already visited are dropped. Duplicates still waiting in the
    /// frontier are allowed; they are skipped when dequeued.
    ///
    /// # Returns
    ///
    /// `true` if the URL was queued
    pub fn enqueue(&mut self, url: Url) -> bool {
        if self.is_visited(&url) {
            return false;
        }
        self.frontier.push_back(url);
        true
    }

    /// Gets the next URL to fetch and marks it visited
    ///
    /// # Returns
    ///
    /// * `Some((url, canonical))` - The URL to fetch and its canonical form
    /// * `None` - The page cap was reached or the frontier is exhausted
    pub fn next_url(&mut self) -> Option<(Url, CanonicalUrl)> {
        while self.visited.len() < self.max_pages {
            let url = self.frontier.pop_front()?;
            let canonical = canonicalize(&url);

            if self.visited.insert(canonical.clone()) {
                tracing::trace!("Dequeued {} ({} queued)", url, self.frontier.len());
                return Some((url, canonical));
            }
        }
        None
    }

    /// Returns whether the URL's canonical form was already handed out
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(&canonicalize(url))
    }

    /// Number of URLs handed out so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Gets the current frontier size
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }
}
