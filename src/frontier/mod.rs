//! Pending queue and visited set for a single crawl session.

use std::collections::HashSet;
use tracing::{debug, trace};

use crate::url_classifier::{is_anchor_only, is_in_scope, normalize};

/// Tracks which URLs still need a render attempt and which are done
///
/// Discovered links are prepended, so traversal is biased towards the most
/// recently found pages rather than strictly breadth-first. The pending
/// queue and the visited set are always disjoint and the queue never holds
/// the same URL twice.
#[derive(Debug, Clone)]
pub struct Frontier {
    seed: String,
    pending: Vec<String>,
    visited: Vec<String>,
    visited_index: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding only the (normalized) seed
    pub fn new(seed: &str) -> Self {
        let seed = normalize(seed);
        debug!("Creating frontier seeded with {}", seed);
        Self {
            pending: vec![seed.clone()],
            seed,
            visited: Vec::new(),
            visited_index: HashSet::new(),
        }
    }

    /// The scope boundary every queued URL must start with
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Prepends freshly harvested links and re-establishes the invariants
    ///
    /// Links are normalized first, then the queue is deduplicated (first
    /// occurrence wins), then out-of-scope and anchor links are dropped,
    /// then anything already visited is dropped.
    pub fn merge<I, S>(&mut self, new_links: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.pending.len();
        let mut merged: Vec<String> = new_links
            .into_iter()
            .map(|link| normalize(link.as_ref()))
            .collect();
        let discovered = merged.len();
        merged.append(&mut self.pending);

        let mut seen = HashSet::with_capacity(merged.len());
        merged.retain(|url| seen.insert(url.clone()));
        merged.retain(|url| is_in_scope(url, &self.seed) && !is_anchor_only(url));
        merged.retain(|url| !self.visited_index.contains(url));

        trace!("Merged {} links into frontier: {} -> {} pending", discovered, before, merged.len());
        self.pending = merged;
    }

    /// The form of `url` this frontier tracks
    ///
    /// A URL that is already pending or visited is returned exactly as
    /// stored; anything else is normalized. `normalize` strips a single
    /// slash, so normalizing a stored entry such as `https://a.co/x/`
    /// (queued from `https://a.co/x//`) again would yield a different key.
    pub fn canonical(&self, url: &str) -> String {
        if self.visited_index.contains(url) || self.pending.iter().any(|pending| pending == url) {
            url.to_string()
        } else {
            normalize(url)
        }
    }

    /// Records a concluded render attempt for `url`
    ///
    /// The URL is appended to the visited set once and dropped from the
    /// pending queue if it is still there. Calling this for a URL that was
    /// never queued is fine.
    pub fn mark_visited(&mut self, url: &str) {
        let url = self.canonical(url);
        self.remove(&url);
        if self.visited_index.insert(url.clone()) {
            trace!("Marked {} as visited ({} total)", url, self.visited_index.len());
            self.visited.push(url);
        }
    }

    /// Drops `url` from the pending queue if present
    pub fn remove(&mut self, url: &str) {
        if let Some(index) = self.pending.iter().position(|pending| pending == url) {
            self.pending.remove(index);
        }
    }

    /// The next URL to attempt, left in place until `mark_visited`
    pub fn next(&self) -> Option<&str> {
        self.pending.first().map(String::as_str)
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited_index.contains(url)
    }

    /// True once nothing is pending or `limit` URLs have been visited
    pub fn is_exhausted(&self, limit: usize) -> bool {
        self.pending.is_empty() || self.visited.len() >= limit
    }

    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Visited URLs in the order their attempts concluded
    pub fn visited(&self) -> &[String] {
        &self.visited
    }
}
