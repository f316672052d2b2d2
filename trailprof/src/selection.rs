//! Stale-result detection for callers that start a new profile whenever the
//! user picks a different path.
//!
//! The engine itself never cancels anything. A caller takes a token before
//! starting a computation and only applies the result if the token is still
//! current when the result arrives.
//!
//! ```ignore
//! let token = tracker.begin();
//! let result = engine.get_profile(&path).await;
//! if tracker.is_current(token) {
//!     show(result);
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one profile request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Sequence number of the request.
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Hands out monotonically increasing [`RequestToken`]s.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    latest: AtomicU64,
}

impl SelectionTracker {
    /// Create a tracker with no outstanding requests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding all earlier ones.
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Invalidate every outstanding request (e.g. the user deselected).
    pub fn clear(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }

    /// Whether `token` belongs to the most recent request.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::Acquire) == token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_increase() {
        let tracker = SelectionTracker::new();
        let a = tracker.begin();
        let b = tracker.begin();
        assert!(b > a);
        assert_eq!(b.value(), a.value() + 1);
    }

    #[test]
    fn test_newer_request_supersedes() {
        let tracker = SelectionTracker::new();
        let first = tracker.begin();
        assert!(tracker.is_current(first));

        let second = tracker.begin();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }

    #[test]
    fn test_clear_invalidates_everything() {
        let tracker = SelectionTracker::new();
        let token = tracker.begin();
        tracker.clear();
        assert!(!tracker.is_current(token));

        let next = tracker.begin();
        assert!(tracker.is_current(next));
    }

    #[test]
    fn test_concurrent_begin_yields_unique_tokens() {
        let tracker = std::sync::Arc::new(SelectionTracker::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = tracker.clone();
                std::thread::spawn(move || (0..100).map(|_| tracker.begin()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<RequestToken> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 800);
    }
}
