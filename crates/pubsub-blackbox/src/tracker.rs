// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Match-state synchronization between runtime threads and the test.
//!
//! Discovery is asynchronous: the runtime reports match/unmatch events
//! from its own threads while the test thread decides when to start
//! publishing. [`MatchTracker`] turns that signal into a level-triggered
//! rendezvous point: waits check the *current* count, so a notification
//! that lands before the wait begins is never missed, and every wake
//! re-checks the predicate (spurious-wake tolerant).
//!
//! The lock covers only the counter and its wake signal, held for the
//! duration of an increment/decrement/predicate check; condvar waits
//! release and reacquire it around the sleep. Notifying threads are
//! never blocked by a waiter.

use crate::runtime::{EndpointListener, MatchEvent};
use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Thread-safe counter of currently matched remote endpoints.
///
/// Fed by the runtime's match callbacks, consumed by blocking waits on
/// the test thread. Created with a count of zero.
#[derive(Default)]
pub struct MatchTracker {
    count: Mutex<usize>,
    cv: Condvar,
}

impl MatchTracker {
    /// Create a tracker with zero matched endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a match notification and wake any waiter.
    pub fn on_matched(&self) {
        let mut count = self.count.lock();
        *count += 1;
        log::debug!("publication matched, {} remote endpoint(s)", *count);
        self.cv.notify_all();
    }

    /// Record an unmatch notification and wake any waiter.
    ///
    /// The runtime contract pairs every unmatch with a prior match. A
    /// misbehaving runtime that over-unmatches is clamped at zero and
    /// flagged instead of underflowing the counter.
    pub fn on_unmatched(&self) {
        let mut count = self.count.lock();
        match count.checked_sub(1) {
            Some(next) => *count = next,
            None => log::warn!("unmatch notification with no matched endpoint, clamping at 0"),
        }
        log::debug!("publication unmatched, {} remote endpoint(s)", *count);
        self.cv.notify_all();
    }

    /// Current number of matched endpoints.
    #[must_use]
    pub fn matched(&self) -> usize {
        *self.count.lock()
    }

    /// Block until at least one endpoint is matched or `timeout` elapses.
    ///
    /// Returns whether the count is positive at wake time. Returns
    /// immediately, without blocking, when already matched.
    pub fn wait_matched(&self, timeout: Duration) -> bool {
        self.wait_until(timeout, |count| count > 0)
    }

    /// Block until no endpoint is matched or `timeout` elapses.
    ///
    /// Returns whether the count is zero at wake time. Returns
    /// immediately, without blocking, when already unmatched.
    pub fn wait_unmatched(&self, timeout: Duration) -> bool {
        self.wait_until(timeout, |count| count == 0)
    }

    fn wait_until(&self, timeout: Duration, satisfied: impl Fn(usize) -> bool) -> bool {
        // Timeouts too large for the clock (e.g. Duration::MAX) clamp to
        // a far-but-finite deadline instead of overflowing Instant.
        let now = Instant::now();
        let deadline = now
            .checked_add(timeout)
            .unwrap_or_else(|| now + Duration::from_secs(86_400 * 365));
        let mut count = self.count.lock();
        loop {
            if satisfied(*count) {
                return true;
            }
            if self.cv.wait_until(&mut count, deadline).timed_out() {
                return satisfied(*count);
            }
        }
    }
}

impl EndpointListener for MatchTracker {
    fn on_publication_matched(&self, event: MatchEvent) {
        match event {
            MatchEvent::Matched => self.on_matched(),
            MatchEvent::Unmatched => self.on_unmatched(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_count_accounting() {
        let tracker = MatchTracker::new();
        assert_eq!(tracker.matched(), 0);

        tracker.on_matched();
        tracker.on_matched();
        tracker.on_matched();
        assert_eq!(tracker.matched(), 3);

        tracker.on_unmatched();
        assert_eq!(tracker.matched(), 2);
    }

    #[test]
    fn test_unmatched_at_zero_clamps() {
        let tracker = MatchTracker::new();

        tracker.on_unmatched();
        assert_eq!(tracker.matched(), 0);

        // Still functional afterwards.
        tracker.on_matched();
        assert_eq!(tracker.matched(), 1);
    }

    #[test]
    fn test_wait_matched_immediate_when_already_matched() {
        let tracker = MatchTracker::new();
        tracker.on_matched();

        let start = Instant::now();
        assert!(tracker.wait_matched(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_wait_unmatched_immediate_when_zero() {
        let tracker = MatchTracker::new();

        let start = Instant::now();
        assert!(tracker.wait_unmatched(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_wait_matched_times_out_fully() {
        let tracker = MatchTracker::new();
        let timeout = Duration::from_millis(100);

        let start = Instant::now();
        assert!(!tracker.wait_matched(timeout));
        assert!(start.elapsed() >= timeout);
    }

    #[test]
    fn test_wait_with_extreme_timeout_does_not_panic() {
        let tracker = MatchTracker::new();
        tracker.on_matched();

        // Deadline arithmetic must survive timeouts beyond the clock's
        // range; the satisfied predicate returns immediately.
        assert!(tracker.wait_matched(Duration::MAX));

        tracker.on_unmatched();
        assert!(tracker.wait_unmatched(Duration::MAX));
    }

    #[test]
    fn test_wait_matched_woken_by_other_thread() {
        let tracker = Arc::new(MatchTracker::new());

        let notifier = {
            let tracker = Arc::clone(&tracker);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                tracker.on_matched();
            })
        };

        let start = Instant::now();
        assert!(tracker.wait_matched(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(5));

        notifier.join().expect("notifier thread panicked");
    }

    #[test]
    fn test_wait_unmatched_woken_by_other_thread() {
        let tracker = Arc::new(MatchTracker::new());
        tracker.on_matched();

        let notifier = {
            let tracker = Arc::clone(&tracker);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                tracker.on_unmatched();
            })
        };

        assert!(tracker.wait_unmatched(Duration::from_secs(10)));
        notifier.join().expect("notifier thread panicked");
    }

    #[test]
    fn test_listener_dispatch() {
        let tracker = MatchTracker::new();

        tracker.on_publication_matched(MatchEvent::Matched);
        tracker.on_publication_matched(MatchEvent::Matched);
        assert_eq!(tracker.matched(), 2);

        tracker.on_publication_matched(MatchEvent::Unmatched);
        assert_eq!(tracker.matched(), 1);
    }

    #[test]
    fn test_concurrent_notifications() {
        let tracker = Arc::new(MatchTracker::new());
        let mut handles = Vec::new();

        for _ in 0..4 {
            let tracker = Arc::clone(&tracker);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    tracker.on_matched();
                }
                for _ in 0..100 {
                    tracker.on_unmatched();
                }
            }));
        }

        for handle in handles {
            handle.join().expect("notifier thread panicked");
        }

        assert_eq!(tracker.matched(), 0);
    }
}
