//! Process-wide atomic search counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Generation and match counters shared by all workers.
///
/// Lock-free: increments are never lost under concurrent access, and both
/// values can be read from any thread while workers are mutating them.
#[derive(Debug, Default)]
pub struct Counters {
    generated: AtomicU64,
    matches_found: AtomicU64,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one generated candidate, returning the post-increment total.
    #[inline]
    pub fn record_generated(&self) -> u64 {
        self.generated.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Records one claimed full match.
    pub fn record_match(&self) {
        self.matches_found.fetch_add(1, Ordering::Relaxed);
    }

    /// Total candidates generated this run.
    pub fn generated(&self) -> u64 {
        self.generated.load(Ordering::Relaxed)
    }

    /// Total full matches claimed this run.
    pub fn matches_found(&self) -> u64 {
        self.matches_found.load(Ordering::Relaxed)
    }

    /// Zeroes both counters. Called on run start, never mid-run.
    pub fn reset(&self) {
        self.generated.store(0, Ordering::Relaxed);
        self.matches_found.store(0, Ordering::Relaxed);
    }
}
