//! Seen-set of fingerprints shared across a run.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use lead_core::types::FxHashSet;

/// Membership test against a plain set.
pub fn is_duplicate(fingerprint: &str, seen: &FxHashSet<String>) -> bool {
    seen.contains(fingerprint)
}

/// Mutex-guarded seen-set. Injected into each run rather than kept global,
/// so callers decide its lifetime.
///
/// The set only grows until `reset`; a long-lived store holds every
/// fingerprint it has ever seen.
#[derive(Debug, Default)]
pub struct DeduplicationStore {
    seen: Mutex<FxHashSet<String>>,
    high_water: AtomicUsize,
}

impl DeduplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically record `fingerprint`. Returns true when it was already
    /// present, i.e. the caller holds a duplicate.
    ///
    /// # Panics
    /// If the lock is poisoned or the set has shrunk outside `reset`.
    pub fn check_and_insert(&self, fingerprint: &str) -> bool {
        let mut seen = self
            .seen
            .lock()
            .expect("dedup seen-set lock poisoned; duplicate state is unknown");
        let duplicate = !seen.insert(fingerprint.to_string());
        let len = seen.len();
        let previous = self.high_water.swap(len, Ordering::SeqCst);
        assert!(
            len >= previous,
            "dedup seen-set shrank from {previous} to {len} outside reset"
        );
        duplicate
    }

    pub fn contains(&self, fingerprint: &str) -> bool {
        self.with_seen(|seen| is_duplicate(fingerprint, seen))
    }

    pub fn len(&self) -> usize {
        self.with_seen(FxHashSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every fingerprint.
    pub fn reset(&self) {
        let mut seen = self
            .seen
            .lock()
            .expect("dedup seen-set lock poisoned; duplicate state is unknown");
        seen.clear();
        self.high_water.store(0, Ordering::SeqCst);
    }

    fn with_seen<R>(&self, f: impl FnOnce(&FxHashSet<String>) -> R) -> R {
        let seen = self
            .seen
            .lock()
            .expect("dedup seen-set lock poisoned; duplicate state is unknown");
        f(&seen)
    }
}
