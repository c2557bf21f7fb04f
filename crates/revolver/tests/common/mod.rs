//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Installs a test-writer tracing subscriber once per test binary.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Per-item release counters, indexed by item id.
#[derive(Clone)]
pub struct ReleaseLedger {
    counts: Arc<Vec<AtomicUsize>>,
}

impl ReleaseLedger {
    pub fn new(items: usize) -> Self {
        Self {
            counts: Arc::new((0..items).map(|_| AtomicUsize::new(0)).collect()),
        }
    }

    /// Creates the item with the given id, tied to this ledger.
    pub fn item(&self, id: usize) -> Tracked {
        Tracked {
            id,
            ledger: self.clone(),
        }
    }

    pub fn releases(&self, id: usize) -> usize {
        self.counts[id].load(Ordering::SeqCst)
    }

    pub fn total_releases(&self) -> usize {
        self.counts.iter().map(|c| c.load(Ordering::SeqCst)).sum()
    }

    /// Ids whose release count is not exactly one.
    pub fn not_released_once(&self) -> Vec<(usize, usize)> {
        self.counts
            .iter()
            .enumerate()
            .map(|(id, c)| (id, c.load(Ordering::SeqCst)))
            .filter(|&(_, n)| n != 1)
            .collect()
    }
}

/// An item whose release action bumps its ledger entry.
pub struct Tracked {
    pub id: usize,
    ledger: ReleaseLedger,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.ledger.counts[self.id].fetch_add(1, Ordering::SeqCst);
    }
}
