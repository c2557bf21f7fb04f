use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe channel counters.
///
/// Each counter lives on its own cache line so that counting does not add
/// false sharing on top of the channel lock.
#[derive(Debug, Default)]
pub(crate) struct Metrics {
    items_added: CachePadded<AtomicU64>,
    items_evicted: CachePadded<AtomicU64>,
    items_taken: CachePadded<AtomicU64>,
    items_released_on_close: CachePadded<AtomicU64>,
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn add_items_added(&self, n: u64) {
        self.items_added.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_items_evicted(&self, n: u64) {
        self.items_evicted.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_items_taken(&self, n: u64) {
        self.items_taken.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_items_released_on_close(&self, n: u64) {
        self.items_released_on_close.fetch_add(n, Ordering::Relaxed);
    }

    /// Takes a point-in-time copy of all counters.
    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            items_added: self.items_added.load(Ordering::Relaxed),
            items_evicted: self.items_evicted.load(Ordering::Relaxed),
            items_taken: self.items_taken.load(Ordering::Relaxed),
            items_released_on_close: self.items_released_on_close.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a channel's counters, see
/// [`RingChannel::metrics`](crate::RingChannel::metrics).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Items accepted by `add`/`add_evict`.
    pub items_added: u64,
    /// Items dropped from the ring because a newer item overwrote them.
    pub items_evicted: u64,
    /// Items handed to consumers.
    pub items_taken: u64,
    /// Items still resident when the channel was closed.
    pub items_released_on_close: u64,
}

impl MetricsSnapshot {
    /// Items accepted but not yet taken, evicted or released.
    ///
    /// Matches `RingChannel::count()` once all threads are quiescent.
    pub fn in_flight(&self) -> u64 {
        self.items_added
            .saturating_sub(self.items_evicted)
            .saturating_sub(self.items_taken)
            .saturating_sub(self.items_released_on_close)
    }
}
