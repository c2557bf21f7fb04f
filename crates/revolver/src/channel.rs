use crate::invariants::debug_assert_closed_implies_finished;
use crate::sync::{Arc, Condvar, Mutex, MutexGuard};
#[cfg(not(feature = "loom"))]
use crate::TakeTimeoutError;
use crate::metrics::Metrics;
use crate::{ChannelError, Config, MetricsSnapshot, Ring, TryTakeError};
use std::fmt;
use std::iter::FusedIterator;
use std::sync::PoisonError;
#[cfg(not(feature = "loom"))]
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

// =============================================================================
// LOCKING PROTOCOL
// =============================================================================
//
// All channel state (the ring, `finished`, `closed`) sits behind one mutex.
// `take` is the only operation that suspends, and it does so on the
// `not_empty` condition variable, which releases the mutex while waiting.
//
// - `add` wakes one waiter: one new item can satisfy at most one consumer.
// - `finish` and `close` wake every waiter: all of them must observe the
//   end-of-stream.
// - Waiters always re-check "non-empty or finished" in a loop, so spurious
//   wake-ups are harmless.
//
// Item release (`Drop`) never runs under the lock. Evicted items and the
// remainder collected by `close` are moved out under the lock and dropped
// once the guard is gone, still before the call returns. A panicking `Drop`
// therefore cannot poison the mutex; if the mutex is poisoned anyway the
// state is still consistent and the guard is recovered.
//
// =============================================================================

/// Bounded, lossy, blocking multi-producer multi-consumer channel.
///
/// Producers never block: adding to a full channel evicts (and drops) the
/// oldest queued item. Consumers block in [`take`](Self::take) until an item
/// arrives or the channel is [finished](Self::finish).
///
/// `RingChannel` is a cheap handle; clones share the same buffer. Items still
/// queued when the last handle goes away are dropped with it.
pub struct RingChannel<T> {
    inner: Arc<Shared<T>>,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    /// Signalled when an item arrives or the channel finishes
    not_empty: Condvar,
    config: Config,
    metrics: Metrics,
}

struct State<T> {
    ring: Ring<T>,
    /// No more items are expected (one-way)
    finished: bool,
    /// Torn down: resident items released, further adds rejected (one-way)
    closed: bool,
}

impl<T> RingChannel<T> {
    /// Creates a channel holding at most `capacity` items.
    ///
    /// Fails with [`ChannelError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ChannelError> {
        Self::with_config(Config::default().with_capacity(capacity))
    }

    /// Creates a channel with the given configuration.
    pub fn with_config(config: Config) -> Result<Self, ChannelError> {
        config.validate()?;
        let ring = Ring::new(config.capacity)?;

        Ok(Self {
            inner: Arc::new(Shared {
                state: Mutex::new(State {
                    ring,
                    finished: false,
                    closed: false,
                }),
                not_empty: Condvar::new(),
                config,
                metrics: Metrics::new(),
            }),
        })
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ---------------------------------------------------------------------
    // PRODUCER API
    // ---------------------------------------------------------------------

    /// Adds an item, evicting and dropping the oldest one if the channel is full.
    ///
    /// Never blocks and never fails. The evicted item is dropped before this
    /// call returns. On a closed channel the item itself is dropped instead.
    pub fn add(&self, item: T) {
        // Whatever comes back is released here, outside the lock.
        drop(self.add_evict(item));
    }

    /// Adds an item and hands back the evicted oldest item, if any.
    ///
    /// Same as [`add`](Self::add) but the caller takes over the evicted item
    /// instead of the channel dropping it. On a closed channel the rejected
    /// `item` is returned unchanged.
    pub fn add_evict(&self, item: T) -> Option<T> {
        let evicted = {
            let mut state = self.lock();
            if state.closed {
                drop(state);
                warn!("item added to a closed ring channel was rejected");
                return Some(item);
            }

            let evicted = state.ring.push(item);
            self.inner.not_empty.notify_one();
            evicted
        };

        if self.inner.config.enable_metrics {
            self.inner.metrics.add_items_added(1);
            if evicted.is_some() {
                self.inner.metrics.add_items_evicted(1);
            }
        }

        if evicted.is_some() {
            trace!(
                capacity = self.capacity(),
                "ring channel full, evicted oldest item"
            );
        }

        evicted
    }

    /// Marks the channel as finished: no further items will be added.
    ///
    /// Queued items stay available. Once they are drained, [`take`](Self::take)
    /// returns `None` without blocking. Calling this again has no effect.
    pub fn finish(&self) {
        let mut state = self.lock();
        if !state.finished {
            state.finished = true;
            debug!(pending = state.ring.len(), "ring channel finished");
        }
        self.inner.not_empty.notify_all();
    }

    // ---------------------------------------------------------------------
    // CONSUMER API
    // ---------------------------------------------------------------------

    /// Removes the oldest item, blocking while the channel is empty.
    ///
    /// Returns `None` (end-of-stream) once the channel is finished and
    /// drained. Any number of threads may call this concurrently; each item
    /// is delivered to exactly one of them.
    pub fn take(&self) -> Option<T> {
        let mut state = self.lock();
        loop {
            if let Some(item) = state.ring.pop() {
                drop(state);
                self.record_taken();
                return Some(item);
            }
            if state.finished {
                return None;
            }
            state = self
                .inner
                .not_empty
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Removes the oldest item without blocking.
    pub fn try_take(&self) -> Result<T, TryTakeError> {
        let mut state = self.lock();
        match state.ring.pop() {
            Some(item) => {
                drop(state);
                self.record_taken();
                Ok(item)
            }
            None if state.finished => Err(TryTakeError::Finished),
            None => Err(TryTakeError::Empty),
        }
    }

    /// Removes the oldest item, blocking for at most `timeout`.
    #[cfg(not(feature = "loom"))]
    pub fn take_timeout(&self, timeout: Duration) -> Result<T, TakeTimeoutError> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            // Unrepresentable deadline: wait without one.
            return self.take().ok_or(TakeTimeoutError::Finished);
        };

        let mut state = self.lock();
        loop {
            if let Some(item) = state.ring.pop() {
                drop(state);
                self.record_taken();
                return Ok(item);
            }
            if state.finished {
                return Err(TakeTimeoutError::Finished);
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(TakeTimeoutError::Timeout);
            }
            let (guard, _) = self
                .inner
                .not_empty
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }
    }

    /// Returns a blocking iterator that yields items until end-of-stream.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            channel: self,
            done: false,
        }
    }

    #[inline]
    fn record_taken(&self) {
        if self.inner.config.enable_metrics {
            self.inner.metrics.add_items_taken(1);
        }
    }

    // ---------------------------------------------------------------------
    // LIFECYCLE
    // ---------------------------------------------------------------------

    /// Tears the channel down, dropping every item still queued.
    ///
    /// The channel becomes finished and closed: blocked consumers wake up
    /// with `None` and later adds drop their item immediately. Returns the
    /// number of items released; a second call releases nothing.
    ///
    /// Producers should be stopped first. A straggling `add` is still safe,
    /// it just loses its item.
    pub fn close(&self) -> usize {
        let remaining = {
            let mut state = self.lock();
            if state.closed {
                return 0;
            }

            let remaining = state.ring.drain_all();
            state.finished = true;
            state.closed = true;
            debug_assert_closed_implies_finished!(state.closed, state.finished);
            self.inner.not_empty.notify_all();
            remaining
        };

        let released = remaining.len();
        if self.inner.config.enable_metrics {
            self.inner
                .metrics
                .add_items_released_on_close(released as u64);
        }
        debug!(released, "ring channel closed");

        drop(remaining);
        released
    }

    // ---------------------------------------------------------------------
    // STATUS
    // ---------------------------------------------------------------------

    /// Returns the number of queued items at this instant.
    pub fn count(&self) -> usize {
        self.lock().ring.len()
    }

    /// Returns true if no item is queued at this instant.
    pub fn is_empty(&self) -> bool {
        self.lock().ring.is_empty()
    }

    /// Returns the maximum number of queued items.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.config.capacity
    }

    /// Returns true once [`finish`](Self::finish) or [`close`](Self::close) was called.
    pub fn is_finished(&self) -> bool {
        self.lock().finished
    }

    /// Returns true once [`close`](Self::close) was called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Returns the configuration this channel was built with.
    #[inline]
    pub fn config(&self) -> Config {
        self.inner.config
    }

    /// Get a metrics snapshot (all zeros unless metrics are enabled).
    pub fn metrics(&self) -> MetricsSnapshot {
        if self.inner.config.enable_metrics {
            self.inner.metrics.snapshot()
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl<T> Clone for RingChannel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for RingChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingChannel")
            .field("capacity", &self.capacity())
            .field("count", &self.count())
            .finish_non_exhaustive()
    }
}

impl<T> Drop for Shared<T> {
    fn drop(&mut self) {
        let remaining = self
            .state
            .lock()
            .map_or_else(|poisoned| poisoned.into_inner().ring.len(), |state| state.ring.len());
        if remaining > 0 {
            debug!(remaining, "dropping ring channel with queued items");
        }
        // The ring releases its slots when the state is dropped right after.
    }
}

/// Blocking iterator over a [`RingChannel`], ending at end-of-stream.
///
/// Created by [`RingChannel::iter`]. The iterator is fused: once it has
/// yielded `None`, items added later are left for other consumers.
#[derive(Debug)]
pub struct Iter<'a, T> {
    channel: &'a RingChannel<T>,
    done: bool,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.done {
            return None;
        }
        let item = self.channel.take();
        self.done = item.is_none();
        item
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a RingChannel<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
