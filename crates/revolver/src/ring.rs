use crate::invariants::{
    debug_assert_bounded_count, debug_assert_gap_vacant, debug_assert_index_in_bounds,
    debug_assert_occupied_read,
};
use crate::ChannelError;
use std::fmt;

// =============================================================================
// SLOT LAYOUT
// =============================================================================
//
// The ring holds `capacity + 1` slots so that `head == tail` always means
// "empty" without a separate counter:
//
// - `head` is the slot the next item is written to. It is always vacant.
// - `tail` is the oldest resident item (or equal to `head` when empty).
// - Live items occupy exactly the slots `tail..head` (modulo the length).
//
// When a write makes `head` catch up with `tail`, the ring has wrapped: the
// item at `tail` is the oldest one and is evicted on the spot, and `tail`
// moves forward. The evicted item is handed back to the caller, who decides
// when to drop it. Nothing stale is ever left behind in a slot.
//
// Slots are `Option<T>`. Moving an item out always goes through
// `Option::take`, so a slot can never release the same item twice.
//
// =============================================================================

/// Fixed-capacity lossy ring - the core building block.
///
/// A single-threaded circular buffer with drop-oldest semantics. It performs
/// no synchronization of its own; [`RingChannel`](crate::RingChannel) keeps it
/// behind a mutex and adds blocking, completion and teardown on top.
pub struct Ring<T> {
    /// `capacity + 1` slots, fixed at construction.
    slots: Box<[Option<T>]>,
    /// Next write position (always a vacant slot)
    head: usize,
    /// Oldest resident item
    tail: usize,
}

impl<T> Ring<T> {
    /// Creates an empty ring able to hold `capacity` items.
    ///
    /// Fails with [`ChannelError::InvalidCapacity`] if `capacity` is zero or
    /// the `capacity + 1` slots cannot be allocated.
    pub fn new(capacity: usize) -> Result<Self, ChannelError> {
        let invalid = ChannelError::InvalidCapacity { capacity };
        let len = capacity
            .checked_add(1)
            .filter(|_| capacity >= 1)
            .ok_or(invalid)?;

        let mut slots = Vec::new();
        slots.try_reserve_exact(len).map_err(|_| invalid)?;
        slots.resize_with(len, || None);

        Ok(Self {
            slots: slots.into_boxed_slice(),
            head: 0,
            tail: 0,
        })
    }

    // ---------------------------------------------------------------------
    // STATUS
    // ---------------------------------------------------------------------

    /// Returns the maximum number of resident items.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Returns the number of resident items.
    #[inline]
    pub fn len(&self) -> usize {
        let n = self.slots.len();
        (self.head + n - self.tail) % n
    }

    /// Returns true if no item is resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Returns true if the next push will evict the oldest item.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    #[inline]
    fn next(&self, idx: usize) -> usize {
        (idx + 1) % self.slots.len()
    }

    // ---------------------------------------------------------------------
    // WRITE / READ
    // ---------------------------------------------------------------------

    /// Stores `item` as the newest entry.
    ///
    /// If the ring was full, the oldest item is evicted and returned. The
    /// caller owns it from then on; dropping it is the release.
    pub fn push(&mut self, item: T) -> Option<T> {
        let head = self.head;
        debug_assert_index_in_bounds!("head", head, self.slots.len());
        debug_assert_gap_vacant!(self.slots[head].is_some(), head);

        self.slots[head] = Some(item);
        self.head = self.next(head);

        // Wrapped: head caught up with tail, so the oldest item must go.
        let evicted = if self.head == self.tail {
            let tail = self.tail;
            let oldest = self.slots[tail].take();
            debug_assert_occupied_read!(oldest.is_some(), tail);
            self.tail = self.next(tail);
            oldest
        } else {
            None
        };

        debug_assert_bounded_count!(self.len(), self.capacity());
        evicted
    }

    /// Removes and returns the oldest item, or `None` if the ring is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let tail = self.tail;
        debug_assert_index_in_bounds!("tail", tail, self.slots.len());
        let item = self.slots[tail].take();
        debug_assert_occupied_read!(item.is_some(), tail);
        self.tail = self.next(tail);
        item
    }

    /// Moves every resident item out, oldest first, leaving the ring empty.
    pub(crate) fn drain_all(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        while let Some(item) = self.pop() {
            out.push(item);
        }
        debug_assert!(self.slots.iter().all(Option::is_none));
        out
    }
}

impl<T> fmt::Debug for Ring<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}
