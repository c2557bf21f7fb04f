//! Debug assertion macros for ring channel invariants.
//!
//! They are only active in debug builds (`#[cfg(debug_assertions)]`), so there
//! is zero overhead in release builds.
//!
//! Used by `Ring<T>` and `RingChannel<T>`.

// =============================================================================
// Bounded Count
// =============================================================================

/// Assert that the resident item count does not exceed capacity.
///
/// **Invariant**: `0 ≤ (head - tail) mod (capacity + 1) ≤ capacity`
///
/// Used in: `Ring::push()` after advancing the indices
macro_rules! debug_assert_bounded_count {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $count <= $capacity,
            "bounded count violated: count {} exceeds capacity {}",
            $count,
            $capacity
        )
    };
}

/// Assert that an index stays inside the slot array.
///
/// **Invariant**: `0 ≤ head, tail < capacity + 1`
macro_rules! debug_assert_index_in_bounds {
    ($name:literal, $idx:expr, $len:expr) => {
        debug_assert!(
            $idx < $len,
            "{} index {} outside slot array of length {}",
            $name,
            $idx,
            $len
        )
    };
}

// =============================================================================
// Slot Occupancy
// =============================================================================

/// Assert that the slot at `head` is vacant before a write.
///
/// **Invariant**: live items occupy exactly `tail..head`; the slot at `head`
/// is the gap slot and never holds an item.
///
/// Used in: `Ring::push()` before storing the new item
macro_rules! debug_assert_gap_vacant {
    ($occupied:expr, $head:expr) => {
        debug_assert!(
            !$occupied,
            "slot occupancy violated: gap slot {} holds a live item",
            $head
        )
    };
}

/// Assert that the slot at `tail` holds an item when the ring is non-empty.
///
/// **Invariant**: `head != tail ⟹ slots[tail].is_some()`
///
/// Used in: `Ring::pop()` and the eviction path of `Ring::push()`
macro_rules! debug_assert_occupied_read {
    ($occupied:expr, $tail:expr) => {
        debug_assert!(
            $occupied,
            "slot occupancy violated: reading empty slot {} inside the live range",
            $tail
        )
    };
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Assert that a closed channel is also finished.
///
/// **Invariant**: `closed ⟹ finished`, so consumers never block on a
/// channel that was torn down.
///
/// Used in: `RingChannel::close()`
macro_rules! debug_assert_closed_implies_finished {
    ($closed:expr, $finished:expr) => {
        debug_assert!(
            !$closed || $finished,
            "lifecycle violated: channel closed but not finished"
        )
    };
}

// =============================================================================
// Re-exports for crate-internal use
// =============================================================================

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_closed_implies_finished;
pub(crate) use debug_assert_gap_vacant;
pub(crate) use debug_assert_index_in_bounds;
pub(crate) use debug_assert_occupied_read;
