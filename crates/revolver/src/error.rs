//! Error types for ring channel operations.

use thiserror::Error;

/// Errors raised when building a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// Capacity was zero (or too large to allocate `capacity + 1` slots).
    #[error("invalid capacity {capacity}: must be at least 1 and fit in memory")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },
}

/// Errors returned by [`RingChannel::try_take`](crate::RingChannel::try_take).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TryTakeError {
    /// No item is queued right now, but more may arrive.
    #[error("channel is empty")]
    Empty,

    /// No item is queued and the producer side has finished.
    #[error("channel is finished and drained")]
    Finished,
}

impl TryTakeError {
    /// Returns `true` if no item will ever be available again.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

/// Errors returned by [`RingChannel::take_timeout`](crate::RingChannel::take_timeout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TakeTimeoutError {
    /// The deadline passed before an item arrived.
    #[error("timed out waiting for an item")]
    Timeout,

    /// No item is queued and the producer side has finished.
    #[error("channel is finished and drained")]
    Finished,
}

impl TakeTimeoutError {
    /// Returns `true` if no item will ever be available again.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished)
    }
}
