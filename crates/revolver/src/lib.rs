//! Revolver - Lossy Bounded Ring Channel
//!
//! A fixed-capacity circular buffer shared by any number of producer and
//! consumer threads. Producers never block: when the buffer is full, a new
//! item overwrites the oldest queued one, which is dropped on the spot.
//! Consumers block until an item arrives or the producer side declares the
//! stream finished.
//!
//! Every item is dropped exactly once, whichever way it leaves the channel:
//! taken by a consumer (the consumer owns it from then on), evicted by a newer
//! item, or still queued when the channel is closed or dropped.
//!
//! # Key Features
//!
//! - Drop-oldest overwrite instead of producer backpressure
//! - Blocking `take` with deterministic end-of-stream via `finish`
//! - Non-blocking `try_take` and bounded `take_timeout`
//! - Exactly-once release through `Option` slots and move semantics
//! - Optional metrics (added, evicted, taken, released on close)
//!
//! # Example
//!
//! ```
//! use revolver::RingChannel;
//! use std::thread;
//!
//! let channel = RingChannel::<u64>::new(4).unwrap();
//!
//! let producer = channel.clone();
//! let handle = thread::spawn(move || {
//!     for i in 0..100 {
//!         producer.add(i); // never blocks, may drop old items
//!     }
//!     producer.finish();
//! });
//!
//! // Consume until end-of-stream
//! let mut last = None;
//! while let Some(item) = channel.take() {
//!     last = Some(item);
//! }
//! handle.join().unwrap();
//!
//! // The newest item always survives
//! assert_eq!(last, Some(99));
//! ```

mod channel;
mod config;
mod error;
mod invariants;
mod metrics;
mod ring;
mod sync;

pub use channel::{Iter, RingChannel};
pub use config::{Config, LATEST_ONLY_CONFIG};
pub use error::{ChannelError, TakeTimeoutError, TryTakeError};
pub use metrics::MetricsSnapshot;
pub use ring::Ring;
