//! Loom-based concurrency tests for revolver.
//!
//! Run with: `cargo test --features loom --test loom_tests --release`
//!
//! With the `loom` feature the channel's mutex and condition variable come
//! from loom, so these models exercise the real `RingChannel` under every
//! interleaving loom can produce. Capacities and item counts are tiny to keep
//! the state space manageable.

#![cfg(feature = "loom")]

use loom::sync::atomic::{AtomicUsize, Ordering};
use loom::sync::Arc;
use loom::thread;
use revolver::RingChannel;

struct Counted {
    id: usize,
    drops: Arc<[AtomicUsize; 3]>,
}

impl Drop for Counted {
    fn drop(&mut self) {
        self.drops[self.id].fetch_add(1, Ordering::SeqCst);
    }
}

fn counters() -> Arc<[AtomicUsize; 3]> {
    Arc::new([AtomicUsize::new(0), AtomicUsize::new(0), AtomicUsize::new(0)])
}

/// A blocked consumer is woken by a concurrent add.
#[test]
fn loom_take_woken_by_add() {
    loom::model(|| {
        let ch = RingChannel::<u64>::new(1).unwrap();
        let producer = ch.clone();

        let handle = thread::spawn(move || {
            producer.add(7);
        });

        assert_eq!(ch.take(), Some(7));
        handle.join().unwrap();
    });
}

/// A blocked consumer is woken by finish and sees end-of-stream.
#[test]
fn loom_take_woken_by_finish() {
    loom::model(|| {
        let ch = RingChannel::<u64>::new(1).unwrap();
        let producer = ch.clone();

        let handle = thread::spawn(move || {
            producer.finish();
        });

        assert_eq!(ch.take(), None);
        handle.join().unwrap();
    });
}

/// Two consumers, one item, then finish: exactly one gets the item.
#[test]
fn loom_two_consumers_single_delivery() {
    loom::model(|| {
        let ch = RingChannel::<u64>::new(2).unwrap();
        let c1 = ch.clone();
        let c2 = ch.clone();

        let h1 = thread::spawn(move || c1.take());
        let h2 = thread::spawn(move || c2.take());

        ch.add(1);
        ch.finish();

        let got: Vec<_> = [h1.join().unwrap(), h2.join().unwrap()]
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(got, vec![1]);
    });
}

/// Overwrite racing with take: every item is released exactly once.
#[test]
fn loom_overwrite_vs_take_exactly_once() {
    loom::model(|| {
        let drops = counters();
        let ch = RingChannel::new(1).unwrap();

        let producer = ch.clone();
        let producer_drops = Arc::clone(&drops);
        let handle = thread::spawn(move || {
            for id in 0..3 {
                producer.add(Counted {
                    id,
                    drops: Arc::clone(&producer_drops),
                });
            }
            producer.finish();
        });

        let mut taken = Vec::new();
        while let Some(item) = ch.take() {
            taken.push(item.id);
        }
        handle.join().unwrap();
        ch.close();

        // The newest item can never be evicted.
        assert_eq!(taken.last(), Some(&2));
        for counter in drops.iter() {
            assert_eq!(counter.load(Ordering::SeqCst), 1);
        }
    });
}

/// Close racing with add: the item is released either way, exactly once.
#[test]
fn loom_close_vs_add() {
    loom::model(|| {
        let drops = counters();
        let ch = RingChannel::new(2).unwrap();

        let producer = ch.clone();
        let producer_drops = Arc::clone(&drops);
        let handle = thread::spawn(move || {
            producer.add(Counted {
                id: 0,
                drops: producer_drops,
            });
        });

        ch.close();
        handle.join().unwrap();

        assert_eq!(drops[0].load(Ordering::SeqCst), 1);
        assert_eq!(ch.count(), 0);
    });
}
