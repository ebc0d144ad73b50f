//! Loom-based concurrency tests for the SPSC ring protocol (§5, §8).
//!
//! Run with: `cargo test --features loom --test loom_tests --release`
//!
//! Loom exhaustively explores thread interleavings to catch ordering bugs
//! that only manifest under specific schedules. `loom`'s atomics are a
//! drop-in replacement for `std`'s but track happens-before relationships
//! during the search, so this file models the ring's producer/consumer
//! protocol directly against `loom::sync::atomic` rather than exercising
//! `tiered_ring::Ring` itself (which is hard-wired to `std::sync::atomic`).

#![cfg(feature = "loom")]

use loom::cell::UnsafeCell;
use loom::sync::atomic::{AtomicU64, Ordering};
use loom::sync::Arc;
use loom::thread;

/// A minimal single-producer/single-consumer ring mirroring
/// [`tiered_ring::Ring`]'s protocol: `tail` is written only by the
/// producer (Release on publish), `head` only by the consumer (Release on
/// advance), and each side Acquire-loads the other's index before trusting
/// it reflects a published write.
struct LoomRing {
    tail: AtomicU64,
    head: AtomicU64,
    buffer: UnsafeCell<[u64; 4]>,
    capacity: usize,
}

unsafe impl Send for LoomRing {}
unsafe impl Sync for LoomRing {}

impl LoomRing {
    fn new() -> Self {
        Self {
            tail: AtomicU64::new(0),
            head: AtomicU64::new(0),
            buffer: UnsafeCell::new([0; 4]),
            capacity: 4,
        }
    }

    fn mask(&self) -> usize {
        self.capacity - 1
    }

    fn push(&self, value: u64) -> bool {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        let space = self.capacity.saturating_sub((tail - head) as usize);
        if space == 0 {
            return false;
        }

        let idx = (tail as usize) & self.mask();

        // SAFETY: space > 0 means this slot was already consumed (or never
        // written), and only the producer writes here.
        self.buffer.with_mut(|buf| unsafe { (*buf)[idx] = value });

        self.tail.store(tail + 1, Ordering::Release);
        true
    }

    fn pop(&self) -> Option<u64> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        if head == tail {
            return None;
        }

        let idx = (head as usize) & self.mask();

        // SAFETY: tail > head was observed via an Acquire load that syncs
        // with the producer's Release store, so this slot's write is
        // visible here.
        let value = self.buffer.with(|buf| unsafe { (*buf)[idx] });

        self.head.store(head + 1, Ordering::Release);
        Some(value)
    }
}

/// Two items pushed before the consumer starts must be observed in the
/// order they were pushed, whatever interleaving loom finds.
#[test]
fn loom_spsc_preserves_fifo_order() {
    loom::model(|| {
        let ring = Arc::new(LoomRing::new());
        let ring2 = Arc::clone(&ring);

        let producer = thread::spawn(move || {
            ring2.push(42);
            ring2.push(43);
        });

        let consumer = thread::spawn(move || {
            let mut received = Vec::new();
            for _ in 0..10 {
                if let Some(v) = ring.pop() {
                    received.push(v);
                }
                if received.len() == 2 {
                    break;
                }
                loom::thread::yield_now();
            }
            received
        });

        producer.join().unwrap();
        let received = consumer.join().unwrap();

        if received.len() >= 2 {
            assert_eq!(received[0], 42);
            assert_eq!(received[1], 43);
        }
    });
}

/// A full ring rejects further pushes until the consumer frees a slot.
#[test]
fn loom_spsc_full_ring_rejects_until_consumed() {
    loom::model(|| {
        let ring = Arc::new(LoomRing::new());
        let ring2 = Arc::clone(&ring);

        assert!(ring.push(1));
        assert!(ring.push(2));
        assert!(ring.push(3));
        assert!(ring.push(4));
        assert!(!ring.push(5));

        let consumer = thread::spawn(move || ring2.pop());

        let value = consumer.join().unwrap();
        assert_eq!(value, Some(1));
        assert!(ring.push(5));
    });
}

/// Under any interleaving, the consumer never observes more items than the
/// producer actually published.
#[test]
fn loom_spsc_never_overconsumes() {
    loom::model(|| {
        let ring = Arc::new(LoomRing::new());
        let ring_producer = Arc::clone(&ring);
        let ring_consumer = Arc::clone(&ring);

        let sent = Arc::new(loom::sync::atomic::AtomicUsize::new(0));
        let received = Arc::new(loom::sync::atomic::AtomicUsize::new(0));

        let sent_clone = Arc::clone(&sent);
        let received_clone = Arc::clone(&received);

        let producer = thread::spawn(move || {
            if ring_producer.push(100) {
                sent_clone.fetch_add(1, Ordering::SeqCst);
            }
            if ring_producer.push(200) {
                sent_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        let consumer = thread::spawn(move || {
            for _ in 0..4 {
                if ring_consumer.pop().is_some() {
                    received_clone.fetch_add(1, Ordering::SeqCst);
                }
                loom::thread::yield_now();
            }
        });

        producer.join().unwrap();
        consumer.join().unwrap();

        let s = sent.load(Ordering::SeqCst);
        let r = received.load(Ordering::SeqCst);
        assert!(r <= s, "received {r} but only sent {s}");
    });
}
