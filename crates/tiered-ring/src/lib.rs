//! Lock-free single-producer/single-consumer ring buffers, and a
//! ring-decomposed multi-producer channel built on top of them.
//!
//! A [`Ring<T>`] is the building block: one producer, one consumer, no
//! locks, no allocation on the hot path. A [`Channel<T>`] hands out one
//! dedicated [`Ring<T>`] per registered [`Producer<T>`], which is how this
//! crate gets multi-producer behavior without ever sharing a ring's
//! producer side across threads.

mod backoff;
mod channel;
mod config;
mod invariants;
mod metrics;
mod reservation;
mod ring;

pub use backoff::Backoff;
pub use channel::{Channel, ChannelError, Producer};
pub use config::{Config, HIGH_THROUGHPUT_CONFIG, LOW_LATENCY_CONFIG};
pub use metrics::{Metrics, MetricsSnapshot};
pub use reservation::Reservation;
pub use ring::Ring;
