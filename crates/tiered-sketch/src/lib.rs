//! A streaming, decaying count sketch ("SDS") for approximating how often a
//! key (in practice, a page frame number) has been recently accessed.
//!
//! This is a Count-Min-Sketch variant with one twist: instead of counters
//! that only ever grow, a slot whose stored fingerprint doesn't match the
//! queried key decays probabilistically, and once it hits zero it is
//! reclaimed by the new fingerprint. That makes old, no-longer-hot keys fall
//! out of the sketch instead of permanently occupying a slot.
//!
//! [`Sketch`] only ever hands back a plain count from [`Sketch::push`] — it
//! has no notion of a top-k structure. Callers that want to track the
//! highest-count keys pair a `Sketch` with a heap of their own (see
//! `tiered-heap`).

mod mt19937;
mod powb;
mod sketch;

pub use sketch::{Sketch, SketchError};
