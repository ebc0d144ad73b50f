use tiered_heap::{HeapError, IndexedHeap, MaxOrder, MinOrder, Pair};

/// Which way a migration moves pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// DRAM -> PMEM.
    Down,
    /// PMEM -> DRAM.
    Up,
}

/// The demotion and promotion I-Heaps (§4.3, §4.5), held together because
/// the engine's single mutex protects both as one logical unit.
///
/// Orientation is deliberately inverted from what a glance might suggest:
/// the demotion heap is a **max-heap** so `pop_back` skims from the tail
/// while the root holds the hottest DRAM page (the one least likely to be
/// demoted); the promotion heap is a **min-heap**, root holding the
/// coldest PMEM page under consideration. This is the subtle correctness
/// property documented at §4.5 — it is not re-derived anywhere else in
/// this crate.
pub struct CandidateHeaps {
    pub demotion: IndexedHeap<MaxOrder>,
    pub promotion: IndexedHeap<MinOrder>,
}

impl CandidateHeaps {
    pub fn new(capacity: usize) -> Result<Self, HeapError> {
        Ok(Self {
            demotion: IndexedHeap::new(capacity)?,
            promotion: IndexedHeap::new(capacity)?,
        })
    }
}

/// The filter applied to each `pop_back`'d pair in `do_migration` (§4.6):
/// demotion candidates must be truly cold (`value <= 1`), promotion
/// candidates must be hot (`value > 1`). Returns `true` when `pair` should
/// be skipped (filtered out) rather than isolated.
#[must_use]
pub fn is_filtered(pair: Pair, dir: Direction) -> bool {
    (pair.value > 1) ^ (dir == Direction::Down)
}
