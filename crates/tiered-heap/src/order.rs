use crate::pair::Pair;

/// Decides which of two [`Pair`]s sits closer to the heap's root.
///
/// Implementations must be a strict total order (ties broken by `key`) so
/// that sift-up/sift-down terminate and the heap property is well-defined.
/// This is the single knob that turns the same indexed-heap machinery into
/// either a min-heap (promotion candidates, §4.3/§4.5) or a max-heap
/// (demotion candidates).
pub trait HeapOrder {
    /// Returns `true` if `a` should be above `b` in the heap (i.e. `a` is
    /// the one a sift-up would promote over `b`).
    fn precedes(a: &Pair, b: &Pair) -> bool;
}

/// Smallest `value` at the root, ties broken by smallest `key`.
///
/// Used for the promotion heap: PMEM pages are tracked here, and a full
/// heap evicts its smallest-count member whenever a hotter page arrives
/// (top-`candidate_size`-by-largest-value, implemented as a min-heap so the
/// weakest kept element — the one to evict — is always at the root).
#[derive(Debug, Clone, Copy)]
pub struct MinOrder;

impl HeapOrder for MinOrder {
    #[inline]
    fn precedes(a: &Pair, b: &Pair) -> bool {
        (a.value, a.key) < (b.value, b.key)
    }
}

/// Largest `value` at the root, ties broken by smallest `key`.
///
/// Used for the demotion heap: DRAM pages are tracked here, and a full heap
/// evicts its largest-count member whenever a colder page arrives
/// (top-`candidate_size`-by-smallest-value, implemented as a max-heap).
#[derive(Debug, Clone, Copy)]
pub struct MaxOrder;

impl HeapOrder for MaxOrder {
    #[inline]
    fn precedes(a: &Pair, b: &Pair) -> bool {
        a.value > b.value || (a.value == b.value && a.key < b.key)
    }
}
