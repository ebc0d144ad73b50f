use crate::order::HeapOrder;
use crate::pair::Pair;
use std::collections::HashMap;
use std::marker::PhantomData;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeapError {
    #[error("failed to allocate heap storage for {capacity} elements")]
    AllocationFailed { capacity: usize },
}

/// The result of [`IndexedHeap::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The heap had spare capacity; `elem` was appended.
    Inserted,
    /// `elem.key` was already present with a different value; the stored
    /// pair is returned as it was before the update.
    Updated(Pair),
    /// `elem.key` was already present with the same value; nothing changed.
    Unchanged(Pair),
    /// The heap was full and `elem` outranked the root; the evicted root
    /// is returned.
    Replaced(Pair),
    /// The heap was full and `elem` did not outrank the root; no mutation.
    Rejected,
}

/// A bounded heap over `(key, value)` [`Pair`]s with O(log n) insert/update/
/// replace and O(1) key lookup via a side index.
///
/// `O` selects the ordering (see [`crate::MinOrder`]/[`crate::MaxOrder`]);
/// everything else about the structure is orientation-agnostic. The side
/// index (`key -> array position`) is kept in lockstep with the backing
/// array by a single swap routine (`swap`) that every sift-up/sift-down
/// step routes through — the one place positions can change.
pub struct IndexedHeap<O> {
    data: Vec<Pair>,
    index: HashMap<u64, usize>,
    capacity: usize,
    _order: PhantomData<O>,
}

impl<O: HeapOrder> IndexedHeap<O> {
    /// Creates an empty heap with room for `capacity` elements.
    pub fn new(capacity: usize) -> Result<Self, HeapError> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| HeapError::AllocationFailed { capacity })?;
        Ok(Self {
            data,
            index: HashMap::with_capacity(capacity),
            capacity,
            _order: PhantomData,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.data.len() >= self.capacity
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// O(1) lookup of the pair currently stored for `key`, if present.
    #[must_use]
    pub fn get(&self, key: u64) -> Option<&Pair> {
        self.index.get(&key).map(|&pos| &self.data[pos])
    }

    /// O(1) access to the pair at the heap's root.
    #[must_use]
    pub fn peek_root(&self) -> Option<&Pair> {
        self.data.first()
    }

    /// Swaps the pairs at `i` and `j`, keeping the side index in lockstep.
    /// This is the only place array positions change.
    fn swap(&mut self, i: usize, j: usize) {
        self.data.swap(i, j);
        self.index.insert(self.data[i].key, i);
        self.index.insert(self.data[j].key, j);
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if O::precedes(&self.data[idx], &self.data[parent]) {
                self.swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            let mut best = idx;
            if left < len && O::precedes(&self.data[left], &self.data[best]) {
                best = left;
            }
            if right < len && O::precedes(&self.data[right], &self.data[best]) {
                best = right;
            }
            if best == idx {
                break;
            }
            self.swap(idx, best);
            idx = best;
        }
    }

    /// Inserts or updates `elem`. See [`Outcome`] for the possible results.
    pub fn insert(&mut self, elem: Pair) -> Outcome {
        if let Some(&pos) = self.index.get(&elem.key) {
            let old = self.data[pos];
            if old.value == elem.value {
                return Outcome::Unchanged(old);
            }
            self.data[pos] = elem;
            self.sift_up(pos);
            // sift_up may have moved the element; look up its current spot
            // before sifting down (at most one of the two directions is a
            // no-op, never both reordering anything further).
            let pos = self.index[&elem.key];
            self.sift_down(pos);
            return Outcome::Updated(old);
        }

        if self.data.len() < self.capacity {
            self.data.push(elem);
            let idx = self.data.len() - 1;
            self.index.insert(elem.key, idx);
            self.sift_up(idx);
            return Outcome::Inserted;
        }

        if self.capacity == 0 {
            return Outcome::Rejected;
        }

        let root = self.data[0];
        if O::precedes(&root, &elem) {
            self.index.remove(&root.key);
            self.data[0] = elem;
            self.index.insert(elem.key, 0);
            self.sift_down(0);
            Outcome::Replaced(root)
        } else {
            Outcome::Rejected
        }
    }

    /// Removes and returns the pair at the *last* array slot — not the
    /// root. This is how the migration worker skims candidates off a heap
    /// without paying for a canonical heap-pop; truncating the tail never
    /// violates the heap property, since the tail holds a leaf.
    pub fn pop_back(&mut self) -> Option<Pair> {
        let pair = self.data.pop()?;
        self.index.remove(&pair.key);
        Some(pair)
    }

    /// Iterates the current contents in arbitrary (array) order.
    pub fn iter(&self) -> impl Iterator<Item = &Pair> {
        self.data.iter()
    }
}
