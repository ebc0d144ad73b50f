use crate::mt19937;
use crate::powb::powb;
use thiserror::Error;
use xxhash_rust::xxh32::xxh32;

/// Independent hash seeds. Entries `0..31` seed the row hashes (so `d` must
/// not exceed 31); entry 31 is reserved for the fingerprint hash and is
/// never used as a row seed, so a slot's fingerprint and its bucket
/// assignment never collide on the same randomness. Entry 32 is unused,
/// carried along only because it appears in the table this was ported from.
const FINGERPRINT_SEED_INDEX: usize = 31;
const SEEDS: [u32; 33] = [
    0xcc85_8657,
    0xb196_383b,
    0xded8_fa0b,
    0x2ef3_1ba9,
    0x21dc_3c2d,
    0x589f_ba0d,
    0x9267_45a7,
    0xa48f_b499,
    0x707a_4be7,
    0x2f5c_a7a9,
    0xe1b0_b4cd,
    0xafa9_81d1,
    0xd269_60fd,
    0x57ed_5b57,
    0x0fdc_a4b5,
    0x432c_0941,
    0x9a53_2e05,
    0x6079_424d,
    0xb0d4_8419,
    0x6b16_6797,
    0x8189_081f,
    0xab5d_d26f,
    0x0463_e579,
    0xc177_e407,
    0x598d_7fd1,
    0x9b3c_2fe3,
    0x0af5_34c9,
    0xfb40_8885,
    0x464d_8ff3,
    0x030b_94ab,
    0x8698_5b87,
    0xfad1_49f7,
    0x696b_378b,
];

#[derive(Debug, Error)]
pub enum SketchError {
    #[error("failed to allocate sketch table of {w} x {d} slots")]
    AllocationFailed { w: u32, d: u32 },
}

#[derive(Clone, Copy, Default)]
struct Slot {
    fingerprint: u16,
    count: u16,
}

/// A streaming, decaying count sketch.
///
/// `W` columns by `D` rows of `{fingerprint, count}` slots. [`push`](Self::push)
/// is the only thing that mutates the table; [`get`](Self::get) is a pure
/// read. Neither knows anything about a top-k structure — pairing this with
/// a heap is the caller's job.
pub struct Sketch {
    w: u32,
    d: u32,
    slots: Vec<Slot>,
}

impl Sketch {
    /// Builds a sketch with `w` columns and `d` rows. `d` must not exceed
    /// the number of available row seeds (31); `w` must be non-zero.
    pub fn new(w: u32, d: u32) -> Result<Self, SketchError> {
        assert!(w > 0, "sketch width must be non-zero");
        assert!(
            (d as usize) <= FINGERPRINT_SEED_INDEX,
            "sketch depth must leave one seed for the fingerprint hash"
        );

        let total = w as usize * d as usize;
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(total)
            .map_err(|_| SketchError::AllocationFailed { w, d })?;
        slots.resize(total, Slot::default());

        Ok(Self { w, d, slots })
    }

    #[inline]
    fn fingerprint(key: u64) -> u16 {
        (xxh32(&key.to_ne_bytes(), SEEDS[FINGERPRINT_SEED_INDEX]) & 0xFFFF) as u16
    }

    #[inline]
    fn row_index(&self, key: u64, row: u32) -> usize {
        (xxh32(&key.to_ne_bytes(), SEEDS[row as usize]) % self.w) as usize
    }

    #[inline]
    fn slot_at(&self, row: u32, col: usize) -> usize {
        row as usize * self.w as usize + col
    }

    /// Registers one observation of `key`, returning the slot-wise maximum
    /// counter value for `key`'s fingerprint after the update.
    ///
    /// For each row, a matching fingerprint is simply incremented
    /// (saturating). A mismatched slot decays with probability
    /// `1 / b_pow(count)`; once its counter reaches zero (or was already at
    /// most 1), the slot is reclaimed by `key`'s fingerprint with a fresh
    /// count of 1.
    pub fn push(&mut self, key: u64) -> u16 {
        let fingerprint = Self::fingerprint(key);
        let mut count = 0u16;

        for row in 0..self.d {
            let col = self.row_index(key, row);
            let idx = self.slot_at(row, col);
            let slot = &mut self.slots[idx];

            if slot.fingerprint == fingerprint {
                slot.count = slot.count.saturating_add(1);
                count = count.max(slot.count);
            } else if mt19937::next_u64() % powb(u32::from(slot.count)) == 0 {
                if slot.count <= 1 {
                    slot.fingerprint = fingerprint;
                    slot.count = 1;
                    count = count.max(1);
                } else {
                    slot.count -= 1;
                }
            }
        }

        count
    }

    /// Reads the current slot-wise maximum counter value for `key`'s
    /// fingerprint, without mutating any slot or drawing randomness.
    #[must_use]
    pub fn get(&self, key: u64) -> u16 {
        let fingerprint = Self::fingerprint(key);
        let mut count = 0u16;

        for row in 0..self.d {
            let col = self.row_index(key, row);
            let slot = &self.slots[self.slot_at(row, col)];
            if slot.fingerprint == fingerprint {
                count = count.max(slot.count);
            }
        }

        count
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.w
    }

    #[must_use]
    pub fn depth(&self) -> u32 {
        self.d
    }
}
