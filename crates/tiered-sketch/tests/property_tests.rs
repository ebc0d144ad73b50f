//! Property tests for [`tiered_sketch::Sketch`] (§8): counters never exceed
//! `u16::MAX`, a sketch holding only one key reports its exact push count up
//! to saturation, and a key touched once survives a burst of unrelated
//! pushes with reasonable probability.

use proptest::prelude::*;
use tiered_sketch::Sketch;

proptest! {
    /// A sketch that has only ever seen one key never collides with
    /// itself, so its reported count tracks the push count exactly, up to
    /// `u16::MAX` saturation.
    #[test]
    fn single_key_count_matches_pushes_up_to_saturation(
        key in any::<u64>(),
        pushes in 0u32..3_000,
    ) {
        let mut sketch = Sketch::new(4096, 4).unwrap();
        for _ in 0..pushes {
            sketch.push(key);
        }
        let expected = pushes.min(u32::from(u16::MAX)) as u16;
        prop_assert_eq!(sketch.get(key), expected);
    }

    /// However many distinct keys are pushed, no reported count ever
    /// exceeds the saturating counter's maximum.
    #[test]
    fn counts_never_exceed_u16_max(
        keys in prop::collection::vec(0u64..64, 0..2_000),
    ) {
        let mut sketch = Sketch::new(256, 4).unwrap();
        for &key in &keys {
            let count = sketch.push(key);
            prop_assert!(count <= u16::MAX);
        }
        for key in 0u64..64 {
            prop_assert!(sketch.get(key) <= u16::MAX);
        }
    }

    /// `get` never mutates the table: reading the same key repeatedly
    /// after a round of pushes always returns the same value.
    #[test]
    fn get_is_idempotent(
        keys in prop::collection::vec(0u64..64, 0..500),
        probe in 0u64..64,
    ) {
        let mut sketch = Sketch::new(256, 4).unwrap();
        for &key in &keys {
            sketch.push(key);
        }
        let first = sketch.get(probe);
        let second = sketch.get(probe);
        let third = sketch.get(probe);
        prop_assert_eq!(first, second);
        prop_assert_eq!(second, third);
    }
}

/// §4.2/§8: after inserting `K` once and then pushing `M` unrelated keys,
/// `get(K) >= 1` with probability bounded below by `(1 - 1/b)^M` per row.
/// That bound is the worst case for a *single* row (every one of the `M`
/// pushes happens to collide with that row's slot); the probability that
/// at least one of `DEPTH` independent rows retains the fingerprint is only
/// higher, so the per-row bound is a valid — if very loose — floor for the
/// aggregate retention rate measured here. This is inherently statistical,
/// so it runs many independent trials and checks the aggregate rate rather
/// than asserting on a single sample.
#[test]
fn a_single_touch_survives_unrelated_pushes_with_reasonable_probability() {
    const TRIALS: u32 = 300;
    const WIDTH: u32 = 4096;
    const DEPTH: u32 = 4;
    const UNRELATED_PUSHES: u64 = 50;
    const BASE: f64 = 1.08;

    let min_acceptable_rate = (1.0 - 1.0 / BASE).powi(UNRELATED_PUSHES as i32);

    let mut survived = 0u32;
    for trial in 0..TRIALS {
        let mut sketch = Sketch::new(WIDTH, DEPTH).unwrap();
        let key = u64::from(trial) * 0x9E37_79B9 + 1;
        sketch.push(key);
        for i in 0..UNRELATED_PUSHES {
            sketch.push(key.wrapping_add(i + 1).wrapping_mul(0xBF58_476D_1CE4_E5B9));
        }
        if sketch.get(key) >= 1 {
            survived += 1;
        }
    }

    let rate = f64::from(survived) / f64::from(TRIALS);
    assert!(
        rate >= min_acceptable_rate,
        "retention rate {rate} fell below the acceptable floor {min_acceptable_rate} \
         ({survived}/{TRIALS} trials retained the key)"
    );
}
