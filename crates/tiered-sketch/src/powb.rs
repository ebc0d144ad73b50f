//! Precomputed powers-of-`b` table used to turn a slot's current counter
//! into a decay probability (`1 / b_pow(count)`).
//!
//! The base is fixed at 1.08: the slower-than-linear growth means a
//! frequently-confirmed slot becomes exponentially harder to evict, while a
//! cold slot (count 0 or 1) decays almost every draw.

use std::sync::OnceLock;

const BASE: f64 = 1.08;
const TABLE_LEN: usize = 513;

fn table() -> &'static [u64; TABLE_LEN] {
    static TABLE: OnceLock<[u64; TABLE_LEN]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut powers = [0u64; TABLE_LEN];
        for (exp, slot) in powers.iter_mut().enumerate() {
            *slot = BASE.powi(exp as i32) as u64;
        }
        powers
    })
}

/// Returns `floor(BASE^exp)`, saturating to `u64::MAX` once `exp` runs past
/// the precomputed table (which would take an implausibly long-lived slot).
pub(crate) fn powb(exp: u32) -> u64 {
    let exp = exp as usize;
    if exp < TABLE_LEN {
        table()[exp]
    } else {
        u64::MAX
    }
}
