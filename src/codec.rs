//! Sparse hash codec: packs a 64-bit hash into a single 32-bit code that
//! carries both the sparse index and enough run-length information to
//! recover the dense `(index, register)` pair under any `p <= p'`.
//!
//! `encode_hash` splits the hash into a 25-bit sparse index `idx'` (the top
//! bits, always at the fixed sparse precision regardless of `p`) and a tail
//! (the bits between the dense index at `p` and `idx'`). When that tail is
//! all zero, the dense register value can't be recovered from `idx'` alone,
//! so the code instead packs the leading-zero run of the remaining suffix
//! directly: `(idx' << 7) | (zeros << 1) | 1`, the low bit acting as a flag.
//! When the tail is nonzero, the dense register is recoverable from `idx'`
//! itself (its own leading zeros below `p`), so the code is just
//! `idx' << 1`, flag bit clear. `get_index`/`decode_hash` invert this: given
//! `p <= p'`, they re-derive the dense index by re-truncating `idx'` to `p`
//! bits, and the register either from the packed run length (flag set) or
//! by counting leading zeros of `idx'`'s own low bits (flag clear).

use crate::bits::{clz32, clz64, eb32, eb64};

/// Fixed sparse precision. The sparse index space always uses 25 bits
/// regardless of the dense precision `p` in effect.
pub(crate) const SPARSE_PRECISION: u8 = 25;

pub(crate) fn encode_hash(x: u64, p: u8) -> u32 {
    let p_prime = SPARSE_PRECISION as u32;
    let p = p as u32;

    let idx_prime = eb64(x, 64, 64 - p_prime) as u32;
    let tail = eb64(x, 64 - p, 64 - p_prime);

    if tail == 0 {
        let shifted = (eb64(x, 64 - p_prime, 0) << p_prime) | (1u64 << (p_prime - 1));
        let zeros = clz64(shifted) + 1;
        (idx_prime << 7) | (zeros << 1) | 1
    } else {
        idx_prime << 1
    }
}

pub(crate) fn get_index(k: u32, p: u8) -> u32 {
    let p_prime = SPARSE_PRECISION as u32;
    let p = p as u32;

    if k & 1 == 1 {
        eb32(k, 32, 32 - p)
    } else {
        eb32(k, p_prime + 1, p_prime - p + 1)
    }
}

pub(crate) fn decode_hash(k: u32, p: u8) -> (u32, u8) {
    let p_prime = SPARSE_PRECISION as u32;
    let p = p as u32;

    let i = get_index(k, p as u8);

    let r = if k & 1 == 1 {
        (eb32(k, 7, 1) + (p_prime - p)) as u8
    } else {
        (clz32(k << (32 - p_prime + p - 1)) + 1) as u8
    };

    (i, r)
}
