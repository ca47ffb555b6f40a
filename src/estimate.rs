//! Cardinality estimators: linear counting, the raw HyperLogLog estimator,
//! and the bias-corrected/threshold blending used by `Hll` and the dense
//! `HyperLogLogPlus` path.

use crate::settings::Settings;
use crate::tables::estimate_bias;

/// Per-precision threshold (index `p - 4`) below which linear counting is
/// used instead of the bias-corrected raw estimate.
pub(crate) const THRESHOLD: [u32; 15] = [
    10, 20, 40, 80, 220, 400, 900, 1800, 3100, 6500, 11500, 20000, 50000, 120000, 350000,
];

/// Linear-counting estimator: `m * ln(m / v)`, `v` the count of empty
/// registers.
pub(crate) fn linear_counting(m: u32, v: u32) -> f64 {
    let mf = m as f64;
    mf * (mf / v as f64).ln()
}

/// Raw HyperLogLog estimate and the number of zero registers, from a dense
/// register array.
pub(crate) fn raw_estimate(reg: &[u8], alpha_msquared: f64) -> (f64, u32) {
    let mut sum = 0.0f64;
    let mut zeros = 0u32;

    for &r in reg {
        sum += 2f64.powi(-(r as i32));
        if r == 0 {
            zeros += 1;
        }
    }

    (alpha_msquared / sum, zeros)
}

/// HyperLogLog++ dense estimate: bias-corrected raw estimate when near the
/// low end of the range, linear counting below a per-precision threshold,
/// the raw estimate itself otherwise.
pub(crate) fn dense_estimate(reg: &[u8], settings: &Settings) -> u64 {
    let (raw, zeros) = raw_estimate(reg, settings.alpha_msquared);

    let estimate = if raw <= 5.0 * settings.m as f64 {
        raw - estimate_bias(settings.p, raw)
    } else {
        raw
    };

    let threshold = THRESHOLD[(settings.p - 4) as usize] as f64;
    let result = if zeros != 0 {
        let h = linear_counting(settings.m, zeros);
        if h <= threshold { h } else { estimate }
    } else {
        estimate
    };

    result.floor() as u64
}

/// Sparse-representation cardinality: linear counting over the sparse
/// precision's register space, treating every un-set bucket as zero.
pub(crate) fn sparse_estimate(m_prime: u32, count: u32) -> u64 {
    linear_counting(m_prime, m_prime - count).floor() as u64
}

/// Plain HyperLogLog estimate (no bias table): linear counting when small,
/// large-range correction when near the 32-bit hash space limit, otherwise
/// the raw estimate.
pub(crate) fn plain_estimate(reg: &[u8], settings: &Settings) -> u64 {
    let (raw, zeros) = raw_estimate(reg, settings.alpha_msquared);
    let m = settings.m as f64;

    let estimate = if raw <= 2.5 * m && zeros != 0 {
        linear_counting(settings.m, zeros)
    } else if raw <= (1.0 / 30.0) * 4294967296.0 {
        raw
    } else {
        -4294967296.0 * (1.0 - raw / 4294967296.0).ln()
    };

    estimate.floor() as u64
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn linear_counting_matches_hand_computation() {
        let h = linear_counting(16, 10);
        assert!((h - 16.0 * (16.0f64 / 10.0).ln()).abs() < 1e-9);
    }

    #[test]
    fn raw_estimate_all_zero_registers_is_alpha_msquared_over_m() {
        let reg = vec![0u8; 16];
        let (raw, zeros) = raw_estimate(&reg, crate::settings::alpha_m_squared(16));
        assert_eq!(zeros, 16);
        assert!((raw - crate::settings::alpha_m_squared(16) / 16.0).abs() < 1e-9);
    }

    #[test]
    fn dense_estimate_empty_registers_is_zero() {
        let settings = Settings::new(4, 18).unwrap();
        let reg = vec![0u8; settings.m as usize];
        assert_eq!(dense_estimate(&reg, &settings), 0);
    }
}
