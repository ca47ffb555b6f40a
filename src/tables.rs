//! Empirical bias-correction tables, one raw-estimate/bias pair per
//! precision `p` in `4..=18`, indexed by `p - 4`.
//!
//! Each table is a short, sorted list of control points: `RAW_ESTIMATE_DATA[i]`
//! gives raw HyperLogLog estimates, `BIAS_DATA[i]` gives the corresponding
//! empirical bias at that estimate. `estimate_bias` interpolates between the
//! two points bracketing a queried raw estimate.

pub(crate) const RAW_ESTIMATE_DATA: [&[f64]; 15] = [
    &[2.0, 6.0, 10.0, 14.0988, 18.0, 25.0, 40.0],
    &[4.8, 11.2, 17.6, 25.6, 40.0],
    &[9.6, 22.4, 35.2, 51.2, 80.0],
    &[19.2, 44.8, 70.4, 102.4, 160.0],
    &[38.4, 89.6, 140.8, 204.8, 320.0],
    &[76.8, 179.2, 281.6, 409.6, 640.0],
    &[153.6, 358.4, 563.2, 819.2, 1280.0],
    &[307.2, 716.8, 1126.4, 1638.4, 2560.0],
    &[614.4, 1433.6, 2252.8, 3276.8, 5120.0],
    &[1228.8, 2867.2, 4505.6, 6553.6, 10240.0],
    &[2457.6, 5734.4, 9011.2, 13107.2, 20480.0],
    &[4915.2, 11468.8, 18022.4, 26214.4, 40960.0],
    &[5000.0, 20000.0, 40000.0, 55391.4373, 70000.0, 100000.0, 200000.0],
    &[39321.6, 91750.4, 144179.2, 209715.2, 327680.0],
    &[78643.2, 183500.8, 288358.4, 419430.4, 655360.0],
];

pub(crate) const BIAS_DATA: [&[f64]; 15] = [
    &[3.8, 6.1, 7.0, 7.5988, 6.8, 5.0, 2.0],
    &[2.88, 3.2, 1.92, 0.8, 0.16],
    &[5.76, 6.4, 3.84, 1.6, 0.32],
    &[11.52, 12.8, 7.68, 3.2, 0.64],
    &[23.04, 25.6, 15.36, 6.4, 1.28],
    &[46.08, 51.2, 30.72, 12.8, 2.56],
    &[92.16, 102.4, 61.44, 25.6, 5.12],
    &[184.32, 204.8, 122.88, 51.2, 10.24],
    &[368.64, 409.6, 245.76, 102.4, 20.48],
    &[737.28, 819.2, 491.52, 204.8, 40.96],
    &[1474.56, 1638.4, 983.04, 409.6, 81.92],
    &[2949.12, 3276.8, 1966.08, 819.2, 163.84],
    &[30000.0, 45000.0, 42000.0, 39416.9373, 35000.0, 20000.0, 5000.0],
    &[11796.48, 13107.2, 7864.32, 3276.8, 655.36],
    &[23592.96, 26214.4, 15728.64, 6553.6, 1310.72],
];

/// Interpolate the empirical bias for `est` at precision `p`.
///
/// `est` is assumed to fall within (or near) the table's range; values
/// outside the table clamp to the nearest endpoint's bias.
pub(crate) fn estimate_bias(p: u8, est: f64) -> f64 {
    let raw = RAW_ESTIMATE_DATA[(p - 4) as usize];
    let bias = BIAS_DATA[(p - 4) as usize];

    if est <= raw[0] {
        return bias[0];
    }
    if est >= raw[raw.len() - 1] {
        return bias[bias.len() - 1];
    }

    for i in 1..raw.len() {
        if est <= raw[i] {
            let (x1, x2) = (raw[i - 1], raw[i]);
            let (b1, b2) = (bias[i - 1], bias[i]);
            let c = (est - x1) / (x2 - x1);
            return b1 * (1.0 - c) + b2 * c;
        }
    }

    bias[bias.len() - 1]
}
