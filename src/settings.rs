//! Precision validation and the precomputed constants derived from it.

use thiserror::Error;

pub(crate) const MIN_LOG2M: u8 = 4;
pub(crate) const MAX_LOG2M_PLAIN: u8 = 16;
pub(crate) const MAX_LOG2M_PLUS: u8 = 18;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("precision must be between 4 and {max}")]
    Precision { max: u8 },
    #[error("precision mismatch: {a} != {b}")]
    Mismatch { a: u8, b: u8 },
}

/// Precision `p`, its derived register count `m`, and the raw-estimator
/// constant `alpha(m) * m^2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) p: u8,
    pub(crate) m: u32,
    pub(crate) alpha_msquared: f64,
}

impl Settings {
    pub(crate) fn new(p: u8, max: u8) -> Result<Self, SettingsError> {
        if !(MIN_LOG2M..=max).contains(&p) {
            return Err(SettingsError::Precision { max });
        }

        let m = 1u32 << p;
        Ok(Self {
            p,
            m,
            alpha_msquared: alpha_m_squared(m),
        })
    }

    pub(crate) fn check(&self, other: &Self) -> Result<(), SettingsError> {
        if self.p == other.p {
            Ok(())
        } else {
            Err(SettingsError::Mismatch {
                a: self.p,
                b: other.p,
            })
        }
    }
}

/// alpha(m) * m^2, the constant in the raw HyperLogLog estimator.
pub(crate) fn alpha_m_squared(m: u32) -> f64 {
    let mf = m as f64;
    let alpha = match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / mf),
    };
    alpha * mf * mf
}
