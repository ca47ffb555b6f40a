//! Plain HyperLogLog: a fixed dense register array over 32-bit hashes, no
//! sparse representation and no bias correction.

use crate::bits::clz32;
use crate::estimate::plain_estimate;
use crate::registers::RegisterArray;
use crate::settings::{Settings, MAX_LOG2M_PLAIN};
use crate::HllError;

/// A plain HyperLogLog estimator over `m = 2^p` 6-bit registers, `p` in
/// `4..=16`.
#[derive(Clone, Debug, PartialEq)]
pub struct Hll {
    settings: Settings,
    reg: Vec<u8>,
}

impl Hll {
    pub fn new(p: u8) -> Result<Self, HllError> {
        let settings = Settings::new(p, MAX_LOG2M_PLAIN)?;
        Ok(Self {
            reg: vec![0u8; settings.m as usize],
            settings,
        })
    }

    pub fn add(&mut self, hash: u32) {
        let p = self.settings.p as u32;
        let i = hash >> (32 - p);
        let w = ((hash as u64) << p) | (1u64 << (p - 1));
        let r = (clz32(w as u32) + 1) as u8;
        self.reg.set_if_greater(i, r);
    }

    pub fn merge(&mut self, other: &Self) -> Result<(), HllError> {
        self.settings.check(&other.settings)?;
        for (a, &b) in self.reg.iter_mut().zip(other.reg.iter()) {
            if b > *a {
                *a = b;
            }
        }
        Ok(())
    }

    pub fn count(&self) -> u64 {
        plain_estimate(&self.reg, &self.settings)
    }

    pub fn clear(&mut self) {
        self.reg.iter_mut().for_each(|r| *r = 0);
    }

    pub fn marshal(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(5 + self.reg.len());
        buf.push(self.settings.p);
        buf.extend_from_slice(&self.settings.m.to_le_bytes());
        buf.extend_from_slice(&self.reg);
        buf
    }

    pub fn unmarshal(data: &[u8]) -> Result<Self, HllError> {
        if data.len() < 5 {
            return Err(HllError::Truncated(data.len()));
        }
        let p = data[0];
        let m = u32::from_le_bytes([data[1], data[2], data[3], data[4]]);
        let settings = Settings::new(p, MAX_LOG2M_PLAIN)?;
        if m != settings.m || data.len() != 5 + settings.m as usize {
            return Err(HllError::LengthMismatch {
                declared: m,
                actual: data.len(),
            });
        }
        Ok(Self {
            reg: data[5..].to_vec(),
            settings,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn add_matches_published_register_values() {
        let p = 16u8;
        let mut hll = Hll::new(p).unwrap();

        hll.add(0x00010fff);
        assert_eq!(hll.reg[1], 5);

        hll.add(0x00030000);
        assert_eq!(hll.reg[3], 17);

        hll.add(0xff030800);
        assert_eq!(hll.reg[0xff03], 5);
    }

    #[test]
    fn count_deduplicates_identical_hashes() {
        let mut hll = Hll::new(16).unwrap();
        for h in [
            0x00010fffu32,
            0x00020fff,
            0x00030fff,
            0x00040fff,
            0x00050fff,
            0x00050fff,
        ] {
            hll.add(h);
        }
        assert_eq!(hll.count(), 5);
    }

    #[test]
    fn empty_estimator_counts_zero() {
        let hll = Hll::new(10).unwrap();
        assert_eq!(hll.count(), 0);
    }

    #[test]
    fn merge_rejects_precision_mismatch() {
        let mut a = Hll::new(10).unwrap();
        let b = Hll::new(12).unwrap();
        assert!(a.merge(&b).is_err());
    }

    #[test]
    fn merge_takes_per_register_max() {
        let mut a = Hll::new(8).unwrap();
        let mut b = Hll::new(8).unwrap();
        a.add(0x1234_5678);
        b.add(0x8765_4321);
        let before = a.reg.clone();
        a.merge(&b).unwrap();
        for i in 0..a.reg.len() {
            assert!(a.reg[i] >= before[i]);
        }
    }

    #[test]
    fn marshal_round_trips() {
        let mut hll = Hll::new(10).unwrap();
        for h in 0u32..500 {
            hll.add(h.wrapping_mul(2654435761));
        }
        let bytes = hll.marshal();
        let back = Hll::unmarshal(&bytes).unwrap();
        assert_eq!(hll, back);
    }

    #[test]
    fn rejects_out_of_range_precision() {
        assert!(Hll::new(17).is_err());
        assert!(Hll::new(3).is_err());
    }
}
