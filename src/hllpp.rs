//! HyperLogLog++: the sparse/dense state machine over 64-bit hashes.

use crate::bits::clz64;
use crate::codec::{decode_hash, encode_hash};
use crate::delta_list::{self, DeltaList};
use crate::estimate::{dense_estimate, sparse_estimate};
use crate::marshal;
use crate::registers::RegisterArray;
use crate::settings::{Settings, MAX_LOG2M_PLUS};
use crate::staging::StagingSet;
use crate::HllError;

/// `m' = 2^(p' - 1)`, the register space the sparse-path linear-counting
/// estimate is taken over. Deliberately not `2^p'`; see the bias-table
/// calibration note carried from the reference implementation.
const SPARSE_M_PRIME: u32 = 1 << 24;

/// A HyperLogLog++ estimator over 64-bit hashes, `p` in `4..=18`.
///
/// Starts `Sparse` and promotes itself to `Dense` once the compact
/// representation stops being cheaper than a full register array.
#[derive(Clone, Debug, PartialEq)]
pub enum HyperLogLogPlus {
    Sparse {
        settings: Settings,
        staging: StagingSet,
        delta_list: DeltaList,
    },
    Dense {
        settings: Settings,
        reg: Vec<u8>,
    },
}

impl HyperLogLogPlus {
    pub fn new(p: u8) -> Result<Self, HllError> {
        let settings = Settings::new(p, MAX_LOG2M_PLUS)?;
        Ok(Self::Sparse {
            settings,
            staging: StagingSet::default(),
            delta_list: DeltaList::default(),
        })
    }

    pub(crate) fn from_sparse_parts(settings: Settings, delta_list: DeltaList) -> Self {
        Self::Sparse {
            settings,
            staging: StagingSet::default(),
            delta_list,
        }
    }

    pub(crate) fn from_dense_parts(settings: Settings, reg: Vec<u8>) -> Self {
        Self::Dense { settings, reg }
    }

    fn settings(&self) -> &Settings {
        match self {
            Self::Sparse { settings, .. } => settings,
            Self::Dense { settings, .. } => settings,
        }
    }

    pub fn add(&mut self, hash: u64) {
        let should_promote = match self {
            Self::Sparse {
                settings,
                staging,
                delta_list,
            } => {
                let code = encode_hash(hash, settings.p);
                staging.insert(code);
                maybe_flush_and_promote(*settings, staging, delta_list);
                delta_list.byte_len() > settings.m as usize
            }
            Self::Dense { settings, reg } => {
                dense_add(settings.p, reg, hash);
                false
            }
        };

        if should_promote {
            self.to_normal();
        }
    }

    /// Explicit promotion from sparse to dense.
    pub fn to_normal(&mut self) {
        let promoted = if let Self::Sparse {
            settings,
            staging,
            delta_list,
        } = self
        {
            flush(staging, delta_list);
            let reg = decode_to_registers(delta_list, *settings);
            Some((*settings, reg))
        } else {
            None
        };

        if let Some((settings, reg)) = promoted {
            *self = Self::Dense { settings, reg };
        }
    }

    pub fn merge(&mut self, other: &Self) -> Result<(), HllError> {
        self.settings().check(other.settings())?;

        match other {
            Self::Sparse {
                staging: other_staging,
                delta_list: other_delta,
                ..
            } => {
                let should_promote = match self {
                    Self::Sparse {
                        settings,
                        staging,
                        delta_list,
                    } => {
                        staging.extend(other_staging);
                        for code in other_delta.codes() {
                            staging.insert(code);
                        }
                        let settings = *settings;
                        maybe_flush_and_promote(settings, staging, delta_list);
                        delta_list.byte_len() > settings.m as usize
                    }
                    Self::Dense { settings, reg } => {
                        let p = settings.p;
                        for &code in other_staging.iter() {
                            let (i, r) = decode_hash(code, p);
                            reg.set_if_greater(i, r);
                        }
                        for code in other_delta.codes() {
                            let (i, r) = decode_hash(code, p);
                            reg.set_if_greater(i, r);
                        }
                        false
                    }
                };
                if should_promote {
                    self.to_normal();
                }
            }
            Self::Dense { reg: other_reg, .. } => {
                if matches!(self, Self::Sparse { .. }) {
                    self.to_normal();
                }
                if let Self::Dense { reg, .. } = self {
                    for (a, &b) in reg.iter_mut().zip(other_reg.iter()) {
                        if b > *a {
                            *a = b;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    pub fn count(&mut self) -> u64 {
        match self {
            Self::Sparse {
                settings: _,
                staging,
                delta_list,
            } => {
                flush(staging, delta_list);
                sparse_estimate(SPARSE_M_PRIME, delta_list.count())
            }
            Self::Dense { settings, reg } => dense_estimate(reg, settings),
        }
    }

    pub fn estimate(&mut self) -> u64 {
        self.count()
    }

    pub fn clear(&mut self) {
        let settings = *self.settings();
        *self = Self::Sparse {
            settings,
            staging: StagingSet::default(),
            delta_list: DeltaList::default(),
        };
    }

    pub fn marshal(&mut self) -> Vec<u8> {
        match self {
            Self::Sparse {
                settings,
                staging,
                delta_list,
            } => {
                flush(staging, delta_list);
                marshal::marshal_sparse(settings.p, delta_list)
            }
            Self::Dense { settings, reg } => marshal::marshal_dense(settings.p, reg),
        }
    }

    pub fn unmarshal(data: &[u8]) -> Result<Self, HllError> {
        marshal::unmarshal(data)
    }
}

fn dense_add(p: u8, reg: &mut Vec<u8>, hash: u64) {
    let pu = p as u32;
    let i = (hash >> (64 - pu)) as u32;
    let w = (hash << pu) | (1u64 << (pu - 1));
    let r = (clz64(w) + 1) as u8;
    reg.set_if_greater(i, r);
}

fn flush(staging: &mut StagingSet, delta_list: &mut DeltaList) {
    if staging.is_empty() {
        return;
    }
    let sorted = staging.sorted();
    *delta_list = delta_list::merge(delta_list, &sorted);
    staging.clear();
}

fn maybe_flush_and_promote(settings: Settings, staging: &mut StagingSet, delta_list: &mut DeltaList) {
    if (staging.len() as u32) * 100 > settings.m {
        flush(staging, delta_list);
    }
}

fn decode_to_registers(delta_list: &DeltaList, settings: Settings) -> Vec<u8> {
    let mut reg = vec![0u8; settings.m as usize];
    let mut iter = delta_list.iter();
    while iter.has_next() {
        let code = iter.next();
        let (i, r) = decode_hash(code, settings.p);
        reg.set_if_greater(i, r);
    }
    reg
}
