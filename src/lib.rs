//! HyperLogLog and HyperLogLog++ cardinality estimators.
//!
//! [`Hll`] is the plain estimator over 32-bit hashes with a fixed dense
//! register array. [`HyperLogLogPlus`] is the HLL++ estimator over 64-bit
//! hashes, which stays in a compact sparse representation at low
//! cardinalities and promotes itself to a dense register array once that
//! stops being cheaper.

use thiserror::Error;

mod bits;
#[cfg(test)]
mod bits_test;
mod codec;
mod delta_list;
mod estimate;
mod hll;
mod hllpp;
mod marshal;
mod registers;
mod settings;
mod staging;
mod tables;

pub use hll::Hll;
pub use hllpp::HyperLogLogPlus;
pub use settings::SettingsError;

/// Errors raised by construction, mutation, and (de)serialization of either
/// estimator.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum HllError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("truncated input: {0} bytes")]
    Truncated(usize),
    #[error("unknown marshal version: {0}")]
    UnknownVersion(u16),
    #[error("unexpected sparse precision: {0}")]
    UnexpectedSparsePrecision(u8),
    #[error("length mismatch: header declared {declared}, got {actual} bytes")]
    LengthMismatch { declared: u32, actual: usize },
}
