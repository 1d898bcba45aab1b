//! Error type shared by all structure spaces.
use num_bigint::BigUint;
use thiserror::Error;

use crate::El;

/// Errors reported by ranking, unranking and frequency vector mutation.
///
/// Running out of structures is not an error. Successor functions report it through
/// [`Step::Exhausted`](crate::Step::Exhausted) and iterators by returning `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("cannot select {size} distinct items out of {items}")]
    SizeExceedsItems { size: usize, items: usize },

    #[error("multiplicity of item type {position} is zero")]
    ZeroMultiplicity { position: usize },

    #[error("expected {expected} indices, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("indices do not form a member of this space: {reason}")]
    NotAStructure { reason: &'static str },

    #[error("rank sequence increment must be positive")]
    ZeroIncrement,

    #[error("rank {rank} is out of range for {count} structures")]
    RankOutOfRange { rank: BigUint, count: BigUint },

    #[error("frequency vector is full at {size} items")]
    CapacityExceeded { size: usize },

    #[error("key {key} is out of range for {key_count} keys")]
    KeyOutOfRange { key: El, key_count: usize },

    #[error("slot {index} is out of range for {len} filled slots")]
    SlotOutOfRange { index: usize, len: usize },
}

impl Error {
    /// Whether the arguments were invalid on their own.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::SizeExceedsItems { .. }
                | Error::ZeroMultiplicity { .. }
                | Error::LengthMismatch { .. }
                | Error::NotAStructure { .. }
                | Error::ZeroIncrement
        )
    }

    /// Whether a rank was valid on its own but too large for the space it was used with.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Error::RankOutOfRange { .. })
    }

    /// Whether a frequency vector was asked to exceed its bounds.
    pub fn is_bounds(&self) -> bool {
        matches!(
            self,
            Error::CapacityExceeded { .. } | Error::KeyOutOfRange { .. } | Error::SlotOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
