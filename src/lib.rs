//! Lexicographic ranking and enumeration of combinatorial structures
//!
//! This crate enumerates, ranks and unranks permutations, combinations and their multiset variants
//! over the items {0, ..., n-1}. Given a lexicographic rank of arbitrary size it computes the
//! structure at that rank directly, without walking its predecessors.
//!
//! The building blocks are layered:
//!
//! * [`calculator::Calculator`], a memoized session context for counting,
//! * the numeral systems [`factoradic`], [`combinadic`] and [`permutadic`],
//! * the in-place successor functions in [`lex`] together with [`freq_vector::FreqVector`],
//! * the structure spaces in [`permutations`] and [`combinations`], which combine all of the
//!   above behind the [`space::Space`] trait.
//!
//! Mapping indices back to actual items is left to the caller.
pub mod calculator;
pub mod combinadic;
pub mod combinations;
pub mod config;
pub mod error;
pub mod factoradic;
pub mod freq_vector;
pub mod lex;
pub mod multiset;
pub mod permutadic;
pub mod permutations;
pub mod space;

pub use num_bigint::BigUint;

pub use crate::calculator::Calculator;
pub use crate::combinations::{
    Combinations, MultisetCombinations, RepetitiveCombinations, Strategy,
};
pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::freq_vector::FreqVector;
pub use crate::lex::Step;
pub use crate::multiset::Multiset;
pub use crate::permutations::{
    KPermutations, MultisetPermutations, Permutations, RepetitivePermutations,
};
pub use crate::space::Space;

/// Item index.
///
/// Items are represented by their position in the caller's input, a non-negative integer
/// (`usize`).
pub type El = usize;

/// Narrow a value known to be below a machine-sized radix.
///
/// Only the low 64 bits are read. Callers must only pass values bounded by an item count or a
/// digit radix, which always fit.
pub(crate) fn narrow(value: &BigUint) -> El {
    value.iter_u64_digits().next().unwrap_or(0) as El
}
