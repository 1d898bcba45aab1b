//! Multisets of item types with bounded multiplicities.
use crate::error::{Error, Result};
use crate::El;

/// A multiset over the item types `0..k`, given by the multiplicity of each type.
///
/// The order of the types is the order used for lexicographic comparison. Besides the
/// multiplicities this keeps the flattened, sorted multiset (each type repeated by its
/// multiplicity) and, for each type, the first flat position holding a larger type. Both are used
/// to step through sub-multisets without recounting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Multiset {
    multiplicities: Vec<usize>,
    flat: Vec<El>,
    after: Vec<usize>,
}

impl Multiset {
    /// Create a multiset. Every multiplicity must be positive.
    pub fn new(multiplicities: Vec<usize>) -> Result<Multiset> {
        if let Some(position) = multiplicities.iter().position(|&m| m == 0) {
            return Err(Error::ZeroMultiplicity { position });
        }
        let mut flat = Vec::with_capacity(multiplicities.iter().sum());
        let mut after = Vec::with_capacity(multiplicities.len());
        for (t, &m) in multiplicities.iter().enumerate() {
            flat.extend(std::iter::repeat(t).take(m));
            after.push(flat.len());
        }
        Ok(Multiset {
            multiplicities,
            flat,
            after,
        })
    }

    pub fn multiplicities(&self) -> &[usize] {
        &self.multiplicities
    }

    /// Number of distinct item types.
    pub fn types(&self) -> usize {
        self.multiplicities.len()
    }

    /// Number of items counted with multiplicity.
    pub fn total(&self) -> usize {
        self.flat.len()
    }

    /// All items in ascending order, each type repeated by its multiplicity.
    pub fn flat(&self) -> &[El] {
        &self.flat
    }

    /// First position in [`flat`](Multiset::flat) holding a type larger than `t`.
    pub fn after(&self, t: El) -> usize {
        self.after[t]
    }

    /// Count how often each type occurs in `items`, checking against the multiplicities.
    pub fn frequencies_of(&self, items: &[El]) -> Result<Vec<usize>> {
        let mut frequencies = vec![0; self.types()];
        for &item in items {
            if item >= self.types() {
                return Err(Error::NotAStructure {
                    reason: "item type out of range",
                });
            }
            frequencies[item] += 1;
            if frequencies[item] > self.multiplicities[item] {
                return Err(Error::NotAStructure {
                    reason: "item type used beyond its multiplicity",
                });
            }
        }
        Ok(frequencies)
    }
}
