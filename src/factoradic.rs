//! The factorial number system and full permutations.
//!
//! A factoradic number of size `n` has digits `d_0, ..., d_{n-1}` (least significant first) with
//! `d_i <= i`, and the value `Σ d_i * i!`. Read from the most significant end, the digits are the
//! Lehmer code of a permutation: `d_{n-1-j}` says which of the items not yet used goes to position
//! `j`. This makes the value of a permutation's code its lexicographic rank.
use std::fmt;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;

use crate::error::{Error, Result};
use crate::{narrow, El};

/// A number in the factorial number system, stored least significant digit first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Factoradic {
    digits: Vec<usize>,
}

impl Factoradic {
    /// Decompose `rank` into exactly `size` digits, padding with leading zeros.
    ///
    /// Fails when `rank` does not fit, i.e. when `rank >= size!`.
    pub fn from_rank(rank: &BigUint, size: usize) -> Result<Factoradic> {
        let mut digits = Vec::with_capacity(size);
        let mut value = rank.clone();
        for radix in 1..=size {
            let (quotient, digit) = value.div_rem(&BigUint::from(radix));
            digits.push(narrow(&digit));
            value = quotient;
        }
        if !value.is_zero() {
            return Err(Error::RankOutOfRange {
                rank: rank.clone(),
                count: (1..=size).map(BigUint::from).product(),
            });
        }
        Ok(Factoradic { digits })
    }

    /// Create a factoradic number from digits, least significant first.
    ///
    /// Fails if any digit `d_i` exceeds `i`.
    pub fn from_digits(digits: Vec<usize>) -> Result<Factoradic> {
        if digits.iter().enumerate().any(|(i, &d)| d > i) {
            return Err(Error::NotAStructure {
                reason: "factoradic digit exceeds its position",
            });
        }
        Ok(Factoradic { digits })
    }

    /// The Lehmer code of a permutation of `0..perm.len()`.
    pub fn from_permutation(perm: &[El]) -> Result<Factoradic> {
        let n = perm.len();
        let mut seen = vec![false; n];
        let mut digits = vec![0; n];
        for (j, &p) in perm.iter().enumerate() {
            if p >= n || seen[p] {
                return Err(Error::NotAStructure {
                    reason: "not a permutation of all items",
                });
            }
            seen[p] = true;
            // Number of items smaller than p that are still unused
            digits[n - 1 - j] = seen[..p].iter().filter(|&&s| !s).count();
        }
        Ok(Factoradic { digits })
    }

    pub fn digits(&self) -> &[usize] {
        &self.digits
    }

    pub fn size(&self) -> usize {
        self.digits.len()
    }

    /// The integer this number represents.
    pub fn value(&self) -> BigUint {
        let mut value = BigUint::zero();
        for (i, &digit) in self.digits.iter().enumerate().rev() {
            value = value * BigUint::from(i + 1) + BigUint::from(digit);
        }
        value
    }

    /// The permutation this number is the Lehmer code of.
    pub fn to_permutation(&self) -> Vec<El> {
        let mut perm = vec![];
        self.to_permutation_with_scratch(&mut perm, &mut vec![]);
        perm
    }

    /// The permutation this number is the Lehmer code of. Use existing buffers.
    ///
    /// The result is written to `target`, the last parameter is used as scratch space and will be
    /// overwritten.
    pub fn to_permutation_with_scratch(&self, target: &mut Vec<El>, pool: &mut Vec<El>) {
        let n = self.digits.len();
        pool.clear();
        pool.extend(0..n);
        target.clear();
        for &digit in self.digits.iter().rev() {
            target.push(pool.remove(digit));
        }
    }
}

impl fmt::Display for Factoradic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.digits.is_empty() {
            return f.write_str("0");
        }
        for (pos, digit) in self.digits.iter().rev().enumerate() {
            if pos > 0 {
                f.write_str(":")?;
            }
            fmt::Display::fmt(digit, f)?;
        }
        Ok(())
    }
}

/// The permutation of `0..n` at lexicographic position `rank`.
pub fn unrank(rank: &BigUint, n: usize) -> Result<Vec<El>> {
    Ok(Factoradic::from_rank(rank, n)?.to_permutation())
}

/// The lexicographic position of a permutation of `0..perm.len()`.
pub fn rank(perm: &[El]) -> Result<BigUint> {
    Ok(Factoradic::from_permutation(perm)?.value())
}
