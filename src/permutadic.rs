//! A mixed radix number system for k-permutations.
//!
//! A `k`-permutation of `n` items is written with `k` digits of degree `n - k`. The least
//! significant digit has radix `degree + 1`, each further digit's radix is one larger, so the most
//! significant digit has radix `n`. Reading from the most significant end, each digit selects one
//! of the items that are still unused, which makes the value of a k-permutation its lexicographic
//! rank. Degree zero is the factorial number system.
use std::fmt;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;

use crate::calculator::Calculator;
use crate::error::{Error, Result};
use crate::{narrow, El};

/// A number in the permutadic system of some degree, stored least significant digit first.
///
/// Leading zero digits are not stored, so there may be fewer digits than the permutation size.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Permutadic {
    degree: usize,
    digits: Vec<usize>,
}

impl Permutadic {
    /// Decompose `rank` by successive division through `degree + 1, degree + 2, ...`.
    pub fn from_rank(rank: &BigUint, degree: usize) -> Permutadic {
        let mut digits = vec![];
        let mut value = rank.clone();
        let mut radix = degree + 1;
        while !value.is_zero() {
            let (quotient, digit) = value.div_rem(&BigUint::from(radix));
            digits.push(narrow(&digit));
            value = quotient;
            radix += 1;
        }
        Permutadic { degree, digits }
    }

    /// Encode a k-permutation of items `0..n`.
    pub fn from_permutation(n: usize, perm: &[El]) -> Result<Permutadic> {
        let k = perm.len();
        if k > n {
            return Err(Error::SizeExceedsItems { size: k, items: n });
        }
        let mut used = vec![false; n];
        let mut digits = vec![0; k];
        for (j, &p) in perm.iter().enumerate() {
            if p >= n || used[p] {
                return Err(Error::NotAStructure {
                    reason: "k-permutation repeats an item or is out of range",
                });
            }
            digits[k - 1 - j] = used[..p].iter().filter(|&&u| !u).count();
            used[p] = true;
        }
        while digits.last() == Some(&0) {
            digits.pop();
        }
        Ok(Permutadic {
            degree: n - k,
            digits,
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn digits(&self) -> &[usize] {
        &self.digits
    }

    /// The integer this number represents.
    pub fn value(&self) -> BigUint {
        let mut value = BigUint::zero();
        for (i, &digit) in self.digits.iter().enumerate().rev() {
            value = value * BigUint::from(self.degree + 1 + i) + BigUint::from(digit);
        }
        value
    }

    /// Decode into a `k`-permutation of items `0..n`, where `n - k` must be the degree.
    ///
    /// Digits beyond the stored ones are taken as zero. The number must be below `nPr(n, k)`.
    pub fn to_nth_permutation(&self, n: usize, k: usize) -> Vec<El> {
        let mut perm = vec![];
        self.to_nth_permutation_with_scratch(n, k, &mut perm, &mut vec![]);
        perm
    }

    /// Decode into a `k`-permutation of items `0..n`. Use existing buffers.
    ///
    /// The result is written to `target`, the last parameter is used as scratch space and will be
    /// overwritten.
    pub fn to_nth_permutation_with_scratch(
        &self,
        n: usize,
        k: usize,
        target: &mut Vec<El>,
        pool: &mut Vec<El>,
    ) {
        debug_assert_eq!(n - k, self.degree);
        pool.clear();
        pool.extend(0..n);
        target.clear();
        for i in (0..k).rev() {
            let digit = self.digits.get(i).cloned().unwrap_or(0);
            target.push(pool.remove(digit));
        }
    }
}

impl fmt::Display for Permutadic {
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
        write!(f, " (degree {})", self.degree)
    }
}

/// The lexicographic position of a k-permutation of items `0..n`.
///
/// Each position's digit is weighted by the number of ways to complete the permutation after it.
pub fn rank(calc: &Calculator, n: usize, perm: &[El]) -> Result<BigUint> {
    let k = perm.len();
    let code = Permutadic::from_permutation(n, perm)?;
    let mut rank = BigUint::zero();
    for (i, &digit) in code.digits.iter().enumerate() {
        if digit != 0 {
            rank += calc.npr(n - k + i, i) * BigUint::from(digit);
        }
    }
    Ok(rank)
}

/// The `k`-permutation of items `0..n` at lexicographic position `rank`.
///
/// Fails with [`Error::RankOutOfRange`] unless `rank < nPr(n, k)`.
pub fn unrank_with_bound_check(
    calc: &Calculator,
    rank: &BigUint,
    n: usize,
    k: usize,
) -> Result<Vec<El>> {
    if k > n {
        return Err(Error::SizeExceedsItems { size: k, items: n });
    }
    let count = calc.npr(n, k);
    if *rank >= count {
        return Err(Error::RankOutOfRange {
            rank: rank.clone(),
            count,
        });
    }
    Ok(unrank_without_bound_check(rank, n, k))
}

/// The `k`-permutation of items `0..n` at lexicographic position `rank`.
///
/// The caller guarantees `k <= n` and `rank < nPr(n, k)`.
pub fn unrank_without_bound_check(rank: &BigUint, n: usize, k: usize) -> Vec<El> {
    Permutadic::from_rank(rank, n - k).to_nth_permutation(n, k)
}
