//! Spaces of permutations: full, k-, with repetition, and of multisets.
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;

use crate::calculator::Calculator;
use crate::error::{Error, Result};
use crate::lex::{
    next_k_permutation_with_scratch, next_multiset_permutation_with_scratch, next_permutation,
    next_repetitive_permutation, Step,
};
use crate::multiset::Multiset;
use crate::space::{check_len, Space};
use crate::{factoradic, narrow, permutadic, El};

/// The permutations of `n` items.
pub struct Permutations {
    n: usize,
    count: BigUint,
}

impl Permutations {
    pub fn new(calc: &Calculator, n: usize) -> Permutations {
        Permutations {
            n,
            count: calc.factorial(n),
        }
    }
}

impl Space for Permutations {
    type Scratch = ();

    fn size(&self) -> usize {
        self.n
    }

    fn count(&self) -> &BigUint {
        &self.count
    }

    fn first(&self) -> Option<Vec<El>> {
        Some((0..self.n).collect())
    }

    fn advance_with_scratch(&self, current: &mut [El], _: &mut ()) -> Step {
        next_permutation(current)
    }

    fn rank(&self, indices: &[El]) -> Result<BigUint> {
        check_len(self.n, indices)?;
        factoradic::rank(indices)
    }

    fn unrank_unchecked(&self, rank: &BigUint) -> Vec<El> {
        // Full permutations are k-permutations with k = n
        permutadic::unrank_without_bound_check(rank, self.n, self.n)
    }

    fn unrank(&self, rank: &BigUint) -> Result<Vec<El>> {
        factoradic::unrank(rank, self.n)
    }
}

/// The `k`-permutations of `n` items, i.e. ordered selections of `k` distinct items.
pub struct KPermutations<'a> {
    calc: &'a Calculator,
    n: usize,
    k: usize,
    count: BigUint,
}

impl<'a> KPermutations<'a> {
    pub fn new(calc: &'a Calculator, n: usize, k: usize) -> Result<KPermutations<'a>> {
        if k > n {
            return Err(Error::SizeExceedsItems { size: k, items: n });
        }
        Ok(KPermutations {
            calc,
            n,
            k,
            count: calc.npr(n, k),
        })
    }

    /// Degree of the permutadic numbers ranking this space.
    pub fn degree(&self) -> usize {
        self.n - self.k
    }
}

impl<'a> Space for KPermutations<'a> {
    type Scratch = Vec<bool>;

    fn size(&self) -> usize {
        self.k
    }

    fn count(&self) -> &BigUint {
        &self.count
    }

    fn first(&self) -> Option<Vec<El>> {
        Some((0..self.k).collect())
    }

    fn advance_with_scratch(&self, current: &mut [El], used: &mut Vec<bool>) -> Step {
        next_k_permutation_with_scratch(current, self.n, used)
    }

    fn rank(&self, indices: &[El]) -> Result<BigUint> {
        check_len(self.k, indices)?;
        permutadic::rank(self.calc, self.n, indices)
    }

    fn unrank_unchecked(&self, rank: &BigUint) -> Vec<El> {
        permutadic::unrank_without_bound_check(rank, self.n, self.k)
    }

    fn unrank(&self, rank: &BigUint) -> Result<Vec<El>> {
        permutadic::unrank_with_bound_check(self.calc, rank, self.n, self.k)
    }
}

/// The length `r` sequences over `n` items, i.e. base-`n` numbers with `r` digits.
pub struct RepetitivePermutations {
    n: usize,
    r: usize,
    count: BigUint,
}

impl RepetitivePermutations {
    pub fn new(calc: &Calculator, n: usize, r: usize) -> RepetitivePermutations {
        RepetitivePermutations {
            n,
            r,
            count: calc.power(n, r),
        }
    }
}

impl Space for RepetitivePermutations {
    type Scratch = ();

    fn size(&self) -> usize {
        self.r
    }

    fn count(&self) -> &BigUint {
        &self.count
    }

    fn first(&self) -> Option<Vec<El>> {
        if self.count.is_zero() {
            return None;
        }
        Some(vec![0; self.r])
    }

    fn advance_with_scratch(&self, current: &mut [El], _: &mut ()) -> Step {
        next_repetitive_permutation(current, self.n)
    }

    fn rank(&self, indices: &[El]) -> Result<BigUint> {
        check_len(self.r, indices)?;
        let radix = BigUint::from(self.n);
        let mut rank = BigUint::zero();
        for &digit in indices {
            if digit >= self.n {
                return Err(Error::NotAStructure {
                    reason: "item out of range",
                });
            }
            rank = rank * &radix + BigUint::from(digit);
        }
        Ok(rank)
    }

    fn unrank_unchecked(&self, rank: &BigUint) -> Vec<El> {
        let radix = BigUint::from(self.n);
        let mut value = rank.clone();
        let mut digits = vec![0; self.r];
        for digit in digits.iter_mut().rev() {
            if value.is_zero() {
                break;
            }
            let (quotient, remainder) = value.div_rem(&radix);
            *digit = narrow(&remainder);
            value = quotient;
        }
        digits
    }
}

/// The length `r` arrangements of items drawn from a multiset.
///
/// Unranking picks one position at a time, skipping over the item types whose blocks of
/// arrangements lie entirely below the remaining rank. The size of a block is the number of
/// arrangements of what is left of the multiset once that item is used.
pub struct MultisetPermutations<'a> {
    calc: &'a Calculator,
    multiset: Multiset,
    r: usize,
    count: BigUint,
}

impl<'a> MultisetPermutations<'a> {
    pub fn new(
        calc: &'a Calculator,
        multiset: Multiset,
        r: usize,
    ) -> Result<MultisetPermutations<'a>> {
        if r > multiset.total() {
            return Err(Error::SizeExceedsItems {
                size: r,
                items: multiset.total(),
            });
        }
        let count = calc.multiset_permutations(multiset.multiplicities(), r);
        Ok(MultisetPermutations {
            calc,
            multiset,
            r,
            count,
        })
    }

    pub fn multiset(&self) -> &Multiset {
        &self.multiset
    }

    /// Number of arrangements completing a prefix of length `pos` that left `supply` unused.
    fn completions(&self, supply: &[usize], pos: usize) -> BigUint {
        self.calc.multiset_permutations(supply, self.r - pos - 1)
    }
}

impl<'a> Space for MultisetPermutations<'a> {
    type Scratch = Vec<usize>;

    fn size(&self) -> usize {
        self.r
    }

    fn count(&self) -> &BigUint {
        &self.count
    }

    fn first(&self) -> Option<Vec<El>> {
        Some(self.multiset.flat()[..self.r].to_vec())
    }

    fn advance_with_scratch(&self, current: &mut [El], supply: &mut Vec<usize>) -> Step {
        next_multiset_permutation_with_scratch(current, &self.multiset, supply)
    }

    fn rank(&self, indices: &[El]) -> Result<BigUint> {
        check_len(self.r, indices)?;
        self.multiset.frequencies_of(indices)?;

        let mut supply = self.multiset.multiplicities().to_vec();
        let mut rank = BigUint::zero();
        for (pos, &item) in indices.iter().enumerate() {
            for smaller in 0..item {
                if supply[smaller] > 0 {
                    supply[smaller] -= 1;
                    rank += self.completions(&supply, pos);
                    supply[smaller] += 1;
                }
            }
            supply[item] -= 1;
        }
        Ok(rank)
    }

    fn unrank_unchecked(&self, rank: &BigUint) -> Vec<El> {
        let mut supply = self.multiset.multiplicities().to_vec();
        let mut rank = rank.clone();
        let mut items = Vec::with_capacity(self.r);
        for pos in 0..self.r {
            for t in 0..supply.len() {
                if supply[t] == 0 {
                    continue;
                }
                supply[t] -= 1;
                let block = self.completions(&supply, pos);
                if rank < block {
                    items.push(t);
                    break;
                }
                rank -= block;
                supply[t] += 1;
            }
        }
        items
    }
}
