//! Spaces of combinations: plain, with repetition, and of multisets.
use std::cmp::min;

use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::calculator::{sub_multiset_table, Calculator};
use crate::combinadic::{self, Combinadic};
use crate::error::{Error, Result};
use crate::freq_vector::FreqVector;
use crate::lex::{
    advance_frequencies, next_combination, next_multiset_combination, next_repetitive_combination,
    Step,
};
use crate::multiset::Multiset;
use crate::space::{check_len, Space};
use crate::El;

fn check_sorted(indices: &[El]) -> Result<()> {
    if indices.windows(2).any(|w| w[0] > w[1]) {
        return Err(Error::NotAStructure {
            reason: "combination items are out of order",
        });
    }
    Ok(())
}

/// The `r`-subsets of `n` items, as ascending index arrays.
pub struct Combinations<'a> {
    calc: &'a Calculator,
    n: usize,
    r: usize,
    count: BigUint,
}

impl<'a> Combinations<'a> {
    pub fn new(calc: &'a Calculator, n: usize, r: usize) -> Result<Combinations<'a>> {
        if r > n {
            return Err(Error::SizeExceedsItems { size: r, items: n });
        }
        Ok(Combinations {
            calc,
            n,
            r,
            count: calc.ncr(n, r),
        })
    }

    pub fn items(&self) -> usize {
        self.n
    }
}

impl<'a> Space for Combinations<'a> {
    type Scratch = ();

    fn size(&self) -> usize {
        self.r
    }

    fn count(&self) -> &BigUint {
        &self.count
    }

    fn first(&self) -> Option<Vec<El>> {
        Some((0..self.r).collect())
    }

    fn advance_with_scratch(&self, current: &mut [El], _: &mut ()) -> Step {
        next_combination(current, self.n)
    }

    fn rank(&self, indices: &[El]) -> Result<BigUint> {
        check_len(self.r, indices)?;
        combinadic::rank(self.calc, self.n, indices)
    }

    fn unrank_unchecked(&self, rank: &BigUint) -> Vec<El> {
        let value = &self.count - rank - 1u32;
        Combinadic::from_value(self.calc, &value, self.n, self.r).to_combination(self.n)
    }

    fn unrank(&self, rank: &BigUint) -> Result<Vec<El>> {
        combinadic::unrank(self.calc, rank, &self.count, self.n, self.r)
    }
}

/// The `r`-multisets over `n` item types, as non-decreasing index arrays.
///
/// Adding `i` to the item at position `i` maps these order-preservingly onto the ascending
/// `r`-combinations of `n + r - 1` items, which is how they are ranked.
pub struct RepetitiveCombinations<'a> {
    calc: &'a Calculator,
    n: usize,
    r: usize,
    count: BigUint,
}

impl<'a> RepetitiveCombinations<'a> {
    pub fn new(calc: &'a Calculator, n: usize, r: usize) -> RepetitiveCombinations<'a> {
        RepetitiveCombinations {
            calc,
            n,
            r,
            count: calc.ncr_repetitive(n, r),
        }
    }

    fn spread(&self) -> usize {
        (self.n + self.r).saturating_sub(1)
    }
}

impl<'a> Space for RepetitiveCombinations<'a> {
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
        next_repetitive_combination(current, self.n)
    }

    fn rank(&self, indices: &[El]) -> Result<BigUint> {
        check_len(self.r, indices)?;
        check_sorted(indices)?;
        if indices.last().map_or(false, |&last| last >= self.n) {
            return Err(Error::NotAStructure {
                reason: "combination item out of range",
            });
        }
        let spread: Vec<El> = indices.iter().enumerate().map(|(i, &x)| x + i).collect();
        combinadic::rank(self.calc, self.spread(), &spread)
    }

    fn unrank_unchecked(&self, rank: &BigUint) -> Vec<El> {
        let value = &self.count - rank - 1u32;
        let spread = Combinadic::from_value(self.calc, &value, self.spread(), self.r)
            .to_combination(self.spread());
        spread.into_iter().enumerate().map(|(i, x)| x - i).collect()
    }
}

/// How a [`MultisetCombinationIter`] steps from one sub-multiset to the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Rebuild the tail of an index array, see [`next_multiset_combination`].
    Array,
    /// Update a [`FreqVector`], see
    /// [`next_multiset_combination_freq`](crate::lex::next_multiset_combination_freq).
    Frequencies,
}

/// The `r`-sub-multisets of a multiset, as non-decreasing index arrays.
///
/// Ranking works on the type frequencies: a sub-multiset with more copies of a smaller type comes
/// first, so each type's frequency is a digit, tried from largest to smallest, whose place value is
/// the number of ways to fill the rest from the larger types.
pub struct MultisetCombinations<'a> {
    calc: &'a Calculator,
    multiset: Multiset,
    r: usize,
    // tails[t][j]: number of j-sub-multisets of the types t..
    tails: Vec<Vec<BigUint>>,
}

impl<'a> MultisetCombinations<'a> {
    pub fn new(
        calc: &'a Calculator,
        multiset: Multiset,
        r: usize,
    ) -> Result<MultisetCombinations<'a>> {
        if r > multiset.total() {
            return Err(Error::SizeExceedsItems {
                size: r,
                items: multiset.total(),
            });
        }
        let tails = sub_multiset_table(multiset.multiplicities(), r);
        Ok(MultisetCombinations {
            calc,
            multiset,
            r,
            tails,
        })
    }

    pub fn multiset(&self) -> &Multiset {
        &self.multiset
    }

    /// The strategy [`iter`](MultisetCombinations::iter) uses for this size.
    pub fn strategy(&self) -> Strategy {
        if self.r >= self.calc.config().multiset_crossover {
            Strategy::Frequencies
        } else {
            Strategy::Array
        }
    }

    /// Iterate over all sub-multisets in lexicographic order, using the configured crossover to
    /// pick a strategy.
    pub fn iter(&self) -> MultisetCombinationIter<'_> {
        self.iter_with(self.strategy())
    }

    /// Iterate over all sub-multisets in lexicographic order using a given strategy.
    pub fn iter_with(&self, strategy: Strategy) -> MultisetCombinationIter<'_> {
        debug!(
            "enumerating {}-sub-multisets of {} items over {} types using {:?}",
            self.r,
            self.multiset.total(),
            self.multiset.types(),
            strategy
        );
        let first = &self.multiset.flat()[..self.r];
        let state = match strategy {
            Strategy::Array => State::Array(first.to_vec()),
            Strategy::Frequencies => {
                let mut freq = FreqVector::new(self.r, self.multiset.types());
                freq.fill_from(0, self.multiset.multiplicities(), self.r);
                State::Frequencies(freq)
            }
        };
        MultisetCombinationIter {
            multiset: &self.multiset,
            state,
            started: false,
        }
    }
}

impl<'a> Space for MultisetCombinations<'a> {
    type Scratch = ();

    fn size(&self) -> usize {
        self.r
    }

    fn count(&self) -> &BigUint {
        &self.tails[0][self.r]
    }

    fn first(&self) -> Option<Vec<El>> {
        Some(self.multiset.flat()[..self.r].to_vec())
    }

    fn advance_with_scratch(&self, current: &mut [El], _: &mut ()) -> Step {
        next_multiset_combination(current, &self.multiset)
    }

    fn rank(&self, indices: &[El]) -> Result<BigUint> {
        check_len(self.r, indices)?;
        check_sorted(indices)?;
        let frequencies = self.multiset.frequencies_of(indices)?;

        let mut rank = BigUint::zero();
        let mut remaining = self.r;
        for (t, (&m, &f)) in self
            .multiset
            .multiplicities()
            .iter()
            .zip(frequencies.iter())
            .enumerate()
        {
            // Sub-multisets with more copies of t come first
            for more in f + 1..=min(m, remaining) {
                rank += &self.tails[t + 1][remaining - more];
            }
            remaining -= f;
        }
        Ok(rank)
    }

    fn unrank_unchecked(&self, rank: &BigUint) -> Vec<El> {
        let mut rank = rank.clone();
        let mut remaining = self.r;
        let mut items = Vec::with_capacity(self.r);
        for (t, &m) in self.multiset.multiplicities().iter().enumerate() {
            if remaining == 0 {
                break;
            }
            let mut copies = min(m, remaining);
            loop {
                let block = &self.tails[t + 1][remaining - copies];
                if rank < *block || copies == 0 {
                    break;
                }
                rank -= block;
                copies -= 1;
            }
            items.extend(std::iter::repeat(t).take(copies));
            remaining -= copies;
        }
        items
    }
}

enum State {
    Array(Vec<El>),
    Frequencies(FreqVector),
    Done,
}

/// Iterator over the sub-multisets of a [`MultisetCombinations`] space.
///
/// Both strategies produce identical sequences, they only differ in cost per step.
pub struct MultisetCombinationIter<'s> {
    multiset: &'s Multiset,
    state: State,
    started: bool,
}

impl<'s> MultisetCombinationIter<'s> {
    /// Frequencies of each item type in the most recently produced sub-multiset.
    pub fn frequencies(&self) -> Option<Vec<usize>> {
        match &self.state {
            State::Array(current) => self.multiset.frequencies_of(current).ok(),
            State::Frequencies(freq) => Some(freq.frequencies().to_vec()),
            State::Done => None,
        }
    }
}

impl<'s> Iterator for MultisetCombinationIter<'s> {
    type Item = Vec<El>;

    fn next(&mut self) -> Option<Vec<El>> {
        let step = if self.started {
            match &mut self.state {
                State::Array(current) => next_multiset_combination(current, self.multiset),
                State::Frequencies(freq) => {
                    advance_frequencies(freq, self.multiset.multiplicities())
                }
                State::Done => Step::Exhausted,
            }
        } else {
            self.started = true;
            Step::Advanced
        };
        if step == Step::Exhausted {
            self.state = State::Done;
            return None;
        }
        match &self.state {
            State::Array(current) => Some(current.clone()),
            State::Frequencies(freq) => Some(freq.as_list()),
            State::Done => None,
        }
    }
}
