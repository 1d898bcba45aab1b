//! Lexicographically ordered spaces of structures.
use log::trace;
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::error::{Error, Result};
use crate::lex::Step;
use crate::El;

/// A finite, lexicographically ordered set of index arrays of equal length.
///
/// Implementors supply counting, ranking, unranking and an in-place successor function. For every
/// rank `m`, [`unrank`](Space::unrank) returns exactly the structure that full enumeration by
/// [`lex`](Space::lex) produces at position `m`.
pub trait Space {
    /// Type of scratch space needed to step to a successor.
    type Scratch: Default;

    /// Length of every structure in this space.
    fn size(&self) -> usize;

    /// Number of structures in this space.
    fn count(&self) -> &BigUint;

    /// The lexicographically smallest structure, `None` for an empty space.
    fn first(&self) -> Option<Vec<El>>;

    /// Advance a structure of this space to its lexicographic successor.
    fn advance(&self, current: &mut [El]) -> Step {
        self.advance_with_scratch(current, &mut Self::Scratch::default())
    }

    /// Advance a structure of this space to its lexicographic successor. Use existing scratch
    /// space.
    fn advance_with_scratch(&self, current: &mut [El], scratch: &mut Self::Scratch) -> Step;

    /// The position of a structure in lexicographic order.
    ///
    /// Fails with an invalid argument error if `indices` is not a member of this space.
    fn rank(&self, indices: &[El]) -> Result<BigUint>;

    /// The structure at lexicographic position `rank`, which must be below [`count`](Space::count).
    ///
    /// No bound check is performed, the result for larger ranks is unspecified.
    fn unrank_unchecked(&self, rank: &BigUint) -> Vec<El>;

    /// The structure at lexicographic position `rank`.
    fn unrank(&self, rank: &BigUint) -> Result<Vec<El>> {
        check_rank(rank, self.count())?;
        Ok(self.unrank_unchecked(rank))
    }

    /// Iterate over all structures in lexicographic order.
    fn lex(&self) -> Lex<'_, Self>
    where
        Self: Sized,
    {
        Lex {
            space: self,
            current: None,
            started: false,
            scratch: Default::default(),
        }
    }

    /// Iterate over the structures at ranks `start, start + increment, ...`.
    fn mth(&self, start: BigUint, increment: BigUint) -> Result<Mth<'_, Self>>
    where
        Self: Sized,
    {
        Mth::new(self, start, increment)
    }
}

pub(crate) fn check_rank(rank: &BigUint, count: &BigUint) -> Result<()> {
    if rank >= count {
        return Err(Error::RankOutOfRange {
            rank: rank.clone(),
            count: count.clone(),
        });
    }
    Ok(())
}

pub(crate) fn check_len(expected: usize, indices: &[El]) -> Result<()> {
    if indices.len() != expected {
        return Err(Error::LengthMismatch {
            expected,
            actual: indices.len(),
        });
    }
    Ok(())
}

/// Iterator over all structures of a space in lexicographic order.
///
/// Created by [`Space::lex`].
pub struct Lex<'s, S>
where
    S: Space,
{
    space: &'s S,
    current: Option<Vec<El>>,
    started: bool,
    scratch: S::Scratch,
}

impl<'s, S> Iterator for Lex<'s, S>
where
    S: Space,
{
    type Item = Vec<El>;

    fn next(&mut self) -> Option<Vec<El>> {
        if !self.started {
            self.started = true;
            self.current = self.space.first();
            return self.current.clone();
        }
        let current = self.current.as_mut()?;
        match self.space.advance_with_scratch(current, &mut self.scratch) {
            Step::Advanced => Some(current.clone()),
            Step::Exhausted => {
                self.current = None;
                None
            }
        }
    }
}

/// Iterator over the structures at an arithmetic progression of ranks.
///
/// Each structure is computed by unranking, so arbitrarily large steps cost the same as small
/// ones. With an increment of one, the successor function is used instead.
///
/// Created by [`Space::mth`].
pub struct Mth<'s, S>
where
    S: Space,
{
    space: &'s S,
    rank: BigUint,
    increment: BigUint,
    current: Option<Vec<El>>,
    scratch: S::Scratch,
}

impl<'s, S> Mth<'s, S>
where
    S: Space,
{
    /// Fails if `increment` is zero or `start` is not a rank of the space.
    pub fn new(space: &'s S, start: BigUint, increment: BigUint) -> Result<Mth<'s, S>> {
        if increment.is_zero() {
            return Err(Error::ZeroIncrement);
        }
        check_rank(&start, space.count())?;
        trace!(
            "rank sequence from {} by {} over {} structures",
            start,
            increment,
            space.count()
        );
        Ok(Mth {
            space,
            rank: start,
            increment,
            current: None,
            scratch: Default::default(),
        })
    }

    /// Rank of the next structure to be produced.
    pub fn rank(&self) -> &BigUint {
        &self.rank
    }

    /// Number of structures still to be produced.
    pub fn remaining(&self) -> BigUint {
        let count = self.space.count();
        if self.rank >= *count {
            return BigUint::zero();
        }
        (count - &self.rank + &self.increment - 1u32) / &self.increment
    }
}

impl<'s, S> Iterator for Mth<'s, S>
where
    S: Space,
{
    type Item = Vec<El>;

    fn next(&mut self) -> Option<Vec<El>> {
        if self.rank >= *self.space.count() {
            return None;
        }
        let unit = self.increment.is_one();

        let stepped = match self.current.as_mut() {
            Some(current) if unit => {
                match self.space.advance_with_scratch(current, &mut self.scratch) {
                    Step::Advanced => Some(current.clone()),
                    Step::Exhausted => None,
                }
            }
            _ => None,
        };
        let item = match stepped {
            Some(item) => item,
            None => {
                let item = self.space.unrank_unchecked(&self.rank);
                if unit {
                    self.current = Some(item.clone());
                }
                item
            }
        };

        self.rank += &self.increment;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining().to_usize() {
            Some(remaining) => (remaining, Some(remaining)),
            None => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    use crate::{Calculator, Combinations, KPermutations};

    fn big(value: u64) -> BigUint {
        BigUint::from(value)
    }

    #[test]
    fn lex_matches_unrank() {
        let calc = Calculator::new();
        let space = Combinations::new(&calc, 6, 3).unwrap();
        let all: Vec<_> = space.lex().collect();
        assert_eq!(all.len(), 20);
        for (i, comb) in all.iter().enumerate() {
            assert_eq!(&space.unrank(&big(i as u64)).unwrap(), comb);
            assert_eq!(space.rank(comb).unwrap(), big(i as u64));
        }
        // Traversals are repeatable
        assert_eq!(space.lex().collect::<Vec<_>>(), all);
    }

    #[test]
    fn mth_steps() {
        let calc = Calculator::new();
        let space = KPermutations::new(&calc, 4, 2).unwrap();
        let all: Vec<_> = space.lex().collect();

        let stepped: Vec<_> = space.mth(big(1), big(5)).unwrap().collect();
        assert_eq!(stepped, vec![all[1].clone(), all[6].clone(), all[11].clone()]);

        let iter = space.mth(big(3), big(1)).unwrap();
        assert_eq!(iter.remaining(), big(9));
        assert_eq!(iter.size_hint(), (9, Some(9)));
        assert_eq!(iter.collect::<Vec<_>>(), all[3..].to_vec());
    }

    #[test]
    fn mth_rejects_bad_arguments() {
        let calc = Calculator::new();
        let space = Combinations::new(&calc, 5, 2).unwrap();
        assert_eq!(space.mth(big(0), big(0)).err(), Some(Error::ZeroIncrement));
        assert!(space.mth(big(10), big(1)).err().unwrap().is_out_of_range());
        assert!(space.unrank(&big(10)).unwrap_err().is_out_of_range());
    }

    #[test]
    fn mth_over_huge_space() {
        let calc = Calculator::new();
        let space = Combinations::new(&calc, 100, 50).unwrap();
        let increment = space.count() / 7u32;
        let items: Vec<_> = space.mth(big(0), increment.clone()).unwrap().collect();
        assert_eq!(items.len(), 8);
        for (i, item) in items.iter().enumerate() {
            assert_eq!(space.rank(item).unwrap(), &increment * BigUint::from(i));
        }
    }

    proptest! {
        #[test]
        fn mth_is_stepped_lex(
            n in 1..8usize,
            r in any::<prop::sample::Index>(),
            start in any::<prop::sample::Index>(),
            increment in 1..5usize,
        ) {
            let r = r.index(n + 1);
            let calc = Calculator::new();
            let space = Combinations::new(&calc, n, r).unwrap();
            let all: Vec<_> = space.lex().collect();
            let start = start.index(all.len());

            let expected: Vec<_> = all
                .iter()
                .skip(start)
                .step_by(increment)
                .cloned()
                .collect();
            let mth = space
                .mth(BigUint::from(start), BigUint::from(increment))
                .unwrap();
            prop_assert_eq!(mth.remaining(), BigUint::from(expected.len()));
            prop_assert_eq!(mth.collect::<Vec<_>>(), expected);
        }
    }
}
