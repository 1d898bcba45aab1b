//! The combinatorial number system and combinations.
//!
//! A combinadic number of degree `r` is a strictly decreasing digit sequence
//! `c_0 > c_1 > ... > c_{r-1} >= 0` with the value `Σ C(c_i, r - i)`. Every integer below
//! `C(n, r)` has exactly one such representation with `c_0 < n`.
//!
//! Ordering digit sequences by value orders the complemented combinations `n - 1 - c_i` in
//! descending lexicographic order, while combinations are ranked ascending. Ranking therefore
//! complements both the indices and the value: the combination with combinadic value `x` has rank
//! `C(n, r) - 1 - x`.
use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::calculator::Calculator;
use crate::error::{Error, Result};
use crate::lex::Step;
use crate::El;

/// A number in the combinatorial number system, most significant (largest) digit first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Combinadic {
    digits: Vec<usize>,
}

impl Combinadic {
    /// The degree `r` representation of `value`, using digits below `n`.
    ///
    /// Requires `r <= n` and `value < C(n, r)`.
    pub fn from_value(calc: &Calculator, value: &BigUint, n: usize, r: usize) -> Combinadic {
        let mut digits = Vec::with_capacity(r);
        let mut value = value.clone();
        let mut bound = n;
        for i in 0..r {
            let remaining = r - i;
            // Largest b < bound with C(b, remaining) <= value. C(remaining - 1, remaining) is zero,
            // so the search range is never empty.
            let mut lo = remaining - 1;
            let mut hi = bound - 1;
            while lo < hi {
                let mid = lo + (hi - lo + 1) / 2;
                if calc.ncr(mid, remaining) <= value {
                    lo = mid;
                } else {
                    hi = mid - 1;
                }
            }
            value -= calc.ncr(lo, remaining);
            digits.push(lo);
            bound = lo;
        }
        Combinadic { digits }
    }

    /// The complement of an ascending combination of items `0..n`.
    pub fn from_combination(n: usize, comb: &[El]) -> Result<Combinadic> {
        if comb.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::NotAStructure {
                reason: "combination is not strictly increasing",
            });
        }
        if comb.last().map_or(false, |&last| last >= n) {
            return Err(Error::NotAStructure {
                reason: "combination item out of range",
            });
        }
        Ok(Combinadic {
            digits: comb.iter().map(|&c| n - 1 - c).collect(),
        })
    }

    pub fn digits(&self) -> &[usize] {
        &self.digits
    }

    pub fn degree(&self) -> usize {
        self.digits.len()
    }

    /// The integer this number represents.
    pub fn value(&self, calc: &Calculator) -> BigUint {
        let r = self.digits.len();
        self.digits
            .iter()
            .enumerate()
            .fold(BigUint::zero(), |acc, (i, &c)| acc + calc.ncr(c, r - i))
    }

    /// The ascending combination of items `0..n` this number is the complement of.
    pub fn to_combination(&self, n: usize) -> Vec<El> {
        self.digits.iter().map(|&c| n - 1 - c).collect()
    }

    /// Step to the representation of the lexicographically next combination.
    ///
    /// This decrements the represented value by one in `O(r)` without going through the value.
    /// Returns [`Step::Exhausted`] and leaves the digits unchanged at the value zero.
    pub fn next(&mut self) -> Step {
        let r = self.digits.len();
        let mut i = r;
        while i > 0 {
            i -= 1;
            // The smallest digit allowed at position i is r - 1 - i.
            if self.digits[i] + i + 1 > r {
                self.digits[i] -= 1;
                for j in i + 1..r {
                    self.digits[j] = self.digits[j - 1] - 1;
                }
                return Step::Advanced;
            }
        }
        Step::Exhausted
    }
}

impl fmt::Display for Combinadic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("(")?;
        for (pos, digit) in self.digits.iter().enumerate() {
            if pos > 0 {
                f.write_str(" ")?;
            }
            fmt::Display::fmt(digit, f)?;
        }
        f.write_str(")")
    }
}

/// The lexicographic position of an ascending combination of items `0..n`.
pub fn rank(calc: &Calculator, n: usize, comb: &[El]) -> Result<BigUint> {
    let value = Combinadic::from_combination(n, comb)?.value(calc);
    Ok(calc.ncr(n, comb.len()) - value - 1u32)
}

/// The ascending `r`-combination of items `0..n` at lexicographic position `rank`.
///
/// `total` must be `C(n, r)`, callers usually have it at hand already.
pub fn unrank(
    calc: &Calculator,
    rank: &BigUint,
    total: &BigUint,
    n: usize,
    r: usize,
) -> Result<Vec<El>> {
    if r > n {
        return Err(Error::SizeExceedsItems { size: r, items: n });
    }
    if rank >= total {
        return Err(Error::RankOutOfRange {
            rank: rank.clone(),
            count: total.clone(),
        });
    }
    let value = total - rank - 1u32;
    Ok(Combinadic::from_value(calc, &value, n, r).to_combination(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    use crate::lex::next_combination;

    fn big(value: u64) -> BigUint {
        BigUint::from(value)
    }

    #[test]
    fn six_choose_three() {
        let calc = Calculator::new();
        let total = calc.ncr(6, 3);
        assert_eq!(total, big(20));
        assert_eq!(unrank(&calc, &big(0), &total, 6, 3).unwrap(), vec![0, 1, 2]);
        assert_eq!(unrank(&calc, &big(19), &total, 6, 3).unwrap(), vec![3, 4, 5]);
        assert_eq!(rank(&calc, 6, &[3, 4, 5]).unwrap(), big(19));
        assert_eq!(rank(&calc, 6, &[0, 1, 2]).unwrap(), big(0));
    }

    #[test]
    fn degenerate_sizes() {
        let calc = Calculator::new();
        let one = big(1);
        assert_eq!(unrank(&calc, &big(0), &one, 5, 0).unwrap(), Vec::<El>::new());
        assert_eq!(unrank(&calc, &big(0), &one, 4, 4).unwrap(), vec![0, 1, 2, 3]);
        assert!(unrank(&calc, &big(1), &one, 5, 0).unwrap_err().is_out_of_range());
        assert_eq!(rank(&calc, 5, &[]).unwrap(), big(0));
    }

    #[test]
    fn rejects_bad_input() {
        let calc = Calculator::new();
        assert!(rank(&calc, 5, &[1, 1]).is_err());
        assert!(rank(&calc, 5, &[2, 1]).is_err());
        assert!(rank(&calc, 5, &[2, 5]).is_err());
        let total = calc.ncr(5, 2);
        assert!(unrank(&calc, &total, &total, 5, 2).unwrap_err().is_out_of_range());
    }

    #[test]
    fn digits_and_fmt() {
        let calc = Calculator::new();
        let c = Combinadic::from_combination(6, &[0, 2, 3]).unwrap();
        assert_eq!(c.digits(), &[5, 3, 2]);
        assert_eq!(c.value(&calc), big(10 + 3 + 2));
        assert_eq!(format!("{}", c), "(5 3 2)");
    }

    #[test]
    fn huge_space() {
        let calc = Calculator::new();
        let total = calc.ncr(100, 50);
        let last = &total - 1u32;
        let comb = unrank(&calc, &last, &total, 100, 50).unwrap();
        assert_eq!(comb, (50..100).collect::<Vec<_>>());
        assert_eq!(rank(&calc, 100, &comb).unwrap(), last);
    }

    proptest! {
        #[test]
        fn roundtrip_rank(n in 0..40usize, r in 0..40usize, seed in any::<u64>()) {
            prop_assume!(r <= n);
            let calc = Calculator::new();
            let total = calc.ncr(n, r);
            let x = BigUint::from(seed) % &total;
            let comb = unrank(&calc, &x, &total, n, r).unwrap();
            prop_assert_eq!(comb.len(), r);
            prop_assert!(comb.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(rank(&calc, n, &comb).unwrap(), x);
        }

        #[test]
        fn successor_agreement(
            n in 2..12usize,
            r in any::<prop::sample::Index>(),
            seed in any::<u64>(),
        ) {
            // 0 < r < n, so there are at least n combinations
            let r = 1 + r.index(n - 1);
            let calc = Calculator::new();
            let total = calc.ncr(n, r);
            let x = BigUint::from(seed) % (&total - 1u32);
            let mut comb = unrank(&calc, &x, &total, n, r).unwrap();
            let mut digits = Combinadic::from_combination(n, &comb).unwrap();

            prop_assert_eq!(next_combination(&mut comb, n), Step::Advanced);
            prop_assert_eq!(digits.next(), Step::Advanced);

            let expected = unrank(&calc, &(x + 1u32), &total, n, r).unwrap();
            prop_assert_eq!(&comb, &expected);
            prop_assert_eq!(digits.to_combination(n), expected);
        }

        #[test]
        fn next_walks_down_values(n in 1..10usize, r in 1..10usize) {
            prop_assume!(r <= n);
            let calc = Calculator::new();
            let mut digits = Combinadic::from_combination(n, &(0..r).collect::<Vec<_>>()).unwrap();
            let mut value = calc.ncr(n, r) - 1u32;
            prop_assert_eq!(digits.value(&calc), value.clone());
            while digits.next() == Step::Advanced {
                value -= 1u32;
                prop_assert_eq!(digits.value(&calc), value.clone());
            }
            prop_assert!(value.is_zero());
        }
    }
}
