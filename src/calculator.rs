//! Memoized combinatorial arithmetic.
use std::cmp::min;

use dashmap::DashMap;
use log::{debug, trace};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use parking_lot::RwLock;

use crate::config::Config;

/// Counting context for one logical session.
///
/// All counts are exact and memoized. The factorial table always stays contiguous from `0!`, and
/// binomial coefficients and k-permutation counts are stored per `(n, r)` pair. Memo tables are
/// never evicted, so a calculator should be dropped (or [cleared](Calculator::clear)) once a batch
/// of work is done.
///
/// A calculator can be shared between threads. Concurrent lookups and insertions are safe, but
/// nothing bounds the growth of the tables.
pub struct Calculator {
    config: Config,
    factorials: RwLock<Vec<BigUint>>,
    binomials: DashMap<(usize, usize), BigUint>,
    arrangements: DashMap<(usize, usize), BigUint>,
}

impl Calculator {
    /// A calculator using the default [`Config`].
    pub fn new() -> Calculator {
        Calculator::with_config(Config::default())
    }

    /// A calculator with its factorial table pre-warmed to `config.cache_size`.
    pub fn with_config(config: Config) -> Calculator {
        debug!(
            "creating calculator, cache size {}, multiset crossover {}",
            config.cache_size, config.multiset_crossover
        );
        let calculator = Calculator {
            config,
            factorials: RwLock::new(vec![BigUint::one()]),
            binomials: DashMap::new(),
            arrangements: DashMap::new(),
        };
        calculator.extend_factorials(config.cache_size);
        calculator
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Drop all memoized values.
    pub fn clear(&self) {
        debug!(
            "clearing calculator caches ({} factorials, {} binomials, {} arrangements)",
            self.factorials.read().len(),
            self.binomials.len(),
            self.arrangements.len()
        );
        *self.factorials.write() = vec![BigUint::one()];
        self.binomials.clear();
        self.arrangements.clear();
    }

    /// Number of factorials currently held, i.e. one more than the largest cached argument.
    pub fn cached_factorials(&self) -> usize {
        self.factorials.read().len()
    }

    /// `n!`
    pub fn factorial(&self, n: usize) -> BigUint {
        if let Some(value) = self.factorials.read().get(n) {
            return value.clone();
        }
        self.extend_factorials(n)
    }

    /// Extend the factorial table up to and including `n!` and return that value.
    fn extend_factorials(&self, n: usize) -> BigUint {
        let mut table = self.factorials.write();
        if table.len() <= n {
            trace!("extending factorial table from {} to {}", table.len() - 1, n);
            let extra = n + 1 - table.len();
            table.reserve(extra);
            while table.len() <= n {
                let len = table.len();
                let next = &table[len - 1] * BigUint::from(len);
                table.push(next);
            }
        }
        table[n].clone()
    }

    /// Number of `r`-subsets of an `n`-set.
    pub fn ncr(&self, n: usize, r: usize) -> BigUint {
        if r > n {
            return BigUint::zero();
        }
        if r == 0 || r == n {
            return BigUint::one();
        }
        if r == 1 || r == n - 1 {
            return BigUint::from(n);
        }
        let r = min(r, n - r);
        if let Some(value) = self.binomials.get(&(n, r)) {
            return value.clone();
        }

        // Walk row n upwards from the closest known entry, memoizing every step.
        let mut k = r;
        let mut value = loop {
            k -= 1;
            if k == 1 {
                break BigUint::from(n);
            }
            if let Some(cached) = self.binomials.get(&(n, k)) {
                break cached.clone();
            }
        };
        while k < r {
            value = value * BigUint::from(n - k) / BigUint::from(k + 1);
            k += 1;
            self.binomials.insert((n, k), value.clone());
        }
        value
    }

    /// Number of `r`-permutations of an `n`-set.
    pub fn npr(&self, n: usize, r: usize) -> BigUint {
        if r > n {
            return BigUint::zero();
        }
        if r == 0 {
            return BigUint::one();
        }
        if r == 1 {
            return BigUint::from(n);
        }
        if let Some(value) = self.arrangements.get(&(n, r)) {
            return value.clone();
        }

        let mut k = r;
        let mut value = loop {
            k -= 1;
            if k == 1 {
                break BigUint::from(n);
            }
            if let Some(cached) = self.arrangements.get(&(n, k)) {
                break cached.clone();
            }
        };
        while k < r {
            value *= BigUint::from(n - k);
            k += 1;
            self.arrangements.insert((n, k), value.clone());
        }
        value
    }

    /// Number of `r`-multisets over `n` item types, each usable any number of times.
    pub fn ncr_repetitive(&self, n: usize, r: usize) -> BigUint {
        if r == 0 {
            BigUint::one()
        } else if n == 0 {
            BigUint::zero()
        } else {
            self.ncr(n + r - 1, r)
        }
    }

    /// `base` raised to `exponent`, by repeated squaring.
    pub fn power(&self, base: usize, exponent: usize) -> BigUint {
        let mut result = BigUint::one();
        let mut square = BigUint::from(base);
        let mut exponent = exponent;
        while exponent > 0 {
            if exponent.is_odd() {
                result *= &square;
            }
            exponent >>= 1;
            if exponent > 0 {
                square = &square * &square;
            }
        }
        result
    }

    /// `(Σ f)! / Π f!` for the given frequencies.
    pub fn multinomial(&self, frequencies: &[usize]) -> BigUint {
        let total: usize = frequencies.iter().sum();
        let denominator = frequencies
            .iter()
            .fold(BigUint::one(), |acc, &f| acc * self.factorial(f));
        self.factorial(total) / denominator
    }

    /// Number of subsets of an `n`-set whose size lies in `from..=to`.
    pub fn total_subsets_in_range(&self, from: usize, to: usize, n: usize) -> BigUint {
        if from == 0 && to >= n {
            return self.power(2, n);
        }
        (from..=min(to, n)).fold(BigUint::zero(), |acc, r| acc + self.ncr(n, r))
    }

    /// Number of `r`-sub-multisets of a multiset with the given multiplicities.
    pub fn multiset_combinations(&self, multiplicities: &[usize], r: usize) -> BigUint {
        let mut table = sub_multiset_table(multiplicities, r);
        table.swap_remove(0).swap_remove(r)
    }

    /// Number of `r`-length arrangements drawn from a multiset with the given multiplicities.
    ///
    /// When `r` is the multiset's full size this is the multinomial coefficient.
    pub fn multiset_permutations(&self, multiplicities: &[usize], r: usize) -> BigUint {
        let total: usize = multiplicities.iter().sum();
        if r > total {
            return BigUint::zero();
        }
        if r == total {
            return self.multinomial(multiplicities);
        }

        // counts[j]: arrangements of length j using the item types seen so far.
        let mut counts = vec![BigUint::zero(); r + 1];
        counts[0] = BigUint::one();
        for &multiplicity in multiplicities {
            let mut next = vec![BigUint::zero(); r + 1];
            for (j, slot) in next.iter_mut().enumerate() {
                for c in 0..=min(multiplicity, j) {
                    let prefix = &counts[j - c];
                    if !prefix.is_zero() {
                        *slot += prefix * self.ncr(j, c);
                    }
                }
            }
            counts = next;
        }
        counts.swap_remove(r)
    }
}

impl Default for Calculator {
    fn default() -> Calculator {
        Calculator::new()
    }
}

/// Sub-multiset counts by suffix of item types.
///
/// Entry `[t][j]` is the number of `j`-sub-multisets using only item types `t..`. The last row
/// (no item types left) only admits the empty multiset.
pub(crate) fn sub_multiset_table(multiplicities: &[usize], r: usize) -> Vec<Vec<BigUint>> {
    let types = multiplicities.len();
    let mut table = vec![vec![BigUint::zero(); r + 1]; types + 1];
    table[types][0] = BigUint::one();

    for t in (0..types).rev() {
        let (head, tail) = table.split_at_mut(t + 1);
        let (row, next) = (&mut head[t], &tail[0]);
        let multiplicity = multiplicities[t];
        // Sliding sum of next[j - multiplicity..=j]
        let mut window = BigUint::zero();
        for j in 0..=r {
            window += &next[j];
            if j > multiplicity {
                window -= &next[j - multiplicity - 1];
            }
            row[j] = window.clone();
        }
    }
    table
}
