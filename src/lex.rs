//! In-place lexicographic successor functions.
//!
//! Each function advances a structure to its immediate lexicographic successor. When the structure
//! is already the last one, [`Step::Exhausted`] is returned and the structure is left unchanged,
//! except for the base-n counter of [`next_repetitive_permutation`], which wraps around to zero.
use std::cmp::min;

use crate::error::{Error, Result};
use crate::freq_vector::FreqVector;
use crate::multiset::Multiset;
use crate::El;

/// Outcome of a successor step.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The structure now holds its successor.
    Advanced,
    /// The structure was the last one.
    Exhausted,
}

impl Step {
    pub fn is_advanced(self) -> bool {
        self == Step::Advanced
    }
}

/// Advance an ascending combination of items `0..n`.
pub fn next_combination(indices: &mut [El], n: usize) -> Step {
    let r = indices.len();
    let mut i = r;
    while i > 0 {
        i -= 1;
        // Position i can hold at most n - r + i.
        if indices[i] + r < n + i {
            indices[i] += 1;
            for j in i + 1..r {
                indices[j] = indices[j - 1] + 1;
            }
            return Step::Advanced;
        }
    }
    Step::Exhausted
}

/// Advance a permutation, which may contain repeated items.
pub fn next_permutation(indices: &mut [El]) -> Step {
    let len = indices.len();
    if len < 2 {
        return Step::Exhausted;
    }
    // Find the start of the longest non-increasing suffix
    let mut i = len - 1;
    while i > 0 && indices[i - 1] >= indices[i] {
        i -= 1;
    }
    if i == 0 {
        return Step::Exhausted;
    }
    let pivot = i - 1;
    let mut j = len - 1;
    while indices[j] <= indices[pivot] {
        j -= 1;
    }
    indices.swap(pivot, j);
    indices[i..].reverse();
    Step::Advanced
}

/// Advance a k-permutation of items `0..n`.
pub fn next_k_permutation(indices: &mut [El], n: usize) -> Step {
    next_k_permutation_with_scratch(indices, n, &mut vec![])
}

/// Advance a k-permutation of items `0..n`. Use existing scratch space.
///
/// The last parameter is used as scratch space and will be overwritten.
pub fn next_k_permutation_with_scratch(indices: &mut [El], n: usize, used: &mut Vec<bool>) -> Step {
    used.clear();
    used.resize(n, false);
    for &x in indices.iter() {
        used[x] = true;
    }

    let k = indices.len();
    for i in (0..k).rev() {
        used[indices[i]] = false;
        if let Some(larger) = (indices[i] + 1..n).find(|&v| !used[v]) {
            indices[i] = larger;
            used[larger] = true;
            let mut candidate = 0;
            for slot in indices[i + 1..].iter_mut() {
                while used[candidate] {
                    candidate += 1;
                }
                *slot = candidate;
                used[candidate] = true;
            }
            return Step::Advanced;
        }
    }
    Step::Exhausted
}

/// Advance a non-decreasing sequence over items `0..n`, i.e. a combination with repetition.
pub fn next_repetitive_combination(indices: &mut [El], n: usize) -> Step {
    match indices.iter().rposition(|&x| x + 1 < n) {
        Some(i) => {
            let value = indices[i] + 1;
            for slot in indices[i..].iter_mut() {
                *slot = value;
            }
            Step::Advanced
        }
        None => Step::Exhausted,
    }
}

/// Advance a base-`n` counter, most significant digit first.
///
/// On exhaustion the carry runs off the most significant digit and the counter is all zeros.
pub fn next_repetitive_permutation(indices: &mut [El], n: usize) -> Step {
    for digit in indices.iter_mut().rev() {
        *digit += 1;
        if *digit < n {
            return Step::Advanced;
        }
        *digit = 0;
    }
    Step::Exhausted
}

/// Advance a sorted sub-multiset, represented by its items in ascending order.
///
/// The successor changes the rightmost position that is still below the largest value it could
/// take, and refills everything from there with the smallest items larger than the old value.
/// Both steps read from the flattened multiset, so this is `O(r)`.
pub fn next_multiset_combination(indices: &mut [El], multiset: &Multiset) -> Step {
    let r = indices.len();
    let total = multiset.total();
    if r > total {
        return Step::Exhausted;
    }
    let flat = multiset.flat();
    let mut i = r;
    while i > 0 {
        i -= 1;
        if indices[i] < flat[total - r + i] {
            let start = multiset.after(indices[i]);
            indices[i..].copy_from_slice(&flat[start..start + r - i]);
            return Step::Advanced;
        }
    }
    Step::Exhausted
}

/// Advance a sorted sub-multiset held in a [`FreqVector`].
///
/// Produces the same sequence as [`next_multiset_combination`], but finds the position to change
/// by walking the item types from the largest down, comparing each frequency with that of the
/// largest possible tail, and then looks up the item there by order statistics.
///
/// Fails without touching `freq` unless it has one key per item type of `multiset` and stays
/// within its multiplicities.
pub fn next_multiset_combination_freq(
    freq: &mut FreqVector,
    multiset: &Multiset,
) -> Result<Step> {
    let multiplicities = multiset.multiplicities();
    if freq.key_count() != multiplicities.len() {
        return Err(Error::LengthMismatch {
            expected: multiplicities.len(),
            actual: freq.key_count(),
        });
    }
    if freq
        .frequencies()
        .iter()
        .zip(multiplicities)
        .any(|(&f, &m)| f > m)
    {
        return Err(Error::NotAStructure {
            reason: "frequency exceeds multiplicity",
        });
    }
    Ok(advance_frequencies(freq, multiplicities))
}

/// Step a sub-multiset held in `freq`, which has one key per entry of `multiplicities` and stays
/// within them.
pub(crate) fn advance_frequencies(freq: &mut FreqVector, multiplicities: &[usize]) -> Step {
    let r = freq.len();

    let mut matched = 0;
    let mut t = multiplicities.len();
    let short = loop {
        if matched >= r || t == 0 {
            return Step::Exhausted;
        }
        t -= 1;
        let tail = min(multiplicities[t], r - matched);
        let have = freq.frequency(t);
        if have < tail {
            break t;
        }
        matched += have;
    };

    // All copies of `short` sit directly before the matched tail, the slot before them holds the
    // item to increase. It exists since `short` has fewer copies than slots left for it.
    let index = r - matched - freq.frequency(short) - 1;
    let value = freq.value_at(index);
    freq.truncate(index);
    freq.fill_from(value + 1, multiplicities, r - index);
    Step::Advanced
}

/// Advance an `r`-length arrangement drawn from a multiset.
pub fn next_multiset_permutation(indices: &mut [El], multiset: &Multiset) -> Step {
    next_multiset_permutation_with_scratch(indices, multiset, &mut vec![])
}

/// Advance an `r`-length arrangement drawn from a multiset. Use existing scratch space.
///
/// The last parameter is used as scratch space and will be overwritten.
pub fn next_multiset_permutation_with_scratch(
    indices: &mut [El],
    multiset: &Multiset,
    supply: &mut Vec<usize>,
) -> Step {
    supply.clear();
    supply.extend_from_slice(multiset.multiplicities());
    for &x in indices.iter() {
        supply[x] -= 1;
    }

    let types = multiset.types();
    for i in (0..indices.len()).rev() {
        supply[indices[i]] += 1;
        if let Some(larger) = (indices[i] + 1..types).find(|&t| supply[t] > 0) {
            indices[i] = larger;
            supply[larger] -= 1;
            let mut candidate = 0;
            for slot in indices[i + 1..].iter_mut() {
                while supply[candidate] == 0 {
                    candidate += 1;
                }
                *slot = candidate;
                supply[candidate] -= 1;
            }
            return Step::Advanced;
        }
    }
    Step::Exhausted
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn walk<F>(first: Vec<El>, mut next: F) -> Vec<Vec<El>>
    where
        F: FnMut(&mut [El]) -> Step,
    {
        let mut current = first;
        let mut all = vec![current.clone()];
        while next(&mut current).is_advanced() {
            all.push(current.clone());
        }
        all
    }

    fn assert_strictly_ascending(all: &[Vec<El>]) {
        for pair in all.windows(2) {
            assert!(pair[0] < pair[1], "{:?} !< {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn combinations_of_four() {
        let all = walk(vec![0, 1], |c| next_combination(c, 4));
        assert_eq!(
            all,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3],
            ]
        );
        let mut last = vec![2, 3];
        assert_eq!(next_combination(&mut last, 4), Step::Exhausted);
        assert_eq!(last, vec![2, 3]);
    }

    #[test]
    fn permutations_with_repeats() {
        let all = walk(vec![0, 0, 1], next_permutation);
        assert_eq!(all, vec![vec![0, 0, 1], vec![0, 1, 0], vec![1, 0, 0]]);
        assert_eq!(walk(vec![], next_permutation).len(), 1);
        assert_eq!(walk(vec![0, 1, 2, 3, 4], next_permutation).len(), 120);
    }

    #[test]
    fn k_permutations() {
        let all = walk(vec![0, 1], |p| next_k_permutation(p, 3));
        assert_eq!(
            all,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 2],
                vec![2, 0],
                vec![2, 1],
            ]
        );
        assert_eq!(walk(vec![0, 1, 2], |p| next_k_permutation(p, 6)).len(), 120);
    }

    #[test]
    fn repetitive_combinations() {
        let all = walk(vec![0, 0], |c| next_repetitive_combination(c, 3));
        assert_eq!(
            all,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 1],
                vec![1, 2],
                vec![2, 2],
            ]
        );
        assert_eq!(walk(vec![0; 4], |c| next_repetitive_combination(c, 5)).len(), 70);
    }

    #[test]
    fn repetitive_permutations() {
        let all = walk(vec![0; 3], |c| next_repetitive_permutation(c, 2));
        assert_eq!(all.len(), 8);
        assert_eq!(all[5], vec![1, 0, 1]);
        let mut last = vec![1, 1, 1];
        assert_eq!(next_repetitive_permutation(&mut last, 2), Step::Exhausted);
        assert_eq!(last, vec![0, 0, 0]);
    }

    #[test]
    fn multiset_combinations() {
        let multiset = Multiset::new(vec![2, 1]).unwrap();
        let all = walk(vec![0, 0], |c| next_multiset_combination(c, &multiset));
        assert_eq!(all, vec![vec![0, 0], vec![0, 1]]);

        let multiset = Multiset::new(vec![2, 1, 2]).unwrap();
        let all = walk(vec![0, 0, 1], |c| next_multiset_combination(c, &multiset));
        assert_eq!(
            all,
            vec![
                vec![0, 0, 1],
                vec![0, 0, 2],
                vec![0, 1, 2],
                vec![0, 2, 2],
                vec![1, 2, 2],
            ]
        );
    }

    #[test]
    fn multiset_permutations() {
        let multiset = Multiset::new(vec![2, 1]).unwrap();
        let all = walk(vec![0, 0], |c| next_multiset_permutation(c, &multiset));
        assert_eq!(all, vec![vec![0, 0], vec![0, 1], vec![1, 0]]);
        let all = walk(vec![0, 0, 1], |c| next_multiset_permutation(c, &multiset));
        assert_eq!(all, walk(vec![0, 0, 1], next_permutation));
    }

    #[test]
    fn freq_vector_two_from_aab() {
        let multiset = Multiset::new(vec![2, 1]).unwrap();
        let mut freq = FreqVector::new(2, 2);
        freq.add_many(0, 2).unwrap();
        assert_eq!(format!("{}", freq), "{0=2}");
        assert_eq!(next_multiset_combination_freq(&mut freq, &multiset), Ok(Step::Advanced));
        assert_eq!(format!("{}", freq), "{0=1, 1=1}");
        assert_eq!(next_multiset_combination_freq(&mut freq, &multiset), Ok(Step::Exhausted));
        assert_eq!(format!("{}", freq), "{0=1, 1=1}");
    }

    #[test]
    fn freq_vector_must_fit_multiset() {
        let multiset = Multiset::new(vec![2, 1, 1]).unwrap();
        let mut freq = FreqVector::new(2, 2);
        freq.add_many(0, 2).unwrap();
        assert_eq!(
            next_multiset_combination_freq(&mut freq, &multiset),
            Err(Error::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(freq.as_list(), vec![0, 0]);

        let mut freq = FreqVector::new(2, 3);
        freq.add_many(1, 2).unwrap();
        let err = next_multiset_combination_freq(&mut freq, &multiset).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(freq.as_list(), vec![1, 1]);

        // A matching vector walks every sub-multiset, [0, 2] included
        let mut freq = FreqVector::new(2, 3);
        freq.add_many(0, 2).unwrap();
        let mut all = vec![freq.as_list()];
        while next_multiset_combination_freq(&mut freq, &multiset)
            .unwrap()
            .is_advanced()
        {
            all.push(freq.as_list());
        }
        assert_eq!(
            all,
            vec![vec![0, 0], vec![0, 1], vec![0, 2], vec![1, 2]]
        );
    }

    proptest! {
        #[test]
        fn sequences_ascend(n in 0..7usize, r in 0..5usize) {
            prop_assume!(r <= n);
            assert_strictly_ascending(&walk((0..r).collect(), |c| next_combination(c, n)));
            assert_strictly_ascending(&walk((0..r).collect(), |c| next_k_permutation(c, n)));
            if n > 0 {
                assert_strictly_ascending(&walk(vec![0; r], |c| next_repetitive_combination(c, n)));
                assert_strictly_ascending(&walk(vec![0; r], |c| next_repetitive_permutation(c, n)));
            }
        }

        #[test]
        fn multiset_strategies_agree(
            multiplicities in prop::collection::vec(1..4usize, 1..6),
            r in any::<prop::sample::Index>(),
        ) {
            let multiset = Multiset::new(multiplicities).unwrap();
            let r = r.index(multiset.total() + 1);

            let first = multiset.flat()[..r].to_vec();
            let by_array = walk(first.clone(), |c| next_multiset_combination(c, &multiset));

            let mut freq = FreqVector::new(r, multiset.types());
            for &item in first.iter() {
                freq.add(item).unwrap();
            }
            let mut by_freq = vec![freq.as_list()];
            while next_multiset_combination_freq(&mut freq, &multiset).unwrap().is_advanced() {
                by_freq.push(freq.as_list());
            }

            assert_strictly_ascending(&by_array);
            prop_assert_eq!(by_array, by_freq);
        }

        #[test]
        fn multiset_permutations_ascend(
            multiplicities in prop::collection::vec(1..3usize, 1..5),
            r in any::<prop::sample::Index>(),
        ) {
            let multiset = Multiset::new(multiplicities).unwrap();
            let r = r.index(multiset.total() + 1);
            let all = walk(multiset.flat()[..r].to_vec(), |c| next_multiset_permutation(c, &multiset));
            assert_strictly_ascending(&all);
            for arrangement in all.iter() {
                prop_assert!(multiset.frequencies_of(arrangement).is_ok());
            }
        }
    }
}
