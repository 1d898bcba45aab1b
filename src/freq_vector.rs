//! Frequency vectors with order statistics.
use std::cmp::min;
use std::fmt;

use crate::error::{Error, Result};
use crate::El;

/// A bounded multiset of keys stored as per-key frequencies.
///
/// Besides the frequency of each key this maintains their running (inclusive) prefix sums. Viewing
/// the multiset as its sorted list of keys, the prefix sums allow finding the key in any slot by
/// binary search, without ever materializing that list.
///
/// At most `size` keys can be held, keys are in `0..key_count`.
#[derive(Clone, PartialEq, Eq)]
pub struct FreqVector {
    size: usize,
    len: usize,
    frequencies: Vec<usize>,
    cumulative: Vec<usize>,
}

impl FreqVector {
    /// An empty frequency vector.
    pub fn new(size: usize, key_count: usize) -> FreqVector {
        FreqVector {
            size,
            len: 0,
            frequencies: vec![0; key_count],
            cumulative: vec![0; key_count],
        }
    }

    /// Maximal number of keys.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn key_count(&self) -> usize {
        self.frequencies.len()
    }

    /// Number of keys currently held, counted with multiplicity.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.size
    }

    pub fn frequency(&self, key: El) -> usize {
        self.frequencies.get(key).cloned().unwrap_or(0)
    }

    pub fn frequencies(&self) -> &[usize] {
        &self.frequencies
    }

    fn check_key(&self, key: El) -> Result<()> {
        if key >= self.key_count() {
            return Err(Error::KeyOutOfRange {
                key,
                key_count: self.key_count(),
            });
        }
        Ok(())
    }

    /// Add one copy of `key`.
    pub fn add(&mut self, key: El) -> Result<()> {
        self.add_many(key, 1)
    }

    /// Add `count` copies of `key`.
    ///
    /// Nothing is added when the copies would not fit.
    pub fn add_many(&mut self, key: El, count: usize) -> Result<()> {
        self.check_key(key)?;
        if self.size - self.len < count {
            return Err(Error::CapacityExceeded { size: self.size });
        }
        self.frequencies[key] += count;
        for c in self.cumulative[key..].iter_mut() {
            *c += count;
        }
        self.len += count;
        Ok(())
    }

    /// Remove one copy of `key`. Returns false if there was none.
    pub fn remove(&mut self, key: El) -> bool {
        if self.frequency(key) == 0 {
            return false;
        }
        self.frequencies[key] -= 1;
        for c in self.cumulative[key..].iter_mut() {
            *c -= 1;
        }
        self.len -= 1;
        true
    }

    /// Replace the key in slot `index` of the sorted list by `key`.
    pub fn set(&mut self, index: usize, key: El) -> Result<()> {
        self.check_key(key)?;
        let old = self.find_value_at_index(index).ok_or(Error::SlotOutOfRange {
            index,
            len: self.len,
        })?;
        if old == key {
            return Ok(());
        }
        self.frequencies[old] -= 1;
        self.frequencies[key] += 1;
        // Only prefix sums strictly between the two keys' positions change.
        if old < key {
            for c in self.cumulative[old..key].iter_mut() {
                *c -= 1;
            }
        } else {
            for c in self.cumulative[key..old].iter_mut() {
                *c += 1;
            }
        }
        Ok(())
    }

    /// The key in slot `index` of the sorted list, or `None` if fewer keys are held.
    pub fn find_value_at_index(&self, index: usize) -> Option<El> {
        if index >= self.len {
            return None;
        }
        Some(self.value_at(index))
    }

    /// The key in slot `index`, which must be below [`len`](FreqVector::len).
    pub(crate) fn value_at(&self, index: usize) -> El {
        self.cumulative.partition_point(|&c| c <= index)
    }

    /// Add up to `count` keys, taking the smallest keys from `from` upwards, each until its
    /// frequency reaches its entry in `limits`. Stops early when the vector is full or the keys
    /// run out. Returns the number of keys added.
    pub fn fill_from(&mut self, from: El, limits: &[usize], count: usize) -> usize {
        let keys = min(limits.len(), self.key_count());
        let wanted = min(count, self.size - self.len);
        let mut remaining = wanted;
        let mut key = from;
        while remaining > 0 && key < keys {
            let taken = min(limits[key].saturating_sub(self.frequencies[key]), remaining);
            self.frequencies[key] += taken;
            remaining -= taken;
            key += 1;
        }
        let added = wanted - remaining;
        if added > 0 {
            self.rebuild_cumulative(from);
            self.len += added;
        }
        added
    }

    /// Recompute the prefix sums of all keys from `from` on.
    fn rebuild_cumulative(&mut self, from: El) {
        let mut sum = if from == 0 { 0 } else { self.cumulative[from - 1] };
        for (c, &f) in self.cumulative[from..].iter_mut().zip(&self.frequencies[from..]) {
            sum += f;
            *c = sum;
        }
    }

    /// Keep only the `len` smallest keys.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let mut excess = self.len - len;
        let mut key = self.key_count();
        while excess > 0 {
            key -= 1;
            let taken = min(self.frequencies[key], excess);
            self.frequencies[key] -= taken;
            excess -= taken;
        }
        self.rebuild_cumulative(key);
        self.len = len;
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// The held keys in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = El> + '_ {
        self.frequencies
            .iter()
            .enumerate()
            .flat_map(|(key, &f)| std::iter::repeat(key).take(f))
    }

    /// The held keys as a sorted list.
    pub fn as_list(&self) -> Vec<El> {
        self.iter().collect()
    }
}

impl From<&FreqVector> for Vec<El> {
    fn from(freq: &FreqVector) -> Vec<El> {
        freq.as_list()
    }
}

impl fmt::Display for FreqVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("{")?;
        let mut first = true;
        for (key, &count) in self.frequencies.iter().enumerate() {
            if count == 0 {
                continue;
            }
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}={}", key, count)?;
        }
        f.write_str("}")
    }
}

impl fmt::Debug for FreqVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} of {}", self, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn order_statistics() {
        let mut freq = FreqVector::new(5, 3);
        for &key in &[0, 2, 2, 1, 1] {
            freq.add(key).unwrap();
        }
        assert_eq!(freq.as_list(), vec![0, 1, 1, 2, 2]);
        for (i, &key) in [0, 1, 1, 2, 2].iter().enumerate() {
            assert_eq!(freq.find_value_at_index(i), Some(key));
        }
        assert_eq!(freq.find_value_at_index(5), None);
        assert_eq!(format!("{}", freq), "{0=1, 1=2, 2=2}");
    }

    #[test]
    fn bounds() {
        let mut freq = FreqVector::new(2, 2);
        assert_eq!(
            freq.add(2).unwrap_err(),
            Error::KeyOutOfRange { key: 2, key_count: 2 }
        );
        freq.add(1).unwrap();
        freq.add(1).unwrap();
        assert!(freq.is_full());
        assert_eq!(freq.add(0).unwrap_err(), Error::CapacityExceeded { size: 2 });
        assert!(freq.add_many(0, 3).is_err());
        assert_eq!(freq.as_list(), vec![1, 1]);

        assert!(!freq.remove(0));
        assert!(!freq.remove(7));
        assert!(freq.remove(1));
        assert_eq!(freq.len(), 1);
        assert!(freq.set(1, 0).unwrap_err().is_bounds());
    }

    #[test]
    fn set_moves_keys() {
        let mut freq = FreqVector::new(4, 4);
        freq.add_many(1, 2).unwrap();
        freq.add_many(3, 2).unwrap();
        freq.set(1, 0).unwrap();
        assert_eq!(freq.as_list(), vec![0, 1, 3, 3]);
        freq.set(0, 2).unwrap();
        assert_eq!(freq.as_list(), vec![1, 2, 3, 3]);
        freq.set(3, 3).unwrap();
        assert_eq!(freq.as_list(), vec![1, 2, 3, 3]);
    }

    #[test]
    fn truncation() {
        let mut freq = FreqVector::new(6, 3);
        freq.add_many(0, 2).unwrap();
        freq.add_many(1, 1).unwrap();
        freq.add_many(2, 3).unwrap();
        freq.truncate(2);
        assert_eq!(freq.as_list(), vec![0, 0]);
        assert_eq!(freq.find_value_at_index(1), Some(0));
        freq.add(2).unwrap();
        assert_eq!(freq.find_value_at_index(2), Some(2));
        freq.clear();
        assert!(freq.is_empty());
        assert_eq!(freq.frequencies(), &[0, 0, 0]);
    }

    #[test]
    fn fill_takes_smallest_keys() {
        let limits = [2, 1, 3];
        let mut freq = FreqVector::new(5, 3);
        assert_eq!(freq.fill_from(0, &limits, 4), 4);
        assert_eq!(freq.as_list(), vec![0, 0, 1, 2]);
        assert_eq!(freq.find_value_at_index(3), Some(2));

        // Capacity caps the fill
        assert_eq!(freq.fill_from(1, &limits, 3), 1);
        assert_eq!(freq.as_list(), vec![0, 0, 1, 2, 2]);
        assert_eq!(freq.fill_from(0, &limits, 1), 0);

        freq.truncate(1);
        assert_eq!(freq.fill_from(2, &limits, 4), 3);
        assert_eq!(freq.as_list(), vec![0, 2, 2, 2]);
        assert_eq!(freq.find_value_at_index(1), Some(2));
        assert_eq!(freq.fill_from(7, &limits, 1), 0);
    }

    proptest! {
        #[test]
        fn matches_sorted_list(
            ops in prop::collection::vec((0..5u8, 0..6usize, 0..6usize), 0..60)
        ) {
            let limits = [2, 1, 3, 2, 2];
            let mut freq = FreqVector::new(8, 5);
            let mut list: Vec<El> = vec![];

            for (op, a, b) in ops {
                match op {
                    0 => {
                        let ok = freq.add(a).is_ok();
                        prop_assert_eq!(ok, a < 5 && list.len() < 8);
                        if ok {
                            list.push(a);
                        }
                    }
                    1 => {
                        let pos = list.iter().position(|&x| x == a);
                        prop_assert_eq!(freq.remove(a), pos.is_some());
                        if let Some(pos) = pos {
                            list.remove(pos);
                        }
                    }
                    2 => {
                        let ok = freq.set(a, b).is_ok();
                        prop_assert_eq!(ok, a < list.len() && b < 5);
                        if ok {
                            list.sort();
                            list[a] = b;
                        }
                    }
                    3 => {
                        let mut expected = 0;
                        let mut key = a;
                        while expected < b && list.len() < 8 && key < limits.len() {
                            if list.iter().filter(|&&x| x == key).count() < limits[key] {
                                list.push(key);
                                expected += 1;
                            } else {
                                key += 1;
                            }
                        }
                        prop_assert_eq!(freq.fill_from(a, &limits, b), expected);
                    }
                    _ => {
                        freq.truncate(a);
                        list.sort();
                        list.truncate(a);
                    }
                }
                list.sort();
                prop_assert_eq!(freq.as_list(), list.clone());
                for (i, &key) in list.iter().enumerate() {
                    prop_assert_eq!(freq.find_value_at_index(i), Some(key));
                }
            }
        }
    }
}
