//! A compact bit vector for dataflow sets.
//!
//! The analyses in this crate track sets of statements and definition sites,
//! both identified by small dense indices. A word-packed bit vector keeps the
//! per-statement states cheap to clone, union and compare, which is all the
//! fixpoint solver needs.

/// A fixed-capacity bit set backed by `u64` words.
///
/// Used for reaching-definition states and the retained-statement mask of the
/// elimination pass.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitSet {
    /// The bits, 64 per word.
    words: Vec<u64>,
    /// Capacity in bits.
    len: usize,
}

impl BitSet {
    /// Creates an empty bit set able to hold `capacity` indices.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(64)],
            len: capacity,
        }
    }

    /// Returns the capacity of this bit set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no bit is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Sets the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn insert(&mut self, index: usize) {
        assert!(index < self.len, "index out of bounds");
        self.words[index / 64] |= 1u64 << (index % 64);
    }

    /// Returns `true` if the bit at `index` is set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        assert!(index < self.len, "index out of bounds");
        (self.words[index / 64] & (1u64 << (index % 64))) != 0
    }

    /// Returns the number of set bits.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Unions `other` into `self`, returning `true` if `self` changed.
    ///
    /// # Panics
    ///
    /// Panics if the capacities differ.
    pub fn union_with(&mut self, other: &Self) -> bool {
        assert_eq!(self.len, other.len, "bit sets must have same length");
        let mut changed = false;
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            let old = *a;
            *a |= *b;
            changed |= old != *a;
        }
        changed
    }

    /// Removes every bit set in `other` from `self`, returning `true` if
    /// `self` changed.
    ///
    /// # Panics
    ///
    /// Panics if the capacities differ.
    pub fn difference_with(&mut self, other: &Self) -> bool {
        assert_eq!(self.len, other.len, "bit sets must have same length");
        let mut changed = false;
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            let old = *a;
            *a &= !*b;
            changed |= old != *a;
        }
        changed
    }

    /// Returns an iterator over the set bit indices, in increasing order.
    pub fn iter(&self) -> BitSetIter<'_> {
        BitSetIter {
            set: self,
            word_idx: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl std::fmt::Debug for BitSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Iterator over the set bits of a [`BitSet`].
pub struct BitSetIter<'a> {
    set: &'a BitSet,
    word_idx: usize,
    /// Remaining bits of the current word; consumed lowest-first.
    current: u64,
}

impl Iterator for BitSetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_idx * 64 + bit);
            }
            self.word_idx += 1;
            if self.word_idx >= self.set.words.len() {
                return None;
            }
            self.current = self.set.words[self.word_idx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_contains() {
        let mut set = BitSet::new(130);
        assert!(set.is_empty());

        set.insert(0);
        set.insert(64);
        set.insert(129);

        assert_eq!(set.count(), 3);
        assert!(set.contains(0));
        assert!(set.contains(64));
        assert!(set.contains(129));
        assert!(!set.contains(63));
    }

    #[test]
    fn test_union() {
        let mut a = BitSet::new(70);
        let mut b = BitSet::new(70);
        a.insert(1);
        b.insert(1);
        b.insert(69);

        assert!(a.union_with(&b));
        assert!(a.contains(1));
        assert!(a.contains(69));

        // Second union adds nothing
        assert!(!a.union_with(&b));
    }

    #[test]
    fn test_difference() {
        let mut a = BitSet::new(10);
        let mut b = BitSet::new(10);
        a.insert(2);
        a.insert(3);
        b.insert(3);

        assert!(a.difference_with(&b));
        assert!(a.contains(2));
        assert!(!a.contains(3));
    }

    #[test]
    fn test_iter_order() {
        let mut set = BitSet::new(200);
        set.insert(150);
        set.insert(3);
        set.insert(64);

        let bits: Vec<_> = set.iter().collect();
        assert_eq!(bits, vec![3, 64, 150]);
    }

    #[test]
    fn test_empty_capacity() {
        let set = BitSet::new(0);
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }
}
