//! Static-shape interval tree.
//!
//! Entries are kept sorted by left bound and viewed as an implicit balanced binary tree: the root
//! of the range `lo..hi` is `(lo + hi) / 2`. Each tree node stores the largest right bound in its
//! subtree so stabbing and overlap queries can skip whole subtrees.

use crate::interval::Interval;

#[derive(Debug, Clone)]
pub struct IntervalTree<T> {
    entries: Vec<(Interval, T)>,
    max_right: Vec<f64>,
}

impl<T> Default for IntervalTree<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            max_right: Vec::new(),
        }
    }
}

impl<T> IntervalTree<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts an entry. Entries with equal left bounds keep insertion order.
    pub fn insert(&mut self, interval: Interval, value: T) {
        let at = self
            .entries
            .partition_point(|(i, _)| i.left_bound() <= interval.left_bound());
        self.entries.insert(at, (interval, value));
        self.rebuild_max();
    }

    fn rebuild_max(&mut self) {
        self.max_right.clear();
        self.max_right.resize(self.entries.len(), f64::NEG_INFINITY);
        let n = self.entries.len();
        Self::fill_max(&self.entries, &mut self.max_right, 0, n);
    }

    fn fill_max(entries: &[(Interval, T)], max_right: &mut [f64], lo: usize, hi: usize) -> f64 {
        if lo >= hi {
            return f64::NEG_INFINITY;
        }
        let mid = (lo + hi) / 2;
        let left = Self::fill_max(entries, max_right, lo, mid);
        let right = Self::fill_max(entries, max_right, mid + 1, hi);
        let m = entries[mid].0.right_bound().max(left).max(right);
        max_right[mid] = m;
        m
    }

    /// All entries whose interval contains `t`, in left-bound order.
    pub fn stab(&self, t: f64) -> Vec<(&Interval, &T)> {
        let mut out = Vec::new();
        self.stab_range(t, 0, self.entries.len(), &mut out);
        out
    }

    fn stab_range<'a>(&'a self, t: f64, lo: usize, hi: usize, out: &mut Vec<(&'a Interval, &'a T)>) {
        if lo >= hi {
            return;
        }
        let mid = (lo + hi) / 2;
        if self.max_right[mid] < t {
            return;
        }
        self.stab_range(t, lo, mid, out);
        let (interval, value) = &self.entries[mid];
        if interval.left_bound() > t {
            return;
        }
        if interval.contains(t) {
            out.push((interval, value));
        }
        self.stab_range(t, mid + 1, hi, out);
    }

    /// All entries whose interval intersects `query`, in left-bound order.
    pub fn overlapping(&self, query: &Interval) -> Vec<(&Interval, &T)> {
        let mut out = Vec::new();
        self.overlap_range(query, 0, self.entries.len(), &mut out);
        out
    }

    fn overlap_range<'a>(
        &'a self,
        query: &Interval,
        lo: usize,
        hi: usize,
        out: &mut Vec<(&'a Interval, &'a T)>,
    ) {
        if lo >= hi {
            return;
        }
        let mid = (lo + hi) / 2;
        if self.max_right[mid] < query.left_bound() {
            return;
        }
        self.overlap_range(query, lo, mid, out);
        let (interval, value) = &self.entries[mid];
        if interval.left_bound() > query.right_bound() {
            return;
        }
        if interval.overlaps(query) {
            out.push((interval, value));
        }
        self.overlap_range(query, mid + 1, hi, out);
    }

    /// First entry (by left bound) containing `t`.
    pub fn first_at(&self, t: f64) -> Option<(&Interval, &T)> {
        self.stab(t).into_iter().next()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&Interval, &T)> + ExactSizeIterator {
        self.entries.iter().map(|(i, v)| (i, v))
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Smallest interval covering every entry.
    pub fn extent(&self) -> Option<Interval> {
        let mut it = self.entries.iter().map(|(i, _)| *i);
        let first = it.next()?;
        Some(it.fold(first, |acc, i| acc.span(&i)))
    }
}

impl<T> FromIterator<(Interval, T)> for IntervalTree<T> {
    fn from_iter<I: IntoIterator<Item = (Interval, T)>>(iter: I) -> Self {
        let mut entries: Vec<(Interval, T)> = iter.into_iter().collect();
        entries.sort_by(|a, b| a.0.left_bound().total_cmp(&b.0.left_bound()));
        let mut tree = Self {
            entries,
            max_right: Vec::new(),
        };
        tree.rebuild_max();
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::IntervalTree;
    use crate::interval::Interval;

    #[test]
    fn empty_tree_answers_nothing() {
        let tree: IntervalTree<u32> = IntervalTree::new();
        assert!(tree.stab(1.0).is_empty());
        assert!(tree.extent().is_none());
    }

    #[test]
    fn insertion_keeps_left_bound_order() {
        let mut tree = IntervalTree::new();
        tree.insert(Interval::closed(5.0, 6.0), 'c');
        tree.insert(Interval::closed(0.0, 1.0), 'a');
        tree.insert(Interval::closed(2.0, 3.0), 'b');
        let order: String = tree.values().collect();
        assert_eq!(order, "abc");
        assert_eq!(tree.extent(), Some(Interval::closed(0.0, 6.0)));
    }
}
