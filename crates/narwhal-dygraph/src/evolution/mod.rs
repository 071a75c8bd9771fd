//! Default-valued timelines of attribute values.
//!
//! An [`Evolution`] stores functions sorted by left bound. Inserted functions may overlap; where
//! they do, the most recently inserted function wins. [`Evolution::merge`] and
//! [`merge_functions`] turn boolean presence timelines into disjoint intervals.

mod analysis;
mod function;
mod interpolation;

pub use analysis::{apply_fading, merge_functions, merged_intervals};
pub use function::Function;
pub use interpolation::{Interpolate, Interpolation};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
struct Entry<V> {
    function: Function<V>,
    seq: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EvolutionRepr<V>", into = "EvolutionRepr<V>")]
#[serde(bound(
    serialize = "V: Clone + Serialize",
    deserialize = "V: Deserialize<'de>"
))]
pub struct Evolution<V> {
    default: V,
    entries: Vec<Entry<V>>,
    next_seq: u64,
    disjoint: bool,
}

#[derive(Serialize, Deserialize)]
struct EvolutionRepr<V> {
    default: V,
    #[serde(default = "Vec::new")]
    functions: Vec<Function<V>>,
}

impl<V> From<EvolutionRepr<V>> for Evolution<V> {
    fn from(repr: EvolutionRepr<V>) -> Self {
        let mut evo = Evolution::new(repr.default);
        for f in repr.functions {
            evo.insert(f);
        }
        evo
    }
}

impl<V: Clone> From<Evolution<V>> for EvolutionRepr<V> {
    fn from(evo: Evolution<V>) -> Self {
        Self {
            default: evo.default,
            functions: evo.entries.into_iter().map(|e| e.function).collect(),
        }
    }
}

impl<V: Default> Default for Evolution<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V> Evolution<V> {
    pub fn new(default: V) -> Self {
        Self {
            default,
            entries: Vec::new(),
            next_seq: 0,
            disjoint: true,
        }
    }

    pub fn default_value(&self) -> &V {
        &self.default
    }

    pub fn set_default(&mut self, default: V) {
        self.default = default;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.disjoint = true;
    }

    /// `true` when no two stored functions overlap.
    pub fn is_disjoint(&self) -> bool {
        self.disjoint
    }

    pub fn insert(&mut self, function: Function<V>) {
        // Ties on the left bound are ordered by right bound so disjoint entries keep
        // non-decreasing right bounds.
        let left = function.interval().left_bound();
        let right = function.interval().right_bound();
        let at = self.entries.partition_point(|e| {
            let i = e.function.interval();
            i.left_bound() < left || (i.left_bound() == left && i.right_bound() <= right)
        });

        if self.disjoint {
            let interval = function.interval();
            let hits_prev = at > 0 && self.entries[at - 1].function.interval().overlaps(interval);
            let hits_next = self
                .entries
                .get(at)
                .is_some_and(|e| e.function.interval().overlaps(interval));
            self.disjoint = !(hits_prev || hits_next);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(at, Entry { function, seq });
    }

    pub fn insert_all(&mut self, functions: impl IntoIterator<Item = Function<V>>) {
        for f in functions {
            self.insert(f);
        }
    }

    /// Functions in ascending left-bound order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Function<V>> + ExactSizeIterator {
        self.entries.iter().map(|e| &e.function)
    }

    pub fn first(&self) -> Option<&Function<V>> {
        self.entries.first().map(|e| &e.function)
    }

    pub fn last(&self) -> Option<&Function<V>> {
        self.entries.last().map(|e| &e.function)
    }

    /// The function deciding the value at `t`, if any covers it.
    pub fn function_at(&self, t: f64) -> Option<&Function<V>> {
        let end = self
            .entries
            .partition_point(|e| e.function.interval().left_bound() <= t);
        let candidates = &self.entries[..end];

        if self.disjoint {
            for e in candidates.iter().rev() {
                let interval = e.function.interval();
                if interval.contains(t) {
                    return Some(&e.function);
                }
                if interval.right_bound() < t {
                    break;
                }
            }
            return None;
        }

        candidates
            .iter()
            .filter(|e| e.function.interval().contains(t))
            .max_by_key(|e| e.seq)
            .map(|e| &e.function)
    }

    /// Every bound of every stored function, sorted and deduplicated.
    pub fn change_times(&self) -> Vec<f64> {
        let mut out: Vec<f64> = self
            .entries
            .iter()
            .flat_map(|e| {
                let i = e.function.interval();
                [i.left_bound(), i.right_bound()]
            })
            .collect();
        out.sort_by(f64::total_cmp);
        out.dedup();
        out
    }
}

impl<V: Interpolate> Evolution<V> {
    pub fn value_at(&self, t: f64) -> V {
        match self.function_at(t) {
            Some(f) => f.value_at(t),
            None => self.default.clone(),
        }
    }
}

impl Evolution<bool> {
    /// Replaces the stored functions with their disjoint merged presence intervals.
    pub fn merge(&mut self) {
        let merged = merge_functions(self);
        *self = merged;
    }

    /// `true` if the presence is true anywhere inside `interval`.
    pub fn present_during(&self, interval: &crate::interval::Interval) -> bool {
        merged_intervals(self).iter().any(|i| i.overlaps(interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;

    #[test]
    fn later_insert_wins_on_overlap() {
        let mut e = Evolution::new(0.0);
        e.insert(Function::constant(Interval::closed(0.0, 10.0), 1.0));
        e.insert(Function::constant(Interval::closed(4.0, 6.0), 2.0));
        assert!(!e.is_disjoint());
        assert_eq!(e.value_at(5.0), 2.0);
        assert_eq!(e.value_at(8.0), 1.0);

        e.insert(Function::constant(Interval::closed(0.0, 10.0), 3.0));
        assert_eq!(e.value_at(5.0), 3.0);
    }

    #[test]
    fn disjoint_lookup_handles_zero_width_functions() {
        let mut e = Evolution::new(-1.0);
        e.insert(Function::constant(Interval::point(2.0), 7.0));
        e.insert(Function::constant(Interval::open(2.0, 5.0), 8.0));
        assert!(e.is_disjoint());
        assert_eq!(e.value_at(2.0), 7.0);
        assert_eq!(e.value_at(3.0), 8.0);
        assert_eq!(e.value_at(5.0), -1.0);
    }

    #[test]
    fn change_times_are_sorted_and_unique() {
        let mut e = Evolution::new(false);
        e.insert(Function::constant(Interval::closed(3.0, 5.0), true));
        e.insert(Function::constant(Interval::closed(0.0, 3.0), true));
        assert_eq!(e.change_times(), vec![0.0, 3.0, 5.0]);
    }

    #[test]
    fn serde_keeps_functions() {
        let json = r#"{"default": 0.0, "functions": [
            {"kind": "const", "interval": {"left": 0.0, "right": 1.0}, "value": 4.0}
        ]}"#;
        let e: Evolution<f64> = serde_json::from_str(json).unwrap();
        assert_eq!(e.value_at(0.5), 4.0);
        let back = serde_json::to_value(&e).unwrap();
        assert_eq!(back["functions"][0]["value"], 4.0);
    }
}
