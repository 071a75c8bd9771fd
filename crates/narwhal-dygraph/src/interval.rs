//! Time intervals with independently closed or open bounds.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IntervalRepr", into = "IntervalRepr")]
pub struct Interval {
    left: f64,
    right: f64,
    left_closed: bool,
    right_closed: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct IntervalRepr {
    left: f64,
    right: f64,
    #[serde(default = "default_closed")]
    left_closed: bool,
    #[serde(default = "default_closed")]
    right_closed: bool,
}

fn default_closed() -> bool {
    true
}

impl TryFrom<IntervalRepr> for Interval {
    type Error = Error;

    fn try_from(r: IntervalRepr) -> Result<Self> {
        Interval::new(r.left, r.right, r.left_closed, r.right_closed)
    }
}

impl From<Interval> for IntervalRepr {
    fn from(i: Interval) -> Self {
        Self {
            left: i.left,
            right: i.right,
            left_closed: i.left_closed,
            right_closed: i.right_closed,
        }
    }
}

impl Interval {
    pub fn new(left: f64, right: f64, left_closed: bool, right_closed: bool) -> Result<Self> {
        if !(left.is_finite() && right.is_finite()) || left > right {
            return Err(Error::MalformedInterval { left, right });
        }
        Ok(Self {
            left,
            right,
            left_closed,
            right_closed,
        })
    }

    /// # Panics
    ///
    /// Panics when a bound is not finite or `left > right`.
    pub(crate) fn with_bounds(left: f64, right: f64, left_closed: bool, right_closed: bool) -> Self {
        assert!(
            left.is_finite() && right.is_finite() && left <= right,
            "malformed interval: left bound {left} is after right bound {right}"
        );
        Self {
            left,
            right,
            left_closed,
            right_closed,
        }
    }

    /// `[left, right]`
    ///
    /// The shorthand constructors panic on non-finite or reversed bounds; use
    /// [`Interval::new`] for untrusted input.
    pub fn closed(left: f64, right: f64) -> Self {
        Self::with_bounds(left, right, true, true)
    }

    /// `(left, right)`
    pub fn open(left: f64, right: f64) -> Self {
        Self::with_bounds(left, right, false, false)
    }

    /// `[left, right)`
    pub fn left_closed(left: f64, right: f64) -> Self {
        Self::with_bounds(left, right, true, false)
    }

    /// `(left, right]`
    pub fn right_closed(left: f64, right: f64) -> Self {
        Self::with_bounds(left, right, false, true)
    }

    pub fn point(t: f64) -> Self {
        Self::closed(t, t)
    }

    pub fn left_bound(&self) -> f64 {
        self.left
    }

    pub fn right_bound(&self) -> f64 {
        self.right
    }

    pub fn is_left_closed(&self) -> bool {
        self.left_closed
    }

    pub fn is_right_closed(&self) -> bool {
        self.right_closed
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// An interval is empty when it is a single point with at least one open bound.
    pub fn is_empty(&self) -> bool {
        self.left == self.right && !(self.left_closed && self.right_closed)
    }

    pub fn contains(&self, t: f64) -> bool {
        let after_left = if self.left_closed {
            t >= self.left
        } else {
            t > self.left
        };
        let before_right = if self.right_closed {
            t <= self.right
        } else {
            t < self.right
        };
        after_left && before_right
    }

    pub fn contains_interval(&self, other: &Interval) -> bool {
        if other.is_empty() {
            return true;
        }
        let left_ok = self.left < other.left
            || (self.left == other.left && (self.left_closed || !other.left_closed));
        let right_ok = self.right > other.right
            || (self.right == other.right && (self.right_closed || !other.right_closed));
        left_ok && right_ok
    }

    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        let (left, left_closed) = if self.left > other.left {
            (self.left, self.left_closed)
        } else if other.left > self.left {
            (other.left, other.left_closed)
        } else {
            (self.left, self.left_closed && other.left_closed)
        };
        let (right, right_closed) = if self.right < other.right {
            (self.right, self.right_closed)
        } else if other.right < self.right {
            (other.right, other.right_closed)
        } else {
            (self.right, self.right_closed && other.right_closed)
        };
        if left > right {
            return None;
        }
        let out = Interval::with_bounds(left, right, left_closed, right_closed);
        if out.is_empty() { None } else { Some(out) }
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.intersection(other).is_some()
    }

    /// Smallest interval covering both `self` and `other`.
    pub fn span(&self, other: &Interval) -> Interval {
        let (left, left_closed) = if self.left < other.left {
            (self.left, self.left_closed)
        } else if other.left < self.left {
            (other.left, other.left_closed)
        } else {
            (self.left, self.left_closed || other.left_closed)
        };
        let (right, right_closed) = if self.right > other.right {
            (self.right, self.right_closed)
        } else if other.right > self.right {
            (other.right, other.right_closed)
        } else {
            (self.right, self.right_closed || other.right_closed)
        };
        Interval::with_bounds(left, right, left_closed, right_closed)
    }

    /// Maps both bounds through a non-decreasing affine transformation. Panics if a scaled
    /// bound overflows to infinity.
    pub fn scaled(&self, factor: f64) -> Interval {
        debug_assert!(factor >= 0.0);
        Interval::with_bounds(
            self.left * factor,
            self.right * factor,
            self.left_closed,
            self.right_closed,
        )
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}, {}{}",
            if self.left_closed { '[' } else { '(' },
            self.left,
            self.right,
            if self.right_closed { ']' } else { ')' }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Interval;

    #[test]
    fn bounds_decide_membership() {
        let closed = Interval::closed(2.0, 5.0);
        let half_open = Interval::left_closed(2.0, 5.0);
        assert!(closed.contains(5.0));
        assert!(!half_open.contains(5.0));
        assert!(half_open.contains(2.0));
        assert!(!Interval::open(2.0, 5.0).contains(2.0));
        assert!(Interval::right_closed(2.0, 5.0).contains(5.0));
    }

    #[test]
    fn rejects_reversed_bounds() {
        assert!(Interval::new(3.0, 1.0, true, true).is_err());
        assert!(Interval::new(f64::NAN, 1.0, true, true).is_err());
        assert!(Interval::new(1.0, 1.0, true, true).is_ok());
    }

    #[test]
    #[should_panic(expected = "malformed interval")]
    fn shorthand_constructors_panic_on_reversed_bounds() {
        let _ = Interval::closed(3.0, 1.0);
    }

    #[test]
    #[should_panic(expected = "malformed interval")]
    fn shorthand_constructors_panic_on_nan() {
        let _ = Interval::left_closed(f64::NAN, 1.0);
    }

    #[test]
    fn intersection_keeps_the_tighter_bounds() {
        let a = Interval::closed(0.0, 5.0);
        let b = Interval::left_closed(3.0, 8.0);
        assert_eq!(a.intersection(&b), Some(Interval::closed(3.0, 5.0)));

        let touching = Interval::left_closed(0.0, 3.0);
        assert_eq!(touching.intersection(&b), None);
        assert_eq!(
            Interval::closed(0.0, 3.0).intersection(&b),
            Some(Interval::point(3.0))
        );
    }

    #[test]
    fn containment_respects_open_bounds() {
        let outer = Interval::left_closed(0.0, 10.0);
        assert!(outer.contains_interval(&Interval::closed(0.0, 9.0)));
        assert!(!outer.contains_interval(&Interval::closed(2.0, 10.0)));
        assert!(outer.contains_interval(&Interval::left_closed(2.0, 10.0)));
    }

    #[test]
    fn deserializes_with_closed_defaults() {
        let i: Interval = serde_json::from_str(r#"{"left": 1.0, "right": 4.0}"#).unwrap();
        assert_eq!(i, Interval::closed(1.0, 4.0));
        let bad: Result<Interval, _> = serde_json::from_str(r#"{"left": 4.0, "right": 1.0}"#);
        assert!(bad.is_err());
    }
}
