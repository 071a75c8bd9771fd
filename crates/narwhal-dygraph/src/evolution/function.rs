use super::interpolation::{Interpolate, Interpolation};
use crate::interval::Interval;
use serde::{Deserialize, Serialize};

/// A value defined over one interval of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Function<V> {
    Const {
        interval: Interval,
        value: V,
    },
    Transition {
        interval: Interval,
        start: V,
        end: V,
        #[serde(default)]
        interpolation: Interpolation,
    },
}

impl<V> Function<V> {
    pub fn constant(interval: Interval, value: V) -> Self {
        Function::Const { interval, value }
    }

    pub fn transition(interval: Interval, start: V, end: V, interpolation: Interpolation) -> Self {
        Function::Transition {
            interval,
            start,
            end,
            interpolation,
        }
    }

    pub fn interval(&self) -> &Interval {
        match self {
            Function::Const { interval, .. } | Function::Transition { interval, .. } => interval,
        }
    }

    pub fn left_value(&self) -> &V {
        match self {
            Function::Const { value, .. } => value,
            Function::Transition { start, .. } => start,
        }
    }

    pub fn right_value(&self) -> &V {
        match self {
            Function::Const { value, .. } => value,
            Function::Transition { end, .. } => end,
        }
    }
}

impl<V: Interpolate> Function<V> {
    /// Value of the function at `t`. Times outside the interval are clamped to its bounds.
    pub fn value_at(&self, t: f64) -> V {
        match self {
            Function::Const { value, .. } => value.clone(),
            Function::Transition {
                interval,
                start,
                end,
                interpolation,
            } => {
                let width = interval.width();
                if width <= 0.0 {
                    return end.clone();
                }
                let s = (t - interval.left_bound()) / width;
                V::interpolate(start, end, interpolation.weight(s))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_transition_midpoint() {
        let f = Function::transition(Interval::closed(0.0, 10.0), 0.0, 20.0, Interpolation::Linear);
        assert_eq!(f.value_at(5.0), 10.0);
        assert_eq!(f.value_at(-1.0), 0.0);
    }

    #[test]
    fn zero_width_transition_takes_end_value() {
        let f = Function::transition(Interval::point(3.0), 1.0, 2.0, Interpolation::SmoothStep);
        assert_eq!(f.value_at(3.0), 2.0);
    }
}
