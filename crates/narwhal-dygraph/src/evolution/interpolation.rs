use crate::geometry::Coordinates;
use serde::{Deserialize, Serialize};

/// Easing applied to the normalized position inside a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    #[default]
    Linear,
    SmoothStep,
    /// Holds the start value until the transition ends.
    Step,
}

impl Interpolation {
    /// Maps `s` in `[0, 1]` to an interpolation weight in `[0, 1]`.
    pub fn weight(self, s: f64) -> f64 {
        let s = if s.is_nan() { 0.0 } else { s.clamp(0.0, 1.0) };
        match self {
            Interpolation::Linear => s,
            Interpolation::SmoothStep => s * s * (3.0 - 2.0 * s),
            Interpolation::Step => {
                if s < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }
}

/// Values that can be blended between two key values.
pub trait Interpolate: Clone {
    fn interpolate(start: &Self, end: &Self, weight: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(start: &Self, end: &Self, weight: f64) -> Self {
        start + (end - start) * weight
    }
}

impl Interpolate for f32 {
    fn interpolate(start: &Self, end: &Self, weight: f64) -> Self {
        start + (end - start) * weight as f32
    }
}

impl Interpolate for Coordinates {
    fn interpolate(start: &Self, end: &Self, weight: f64) -> Self {
        start.lerp(end, weight)
    }
}

macro_rules! step_interpolate {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Interpolate for $ty {
                fn interpolate(start: &Self, end: &Self, weight: f64) -> Self {
                    if weight < 1.0 { start.clone() } else { end.clone() }
                }
            }
        )*
    };
}

step_interpolate!(bool, String, i64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smooth_step_is_symmetric() {
        let i = Interpolation::SmoothStep;
        assert_eq!(i.weight(0.0), 0.0);
        assert_eq!(i.weight(1.0), 1.0);
        assert!((i.weight(0.5) - 0.5).abs() < 1e-12);
        assert!((i.weight(0.25) + i.weight(0.75) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn step_values_switch_at_the_end() {
        assert!(!bool::interpolate(&false, &true, 0.99));
        assert!(bool::interpolate(&false, &true, 1.0));
    }
}
