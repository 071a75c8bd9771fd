//! Vector math used by the space-time cube layout.
//!
//! Positions are `nalgebra` 3-vectors where `x`/`y` are the drawing plane and `z` is time. The
//! [`Geometry`] kernel wraps the epsilon-based comparisons; a 2D kernel ignores `z` entirely.

use serde::{Deserialize, Serialize};

pub type Coordinates = nalgebra::Vector3<f64>;

pub fn coords(x: f64, y: f64, z: f64) -> Coordinates {
    Coordinates::new(x, y, z)
}

pub fn coords2(x: f64, y: f64) -> Coordinates {
    Coordinates::new(x, y, 0.0)
}

/// Keeps the first `n` coordinates of `v` and zeroes the others.
pub fn restrict(v: &Coordinates, n: usize) -> Coordinates {
    let mut out = Coordinates::zeros();
    for i in 0..n.min(3) {
        out[i] = v[i];
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimensions {
    Two,
    Three,
}

impl Dimensions {
    fn count(self) -> usize {
        match self {
            Dimensions::Two => 2,
            Dimensions::Three => 3,
        }
    }
}

/// Relation between a point and a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRelation {
    /// Point of the segment closest to the query point.
    pub closest_point: Coordinates,
    /// Projection of the query point on the supporting line, `None` for a degenerate segment.
    pub projection: Option<Coordinates>,
    /// Line parameter of the projection (`0` at the segment start, `1` at its end).
    pub parameter: f64,
    pub is_projection_included: bool,
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub epsilon: f64,
    pub dimensions: Dimensions,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::e3d()
    }
}

impl Geometry {
    pub const DEFAULT_EPSILON: f64 = 1e-6;

    pub fn e2d() -> Self {
        Self {
            epsilon: Self::DEFAULT_EPSILON,
            dimensions: Dimensions::Two,
        }
    }

    pub fn e3d() -> Self {
        Self {
            epsilon: Self::DEFAULT_EPSILON,
            dimensions: Dimensions::Three,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon.abs();
        self
    }

    pub fn as_2d(self) -> Self {
        Self {
            dimensions: Dimensions::Two,
            ..self
        }
    }

    fn r(&self, v: &Coordinates) -> Coordinates {
        restrict(v, self.dimensions.count())
    }

    pub fn almost_zero(&self, value: f64) -> bool {
        value.abs() <= self.epsilon
    }

    pub fn almost_equal(&self, a: f64, b: f64) -> bool {
        self.almost_zero(a - b)
    }

    pub fn almost_zero_vector(&self, v: &Coordinates) -> bool {
        self.almost_zero(self.magnitude(v))
    }

    pub fn almost_equal_points(&self, a: &Coordinates, b: &Coordinates) -> bool {
        self.almost_zero_vector(&(a - b))
    }

    pub fn magnitude(&self, v: &Coordinates) -> f64 {
        self.r(v).norm()
    }

    pub fn distance(&self, a: &Coordinates, b: &Coordinates) -> f64 {
        self.magnitude(&(b - a))
    }

    /// Returns the unit vector of `v`, or the zero vector when `v` is almost zero.
    pub fn unit_vector(&self, v: &Coordinates) -> Coordinates {
        let v = self.r(v);
        let m = v.norm();
        if self.almost_zero(m) {
            return Coordinates::zeros();
        }
        v / m
    }

    /// Angle between two vectors in `[0, π]`; zero when either vector is almost zero.
    pub fn between_angle(&self, a: &Coordinates, b: &Coordinates) -> f64 {
        let a = self.r(a);
        let b = self.r(b);
        let ma = a.norm();
        let mb = b.norm();
        if self.almost_zero(ma) || self.almost_zero(mb) {
            return 0.0;
        }
        (a.dot(&b) / (ma * mb)).clamp(-1.0, 1.0).acos()
    }

    pub fn point_segment_relation(
        &self,
        point: &Coordinates,
        start: &Coordinates,
        end: &Coordinates,
    ) -> PointRelation {
        let p = self.r(point);
        let a = self.r(start);
        let b = self.r(end);
        let ab = b - a;
        let len_sq = ab.norm_squared();
        if self.almost_zero(len_sq.sqrt()) {
            return PointRelation {
                closest_point: a,
                projection: None,
                parameter: 0.0,
                is_projection_included: false,
                distance: (p - a).norm(),
            };
        }

        let parameter = (p - a).dot(&ab) / len_sq;
        let projection = a + ab * parameter;
        let is_projection_included = parameter >= -self.epsilon && parameter <= 1.0 + self.epsilon;
        let closest_point = a + ab * parameter.clamp(0.0, 1.0);
        PointRelation {
            closest_point,
            projection: Some(projection),
            parameter,
            is_projection_included,
            distance: (p - closest_point).norm(),
        }
    }

    /// Checks whether three points lie on one line in the XY plane.
    pub fn are_collinear(&self, a: &Coordinates, b: &Coordinates, c: &Coordinates) -> bool {
        let cross = (b.y - a.y) * (c.x - b.x) - (c.y - b.y) * (b.x - a.x);
        self.almost_zero(cross)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Coordinates,
    pub max: Coordinates,
}

impl Aabb {
    pub fn from_point(p: &Coordinates) -> Self {
        Self { min: *p, max: *p }
    }

    pub fn from_points(a: &Coordinates, b: &Coordinates) -> Self {
        Self {
            min: a.inf(b),
            max: a.sup(b),
        }
    }

    pub fn include(&mut self, p: &Coordinates) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    pub fn expand(&self, amount: f64) -> Self {
        let d = Coordinates::repeat(amount);
        Self {
            min: self.min - d,
            max: self.max + d,
        }
    }

    pub fn center(&self) -> Coordinates {
        (self.min + self.max) / 2.0
    }

    pub fn contains_point(&self, p: &Coordinates) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    pub fn contains_box(&self, other: &Aabb) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        (0..3).all(|i| self.min[i] <= other.max[i] && self.max[i] >= other.min[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn unit_vector_of_almost_zero_is_zero() {
        let g = Geometry::e3d();
        assert_eq!(g.unit_vector(&coords(1e-9, 0.0, 0.0)), Coordinates::zeros());
        let u = g.unit_vector(&coords(3.0, 4.0, 0.0));
        assert!((u.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn two_dimensional_kernel_ignores_time_axis() {
        let g = Geometry::e2d();
        assert_eq!(g.magnitude(&coords(3.0, 4.0, 100.0)), 5.0);
        assert!(g.almost_zero_vector(&coords(0.0, 0.0, 7.0)));
    }

    #[test]
    fn between_angle_is_in_range() {
        let g = Geometry::e3d();
        let a = coords(1.0, 0.0, 0.0);
        assert!((g.between_angle(&a, &coords(-1.0, 0.0, 0.0)) - PI).abs() < 1e-12);
        assert!((g.between_angle(&a, &coords(0.0, 2.0, 0.0)) - PI / 2.0).abs() < 1e-12);
        assert_eq!(g.between_angle(&a, &a), 0.0);
    }

    #[test]
    fn point_segment_relation_inside_and_outside() {
        let g = Geometry::e3d();
        let start = coords(0.0, 0.0, 0.0);
        let end = coords(10.0, 0.0, 0.0);

        let inside = g.point_segment_relation(&coords(4.0, 3.0, 0.0), &start, &end);
        assert!(inside.is_projection_included);
        assert!((inside.parameter - 0.4).abs() < 1e-12);
        assert!((inside.distance - 3.0).abs() < 1e-12);

        let outside = g.point_segment_relation(&coords(14.0, 3.0, 0.0), &start, &end);
        assert!(!outside.is_projection_included);
        assert_eq!(outside.closest_point, end);
        assert!((outside.distance - 5.0).abs() < 1e-12);
    }

    #[test]
    fn collinearity_uses_both_coordinates() {
        let g = Geometry::e2d();
        assert!(g.are_collinear(
            &coords2(0.0, 0.0),
            &coords2(1.0, 1.0),
            &coords2(2.0, 2.0)
        ));
        assert!(!g.are_collinear(
            &coords2(0.0, 0.0),
            &coords2(1.0, 1.0),
            &coords2(2.0, 3.0)
        ));
    }

    #[test]
    fn aabb_queries() {
        let b = Aabb::from_points(&coords(0.0, 0.0, 0.0), &coords(2.0, 2.0, 2.0));
        let inner = Aabb::from_point(&coords(1.0, 1.0, 1.0));
        let far = Aabb::from_point(&coords(5.0, 5.0, 5.0));
        assert!(b.contains_box(&inner));
        assert!(!b.intersects(&far));
        assert!(b.expand(3.0).intersects(&far));
    }
}
