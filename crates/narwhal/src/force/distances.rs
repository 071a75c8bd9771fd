use super::ForceContext;
use crate::stc::Synchroniser;
use narwhal_dygraph::{Geometry, NodeIx};

/// Smallest current distance a force ever divides by.
pub const MINIMAL_DISTANCE: f64 = 0.01;

/// Current and desired separation of two mirror nodes at a temperature.
///
/// Glyphs grow linearly from zero size at temperature 1 to full size at temperature 0, so early
/// iterations treat nodes as points and late iterations account for their drawn extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DyDistances {
    /// Distance between the glyph borders at the current glyph size, never below
    /// [`MINIMAL_DISTANCE`].
    pub current: f64,
    /// Target distance between the glyph centres.
    pub desired: f64,
}

impl DyDistances {
    pub fn new(current: f64, desired: f64) -> Self {
        Self {
            current: current.max(MINIMAL_DISTANCE),
            desired,
        }
    }

    /// Distances between mirror nodes `a` and `b` in the drawing plane, for a desired border
    /// distance of `base`.
    pub fn between(ctx: &ForceContext<'_>, a: NodeIx, b: NodeIx, base: f64) -> Self {
        let pa = ctx.sync.position(a);
        let pb = ctx.sync.position(b);
        let at_zero_size = Geometry::e2d().distance(&pa, &pb);
        let radius = glyph_radius(ctx.sync, a) + glyph_radius(ctx.sync, b);
        let t = ctx.temperature;
        Self::new(at_zero_size - radius * (1.0 - t), base + radius * t)
    }

    /// `(desired / current) ^ exponent`
    pub fn magnitude(&self, exponent: f64) -> f64 {
        (self.desired / self.current).powf(exponent)
    }
}

/// Full-size glyph radius of mirror node `m`; squares use their inscribed circle.
pub(crate) fn glyph_radius(sync: &Synchroniser, m: NodeIx) -> f64 {
    let mirror = sync.mirror().node(m);
    let node = sync.original().node(mirror.origin.node());
    let size = node.size.value_at(mirror.time);
    if size.is_finite() { size.max(0.0) / 2.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_distance_is_floored() {
        let d = DyDistances::new(-3.0, 5.0);
        assert_eq!(d.current, MINIMAL_DISTANCE);
        assert!(d.magnitude(2.0).is_finite());

        let d = DyDistances::new(0.0, 5.0);
        assert!(d.current >= MINIMAL_DISTANCE);
    }

    #[test]
    fn magnitude_is_one_at_the_desired_distance() {
        let d = DyDistances::new(5.0, 5.0);
        assert_eq!(d.magnitude(3.0), 1.0);
        assert_eq!(DyDistances::new(10.0, 5.0).magnitude(1.0), 0.5);
    }
}
