use super::{ForceContext, ForceField, add, zero_field};
use narwhal_dygraph::{Coordinates, NodeIx, restrict};
use std::f64::consts::FRAC_PI_2;

/// Smallest angle, in radians, between a trajectory pair and its projection.
const MIN_ANGLE: f64 = 0.01;

/// Smooths and straightens every trajectory.
///
/// Smoothing pulls each trajectory node toward a point between its neighbours; straightening
/// pushes every pair of trajectory nodes toward the same `x`/`y`, harder the flatter the pair.
pub(super) fn straightening(ctx: &ForceContext<'_>, distance: f64) -> ForceField {
    let mut field = zero_field(ctx.sync);
    for n in ctx.sync.direct_nodes() {
        let bends = ctx.sync.bends(n);
        if bends.len() < 2 {
            continue;
        }
        smooth(ctx, &mut field, &bends, distance);
        straighten(ctx, &mut field, &bends);
    }
    field
}

fn smooth(ctx: &ForceContext<'_>, field: &mut ForceField, bends: &[NodeIx], distance: f64) {
    let geom = ctx.geometry;
    let last = bends.len() - 1;
    for (i, &m) in bends.iter().enumerate() {
        let current = ctx.sync.position(m);
        let vector = if i == 0 || i == last {
            let other = if i == 0 { bends[1] } else { bends[i - 1] };
            let mut target = (ctx.sync.position(other) + current) / 2.0;
            target.z = current.z;
            target - current
        } else {
            let before = ctx.sync.position(bends[i - 1]);
            let after = ctx.sync.position(bends[i + 1]);
            let mid = if ctx.sync.connection_degree(m) == 0 {
                (before + after) / 2.0
            } else {
                let height = after.z - before.z;
                let factor = if height == 0.0 {
                    0.5
                } else {
                    (current.z - before.z) / height
                };
                before + (after - before) * factor
            };
            let centroid = mid + (current - mid) / 3.0;
            centroid - current
        };

        let magnitude = geom.magnitude(&vector);
        if magnitude > 0.0 {
            add(
                field,
                m,
                geom.unit_vector(&vector) * (magnitude / distance).powi(2),
            );
        }
    }
}

fn straighten(ctx: &ForceContext<'_>, field: &mut ForceField, bends: &[NodeIx]) {
    let geom = ctx.geometry;
    for (i, &source) in bends.iter().enumerate() {
        let from = ctx.sync.position(source);
        for &target in &bends[i + 1..] {
            let v3 = ctx.sync.position(target) - from;
            let v2 = restrict(&v3, 2);
            if geom.almost_zero(v3.z) || geom.almost_zero_vector(&v2) {
                continue;
            }
            let angle = geom.between_angle(&v3, &v2).max(MIN_ANGLE);
            let force = v2 * ((FRAC_PI_2 - angle) / angle);
            add(field, source, force);
            add(field, target, -force);
        }
    }
}

/// Pulls every trajectory node toward an inverse-time-distance weighted centre of its
/// `window` predecessors and successors. Neighbours at the same `z` are ignored.
pub(super) fn mental_map(ctx: &ForceContext<'_>, distance: f64, window: usize) -> ForceField {
    let geom = ctx.geometry.as_2d();
    let mut field = zero_field(ctx.sync);
    for n in ctx.sync.direct_nodes() {
        let bends = ctx.sync.bends(n);
        for (i, &m) in bends.iter().enumerate() {
            let current = ctx.sync.position(m);
            let lo = i.saturating_sub(window);
            let hi = (i + window).min(bends.len() - 1);

            let mut centre = Coordinates::zeros();
            let mut weight_sum = 0.0;
            for &near in bends[lo..i].iter().chain(&bends[i + 1..=hi]) {
                let p = ctx.sync.position(near);
                if p.z == current.z {
                    continue;
                }
                let weight = 1.0 / (p.z - current.z).abs();
                centre += p * weight;
                weight_sum += weight;
            }
            if weight_sum == 0.0 {
                continue;
            }
            let vector = restrict(&(centre / weight_sum - current), 2);
            let force =
                geom.unit_vector(&vector) * (weight_sum * geom.magnitude(&vector) / distance);
            add(&mut field, m, force);
        }
    }
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::force::ForceCache;
    use crate::locator::Locator;
    use crate::stc::Synchroniser;
    use narwhal_dygraph::{DyGraph, DyNode, Geometry, Interval, coords2};

    fn bent_trajectory() -> Synchroniser {
        let mut g = DyGraph::new();
        g.add_node("a", DyNode::present([Interval::closed(0.0, 10.0)]))
            .unwrap();
        g.add_node("b", DyNode::present([Interval::closed(0.0, 10.0)]))
            .unwrap();
        g.add_edge(
            "ab",
            "a",
            "b",
            narwhal_dygraph::DyEdge::present([Interval::closed(4.0, 6.0)]),
        )
        .unwrap();
        let mut sync = Synchroniser::build(g, 1.0).unwrap();
        let a = sync.original().node_ix("a").unwrap();
        let bends = sync.bends(a);
        // a zig-zag: 0 -> 4 -> 0 -> 0 in x
        sync.displace(bends[1], 4.0, 0.0);
        sync
    }

    fn context<'a>(
        sync: &'a Synchroniser,
        locator: &'a Locator,
        cache: &'a ForceCache,
    ) -> ForceContext<'a> {
        ForceContext {
            sync,
            locator,
            geometry: Geometry::e3d(),
            temperature: 0.5,
            cache,
        }
    }

    #[test]
    fn straightening_pulls_the_kink_back() {
        let sync = bent_trajectory();
        let locator = Locator::build(sync.mirror(), sync.positions(), 10.0);
        let cache = ForceCache::new();
        let field = straightening(&context(&sync, &locator, &cache), 1.0);

        let a = sync.original().node_ix("a").unwrap();
        let kink = sync.bends(a)[1];
        assert!(field.get(kink).x < 0.0);
        assert!(field.get(kink).iter().all(|v| v.is_finite()));
    }

    #[test]
    fn mental_map_pulls_toward_neighbours() {
        let sync = bent_trajectory();
        let locator = Locator::build(sync.mirror(), sync.positions(), 10.0);
        let cache = ForceCache::new();
        let field = mental_map(&context(&sync, &locator, &cache), 5.0, 5);

        let a = sync.original().node_ix("a").unwrap();
        let bends = sync.bends(a);
        assert!(field.get(bends[1]).x < 0.0);
        assert!(field.get(bends[0]).x > 0.0);
        assert_eq!(field.get(bends[1]).z, 0.0);

        let b = sync.original().node_ix("b").unwrap();
        for m in sync.bends(b) {
            assert_eq!(*field.get(m), coords2(0.0, 0.0));
        }
    }
}
