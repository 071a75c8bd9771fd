use super::{DyDistances, ForceContext, ForceField, MINIMAL_DISTANCE, add, zero_field};
use crate::options::Exponent;
use narwhal_dygraph::NodeIx;

/// Segments fully inside the seed box expanded by this many desired distances are repelled.
const INNER_BOX_FACTOR: f64 = 4.0;
/// Segments touching the seed box expanded by this many desired distances repel them.
const OUTER_BOX_FACTOR: f64 = 9.0;

pub(super) fn node_node(
    ctx: &ForceContext<'_>,
    distance: f64,
    activity_factor: f64,
    exponent: Exponent,
) -> ForceField {
    let geom = ctx.geometry.as_2d();
    let exp = exponent.at(ctx.temperature);
    let mut field = zero_field(ctx.sync);
    for a in ctx.sync.mirror().node_indices() {
        let pa = ctx.sync.position(a);
        let owner = ctx.sync.direct_node(a);
        for b in ctx.locator.close_nodes(a, distance * activity_factor) {
            if ctx.sync.direct_node(b) == owner {
                continue;
            }
            let direction = geom.unit_vector(&(pa - ctx.sync.position(b)));
            let distances = DyDistances::between(ctx, a, b, distance);
            add(&mut field, a, direction * distances.magnitude(exp));
        }
    }
    field
}

/// Repels mirror nodes from nearby segments of other trajectories.
///
/// Segments are visited through seeds: every seed pulls in the segments close to it, and each
/// mirror node is repelled in the first seed neighbourhood that contains it.
pub(super) fn node_segment(ctx: &ForceContext<'_>, distance: f64, exponent: Exponent) -> ForceField {
    let mirror = ctx.sync.mirror();
    let exp = exponent.at(ctx.temperature);
    let mut field = zero_field(ctx.sync);
    let mut done = vec![false; mirror.node_count()];

    for seed in mirror.edge_indices() {
        let (s, t) = mirror.endpoints(seed);
        if done[s.index()] && done[t.index()] {
            continue;
        }
        let seed_box = ctx.locator.segment_box(seed);
        let mut inner = ctx
            .locator
            .edges_fully_in_box(&seed_box.expand(INNER_BOX_FACTOR * distance));
        if !inner.contains(&seed) {
            inner.push(seed);
        }
        let outer = ctx
            .locator
            .edges_partially_in_box(&seed_box.expand(OUTER_BOX_FACTOR * distance));

        for first in inner {
            let (a, b) = mirror.endpoints(first);
            if done[a.index()] && done[b.index()] {
                continue;
            }
            let owner = ctx.sync.original_node(first);
            for &second in &outer {
                if ctx.sync.original_node(second) == owner {
                    continue;
                }
                let (c, d) = mirror.endpoints(second);
                for n in [a, b] {
                    if !done[n.index()] {
                        repel_from_segment(ctx, &mut field, n, (c, d), distance, exp);
                    }
                }
            }
            done[a.index()] = true;
            done[b.index()] = true;
        }
    }
    field
}

fn repel_from_segment(
    ctx: &ForceContext<'_>,
    field: &mut ForceField,
    a: NodeIx,
    (c, d): (NodeIx, NodeIx),
    distance: f64,
    exp: f64,
) {
    let geom = ctx.geometry;
    let pa = ctx.sync.position(a);
    let pc = ctx.sync.position(c);
    let pd = ctx.sync.position(d);
    if geom.almost_equal_points(&pa, &pc) || geom.almost_equal_points(&pa, &pd) {
        return;
    }
    let relation = geom.point_segment_relation(&pa, &pc, &pd);
    let base = geom.unit_vector(&(relation.closest_point - pa))
        * (distance / relation.distance.max(MINIMAL_DISTANCE)).powf(exp);
    // The reaction goes to the segment ends in proportion to where the closest point lies.
    let balance = relation.parameter.clamp(0.0, 1.0);
    add(field, a, -base);
    add(field, c, base * (1.0 - balance));
    add(field, d, base * balance);
}
