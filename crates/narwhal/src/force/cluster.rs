use super::{DyDistances, ForceContext, ForceField, MINIMAL_DISTANCE, add, zero_field};
use crate::options::Exponent;
use narwhal_dygraph::{Coordinates, NodeIx, coords};
use std::f64::consts::TAU;

/// Trajectory nodes of every cluster member, paired with the pole position at the same time.
fn members_with_pole(ctx: &ForceContext<'_>) -> Vec<(NodeIx, Coordinates)> {
    let mut out = Vec::new();
    for cluster in ctx.sync.original().clusters() {
        for &member in cluster.members() {
            for m in ctx.sync.bends(member) {
                let time = ctx.sync.mirror().node(m).time;
                if let Some(pole) = ctx.sync.position_at(cluster.pole(), time) {
                    out.push((m, pole));
                }
            }
        }
    }
    out
}

pub(super) fn pole_attraction(ctx: &ForceContext<'_>, factor: f64) -> ForceField {
    let geom = ctx.geometry.as_2d();
    let mut field = zero_field(ctx.sync);
    for (m, pole) in members_with_pole(ctx) {
        let pull = geom.unit_vector(&(pole - ctx.sync.position(m))) * factor;
        add(&mut field, m, pull);
    }
    field
}

/// Pushes members away from a `sides`-gon of the given radius around their pole, toward the
/// pole. Only sides closer than `distance` push.
pub(super) fn circumference_repulsion(
    ctx: &ForceContext<'_>,
    radius: f64,
    distance: f64,
    sides: usize,
    exponent: Exponent,
) -> ForceField {
    let geom = ctx.geometry.as_2d();
    let exp = exponent.at(ctx.temperature);
    let mut field = zero_field(ctx.sync);
    if sides < 3 {
        return field;
    }
    let corners: Vec<(f64, f64)> = (0..sides)
        .map(|i| {
            let angle = TAU * i as f64 / sides as f64;
            (radius * angle.cos(), radius * angle.sin())
        })
        .collect();

    for (m, pole) in members_with_pole(ctx) {
        let p = ctx.sync.position(m);
        let corner = |i: usize| {
            let (dx, dy) = corners[i % sides];
            coords(pole.x + dx, pole.y + dy, p.z)
        };
        let mut force = Coordinates::zeros();
        for i in 0..sides {
            let relation = geom.point_segment_relation(&p, &corner(i), &corner(i + 1));
            let d = relation.distance.max(MINIMAL_DISTANCE);
            if d < distance {
                force += geom.unit_vector(&(pole - relation.closest_point)) * (distance / d).powf(exp);
            }
        }
        add(&mut field, m, force);
    }
    field
}

/// Repels nodes that belong to no cluster from every pole trajectory node within `distance`.
pub(super) fn non_cluster_repulsion(
    ctx: &ForceContext<'_>,
    distance: f64,
    exponent: Exponent,
) -> ForceField {
    let geom = ctx.geometry.as_2d();
    let exp = exponent.at(ctx.temperature);
    let mut field = zero_field(ctx.sync);

    let original = ctx.sync.original();
    let mut clustered = vec![false; original.node_count()];
    for cluster in original.clusters() {
        clustered[cluster.pole().index()] = true;
        for &member in cluster.members() {
            clustered[member.index()] = true;
        }
    }

    for cluster in original.clusters() {
        for p in ctx.sync.bends(cluster.pole()) {
            let pole = ctx.sync.position(p);
            for other in ctx.locator.close_nodes(p, distance) {
                if clustered[ctx.sync.direct_node(other).index()] {
                    continue;
                }
                let direction = geom.unit_vector(&(pole - ctx.sync.position(other)));
                let distances = DyDistances::between(ctx, p, other, distance);
                let force = direction * distances.magnitude(exp);
                add(&mut field, p, force);
                add(&mut field, other, -force);
            }
        }
    }
    field
}
