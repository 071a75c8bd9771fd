use super::{ForceContext, ForceField, add, zero_field};
use crate::options::Exponent;
use narwhal_dygraph::{Coordinates, EdgeIx, Interval, NodeIx};

struct Segment {
    source: NodeIx,
    target: NodeIx,
    from: Coordinates,
    to: Coordinates,
    span: Interval,
}

impl Segment {
    fn new(ctx: &ForceContext<'_>, e: EdgeIx) -> Self {
        let (source, target) = ctx.sync.mirror().endpoints(e);
        let from = ctx.sync.position(source);
        let to = ctx.sync.position(target);
        Self {
            source,
            target,
            from,
            to,
            span: Interval::closed(from.z.min(to.z), from.z.max(to.z)),
        }
    }

    fn value_at_z(&self, z: f64) -> Coordinates {
        let height = self.to.z - self.from.z;
        if height == 0.0 {
            return self.from;
        }
        self.from + (self.to - self.from) * ((z - self.from.z) / height)
    }

    /// Share of a force at `z` carried by the segment target.
    fn balance(&self, z: f64) -> f64 {
        let width = self.span.width();
        if width == 0.0 {
            0.5
        } else {
            (z - self.span.left_bound()) / width
        }
    }

    /// Fraction of the segment covered by `overlap`.
    fn ratio(&self, overlap: &Interval) -> f64 {
        let width = self.span.width();
        if width == 0.0 { 1.0 } else { overlap.width() / width }
    }
}

/// Pulls the two trajectories of every mirror connection together over the connection's
/// presence. Each pair of overlapping segments is joined at both ends of the overlap, and every
/// pull is split between the segment ends.
pub(super) fn attraction(ctx: &ForceContext<'_>, distance: f64, exponent: Exponent) -> ForceField {
    let geom = ctx.geometry.as_2d();
    let exp = exponent.at(ctx.temperature);
    let mut field = zero_field(ctx.sync);

    for connection in ctx.sync.mirror_connections() {
        let source_line = ctx.sync.line(connection.source_line);
        let target_line = ctx.sync.line(connection.target_line);
        let sources: Vec<Segment> =
            source_line.segments.iter().map(|&e| Segment::new(ctx, e)).collect();
        let targets: Vec<Segment> =
            target_line.segments.iter().map(|&e| Segment::new(ctx, e)).collect();

        for a in &sources {
            let Some(a_in) = a.span.intersection(&connection.mirror_interval) else {
                continue;
            };
            for b in &targets {
                let Some(b_in) = b.span.intersection(&connection.mirror_interval) else {
                    continue;
                };
                let Some(overlap) = a_in.intersection(&b_in) else {
                    continue;
                };
                let a_ratio = a.ratio(&overlap);
                let b_ratio = b.ratio(&overlap);
                for z in [overlap.left_bound(), overlap.right_bound()] {
                    let vector = b.value_at_z(z) - a.value_at_z(z);
                    let current = geom.magnitude(&vector);
                    if geom.almost_zero(current) {
                        continue;
                    }
                    let base = geom.unit_vector(&vector) * (current / distance).powf(exp);
                    let a_balance = a.balance(z);
                    let b_balance = b.balance(z);
                    add(&mut field, a.source, base * (a_ratio * (1.0 - a_balance)));
                    add(&mut field, a.target, base * (a_ratio * a_balance));
                    add(&mut field, b.source, base * (-b_ratio * (1.0 - b_balance)));
                    add(&mut field, b.target, base * (-b_ratio * b_balance));
                }
            }
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
    use narwhal_dygraph::{DyEdge, DyGraph, DyNode, Function, Geometry, coords2};

    fn connected(edge: Interval) -> Synchroniser {
        let mut g = DyGraph::new();
        for (id, x) in [("a", 0.0), ("b", 10.0)] {
            let mut node = DyNode::present([Interval::closed(0.0, 10.0)]);
            node.position
                .insert(Function::constant(Interval::closed(0.0, 10.0), coords2(x, 0.0)));
            g.add_node(id, node).unwrap();
        }
        g.add_edge("ab", "a", "b", DyEdge::present([edge])).unwrap();
        Synchroniser::build(g, 1.0).unwrap()
    }

    fn attract(sync: &Synchroniser) -> ForceField {
        let locator = Locator::build(sync.mirror(), sync.positions(), 10.0);
        let cache = ForceCache::new();
        let ctx = ForceContext {
            sync,
            locator: &locator,
            geometry: Geometry::e3d(),
            temperature: 0.0,
            cache: &cache,
        };
        attraction(&ctx, 5.0, Exponent::new(1.0, 1.0))
    }

    fn x(sync: &Synchroniser, field: &ForceField, id: &str) -> f64 {
        field.get(sync.mirror().node_ix(id).unwrap()).x
    }

    #[test]
    fn connected_lines_pull_together_at_both_ends() {
        let sync = connected(Interval::closed(0.0, 10.0));
        let field = attract(&sync);

        // 10 apart, desired 5: (10 / 5)^1 at each end of the overlap
        assert!((x(&sync, &field, "a") - 2.0).abs() < 1e-12);
        assert!((x(&sync, &field, "a^10") - 2.0).abs() < 1e-12);
        assert!((x(&sync, &field, "b") + 2.0).abs() < 1e-12);
        assert!((x(&sync, &field, "b^10") + 2.0).abs() < 1e-12);
    }

    #[test]
    fn pull_lands_on_the_segments_covering_the_connection() {
        let sync = connected(Interval::closed(2.0, 4.0));
        let field = attract(&sync);

        assert_eq!(x(&sync, &field, "a"), 0.0);
        assert_eq!(x(&sync, &field, "a^10"), 0.0);
        assert!((x(&sync, &field, "a^2") - 2.0).abs() < 1e-12);
        assert!((x(&sync, &field, "a^4") - 2.0).abs() < 1e-12);
        assert!((x(&sync, &field, "b^2") + 2.0).abs() < 1e-12);
        assert!((x(&sync, &field, "b^4") + 2.0).abs() < 1e-12);

        let total = field.iter().fold(Coordinates::zeros(), |acc, (_, f)| acc + f);
        assert!(total.norm() < 1e-12);
    }

    #[test]
    fn segment_shares_follow_the_height() {
        let sync = connected(Interval::closed(0.0, 10.0));
        let a = sync.mirror().node_ix("a").unwrap();
        let segment = sync.line(sync.mirror().node(a).line).segments[0];
        let locator = Locator::build(sync.mirror(), sync.positions(), 10.0);
        let cache = ForceCache::new();
        let ctx = ForceContext {
            sync: &sync,
            locator: &locator,
            geometry: Geometry::e3d(),
            temperature: 0.0,
            cache: &cache,
        };
        let s = Segment::new(&ctx, segment);
        assert_eq!(s.balance(0.0), 0.0);
        assert_eq!(s.balance(2.5), 0.25);
        assert_eq!(s.ratio(&Interval::closed(2.0, 7.0)), 0.5);
        assert_eq!(s.value_at_z(5.0).z, 5.0);
    }
}
