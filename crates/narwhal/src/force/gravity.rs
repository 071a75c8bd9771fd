use super::{ForceContext, ForceField, add, zero_field};
use crate::stc::Synchroniser;
use narwhal_dygraph::{Coordinates, restrict};

pub(super) fn centroid(sync: &Synchroniser) -> Coordinates {
    let count = sync.mirror().node_count();
    if count == 0 {
        return Coordinates::zeros();
    }
    let sum = sync
        .mirror()
        .node_indices()
        .fold(Coordinates::zeros(), |acc, m| acc + restrict(&sync.position(m), 2));
    sum / count as f64
}

pub(super) fn gravity(ctx: &ForceContext<'_>) -> ForceField {
    let geom = ctx.geometry.as_2d();
    let centre = ctx.cache.centroid(ctx.sync);
    let mut field = zero_field(ctx.sync);
    for m in ctx.sync.mirror().node_indices() {
        add(&mut field, m, geom.unit_vector(&(centre - ctx.sync.position(m))));
    }
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::force::ForceCache;
    use crate::locator::Locator;
    use narwhal_dygraph::{DyGraph, DyNode, Function, Geometry, Interval, coords2};

    #[test]
    fn every_node_is_pulled_toward_the_centroid_in_the_plane() {
        let mut g = DyGraph::new();
        for (id, x, y) in [("a", 0.0, 0.0), ("b", 10.0, 4.0)] {
            let mut node = DyNode::present([Interval::closed(0.0, 10.0)]);
            node.position
                .insert(Function::constant(Interval::closed(0.0, 10.0), coords2(x, y)));
            g.add_node(id, node).unwrap();
        }
        let sync = Synchroniser::build(g, 1.0).unwrap();
        let locator = Locator::build(sync.mirror(), sync.positions(), 10.0);
        let cache = ForceCache::new();
        let field = gravity(&ForceContext {
            sync: &sync,
            locator: &locator,
            geometry: Geometry::e3d(),
            temperature: 0.5,
            cache: &cache,
        });

        let expected = coords2(5.0, 2.0) / 29.0_f64.sqrt();
        for id in ["a", "a^10"] {
            let f = field.get(sync.mirror().node_ix(id).unwrap());
            assert!((f - expected).norm() < 1e-12, "{id}: {f:?}");
        }
        for id in ["b", "b^10"] {
            let f = field.get(sync.mirror().node_ix(id).unwrap());
            assert!((f + expected).norm() < 1e-12, "{id}: {f:?}");
        }
    }
}
