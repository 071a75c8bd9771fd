//! Box queries over mirror nodes and segments.
//!
//! A sparse uniform 3D grid: every node is bucketed by the cell holding its position, every
//! segment in each cell its bounding box touches. Segments spanning more than
//! [`MAX_SEGMENT_CELLS`] cells are kept in a flat list and scanned on every segment query. The
//! grid is rebuilt from scratch once per iteration, after displacement.

use crate::stc::MirrorGraph;
use narwhal_dygraph::{Aabb, Coordinates, EdgeIx, NodeAttribute, NodeIx};
use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type Cell = (i64, i64, i64);

/// Largest number of grid cells a segment is bucketed into.
pub const MAX_SEGMENT_CELLS: u128 = 64;

#[derive(Debug, Clone)]
pub struct Locator {
    cell_size: f64,
    positions: Vec<Coordinates>,
    segment_boxes: Vec<Aabb>,
    node_cells: HashMap<Cell, Vec<NodeIx>>,
    segment_cells: HashMap<Cell, Vec<EdgeIx>>,
    oversized_segments: Vec<EdgeIx>,
}

impl Locator {
    pub fn build(
        mirror: &MirrorGraph,
        positions: &NodeAttribute<Coordinates>,
        cell_size: f64,
    ) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        let mut locator = Self {
            cell_size,
            positions: Vec::with_capacity(mirror.node_count()),
            segment_boxes: Vec::with_capacity(mirror.edge_count()),
            node_cells: HashMap::default(),
            segment_cells: HashMap::default(),
            oversized_segments: Vec::new(),
        };

        for n in mirror.node_indices() {
            let p = *positions.get(n);
            locator.positions.push(p);
            let cell = locator.cell_of(&p);
            locator.node_cells.entry(cell).or_default().push(n);
        }

        for e in mirror.edge_indices() {
            let (s, t) = mirror.endpoints(e);
            let bbox = Aabb::from_points(positions.get(s), positions.get(t));
            locator.segment_boxes.push(bbox);
            let (lo, hi) = locator.cell_range(&bbox);
            if Self::range_len(lo, hi) > MAX_SEGMENT_CELLS {
                locator.oversized_segments.push(e);
                continue;
            }
            for i in lo.0..=hi.0 {
                for j in lo.1..=hi.1 {
                    for k in lo.2..=hi.2 {
                        locator.segment_cells.entry((i, j, k)).or_default().push(e);
                    }
                }
            }
        }

        locator
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    fn cell_of(&self, p: &Coordinates) -> Cell {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
            (p.z / self.cell_size).floor() as i64,
        )
    }

    fn cell_range(&self, bbox: &Aabb) -> (Cell, Cell) {
        (self.cell_of(&bbox.min), self.cell_of(&bbox.max))
    }

    fn range_len(lo: Cell, hi: Cell) -> u128 {
        let span = |a: i64, b: i64| (b as i128 - a as i128 + 1).max(0) as u128;
        span(lo.0, hi.0)
            .saturating_mul(span(lo.1, hi.1))
            .saturating_mul(span(lo.2, hi.2))
    }

    /// Visits the buckets of `cells` touched by `bbox`. Falls back to scanning every bucket when
    /// the box covers more cells than are occupied.
    fn visit<T: Copy>(
        &self,
        cells: &HashMap<Cell, Vec<T>>,
        bbox: &Aabb,
        mut visit: impl FnMut(T),
    ) {
        let (lo, hi) = self.cell_range(bbox);
        let inside = |c: &Cell| {
            (lo.0..=hi.0).contains(&c.0) && (lo.1..=hi.1).contains(&c.1) && (lo.2..=hi.2).contains(&c.2)
        };
        if Self::range_len(lo, hi) > cells.len() as u128 {
            for (cell, items) in cells {
                if inside(cell) {
                    items.iter().copied().for_each(&mut visit);
                }
            }
            return;
        }
        for i in lo.0..=hi.0 {
            for j in lo.1..=hi.1 {
                for k in lo.2..=hi.2 {
                    if let Some(items) = cells.get(&(i, j, k)) {
                        items.iter().copied().for_each(&mut visit);
                    }
                }
            }
        }
    }

    fn visit_segments(&self, bbox: &Aabb, mut visit: impl FnMut(EdgeIx)) {
        self.visit(&self.segment_cells, bbox, &mut visit);
        self.oversized_segments.iter().copied().for_each(visit);
    }

    pub fn node_box(&self, n: NodeIx) -> Aabb {
        Aabb::from_point(&self.positions[n.index()])
    }

    pub fn segment_box(&self, e: EdgeIx) -> Aabb {
        self.segment_boxes[e.index()]
    }

    pub fn nodes_in_box(&self, bbox: &Aabb) -> Vec<NodeIx> {
        let mut out = Vec::new();
        self.visit(&self.node_cells, bbox, |n| {
            if bbox.contains_point(&self.positions[n.index()]) {
                out.push(n);
            }
        });
        out.sort_unstable();
        out
    }

    /// Segments whose bounding box lies entirely inside `bbox`.
    pub fn edges_fully_in_box(&self, bbox: &Aabb) -> Vec<EdgeIx> {
        let mut out = Vec::new();
        self.visit_segments(bbox, |e| {
            if bbox.contains_box(&self.segment_boxes[e.index()]) {
                out.push(e);
            }
        });
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Segments whose bounding box intersects `bbox`.
    pub fn edges_partially_in_box(&self, bbox: &Aabb) -> Vec<EdgeIx> {
        let mut out = Vec::new();
        self.visit_segments(bbox, |e| {
            if bbox.intersects(&self.segment_boxes[e.index()]) {
                out.push(e);
            }
        });
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Nodes other than `n` within `radius` of it.
    pub fn close_nodes(&self, n: NodeIx, radius: f64) -> Vec<NodeIx> {
        let center = self.positions[n.index()];
        let bbox = Aabb::from_point(&center).expand(radius);
        let mut out = self.nodes_in_box(&bbox);
        out.retain(|&m| m != n && (self.positions[m.index()] - center).norm() <= radius);
        out
    }
}
