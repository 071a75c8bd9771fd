//! Deterministic initial placement.
//!
//! Placement replaces each node's position evolution with a constant default, so the mirror
//! graph built afterwards starts from the scattered positions.

use narwhal_dygraph::{DyGraph, Evolution, NodeIx, coords2};
use std::f64::consts::TAU;

pub const DEFAULT_SEED: u64 = 73;

/// Radius of the circle poles are placed on by [`scatter_around_poles`].
pub const POLE_CIRCLE_RADIUS: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    /// Uniform in `[0, 1)` with 53 bits of precision.
    pub fn next_f64_unit(&mut self) -> f64 {
        let u = self.next_u64() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }

    /// Uniform in `[-1, 1)`.
    pub fn next_f64_signed(&mut self) -> f64 {
        self.next_f64_unit() * 2.0 - 1.0
    }
}

fn set_position(graph: &mut DyGraph, n: NodeIx, x: f64, y: f64) {
    graph.node_mut(n).position = Evolution::new(coords2(x, y));
}

/// Places every node uniformly at random in `[0, distance)²`.
pub fn scatter_nodes(graph: &mut DyGraph, distance: f64, seed: u64) {
    let mut rng = XorShift64Star::new(seed);
    for n in graph.graph().node_indices() {
        let x = rng.next_f64_unit() * distance;
        let y = rng.next_f64_unit() * distance;
        set_position(graph, n, x, y);
    }
}

/// Places poles evenly on a circle of radius `cluster_distance`, members within
/// `member_distance` of their pole on each axis, and every other node uniformly in
/// `[0, non_member_distance)²`.
pub fn scatter_around_poles(
    graph: &mut DyGraph,
    cluster_distance: f64,
    member_distance: f64,
    non_member_distance: f64,
    seed: u64,
) {
    let mut rng = XorShift64Star::new(seed);
    let mut done = vec![false; graph.node_count()];

    let clusters: Vec<(NodeIx, Vec<NodeIx>)> = graph
        .clusters()
        .map(|c| (c.pole(), c.members().to_vec()))
        .collect();
    let count = clusters.len();
    for (k, (pole, members)) in clusters.into_iter().enumerate() {
        let angle = TAU * (k + 1) as f64 / count as f64;
        let px = cluster_distance * angle.cos();
        let py = cluster_distance * angle.sin();
        set_position(graph, pole, px, py);
        done[pole.index()] = true;

        for m in members {
            if done[m.index()] {
                continue;
            }
            let dx = rng.next_f64_signed() * member_distance;
            let dy = rng.next_f64_signed() * member_distance;
            set_position(graph, m, px + dx, py + dy);
            done[m.index()] = true;
        }
    }

    for n in graph.graph().node_indices() {
        if done[n.index()] {
            continue;
        }
        let x = rng.next_f64_unit() * non_member_distance;
        let y = rng.next_f64_unit() * non_member_distance;
        set_position(graph, n, x, y);
    }
}
