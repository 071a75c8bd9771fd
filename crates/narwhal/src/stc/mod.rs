//! Space-time cube synchroniser.
//!
//! The synchroniser turns a [`DyGraph`] into a static 3D mirror graph whose `z` axis is time.
//! Each presence interval of an original node becomes a [`MirrorLine`]: a chain of mirror nodes
//! joined by segments. Chains are cut wherever an incident edge appears or disappears and at
//! every position key frame. Original edges become [`MirrorConnection`]s between the two
//! trajectories they join.
//!
//! The mirror topology is frozen once built; only positions change afterwards.

mod origin;

pub use origin::{
    LineId, MirrorConnection, MirrorLine, MirrorNode, MirrorSegment, Origin, SYNTHETIC_MARKER,
};

use crate::error::{Error, Result};
use narwhal_dygraph::{
    Coordinates, DyGraph, EdgeIx, Function, Graph, Interpolation, Interval, IntervalTree,
    NodeAttribute, NodeIx, coords, coords2,
};
use origin::synthetic_id;

pub type MirrorGraph = Graph<MirrorNode, MirrorSegment>;

#[derive(Debug, Clone)]
pub struct Synchroniser {
    original: DyGraph,
    time_factor: f64,
    mirror: MirrorGraph,
    positions: NodeAttribute<Coordinates>,
    lines: Vec<MirrorLine>,
    line_trees: Vec<IntervalTree<LineId>>,
    connections: Vec<MirrorConnection>,
    connection_degree: Vec<u32>,
}

impl Synchroniser {
    /// Builds the mirror graph of `original`; `z = t * time_factor`.
    pub fn build(original: DyGraph, time_factor: f64) -> Result<Self> {
        if !(time_factor.is_finite() && time_factor > 0.0) {
            return Err(Error::InvalidOption {
                name: "time_factor",
                reason: format!("expected a finite positive number, got {time_factor}"),
            });
        }

        let g = original.graph();
        let edge_presence: Vec<Vec<Interval>> =
            g.edge_indices().map(|e| original.edge_presence(e)).collect();

        let mut cuts: Vec<Vec<f64>> = vec![Vec::new(); g.node_count()];
        for e in g.edge_indices() {
            let (s, t) = g.endpoints(e);
            for interval in &edge_presence[e.index()] {
                for n in [s, t] {
                    cuts[n.index()].push(interval.left_bound());
                    cuts[n.index()].push(interval.right_bound());
                }
            }
        }

        let mut mirror: MirrorGraph = Graph::new();
        let mut positions = NodeAttribute::new(Coordinates::zeros());
        let mut lines: Vec<MirrorLine> = Vec::new();
        let mut line_trees: Vec<IntervalTree<LineId>> = Vec::with_capacity(g.node_count());

        for n in g.node_indices() {
            let node = g.node(n);
            let id = g.node_id(n);
            let node_cuts = &mut cuts[n.index()];
            node_cuts.extend(node.position.change_times());
            node_cuts.sort_by(f64::total_cmp);
            node_cuts.dedup();

            let mut tree = IntervalTree::new();
            for (k, interval) in original.node_presence(n).into_iter().enumerate() {
                let left = interval.left_bound();
                let right = interval.right_bound();
                let mut times = vec![left];
                times.extend(node_cuts.iter().copied().filter(|&t| t > left && t < right));
                if right > left {
                    times.push(right);
                }

                let line = LineId(lines.len());
                let last = times.len() - 1;
                let mut chain = Vec::with_capacity(times.len());
                for (j, &time) in times.iter().enumerate() {
                    let origin = if k == 0 && j == 0 {
                        Origin::Real { node: n }
                    } else if j == 0 || j == last {
                        Origin::Endpoint { node: n, time }
                    } else {
                        Origin::Bend { node: n, time }
                    };
                    let mirror_id = if origin.is_real() {
                        id.to_string()
                    } else {
                        let candidate = synthetic_id(id, time);
                        // an open bound can meet the previous line at the same time
                        if j == 0 && mirror.has_node(&candidate) {
                            format!("{candidate}{SYNTHETIC_MARKER}{k}")
                        } else {
                            candidate
                        }
                    };
                    let m = mirror.add_node(mirror_id, MirrorNode { origin, time, line })?;
                    let p = node.position.value_at(time);
                    positions.set(m, coords(p.x, p.y, time * time_factor));
                    chain.push(m);
                }

                let mut segments = Vec::with_capacity(last);
                for pair in chain.windows(2) {
                    let t0 = mirror.node(pair[0]).time;
                    let t1 = mirror.node(pair[1]).time;
                    let segment_id = format!("{}{SYNTHETIC_MARKER}{t1}", synthetic_id(id, t0));
                    let segment = MirrorSegment { node: n, line };
                    segments.push(mirror.add_edge(segment_id, pair[0], pair[1], segment)?);
                }

                tree.insert(interval, line);
                lines.push(MirrorLine {
                    node: n,
                    interval,
                    mirror_interval: interval.scaled(time_factor),
                    nodes: chain,
                    segments,
                });
            }
            line_trees.push(tree);
        }

        let mut connections = Vec::new();
        let mut connection_degree = vec![0u32; mirror.node_count()];
        for e in g.edge_indices() {
            let (s, t) = g.endpoints(e);
            for interval in &edge_presence[e.index()] {
                let find = |n: NodeIx| -> Result<LineId> {
                    line_trees[n.index()]
                        .overlapping(interval)
                        .into_iter()
                        .map(|(_, &line)| line)
                        .find(|line| lines[line.0].interval.contains_interval(interval))
                        .ok_or_else(|| Error::EndpointAbsent {
                            edge_id: g.edge_id(e).to_string(),
                            node_id: g.node_id(n).to_string(),
                            interval: *interval,
                        })
                };
                let source_line = find(s)?;
                let target_line = find(t)?;
                for line in [source_line, target_line] {
                    for time in [interval.left_bound(), interval.right_bound()] {
                        if let Some(&m) = lines[line.0]
                            .nodes
                            .iter()
                            .find(|&&m| mirror.node(m).time == time)
                        {
                            connection_degree[m.index()] += 1;
                        }
                    }
                }
                connections.push(MirrorConnection {
                    edge: e,
                    source_line,
                    target_line,
                    interval: *interval,
                    mirror_interval: interval.scaled(time_factor),
                });
            }
        }

        tracing::debug!(
            nodes = g.node_count(),
            mirror_nodes = mirror.node_count(),
            segments = mirror.edge_count(),
            lines = lines.len(),
            bends = mirror.nodes().filter(|(_, _, m)| m.origin.is_bend()).count(),
            connections = connections.len(),
            "built space-time cube mirror graph"
        );

        Ok(Self {
            original,
            time_factor,
            mirror,
            positions,
            lines,
            line_trees,
            connections,
            connection_degree,
        })
    }

    /// Builds the mirror graph of a changed `original`, keeping the `x`/`y` of every mirror node
    /// whose id exists in both mirror graphs.
    pub fn rebuild(&self, original: DyGraph) -> Result<Self> {
        let mut next = Self::build(original, self.time_factor)?;
        for m in next.mirror.node_indices() {
            if let Some(old) = self.mirror.node_ix(next.mirror.node_id(m)) {
                let p = self.positions.get(old);
                let z = next.positions.get(m).z;
                next.positions.set(m, coords(p.x, p.y, z));
            }
        }
        Ok(next)
    }

    pub fn original(&self) -> &DyGraph {
        &self.original
    }

    pub fn into_original(self) -> DyGraph {
        self.original
    }

    pub fn mirror(&self) -> &MirrorGraph {
        &self.mirror
    }

    pub fn time_factor(&self) -> f64 {
        self.time_factor
    }

    pub fn z_of(&self, time: f64) -> f64 {
        time * self.time_factor
    }

    pub fn time_of(&self, z: f64) -> f64 {
        z / self.time_factor
    }

    pub fn positions(&self) -> &NodeAttribute<Coordinates> {
        &self.positions
    }

    pub fn position(&self, m: NodeIx) -> Coordinates {
        *self.positions.get(m)
    }

    /// Moves mirror node `m` in the `x`/`y` plane. Its `z` is fixed by its time.
    pub fn displace(&mut self, m: NodeIx, dx: f64, dy: f64) {
        let p = self.positions.get_mut(m);
        p.x += dx;
        p.y += dy;
    }

    /// Sets the `x`/`y` of every mirror node of original node `n`.
    pub fn place(&mut self, n: NodeIx, x: f64, y: f64) {
        for line in self.line_trees[n.index()].values() {
            for &m in &self.lines[line.0].nodes {
                let p = self.positions.get_mut(m);
                p.x = x;
                p.y = y;
            }
        }
    }

    pub fn origin(&self, m: NodeIx) -> &Origin {
        &self.mirror.node(m).origin
    }

    /// Original node of mirror node `m`.
    pub fn direct_node(&self, m: NodeIx) -> NodeIx {
        self.mirror.node(m).origin.node()
    }

    /// Original node of the mirror node with id `id`.
    pub fn direct_node_by_id(&self, id: &str) -> Result<NodeIx> {
        self.mirror
            .node_ix(id)
            .map(|m| self.direct_node(m))
            .ok_or_else(|| Error::NoSuchElement {
                what: format!("mirror node {id}"),
            })
    }

    /// Original nodes that have at least one mirror node.
    pub fn direct_nodes(&self) -> impl Iterator<Item = NodeIx> + '_ {
        self.line_trees
            .iter()
            .enumerate()
            .filter(|(_, tree)| !tree.is_empty())
            .map(|(i, _)| NodeIx::new(i))
    }

    /// First mirror node of original node `n`.
    pub fn mirror_node(&self, n: NodeIx) -> Option<NodeIx> {
        let line = *self.line_trees.get(n.index())?.values().next()?;
        self.lines[line.0].nodes.first().copied()
    }

    /// Original node whose trajectory contains `segment`.
    pub fn original_node(&self, segment: EdgeIx) -> NodeIx {
        self.mirror.edge(segment).node
    }

    pub fn original_line(&self, segment: EdgeIx) -> LineId {
        self.mirror.edge(segment).line
    }

    pub fn mirror_lines(&self, n: NodeIx) -> &IntervalTree<LineId> {
        &self.line_trees[n.index()]
    }

    pub fn line(&self, id: LineId) -> &MirrorLine {
        &self.lines[id.0]
    }

    pub fn lines(&self) -> &[MirrorLine] {
        &self.lines
    }

    pub fn mirror_connections(&self) -> &[MirrorConnection] {
        &self.connections
    }

    /// Number of connection ends attached to mirror node `m`.
    pub fn connection_degree(&self, m: NodeIx) -> u32 {
        self.connection_degree[m.index()]
    }

    /// All trajectory nodes of original node `n`, ordered by time across its lines.
    pub fn bends(&self, n: NodeIx) -> Vec<NodeIx> {
        self.line_trees[n.index()]
            .values()
            .flat_map(|line| self.lines[line.0].nodes.iter().copied())
            .collect()
    }

    /// Position of original node `n` at time `t`, interpolated along its trajectory.
    pub fn position_at(&self, n: NodeIx, t: f64) -> Option<Coordinates> {
        let (_, &line) = self.line_trees.get(n.index())?.first_at(t)?;
        let nodes = &self.lines[line.0].nodes;
        if nodes.len() == 1 {
            return Some(self.position(nodes[0]));
        }
        for pair in nodes.windows(2) {
            let t0 = self.mirror.node(pair[0]).time;
            let t1 = self.mirror.node(pair[1]).time;
            if t >= t0 && t <= t1 {
                let a = self.position(pair[0]);
                let b = self.position(pair[1]);
                let s = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
                return Some(a.lerp(&b, s));
            }
        }
        None
    }

    /// Writes the mirror positions back into the original position evolutions as linear
    /// transitions between consecutive trajectory nodes.
    pub fn export_positions(&mut self) {
        for n in self.original.graph().node_indices() {
            let tree = &self.line_trees[n.index()];
            if tree.is_empty() {
                continue;
            }
            let xy = |m: NodeIx| {
                let p = self.positions.get(m);
                coords2(p.x, p.y)
            };
            let mut functions = Vec::new();
            let mut first = None;
            for line in tree.values() {
                let nodes = &self.lines[line.0].nodes;
                first.get_or_insert_with(|| xy(nodes[0]));
                if nodes.len() == 1 {
                    functions.push(Function::constant(self.lines[line.0].interval, xy(nodes[0])));
                    continue;
                }
                let last = nodes.len() - 2;
                for (i, pair) in nodes.windows(2).enumerate() {
                    let t0 = self.mirror.node(pair[0]).time;
                    let t1 = self.mirror.node(pair[1]).time;
                    let interval = if i == last {
                        Interval::closed(t0, t1)
                    } else {
                        Interval::left_closed(t0, t1)
                    };
                    functions.push(Function::transition(
                        interval,
                        xy(pair[0]),
                        xy(pair[1]),
                        Interpolation::Linear,
                    ));
                }
            }

            let position = &mut self.original.node_mut(n).position;
            position.clear();
            if let Some(first) = first {
                position.set_default(first);
            }
            position.insert_all(functions);
        }
    }
}
