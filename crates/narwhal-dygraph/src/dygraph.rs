//! Dynamic graph: a static topology whose elements carry time-varying attributes.

use crate::cluster::Cluster;
use crate::color::Color;
use crate::error::{Error, Result};
use crate::evolution::{Evolution, Function, Interpolate, apply_fading, merged_intervals};
use crate::geometry::Coordinates;
use crate::graph::{EdgeIx, Graph, NodeIx};
use crate::interval::Interval;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
    #[default]
    Circle,
    Square,
}

impl Interpolate for NodeShape {
    fn interpolate(start: &Self, end: &Self, weight: f64) -> Self {
        if weight < 1.0 { *start } else { *end }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DyNode {
    pub presence: Evolution<bool>,
    pub position: Evolution<Coordinates>,
    pub size: Evolution<f64>,
    pub shape: Evolution<NodeShape>,
    pub color: Evolution<Color>,
    pub label: Evolution<String>,
}

impl Default for DyNode {
    fn default() -> Self {
        Self {
            presence: Evolution::new(false),
            position: Evolution::new(Coordinates::zeros()),
            size: Evolution::new(1.0),
            shape: Evolution::new(NodeShape::Circle),
            color: Evolution::new(Color::BLACK),
            label: Evolution::new(String::new()),
        }
    }
}

impl DyNode {
    /// A node present over each of `intervals`.
    pub fn present(intervals: impl IntoIterator<Item = Interval>) -> Self {
        let mut node = Self::default();
        for i in intervals {
            node.presence.insert(Function::constant(i, true));
        }
        node
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DyEdge {
    pub presence: Evolution<bool>,
    pub color: Evolution<Color>,
}

impl Default for DyEdge {
    fn default() -> Self {
        Self {
            presence: Evolution::new(false),
            color: Evolution::new(Color::GRAY),
        }
    }
}

impl DyEdge {
    pub fn present(intervals: impl IntoIterator<Item = Interval>) -> Self {
        let mut edge = Self::default();
        for i in intervals {
            edge.presence.insert(Function::constant(i, true));
        }
        edge
    }
}

/// How [`DyGraph::merge_presences`] rewrites presence timelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceMode {
    /// Merge overlapping and touching intervals.
    #[default]
    Plain,
    /// Nodes stay present from their first appearance until the end of the data.
    KeepAppearedNodes,
    /// Nodes and edges stay present from their first appearance until the end of the data.
    KeepAppearedEdges,
}

#[derive(Debug, Clone, Default)]
pub struct DyGraph {
    graph: Graph<DyNode, DyEdge>,
    clusters: IndexMap<NodeIx, Cluster>,
}

impl DyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &Graph<DyNode, DyEdge> {
        &self.graph
    }

    pub fn add_node(&mut self, id: impl Into<String>, node: DyNode) -> Result<NodeIx> {
        self.graph.add_node(id, node)
    }

    pub fn add_edge(
        &mut self,
        id: impl Into<String>,
        source: &str,
        target: &str,
        edge: DyEdge,
    ) -> Result<EdgeIx> {
        self.graph.add_edge_by_id(id, source, target, edge)
    }

    pub fn node_ix(&self, id: &str) -> Option<NodeIx> {
        self.graph.node_ix(id)
    }

    pub fn node(&self, n: NodeIx) -> &DyNode {
        self.graph.node(n)
    }

    pub fn node_mut(&mut self, n: NodeIx) -> &mut DyNode {
        self.graph.node_mut(n)
    }

    pub fn edge(&self, e: EdgeIx) -> &DyEdge {
        self.graph.edge(e)
    }

    pub fn edge_mut(&mut self, e: EdgeIx) -> &mut DyEdge {
        self.graph.edge_mut(e)
    }

    pub fn node_id(&self, n: NodeIx) -> &str {
        self.graph.node_id(n)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Creates (or returns) the cluster whose pole is `pole`.
    pub fn add_cluster(&mut self, pole: &str) -> Result<&mut Cluster> {
        let ix = self.graph.require_node(pole)?;
        Ok(self
            .clusters
            .entry(ix)
            .or_insert_with(|| Cluster::new(pole, ix)))
    }

    pub fn add_cluster_member(&mut self, pole: &str, member: &str) -> Result<()> {
        let m = self.graph.require_node(member)?;
        self.add_cluster(pole)?.add_member(m)
    }

    pub fn cluster(&self, pole: NodeIx) -> Option<&Cluster> {
        self.clusters.get(&pole)
    }

    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.values()
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_node_pole(&self, n: NodeIx) -> bool {
        self.clusters.contains_key(&n)
    }

    /// The first cluster listing `n` as a member.
    pub fn cluster_of(&self, n: NodeIx) -> Option<&Cluster> {
        self.clusters.values().find(|c| c.is_node_member(n))
    }

    /// Smallest interval covering every node and edge presence.
    pub fn time_extent(&self) -> Option<Interval> {
        let nodes = self.graph.nodes().map(|(_, _, n)| &n.presence);
        let edges = self.graph.edges().map(|(_, _, e)| &e.presence);
        nodes
            .chain(edges)
            .flat_map(|p| p.iter().map(|f| *f.interval()))
            .reduce(|a, b| a.span(&b))
    }

    pub fn merge_presences(&mut self, mode: PresenceMode, data_end: f64) {
        let keep_nodes = mode != PresenceMode::Plain;
        let keep_edges = mode == PresenceMode::KeepAppearedEdges;
        for n in self.graph.node_indices() {
            merge_presence(&mut self.graph.node_mut(n).presence, keep_nodes, data_end);
        }
        for e in self.graph.edge_indices() {
            merge_presence(&mut self.graph.edge_mut(e).presence, keep_edges, data_end);
        }
    }

    /// Merges presences and gives every element a faded color timeline.
    pub fn merge_and_color(
        &mut self,
        mode: PresenceMode,
        data_end: f64,
        node_color: Color,
        edge_color: Color,
        fading: f64,
    ) {
        self.merge_presences(mode, data_end);
        for n in self.graph.node_indices() {
            let node = self.graph.node_mut(n);
            apply_fading(&node.presence, &mut node.color, fading, node_color);
        }
        for e in self.graph.edge_indices() {
            let edge = self.graph.edge_mut(e);
            apply_fading(&edge.presence, &mut edge.color, fading, edge_color);
        }
    }

    pub fn snapshot_at(&self, t: f64) -> Snapshot {
        let mut graph: Graph<SnapshotNode, SnapshotEdge> = Graph::new();
        for (_, id, node) in self.graph.nodes() {
            if !node.presence.value_at(t) {
                continue;
            }
            let snapshot_node = SnapshotNode {
                position: node.position.value_at(t),
                size: node.size.value_at(t),
                shape: node.shape.value_at(t),
                color: node.color.value_at(t),
                label: node.label.value_at(t),
            };
            if let Err(err) = graph.add_node(id, snapshot_node) {
                debug_assert!(false, "{err}");
            }
        }
        for (e, id, edge) in self.graph.edges() {
            if !edge.presence.value_at(t) {
                continue;
            }
            let (s, d) = self.graph.endpoints(e);
            let (Some(s), Some(d)) = (
                graph.node_ix(self.graph.node_id(s)),
                graph.node_ix(self.graph.node_id(d)),
            ) else {
                continue;
            };
            let snapshot_edge = SnapshotEdge {
                color: edge.color.value_at(t),
            };
            if let Err(err) = graph.add_edge(id, s, d, snapshot_edge) {
                debug_assert!(false, "{err}");
            }
        }

        let clusters = self
            .clusters
            .values()
            .filter_map(|c| {
                let pole = graph.node_ix(c.id())?;
                let members = c
                    .members()
                    .iter()
                    .filter_map(|&m| graph.node_ix(self.graph.node_id(m)))
                    .collect();
                Some(SnapshotCluster {
                    pole,
                    members,
                    color: c.color.value_at(t),
                })
            })
            .collect();

        Snapshot {
            time: t,
            graph,
            clusters,
        }
    }

    /// Merged presence intervals of node `n`.
    pub fn node_presence(&self, n: NodeIx) -> Vec<Interval> {
        merged_intervals(&self.graph.node(n).presence)
    }

    /// Merged presence intervals of edge `e`.
    pub fn edge_presence(&self, e: EdgeIx) -> Vec<Interval> {
        merged_intervals(&self.graph.edge(e).presence)
    }

    pub fn require_node(&self, id: &str) -> Result<NodeIx> {
        self.graph
            .node_ix(id)
            .ok_or_else(|| Error::UnknownNode { id: id.to_string() })
    }
}

fn merge_presence(presence: &mut Evolution<bool>, keep_appeared: bool, data_end: f64) {
    if !keep_appeared {
        presence.merge();
        return;
    }
    let Some(start) = merged_intervals(presence).first().map(|i| i.left_bound()) else {
        return;
    };
    presence.clear();
    presence.insert(Function::constant(
        Interval::closed(start, data_end.max(start)),
        true,
    ));
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotNode {
    pub position: Coordinates,
    pub size: f64,
    pub shape: NodeShape,
    pub color: Color,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotEdge {
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotCluster {
    pub pole: NodeIx,
    pub members: Vec<NodeIx>,
    pub color: Color,
}

/// Static view of a [`DyGraph`] with every attribute resolved at one time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub time: f64,
    pub graph: Graph<SnapshotNode, SnapshotEdge>,
    pub clusters: Vec<SnapshotCluster>,
}
