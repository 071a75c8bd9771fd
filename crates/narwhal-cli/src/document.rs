//! JSON documents read and written by the CLI.
//!
//! Input is a dynamic graph: nodes and edges with presence intervals, optional fixed positions
//! and appearance, and clusters given as a pole plus members. Output is either the laid-out
//! mirror graph (`layout`) or a static snapshot of the original graph (`snapshot`).

use crate::CliError;
use narwhal::{Statistics, Synchroniser};
use narwhal_dygraph::{
    Color, DyEdge, DyGraph, DyNode, Evolution, Interval, NodeShape, Snapshot, coords2,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<NodeDocument>,
    #[serde(default)]
    pub edges: Vec<EdgeDocument>,
    #[serde(default)]
    pub clusters: Vec<ClusterDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeDocument {
    pub id: String,
    pub presence: Vec<Interval>,
    /// Fixed XY position; nodes without one are scattered.
    #[serde(default)]
    pub position: Option<[f64; 2]>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub shape: Option<NodeShape>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeDocument {
    pub id: String,
    pub source: String,
    pub target: String,
    pub presence: Vec<Interval>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClusterDocument {
    pub pole: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub color: Option<String>,
}

fn parse_color(owner: &str, hex: &str) -> Result<Color, CliError> {
    Color::from_hex(hex)
        .ok_or_else(|| CliError::Document(format!("{owner}: invalid color {hex:?}")))
}

impl GraphDocument {
    /// Builds the dynamic graph. Positions are left at their defaults; see
    /// [`GraphDocument::pin_positions`].
    pub fn to_graph(&self) -> Result<DyGraph, CliError> {
        let mut graph = DyGraph::new();
        for n in &self.nodes {
            let mut node = DyNode::present(n.presence.iter().copied());
            if let Some(size) = n.size {
                if !(size.is_finite() && size >= 0.0) {
                    return Err(CliError::Document(format!(
                        "node {}: size must be a non-negative number",
                        n.id
                    )));
                }
                node.size = Evolution::new(size);
            }
            if let Some(shape) = n.shape {
                node.shape = Evolution::new(shape);
            }
            if let Some(label) = &n.label {
                node.label = Evolution::new(label.clone());
            }
            if let Some(hex) = &n.color {
                node.color = Evolution::new(parse_color(&n.id, hex)?);
            }
            graph.add_node(n.id.as_str(), node)?;
        }

        for e in &self.edges {
            let mut edge = DyEdge::present(e.presence.iter().copied());
            if let Some(hex) = &e.color {
                edge.color = Evolution::new(parse_color(&e.id, hex)?);
            }
            graph.add_edge(e.id.as_str(), &e.source, &e.target, edge)?;
        }

        for c in &self.clusters {
            let cluster = graph.add_cluster(&c.pole)?;
            if let Some(hex) = &c.color {
                cluster.color = Evolution::new(parse_color(&c.pole, hex)?);
            }
            for m in &c.members {
                graph.add_cluster_member(&c.pole, m)?;
            }
        }
        Ok(graph)
    }

    /// Overwrites the positions of nodes that carry one in the document.
    pub fn pin_positions(&self, graph: &mut DyGraph) {
        for n in &self.nodes {
            let (Some([x, y]), Some(ix)) = (n.position, graph.node_ix(&n.id)) else {
                continue;
            };
            graph.node_mut(ix).position = Evolution::new(coords2(x, y));
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutDocument {
    pub statistics: Statistics,
    pub time_factor: f64,
    pub nodes: Vec<MirrorNodeDocument>,
    pub segments: Vec<SegmentDocument>,
    pub connections: Vec<ConnectionDocument>,
    pub trajectories: Vec<TrajectoryDocument>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MirrorNodeDocument {
    pub id: String,
    pub origin: &'static str,
    pub node: String,
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentDocument {
    pub id: String,
    pub source: String,
    pub target: String,
    pub node: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionDocument {
    pub edge: String,
    pub source: String,
    pub target: String,
    pub interval: Interval,
}

/// Trajectory of one original node as `[x, y, t]` points in time order.
#[derive(Debug, Clone, Serialize)]
pub struct TrajectoryDocument {
    pub node: String,
    pub points: Vec<[f64; 3]>,
}

impl LayoutDocument {
    pub fn new(sync: &Synchroniser, statistics: Statistics) -> Self {
        let original = sync.original();
        let mirror = sync.mirror();

        let nodes = mirror
            .nodes()
            .map(|(m, id, node)| {
                let p = sync.position(m);
                MirrorNodeDocument {
                    id: id.to_string(),
                    origin: node.origin.kind(),
                    node: original.node_id(node.origin.node()).to_string(),
                    time: node.time,
                    x: p.x,
                    y: p.y,
                    z: p.z,
                }
            })
            .collect();

        let segments = mirror
            .edges()
            .map(|(e, id, segment)| {
                let (s, t) = mirror.endpoints(e);
                SegmentDocument {
                    id: id.to_string(),
                    source: mirror.node_id(s).to_string(),
                    target: mirror.node_id(t).to_string(),
                    node: original.node_id(segment.node).to_string(),
                }
            })
            .collect();

        let connections = sync
            .mirror_connections()
            .iter()
            .map(|c| {
                let (s, t) = original.graph().endpoints(c.edge);
                ConnectionDocument {
                    edge: original.graph().edge_id(c.edge).to_string(),
                    source: original.node_id(s).to_string(),
                    target: original.node_id(t).to_string(),
                    interval: c.interval,
                }
            })
            .collect();

        let trajectories = sync
            .direct_nodes()
            .map(|n| TrajectoryDocument {
                node: original.node_id(n).to_string(),
                points: sync
                    .bends(n)
                    .into_iter()
                    .map(|m| {
                        let p = sync.position(m);
                        [p.x, p.y, mirror.node(m).time]
                    })
                    .collect(),
            })
            .collect();

        Self {
            statistics,
            time_factor: sync.time_factor(),
            nodes,
            segments,
            connections,
            trajectories,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotDocument {
    pub time: f64,
    pub nodes: Vec<SnapshotNodeDocument>,
    pub edges: Vec<SnapshotEdgeDocument>,
    pub clusters: Vec<SnapshotClusterDocument>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotNodeDocument {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub shape: NodeShape,
    pub color: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotEdgeDocument {
    pub id: String,
    pub source: String,
    pub target: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotClusterDocument {
    pub pole: String,
    pub members: Vec<String>,
    pub color: String,
}

impl SnapshotDocument {
    pub fn new(snapshot: &Snapshot) -> Self {
        let g = &snapshot.graph;
        let nodes = g
            .nodes()
            .map(|(_, id, n)| SnapshotNodeDocument {
                id: id.to_string(),
                x: n.position.x,
                y: n.position.y,
                size: n.size,
                shape: n.shape,
                color: n.color.to_hex(),
                label: n.label.clone(),
            })
            .collect();
        let edges = g
            .edges()
            .map(|(e, id, edge)| {
                let (s, t) = g.endpoints(e);
                SnapshotEdgeDocument {
                    id: id.to_string(),
                    source: g.node_id(s).to_string(),
                    target: g.node_id(t).to_string(),
                    color: edge.color.to_hex(),
                }
            })
            .collect();
        let clusters = snapshot
            .clusters
            .iter()
            .map(|c| SnapshotClusterDocument {
                pole: g.node_id(c.pole).to_string(),
                members: c.members.iter().map(|&m| g.node_id(m).to_string()).collect(),
                color: c.color.to_hex(),
            })
            .collect();
        Self {
            time: snapshot.time,
            nodes,
            edges,
            clusters,
        }
    }
}
