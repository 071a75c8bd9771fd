use narwhal_dygraph::{Interval, NodeIx};
use serde::Serialize;
use std::fmt;

/// Marker separating an original node id from the time of a synthetic mirror node.
pub const SYNTHETIC_MARKER: char = '^';

/// Where a mirror node comes from.
///
/// `node` always refers to the original dynamic-graph node whose trajectory contains the mirror
/// node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Origin {
    /// First trajectory node of an original node. Shares the original node's id.
    Real { node: NodeIx },
    /// Start or end of a trajectory that is not the first node of the original.
    Endpoint { node: NodeIx, time: f64 },
    /// Interior trajectory node at a topology or key-frame change.
    Bend { node: NodeIx, time: f64 },
}

impl Origin {
    pub fn node(&self) -> NodeIx {
        match *self {
            Origin::Real { node } | Origin::Endpoint { node, .. } | Origin::Bend { node, .. } => {
                node
            }
        }
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Origin::Real { .. })
    }

    pub fn is_bend(&self) -> bool {
        matches!(self, Origin::Bend { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Origin::Real { .. } => "real",
            Origin::Endpoint { .. } => "endpoint",
            Origin::Bend { .. } => "bend",
        }
    }
}

/// Index of a [`MirrorLine`] inside its synchroniser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LineId(pub(crate) usize);

impl LineId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line{}", self.0)
    }
}

/// Label of a mirror-graph node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MirrorNode {
    pub origin: Origin,
    /// Original time of the node; its `z` coordinate is `time * time_factor`.
    pub time: f64,
    pub line: LineId,
}

/// Label of a mirror-graph edge: one segment of a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MirrorSegment {
    pub node: NodeIx,
    pub line: LineId,
}

/// Trajectory of one original node over one presence interval.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorLine {
    pub node: NodeIx,
    /// Presence interval in original time.
    pub interval: Interval,
    /// Presence interval along `z`.
    pub mirror_interval: Interval,
    /// Trajectory nodes ordered by time.
    pub nodes: Vec<NodeIx>,
    /// `segments[i]` joins `nodes[i]` and `nodes[i + 1]`.
    pub segments: Vec<narwhal_dygraph::EdgeIx>,
}

/// Junction between two trajectories over the presence of an original edge.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorConnection {
    pub edge: narwhal_dygraph::EdgeIx,
    pub source_line: LineId,
    pub target_line: LineId,
    pub interval: Interval,
    pub mirror_interval: Interval,
}

pub(crate) fn synthetic_id(original: &str, time: f64) -> String {
    format!("{original}{SYNTHETIC_MARKER}{time}")
}
