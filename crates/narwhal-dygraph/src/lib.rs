#![forbid(unsafe_code)]

//! Dynamic graph data structures used by `narwhal`.
//!
//! The crate provides the time model (intervals, interval trees, evolutions), a small geometry
//! kernel, an append-only property graph, and the dynamic graph that carries time-varying
//! presence, position, and appearance attributes.

pub mod cluster;
pub mod color;
pub mod dygraph;
pub mod error;
pub mod evolution;
pub mod geometry;
pub mod graph;
pub mod interval;
pub mod interval_tree;

pub use cluster::Cluster;
pub use color::Color;
pub use dygraph::{
    DyEdge, DyGraph, DyNode, NodeShape, PresenceMode, Snapshot, SnapshotCluster, SnapshotEdge,
    SnapshotNode,
};
pub use error::{Error, Result};
pub use evolution::{Evolution, Function, Interpolate, Interpolation};
pub use geometry::{
    Aabb, Coordinates, Dimensions, Geometry, PointRelation, coords, coords2, restrict,
};
pub use graph::{EdgeIx, Graph, NodeAttribute, NodeIx};
pub use interval::Interval;
pub use interval_tree::IntervalTree;
