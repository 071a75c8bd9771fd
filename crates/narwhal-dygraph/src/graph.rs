//! Static property graph used for mirror graphs and snapshots.
//!
//! Nodes and edges live in insertion-ordered arenas and are addressed by [`NodeIx`] / [`EdgeIx`]
//! handles; string ids are looked up through an `FxHashMap` index. The topology is append-only.

mod attribute;

pub use attribute::NodeAttribute;

use crate::error::{Error, Result};
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use std::fmt;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIx(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeIx(usize);

impl NodeIx {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl EdgeIx {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for EdgeIx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct NodeEntry<N> {
    id: String,
    label: N,
}

#[derive(Debug, Clone)]
struct EdgeEntry<E> {
    id: String,
    source: NodeIx,
    target: NodeIx,
    label: E,
}

#[derive(Debug, Clone)]
pub struct Graph<N, E> {
    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, NodeIx>,

    edges: Vec<EdgeEntry<E>>,
    edge_index: HashMap<String, EdgeIx>,

    incident: Vec<Vec<EdgeIx>>,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            incident: Vec::new(),
        }
    }
}

impl<N, E> Graph<N, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            node_index: HashMap::with_capacity_and_hasher(nodes, FxBuildHasher),
            edges: Vec::with_capacity(edges),
            edge_index: HashMap::with_capacity_and_hasher(edges, FxBuildHasher),
            incident: Vec::with_capacity(nodes),
        }
    }

    pub fn add_node(&mut self, id: impl Into<String>, label: N) -> Result<NodeIx> {
        let id = id.into();
        if self.node_index.contains_key(id.as_str()) {
            return Err(Error::DuplicateNode { id });
        }
        let ix = NodeIx(self.nodes.len());
        self.node_index.insert(id.clone(), ix);
        self.nodes.push(NodeEntry { id, label });
        self.incident.push(Vec::new());
        Ok(ix)
    }

    pub fn add_edge(
        &mut self,
        id: impl Into<String>,
        source: NodeIx,
        target: NodeIx,
        label: E,
    ) -> Result<EdgeIx> {
        let id = id.into();
        if self.edge_index.contains_key(id.as_str()) {
            return Err(Error::DuplicateEdge { id });
        }
        for n in [source, target] {
            if n.0 >= self.nodes.len() {
                return Err(Error::UnknownNode { id: n.to_string() });
            }
        }
        let ix = EdgeIx(self.edges.len());
        self.edge_index.insert(id.clone(), ix);
        self.edges.push(EdgeEntry {
            id,
            source,
            target,
            label,
        });
        self.incident[source.0].push(ix);
        if target != source {
            self.incident[target.0].push(ix);
        }
        Ok(ix)
    }

    /// Adds an edge between two nodes given by id.
    pub fn add_edge_by_id(
        &mut self,
        id: impl Into<String>,
        source: &str,
        target: &str,
        label: E,
    ) -> Result<EdgeIx> {
        let s = self.require_node(source)?;
        let t = self.require_node(target)?;
        self.add_edge(id, s, t, label)
    }

    pub fn require_node(&self, id: &str) -> Result<NodeIx> {
        self.node_ix(id)
            .ok_or_else(|| Error::UnknownNode { id: id.to_string() })
    }

    pub fn node_ix(&self, id: &str) -> Option<NodeIx> {
        self.node_index.get(id).copied()
    }

    pub fn edge_ix(&self, id: &str) -> Option<EdgeIx> {
        self.edge_index.get(id).copied()
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn has_edge(&self, id: &str) -> bool {
        self.edge_index.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, n: NodeIx) -> &N {
        &self.nodes[n.0].label
    }

    pub fn node_mut(&mut self, n: NodeIx) -> &mut N {
        &mut self.nodes[n.0].label
    }

    pub fn node_id(&self, n: NodeIx) -> &str {
        &self.nodes[n.0].id
    }

    pub fn edge(&self, e: EdgeIx) -> &E {
        &self.edges[e.0].label
    }

    pub fn edge_mut(&mut self, e: EdgeIx) -> &mut E {
        &mut self.edges[e.0].label
    }

    pub fn edge_id(&self, e: EdgeIx) -> &str {
        &self.edges[e.0].id
    }

    pub fn endpoints(&self, e: EdgeIx) -> (NodeIx, NodeIx) {
        let entry = &self.edges[e.0];
        (entry.source, entry.target)
    }

    pub fn source(&self, e: EdgeIx) -> NodeIx {
        self.edges[e.0].source
    }

    pub fn target(&self, e: EdgeIx) -> NodeIx {
        self.edges[e.0].target
    }

    /// The endpoint of `e` that is not `n` (`n` itself for self loops).
    pub fn other_end(&self, e: EdgeIx, n: NodeIx) -> NodeIx {
        let (s, t) = self.endpoints(e);
        if s == n { t } else { s }
    }

    pub fn incident_edges(&self, n: NodeIx) -> &[EdgeIx] {
        &self.incident[n.0]
    }

    pub fn degree(&self, n: NodeIx) -> usize {
        self.incident[n.0].len()
    }

    pub fn neighbors(&self, n: NodeIx) -> impl Iterator<Item = NodeIx> + '_ {
        self.incident[n.0].iter().map(move |&e| self.other_end(e, n))
    }

    pub fn node_indices(
        &self,
    ) -> impl DoubleEndedIterator<Item = NodeIx> + ExactSizeIterator + use<N, E> {
        (0..self.nodes.len()).map(NodeIx)
    }

    pub fn edge_indices(
        &self,
    ) -> impl DoubleEndedIterator<Item = EdgeIx> + ExactSizeIterator + use<N, E> {
        (0..self.edges.len()).map(EdgeIx)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIx, &str, &N)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeIx(i), n.id.as_str(), &n.label))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeIx, &str, &E)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeIx(i), e.id.as_str(), &e.label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_ids() {
        let mut g: Graph<(), ()> = Graph::new();
        let a = g.add_node("a", ()).unwrap();
        assert_eq!(
            g.add_node("a", ()),
            Err(Error::DuplicateNode { id: "a".into() })
        );
        let b = g.add_node("b", ()).unwrap();
        g.add_edge("ab", a, b, ()).unwrap();
        assert!(g.add_edge("ab", b, a, ()).is_err());
    }

    #[test]
    fn incidence_and_neighbors() {
        let mut g: Graph<&str, ()> = Graph::new();
        let a = g.add_node("a", "A").unwrap();
        let b = g.add_node("b", "B").unwrap();
        let c = g.add_node("c", "C").unwrap();
        g.add_edge_by_id("ab", "a", "b", ()).unwrap();
        g.add_edge_by_id("ca", "c", "a", ()).unwrap();
        assert_eq!(g.degree(a), 2);
        let ns: Vec<_> = g.neighbors(a).collect();
        assert_eq!(ns, vec![b, c]);
        assert_eq!(*g.node(c), "C");
        assert!(g.add_edge_by_id("ax", "a", "x", ()).is_err());
    }
}
