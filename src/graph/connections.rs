use std::collections::{BTreeMap, BTreeSet};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;

use crate::graph::model::{Edge, GraphKind};

/// Adjacency view derived from the edge set.
///
/// Every vertex key is present, including isolated vertices. A neighbor appears once per
/// connecting edge, so a self-loop lists the vertex itself twice and a neighbor list's length is
/// the vertex degree.
#[derive(Clone, Debug)]
pub struct Connections {
    kind: GraphKind,
    // Nodes are added in key order, so node indices sort like keys.
    graph: DiGraph<String, ()>,
    index: BTreeMap<String, NodeIndex>,
    neighbors: Vec<Vec<String>>,
}

impl Connections {
    pub(crate) fn build<'a>(
        kind: GraphKind,
        vertex_keys: impl IntoIterator<Item = &'a str>,
        edges: impl IntoIterator<Item = &'a Edge>,
    ) -> Self {
        let keys = vertex_keys.into_iter().collect::<BTreeSet<_>>();
        let mut graph = DiGraph::with_capacity(keys.len(), 0);
        let index = keys
            .into_iter()
            .map(|k| (k.to_owned(), graph.add_node(k.to_owned())))
            .collect::<BTreeMap<_, _>>();
        for edge in edges {
            let (a, b) = edge.ends.keys();
            if let (Some(&a), Some(&b)) = (index.get(a), index.get(b)) {
                graph.add_edge(a, b, ());
            }
        }

        let mut neighbors = vec![Vec::new(); graph.node_count()];
        for edge in graph.edge_references() {
            let (a, b) = (edge.source(), edge.target());
            neighbors[a.index()].push(graph[b].clone());
            neighbors[b.index()].push(graph[a].clone());
        }
        Self {
            kind,
            graph,
            index,
            neighbors,
        }
    }

    /// Build from plain key pairs; pairs naming unknown vertices are ignored.
    ///
    /// For directed graphs each pair is `(source, target)`.
    pub fn from_pairs(kind: GraphKind, vertices: &[&str], pairs: &[(&str, &str)]) -> Self {
        let edges = pairs
            .iter()
            .enumerate()
            .map(|(i, (a, b))| Edge::between(kind, format!("e{i}"), a, b))
            .collect::<Vec<_>>();
        Self::build(kind, vertices.iter().copied(), edges.iter())
    }

    /// Directedness of the source graph.
    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    /// Vertex keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Neighbors of `key`, or an empty slice for unknown keys.
    pub fn neighbors(&self, key: &str) -> &[String] {
        self.index
            .get(key)
            .and_then(|i| self.neighbors.get(i.index()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of incoming edges; always `0` for undirected graphs.
    pub fn in_degree(&self, key: &str) -> usize {
        match (self.kind, self.index.get(key)) {
            (GraphKind::Directed, Some(&node)) => {
                self.graph.edges_directed(node, Direction::Incoming).count()
            }
            _ => 0,
        }
    }

    /// Degree (neighbor list length).
    pub fn degree(&self, key: &str) -> usize {
        self.neighbors(key).len()
    }

    /// Return `true` when `key` is a vertex.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Return `true` when there are no vertices.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Weakly connected components, each sorted by key, ordered by their smallest key.
    pub fn components(&self) -> Vec<Vec<String>> {
        let mut sets = UnionFind::<usize>::new(self.graph.node_count());
        for edge in self.graph.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }
        let mut slots = BTreeMap::<usize, usize>::new();
        let mut out = Vec::<Vec<String>>::new();
        for node in self.graph.node_indices() {
            let root = sets.find(node.index());
            let slot = *slots.entry(root).or_insert_with(|| {
                out.push(Vec::new());
                out.len() - 1
            });
            out[slot].push(self.graph[node].clone());
        }
        out
    }
}

/// Fan-out slot of one edge among the parallel edges joining the same vertex pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EdgeOrder {
    /// Index in `0..count`.
    pub order: usize,
    /// Number of edges joining this pair.
    pub count: usize,
}

/// Edge ordering for every edge, grouped by unordered vertex pair.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderedEdges {
    orders: BTreeMap<String, EdgeOrder>,
}

impl OrderedEdges {
    pub(crate) fn build<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> Self {
        let mut groups = BTreeMap::<(String, String), Vec<&str>>::new();
        for edge in edges {
            groups
                .entry(edge.ends.pair_key())
                .or_default()
                .push(edge.key.as_str());
        }
        let mut orders = BTreeMap::new();
        for mut keys in groups.into_values() {
            keys.sort_unstable();
            let count = keys.len();
            for (order, key) in keys.into_iter().enumerate() {
                orders.insert(key.to_owned(), EdgeOrder { order, count });
            }
        }
        Self { orders }
    }

    /// Ordering of `edge_key`, if it exists.
    pub fn get(&self, edge_key: &str) -> Option<EdgeOrder> {
        self.orders.get(edge_key).copied()
    }

    /// All `(edge key, order)` entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, EdgeOrder)> {
        self.orders.iter().map(|(k, o)| (k.as_str(), *o))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/connections.rs"]
mod tests;
