use std::cell::{OnceCell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;

use crate::animation::tween::{AnimationSettings, BatchAnimationSettings};
use crate::foundation::error::{GraphError, GraphResult};
use crate::graph::connections::{Connections, OrderedEdges};
use crate::graph::events::{BatchChange, GraphEvent, GraphObserver, ObserverId, ObserverRegistry};

/// Directedness of a graph, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphKind {
    /// Edges run from `source` to `target`.
    Directed,
    /// Edges join an unordered pair.
    Undirected,
}

/// A graph vertex.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vertex {
    /// Unique key.
    pub key: String,
    /// Opaque payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

/// Endpoints of an edge; never change after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeEnds {
    /// Directed edge.
    Directed {
        /// Tail vertex key.
        source: String,
        /// Head vertex key.
        target: String,
    },
    /// Undirected edge; both keys may be equal for a self-loop.
    Undirected([String; 2]),
}

impl EdgeEnds {
    /// Endpoint keys in stored order.
    pub fn keys(&self) -> (&str, &str) {
        match self {
            Self::Directed { source, target } => (source, target),
            Self::Undirected([a, b]) => (a, b),
        }
    }

    /// Unordered pair used to group parallel edges.
    pub fn pair_key(&self) -> (String, String) {
        let (a, b) = self.keys();
        if a <= b {
            (a.to_owned(), b.to_owned())
        } else {
            (b.to_owned(), a.to_owned())
        }
    }

    /// Return `true` when `key` is one of the endpoints.
    pub fn touches(&self, key: &str) -> bool {
        let (a, b) = self.keys();
        a == key || b == key
    }
}

/// A graph edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    /// Unique key across the whole graph.
    pub key: String,
    /// Opaque payload.
    pub value: Option<serde_json::Value>,
    /// Endpoints.
    pub ends: EdgeEnds,
}

impl Edge {
    pub(crate) fn between(kind: GraphKind, key: String, a: &str, b: &str) -> Self {
        let ends = match kind {
            GraphKind::Directed => EdgeEnds::Directed {
                source: a.to_owned(),
                target: b.to_owned(),
            },
            GraphKind::Undirected => EdgeEnds::Undirected([a.to_owned(), b.to_owned()]),
        };
        Self {
            key,
            value: None,
            ends,
        }
    }
}

/// Vertex construction input.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VertexData {
    /// Unique key.
    pub key: String,
    /// Opaque payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl VertexData {
    /// Vertex input with no payload.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }
}

/// Endpoint encoding of an [`EdgeData`]: `from`/`to` for directed graphs, `vertices` otherwise.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum EdgeEndsData {
    /// Directed endpoints.
    Directed {
        /// Source vertex key.
        from: String,
        /// Target vertex key.
        to: String,
    },
    /// Undirected endpoints.
    Undirected {
        /// The two vertex keys.
        vertices: [String; 2],
    },
}

/// Edge construction input.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EdgeData {
    /// Unique key.
    pub key: String,
    /// Opaque payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Endpoints.
    #[serde(flatten)]
    pub ends: EdgeEndsData,
}

impl EdgeData {
    /// Directed edge input.
    pub fn directed(key: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            ends: EdgeEndsData::Directed {
                from: from.into(),
                to: to.into(),
            },
        }
    }

    /// Undirected edge input.
    pub fn undirected(key: impl Into<String>, a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            ends: EdgeEndsData::Undirected {
                vertices: [a.into(), b.into()],
            },
        }
    }
}

/// Whole-graph construction input.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GraphData {
    /// Vertices to insert.
    pub vertices: Vec<VertexData>,
    /// Edges to insert, after all vertices.
    pub edges: Vec<EdgeData>,
}

impl GraphData {
    /// Parse from JSON.
    pub fn from_json(s: &str) -> GraphResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Keys to remove in one batch.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RemovalData {
    /// Vertex keys; incident edges cascade.
    pub vertices: Vec<String>,
    /// Edge keys.
    pub edges: Vec<String>,
}

/// Vertices and edges live in a stable graph so indices survive removals; the key maps give
/// key-ordered iteration. Undirected edges are stored in their given endpoint order.
#[derive(Clone, Debug, Default)]
struct GraphStore {
    graph: StableDiGraph<Vertex, Edge>,
    vertices: BTreeMap<String, NodeIndex>,
    edges: BTreeMap<String, EdgeIndex>,
}

impl GraphStore {
    fn vertex(&self, key: &str) -> Option<&Vertex> {
        self.vertices
            .get(key)
            .and_then(|&i| self.graph.node_weight(i))
    }

    fn edge(&self, key: &str) -> Option<&Edge> {
        self.edges.get(key).and_then(|&i| self.graph.edge_weight(i))
    }

    /// Keys of every edge touching `key`, sorted; a self-loop is listed once.
    fn incident(&self, key: &str) -> BTreeSet<&str> {
        let Some(&node) = self.vertices.get(key) else {
            return BTreeSet::new();
        };
        [Direction::Outgoing, Direction::Incoming]
            .into_iter()
            .flat_map(|dir| self.graph.edges_directed(node, dir))
            .filter_map(|e| self.graph.edge_weight(e.id()))
            .map(|edge| edge.key.as_str())
            .collect()
    }
}

/// Graph model: vertices, edges, derived adjacency and change notification.
///
/// Mutations are validated before anything changes; a failed call leaves the graph untouched and
/// notifies nobody.
pub struct Graph {
    kind: GraphKind,
    store: GraphStore,
    focused: Option<String>,
    observers: ObserverRegistry,
    connections: OnceCell<Connections>,
    ordered_edges: OnceCell<OrderedEdges>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("kind", &self.kind)
            .field("vertices", &self.store.vertices.len())
            .field("edges", &self.store.edges.len())
            .field("focused", &self.focused)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Graph {
    /// Empty graph.
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            store: GraphStore::default(),
            focused: None,
            observers: ObserverRegistry::default(),
            connections: OnceCell::new(),
            ordered_edges: OnceCell::new(),
        }
    }

    /// Build a graph from construction input.
    pub fn from_data(kind: GraphKind, data: GraphData) -> GraphResult<Self> {
        let mut graph = Self::new(kind);
        for v in data.vertices {
            graph.apply_insert_vertex(v)?;
        }
        for e in data.edges {
            graph.apply_insert_edge(e)?;
        }
        Ok(graph)
    }

    /// Directedness.
    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    /// Look up a vertex.
    pub fn vertex(&self, key: &str) -> Option<&Vertex> {
        self.store.vertex(key)
    }

    /// Look up an edge.
    pub fn edge(&self, key: &str) -> Option<&Edge> {
        self.store.edge(key)
    }

    /// Return `true` when the vertex exists.
    pub fn has_vertex(&self, key: &str) -> bool {
        self.store.vertices.contains_key(key)
    }

    /// Return `true` when the edge exists.
    pub fn has_edge(&self, key: &str) -> bool {
        self.store.edges.contains_key(key)
    }

    /// Vertices in key order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.store
            .vertices
            .values()
            .filter_map(|&i| self.store.graph.node_weight(i))
    }

    /// Edges in key order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.store
            .edges
            .values()
            .filter_map(|&i| self.store.graph.edge_weight(i))
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.store.vertices.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.store.edges.len()
    }

    /// Edges touching `key`, in key order.
    pub fn incident_edges(&self, key: &str) -> Vec<&Edge> {
        self.store
            .incident(key)
            .into_iter()
            .filter_map(|k| self.store.edge(k))
            .collect()
    }

    /// Degree of `key`; a self-loop counts twice.
    pub fn degree(&self, key: &str) -> Option<usize> {
        self.has_vertex(key)
            .then(|| self.connections().degree(key))
    }

    /// Currently focused vertex.
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Adjacency view, rebuilt lazily after each mutation.
    pub fn connections(&self) -> &Connections {
        self.connections.get_or_init(|| {
            Connections::build(
                self.kind,
                self.store.vertices.keys().map(String::as_str),
                self.edges(),
            )
        })
    }

    /// Parallel-edge ordering, rebuilt lazily after each mutation.
    pub fn ordered_edges(&self) -> &OrderedEdges {
        self.ordered_edges
            .get_or_init(|| OrderedEdges::build(self.edges()))
    }

    /// Register an observer. The graph keeps only a weak reference.
    pub fn subscribe<O: GraphObserver + 'static>(&mut self, observer: &Rc<RefCell<O>>) -> ObserverId {
        let dynamic: Rc<RefCell<dyn GraphObserver>> = observer.clone();
        self.observers.register(Rc::downgrade(&dynamic))
    }

    /// Remove an observer; returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    /// Insert one vertex.
    pub fn insert_vertex(
        &mut self,
        data: VertexData,
        animation: Option<AnimationSettings>,
    ) -> GraphResult<Vertex> {
        let vertex = self.apply_insert_vertex(data)?;
        self.notify(GraphEvent::VertexInserted {
            key: vertex.key.clone(),
            animation: BatchAnimationSettings::from_hint(animation),
        });
        Ok(vertex)
    }

    /// Insert one edge; both endpoints must exist.
    pub fn insert_edge(
        &mut self,
        data: EdgeData,
        animation: Option<AnimationSettings>,
    ) -> GraphResult<Edge> {
        let edge = self.apply_insert_edge(data)?;
        self.notify(GraphEvent::EdgeInserted {
            key: edge.key.clone(),
            animation: BatchAnimationSettings::from_hint(animation),
        });
        Ok(edge)
    }

    /// Remove one vertex and, first, every incident edge.
    ///
    /// Emits a single [`GraphEvent::VertexRemoved`] listing the cascaded edges.
    pub fn remove_vertex(
        &mut self,
        key: &str,
        animation: Option<AnimationSettings>,
    ) -> GraphResult<Vertex> {
        let was_focused = self.focused.as_deref() == Some(key);
        let (vertex, removed_edges) = self.apply_remove_vertex(key)?;
        self.notify(GraphEvent::VertexRemoved {
            key: vertex.key.clone(),
            removed_edges,
            animation: BatchAnimationSettings::from_hint(animation),
        });
        if was_focused {
            self.notify(GraphEvent::FocusChanged { key: None });
        }
        Ok(vertex)
    }

    /// Remove one edge.
    pub fn remove_edge(
        &mut self,
        key: &str,
        animation: Option<AnimationSettings>,
    ) -> GraphResult<Edge> {
        let edge = self.apply_remove_edge(key)?;
        self.notify(GraphEvent::EdgeRemoved {
            key: edge.key.clone(),
            animation: BatchAnimationSettings::from_hint(animation),
        });
        Ok(edge)
    }

    /// Insert many vertices and edges atomically with one notification.
    #[tracing::instrument(skip(self, data, animation), fields(vertices = data.vertices.len(), edges = data.edges.len()))]
    pub fn insert_batch(
        &mut self,
        data: GraphData,
        animation: BatchAnimationSettings,
    ) -> GraphResult<BatchChange> {
        let change = self.transaction(animation, |graph, change| {
            for v in data.vertices {
                change.inserted_vertices.push(graph.apply_insert_vertex(v)?.key);
            }
            for e in data.edges {
                change.inserted_edges.push(graph.apply_insert_edge(e)?.key);
            }
            Ok(())
        })?;
        Ok(change)
    }

    /// Remove many vertices and edges atomically with one notification.
    #[tracing::instrument(skip(self, data, animation), fields(vertices = data.vertices.len(), edges = data.edges.len()))]
    pub fn remove_batch(
        &mut self,
        data: RemovalData,
        animation: BatchAnimationSettings,
    ) -> GraphResult<BatchChange> {
        self.transaction(animation, |graph, change| {
            for key in &data.edges {
                change.removed_edges.push(graph.apply_remove_edge(key)?.key);
            }
            for key in &data.vertices {
                let (vertex, cascaded) = graph.apply_remove_vertex(key)?;
                change.removed_vertices.push(vertex.key);
                change.removed_edges.extend(cascaded);
            }
            Ok(())
        })
    }

    /// Make the graph match `data`: drop what is absent, insert what is new, keep the rest.
    #[tracing::instrument(skip(self, data, animation), fields(vertices = data.vertices.len(), edges = data.edges.len()))]
    pub fn replace_batch(
        &mut self,
        data: GraphData,
        animation: BatchAnimationSettings,
    ) -> GraphResult<BatchChange> {
        self.transaction(animation, |graph, change| {
            let wanted_vertices = data
                .vertices
                .iter()
                .map(|v| v.key.as_str())
                .collect::<BTreeSet<_>>();
            let wanted_edges = data
                .edges
                .iter()
                .map(|e| e.key.as_str())
                .collect::<BTreeSet<_>>();

            let stale_edges = graph
                .store
                .edges
                .keys()
                .filter(|k| !wanted_edges.contains(k.as_str()))
                .cloned()
                .collect::<Vec<_>>();
            for key in stale_edges {
                change.removed_edges.push(graph.apply_remove_edge(&key)?.key);
            }
            let stale_vertices = graph
                .store
                .vertices
                .keys()
                .filter(|k| !wanted_vertices.contains(k.as_str()))
                .cloned()
                .collect::<Vec<_>>();
            for key in stale_vertices {
                let (vertex, cascaded) = graph.apply_remove_vertex(&key)?;
                change.removed_vertices.push(vertex.key);
                change.removed_edges.extend(cascaded);
            }

            for v in data.vertices {
                if !graph.has_vertex(&v.key) {
                    change.inserted_vertices.push(graph.apply_insert_vertex(v)?.key);
                }
            }
            for e in data.edges {
                if !graph.has_edge(&e.key) {
                    change.inserted_edges.push(graph.apply_insert_edge(e)?.key);
                }
            }
            Ok(())
        })
    }

    /// Focus a vertex.
    pub fn focus(&mut self, key: &str) -> GraphResult<()> {
        if !self.has_vertex(key) {
            return Err(GraphError::not_found(format!("vertex '{key}'")));
        }
        if self.focused.as_deref() == Some(key) {
            return Ok(());
        }
        self.focused = Some(key.to_owned());
        self.notify(GraphEvent::FocusChanged {
            key: self.focused.clone(),
        });
        Ok(())
    }

    /// Clear focus; a no-op when nothing is focused.
    pub fn blur(&mut self) {
        if self.focused.take().is_some() {
            self.notify(GraphEvent::FocusChanged { key: None });
        }
    }

    fn transaction(
        &mut self,
        animation: BatchAnimationSettings,
        apply: impl FnOnce(&mut Self, &mut BatchChange) -> GraphResult<()>,
    ) -> GraphResult<BatchChange> {
        let snapshot = self.store.clone();
        let focused = self.focused.clone();
        let mut change = BatchChange {
            animation,
            ..BatchChange::default()
        };
        if let Err(err) = apply(self, &mut change) {
            self.store = snapshot;
            self.focused = focused;
            self.invalidate();
            return Err(err);
        }
        if !change.is_empty() {
            self.notify(GraphEvent::BatchApplied(change.clone()));
        }
        if focused.is_some() && self.focused.is_none() {
            self.notify(GraphEvent::FocusChanged { key: None });
        }
        Ok(change)
    }

    fn apply_insert_vertex(&mut self, data: VertexData) -> GraphResult<Vertex> {
        if self.store.vertices.contains_key(&data.key) {
            return Err(GraphError::duplicate_key(format!("vertex '{}'", data.key)));
        }
        let vertex = Vertex {
            key: data.key,
            value: data.value,
        };
        let node = self.store.graph.add_node(vertex.clone());
        self.store.vertices.insert(vertex.key.clone(), node);
        self.invalidate();
        Ok(vertex)
    }

    fn apply_insert_edge(&mut self, data: EdgeData) -> GraphResult<Edge> {
        if self.store.edges.contains_key(&data.key) {
            return Err(GraphError::duplicate_key(format!("edge '{}'", data.key)));
        }
        let ends = match (self.kind, data.ends) {
            (GraphKind::Directed, EdgeEndsData::Directed { from, to }) => EdgeEnds::Directed {
                source: from,
                target: to,
            },
            (GraphKind::Undirected, EdgeEndsData::Undirected { vertices }) => {
                EdgeEnds::Undirected(vertices)
            }
            (GraphKind::Directed, EdgeEndsData::Undirected { .. }) => {
                return Err(GraphError::configuration(format!(
                    "edge '{}': directed graphs take 'from'/'to' endpoints",
                    data.key
                )));
            }
            (GraphKind::Undirected, EdgeEndsData::Directed { .. }) => {
                return Err(GraphError::configuration(format!(
                    "edge '{}': undirected graphs take a 'vertices' pair",
                    data.key
                )));
            }
        };
        let (a, b) = ends.keys();
        let endpoint = |end: &str| {
            self.store.vertices.get(end).copied().ok_or_else(|| {
                GraphError::unknown_vertex(format!(
                    "edge '{}' references missing vertex '{end}'",
                    data.key
                ))
            })
        };
        let (a, b) = (endpoint(a)?, endpoint(b)?);
        let edge = Edge {
            key: data.key,
            value: data.value,
            ends,
        };
        let index = self.store.graph.add_edge(a, b, edge.clone());
        self.store.edges.insert(edge.key.clone(), index);
        self.invalidate();
        Ok(edge)
    }

    fn apply_remove_edge(&mut self, key: &str) -> GraphResult<Edge> {
        let edge = self
            .store
            .edges
            .remove(key)
            .and_then(|i| self.store.graph.remove_edge(i))
            .ok_or_else(|| GraphError::not_found(format!("edge '{key}'")))?;
        self.invalidate();
        Ok(edge)
    }

    fn apply_remove_vertex(&mut self, key: &str) -> GraphResult<(Vertex, Vec<String>)> {
        if !self.store.vertices.contains_key(key) {
            return Err(GraphError::not_found(format!("vertex '{key}'")));
        }
        let incident = self
            .store
            .incident(key)
            .into_iter()
            .map(str::to_owned)
            .collect::<Vec<_>>();
        for edge_key in &incident {
            self.apply_remove_edge(edge_key)?;
        }
        let vertex = self
            .store
            .vertices
            .remove(key)
            .and_then(|i| self.store.graph.remove_node(i))
            .ok_or_else(|| GraphError::not_found(format!("vertex '{key}'")))?;
        if self.focused.as_deref() == Some(key) {
            self.focused = None;
        }
        self.invalidate();
        Ok((vertex, incident))
    }

    fn invalidate(&mut self) {
        self.connections = OnceCell::new();
        self.ordered_edges = OnceCell::new();
    }

    fn notify(&mut self, event: GraphEvent) {
        tracing::trace!(?event, "graph event");
        self.observers.dispatch(&event);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/model.rs"]
mod tests;
