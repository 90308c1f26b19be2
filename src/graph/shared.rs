use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::tween::{AnimationSettings, BatchAnimationSettings};
use crate::foundation::error::{GraphError, GraphResult};
use crate::graph::events::{BatchChange, GraphObserver, ObserverId};
use crate::graph::model::{Edge, EdgeData, Graph, GraphData, RemovalData, Vertex, VertexData};

/// Cloneable handle to a [`Graph`] shared between the host and the engine.
///
/// Observers are notified while the graph is still borrowed, so any access through a handle from
/// inside a notification fails fast with [`GraphError::Reentrancy`] instead of corrupting the
/// adjacency cache.
#[derive(Clone, Debug)]
pub struct SharedGraph {
    inner: Rc<RefCell<Graph>>,
}

impl SharedGraph {
    /// Wrap a graph.
    pub fn new(graph: Graph) -> Self {
        Self {
            inner: Rc::new(RefCell::new(graph)),
        }
    }

    /// Run `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&Graph) -> R) -> GraphResult<R> {
        let graph = self
            .inner
            .try_borrow()
            .map_err(|_| GraphError::reentrancy("graph read while a mutation is in progress"))?;
        Ok(f(&graph))
    }

    /// Run `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut Graph) -> GraphResult<R>) -> GraphResult<R> {
        let mut graph = self.inner.try_borrow_mut().map_err(|_| {
            GraphError::reentrancy("graph mutated from inside one of its own notifications")
        })?;
        f(&mut graph)
    }

    /// See [`Graph::insert_vertex`].
    pub fn insert_vertex(
        &self,
        data: VertexData,
        animation: Option<AnimationSettings>,
    ) -> GraphResult<Vertex> {
        self.write(|g| g.insert_vertex(data, animation))
    }

    /// See [`Graph::insert_edge`].
    pub fn insert_edge(
        &self,
        data: EdgeData,
        animation: Option<AnimationSettings>,
    ) -> GraphResult<Edge> {
        self.write(|g| g.insert_edge(data, animation))
    }

    /// See [`Graph::remove_vertex`].
    pub fn remove_vertex(
        &self,
        key: &str,
        animation: Option<AnimationSettings>,
    ) -> GraphResult<Vertex> {
        self.write(|g| g.remove_vertex(key, animation))
    }

    /// See [`Graph::remove_edge`].
    pub fn remove_edge(&self, key: &str, animation: Option<AnimationSettings>) -> GraphResult<Edge> {
        self.write(|g| g.remove_edge(key, animation))
    }

    /// See [`Graph::insert_batch`].
    pub fn insert_batch(
        &self,
        data: GraphData,
        animation: BatchAnimationSettings,
    ) -> GraphResult<BatchChange> {
        self.write(|g| g.insert_batch(data, animation))
    }

    /// See [`Graph::remove_batch`].
    pub fn remove_batch(
        &self,
        data: RemovalData,
        animation: BatchAnimationSettings,
    ) -> GraphResult<BatchChange> {
        self.write(|g| g.remove_batch(data, animation))
    }

    /// See [`Graph::replace_batch`].
    pub fn replace_batch(
        &self,
        data: GraphData,
        animation: BatchAnimationSettings,
    ) -> GraphResult<BatchChange> {
        self.write(|g| g.replace_batch(data, animation))
    }

    /// See [`Graph::focus`].
    pub fn focus(&self, key: &str) -> GraphResult<()> {
        self.write(|g| g.focus(key))
    }

    /// See [`Graph::blur`].
    pub fn blur(&self) -> GraphResult<()> {
        self.write(|g| {
            g.blur();
            Ok(())
        })
    }

    /// Cloned vertex, or `None` when absent or when the graph is busy.
    pub fn get_vertex(&self, key: &str) -> Option<Vertex> {
        self.read(|g| g.vertex(key).cloned()).ok().flatten()
    }

    /// Cloned edge, or `None` when absent or when the graph is busy.
    pub fn get_edge(&self, key: &str) -> Option<Edge> {
        self.read(|g| g.edge(key).cloned()).ok().flatten()
    }

    /// Return `true` when the vertex exists.
    pub fn has_vertex(&self, key: &str) -> bool {
        self.read(|g| g.has_vertex(key)).unwrap_or(false)
    }

    /// Return `true` when the edge exists.
    pub fn has_edge(&self, key: &str) -> bool {
        self.read(|g| g.has_edge(key)).unwrap_or(false)
    }

    /// See [`Graph::subscribe`].
    pub fn subscribe<O: GraphObserver + 'static>(
        &self,
        observer: &Rc<RefCell<O>>,
    ) -> GraphResult<ObserverId> {
        self.write(|g| Ok(g.subscribe(observer)))
    }

    /// See [`Graph::unsubscribe`].
    pub fn unsubscribe(&self, id: ObserverId) -> GraphResult<bool> {
        self.write(|g| Ok(g.unsubscribe(id)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/shared.rs"]
mod tests;
