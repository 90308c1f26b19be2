use std::cell::RefCell;
use std::rc::Weak;

use crate::animation::tween::BatchAnimationSettings;

/// Change notification emitted by [`Graph`](crate::Graph) after a successful mutation.
#[derive(Clone, Debug)]
pub enum GraphEvent {
    /// One vertex was inserted.
    VertexInserted {
        /// Key of the new vertex.
        key: String,
        /// Animation hint for the insertion.
        animation: BatchAnimationSettings,
    },
    /// One vertex was removed together with its incident edges.
    VertexRemoved {
        /// Key of the removed vertex.
        key: String,
        /// Incident edges removed by the cascade, in key order.
        removed_edges: Vec<String>,
        /// Animation hint for the removal.
        animation: BatchAnimationSettings,
    },
    /// One edge was inserted.
    EdgeInserted {
        /// Key of the new edge.
        key: String,
        /// Animation hint for the insertion.
        animation: BatchAnimationSettings,
    },
    /// One edge was removed.
    EdgeRemoved {
        /// Key of the removed edge.
        key: String,
        /// Animation hint for the removal.
        animation: BatchAnimationSettings,
    },
    /// A batch of mutations applied atomically.
    BatchApplied(BatchChange),
    /// The focused vertex changed; `None` means blurred.
    FocusChanged {
        /// New focus target.
        key: Option<String>,
    },
}

/// Aggregated outcome of a batch mutation.
#[derive(Clone, Debug, Default)]
pub struct BatchChange {
    /// Vertices inserted by the batch.
    pub inserted_vertices: Vec<String>,
    /// Edges inserted by the batch.
    pub inserted_edges: Vec<String>,
    /// Vertices removed by the batch.
    pub removed_vertices: Vec<String>,
    /// Edges removed by the batch, including cascades.
    pub removed_edges: Vec<String>,
    /// Default animation plus per-entity overrides.
    pub animation: BatchAnimationSettings,
}

impl BatchChange {
    /// Return `true` when the batch touched nothing.
    pub fn is_empty(&self) -> bool {
        self.inserted_vertices.is_empty()
            && self.inserted_edges.is_empty()
            && self.removed_vertices.is_empty()
            && self.removed_edges.is_empty()
    }
}

/// Receiver of graph notifications.
pub trait GraphObserver {
    /// Called synchronously, in subscription order, before the mutating call returns.
    fn on_graph_event(&mut self, event: &GraphEvent);
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

/// Non-owning subscriber list.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: u64,
    entries: Vec<(ObserverId, Weak<RefCell<dyn GraphObserver>>)>,
}

impl ObserverRegistry {
    pub(crate) fn register(&mut self, observer: Weak<RefCell<dyn GraphObserver>>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        before != self.entries.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Deliver `event` to every live observer; dropped observers are pruned.
    pub(crate) fn dispatch(&mut self, event: &GraphEvent) {
        self.entries.retain(|(_, weak)| weak.strong_count() > 0);
        for (id, weak) in &self.entries {
            let Some(observer) = weak.upgrade() else {
                continue;
            };
            match observer.try_borrow_mut() {
                Ok(mut observer) => observer.on_graph_event(event),
                Err(_) => {
                    tracing::warn!(observer = id.0, "observer busy; notification skipped");
                }
            }
        }
    }
}
