use super::*;
use crate::graph::events::GraphEvent;
use crate::graph::model::GraphKind;

struct Meddler {
    graph: SharedGraph,
    errors: Vec<GraphError>,
    seen_read: Option<bool>,
}

impl GraphObserver for Meddler {
    fn on_graph_event(&mut self, _event: &GraphEvent) {
        if let Err(err) = self.graph.insert_vertex(VertexData::new("sneaky"), None) {
            self.errors.push(err);
        }
        self.seen_read = Some(self.graph.read(|g| g.vertex_count()).is_ok());
    }
}

#[test]
fn mutation_from_a_notification_is_refused() {
    let graph = SharedGraph::new(Graph::new(GraphKind::Undirected));
    let meddler = Rc::new(RefCell::new(Meddler {
        graph: graph.clone(),
        errors: Vec::new(),
        seen_read: None,
    }));
    graph.subscribe(&meddler).unwrap();

    graph.insert_vertex(VertexData::new("a"), None).unwrap();

    let m = meddler.borrow();
    assert_eq!(m.errors.len(), 1);
    assert!(matches!(m.errors[0], GraphError::Reentrancy(_)));
    assert_eq!(m.seen_read, Some(false));
    assert!(graph.has_vertex("a"));
    assert!(!graph.has_vertex("sneaky"));
}

#[test]
fn handles_share_one_graph() {
    let a = SharedGraph::new(Graph::new(GraphKind::Directed));
    let b = a.clone();
    a.insert_vertex(VertexData::new("x"), None).unwrap();
    b.insert_vertex(VertexData::new("y"), None).unwrap();
    b.insert_edge(EdgeData::directed("xy", "x", "y"), None)
        .unwrap();
    assert!(a.has_edge("xy"));
    assert_eq!(a.get_vertex("y").map(|v| v.key), Some("y".to_owned()));
    assert!(a.get_edge("nope").is_none());

    a.focus("x").unwrap();
    assert_eq!(b.read(|g| g.focused().map(str::to_owned)).unwrap(), Some("x".to_owned()));
    b.blur().unwrap();
    b.remove_vertex("x", None).unwrap();
    assert!(!a.has_edge("xy"));
}
