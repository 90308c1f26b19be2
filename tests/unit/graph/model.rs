use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::graph::connections::EdgeOrder;

#[derive(Default)]
struct Recorder {
    events: Vec<GraphEvent>,
}

impl GraphObserver for Recorder {
    fn on_graph_event(&mut self, event: &GraphEvent) {
        self.events.push(event.clone());
    }
}

fn watched(graph: &mut Graph) -> Rc<RefCell<Recorder>> {
    let rec = Rc::new(RefCell::new(Recorder::default()));
    graph.subscribe(&rec);
    rec
}

fn triangle() -> Graph {
    let data = GraphData::from_json(
        r#"{
            "vertices": [{"key": "a"}, {"key": "b"}, {"key": "c", "value": {"label": "C"}}],
            "edges": [
                {"key": "ab", "vertices": ["a", "b"]},
                {"key": "bc", "vertices": ["b", "c"]},
                {"key": "ca", "vertices": ["c", "a"]}
            ]
        }"#,
    )
    .unwrap();
    Graph::from_data(GraphKind::Undirected, data).unwrap()
}

#[test]
fn builds_from_json() {
    let g = triangle();
    assert_eq!(g.vertex_count(), 3);
    assert_eq!(g.edge_count(), 3);
    assert_eq!(g.degree("a"), Some(2));
    assert_eq!(g.degree("nope"), None);
    assert_eq!(
        g.vertex("c").and_then(|v| v.value.clone()),
        Some(serde_json::json!({"label": "C"}))
    );
    assert_eq!(g.connections().neighbors("a").len(), 2);
}

#[test]
fn duplicate_keys_are_rejected_without_events() {
    let mut g = triangle();
    let rec = watched(&mut g);
    let err = g.insert_vertex(VertexData::new("a"), None).unwrap_err();
    assert!(matches!(err, GraphError::DuplicateKey(_)));
    let err = g
        .insert_edge(EdgeData::undirected("ab", "a", "c"), None)
        .unwrap_err();
    assert!(matches!(err, GraphError::DuplicateKey(_)));
    assert!(rec.borrow().events.is_empty());
}

#[test]
fn edges_need_existing_endpoints_and_matching_encoding() {
    let mut g = triangle();
    let err = g
        .insert_edge(EdgeData::undirected("ax", "a", "x"), None)
        .unwrap_err();
    assert!(matches!(err, GraphError::UnknownVertex(_)));
    let err = g
        .insert_edge(EdgeData::directed("ad", "a", "b"), None)
        .unwrap_err();
    assert!(matches!(err, GraphError::Configuration(_)));
    assert_eq!(g.edge_count(), 3);
}

#[test]
fn removing_a_vertex_cascades_in_one_event() {
    let mut g = triangle();
    let rec = watched(&mut g);
    g.remove_vertex("a", None).unwrap();

    assert_eq!(g.edge_count(), 1);
    assert!(g.has_edge("bc"));
    assert_eq!(g.connections().neighbors("b"), ["c".to_owned()]);
    let events = &rec.borrow().events;
    assert_eq!(events.len(), 1);
    match &events[0] {
        GraphEvent::VertexRemoved {
            key, removed_edges, ..
        } => {
            assert_eq!(key, "a");
            assert_eq!(removed_edges, &["ab".to_owned(), "ca".to_owned()]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unknown_removals_are_not_found() {
    let mut g = triangle();
    assert!(matches!(
        g.remove_vertex("zz", None),
        Err(GraphError::NotFound(_))
    ));
    assert!(matches!(
        g.remove_edge("zz", None),
        Err(GraphError::NotFound(_))
    ));
}

#[test]
fn failed_batch_rolls_back() {
    let mut g = triangle();
    let rec = watched(&mut g);
    let data = GraphData {
        vertices: vec![VertexData::new("d"), VertexData::new("e")],
        edges: vec![
            EdgeData::undirected("de", "d", "e"),
            EdgeData::undirected("dz", "d", "z"),
        ],
    };
    let err = g
        .insert_batch(data, BatchAnimationSettings::default())
        .unwrap_err();
    assert!(matches!(err, GraphError::UnknownVertex(_)));
    assert_eq!(g.vertex_count(), 3);
    assert!(!g.has_vertex("d"));
    assert_eq!(g.connections().len(), 3);
    assert!(rec.borrow().events.is_empty());
}

#[test]
fn batch_emits_one_aggregated_event() {
    let mut g = triangle();
    let rec = watched(&mut g);
    let change = g
        .remove_batch(
            RemovalData {
                vertices: vec!["c".to_owned()],
                edges: vec!["ab".to_owned()],
            },
            BatchAnimationSettings::default(),
        )
        .unwrap();
    assert_eq!(change.removed_vertices, vec!["c".to_owned()]);
    assert_eq!(
        change.removed_edges,
        vec!["ab".to_owned(), "bc".to_owned(), "ca".to_owned()]
    );
    assert_eq!(rec.borrow().events.len(), 1);
    assert!(matches!(rec.borrow().events[0], GraphEvent::BatchApplied(_)));
}

#[test]
fn replace_keeps_common_entities() {
    let mut g = triangle();
    let data = GraphData {
        vertices: vec![VertexData::new("a"), VertexData::new("b"), VertexData::new("n")],
        edges: vec![
            EdgeData::undirected("ab", "a", "b"),
            EdgeData::undirected("bn", "b", "n"),
        ],
    };
    let change = g
        .replace_batch(data, BatchAnimationSettings::default())
        .unwrap();
    assert_eq!(change.inserted_vertices, vec!["n".to_owned()]);
    assert_eq!(change.inserted_edges, vec!["bn".to_owned()]);
    assert_eq!(change.removed_vertices, vec!["c".to_owned()]);
    assert_eq!(change.removed_edges, vec!["bc".to_owned(), "ca".to_owned()]);
    assert!(g.has_edge("ab"));
}

#[test]
fn empty_batch_is_silent() {
    let mut g = triangle();
    let rec = watched(&mut g);
    let change = g
        .insert_batch(GraphData::default(), BatchAnimationSettings::default())
        .unwrap();
    assert!(change.is_empty());
    assert!(rec.borrow().events.is_empty());
}

#[test]
fn focus_follows_vertex_lifetime() {
    let mut g = triangle();
    let rec = watched(&mut g);
    assert!(matches!(g.focus("zz"), Err(GraphError::NotFound(_))));
    g.focus("b").unwrap();
    g.focus("b").unwrap();
    assert_eq!(g.focused(), Some("b"));
    g.remove_vertex("b", None).unwrap();
    assert_eq!(g.focused(), None);
    g.blur();

    let focus_events = rec
        .borrow()
        .events
        .iter()
        .filter_map(|e| match e {
            GraphEvent::FocusChanged { key } => Some(key.clone()),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(focus_events, vec![Some("b".to_owned()), None]);
}

#[test]
fn dropped_observers_are_pruned() {
    let mut g = triangle();
    let rec = watched(&mut g);
    let id = {
        let other = Rc::new(RefCell::new(Recorder::default()));
        g.subscribe(&other)
    };
    g.insert_vertex(VertexData::new("d"), None).unwrap();
    assert_eq!(rec.borrow().events.len(), 1);
    assert!(!g.unsubscribe(id));
}

#[test]
fn adjacency_cache_tracks_mutations() {
    let mut g = triangle();
    assert_eq!(g.connections().degree("a"), 2);
    g.insert_vertex(VertexData::new("d"), None).unwrap();
    g.insert_edge(EdgeData::undirected("ad", "a", "d"), None)
        .unwrap();
    g.insert_edge(EdgeData::undirected("ad2", "d", "a"), None)
        .unwrap();
    assert_eq!(g.connections().degree("a"), 4);
    assert_eq!(
        g.ordered_edges().get("ad2"),
        Some(EdgeOrder { order: 1, count: 2 })
    );
    g.remove_edge("ad", None).unwrap();
    assert_eq!(g.connections().degree("a"), 3);
    assert_eq!(
        g.ordered_edges().get("ad2"),
        Some(EdgeOrder { order: 0, count: 1 })
    );
}

#[test]
fn removals_keep_remaining_entities_addressable() {
    let mut g = triangle();
    g.insert_edge(EdgeData::undirected("cc", "c", "c"), None)
        .unwrap();
    let keys = |g: &Graph, key: &str| {
        g.incident_edges(key)
            .into_iter()
            .map(|e| e.key.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(keys(&g, "c"), ["bc", "ca", "cc"]);

    g.remove_vertex("a", None).unwrap();
    assert_eq!(keys(&g, "b"), ["bc"]);
    assert_eq!(g.edge("bc").map(|e| e.ends.keys()), Some(("b", "c")));

    g.insert_vertex(VertexData::new("a"), None).unwrap();
    g.insert_edge(EdgeData::undirected("ab", "a", "b"), None)
        .unwrap();
    assert_eq!(g.vertices().map(|v| v.key.as_str()).collect::<Vec<_>>(), ["a", "b", "c"]);
    assert_eq!(g.edges().map(|e| e.key.as_str()).collect::<Vec<_>>(), ["ab", "bc", "cc"]);

    let removed = g.remove_vertex("c", None).unwrap();
    assert_eq!(removed.key, "c");
    assert!(!g.has_edge("cc"));
    assert_eq!(g.edge_count(), 1);
    assert_eq!(g.degree("b"), Some(1));
}
