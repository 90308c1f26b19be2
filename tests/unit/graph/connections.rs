use super::*;

#[test]
fn isolated_vertices_are_present() {
    let c = Connections::from_pairs(GraphKind::Undirected, &["a", "b", "lonely"], &[("a", "b")]);
    assert_eq!(c.len(), 3);
    assert!(c.contains("lonely"));
    assert!(c.neighbors("lonely").is_empty());
    assert_eq!(c.neighbors("a"), ["b".to_owned()]);
    assert_eq!(c.neighbors("b"), ["a".to_owned()]);
}

#[test]
fn parallel_edges_and_self_loops_count_per_edge() {
    let c = Connections::from_pairs(
        GraphKind::Undirected,
        &["a", "b"],
        &[("a", "b"), ("b", "a"), ("a", "a")],
    );
    assert_eq!(c.degree("a"), 4);
    assert_eq!(c.degree("b"), 2);
    assert_eq!(c.neighbors("a").iter().filter(|n| *n == "a").count(), 2);
}

#[test]
fn in_degree_only_counts_directed_targets() {
    let directed = Connections::from_pairs(GraphKind::Directed, &["s", "t"], &[("s", "t")]);
    assert_eq!(directed.in_degree("s"), 0);
    assert_eq!(directed.in_degree("t"), 1);

    let undirected = Connections::from_pairs(GraphKind::Undirected, &["s", "t"], &[("s", "t")]);
    assert_eq!(undirected.in_degree("t"), 0);
    assert_eq!(undirected.in_degree("missing"), 0);
}

#[test]
fn directed_self_loop_counts_once_toward_in_degree() {
    let c = Connections::from_pairs(GraphKind::Directed, &["a", "b"], &[("a", "a"), ("b", "a")]);
    assert_eq!(c.in_degree("a"), 2);
    assert_eq!(c.degree("a"), 3);
}

#[test]
fn pairs_with_unknown_ends_are_ignored() {
    let c = Connections::from_pairs(GraphKind::Undirected, &["a"], &[("a", "ghost")]);
    assert!(c.neighbors("a").is_empty());
    assert!(!c.contains("ghost"));
    assert_eq!(c.components(), vec![vec!["a".to_owned()]]);
}

#[test]
fn components_ignore_direction() {
    let c = Connections::from_pairs(
        GraphKind::Directed,
        &["d", "c", "b", "a", "z"],
        &[("b", "a"), ("c", "d")],
    );
    assert_eq!(
        c.components(),
        vec![
            vec!["a".to_owned(), "b".to_owned()],
            vec!["c".to_owned(), "d".to_owned()],
            vec!["z".to_owned()],
        ]
    );
}

#[test]
fn parallel_edges_get_distinct_orders() {
    let edges = [
        Edge::between(GraphKind::Undirected, "e2".into(), "b", "a"),
        Edge::between(GraphKind::Undirected, "e1".into(), "a", "b"),
        Edge::between(GraphKind::Undirected, "e3".into(), "b", "c"),
    ];
    let ordered = OrderedEdges::build(edges.iter());
    assert_eq!(ordered.get("e1"), Some(EdgeOrder { order: 0, count: 2 }));
    assert_eq!(ordered.get("e2"), Some(EdgeOrder { order: 1, count: 2 }));
    assert_eq!(ordered.get("e3"), Some(EdgeOrder { order: 0, count: 1 }));
    assert_eq!(ordered.get("nope"), None);
    assert_eq!(ordered.iter().count(), 3);
}
