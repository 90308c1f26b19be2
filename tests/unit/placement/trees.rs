use super::*;

fn directed(vertices: &[&str], edges: &[(&str, &str)]) -> Connections {
    Connections::from_pairs(GraphKind::Directed, vertices, edges)
}

#[test]
fn parent_is_centered_above_children() {
    let c = directed(
        &["root", "A", "B", "C"],
        &[("root", "A"), ("root", "B"), ("A", "C")],
    );
    let out = place(&c, 20.0, &TreesSettings::default()).unwrap();
    let (root, a, b, cc) = (out["root"], out["A"], out["B"], out["C"]);

    assert!(root.y < a.y);
    assert_eq!(a.y, b.y);
    assert!(cc.y > a.y);
    assert!(a.x < b.x);
    assert!((root.x - (a.x + b.x) / 2.0).abs() < 1e-9);
    assert!((cc.x - a.x).abs() < 1e-9);
    // Row and column pitch include the vertex diameter.
    assert!((a.y - root.y - 140.0).abs() < 1e-9);
    assert!((b.x - a.x - 90.0).abs() < 1e-9);
}

#[test]
fn multiple_sources_without_root_are_ambiguous() {
    let c = directed(&["x", "y", "z"], &[("x", "z"), ("y", "z")]);
    let err = place(&c, 10.0, &TreesSettings::default()).unwrap_err();
    assert!(matches!(err, GraphError::AmbiguousRoot(_)), "{err}");

    let settings = TreesSettings {
        roots: vec!["y".to_owned()],
        ..TreesSettings::default()
    };
    let out = place(&c, 10.0, &settings).unwrap();
    assert!(out["y"].y < out["z"].y);
    assert!(out["z"].y < out["x"].y);
}

#[test]
fn cycles_fall_back_to_smallest_key() {
    let c = directed(&["b", "a", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
    let out = place(&c, 10.0, &TreesSettings::default()).unwrap();
    assert!(out["a"].y < out["b"].y);
    assert!(out["a"].y < out["c"].y);
}

#[test]
fn forest_components_are_packed_side_by_side() {
    let c = Connections::from_pairs(
        GraphKind::Undirected,
        &["a", "b", "c", "d"],
        &[("a", "b"), ("c", "d")],
    );
    let settings = TreesSettings {
        min_vertex_spacing: 10.0,
        ..TreesSettings::default()
    };
    let out = place(&c, 10.0, &settings).unwrap();
    assert!(out["c"].x > out["a"].x);
    assert_eq!(out["a"].y, out["c"].y);
    assert_eq!(out["b"].y, out["d"].y);
    // Each component is 20 wide; gap of 10 between them.
    assert!((out["c"].x - out["a"].x - 30.0).abs() < 1e-9);
}

#[test]
fn deep_chains_do_not_recurse() {
    let keys = (0..5_000).map(|i| format!("n{i:05}")).collect::<Vec<_>>();
    let refs = keys.iter().map(String::as_str).collect::<Vec<_>>();
    let pairs = refs.windows(2).map(|w| (w[0], w[1])).collect::<Vec<_>>();
    let c = directed(&refs, &pairs);
    let out = place(&c, 1.0, &TreesSettings::default()).unwrap();
    assert_eq!(out.len(), 5_000);
    assert!(out["n04999"].y > out["n00000"].y);
}
