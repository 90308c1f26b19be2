use super::*;

fn layout(entries: &[(&str, f64, f64)]) -> BTreeMap<String, Point> {
    entries
        .iter()
        .map(|(k, x, y)| ((*k).to_owned(), Point::new(*x, *y)))
        .collect()
}

#[test]
fn components_are_packed_left_to_right_without_overlap() {
    let out = arrange_graph_components(
        vec![
            layout(&[("a", 0.0, 0.0), ("b", 0.0, 100.0)]),
            layout(&[("c", 500.0, 500.0)]),
        ],
        10.0,
        30.0,
    );
    // Circle edges of neighboring components are 30 apart.
    assert!((out["c"].x - out["a"].x - 50.0).abs() < 1e-9);
    assert_eq!(out["a"].x, out["b"].x);
    // Vertically centered on one line.
    assert!(((out["a"].y + out["b"].y) / 2.0 - out["c"].y).abs() < 1e-9);

    let rect = BoundingRect::around(out.values(), 0.0);
    assert!(rect.center().x.abs() < 1e-9);
    assert!(rect.center().y.abs() < 1e-9);
}

#[test]
fn centering_keeps_relative_offsets() {
    let mut pts = layout(&[("a", 10.0, 10.0), ("b", 30.0, 50.0)]);
    center_at_origin(&mut pts);
    assert_eq!(pts["a"], Point::new(-10.0, -20.0));
    assert_eq!(pts["b"], Point::new(10.0, 20.0));
}
