use super::*;
use crate::graph::model::GraphKind;
use crate::placement::VertexComparator;

fn distance(a: Point, b: Point) -> f64 {
    (a - b).hypot()
}

#[test]
fn three_vertices_are_evenly_spaced() {
    let c = Connections::from_pairs(GraphKind::Undirected, &["A", "B", "C"], &[]);
    let out = place(&c, 20.0, &CircleSettings::default());
    let pts = ["A", "B", "C"].map(|k| out[k]);

    for i in 0..3 {
        for j in (i + 1)..3 {
            let d = distance(pts[i], pts[j]);
            assert!((d - 140.0).abs() < 1e-9, "pair {i}-{j} is {d} apart");
        }
    }
    let r = distance(pts[0], Point::ZERO);
    for p in pts {
        assert!((distance(p, Point::ZERO) - r).abs() < 1e-9);
    }
    // First vertex at the top.
    assert!(pts[0].x.abs() < 1e-9);
    assert!(pts[0].y < 0.0);

    assert_eq!(out, place(&c, 20.0, &CircleSettings::default()));
}

#[test]
fn comparator_controls_order() {
    let c = Connections::from_pairs(GraphKind::Undirected, &["a", "b", "c", "d"], &[]);
    let reversed = CircleSettings {
        min_vertex_spacing: 10.0,
        sort_comparator: Some(VertexComparator::new(|a, b| b.cmp(a))),
    };
    let out = place(&c, 5.0, &reversed);
    assert!(out["d"].x.abs() < 1e-9);
    assert!(out["d"].y < 0.0);
}

#[test]
fn neighbors_on_a_large_ring_respect_spacing() {
    let keys = (0..40).map(|i| format!("v{i:02}")).collect::<Vec<_>>();
    let refs = keys.iter().map(String::as_str).collect::<Vec<_>>();
    let c = Connections::from_pairs(GraphKind::Undirected, &refs, &[]);
    let out = place(&c, 8.0, &CircleSettings::default());
    for (i, a) in keys.iter().enumerate() {
        let b = &keys[(i + 1) % keys.len()];
        assert!(distance(out[a], out[b]) >= 116.0 - 1e-9);
    }
}
