use super::*;
use crate::graph::model::GraphKind;

fn chain(kind: GraphKind) -> Connections {
    Connections::from_pairs(
        kind,
        &["a", "b", "c", "d", "e"],
        &[("a", "b"), ("b", "c"), ("c", "d"), ("d", "e")],
    )
}

fn every_strategy() -> Vec<PlacementSettings> {
    vec![
        PlacementSettings::Random(RandomSettings::default()),
        PlacementSettings::Random(RandomSettings {
            layout: RandomLayout::Triangles,
            ..RandomSettings::default()
        }),
        PlacementSettings::Random(RandomSettings {
            layout: RandomLayout::Honeycomb,
            ..RandomSettings::default()
        }),
        PlacementSettings::Circle(CircleSettings::default()),
        PlacementSettings::Trees(TreesSettings::default()),
        PlacementSettings::Orbits(OrbitsSettings::default()),
    ]
}

#[test]
fn empty_graph_places_nothing() {
    let c = Connections::from_pairs(GraphKind::Undirected, &[], &[]);
    let out = place_vertices(&c, 20.0, &PlacementSettings::default()).unwrap();
    assert!(out.vertices_positions.is_empty());
    assert!(out.bounding_rect.is_degenerate());
    assert_eq!(out.bounding_rect.center(), Point::ZERO);
}

#[test]
fn single_vertex_sits_at_origin_for_every_strategy() {
    let c = Connections::from_pairs(GraphKind::Undirected, &["solo"], &[]);
    for settings in every_strategy() {
        let out = place_vertices(&c, 10.0, &settings).unwrap();
        assert_eq!(out.position("solo"), Some(Point::ZERO));
        assert_eq!(out.bounding_rect.width(), 20.0);
    }
}

#[test]
fn every_position_is_inside_the_bounding_rect() {
    let c = chain(GraphKind::Directed);
    for settings in every_strategy() {
        let out = place_vertices(&c, 15.0, &settings).unwrap();
        assert_eq!(out.vertices_positions.len(), 5, "{settings:?}");
        let inner = out.bounding_rect.expand(-15.0 + 1e-9);
        for p in out.vertices_positions.values() {
            assert!(inner.contains(*p), "{settings:?}: {p:?} outside {:?}", out.bounding_rect);
        }
    }
}

#[test]
fn placement_is_a_pure_function() {
    let c = chain(GraphKind::Undirected);
    for settings in every_strategy() {
        let a = place_vertices(&c, 15.0, &settings).unwrap();
        let b = place_vertices(&c, 15.0, &settings).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn invalid_settings_are_configuration_errors() {
    let c = chain(GraphKind::Undirected);
    let bad = [
        PlacementSettings::Random(RandomSettings {
            density: 0.0,
            ..RandomSettings::default()
        }),
        PlacementSettings::Random(RandomSettings {
            density: 1.5,
            ..RandomSettings::default()
        }),
        PlacementSettings::Random(RandomSettings {
            density: 1e-12,
            ..RandomSettings::default()
        }),
        PlacementSettings::Circle(CircleSettings {
            min_vertex_spacing: -1.0,
            sort_comparator: None,
        }),
        PlacementSettings::Trees(TreesSettings {
            min_row_distance: f64::NAN,
            ..TreesSettings::default()
        }),
    ];
    for settings in bad {
        let err = place_vertices(&c, 10.0, &settings).unwrap_err();
        assert!(matches!(err, GraphError::Configuration(_)), "{err}");
    }
    let err = place_vertices(&c, -1.0, &PlacementSettings::default()).unwrap_err();
    assert!(matches!(err, GraphError::Configuration(_)));
}

#[test]
fn settings_parse_from_tagged_json() {
    let s: PlacementSettings =
        serde_json::from_str(r#"{"strategy":"trees","roots":["r"],"min_row_distance":40}"#)
            .unwrap();
    match s {
        PlacementSettings::Trees(t) => {
            assert_eq!(t.roots, vec!["r".to_owned()]);
            assert_eq!(t.min_row_distance, 40.0);
            assert_eq!(t.min_column_distance, 50.0);
        }
        other => panic!("unexpected {other:?}"),
    }

    let s: PlacementSettings =
        serde_json::from_str(r#"{"strategy":"random","layout":"honeycomb","seed":7}"#).unwrap();
    assert!(matches!(
        s,
        PlacementSettings::Random(RandomSettings {
            layout: RandomLayout::Honeycomb,
            seed: 7,
            ..
        })
    ));
}

#[test]
fn unknown_root_is_not_found() {
    let c = chain(GraphKind::Directed);
    let settings = PlacementSettings::Orbits(OrbitsSettings {
        roots: vec!["zz".to_owned()],
        ..OrbitsSettings::default()
    });
    let err = place_vertices(&c, 10.0, &settings).unwrap_err();
    assert!(matches!(err, GraphError::NotFound(_)));
}

#[test]
fn two_roots_in_one_component_are_rejected() {
    let c = chain(GraphKind::Undirected);
    let settings = PlacementSettings::Trees(TreesSettings {
        roots: vec!["a".to_owned(), "c".to_owned()],
        ..TreesSettings::default()
    });
    let err = place_vertices(&c, 10.0, &settings).unwrap_err();
    assert!(matches!(err, GraphError::Configuration(_)));
}

#[test]
fn sparsest_random_density_is_accepted() {
    let c = chain(GraphKind::Undirected);
    let settings = PlacementSettings::Random(RandomSettings {
        density: MIN_RANDOM_DENSITY,
        ..RandomSettings::default()
    });
    let out = place_vertices(&c, 10.0, &settings).unwrap();
    assert_eq!(out.vertices_positions.len(), 5);
}
