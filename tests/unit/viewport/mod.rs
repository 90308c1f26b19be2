use super::*;

fn with_scales(scales: &[f64], initial: f64) -> ViewportSettings {
    ViewportSettings {
        scales: scales.to_vec(),
        initial_scale: initial,
        ..ViewportSettings::default()
    }
}

#[test]
fn defaults_are_valid() {
    ViewportSettings::default().validate().unwrap();
}

#[test]
fn scale_ladder_rules() {
    let cases = [
        with_scales(&[], 1.0),
        with_scales(&[1.0, 1.0, 2.0], 1.0),
        with_scales(&[2.0, 1.0], 1.0),
        with_scales(&[-1.0, 1.0], 1.0),
        with_scales(&[0.5, 1.0], 0.75),
    ];
    for settings in cases {
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, GraphError::Configuration(_)), "{settings:?}");
    }
}

#[test]
fn negative_padding_and_timeout_are_rejected() {
    let mut s = ViewportSettings::default();
    s.padding.left = -1.0;
    assert!(s.validate().is_err());

    let s = ViewportSettings {
        auto_sizing_timeout_ms: Some(f64::NAN),
        ..ViewportSettings::default()
    };
    assert!(s.validate().is_err());
}

#[test]
fn next_scale_wraps() {
    let s = with_scales(&[0.5, 1.0, 2.0], 1.0);
    assert_eq!(s.next_scale(0.5), 1.0);
    assert_eq!(s.next_scale(0.7), 1.0);
    assert_eq!(s.next_scale(2.0), 0.5);
    assert_eq!(s.clamp_scale(10.0), 2.0);
    assert_eq!(s.clamp_scale(0.1), 0.5);
}

#[test]
fn parses_from_json_with_defaults() {
    let s: ViewportSettings =
        serde_json::from_str(r#"{"object_fit":"cover","scales":[1,2],"initial_scale":2}"#)
            .unwrap();
    assert_eq!(s.object_fit, ObjectFit::Cover);
    assert_eq!(s.auto_sizing_timeout_ms, Some(3000.0));
    s.validate().unwrap();
}
