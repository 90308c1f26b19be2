use super::*;

#[test]
fn chord_radius_matches_geometry() {
    assert_eq!(chord_radius(0, 10.0), 0.0);
    assert_eq!(chord_radius(1, 10.0), 0.0);
    assert!((chord_radius(2, 10.0) - 5.0).abs() < 1e-9);
    // Equilateral triangle: side = R * sqrt(3).
    let r = chord_radius(3, 140.0);
    assert!((r * 3f64.sqrt() - 140.0).abs() < 1e-9);
}

#[test]
fn fallback_direction_is_unit_and_stable() {
    let a = fallback_direction(1, 2);
    let b = fallback_direction(1, 2);
    assert_eq!(a, b);
    assert!((a.hypot() - 1.0).abs() < 1e-9);
    assert!((golden_direction(5).hypot() - 1.0).abs() < 1e-9);
}

#[test]
fn finite_or_zero_scrubs_nan() {
    let v = finite_or_zero(Vec2::new(f64::NAN, 3.0));
    assert_eq!(v, Vec2::new(0.0, 3.0));
}
