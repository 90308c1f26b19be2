use std::f64::consts::{PI, TAU};

use crate::foundation::core::Vec2;

/// Distances below this are treated as this value by the force model.
pub(crate) const MIN_DISTANCE: f64 = 1.0;

const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_034;

/// Unit direction used when two points coincide and no real direction exists.
///
/// Derived from the pair indices so repeated runs push the same pair the same way.
pub(crate) fn fallback_direction(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f64) * GOLDEN_RATIO_CONJUGATE + (to as f64) * 0.414_214 + 0.37) * TAU;
    Vec2::new(angle.cos(), angle.sin())
}

/// Direction of the `index`-th sample on a golden-angle spiral.
pub(crate) fn golden_direction(index: usize) -> Vec2 {
    let angle = ((index as f64) * GOLDEN_RATIO_CONJUGATE + 0.11) * TAU;
    Vec2::new(angle.cos(), angle.sin())
}

/// Smallest circle radius on which `count` evenly spaced points are `chord` apart.
pub(crate) fn chord_radius(count: usize, chord: f64) -> f64 {
    match count {
        0 | 1 => 0.0,
        n => chord / (2.0 * (PI / n as f64).sin()),
    }
}

/// Replace non-finite components with zero.
pub(crate) fn finite_or_zero(v: Vec2) -> Vec2 {
    Vec2::new(
        if v.x.is_finite() { v.x } else { 0.0 },
        if v.y.is_finite() { v.y } else { 0.0 },
    )
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
