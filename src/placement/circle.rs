use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, TAU};

use crate::foundation::core::Point;
use crate::foundation::math::chord_radius;
use crate::graph::connections::Connections;
use crate::placement::CircleSettings;

/// Evenly spaced on one circle, starting at the top and going clockwise (screen `y` down).
pub(super) fn place(
    connections: &Connections,
    vertex_radius: f64,
    settings: &CircleSettings,
) -> BTreeMap<String, Point> {
    let mut keys = connections.keys().collect::<Vec<_>>();
    if let Some(cmp) = &settings.sort_comparator {
        keys.sort_by(|a, b| cmp.compare(a, b));
    }

    let n = keys.len();
    let radius = chord_radius(n, 2.0 * vertex_radius + settings.min_vertex_spacing);
    keys.into_iter()
        .enumerate()
        .map(|(i, key)| {
            let angle = -FRAC_PI_2 + TAU * i as f64 / n as f64;
            let p = Point::new(radius * angle.cos(), radius * angle.sin());
            (key.to_owned(), p)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/placement/circle.rs"]
mod tests;
