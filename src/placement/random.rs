use std::collections::BTreeMap;

use crate::foundation::core::{Point, Rng64};
use crate::graph::connections::Connections;
use crate::placement::{MIN_RANDOM_DENSITY, RandomLayout, RandomSettings, center_at_origin};

const SQRT3_2: f64 = 0.866_025_403_784_438_6;

/// Scatter vertices over a lattice: build at least `ceil(n / density)` slots, shuffle them with
/// the seeded PRNG and hand the first `n` to the vertices in key order.
///
/// Densities below [`MIN_RANDOM_DENSITY`] are treated as that floor, which bounds the lattice.
pub(super) fn place(
    connections: &Connections,
    vertex_radius: f64,
    settings: &RandomSettings,
) -> BTreeMap<String, Point> {
    let n = connections.len();
    let density = settings.density.clamp(MIN_RANDOM_DENSITY, 1.0);
    let wanted = (((n as f64) / density).ceil() as usize).max(n);
    let step = 2.0 * vertex_radius + settings.min_vertex_spacing;
    let mut rng = Rng64::new(settings.seed);

    let mut slots = match settings.layout {
        RandomLayout::Random => square_slots(wanted, step * 1.5),
        RandomLayout::Triangles => hex_slots(wanted, step, false),
        RandomLayout::Honeycomb => hex_slots(wanted, step, true),
    };
    rng.shuffle(&mut slots);

    let jitter = match settings.layout {
        // Cells are 1.5 steps wide; a quarter step each way keeps neighbors a full step apart.
        RandomLayout::Random => step * 0.25,
        RandomLayout::Triangles | RandomLayout::Honeycomb => 0.0,
    };

    let mut out = connections
        .keys()
        .zip(slots)
        .map(|(key, slot)| {
            let dx = (rng.next_f64_01() * 2.0 - 1.0) * jitter;
            let dy = (rng.next_f64_01() * 2.0 - 1.0) * jitter;
            (key.to_owned(), Point::new(slot.x + dx, slot.y + dy))
        })
        .collect();
    center_at_origin(&mut out);
    out
}

fn square_slots(wanted: usize, cell: f64) -> Vec<Point> {
    let side = (wanted as f64).sqrt().ceil().max(1.0) as usize;
    let half = (side as f64 - 1.0) / 2.0;
    let mut out = Vec::with_capacity(side * side);
    for row in 0..side {
        for col in 0..side {
            out.push(Point::new(
                (col as f64 - half) * cell,
                (row as f64 - half) * cell,
            ));
        }
    }
    out
}

/// Triangular lattice points within growing hex rings; `holes` removes one of the three
/// sublattices, which leaves a honeycomb with the same nearest-neighbor distance.
fn hex_slots(wanted: usize, step: f64, holes: bool) -> Vec<Point> {
    let mut ring: i64 = 0;
    loop {
        let mut out = Vec::new();
        for q in -ring..=ring {
            let lo = (-ring).max(-q - ring);
            let hi = ring.min(-q + ring);
            for r in lo..=hi {
                if holes && (q - r).rem_euclid(3) == 0 {
                    continue;
                }
                out.push(Point::new(
                    step * (q as f64 + r as f64 / 2.0),
                    step * SQRT3_2 * r as f64,
                ));
            }
        }
        if out.len() >= wanted {
            return out;
        }
        ring += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/placement/random.rs"]
mod tests;
