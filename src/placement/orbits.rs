use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::{FRAC_PI_2, TAU};

use crate::foundation::core::Point;
use crate::foundation::error::GraphResult;
use crate::foundation::math::chord_radius;
use crate::graph::connections::Connections;
use crate::placement::components::arrange_graph_components;
use crate::placement::{OrbitsSettings, check_roots_exist, explicit_root};

pub(super) fn place(
    connections: &Connections,
    vertex_radius: f64,
    settings: &OrbitsSettings,
) -> GraphResult<BTreeMap<String, Point>> {
    check_roots_exist(connections, &settings.roots)?;
    let mut layouts = Vec::new();
    for component in connections.components() {
        let root = match explicit_root(&settings.roots, &component)? {
            Some(root) => root.clone(),
            None => hub(connections, &component),
        };
        layouts.push(layout_rings(connections, &root, vertex_radius, settings));
    }
    Ok(arrange_graph_components(
        layouts,
        vertex_radius,
        settings.min_vertex_spacing,
    ))
}

/// Highest-degree vertex, smallest key on ties.
fn hub(connections: &Connections, component: &[String]) -> String {
    let mut best: Option<&String> = None;
    for key in component {
        if best.is_none_or(|b| connections.degree(key) > connections.degree(b)) {
            best = Some(key);
        }
    }
    best.cloned().unwrap_or_default()
}

/// Root at the center, BFS layer `k` on ring `k`. Each ring is wide enough for its own vertices
/// and clears the previous ring; vertices follow the angular order of their parents.
fn layout_rings(
    connections: &Connections,
    root: &str,
    vertex_radius: f64,
    settings: &OrbitsSettings,
) -> BTreeMap<String, Point> {
    let mut angles = BTreeMap::from([(root.to_owned(), -FRAC_PI_2)]);
    let mut out = BTreeMap::from([(root.to_owned(), Point::ZERO)]);
    let mut seen = BTreeSet::from([root.to_owned()]);
    let mut layer = vec![root.to_owned()];
    let mut radius = 0.0;

    loop {
        let mut next = Vec::<(f64, String)>::new();
        for parent in &layer {
            let parent_angle = angles.get(parent).copied().unwrap_or(0.0);
            for child in connections.neighbors(parent) {
                if seen.insert(child.clone()) {
                    next.push((parent_angle, child.clone()));
                }
            }
        }
        if next.is_empty() {
            return out;
        }
        next.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let m = next.len();
        radius = (radius + 2.0 * vertex_radius + settings.layer_spacing)
            .max(chord_radius(m, 2.0 * vertex_radius + settings.min_vertex_spacing));
        layer = Vec::with_capacity(m);
        for (i, (_, key)) in next.into_iter().enumerate() {
            let angle = -FRAC_PI_2 + TAU * i as f64 / m as f64;
            out.insert(key.clone(), Point::new(radius * angle.cos(), radius * angle.sin()));
            angles.insert(key.clone(), angle);
            layer.push(key);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/placement/orbits.rs"]
mod tests;
