use std::collections::BTreeMap;

use crate::foundation::core::{BoundingRect, Point, Vec2};

/// Pack per-component layouts left to right, `spacing` apart, vertically centered on one line,
/// then center the whole arrangement at the origin.
pub(crate) fn arrange_graph_components(
    layouts: Vec<BTreeMap<String, Point>>,
    vertex_radius: f64,
    spacing: f64,
) -> BTreeMap<String, Point> {
    let mut out = BTreeMap::new();
    let mut cursor = 0.0;
    for layout in layouts {
        if layout.is_empty() {
            continue;
        }
        let rect = BoundingRect::around(layout.values(), vertex_radius);
        let shift = Vec2::new(cursor - rect.left(), -rect.center().y);
        out.extend(layout.into_iter().map(|(k, p)| (k, p + shift)));
        cursor += rect.width() + spacing;
    }
    center_at_origin(&mut out);
    out
}

/// Translate `positions` so their bounding rectangle is centered at the origin.
pub(crate) fn center_at_origin(positions: &mut BTreeMap<String, Point>) {
    if positions.is_empty() {
        return;
    }
    let center = BoundingRect::around(positions.values(), 0.0).center();
    let shift = Point::ZERO - center;
    for p in positions.values_mut() {
        *p += shift;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/placement/components.rs"]
mod tests;
