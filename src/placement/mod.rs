//! Initial vertex placement.
//!
//! [`place_vertices`] is a pure function of the adjacency view, the vertex radius and the
//! strategy settings. Every strategy returns positions centered around the origin and a bounding
//! rectangle enclosing every vertex circle.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::foundation::core::{BoundingRect, Point};
use crate::foundation::error::{GraphError, GraphResult};
use crate::graph::connections::Connections;

mod circle;
mod components;
mod orbits;
mod random;
mod trees;

pub(crate) use components::center_at_origin;

/// Sparsest accepted random layout: one vertex per hundred lattice slots.
pub const MIN_RANDOM_DENSITY: f64 = 0.01;

/// Placement strategy with its own options.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PlacementSettings {
    /// Seeded lattice or jittered-grid placement.
    Random(RandomSettings),
    /// Evenly spaced around one circle.
    Circle(CircleSettings),
    /// Layered trees, one per connected component.
    Trees(TreesSettings),
    /// Concentric BFS rings around a root, one system per component.
    Orbits(OrbitsSettings),
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self::Random(RandomSettings::default())
    }
}

impl PlacementSettings {
    /// Check option ranges.
    pub fn validate(&self) -> GraphResult<()> {
        match self {
            Self::Random(s) => {
                non_negative("random.min_vertex_spacing", s.min_vertex_spacing)?;
                if !(s.density >= MIN_RANDOM_DENSITY && s.density <= 1.0) {
                    return Err(GraphError::configuration(format!(
                        "random.density must be in [{MIN_RANDOM_DENSITY}, 1]"
                    )));
                }
                Ok(())
            }
            Self::Circle(s) => non_negative("circle.min_vertex_spacing", s.min_vertex_spacing),
            Self::Trees(s) => {
                non_negative("trees.min_row_distance", s.min_row_distance)?;
                non_negative("trees.min_column_distance", s.min_column_distance)?;
                non_negative("trees.min_vertex_spacing", s.min_vertex_spacing)
            }
            Self::Orbits(s) => {
                non_negative("orbits.layer_spacing", s.layer_spacing)?;
                non_negative("orbits.min_vertex_spacing", s.min_vertex_spacing)
            }
        }
    }

    /// Gap kept between vertex circles by this strategy.
    pub fn min_vertex_spacing(&self) -> f64 {
        match self {
            Self::Random(s) => s.min_vertex_spacing,
            Self::Circle(s) => s.min_vertex_spacing,
            Self::Trees(s) => s.min_vertex_spacing,
            Self::Orbits(s) => s.min_vertex_spacing,
        }
    }
}

fn non_negative(name: &str, v: f64) -> GraphResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(GraphError::configuration(format!(
            "{name} must be finite and >= 0"
        )));
    }
    Ok(())
}

/// Lattice used by the random strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomLayout {
    /// Jittered square grid.
    #[default]
    Random,
    /// Triangular mesh: every neighbor exactly one spacing away.
    Triangles,
    /// Hexagonal honeycomb.
    Honeycomb,
}

/// Options of [`PlacementSettings::Random`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RandomSettings {
    /// Lattice kind.
    pub layout: RandomLayout,
    /// Fraction of lattice slots that end up occupied, in `[MIN_RANDOM_DENSITY, 1]`.
    pub density: f64,
    /// Gap kept between vertex circles.
    pub min_vertex_spacing: f64,
    /// PRNG seed; equal seeds give equal layouts.
    pub seed: u64,
}

impl Default for RandomSettings {
    fn default() -> Self {
        Self {
            layout: RandomLayout::Random,
            density: 0.5,
            min_vertex_spacing: 100.0,
            seed: 0,
        }
    }
}

/// Comparator ordering vertex keys around the circle.
#[derive(Clone)]
pub struct VertexComparator(Rc<dyn Fn(&str, &str) -> Ordering>);

impl VertexComparator {
    /// Wrap a comparison function.
    pub fn new(f: impl Fn(&str, &str) -> Ordering + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn compare(&self, a: &str, b: &str) -> Ordering {
        (self.0)(a, b)
    }
}

impl fmt::Debug for VertexComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VertexComparator(..)")
    }
}

/// Options of [`PlacementSettings::Circle`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CircleSettings {
    /// Gap kept between adjacent vertex circles.
    pub min_vertex_spacing: f64,
    /// Custom vertex order; key order when absent.
    #[serde(skip)]
    pub sort_comparator: Option<VertexComparator>,
}

impl Default for CircleSettings {
    fn default() -> Self {
        Self {
            min_vertex_spacing: 100.0,
            sort_comparator: None,
        }
    }
}

/// Options of [`PlacementSettings::Trees`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TreesSettings {
    /// Explicit roots, at most one per connected component.
    pub roots: Vec<String>,
    /// Extra vertical gap between rows.
    pub min_row_distance: f64,
    /// Extra horizontal gap between columns.
    pub min_column_distance: f64,
    /// Gap between packed components.
    pub min_vertex_spacing: f64,
}

impl Default for TreesSettings {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            min_row_distance: 100.0,
            min_column_distance: 50.0,
            min_vertex_spacing: 100.0,
        }
    }
}

/// Options of [`PlacementSettings::Orbits`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OrbitsSettings {
    /// Explicit roots, at most one per connected component.
    pub roots: Vec<String>,
    /// Extra radial gap between consecutive rings.
    pub layer_spacing: f64,
    /// Gap between vertex circles on a ring and between packed components.
    pub min_vertex_spacing: f64,
}

impl Default for OrbitsSettings {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            layer_spacing: 60.0,
            min_vertex_spacing: 50.0,
        }
    }
}

/// Output of [`place_vertices`]; treated as an immutable animation target.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlacementResult {
    /// Rectangle enclosing every vertex circle.
    pub bounding_rect: BoundingRect,
    /// Vertex centers by key.
    pub vertices_positions: BTreeMap<String, Point>,
}

impl PlacementResult {
    pub(crate) fn from_positions(positions: BTreeMap<String, Point>, vertex_radius: f64) -> Self {
        Self {
            bounding_rect: BoundingRect::around(positions.values(), vertex_radius),
            vertices_positions: positions,
        }
    }

    /// Position of `key`.
    pub fn position(&self, key: &str) -> Option<Point> {
        self.vertices_positions.get(key).copied()
    }
}

/// Compute initial positions for every vertex of `connections`.
///
/// An empty graph yields no positions and a zero-area rectangle at the origin; a single vertex is
/// placed at the origin whatever the strategy.
#[tracing::instrument(skip(connections, settings), fields(vertices = connections.len()))]
pub fn place_vertices(
    connections: &Connections,
    vertex_radius: f64,
    settings: &PlacementSettings,
) -> GraphResult<PlacementResult> {
    settings.validate()?;
    if !vertex_radius.is_finite() || vertex_radius < 0.0 {
        return Err(GraphError::configuration(
            "vertex radius must be finite and >= 0",
        ));
    }

    let positions = match connections.len() {
        0 => BTreeMap::new(),
        1 => connections
            .keys()
            .map(|k| (k.to_owned(), Point::ZERO))
            .collect(),
        _ => match settings {
            PlacementSettings::Random(s) => random::place(connections, vertex_radius, s),
            PlacementSettings::Circle(s) => circle::place(connections, vertex_radius, s),
            PlacementSettings::Trees(s) => trees::place(connections, vertex_radius, s)?,
            PlacementSettings::Orbits(s) => orbits::place(connections, vertex_radius, s)?,
        },
    };
    Ok(PlacementResult::from_positions(positions, vertex_radius))
}

/// Pick the single explicit root among `roots` inside `component`.
fn explicit_root<'a>(
    roots: &'a [String],
    component: &[String],
) -> GraphResult<Option<&'a String>> {
    let mut found = roots
        .iter()
        .filter(|r| component.binary_search(r).is_ok());
    let first = found.next();
    if let Some(second) = found.next() {
        return Err(GraphError::configuration(format!(
            "roots '{}' and '{second}' belong to the same component",
            first.map(String::as_str).unwrap_or_default()
        )));
    }
    Ok(first)
}

fn check_roots_exist(connections: &Connections, roots: &[String]) -> GraphResult<()> {
    for root in roots {
        if !connections.contains(root) {
            return Err(GraphError::not_found(format!("root vertex '{root}'")));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/placement/mod.rs"]
mod tests;
