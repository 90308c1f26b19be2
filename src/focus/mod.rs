//! Focus transitions: single-vertex focus and progress-driven focus paths.

use crate::animation::tween::AnimationSettings;
use crate::foundation::core::{Padding, Point, Size};
use crate::foundation::error::{GraphError, GraphResult};
use crate::viewport::ViewportTransform;
use crate::viewport::transform::padded_area;

pub mod path;
pub mod resolver;

pub use path::{Alignment, AxisAlignment, FocusPath, FocusWaypoint};
pub use resolver::{FocusResolver, FocusState};

/// Default on-screen magnification of a focused vertex.
pub const DEFAULT_VERTEX_SCALE: f64 = 4.0;

/// How a focus transition frames its vertex.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FocusSettings {
    /// Where the vertex lands inside the padded canvas.
    pub alignment: Alignment,
    /// Viewport scale while focused; the vertex appears `vertex_scale * r` large.
    pub vertex_scale: f64,
    /// Transition into and out of focus.
    pub animation: AnimationSettings,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            alignment: Alignment::default(),
            vertex_scale: DEFAULT_VERTEX_SCALE,
            animation: AnimationSettings::default(),
        }
    }
}

impl FocusSettings {
    /// Check the scale and the animation.
    pub fn validate(&self) -> GraphResult<()> {
        check_vertex_scale(self.vertex_scale)?;
        self.animation.validate()
    }
}

pub(crate) fn check_vertex_scale(scale: f64) -> GraphResult<()> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(GraphError::configuration(
            "focus vertex_scale must be finite and > 0",
        ));
    }
    Ok(())
}

/// Viewport transform that frames a vertex at `world` with radius `vertex_radius`.
pub fn focus_transform(
    world: Point,
    vertex_radius: f64,
    vertex_scale: f64,
    alignment: &Alignment,
    canvas: Size,
    padding: Padding,
) -> ViewportTransform {
    let area = padded_area(canvas, padding);
    let extent = vertex_radius * vertex_scale;
    let x = alignment.horizontal.place(area.x0, area.width(), extent);
    let y = alignment.vertical.place(area.y0, area.height(), extent);
    let anchor = Point::new(x, y) + alignment.offset;
    ViewportTransform::anchored(world, vertex_scale, anchor)
}
