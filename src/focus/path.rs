use std::collections::BTreeMap;

use crate::animation::tween::Lerp;
use crate::focus::{DEFAULT_VERTEX_SCALE, check_vertex_scale};
use crate::foundation::core::Vec2;
use crate::foundation::error::{GraphError, GraphResult};
use crate::viewport::ViewportTransform;

/// Placement along one screen axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisAlignment {
    /// Touching the leading padding edge.
    Start,
    /// Middle of the padded area.
    #[default]
    Center,
    /// Touching the trailing padding edge.
    End,
}

impl AxisAlignment {
    /// Screen coordinate of a circle of radius `extent` aligned in `[origin, origin + span]`.
    pub fn place(self, origin: f64, span: f64, extent: f64) -> f64 {
        match self {
            Self::Start => origin + extent,
            Self::Center => origin + span / 2.0,
            Self::End => origin + span - extent,
        }
    }
}

/// Where a focused vertex sits on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Alignment {
    /// Horizontal placement.
    pub horizontal: AxisAlignment,
    /// Vertical placement.
    pub vertical: AxisAlignment,
    /// Extra screen-space shift.
    pub offset: Vec2,
}

/// One stop of a focus path.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FocusWaypoint {
    /// Position on the path, in `[0, 1]`.
    pub progress: f64,
    /// Vertex framed at this stop.
    pub key: String,
    /// Where the vertex sits on screen.
    #[serde(default)]
    pub alignment: Alignment,
    /// Viewport scale at this stop.
    #[serde(default = "default_vertex_scale")]
    pub vertex_scale: f64,
}

fn default_vertex_scale() -> f64 {
    DEFAULT_VERTEX_SCALE
}

impl FocusWaypoint {
    /// Centered waypoint with the default scale.
    pub fn new(progress: f64, key: impl Into<String>) -> Self {
        Self {
            progress,
            key: key.into(),
            alignment: Alignment::default(),
            vertex_scale: DEFAULT_VERTEX_SCALE,
        }
    }
}

/// Waypoints sorted by progress, with unique progress values in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct FocusPath {
    waypoints: Vec<FocusWaypoint>,
}

impl FocusPath {
    /// Validate and sort `waypoints`.
    pub fn new(mut waypoints: Vec<FocusWaypoint>) -> GraphResult<Self> {
        if waypoints.is_empty() {
            return Err(GraphError::configuration("focus path needs at least one waypoint"));
        }
        for w in &waypoints {
            if !(0.0..=1.0).contains(&w.progress) {
                return Err(GraphError::configuration(format!(
                    "waypoint '{}' progress {} is outside [0, 1]",
                    w.key, w.progress
                )));
            }
            check_vertex_scale(w.vertex_scale)?;
        }
        waypoints.sort_by(|a, b| a.progress.total_cmp(&b.progress));
        if let Some(pair) = waypoints.windows(2).find(|p| p[0].progress == p[1].progress) {
            return Err(GraphError::configuration(format!(
                "waypoints '{}' and '{}' share progress {}",
                pair[0].key, pair[1].key, pair[0].progress
            )));
        }
        Ok(Self { waypoints })
    }

    /// Waypoints in progress order.
    pub fn waypoints(&self) -> &[FocusWaypoint] {
        &self.waypoints
    }

    /// Keys of every waypoint vertex.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.waypoints.iter().map(|w| w.key.as_str())
    }

    /// Bracketing waypoints for `progress` and the local factor between them.
    ///
    /// Progress outside the path clamps to the first or last waypoint.
    pub fn bracket(&self, progress: f64) -> (&FocusWaypoint, &FocusWaypoint, f64) {
        let last = self.waypoints.len() - 1;
        let idx = self.waypoints.partition_point(|w| w.progress <= progress);
        if idx == 0 || progress.is_nan() {
            return (&self.waypoints[0], &self.waypoints[0], 0.0);
        }
        if idx > last {
            return (&self.waypoints[last], &self.waypoints[last], 0.0);
        }
        let a = &self.waypoints[idx - 1];
        let b = &self.waypoints[idx];
        let t = (progress - a.progress) / (b.progress - a.progress);
        (a, b, t)
    }

    /// Emphasis of every waypoint vertex at `progress`.
    ///
    /// The two bracketing vertices trade their `vertex_scale` linearly; every other waypoint
    /// vertex sits at `1`.
    pub fn vertex_scales(&self, progress: f64) -> BTreeMap<&str, f64> {
        let mut out = self.keys().map(|k| (k, 1.0)).collect::<BTreeMap<_, _>>();
        let (a, b, t) = self.bracket(progress);
        if a.key == b.key {
            out.insert(a.key.as_str(), <f64 as Lerp>::lerp(&a.vertex_scale, &b.vertex_scale, t));
        } else {
            out.insert(a.key.as_str(), <f64 as Lerp>::lerp(&a.vertex_scale, &1.0, t));
            out.insert(b.key.as_str(), <f64 as Lerp>::lerp(&1.0, &b.vertex_scale, t));
        }
        out
    }

    /// Interpolated transform at `progress`.
    ///
    /// `frame` maps a waypoint to its transform; `None` when the waypoint vertex is not placed.
    pub fn resolve(
        &self,
        progress: f64,
        mut frame: impl FnMut(&FocusWaypoint) -> Option<ViewportTransform>,
    ) -> Option<ViewportTransform> {
        let (a, b, t) = self.bracket(progress);
        let from = frame(a)?;
        if t <= 0.0 {
            return Some(from);
        }
        let to = frame(b)?;
        Some(ViewportTransform::lerp(&from, &to, t))
    }
}

impl<'de> serde::Deserialize<'de> for FocusPath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let waypoints = Vec::<FocusWaypoint>::deserialize(deserializer)?;
        Self::new(waypoints).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/focus/path.rs"]
mod tests;
