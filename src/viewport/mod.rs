//! World-to-screen mapping, fitting and gestures.

use crate::foundation::core::Padding;
use crate::foundation::error::{GraphError, GraphResult};

pub mod auto_size;
pub mod transform;

pub use auto_size::AutoSizer;
pub use transform::ViewportTransform;

/// How the placed graph is scaled into the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectFit {
    /// Whole graph visible.
    #[default]
    Contain,
    /// Canvas fully covered; parts of the graph may be cut off.
    Cover,
    /// Keep `initial_scale`.
    None,
}

/// Viewport options.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Fit mode.
    pub object_fit: ObjectFit,
    /// Insets kept free around the graph, in screen pixels.
    pub padding: Padding,
    /// Allowed zoom levels, strictly ascending; double tap cycles through them.
    pub scales: Vec<f64>,
    /// Starting scale; must be one of `scales`.
    pub initial_scale: f64,
    /// Quiet period after a gesture before auto-sizing may refit; `None` disables auto-sizing.
    pub auto_sizing_timeout_ms: Option<f64>,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            object_fit: ObjectFit::Contain,
            padding: Padding::uniform(20.0),
            scales: vec![0.25, 0.5, 1.0, 2.0, 4.0],
            initial_scale: 1.0,
            auto_sizing_timeout_ms: Some(3000.0),
        }
    }
}

impl ViewportSettings {
    /// Check the scale ladder, padding and timeout.
    pub fn validate(&self) -> GraphResult<()> {
        if self.scales.is_empty() {
            return Err(GraphError::configuration("viewport.scales must not be empty"));
        }
        if self.scales.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(GraphError::configuration(
                "viewport.scales must all be positive",
            ));
        }
        if self.scales.windows(2).any(|w| w[0] >= w[1]) {
            return Err(GraphError::configuration(
                "viewport.scales must be strictly ascending",
            ));
        }
        if !self.scales.contains(&self.initial_scale) {
            return Err(GraphError::configuration(format!(
                "viewport.initial_scale {} is not one of viewport.scales",
                self.initial_scale
            )));
        }
        let p = self.padding;
        if [p.top, p.right, p.bottom, p.left]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(GraphError::configuration(
                "viewport.padding must be finite and >= 0",
            ));
        }
        if let Some(t) = self.auto_sizing_timeout_ms
            && (!t.is_finite() || t < 0.0)
        {
            return Err(GraphError::configuration(
                "viewport.auto_sizing_timeout_ms must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Smallest allowed scale.
    pub fn min_scale(&self) -> f64 {
        self.scales.first().copied().unwrap_or(1.0)
    }

    /// Largest allowed scale.
    pub fn max_scale(&self) -> f64 {
        self.scales.last().copied().unwrap_or(1.0)
    }

    /// Clamp into `[min_scale, max_scale]`.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale(), self.max_scale())
    }

    /// Next configured scale above `current`, wrapping to the smallest.
    pub fn next_scale(&self, current: f64) -> f64 {
        self.scales
            .iter()
            .copied()
            .find(|s| *s > current * (1.0 + 1e-9))
            .unwrap_or_else(|| self.min_scale())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/mod.rs"]
mod tests;
