use std::f64::consts::FRAC_PI_2;

/// Easing curve applied to a tween's normalized progress.
///
/// Every `Out*` curve is its `In*` counterpart mirrored through `(0.5, 0.5)`, and every
/// `InOut*` curve runs the `In*` shape over the first half and the mirror over the second.
/// Endpoints are exact: `apply(0) == 0` and `apply(1) == 1` for every curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Constant speed.
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    /// Default for mounts, layout changes and focus transitions.
    #[default]
    InOutCubic,
    /// Gentler than quad near the endpoints.
    InSine,
    OutSine,
    InOutSine,
}

#[derive(Clone, Copy)]
enum Form {
    In,
    Out,
    InOut,
}

#[derive(Clone, Copy)]
enum Shape {
    Quad,
    Cubic,
    Sine,
}

impl Shape {
    fn ease_in(self, t: f64) -> f64 {
        match self {
            Self::Quad => t * t,
            Self::Cubic => t * t * t,
            Self::Sine => 1.0 - (t * FRAC_PI_2).cos(),
        }
    }
}

impl Ease {
    /// Map progress `t` through the curve; `t` is clamped into `[0, 1]` and NaN counts as `0`.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t == 0.0 || t == 1.0 {
            return t;
        }
        let (shape, form) = match self.parts() {
            Some(parts) => parts,
            None => return t,
        };
        match form {
            Form::In => shape.ease_in(t),
            Form::Out => 1.0 - shape.ease_in(1.0 - t),
            Form::InOut if t < 0.5 => shape.ease_in(2.0 * t) / 2.0,
            Form::InOut => 1.0 - shape.ease_in(2.0 - 2.0 * t) / 2.0,
        }
    }

    /// `None` for `Linear`.
    fn parts(self) -> Option<(Shape, Form)> {
        Some(match self {
            Self::Linear => return None,
            Self::InQuad => (Shape::Quad, Form::In),
            Self::OutQuad => (Shape::Quad, Form::Out),
            Self::InOutQuad => (Shape::Quad, Form::InOut),
            Self::InCubic => (Shape::Cubic, Form::In),
            Self::OutCubic => (Shape::Cubic, Form::Out),
            Self::InOutCubic => (Shape::Cubic, Form::InOut),
            Self::InSine => (Shape::Sine, Form::In),
            Self::OutSine => (Shape::Sine, Form::Out),
            Self::InOutSine => (Shape::Sine, Form::InOut),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
