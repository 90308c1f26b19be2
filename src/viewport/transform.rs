use crate::animation::tween::Lerp;
use crate::foundation::core::{BoundingRect, Padding, Point, Rect, Size, TranslateScale, Vec2};
use crate::viewport::{ObjectFit, ViewportSettings};

/// World-to-screen mapping: `screen = translate + world * scale`.
///
/// A serializable view of a [`TranslateScale`]; the point mapping goes through kurbo.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewportTransform {
    /// Screen offset of the world origin.
    pub translate: Vec2,
    /// Uniform zoom.
    pub scale: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Lerp for ViewportTransform {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            translate: <Vec2 as Lerp>::lerp(&a.translate, &b.translate, t),
            scale: <f64 as Lerp>::lerp(&a.scale, &b.scale, t),
        }
    }
}

impl From<TranslateScale> for ViewportTransform {
    fn from(ts: TranslateScale) -> Self {
        Self {
            translate: ts.translation,
            scale: ts.scale,
        }
    }
}

impl From<ViewportTransform> for TranslateScale {
    fn from(t: ViewportTransform) -> Self {
        TranslateScale::new(t.translate, t.scale)
    }
}

impl ViewportTransform {
    /// No offset, unit scale.
    pub const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        scale: 1.0,
    };

    /// Map a world point to the screen.
    pub fn to_screen(self, world: Point) -> Point {
        TranslateScale::from(self) * world
    }

    /// Map a screen point back to the world.
    pub fn to_world(self, screen: Point) -> Point {
        TranslateScale::from(self).inverse() * screen
    }

    /// Fit `rect` into the padded canvas according to `settings.object_fit`, centered.
    pub fn fit(rect: BoundingRect, canvas: Size, settings: &ViewportSettings) -> Self {
        let area = padded_area(canvas, settings.padding);
        let wx = area.width() / rect.width();
        let wy = area.height() / rect.height();
        let raw = match settings.object_fit {
            ObjectFit::Contain => wx.min(wy),
            ObjectFit::Cover => finite_max(wx, wy),
            ObjectFit::None => settings.initial_scale,
        };
        let scale = if raw.is_finite() && raw > 0.0 {
            settings.clamp_scale(raw)
        } else {
            settings.initial_scale
        };
        Self::anchored(rect.center(), scale, area.center())
    }

    /// Transform that draws `world` at the screen point `anchor`, zoomed by `scale`.
    pub fn anchored(world: Point, scale: f64, anchor: Point) -> Self {
        let ts = TranslateScale::translate(anchor.to_vec2())
            * TranslateScale::scale(scale)
            * TranslateScale::translate(-world.to_vec2());
        ts.into()
    }

    /// Shift by a screen-space delta.
    pub fn pan(self, delta: Vec2) -> Self {
        (TranslateScale::translate(delta) * TranslateScale::from(self)).into()
    }

    /// Zoom to `scale` keeping the world point under `focal` fixed on screen.
    pub fn zoom_to(self, scale: f64, focal: Point) -> Self {
        let world = self.to_world(focal);
        Self::anchored(world, scale, focal)
    }

    /// Multiply the scale by `factor` around `focal`, clamped to the configured range.
    pub fn pinch(self, factor: f64, focal: Point, settings: &ViewportSettings) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return self;
        }
        self.zoom_to(settings.clamp_scale(self.scale * factor), focal)
    }

    /// Step to the next configured scale around `focal`, wrapping back to the smallest.
    pub fn double_tap(self, focal: Point, settings: &ViewportSettings) -> Self {
        self.zoom_to(settings.next_scale(self.scale), focal)
    }
}

/// Screen area inside `padding`; empty, never inverted, when the padding exceeds the canvas.
pub(crate) fn padded_area(canvas: Size, padding: Padding) -> Rect {
    let width = (canvas.width - padding.left - padding.right).max(0.0);
    let height = (canvas.height - padding.top - padding.bottom).max(0.0);
    Rect::from_origin_size((padding.left, padding.top), (width, height))
}

fn finite_max(a: f64, b: f64) -> f64 {
    match (a.is_finite(), b.is_finite()) {
        (true, true) => a.max(b),
        (true, false) => a,
        (false, true) => b,
        (false, false) => f64::INFINITY,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/transform.rs"]
mod tests;
