pub use kurbo::{Point, Rect, Size, TranslateScale, Vec2};

/// Axis-aligned rectangle in world space, `y` growing downwards.
///
/// Wraps a [`Rect`]; on the wire it is the four edges `top`, `bottom`, `left` and `right`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "Edges", into = "Edges")]
pub struct BoundingRect(Rect);

#[derive(Clone, Copy, serde::Serialize, serde::Deserialize)]
struct Edges {
    top: f64,
    bottom: f64,
    left: f64,
    right: f64,
}

impl From<Edges> for BoundingRect {
    fn from(e: Edges) -> Self {
        Self::new(e.left, e.top, e.right, e.bottom)
    }
}

impl From<BoundingRect> for Edges {
    fn from(r: BoundingRect) -> Self {
        Self {
            top: r.top(),
            bottom: r.bottom(),
            left: r.left(),
            right: r.right(),
        }
    }
}

impl From<Rect> for BoundingRect {
    fn from(rect: Rect) -> Self {
        Self(rect.abs())
    }
}

impl From<BoundingRect> for Rect {
    fn from(r: BoundingRect) -> Self {
        r.0
    }
}

impl BoundingRect {
    /// Rectangle with the given edges.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self(Rect::new(left, top, right, bottom))
    }

    /// Zero-area rectangle centered at the origin.
    pub fn degenerate() -> Self {
        Self(Rect::ZERO)
    }

    /// Tight bounds around `points`, expanded on every side by `padding`.
    ///
    /// Returns the degenerate rectangle when `points` is empty.
    pub fn around<'a>(points: impl IntoIterator<Item = &'a Point>, padding: f64) -> Self {
        let mut points = points.into_iter();
        let Some(&first) = points.next() else {
            return Self::degenerate();
        };
        let tight = points.fold(Rect::from_points(first, first), |r, p| r.union_pt(*p));
        Self(tight).expand(padding)
    }

    /// Smallest `x`.
    pub fn left(self) -> f64 {
        self.0.x0
    }

    /// Largest `x`.
    pub fn right(self) -> f64 {
        self.0.x1
    }

    /// Smallest `y`.
    pub fn top(self) -> f64 {
        self.0.y0
    }

    /// Largest `y`.
    pub fn bottom(self) -> f64 {
        self.0.y1
    }

    /// Horizontal extent.
    pub fn width(self) -> f64 {
        self.0.width()
    }

    /// Vertical extent.
    pub fn height(self) -> f64 {
        self.0.height()
    }

    /// Center point.
    pub fn center(self) -> Point {
        self.0.center()
    }

    /// Return `true` when `p` lies inside; the right and bottom edges are outside.
    pub fn contains(self, p: Point) -> bool {
        self.0.contains(p)
    }

    /// Grow every side by `by`.
    pub fn expand(self, by: f64) -> Self {
        Self(self.0.inflate(by, by))
    }

    /// Return `true` when the rectangle has no area.
    pub fn is_degenerate(self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Approximate equality used to detect layout changes.
    pub fn approx_eq(self, other: Self, eps: f64) -> bool {
        let (a, b) = (self.0, other.0);
        [a.x0 - b.x0, a.y0 - b.y0, a.x1 - b.x1, a.y1 - b.y1]
            .iter()
            .all(|d| d.abs() <= eps)
    }
}

/// Padding around the canvas content, in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Padding {
    /// Top inset.
    pub top: f64,
    /// Right inset.
    pub right: f64,
    /// Bottom inset.
    pub bottom: f64,
    /// Left inset.
    pub left: f64,
}

impl Padding {
    /// Same inset on every side.
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

/// Small deterministic PRNG (SplitMix64) used by seeded placement.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    /// Create a generator from `seed`.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform index in `[0, upper)`; `upper` must be non-zero.
    pub fn next_index(&mut self, upper: usize) -> usize {
        (self.next_u64() % (upper as u64)) as usize
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
