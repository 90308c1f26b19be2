use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::animation::ease::Ease;
use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{GraphError, GraphResult};

/// Interpolation contract for animated value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// Completion hook attached to an animation.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn()>);

impl Callback {
    /// Wrap a closure.
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the hook.
    pub fn call(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// Timing of one animation.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Duration in milliseconds; `0` jumps straight to the target.
    pub duration_ms: f64,
    /// Easing curve.
    pub ease: Ease,
    /// Fired once when an animation started with these settings completes.
    #[serde(skip)]
    pub on_complete: Option<Callback>,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            duration_ms: 500.0,
            ease: Ease::InOutCubic,
            on_complete: None,
        }
    }
}

impl AnimationSettings {
    /// Instantaneous jump.
    pub fn instant() -> Self {
        Self {
            duration_ms: 0.0,
            ease: Ease::Linear,
            on_complete: None,
        }
    }

    /// Settings with the given duration and curve.
    pub fn new(duration_ms: f64, ease: Ease) -> Self {
        Self {
            duration_ms,
            ease,
            on_complete: None,
        }
    }

    /// Attach a completion hook.
    pub fn with_on_complete(mut self, f: impl Fn() + 'static) -> Self {
        self.on_complete = Some(Callback::new(f));
        self
    }

    /// Same timing with no completion hook.
    pub fn timing(&self) -> Self {
        Self::new(self.duration_ms, self.ease)
    }

    /// Reject negative or non-finite durations.
    pub fn validate(&self) -> GraphResult<()> {
        if !self.duration_ms.is_finite() || self.duration_ms < 0.0 {
            return Err(GraphError::configuration(
                "animation duration_ms must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Animation settings for a batch: a default plus per-entity overrides.
///
/// An override of `None` disables animation for that entity.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BatchAnimationSettings {
    /// Settings for entities without an override; `None` defers to the engine defaults.
    pub default: Option<AnimationSettings>,
    /// Per-entity settings keyed by vertex or edge key.
    pub overrides: BTreeMap<String, Option<AnimationSettings>>,
}

impl BatchAnimationSettings {
    /// Wrap a single-mutation hint.
    pub fn from_hint(hint: Option<AnimationSettings>) -> Self {
        Self {
            default: hint,
            overrides: BTreeMap::new(),
        }
    }

    /// Add an override for `key`.
    pub fn with_override(mut self, key: impl Into<String>, settings: Option<AnimationSettings>) -> Self {
        self.overrides.insert(key.into(), settings);
        self
    }

    /// Effective settings for `key`.
    pub fn resolve(&self, key: &str, fallback: &AnimationSettings) -> AnimationSettings {
        match self.overrides.get(key) {
            Some(Some(settings)) => settings.clone(),
            Some(None) => AnimationSettings::instant(),
            None => self.default.clone().unwrap_or_else(|| fallback.clone()),
        }
    }
}

/// One value animating from `source` to `target`.
///
/// Retargeting captures the current interpolated value as the new source, so there is never a
/// jump when an animation is replaced mid-flight. The replaced animation's hook never fires.
#[derive(Clone, Debug)]
pub struct Tween<T> {
    source: T,
    target: T,
    start_ms: f64,
    duration_ms: f64,
    ease: Ease,
    on_complete: Option<Callback>,
    done: bool,
}

impl<T> Tween<T>
where
    T: Lerp + Clone,
{
    /// A tween already resting at `value`.
    pub fn settled(value: T) -> Self {
        Self {
            source: value.clone(),
            target: value,
            start_ms: 0.0,
            duration_ms: 0.0,
            ease: Ease::Linear,
            on_complete: None,
            done: true,
        }
    }

    /// Start animating `from -> to` at `now_ms`.
    pub fn new(from: T, to: T, now_ms: f64, settings: &AnimationSettings) -> Self {
        Self {
            source: from,
            target: to,
            start_ms: now_ms,
            duration_ms: settings.duration_ms.max(0.0),
            ease: settings.ease,
            on_complete: settings.on_complete.clone(),
            done: false,
        }
    }

    /// Normalized linear progress in `[0, 1]`.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.done || self.duration_ms <= 0.0 {
            return 1.0;
        }
        let t = (now_ms - self.start_ms) / self.duration_ms;
        if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
    }

    /// Interpolated value; exactly `target` once the duration has elapsed.
    pub fn value(&self, now_ms: f64) -> T {
        let p = self.progress(now_ms);
        if p >= 1.0 {
            return self.target.clone();
        }
        T::lerp(&self.source, &self.target, self.ease.apply(p))
    }

    /// Animate toward a new target starting from the current value.
    pub fn retarget(&mut self, now_ms: f64, target: T, settings: &AnimationSettings) {
        let current = self.value(now_ms);
        *self = Self::new(current, target, now_ms, settings);
    }

    /// Rest at `value` immediately, cancelling any animation in flight.
    pub fn jump(&mut self, value: T) {
        *self = Self::settled(value);
    }

    /// Value being animated toward.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Return `true` while the animation has not reached its target.
    pub fn in_flight(&self, now_ms: f64) -> bool {
        !self.done && self.progress(now_ms) < 1.0
    }

    /// Return `true` on the single call that observes completion; fires the hook there.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if self.done || self.progress(now_ms) < 1.0 {
            return false;
        }
        self.done = true;
        if let Some(hook) = self.on_complete.take() {
            hook.call();
        }
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
