use crate::animation::ease::Ease;
use crate::animation::tween::{AnimationSettings, Tween};
use crate::viewport::ViewportTransform;

/// Focus lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusState {
    /// No focus override; the viewport shows its own transform.
    #[default]
    Blurred,
    /// Moving toward a focus target.
    Focusing,
    /// Resting on the target, following it if it moves.
    Focused,
    /// Returning to the unfocused transform.
    Blurring,
}

/// Drives the viewport override of a focus transition.
///
/// Every transition starts from the transform currently on screen, so switching targets or
/// blurring mid-flight never jumps.
#[derive(Clone, Debug)]
pub struct FocusResolver {
    state: FocusState,
    transform: Tween<ViewportTransform>,
    ease: Ease,
    ends_at_ms: f64,
}

impl Default for FocusResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusResolver {
    /// Blurred resolver.
    pub fn new() -> Self {
        Self {
            state: FocusState::Blurred,
            transform: Tween::settled(ViewportTransform::IDENTITY),
            ease: Ease::default(),
            ends_at_ms: 0.0,
        }
    }

    /// Current state.
    pub fn state(&self) -> FocusState {
        self.state
    }

    /// Return `true` unless blurred.
    pub fn is_active(&self) -> bool {
        self.state != FocusState::Blurred
    }

    /// Return `true` while focusing or focused.
    pub fn holds_focus(&self) -> bool {
        matches!(self.state, FocusState::Focusing | FocusState::Focused)
    }

    fn start(
        &mut self,
        state: FocusState,
        current: ViewportTransform,
        target: ViewportTransform,
        now_ms: f64,
        settings: &AnimationSettings,
    ) {
        tracing::debug!(from = ?self.state, to = ?state, "focus transition");
        self.state = state;
        self.transform = Tween::new(current, target, now_ms, settings);
        self.ease = settings.ease;
        self.ends_at_ms = now_ms + settings.duration_ms.max(0.0);
    }

    /// Move toward `target`, starting from the transform now on screen.
    pub fn focus(
        &mut self,
        current: ViewportTransform,
        target: ViewportTransform,
        now_ms: f64,
        settings: &AnimationSettings,
    ) {
        self.start(FocusState::Focusing, current, target, now_ms, settings);
    }

    /// Return to `restore`, starting from the transform now on screen.
    ///
    /// Ignored when already blurred.
    pub fn blur(
        &mut self,
        current: ViewportTransform,
        restore: ViewportTransform,
        now_ms: f64,
        settings: &AnimationSettings,
    ) {
        if self.state == FocusState::Blurred {
            return;
        }
        self.start(FocusState::Blurring, current, restore, now_ms, settings);
    }

    /// Update the target while focusing or focused, e.g. because the vertex moved.
    ///
    /// A running transition keeps its end time; a settled focus snaps to the new target.
    pub fn follow(&mut self, target: ViewportTransform, now_ms: f64) {
        match self.state {
            FocusState::Focused => self.transform.jump(target),
            FocusState::Focusing => {
                if *self.transform.target() == target {
                    return;
                }
                let remaining = AnimationSettings::new((self.ends_at_ms - now_ms).max(0.0), self.ease);
                self.transform.retarget(now_ms, target, &remaining);
            }
            FocusState::Blurred | FocusState::Blurring => {}
        }
    }

    /// Advance to `now_ms` and return the override transform, if any.
    pub fn tick(&mut self, now_ms: f64) -> Option<ViewportTransform> {
        let value = self.transform.value(now_ms);
        if self.transform.poll(now_ms) {
            let next = match self.state {
                FocusState::Focusing => FocusState::Focused,
                FocusState::Blurring => FocusState::Blurred,
                other => other,
            };
            if next != self.state {
                tracing::debug!(from = ?self.state, to = ?next, "focus settled");
                self.state = next;
            }
        }
        match self.state {
            FocusState::Blurred => None,
            _ => Some(value),
        }
    }

    /// Override transform at `now_ms` without advancing state.
    pub fn current(&self, now_ms: f64) -> Option<ViewportTransform> {
        self.is_active().then(|| self.transform.value(now_ms))
    }

    /// Drop to blurred immediately.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/focus/resolver.rs"]
mod tests;
