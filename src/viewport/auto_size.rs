use crate::foundation::core::BoundingRect;

/// Decides when the viewport should refit itself to a changed layout.
///
/// A refit is due when the bounding rect differs from the one last fitted, no gesture happened
/// within the timeout and no focus is active. A change that arrives while the user is
/// interacting is not lost: it is picked up once the quiet period has passed.
#[derive(Clone, Debug)]
pub struct AutoSizer {
    timeout_ms: Option<f64>,
    fitted: Option<BoundingRect>,
    last_gesture_ms: Option<f64>,
}

const RECT_EPSILON: f64 = 0.5;

impl AutoSizer {
    /// `None` disables auto-sizing.
    pub fn new(timeout_ms: Option<f64>) -> Self {
        Self {
            timeout_ms,
            fitted: None,
            last_gesture_ms: None,
        }
    }

    /// Return `true` when auto-sizing is enabled.
    pub fn enabled(&self) -> bool {
        self.timeout_ms.is_some()
    }

    /// Note a user gesture at `now_ms`.
    pub fn record_gesture(&mut self, now_ms: f64) {
        self.last_gesture_ms = Some(now_ms);
    }

    /// Remember `rect` as fitted without asking.
    pub fn mark_fitted(&mut self, rect: BoundingRect) {
        self.fitted = Some(rect);
    }

    /// Forget the fitted rect so the next check refits.
    pub fn invalidate(&mut self) {
        self.fitted = None;
    }

    /// Return `true` when the viewport should refit to `rect` now; marks it fitted if so.
    pub fn should_refit(&mut self, rect: BoundingRect, now_ms: f64, focus_active: bool) -> bool {
        let Some(timeout) = self.timeout_ms else {
            return false;
        };
        if self
            .fitted
            .is_some_and(|fitted| fitted.approx_eq(rect, RECT_EPSILON))
        {
            return false;
        }
        if focus_active {
            return false;
        }
        if self
            .last_gesture_ms
            .is_some_and(|at| now_ms - at < timeout)
        {
            return false;
        }
        tracing::debug!(width = rect.width(), height = rect.height(), "auto-sizing refit");
        self.fitted = Some(rect);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/auto_size.rs"]
mod tests;
