use eframe::egui::{Vec2, vec2};
use tracing::debug;

pub const DEFAULT_VIEWPORT: Vec2 = vec2(800.0, 600.0);

/// Last measured size of the surface the bubbles live on.
///
/// Until a usable measurement arrives, [`ViewportTracker::size`] reports
/// [`DEFAULT_VIEWPORT`]. Resizes only move the clamp bounds; nodes outside the
/// new bounds are pulled back by the next steps.
#[derive(Clone, Debug)]
pub struct ViewportTracker<T> {
    measured: Option<Vec2>,
    target: Option<T>,
}

impl<T> Default for ViewportTracker<T> {
    fn default() -> Self {
        Self {
            measured: None,
            target: None,
        }
    }
}

impl<T: PartialEq + Copy> ViewportTracker<T> {
    pub fn size(&self) -> Vec2 {
        self.measured.unwrap_or(DEFAULT_VIEWPORT)
    }

    /// Records a content-box measurement and returns the new size if it changed.
    pub fn observe(&mut self, size: Vec2) -> Option<Vec2> {
        if !size.is_finite() || size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }

        let changed = match self.measured {
            Some(previous) => {
                (previous.x - size.x).abs() > f32::EPSILON
                    || (previous.y - size.y).abs() > f32::EPSILON
            }
            None => true,
        };
        if !changed {
            return None;
        }

        debug!(width = size.x, height = size.y, "viewport resized");
        self.measured = Some(size);
        Some(size)
    }

    /// Points the tracker at a new surface. Returns `true` when the target
    /// actually changed, in which case the old measurement is discarded.
    pub fn retarget(&mut self, target: T) -> bool {
        if self.target == Some(target) {
            return false;
        }
        let had_target = self.target.is_some();
        self.target = Some(target);
        self.measured = None;
        had_target
    }
}
