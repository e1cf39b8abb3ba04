/// Tunables shared by every front end
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pixels of vertical drag for a full 0 → 1 traversal.
pub const DEFAULT_DRAG_SCALE: f32 = 200.0;

/// Length of the eased fold/unfold transition in toggle layouts.
pub const DEFAULT_TOGGLE_DURATION: Duration = Duration::from_millis(1200);

/// Edge length of the cube used by the eleven-net catalog.
pub const CUBE_NET_EDGE: f32 = 1.0;

/// Edge length of the two-state cross demo.
pub const CROSS_EDGE: f32 = 2.0;

/// Interaction settings for a [`Session`](crate::Session).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnfoldConfig {
    /// Drag sensitivity, in pixels per full traversal.
    pub drag_scale: f32,
    pub toggle_duration: Duration,
    /// Smoothing applied to drag updates. Zero applies every update immediately.
    pub drag_smoothing: Duration,
}

impl UnfoldConfig {
    pub fn with_drag_scale(mut self, drag_scale: f32) -> Self {
        self.drag_scale = drag_scale;
        self
    }

    pub fn with_toggle_duration(mut self, duration: Duration) -> Self {
        self.toggle_duration = duration;
        self
    }

    pub fn with_drag_smoothing(mut self, duration: Duration) -> Self {
        self.drag_smoothing = duration;
        self
    }

    /// Drag scale actually used: falls back to the default for zero, negative
    /// or non-finite values.
    pub fn effective_drag_scale(&self) -> f32 {
        if self.drag_scale.is_finite() && self.drag_scale > 0.0 {
            self.drag_scale
        } else {
            DEFAULT_DRAG_SCALE
        }
    }
}

impl Default for UnfoldConfig {
    fn default() -> Self {
        Self {
            drag_scale: DEFAULT_DRAG_SCALE,
            toggle_duration: DEFAULT_TOGGLE_DURATION,
            drag_smoothing: Duration::ZERO,
        }
    }
}
