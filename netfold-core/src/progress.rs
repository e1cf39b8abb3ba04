/// Fold progress and the drag gesture that drives it
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How far a net is unfolded: 0 is the assembled solid, 1 the flat net.
///
/// Always within `[0, 1]`; out-of-range input is clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Progress(f32);

impl Progress {
    pub const FOLDED: Progress = Progress(0.0);
    pub const UNFOLDED: Progress = Progress(1.0);

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            Self::FOLDED
        } else {
            Progress(value.clamp(0.0, 1.0))
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn is_folded(self) -> bool {
        self.0 == 0.0
    }

    pub fn is_unfolded(self) -> bool {
        self.0 == 1.0
    }

    /// The terminal state on the other side of the midpoint.
    pub fn flipped(self) -> Progress {
        if self.0 < 0.5 {
            Self::UNFOLDED
        } else {
            Self::FOLDED
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Start,
    Move,
    End,
    /// The pointer left the surface; ends the gesture like `End`.
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointerSource {
    #[default]
    Mouse,
    Touch,
}

/// A pointer or touch sample in screen pixels, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
    pub source: PointerSource,
}

impl PointerEvent {
    pub fn start(x: f32, y: f32) -> Self {
        Self::mouse(PointerKind::Start, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::mouse(PointerKind::Move, x, y)
    }

    pub fn end(x: f32, y: f32) -> Self {
        Self::mouse(PointerKind::End, x, y)
    }

    pub fn with_source(mut self, source: PointerSource) -> Self {
        self.source = source;
        self
    }

    fn mouse(kind: PointerKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            x,
            y,
            source: PointerSource::Mouse,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Gesture {
    start_y: f32,
    baseline: Progress,
}

/// Maps vertical drags onto progress.
///
/// Dragging up unfolds: `progress = clamp(baseline + (start_y − y) / drag_scale)`.
#[derive(Debug, Clone)]
pub struct DragController {
    progress: Progress,
    gesture: Option<Gesture>,
    drag_scale: f32,
}

impl DragController {
    pub fn new(initial: Progress, drag_scale: f32) -> Self {
        Self {
            progress: initial,
            gesture: None,
            drag_scale,
        }
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn drag_scale(&self) -> f32 {
        self.drag_scale
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// Sets progress directly and abandons any gesture in flight.
    pub fn reset(&mut self, progress: Progress) {
        self.progress = progress;
        self.gesture = None;
    }

    /// Starts a gesture. A second start replaces the first baseline.
    pub fn begin(&mut self, y: f32) {
        self.gesture = Some(Gesture {
            start_y: y,
            baseline: self.progress,
        });
    }

    /// Returns the new progress if the move changed it.
    pub fn drag_to(&mut self, y: f32) -> Option<Progress> {
        let gesture = self.gesture?;
        let next = Progress::new(gesture.baseline.value() + (gesture.start_y - y) / self.drag_scale);
        if next == self.progress {
            return None;
        }
        self.progress = next;
        Some(next)
    }

    /// Ends the gesture, keeping the last progress.
    pub fn end(&mut self) {
        self.gesture = None;
    }

    pub fn handle(&mut self, event: &PointerEvent) -> Option<Progress> {
        match event.kind {
            PointerKind::Start => {
                debug!(y = event.y, source = ?event.source, "drag started");
                self.begin(event.y);
                None
            }
            PointerKind::Move => self.drag_to(event.y),
            PointerKind::End | PointerKind::Leave => {
                if self.gesture.is_some() {
                    debug!(progress = self.progress.value(), kind = ?event.kind, "drag ended");
                }
                self.end();
                None
            }
        }
    }
}
