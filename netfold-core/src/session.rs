//! The interactive session front ends drive.
//!
//! A [`Session`] owns the active layout, the progress controller and one
//! [`FaceAnimator`] per face. Every command returns the pose updates it caused,
//! so renderers only touch faces that actually moved.

use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::UnfoldConfig;
use crate::error::{NetfoldError, Result};
use crate::layout::{ControlMode, Face, Layout};
use crate::progress::{DragController, PointerEvent, Progress};
use crate::registry::LayoutRegistry;
use crate::transform::Pose;
use crate::tween::{FaceAnimator, FoldState};

/// Layout shown when a session starts without an explicit choice.
pub const DEFAULT_LAYOUT: &str = "cube/141-1";

/// New displayed pose of one face.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseUpdate {
    /// The face label.
    pub id: String,
    /// Index of the face within its layout.
    pub index: usize,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
}

impl PoseUpdate {
    fn new(index: usize, face: &Face, pose: &Pose) -> Self {
        let (p, r) = (pose.position, pose.rotation);
        Self {
            id: face.label().to_string(),
            index,
            position: [p.x, p.y, p.z],
            rotation: [r.x, r.y, r.z],
        }
    }
}

fn settled_state(progress: Progress) -> Option<FoldState> {
    if progress.is_folded() {
        Some(FoldState::Folded)
    } else if progress.is_unfolded() {
        Some(FoldState::Unfolded)
    } else {
        None
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    registry: LayoutRegistry,
    config: UnfoldConfig,
    active: usize,
    drag: DragController,
    faces: Vec<FaceAnimator>,
}

impl Session {
    pub fn new(registry: LayoutRegistry, config: UnfoldConfig, initial: &str) -> Result<Self> {
        let active = registry
            .position(initial)
            .ok_or_else(|| NetfoldError::InvalidLayoutId(initial.to_string()))?;
        let mut session = Self {
            registry,
            config,
            active,
            drag: DragController::new(Progress::FOLDED, config.effective_drag_scale()),
            faces: Vec::new(),
        };
        session.activate(active);
        Ok(session)
    }

    /// Session over the built-in catalog, starting at [`DEFAULT_LAYOUT`].
    pub fn with_builtin(config: UnfoldConfig) -> Result<Self> {
        let registry = LayoutRegistry::try_builtin()?;
        Self::new(registry, config, DEFAULT_LAYOUT)
    }

    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }

    pub fn config(&self) -> &UnfoldConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.registry.layouts()[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Current progress. In toggle layouts this is the state being moved
    /// towards, not the partially eased pose.
    pub fn progress(&self) -> Progress {
        self.drag.progress()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn is_animating(&self) -> bool {
        self.faces.iter().any(|f| !f.is_settled())
    }

    pub fn fold_state(&self, index: usize) -> Option<FoldState> {
        self.faces.get(index).map(FaceAnimator::state)
    }

    pub fn displayed_pose(&self, index: usize) -> Option<&Pose> {
        self.faces.get(index).map(FaceAnimator::pose)
    }

    /// Displayed pose of every face.
    pub fn poses(&self) -> Vec<PoseUpdate> {
        self.layout()
            .faces()
            .iter()
            .zip(&self.faces)
            .enumerate()
            .map(|(i, (face, anim))| PoseUpdate::new(i, face, anim.pose()))
            .collect()
    }

    /// Switches to the layout `id`, resetting progress to its initial value.
    ///
    /// Selecting the active layout changes nothing and returns no updates. An
    /// unknown id is rejected and the current layout stays active.
    pub fn select(&mut self, id: &str) -> Result<Vec<PoseUpdate>> {
        let index = self
            .registry
            .position(id)
            .ok_or_else(|| NetfoldError::InvalidLayoutId(id.to_string()))?;
        if index == self.active {
            debug!(layout = id, "layout already active");
            return Ok(Vec::new());
        }
        self.activate(index);
        Ok(self.poses())
    }

    /// Selects the layout `offset` positions away, wrapping around.
    pub fn cycle(&mut self, offset: isize) -> Vec<PoseUpdate> {
        let len = self.registry.len() as isize;
        let index = (self.active as isize + offset).rem_euclid(len) as usize;
        if index == self.active {
            return Vec::new();
        }
        self.activate(index);
        self.poses()
    }

    fn activate(&mut self, index: usize) {
        self.active = index;
        let layout = &self.registry.layouts()[index];
        let progress = layout.initial_progress();
        self.drag.reset(progress);
        let state = settled_state(progress).unwrap_or(FoldState::Transitioning { unfolding: true });
        self.faces = layout
            .faces()
            .iter()
            .map(|face| FaceAnimator::new(face.pose_at(progress), state))
            .collect();
        info!(
            layout = layout.id(),
            mode = ?layout.mode(),
            progress = progress.value(),
            "layout selected"
        );
    }

    /// Feeds a pointer sample to the drag controller. Ignored in toggle layouts.
    pub fn pointer(&mut self, event: &PointerEvent) -> Vec<PoseUpdate> {
        if self.layout().mode() == ControlMode::Toggle {
            debug!(kind = ?event.kind, "pointer ignored in toggle layout");
            return Vec::new();
        }
        let before = self.drag.progress();
        match self.drag.handle(event) {
            Some(progress) => {
                let unfolding = progress > before;
                let state = settled_state(progress).unwrap_or(FoldState::Transitioning { unfolding });
                self.retarget(progress, state, self.config.drag_smoothing)
            }
            None => Vec::new(),
        }
    }

    fn retarget(&mut self, progress: Progress, state: FoldState, duration: Duration) -> Vec<PoseUpdate> {
        let layout = &self.registry.layouts()[self.active];
        let mut updates = Vec::new();
        for (i, (face, anim)) in layout.faces().iter().zip(&mut self.faces).enumerate() {
            if anim.follow(face.pose_at(progress), state, duration) {
                updates.push(PoseUpdate::new(i, face, anim.pose()));
            }
        }
        updates
    }

    /// Flips a toggle layout between folded and unfolded. Ignored in drag layouts.
    pub fn toggle(&mut self) -> Vec<PoseUpdate> {
        let target = self.drag.progress().flipped();
        self.set_folded(target.is_folded())
    }

    /// Starts the eased transition to the folded (`true`) or unfolded state.
    /// Mid-transition the faces turn around from where they are.
    pub fn set_folded(&mut self, folded: bool) -> Vec<PoseUpdate> {
        if self.layout().mode() == ControlMode::Drag {
            debug!(folded, "toggle ignored in drag layout");
            return Vec::new();
        }
        let target = if folded { Progress::FOLDED } else { Progress::UNFOLDED };
        self.drag.reset(target);
        debug!(folded, "fold transition");

        let duration = self.config.toggle_duration;
        let layout = &self.registry.layouts()[self.active];
        let mut updates = Vec::new();
        for (i, (face, anim)) in layout.faces().iter().zip(&mut self.faces).enumerate() {
            if anim.transition(!folded, face.pose_at(target), duration) {
                updates.push(PoseUpdate::new(i, face, anim.pose()));
            }
        }
        updates
    }

    /// Advances running transitions by `dt`, returning the faces that moved.
    pub fn tick(&mut self, dt: Duration) -> Vec<PoseUpdate> {
        let layout = &self.registry.layouts()[self.active];
        let mut updates = Vec::new();
        for (i, (face, anim)) in layout.faces().iter().zip(&mut self.faces).enumerate() {
            if anim.advance(dt) {
                updates.push(PoseUpdate::new(i, face, anim.pose()));
            }
        }
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn session() -> Session {
        Session::with_builtin(UnfoldConfig::default()).unwrap()
    }

    fn drag(session: &mut Session, from: f32, to: f32) -> Vec<PoseUpdate> {
        session.pointer(&PointerEvent::start(0.0, from));
        let updates = session.pointer(&PointerEvent::moved(0.0, to));
        session.pointer(&PointerEvent::end(0.0, to));
        updates
    }

    #[test]
    fn test_starts_on_default_layout() {
        let session = session();
        assert_eq!(session.layout().id(), DEFAULT_LAYOUT);
        assert_eq!(session.progress(), Progress::UNFOLDED);
        for (update, face) in session.poses().iter().zip(session.layout().faces()) {
            let pose = face.unfolded();
            assert_eq!(update.position, [pose.position.x, pose.position.y, pose.position.z]);
        }
        assert_eq!(session.fold_state(0), Some(FoldState::Unfolded));
    }

    #[test]
    fn test_unknown_initial_layout() {
        let err = Session::new(LayoutRegistry::builtin(), UnfoldConfig::default(), "cube/7").unwrap_err();
        assert_eq!(err, NetfoldError::InvalidLayoutId("cube/7".into()));
    }

    #[test]
    fn test_select_same_layout_is_noop() {
        let mut session = session();
        drag(&mut session, 100.0, 150.0);
        let progress = session.progress();
        assert_eq!(session.select(DEFAULT_LAYOUT).unwrap(), Vec::new());
        assert_eq!(session.progress(), progress);
    }

    #[test]
    fn test_invalid_select_keeps_layout() {
        let mut session = session();
        let err = session.select("sphere/net").unwrap_err();
        assert_eq!(err, NetfoldError::InvalidLayoutId("sphere/net".into()));
        assert_eq!(session.layout().id(), DEFAULT_LAYOUT);
    }

    #[test]
    fn test_select_resets_progress() {
        let mut session = session();
        drag(&mut session, 100.0, 150.0);
        assert_relative_eq!(session.progress().value(), 0.75);

        let updates = session.select("cylinder/net").unwrap();
        assert_eq!(updates.len(), 3);
        assert_eq!(session.progress(), Progress::FOLDED);

        session.select(DEFAULT_LAYOUT).unwrap();
        assert_eq!(session.progress(), Progress::UNFOLDED);
    }

    #[test]
    fn test_drag_half_way_interpolates_every_face() {
        let mut session = session();
        session.select("cylinder/net").unwrap();
        let updates = drag(&mut session, 300.0, 200.0);
        assert_eq!(session.progress().value(), 0.5);
        assert_eq!(updates.len(), 3);
        for (update, face) in updates.iter().zip(session.layout().faces()) {
            let expected = face.pose_at(Progress::new(0.5));
            assert_relative_eq!(update.position[1], expected.position.y);
            assert_relative_eq!(update.rotation[0], expected.rotation.x);
        }
        assert_eq!(session.fold_state(1), Some(FoldState::Transitioning { unfolding: true }));
    }

    #[test]
    fn test_full_drag_lands_exactly_on_net() {
        let mut session = session();
        session.select("cone/net").unwrap();
        drag(&mut session, 0.0, -10_000.0);
        for (i, face) in session.layout().faces().iter().enumerate() {
            assert_eq!(session.displayed_pose(i), Some(face.unfolded()));
            assert_eq!(session.fold_state(i), Some(FoldState::Unfolded));
        }
        drag(&mut session, 0.0, 10_000.0);
        for (i, face) in session.layout().faces().iter().enumerate() {
            assert_eq!(session.displayed_pose(i), Some(face.folded()));
        }
    }

    #[test]
    fn test_modes_ignore_foreign_commands() {
        let mut session = session();
        assert!(session.toggle().is_empty());
        assert_eq!(session.progress(), Progress::UNFOLDED);

        session.select("cube/cross").unwrap();
        assert!(drag(&mut session, 300.0, 500.0).is_empty());
        assert_eq!(session.progress(), Progress::UNFOLDED);
    }

    #[test]
    fn test_toggle_transition_and_retarget() {
        let mut session = session();
        session.select("cube/cross").unwrap();
        assert!(session.toggle().is_empty());
        assert_eq!(session.progress(), Progress::FOLDED);
        assert_eq!(session.fold_state(0), Some(FoldState::Transitioning { unfolding: false }));

        let moved = session.tick(Duration::from_millis(600));
        assert_eq!(moved.len(), 6);
        let before = session.poses();

        session.toggle();
        assert_eq!(session.progress(), Progress::UNFOLDED);
        assert_eq!(session.poses(), before);
        assert_eq!(session.fold_state(0), Some(FoldState::Transitioning { unfolding: true }));

        session.tick(Duration::from_millis(1200));
        assert!(!session.is_animating());
        for (i, face) in session.layout().faces().iter().enumerate() {
            assert_eq!(session.displayed_pose(i), Some(face.unfolded()));
            assert_eq!(session.fold_state(i), Some(FoldState::Unfolded));
        }
        assert!(session.tick(Duration::from_millis(16)).is_empty());
    }

    #[test]
    fn test_set_folded_twice_is_noop() {
        let mut session = session();
        session.select("cube/cross").unwrap();
        session.set_folded(true);
        session.tick(Duration::from_secs(2));
        assert_eq!(session.fold_state(2), Some(FoldState::Folded));
        assert!(session.set_folded(true).is_empty());
        assert!(!session.is_animating());
    }

    #[test]
    fn test_zero_toggle_duration_jumps() {
        let config = UnfoldConfig::default().with_toggle_duration(Duration::ZERO);
        let mut session = Session::new(LayoutRegistry::builtin(), config, "cube/cross").unwrap();
        let updates = session.toggle();
        assert_eq!(updates.len(), 6);
        assert_eq!(session.fold_state(0), Some(FoldState::Folded));
    }

    #[test]
    fn test_drag_smoothing_eases_into_target() {
        let config = UnfoldConfig::default().with_drag_smoothing(Duration::from_millis(100));
        let mut session = Session::new(LayoutRegistry::builtin(), config, "cylinder/net").unwrap();
        assert!(drag(&mut session, 200.0, 0.0).is_empty());
        assert!(session.is_animating());
        assert_eq!(session.fold_state(1), Some(FoldState::Transitioning { unfolding: true }));
        session.tick(Duration::from_millis(100));
        let top = &session.layout().faces()[1];
        assert_eq!(session.displayed_pose(1), Some(top.unfolded()));
        assert_eq!(session.fold_state(1), Some(FoldState::Unfolded));
    }

    #[test]
    fn test_cycle_wraps() {
        let mut session = session();
        let len = session.registry().len() as isize;
        session.cycle(-1);
        assert_eq!(session.active_index(), (len - 1) as usize);
        session.cycle(1);
        assert_eq!(session.layout().id(), DEFAULT_LAYOUT);
        assert!(session.cycle(len).is_empty());
    }
}
