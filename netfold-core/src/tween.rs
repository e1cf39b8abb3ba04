//! Time-based pose transitions.
//!
//! [`PoseTween`] is the single animation primitive: retargeting with a zero
//! duration applies the target immediately (drag layouts), a non-zero
//! duration plays an eased transition from wherever the pose currently is
//! (toggle layouts, extracting the hollow cube's sub-cube).

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::transform::Pose;

/// Cubic ease-in-out on `[0, 1]`.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoseTween {
    from: Pose,
    to: Pose,
    current: Pose,
    elapsed: Duration,
    duration: Duration,
}

impl PoseTween {
    /// A settled tween resting at `pose`.
    pub fn new(pose: Pose) -> Self {
        Self {
            from: pose,
            to: pose,
            current: pose,
            elapsed: Duration::ZERO,
            duration: Duration::ZERO,
        }
    }

    pub fn current(&self) -> &Pose {
        &self.current
    }

    pub fn target(&self) -> &Pose {
        &self.to
    }

    pub fn is_settled(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Aims at `target`, starting from the pose displayed right now.
    ///
    /// Returns whether the displayed pose changed, which only happens for a
    /// zero duration.
    pub fn retarget(&mut self, target: Pose, duration: Duration) -> bool {
        self.from = self.current;
        self.to = target;
        self.elapsed = Duration::ZERO;
        self.duration = duration;
        if duration.is_zero() {
            let changed = self.current != target;
            self.current = target;
            return changed;
        }
        false
    }

    /// Jumps to `pose` and stops any transition.
    pub fn snap(&mut self, pose: Pose) {
        *self = Self::new(pose);
    }

    /// Advances the clock; returns whether the displayed pose changed.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.is_settled() {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
        let previous = self.current;
        self.current = if self.is_settled() {
            self.to
        } else {
            let t = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
            self.from.lerp(&self.to, ease_in_out_cubic(t))
        };
        self.current != previous
    }
}

/// Per-face fold state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoldState {
    Folded,
    Transitioning { unfolding: bool },
    Unfolded,
}

impl FoldState {
    fn settled(unfolding: bool) -> Self {
        if unfolding {
            FoldState::Unfolded
        } else {
            FoldState::Folded
        }
    }
}

/// A face's displayed pose together with its fold state.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceAnimator {
    tween: PoseTween,
    state: FoldState,
    // state taken once the tween settles
    resting: FoldState,
}

impl FaceAnimator {
    pub fn new(pose: Pose, state: FoldState) -> Self {
        Self {
            tween: PoseTween::new(pose),
            state,
            resting: state,
        }
    }

    pub fn pose(&self) -> &Pose {
        self.tween.current()
    }

    pub fn state(&self) -> FoldState {
        self.state
    }

    pub fn is_settled(&self) -> bool {
        self.tween.is_settled()
    }

    /// Starts (or retargets) a transition towards the folded or unfolded pose.
    ///
    /// Mid-transition the new transition begins at the current interpolated
    /// pose. Returns whether the displayed pose changed immediately.
    pub fn transition(&mut self, unfolding: bool, target: Pose, duration: Duration) -> bool {
        if self.state == FoldState::settled(unfolding) && self.tween.target() == &target {
            return false;
        }
        self.follow(target, FoldState::settled(unfolding), duration)
    }

    /// Follows a continuously changing target, as in drag layouts.
    ///
    /// `resting` is the state once the pose reaches `target`; until then the
    /// face reports a transition heading that way.
    pub fn follow(&mut self, target: Pose, resting: FoldState, duration: Duration) -> bool {
        let changed = self.tween.retarget(target, duration);
        self.resting = resting;
        self.state = if self.tween.is_settled() {
            resting
        } else {
            let unfolding = match resting {
                FoldState::Folded => false,
                FoldState::Unfolded => true,
                FoldState::Transitioning { unfolding } => unfolding,
            };
            FoldState::Transitioning { unfolding }
        };
        changed
    }

    pub fn snap(&mut self, pose: Pose, state: FoldState) {
        self.tween.snap(pose);
        self.state = state;
        self.resting = state;
    }

    pub fn advance(&mut self, dt: Duration) -> bool {
        let changed = self.tween.advance(dt);
        if self.tween.is_settled() {
            self.state = self.resting;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn at_x(x: f32) -> Pose {
        Pose::from_arrays([x, 0.0, 0.0], [0.0; 3])
    }

    #[test]
    fn test_easing_endpoints_and_symmetry() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert_relative_eq!(ease_in_out_cubic(0.5), 0.5);
        assert_relative_eq!(ease_in_out_cubic(0.25) + ease_in_out_cubic(0.75), 1.0, epsilon = 1e-6);
        assert_eq!(ease_in_out_cubic(2.0), 1.0);
    }

    #[test]
    fn test_zero_duration_applies_immediately() {
        let mut tween = PoseTween::new(at_x(0.0));
        assert!(tween.retarget(at_x(2.0), Duration::ZERO));
        assert_eq!(tween.current(), &at_x(2.0));
        assert!(tween.is_settled());
        assert!(!tween.advance(Duration::from_millis(16)));
    }

    #[test]
    fn test_timed_transition_lands_on_target() {
        let mut tween = PoseTween::new(at_x(0.0));
        assert!(!tween.retarget(at_x(4.0), Duration::from_millis(1000)));
        assert_eq!(tween.current(), &at_x(0.0));

        tween.advance(Duration::from_millis(500));
        assert_relative_eq!(tween.current().position.x, 2.0, epsilon = 1e-5);

        tween.advance(Duration::from_millis(700));
        assert!(tween.is_settled());
        assert_eq!(tween.current(), &at_x(4.0));
    }

    #[test]
    fn test_retarget_starts_from_current_pose() {
        let mut tween = PoseTween::new(at_x(0.0));
        tween.retarget(at_x(4.0), Duration::from_millis(1000));
        tween.advance(Duration::from_millis(250));
        let before = *tween.current();

        tween.retarget(at_x(0.0), Duration::from_millis(1000));
        assert_eq!(tween.current(), &before);

        tween.advance(Duration::from_millis(100));
        assert!(tween.current().position.x < before.position.x);
    }

    #[test]
    fn test_face_animator_state_machine() {
        let mut face = FaceAnimator::new(at_x(0.0), FoldState::Folded);
        let duration = Duration::from_millis(1200);

        assert!(!face.transition(true, at_x(1.0), duration));
        assert_eq!(face.state(), FoldState::Transitioning { unfolding: true });

        face.advance(Duration::from_millis(600));
        assert_eq!(face.state(), FoldState::Transitioning { unfolding: true });

        face.transition(false, at_x(0.0), duration);
        assert_eq!(face.state(), FoldState::Transitioning { unfolding: false });

        face.advance(duration);
        assert_eq!(face.state(), FoldState::Folded);
        assert_eq!(face.pose(), &at_x(0.0));
    }

    #[test]
    fn test_follow_reports_transition_until_settled() {
        let mut face = FaceAnimator::new(at_x(0.0), FoldState::Folded);
        face.follow(at_x(1.0), FoldState::Unfolded, Duration::from_millis(100));
        assert_eq!(face.state(), FoldState::Transitioning { unfolding: true });

        face.advance(Duration::from_millis(100));
        assert_eq!(face.state(), FoldState::Unfolded);
        assert_eq!(face.pose(), &at_x(1.0));

        let midway = FoldState::Transitioning { unfolding: false };
        face.follow(at_x(0.5), midway, Duration::from_millis(100));
        face.advance(Duration::from_millis(100));
        assert_eq!(face.state(), midway);

        face.follow(at_x(0.0), FoldState::Folded, Duration::ZERO);
        assert_eq!(face.state(), FoldState::Folded);
    }

    #[test]
    fn test_saturated_tick_lands_on_target() {
        let mut tween = PoseTween::new(at_x(0.0));
        tween.retarget(at_x(3.0), Duration::from_millis(1200));
        tween.advance(Duration::from_millis(600));
        assert!(tween.advance(Duration::MAX));
        assert!(tween.is_settled());
        assert_eq!(tween.current(), &at_x(3.0));
    }

    #[test]
    fn test_transition_to_current_state_is_noop() {
        let mut face = FaceAnimator::new(at_x(1.0), FoldState::Unfolded);
        assert!(!face.transition(true, at_x(1.0), Duration::from_millis(1200)));
        assert_eq!(face.state(), FoldState::Unfolded);
        assert!(face.is_settled());
    }
}
