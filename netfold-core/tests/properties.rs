//! Property-based tests for progress, interpolation and hollow-cube invariants.

use proptest::prelude::*;
use std::time::Duration;

use netfold_core::hollow::HollowCase;
use netfold_core::{
    DragController, HollowCube, LayoutRegistry, PointerEvent, Pose, PoseTween, Progress, Session,
    UnfoldConfig,
};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_pose() -> impl Strategy<Value = Pose> {
    (prop::array::uniform3(-50.0f32..50.0), prop::array::uniform3(-7.0f32..7.0))
        .prop_map(|(position, rotation)| Pose::from_arrays(position, rotation))
}

/// Pointer y coordinates, far beyond a full traversal in both directions.
fn arb_y() -> impl Strategy<Value = f32> {
    -20_000.0f32..20_000.0
}

fn arb_millis() -> impl Strategy<Value = u64> {
    1u64..3_000
}

// ---------------------------------------------------------------------------
// Progress stays within [0, 1] for any gesture
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn progress_never_leaves_unit_interval(
        initial in -2.0f32..3.0,
        start in arb_y(),
        moves in prop::collection::vec(arb_y(), 1..20),
    ) {
        let mut drag = DragController::new(Progress::new(initial), 200.0);
        drag.handle(&PointerEvent::start(0.0, start));
        for y in moves {
            drag.handle(&PointerEvent::moved(0.0, y));
            let p = drag.progress().value();
            prop_assert!((0.0..=1.0).contains(&p), "progress {} out of range", p);
        }
    }
}

// ---------------------------------------------------------------------------
// A drag of 10000 px lands exactly on the extreme
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn huge_drags_saturate(initial in 0.0f32..=1.0, start in -1000.0f32..1000.0) {
        let mut drag = DragController::new(Progress::new(initial), 200.0);
        drag.begin(start);
        drag.drag_to(start - 10_000.0);
        prop_assert_eq!(drag.progress().value(), 1.0);

        drag.begin(start);
        drag.drag_to(start + 10_000.0);
        prop_assert_eq!(drag.progress().value(), 0.0);
    }
}

// ---------------------------------------------------------------------------
// Interpolation endpoints are exact
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn lerp_endpoints_are_exact(a in arb_pose(), b in arb_pose()) {
        prop_assert_eq!(a.lerp(&b, 0.0), a);
        prop_assert_eq!(a.lerp(&b, 1.0), b);
    }
}

proptest! {
    #[test]
    fn displayed_pose_stays_between_endpoints(p in 0.0f32..=1.0) {
        let registry = LayoutRegistry::builtin();
        for layout in registry.layouts() {
            for face in layout.faces() {
                let pose = face.pose_at(Progress::new(p));
                let (a, b) = (face.folded(), face.unfolded());
                for i in 0..3 {
                    let lo = a.position[i].min(b.position[i]) - 1e-5;
                    let hi = a.position[i].max(b.position[i]) + 1e-5;
                    prop_assert!((lo..=hi).contains(&pose.position[i]));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Retargeting never makes the displayed pose jump
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn retarget_is_continuous(
        from in arb_pose(),
        first in arb_pose(),
        second in arb_pose(),
        duration in arb_millis(),
        elapsed in arb_millis(),
    ) {
        let mut tween = PoseTween::new(from);
        tween.retarget(first, Duration::from_millis(duration));
        tween.advance(Duration::from_millis(elapsed));
        let before = *tween.current();

        tween.retarget(second, Duration::from_millis(duration));
        prop_assert_eq!(*tween.current(), before);

        tween.advance(Duration::from_millis(duration));
        prop_assert_eq!(*tween.current(), second);
    }
}

proptest! {
    #[test]
    fn toggle_spam_keeps_faces_continuous(
        toggles in prop::collection::vec(0u64..400, 1..12),
    ) {
        let mut session = Session::new(LayoutRegistry::builtin(), UnfoldConfig::default(), "cube/cross").unwrap();
        for step in toggles {
            let before = session.poses();
            session.toggle();
            prop_assert_eq!(session.poses(), before);
            session.tick(Duration::from_millis(step));
        }
        session.tick(Duration::from_secs(2));
        let progress = session.progress();
        for (i, face) in session.layout().faces().iter().enumerate() {
            prop_assert_eq!(session.displayed_pose(i), Some(&face.pose_at(progress)));
        }
    }
}

// ---------------------------------------------------------------------------
// Hollow cube: delta == (added − removed) × a²
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn hollow_delta_identity(side in 0.5f32..100.0, ratio in 0.01f32..0.99) {
        let cube = HollowCube::new(side, side * ratio).unwrap();
        for case in HollowCase::ALL {
            let expected = (case.added_faces() as f32 - case.removed_faces() as f32) * cube.unit_face_area();
            prop_assert_eq!(cube.area_delta(case), expected);
            prop_assert_eq!(case.removed_faces() + case.added_faces(), if case == HollowCase::None { 0 } else { 6 });
        }
    }
}
