use std::sync::{Arc, Mutex};

use api::{BoneRole, JointTransform, Skeleton};
use common::{TrackingComposition, TrackingManager};
use glam::{Quat, Vec3};

struct Probe {
    label: String,
    default_priority: i32,
    calls: Arc<Mutex<Vec<String>>>,
    calibrated: bool,
}

impl Probe {
    fn boxed(label: &str, priority: i32, calls: &Arc<Mutex<Vec<String>>>) -> Box<Probe> {
        Box::new(Probe {
            label: label.to_string(),
            default_priority: priority,
            calls: calls.clone(),
            calibrated: false,
        })
    }
}

impl TrackingManager for Probe {
    fn update_tracking(&mut self, _skeleton: &mut Skeleton, _dt: f32) {
        self.calls.lock().unwrap().push(self.label.clone());
    }

    fn calibrate(&mut self, _skeleton: &Skeleton) {
        self.calibrated = true;
    }

    fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    fn set_calibrated(&mut self, calibrated: bool) {
        self.calibrated = calibrated;
    }

    fn priority(&self) -> i32 {
        self.default_priority
    }

    fn name(&self) -> &str {
        &self.label
    }
}

#[test]
fn managers_run_in_priority_order_exactly_once() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut composition = TrackingComposition::new();
    composition.register(Probe::boxed("p2000", 2000, &calls));
    composition.register(Probe::boxed("p500", 500, &calls));
    composition.register(Probe::boxed("p1000", 1000, &calls));

    let mut skeleton = Skeleton::new();
    composition.update(&mut skeleton, 1.0 / 60.0);

    assert_eq!(*calls.lock().unwrap(), vec!["p500", "p1000", "p2000"]);
}

#[test]
fn equal_priorities_keep_registration_order() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut composition = TrackingComposition::new();
    composition.register(Probe::boxed("first", 100, &calls));
    composition.register(Probe::boxed("second", 100, &calls));
    composition.register(Probe::boxed("third", 100, &calls));

    let mut skeleton = Skeleton::new();
    composition.update(&mut skeleton, 0.016);

    assert_eq!(*calls.lock().unwrap(), vec!["first", "second", "third"]);
}

#[test]
fn registration_priority_override_wins() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut composition = TrackingComposition::new();
    composition.register(Probe::boxed("a", 10, &calls));
    // Default would be 20; the override pushes it ahead of "a".
    composition.register_with_priority(Probe::boxed("b", 20, &calls), 5);

    let mut skeleton = Skeleton::new();
    composition.update(&mut skeleton, 0.016);

    assert_eq!(*calls.lock().unwrap(), vec!["b", "a"]);
}

#[test]
fn calibration_trigger_clears_every_latch() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut composition = TrackingComposition::new();
    composition.register(Probe::boxed("a", 1, &calls));
    composition.register(Probe::boxed("b", 2, &calls));

    let skeleton = Skeleton::new();
    composition.run_calibration(&skeleton);
    assert!(composition.all_calibrated());

    composition.trigger_calibration();
    assert!(!composition.all_calibrated());

    // Each manager re-latches through its own calibrate pass.
    composition.run_calibration(&skeleton);
    assert!(composition.all_calibrated());
}

struct HipsWriter;

impl TrackingManager for HipsWriter {
    fn update_tracking(&mut self, skeleton: &mut Skeleton, _dt: f32) {
        skeleton.set_joint(
            BoneRole::Hips,
            JointTransform::new(Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY),
        );
    }

    fn calibrate(&mut self, _skeleton: &Skeleton) {}
    fn is_calibrated(&self) -> bool {
        true
    }
    fn set_calibrated(&mut self, _calibrated: bool) {}
    fn priority(&self) -> i32 {
        500
    }
    fn name(&self) -> &str {
        "hips_writer"
    }
}

struct HipsReader {
    seen: Arc<Mutex<Option<Vec3>>>,
}

impl TrackingManager for HipsReader {
    fn update_tracking(&mut self, skeleton: &mut Skeleton, _dt: f32) {
        *self.seen.lock().unwrap() = skeleton.joint(BoneRole::Hips).map(|j| j.position);
    }

    fn calibrate(&mut self, _skeleton: &Skeleton) {}
    fn is_calibrated(&self) -> bool {
        true
    }
    fn set_calibrated(&mut self, _calibrated: bool) {}
    fn priority(&self) -> i32 {
        2000
    }
    fn name(&self) -> &str {
        "hips_reader"
    }
}

// The ordering guarantee lets a high-priority manager consume state
// written earlier in the same frame.
#[test]
fn later_manager_sees_earlier_managers_writes() {
    let seen = Arc::new(Mutex::new(None));
    let mut composition = TrackingComposition::new();
    composition.register(Box::new(HipsReader { seen: seen.clone() }));
    composition.register(Box::new(HipsWriter));

    let mut skeleton = Skeleton::new();
    composition.update(&mut skeleton, 0.016);

    assert_eq!(*seen.lock().unwrap(), Some(Vec3::new(0.0, 1.0, 0.0)));
}

mod tracked_joint {
    use api::{BoneRole, Skeleton, TrackingState};
    use common::TrackedJoint;
    use glam::{Quat, Vec3};

    #[test]
    fn observe_writes_through_to_skeleton() {
        let mut skeleton = Skeleton::new();
        let mut joint = TrackedJoint::new(BoneRole::Head);
        joint.observe(
            &mut skeleton,
            Vec3::new(0.0, 1.6, 0.0),
            Quat::IDENTITY,
            TrackingState::Tracked,
        );

        assert!(skeleton.has_joint(BoneRole::Head));
        assert_eq!(skeleton.state(BoneRole::Head), TrackingState::Tracked);
        assert_eq!(joint.average_position.count(), 1);
    }

    #[test]
    fn velocity_needs_two_samples() {
        let mut skeleton = Skeleton::new();
        let mut joint = TrackedJoint::new(BoneRole::Head);
        assert_eq!(joint.instantaneous_velocity(0.1), None);

        joint.observe(&mut skeleton, Vec3::ZERO, Quat::IDENTITY, TrackingState::Tracked);
        assert_eq!(joint.instantaneous_velocity(0.1), None);

        joint.observe(
            &mut skeleton,
            Vec3::new(0.2, 0.0, 0.0),
            Quat::IDENTITY,
            TrackingState::Tracked,
        );
        let v = joint.instantaneous_velocity(0.1).unwrap();
        assert!(v.distance(Vec3::new(2.0, 0.0, 0.0)) < 1e-4);
    }

    #[test]
    fn velocity_rejects_non_positive_dt() {
        let mut skeleton = Skeleton::new();
        let mut joint = TrackedJoint::new(BoneRole::Head);
        joint.observe(&mut skeleton, Vec3::ZERO, Quat::IDENTITY, TrackingState::Tracked);
        joint.observe(&mut skeleton, Vec3::X, Quat::IDENTITY, TrackingState::Tracked);
        assert_eq!(joint.instantaneous_velocity(0.0), None);
    }
}
