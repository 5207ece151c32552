use api::{BoneRole, Skeleton, TrackingState};
use common::{AccumulatedAverage, HoltFilter, HoltParams, TrackedJoint, TrackingManager};
use glam::{Quat, Vec3};
use log::info;

/// Roles the demo source animates.
const DEMO_ROLES: &[BoneRole] = &[
    BoneRole::Hips,
    BoneRole::Spine,
    BoneRole::Chest,
    BoneRole::Neck,
    BoneRole::Head,
    BoneRole::LeftUpperArm,
    BoneRole::LeftLowerArm,
    BoneRole::LeftHand,
    BoneRole::RightUpperArm,
    BoneRole::RightLowerArm,
    BoneRole::RightHand,
];

/// Scripted stand-in for a device tracker: sways the body on a sine
/// path so the downstream pipeline has something to chew on. Calibrates
/// once it has accumulated a stable base of position samples.
pub struct ScriptedBodyManager {
    joints: Vec<TrackedJoint>,
    rest_pose: Vec<(BoneRole, Vec3)>,
    elapsed: f32,
    calibrated: bool,
}

impl ScriptedBodyManager {
    pub fn new(rest_pose: Vec<(BoneRole, Vec3)>) -> Self {
        Self {
            joints: DEMO_ROLES.iter().map(|&r| TrackedJoint::new(r)).collect(),
            rest_pose,
            elapsed: 0.0,
            calibrated: false,
        }
    }
}

impl TrackingManager for ScriptedBodyManager {
    fn update_tracking(&mut self, skeleton: &mut Skeleton, dt: f32) {
        self.elapsed += dt;
        let sway = Vec3::new(
            0.05 * (self.elapsed * 0.7).sin(),
            0.02 * (self.elapsed * 1.3).sin(),
            0.0,
        );
        for joint in &mut self.joints {
            let Some(&(_, rest)) = self.rest_pose.iter().find(|(r, _)| *r == joint.role) else {
                continue;
            };
            joint.observe(
                skeleton,
                rest + sway,
                Quat::IDENTITY,
                TrackingState::Tracked,
            );
        }
    }

    fn calibrate(&mut self, _skeleton: &Skeleton) {
        // Latch once every joint has a settled running average.
        let ready = self
            .joints
            .iter()
            .all(|j| j.average_position.count() >= 30);
        if ready {
            info!("{} calibrated", self.name());
            self.calibrated = true;
        }
    }

    fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    fn set_calibrated(&mut self, calibrated: bool) {
        self.calibrated = calibrated;
    }

    fn priority(&self) -> i32 {
        500
    }

    fn name(&self) -> &str {
        "scripted_body"
    }
}

/// Refinement pass: runs every tracked joint through a Holt filter so
/// later consumers see the stabilized prediction instead of the raw
/// sample. Runs after the body sources by priority.
pub struct SmoothingManager {
    positions: Vec<HoltFilter<Vec3>>,
    rotations: Vec<HoltFilter<Quat>>,
    calibrated: bool,
}

impl SmoothingManager {
    pub fn new(params: HoltParams) -> Self {
        Self {
            positions: (0..BoneRole::COUNT).map(|_| HoltFilter::new(params)).collect(),
            rotations: (0..BoneRole::COUNT).map(|_| HoltFilter::new(params)).collect(),
            calibrated: false,
        }
    }
}

impl TrackingManager for SmoothingManager {
    fn update_tracking(&mut self, skeleton: &mut Skeleton, _dt: f32) {
        for role in BoneRole::all() {
            let Some(joint) = skeleton.joint(role).copied() else {
                continue;
            };
            let position = self.positions[role as usize].filter(joint.position);
            let rotation = self.rotations[role as usize].filter(joint.rotation);
            if let Some(j) = skeleton.joint_mut(role) {
                j.position = position;
                j.rotation = rotation;
            }
        }
    }

    fn calibrate(&mut self, _skeleton: &Skeleton) {
        for f in &mut self.positions {
            f.reset();
        }
        for f in &mut self.rotations {
            f.reset();
        }
        self.calibrated = true;
    }

    fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    fn set_calibrated(&mut self, calibrated: bool) {
        self.calibrated = calibrated;
    }

    fn priority(&self) -> i32 {
        1000
    }

    fn name(&self) -> &str {
        "smoothing"
    }
}

/// Head refinement running last: reads the body pose already written by
/// the lower-priority managers this frame and damps head position
/// toward its long-run offset from the neck.
pub struct HeadStabilizer {
    offset_average: AccumulatedAverage<Vec3>,
    blend: f32,
    calibrated: bool,
}

impl HeadStabilizer {
    pub fn new(blend: f32) -> Self {
        Self {
            offset_average: AccumulatedAverage::new(),
            blend,
            calibrated: false,
        }
    }
}

impl TrackingManager for HeadStabilizer {
    fn update_tracking(&mut self, skeleton: &mut Skeleton, _dt: f32) {
        let (Some(neck), Some(head)) = (
            skeleton.joint(BoneRole::Neck).copied(),
            skeleton.joint(BoneRole::Head).copied(),
        ) else {
            return;
        };
        self.offset_average.add_sample(head.position - neck.position);
        let Some(mean_offset) = self.offset_average.get_current() else {
            return;
        };
        let target = neck.position + mean_offset;
        if let Some(j) = skeleton.joint_mut(BoneRole::Head) {
            j.position = head.position.lerp(target, self.blend);
        }
    }

    fn calibrate(&mut self, skeleton: &Skeleton) {
        if skeleton.has_joint(BoneRole::Head) && self.offset_average.count() >= 30 {
            self.calibrated = true;
        }
    }

    fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    fn set_calibrated(&mut self, calibrated: bool) {
        self.calibrated = calibrated;
    }

    fn priority(&self) -> i32 {
        2000
    }

    fn name(&self) -> &str {
        "head_stabilizer"
    }
}
