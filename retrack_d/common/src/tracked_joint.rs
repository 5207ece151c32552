use api::{BoneRole, JointTransform, Skeleton, TrackingState};
use glam::{Quat, Vec3};

use crate::filters::AccumulatedAverage;

/// Tracker-side record for one skeletal role: the running average of
/// observed positions, a two-sample history for instantaneous velocity,
/// and the current tracking state. Created once per skeleton; mutated
/// every frame by the tracking manager that claims the role.
#[derive(Debug, Clone)]
pub struct TrackedJoint {
    pub role: BoneRole,
    pub average_position: AccumulatedAverage<Vec3>,
    history: [Vec3; 2],
    history_len: u8,
    pub state: TrackingState,
}

impl TrackedJoint {
    pub fn new(role: BoneRole) -> Self {
        Self {
            role,
            average_position: AccumulatedAverage::new(),
            history: [Vec3::ZERO; 2],
            history_len: 0,
            state: TrackingState::Untracked,
        }
    }

    /// Record one observation, writing the joint transform and state
    /// into the skeleton and updating the position statistics.
    pub fn observe(
        &mut self,
        skeleton: &mut Skeleton,
        position: Vec3,
        rotation: Quat,
        state: TrackingState,
    ) {
        skeleton.set_joint(self.role, JointTransform::new(position, rotation));
        skeleton.set_state(self.role, state);
        self.state = state;

        self.average_position.add_sample(position);
        self.history[0] = self.history[1];
        self.history[1] = position;
        if self.history_len < 2 {
            self.history_len += 1;
        }
    }

    /// Velocity over the last two observations, `None` until two samples
    /// exist or when `dt` is not positive.
    pub fn instantaneous_velocity(&self, dt: f32) -> Option<Vec3> {
        if self.history_len < 2 || dt <= 0.0 {
            return None;
        }
        Some((self.history[1] - self.history[0]) / dt)
    }

    pub fn reset(&mut self) {
        self.average_position.reset();
        self.history_len = 0;
        self.state = TrackingState::Untracked;
    }
}
