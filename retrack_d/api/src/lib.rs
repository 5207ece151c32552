pub mod chain;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Logical skeletal roles shared by every skeleton in the pipeline.
///
/// The discriminant doubles as an index into per-joint storage, so the
/// finger segments must stay contiguous and grouped in (proximal,
/// intermediate, distal) triplets; `chain` and the muscle layout rely
/// on that ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum BoneRole {
    Hips = 0,
    Spine,
    Chest,
    Neck,
    Head,

    LeftShoulder,
    LeftUpperArm,
    LeftLowerArm,
    LeftHand,
    RightShoulder,
    RightUpperArm,
    RightLowerArm,
    RightHand,

    LeftUpperLeg,
    LeftLowerLeg,
    LeftFoot,
    RightUpperLeg,
    RightLowerLeg,
    RightFoot,

    // Finger segments, left hand then right hand.
    LeftThumbProximal,
    LeftThumbIntermediate,
    LeftThumbDistal,
    LeftIndexProximal,
    LeftIndexIntermediate,
    LeftIndexDistal,
    LeftMiddleProximal,
    LeftMiddleIntermediate,
    LeftMiddleDistal,
    LeftRingProximal,
    LeftRingIntermediate,
    LeftRingDistal,
    LeftLittleProximal,
    LeftLittleIntermediate,
    LeftLittleDistal,
    RightThumbProximal,
    RightThumbIntermediate,
    RightThumbDistal,
    RightIndexProximal,
    RightIndexIntermediate,
    RightIndexDistal,
    RightMiddleProximal,
    RightMiddleIntermediate,
    RightMiddleDistal,
    RightRingProximal,
    RightRingIntermediate,
    RightRingDistal,
    RightLittleProximal,
    RightLittleIntermediate,
    RightLittleDistal,

    Max,
}

/// Index of the first finger segment.
pub const FIRST_FINGER: usize = BoneRole::LeftThumbProximal as usize;

impl BoneRole {
    pub const COUNT: usize = BoneRole::Max as usize;

    pub fn from_index(index: usize) -> Option<BoneRole> {
        if index < Self::COUNT {
            Some(unsafe { std::mem::transmute(index) })
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = BoneRole> {
        (0..Self::COUNT).filter_map(BoneRole::from_index)
    }

    pub fn is_finger(self) -> bool {
        (self as usize) >= FIRST_FINGER && self != BoneRole::Max
    }
}

/// Per-joint tracking quality reported by the upstream source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackingState {
    Tracked,
    Inferred,
    #[default]
    Untracked,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl JointTransform {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }
}

/// Local-frame direction hints used to disambiguate the twist of
/// chain-terminal bones (head, hands, feet) during retargeting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwistReference {
    pub forward: Vec3,
    pub up: Vec3,
}

impl Default for TwistReference {
    fn default() -> Self {
        Self {
            forward: Vec3::Z,
            up: Vec3::Y,
        }
    }
}

/// Number of generalized muscle scalars in a [`BodyPose`].
///
/// Spine chain 4x3, shoulders 2x2, upper arms 2x3, lower arms 2x2,
/// hands 2x2, upper legs 2x3, lower legs 2x2, feet 2x2, fingers
/// 10x(2+1+1). The hips carry no muscles; they live in the body
/// position/rotation fields.
pub const MUSCLE_COUNT: usize = 84;

/// Degrees of freedom a role contributes to the muscle vector.
pub fn muscle_dof(role: BoneRole) -> usize {
    use BoneRole::*;
    if role.is_finger() {
        // Triplet layout: proximal gets stretch + spread, the rest stretch only.
        return match (role as usize - FIRST_FINGER) % 3 {
            0 => 2,
            _ => 1,
        };
    }
    match role {
        Spine | Chest | Neck | Head => 3,
        LeftUpperArm | RightUpperArm | LeftUpperLeg | RightUpperLeg => 3,
        LeftLowerArm | RightLowerArm | LeftLowerLeg | RightLowerLeg => 2,
        LeftHand | RightHand | LeftFoot | RightFoot => 2,
        LeftShoulder | RightShoulder => 2,
        // Hips ride in the body fields; the sentinel carries nothing.
        _ => 0,
    }
}

/// Index range a role occupies inside the muscle vector, `None` for
/// roles without muscles (hips).
pub fn muscle_span(role: BoneRole) -> Option<std::ops::Range<usize>> {
    let dof = muscle_dof(role);
    if dof == 0 {
        return None;
    }
    let mut offset = 0;
    for i in 0..role as usize {
        if let Some(r) = BoneRole::from_index(i) {
            offset += muscle_dof(r);
        }
    }
    Some(offset..offset + dof)
}

/// Generalized humanoid pose: whole-body offset plus one scalar per
/// muscle degree of freedom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPose {
    pub position: Vec3,
    pub rotation: Quat,
    pub muscles: Vec<f32>,
}

impl Default for BodyPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            muscles: vec![0.0; MUSCLE_COUNT],
        }
    }
}

/// Bitmask over [`BoneRole`] marking destination joints whose pose must
/// be preserved during retargeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrustMask(u64);

impl TrustMask {
    pub const EMPTY: TrustMask = TrustMask(0);

    pub fn insert(&mut self, role: BoneRole) {
        self.0 |= 1 << role as usize;
    }

    pub fn remove(&mut self, role: BoneRole) {
        self.0 &= !(1 << role as usize);
    }

    pub fn contains(&self, role: BoneRole) -> bool {
        self.0 & (1 << role as usize) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Posed skeleton snapshot: world-space joint transforms indexed by
/// role, a root transform, an optional generalized body pose and the
/// twist reference hints for this skeleton's terminal bones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub root: JointTransform,
    joints: Vec<Option<JointTransform>>,
    states: Vec<TrackingState>,
    pub body: Option<BodyPose>,
    pub reference: TwistReference,
}

impl Default for Skeleton {
    fn default() -> Self {
        Self {
            root: JointTransform::default(),
            joints: vec![None; BoneRole::COUNT],
            states: vec![TrackingState::default(); BoneRole::COUNT],
            body: None,
            reference: TwistReference::default(),
        }
    }
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn joint(&self, role: BoneRole) -> Option<&JointTransform> {
        self.joints.get(role as usize)?.as_ref()
    }

    pub fn joint_mut(&mut self, role: BoneRole) -> Option<&mut JointTransform> {
        self.joints.get_mut(role as usize)?.as_mut()
    }

    /// No-op for the `Max` sentinel.
    pub fn set_joint(&mut self, role: BoneRole, transform: JointTransform) {
        if let Some(slot) = self.joints.get_mut(role as usize) {
            *slot = Some(transform);
        }
    }

    pub fn clear_joint(&mut self, role: BoneRole) {
        if let Some(slot) = self.joints.get_mut(role as usize) {
            *slot = None;
        }
    }

    pub fn has_joint(&self, role: BoneRole) -> bool {
        self.joint(role).is_some()
    }

    pub fn state(&self, role: BoneRole) -> TrackingState {
        self.states.get(role as usize).copied().unwrap_or_default()
    }

    pub fn set_state(&mut self, role: BoneRole, state: TrackingState) {
        if let Some(slot) = self.states.get_mut(role as usize) {
            *slot = state;
        }
    }
}
