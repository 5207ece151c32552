//! Static kinematic chain tables shared by source and destination
//! skeletons. Retargeting walks these chains pair by pair; the parent
//! links below define the subtree that follows a rotated bone.

use crate::BoneRole::{self, *};
use crate::FIRST_FINGER;

pub const SPINE_CHAIN: &[BoneRole] = &[Hips, Spine, Chest, Neck, Head];
pub const LEFT_ARM_CHAIN: &[BoneRole] = &[LeftShoulder, LeftUpperArm, LeftLowerArm, LeftHand];
pub const RIGHT_ARM_CHAIN: &[BoneRole] = &[RightShoulder, RightUpperArm, RightLowerArm, RightHand];
pub const LEFT_LEG_CHAIN: &[BoneRole] = &[LeftUpperLeg, LeftLowerLeg, LeftFoot];
pub const RIGHT_LEG_CHAIN: &[BoneRole] = &[RightUpperLeg, RightLowerLeg, RightFoot];

/// Every retargeting chain, root-most first. Finger chains are terminal
/// mini-chains without twist references.
pub const CHAINS: &[&[BoneRole]] = &[
    SPINE_CHAIN,
    LEFT_ARM_CHAIN,
    RIGHT_ARM_CHAIN,
    LEFT_LEG_CHAIN,
    RIGHT_LEG_CHAIN,
    &[LeftThumbProximal, LeftThumbIntermediate, LeftThumbDistal],
    &[LeftIndexProximal, LeftIndexIntermediate, LeftIndexDistal],
    &[LeftMiddleProximal, LeftMiddleIntermediate, LeftMiddleDistal],
    &[LeftRingProximal, LeftRingIntermediate, LeftRingDistal],
    &[LeftLittleProximal, LeftLittleIntermediate, LeftLittleDistal],
    &[RightThumbProximal, RightThumbIntermediate, RightThumbDistal],
    &[RightIndexProximal, RightIndexIntermediate, RightIndexDistal],
    &[RightMiddleProximal, RightMiddleIntermediate, RightMiddleDistal],
    &[RightRingProximal, RightRingIntermediate, RightRingDistal],
    &[RightLittleProximal, RightLittleIntermediate, RightLittleDistal],
];

/// Chain-terminal bones whose twist is aligned with the skeleton's
/// forward/up reference directions after chain alignment.
pub const TWIST_TERMINALS: &[BoneRole] = &[Head, LeftHand, RightHand, LeftFoot, RightFoot];

/// Parent of a role in the kinematic hierarchy, `None` for the hips.
pub fn parent_of(role: BoneRole) -> Option<BoneRole> {
    let i = role as usize;
    if i >= FIRST_FINGER {
        return match (i - FIRST_FINGER) % 3 {
            // Proximal segments hang off their hand.
            0 => {
                if (i - FIRST_FINGER) / 3 < 5 {
                    Some(LeftHand)
                } else {
                    Some(RightHand)
                }
            }
            _ => BoneRole::from_index(i - 1),
        };
    }
    for chain in CHAINS {
        if let Some(pos) = chain.iter().position(|&r| r == role) {
            if pos > 0 {
                return Some(chain[pos - 1]);
            }
            break;
        }
    }
    match role {
        Hips => None,
        LeftShoulder | RightShoulder => Some(Chest),
        LeftUpperLeg | RightUpperLeg => Some(Hips),
        _ => None,
    }
}

/// True when `ancestor` appears on `role`'s parent path.
pub fn is_descendant(role: BoneRole, ancestor: BoneRole) -> bool {
    let mut current = parent_of(role);
    while let Some(p) = current {
        if p == ancestor {
            return true;
        }
        current = parent_of(p);
    }
    false
}
