use anyhow::{Context, Result};
use api::chain::{is_descendant, CHAINS, TWIST_TERMINALS};
use api::{muscle_span, BoneRole, JointTransform, Skeleton, TrustMask};
use glam::{Quat, Vec3};
use log::warn;

const DIR_EPSILON: f32 = 1e-8;

/// Maps a posed source skeleton onto a differently-proportioned
/// destination skeleton sharing the same bone-role taxonomy.
///
/// Both skeletons are bound once and owned here; tracking managers
/// mutate them through [`source_mut`]/[`destination_mut`]. Joints in
/// the trusted mask keep their destination pose through either copy
/// path.
///
/// [`source_mut`]: PoseRetargeter::source_mut
/// [`destination_mut`]: PoseRetargeter::destination_mut
#[derive(Default)]
pub struct PoseRetargeter {
    source: Option<Skeleton>,
    destination: Option<Skeleton>,
    pub trusted: TrustMask,
}

impl PoseRetargeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_source(&mut self, skeleton: Skeleton) {
        self.source = Some(skeleton);
    }

    pub fn set_destination(&mut self, skeleton: Skeleton) {
        self.destination = Some(skeleton);
    }

    pub fn source(&self) -> Option<&Skeleton> {
        self.source.as_ref()
    }

    pub fn source_mut(&mut self) -> Option<&mut Skeleton> {
        self.source.as_mut()
    }

    pub fn destination(&self) -> Option<&Skeleton> {
        self.destination.as_ref()
    }

    pub fn destination_mut(&mut self) -> Option<&mut Skeleton> {
        self.destination.as_mut()
    }

    fn bound_pair(&mut self) -> Result<(&Skeleton, &mut Skeleton)> {
        let source = self
            .source
            .as_ref()
            .context("retarget source skeleton not bound")?;
        let destination = self
            .destination
            .as_mut()
            .context("retarget destination skeleton not bound")?;
        Ok((source, destination))
    }

    /// Muscle-space copy: the coarse/fast path. Applies the source's
    /// generalized pose to the destination, substituting the
    /// destination's own values for every trusted joint so those stay
    /// untouched. The hips ride in the body position/rotation fields
    /// rather than muscles.
    pub fn copy_pose(&mut self) -> Result<()> {
        let trusted = self.trusted;
        let (source, destination) = self.bound_pair()?;

        let src_body = source
            .body
            .as_ref()
            .context("source skeleton carries no body pose")?;
        let dst_body = destination
            .body
            .as_mut()
            .context("destination skeleton carries no body pose")?;

        let mut muscles = src_body.muscles.clone();
        for role in BoneRole::all() {
            if !trusted.contains(role) {
                continue;
            }
            if let Some(span) = muscle_span(role) {
                muscles[span.clone()].copy_from_slice(&dst_body.muscles[span]);
            }
        }

        if !trusted.contains(BoneRole::Hips) {
            dst_body.position = src_body.position;
            dst_body.rotation = src_body.rotation;
        }
        dst_body.muscles = muscles;
        Ok(())
    }

    /// Direct chain-alignment copy: the accurate path. Walks every
    /// kinematic chain and rotates each destination bone so its segment
    /// direction matches the source's, then aligns terminal twist with
    /// the skeletons' forward/up reference directions. Bone lengths need
    /// not match. Missing roles skip their step; coincident joints are a
    /// no-op.
    pub fn copy_pose_direct(&mut self) -> Result<()> {
        let trusted = self.trusted;
        let (source, destination) = self.bound_pair()?;

        // Equalize root orientation: rotate a working copy of the source
        // pose into the destination's root frame so the chain math runs
        // in a common orientation. The bound source itself stays intact.
        let delta = destination.root.rotation * source.root.rotation.inverse();
        let pivot = source.root.position;
        let src_joint = |role: BoneRole| -> Option<JointTransform> {
            source.joint(role).map(|j| JointTransform {
                position: pivot + delta * (j.position - pivot),
                rotation: delta * j.rotation,
            })
        };

        for chain in CHAINS {
            for pair in chain.windows(2) {
                let (parent, child) = (pair[0], pair[1]);
                if trusted.contains(parent) {
                    continue;
                }
                let (Some(sp), Some(sc)) = (src_joint(parent), src_joint(child)) else {
                    continue;
                };
                let (Some(dp), Some(dc)) = (
                    destination.joint(parent).copied(),
                    destination.joint(child).copied(),
                ) else {
                    continue;
                };

                let src_dir = sc.position - sp.position;
                let dst_dir = dc.position - dp.position;
                if src_dir.length_squared() < DIR_EPSILON
                    || dst_dir.length_squared() < DIR_EPSILON
                {
                    // Coincident joints give no usable direction.
                    continue;
                }

                let arc = Quat::from_rotation_arc(dst_dir.normalize(), src_dir.normalize());
                rotate_subtree(destination, parent, arc);
            }
        }

        // Terminal twist: a two-point chain leaves hand/foot/head roll
        // ambiguous, so align the reference forward direction first and
        // the up direction second.
        for &terminal in TWIST_TERMINALS {
            if trusted.contains(terminal) {
                continue;
            }
            let Some(src) = src_joint(terminal) else {
                continue;
            };
            if destination.joint(terminal).is_none() {
                continue;
            }

            let src_ref = source.reference;
            let dst_ref = destination.reference;

            for (src_axis, dst_axis) in [
                (src_ref.forward, dst_ref.forward),
                (src_ref.up, dst_ref.up),
            ] {
                let dst_rot = match destination.joint(terminal) {
                    Some(j) => j.rotation,
                    None => continue,
                };
                let target = src.rotation * src_axis;
                let current = dst_rot * dst_axis;
                if target.length_squared() < DIR_EPSILON || current.length_squared() < DIR_EPSILON
                {
                    warn!("Degenerate twist reference on {:?}, skipping", terminal);
                    continue;
                }
                let arc = Quat::from_rotation_arc(current.normalize(), target.normalize());
                rotate_subtree(destination, terminal, arc);
            }
        }

        Ok(())
    }
}

/// Rotate a bone about its own position and carry every descendant
/// along, emulating forward kinematics over world-space transforms.
fn rotate_subtree(skeleton: &mut Skeleton, pivot_role: BoneRole, arc: Quat) {
    let pivot = match skeleton.joint(pivot_role) {
        Some(j) => j.position,
        None => return,
    };

    if let Some(joint) = skeleton.joint_mut(pivot_role) {
        joint.rotation = arc * joint.rotation;
    }
    for role in BoneRole::all() {
        if role == pivot_role || !is_descendant(role, pivot_role) {
            continue;
        }
        if let Some(joint) = skeleton.joint_mut(role) {
            joint.position = pivot + arc * (joint.position - pivot);
            joint.rotation = arc * joint.rotation;
        }
    }
}

/// Direction of the segment leaving `parent` toward `child`, `None`
/// when either joint is missing or they coincide.
pub fn segment_direction(
    skeleton: &Skeleton,
    parent: BoneRole,
    child: BoneRole,
) -> Option<Vec3> {
    let p = skeleton.joint(parent)?.position;
    let c = skeleton.joint(child)?.position;
    let dir = c - p;
    (dir.length_squared() >= DIR_EPSILON).then(|| dir.normalize())
}
