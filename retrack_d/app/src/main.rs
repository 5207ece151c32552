mod managers;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use api::{BodyPose, BoneRole, JointTransform, Skeleton};
use common::{
    load_config, PoseRecorder, PoseRetargeter, TrackingComposition, TrackingManager,
};
use glam::{Quat, Vec3};
use log::{info, warn};

use managers::{HeadStabilizer, ScriptedBodyManager, SmoothingManager};

/// Rest positions for a simple humanoid rig, scaled to taste so the
/// source and destination skeletons get different proportions.
fn rest_pose(scale: f32) -> Vec<(BoneRole, Vec3)> {
    use BoneRole::*;
    [
        (Hips, Vec3::new(0.0, 1.0, 0.0)),
        (Spine, Vec3::new(0.0, 1.15, 0.0)),
        (Chest, Vec3::new(0.0, 1.35, 0.0)),
        (Neck, Vec3::new(0.0, 1.5, 0.0)),
        (Head, Vec3::new(0.0, 1.62, 0.0)),
        (LeftShoulder, Vec3::new(-0.08, 1.45, 0.0)),
        (LeftUpperArm, Vec3::new(-0.2, 1.45, 0.0)),
        (LeftLowerArm, Vec3::new(-0.45, 1.45, 0.0)),
        (LeftHand, Vec3::new(-0.7, 1.45, 0.0)),
        (RightShoulder, Vec3::new(0.08, 1.45, 0.0)),
        (RightUpperArm, Vec3::new(0.2, 1.45, 0.0)),
        (RightLowerArm, Vec3::new(0.45, 1.45, 0.0)),
        (RightHand, Vec3::new(0.7, 1.45, 0.0)),
        (LeftUpperLeg, Vec3::new(-0.1, 0.95, 0.0)),
        (LeftLowerLeg, Vec3::new(-0.1, 0.5, 0.0)),
        (LeftFoot, Vec3::new(-0.1, 0.05, 0.0)),
        (RightUpperLeg, Vec3::new(0.1, 0.95, 0.0)),
        (RightLowerLeg, Vec3::new(0.1, 0.5, 0.0)),
        (RightFoot, Vec3::new(0.1, 0.05, 0.0)),
    ]
    .into_iter()
    .map(|(role, p)| (role, p * scale))
    .collect()
}

fn build_skeleton(scale: f32) -> Skeleton {
    let mut skeleton = Skeleton::new();
    for (role, position) in rest_pose(scale) {
        skeleton.set_joint(role, JointTransform::new(position, Quat::IDENTITY));
    }
    skeleton.root = JointTransform::default();
    skeleton.body = Some(BodyPose::default());
    skeleton
}

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    info!("Starting...");

    let config = load_config(Path::new("config.json")).unwrap_or_else(|e| {
        warn!("Failed to load config: {}. Using defaults.", e);
        common::PipelineConfig::default()
    });
    info!("Loaded Config: {:?}", config);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received Ctrl-C, shutting down...");
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");

    let mut retargeter = PoseRetargeter::new();
    retargeter.set_source(build_skeleton(1.0));
    // Destination rig is 12% taller; retargeting bridges the proportions.
    retargeter.set_destination(build_skeleton(1.12));

    let mut composition = TrackingComposition::new();
    let sources: Vec<Box<dyn TrackingManager>> = vec![
        Box::new(ScriptedBodyManager::new(rest_pose(1.0))),
        Box::new(SmoothingManager::new(config.filter)),
        Box::new(HeadStabilizer::new(0.5)),
    ];
    for manager in sources {
        match config.priority_overrides.get(manager.name()) {
            Some(&priority) => composition.register_with_priority(manager, priority),
            None => composition.register(manager),
        }
    }
    composition.trigger_calibration();

    let mut recorder = PoseRecorder::new();
    recorder.record(config.record_frequency);

    let fps = config.max_fps.unwrap_or(90.0).max(1.0);
    let dt = 1.0 / fps;
    let frame_budget = Duration::from_secs_f32(dt);

    while running.load(Ordering::SeqCst) {
        if let Some(source) = retargeter.source_mut() {
            composition.update(source, dt);
        }
        if let Some(source) = retargeter.source() {
            composition.run_calibration(source);
        }

        if let Err(e) = retargeter.copy_pose_direct() {
            warn!("Retarget skipped: {}", e);
        }

        if let Some(destination) = retargeter.destination_mut() {
            recorder.update(dt, destination);
        }

        std::thread::sleep(frame_budget);
    }

    recorder.stop_recording();
    if recorder.time_length() > 0.0 {
        recorder.save(Path::new("recording.json"))?;
        info!(
            "Saved {:.1}s of retargeted pose data",
            recorder.time_length()
        );
    }

    Ok(())
}
