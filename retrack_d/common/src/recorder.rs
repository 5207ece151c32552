use std::path::Path;

use anyhow::Result;
use api::{BodyPose, JointTransform, Skeleton, MUSCLE_COUNT};
use glam::{Quat, Vec3};
use log::debug;

use crate::curve::{CurveSet, EvaluateMethod};

/// Cooperative periodic tick driving the recording loop at its own
/// frequency, distinct from the frame rate. Cancellation is immediate:
/// a cancelled ticker drops any in-flight accumulation.
#[derive(Debug, Clone)]
pub struct RecordTicker {
    interval: f32,
    accumulator: f32,
    elapsed: f32,
    cancelled: bool,
}

impl RecordTicker {
    pub fn new(frequency_hz: f32) -> Self {
        Self {
            interval: 1.0 / frequency_hz.max(f32::EPSILON),
            accumulator: 0.0,
            elapsed: 0.0,
            cancelled: false,
        }
    }

    /// Advance by one frame step; returns the record-time of a fired
    /// tick, at most one per call.
    pub fn tick(&mut self, dt: f32) -> Option<f32> {
        if self.cancelled {
            return None;
        }
        self.accumulator += dt;
        if self.accumulator < self.interval {
            return None;
        }
        self.accumulator -= self.interval;
        let at = self.elapsed;
        self.elapsed += self.interval;
        Some(at)
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.accumulator = 0.0;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum PlayerState {
    #[default]
    Idle,
    Recording,
    Playing,
}

/// Records skeleton poses into named scalar channels and replays them.
///
/// Channel layout: `root.pos.{x,y,z}`, `root.rot.{x,y,z,w}` and, when
/// the skeleton carries a generalized body pose, `body.pos.*`,
/// `body.rot.*` and `muscle.{index}`. Vector and rotation values are
/// reconstructed from their per-axis scalar channels on playback.
#[derive(Default)]
pub struct PoseRecorder {
    curves: CurveSet,
    method: EvaluateMethod,
    state: PlayerState,
    ticker: Option<RecordTicker>,
    play_head: f32,
}

const AXES3: [&str; 3] = ["x", "y", "z"];
const AXES4: [&str; 4] = ["x", "y", "z", "w"];

impl PoseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_evaluate_method(&mut self, method: EvaluateMethod) {
        self.method = method;
    }

    pub fn curves(&self) -> &CurveSet {
        &self.curves
    }

    pub fn time_length(&self) -> f32 {
        self.curves.time_length
    }

    /// Sample the skeleton into one key per channel at `time`.
    pub fn add_key(&mut self, time: f32, skeleton: &Skeleton) {
        self.write_vec3("root.pos", time, skeleton.root.position);
        self.write_quat("root.rot", time, skeleton.root.rotation);

        if let Some(body) = &skeleton.body {
            self.write_vec3("body.pos", time, body.position);
            self.write_quat("body.rot", time, body.rotation);
            for (i, muscle) in body.muscles.iter().enumerate() {
                self.curves.write_key(&format!("muscle.{}", i), time, *muscle);
            }
        }
    }

    fn write_vec3(&mut self, prefix: &str, time: f32, v: Vec3) {
        for (axis, value) in AXES3.iter().zip(v.to_array()) {
            self.curves.write_key(&format!("{}.{}", prefix, axis), time, value);
        }
    }

    fn write_quat(&mut self, prefix: &str, time: f32, q: Quat) {
        for (axis, value) in AXES4.iter().zip(q.to_array()) {
            self.curves.write_key(&format!("{}.{}", prefix, axis), time, value);
        }
    }

    pub fn evaluate(&self, channel: &str, time: f32) -> Option<f32> {
        self.curves.evaluate(channel, time, self.method)
    }

    pub fn evaluate_vec3(&self, prefix: &str, time: f32) -> Option<Vec3> {
        let mut out = [0.0; 3];
        for (axis, slot) in AXES3.iter().zip(out.iter_mut()) {
            *slot = self.evaluate(&format!("{}.{}", prefix, axis), time)?;
        }
        Some(Vec3::from_array(out))
    }

    /// Rotation channels renormalize on reconstruction so interpolated
    /// playback stays a unit rotation.
    pub fn evaluate_quat(&self, prefix: &str, time: f32) -> Option<Quat> {
        let mut out = [0.0; 4];
        for (axis, slot) in AXES4.iter().zip(out.iter_mut()) {
            *slot = self.evaluate(&format!("{}.{}", prefix, axis), time)?;
        }
        let q = Quat::from_array(out);
        (q.length_squared() > 1e-6).then(|| q.normalize())
    }

    /// Apply the recorded pose at `time` onto a skeleton.
    pub fn apply_at(&self, time: f32, skeleton: &mut Skeleton) {
        if let (Some(pos), Some(rot)) = (
            self.evaluate_vec3("root.pos", time),
            self.evaluate_quat("root.rot", time),
        ) {
            skeleton.root = JointTransform::new(pos, rot);
        }

        let (Some(body_pos), Some(body_rot)) = (
            self.evaluate_vec3("body.pos", time),
            self.evaluate_quat("body.rot", time),
        ) else {
            return;
        };
        let body = skeleton.body.get_or_insert_with(BodyPose::default);
        body.position = body_pos;
        body.rotation = body_rot;
        for i in 0..MUSCLE_COUNT.min(body.muscles.len()) {
            if let Some(v) = self.evaluate(&format!("muscle.{}", i), time) {
                body.muscles[i] = v;
            }
        }
    }

    /// Start a new recording at `frequency_hz`, replacing any previous
    /// curves wholesale.
    pub fn record(&mut self, frequency_hz: f32) {
        self.curves.clear();
        self.ticker = Some(RecordTicker::new(frequency_hz));
        self.state = PlayerState::Recording;
        debug!("Recording started at {} Hz", frequency_hz);
    }

    pub fn stop_recording(&mut self) {
        if self.state == PlayerState::Recording {
            self.state = PlayerState::Idle;
        }
        if let Some(ticker) = &mut self.ticker {
            ticker.cancel();
        }
        self.ticker = None;
    }

    /// Begin playback from the start of the recording. No-op when
    /// nothing has been recorded.
    pub fn play(&mut self) {
        if self.curves.time_length > 0.0 {
            self.play_head = 0.0;
            self.state = PlayerState::Playing;
        }
    }

    /// Begin playback from `time`.
    pub fn playback(&mut self, time: f32) {
        if self.curves.time_length > 0.0 {
            self.play_head = time.clamp(0.0, self.curves.time_length);
            self.state = PlayerState::Playing;
        }
    }

    pub fn is_recording(&self) -> bool {
        self.state == PlayerState::Recording
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    /// One frame step. While recording this samples the skeleton at the
    /// configured tick rate; while playing it overwrites the skeleton
    /// from the curves and stops past the end.
    pub fn update(&mut self, dt: f32, skeleton: &mut Skeleton) {
        match self.state {
            PlayerState::Recording => {
                if let Some(at) = self.ticker.as_mut().and_then(|t| t.tick(dt)) {
                    self.add_key(at, skeleton);
                }
            }
            PlayerState::Playing => {
                self.play_head += dt;
                let clamped = self.play_head.min(self.curves.time_length);
                self.apply_at(clamped, skeleton);
                if self.play_head >= self.curves.time_length {
                    self.state = PlayerState::Idle;
                }
            }
            PlayerState::Idle => {}
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.curves.save(path)
    }

    pub fn load(&mut self, path: &Path) -> Result<()> {
        self.curves = CurveSet::load(path)?;
        self.state = PlayerState::Idle;
        self.play_head = 0.0;
        Ok(())
    }
}

/// Fans record/play/stop out to every registered player and OR-reduces
/// the state queries, so callers never care how many players exist.
#[derive(Default)]
pub struct PlayerGroup {
    players: Vec<PoseRecorder>,
}

impl PlayerGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player; returns its index within the group.
    pub fn add(&mut self, player: PoseRecorder) -> usize {
        self.players.push(player);
        self.players.len() - 1
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PoseRecorder> {
        self.players.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut PoseRecorder> {
        self.players.get_mut(index)
    }

    pub fn players_mut(&mut self) -> impl Iterator<Item = &mut PoseRecorder> {
        self.players.iter_mut()
    }

    pub fn record(&mut self, frequency_hz: f32) {
        for p in &mut self.players {
            p.record(frequency_hz);
        }
    }

    pub fn stop_recording(&mut self) {
        for p in &mut self.players {
            p.stop_recording();
        }
    }

    pub fn play(&mut self) {
        for p in &mut self.players {
            p.play();
        }
    }

    pub fn playback(&mut self, time: f32) {
        for p in &mut self.players {
            p.playback(time);
        }
    }

    pub fn is_recording(&self) -> bool {
        self.players.iter().any(|p| p.is_recording())
    }

    pub fn is_playing(&self) -> bool {
        self.players.iter().any(|p| p.is_playing())
    }
}
