use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Interpolation policy applied uniformly to every channel of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EvaluateMethod {
    #[default]
    Linear,
    /// Hold the previous key's value.
    Step,
    /// Smoothstep-eased blend between neighboring keys.
    CubicSmooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Key {
    pub t: f32,
    pub v: f32,
}

/// One named curve: (time, value) keys, non-decreasing in time. The
/// engine does not re-sort; out-of-order keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationCurve {
    keys: Vec<Key>,
}

impl AnimationCurve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Append a key. Returns false (leaving the curve unchanged) when
    /// `time` would break the monotone ordering.
    pub fn add_key(&mut self, time: f32, value: f32) -> bool {
        if let Some(last) = self.keys.last() {
            if time < last.t {
                return false;
            }
        }
        self.keys.push(Key { t: time, v: value });
        true
    }

    /// Evaluate at `time` under `method`, with constant extrapolation
    /// outside the key range. `None` on an empty curve.
    pub fn evaluate(&self, time: f32, method: EvaluateMethod) -> Option<f32> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        if time <= first.t {
            return Some(first.v);
        }
        if time >= last.t {
            return Some(last.v);
        }

        // Keys are sorted; find the segment containing `time`.
        let upper = self.keys.partition_point(|k| k.t <= time);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];

        let value = match method {
            EvaluateMethod::Step => a.v,
            EvaluateMethod::Linear | EvaluateMethod::CubicSmooth => {
                let span = b.t - a.t;
                if span <= f32::EPSILON {
                    return Some(b.v);
                }
                let mut t = (time - a.t) / span;
                if method == EvaluateMethod::CubicSmooth {
                    t = t * t * (3.0 - 2.0 * t);
                }
                a.v + (b.v - a.v) * t
            }
        };
        Some(value)
    }
}

/// A recorded set of curves: named channels plus the overall recorded
/// duration. Serializes to human-readable JSON for later load/replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveSet {
    pub time_length: f32,
    pub channels: BTreeMap<String, AnimationCurve>,
}

impl CurveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one key into a channel, creating the channel on first use.
    /// `time_length` tracks the max key time across all channels.
    pub fn write_key(&mut self, channel: &str, time: f32, value: f32) {
        let curve = self.channels.entry(channel.to_string()).or_default();
        if !curve.add_key(time, value) {
            warn!(
                "Dropping out-of-order key on '{}' at t={} (curve ends later)",
                channel, time
            );
            return;
        }
        if time > self.time_length {
            self.time_length = time;
        }
    }

    pub fn evaluate(&self, channel: &str, time: f32, method: EvaluateMethod) -> Option<f32> {
        self.channels.get(channel)?.evaluate(time, method)
    }

    pub fn clear(&mut self) {
        self.channels.clear();
        self.time_length = 0.0;
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create recording dir: {:?}", parent))?;
            }
        }
        let file = File::create(path).context("Failed to create recording file")?;
        serde_json::to_writer_pretty(file, self).context("Failed to serialize recording")?;
        info!("Saved recording to {:?}", path);
        Ok(())
    }

    pub fn load(path: &Path) -> Result<CurveSet> {
        let file = File::open(path).context("Failed to open recording file")?;
        let reader = BufReader::new(file);
        let set = serde_json::from_reader(reader).context("Failed to deserialize recording")?;
        info!("Loaded recording from {:?}", path);
        Ok(set)
    }
}
