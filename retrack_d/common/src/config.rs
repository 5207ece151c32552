use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};

use crate::filters::HoltParams;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Per-joint double-exponential filter tunables.
    pub filter: HoltParams,

    /// Smoothing factor for the single-exponential forecast window.
    pub forecast_alpha: f32,
    /// Retained sample window for the single-exponential smoother.
    pub forecast_window: usize,

    /// Keyframe sampling frequency while recording, independent of the
    /// frame rate.
    pub record_frequency: f32,

    /// Tracking-manager priority overrides, keyed by manager name.
    pub priority_overrides: HashMap<String, i32>,

    #[serde(default = "default_max_fps")]
    pub max_fps: Option<f32>,
}

fn default_max_fps() -> Option<f32> {
    Some(90.0)
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            filter: HoltParams::default(),
            forecast_alpha: 0.5,
            forecast_window: crate::filters::DEFAULT_MAX_SAMPLES,
            record_frequency: 30.0,
            priority_overrides: HashMap::new(),
            max_fps: default_max_fps(),
        }
    }
}

/// Load the config from disk, writing a default file when none exists.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    if path.exists() {
        info!("Loading config from {:?}", path);
        let file = fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config = serde_json::from_reader(reader)?;
        Ok(config)
    } else {
        info!("Config not found. Creating default at {:?}", path);
        let config = PipelineConfig::default();
        let file = fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &config)?;
        Ok(config)
    }
}
