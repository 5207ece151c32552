use serde::{Deserialize, Serialize};

use crate::algebra::SampleAlgebra;

/// Tunables for [`HoltFilter`], configurable per joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoltParams {
    /// Weight of history vs. the new sample; higher = smoother, laggier.
    pub smoothing: f32,
    /// How quickly the trend estimate follows observed change.
    pub correction: f32,
    /// How many trend steps to extrapolate ahead.
    pub prediction: f32,
    /// Distance below which raw noise is suppressed rather than tracked.
    pub jitter_radius: f32,
    /// Hard cap on how far the prediction may drift from the raw sample.
    pub max_deviation_radius: f32,
}

impl Default for HoltParams {
    fn default() -> Self {
        Self {
            smoothing: 0.25,
            correction: 0.25,
            prediction: 0.25,
            jitter_radius: 0.03,
            max_deviation_radius: 0.05,
        }
    }
}

/// Double exponential (Holt) smoothing with jitter rejection and trend
/// prediction, generic over the sample algebra.
///
/// The filtered/trend/raw state persists across frames; only the
/// deviation-clamped prediction is externally visible.
#[derive(Debug, Clone)]
pub struct HoltFilter<T> {
    pub params: HoltParams,
    filtered: T,
    trend: T,
    raw: T,
    sample_count: u32,
}

impl<T: SampleAlgebra> HoltFilter<T> {
    pub fn new(params: HoltParams) -> Self {
        Self {
            params,
            filtered: T::IDENTITY,
            trend: T::IDENTITY,
            raw: T::IDENTITY,
            sample_count: 0,
        }
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Ingest one raw sample and return the clamped prediction for this
    /// frame. Malformed samples leave the state untouched and return the
    /// last filtered value.
    pub fn filter(&mut self, raw: T) -> T {
        if !raw.is_valid() {
            return self.filtered;
        }

        let prev_raw = self.raw;
        let prev_filtered = self.filtered;
        let prev_trend = self.trend;

        match self.sample_count {
            0 => {
                self.filtered = raw;
                self.trend = T::IDENTITY;
            }
            1 => {
                self.filtered = raw.interpolate(prev_raw, 0.5);
                let diff = self.filtered.difference(prev_filtered);
                self.trend = prev_trend.interpolate(diff, self.params.correction);
            }
            _ => {
                // Jitter rejection. The factor is intentionally not
                // clamped to [0, 1]: an outlier beyond jitter_radius
                // extrapolates past the raw sample.
                let t = if self.params.jitter_radius > 0.0 {
                    raw.distance(prev_filtered) / self.params.jitter_radius
                } else {
                    1.0
                };
                self.filtered = prev_filtered.interpolate(raw, t);

                let held = prev_filtered.compose(prev_trend);
                self.filtered = self.filtered.interpolate(held, self.params.smoothing);

                let diff = self.filtered.difference(prev_filtered);
                self.trend = prev_trend.interpolate(diff, self.params.correction);
            }
        }

        // Runaway jitter extrapolation can overflow the state to
        // inf/NaN. Resync on the raw sample so the deviation clamp
        // below stays meaningful.
        if !self.filtered.is_valid() || !self.trend.is_valid() {
            self.filtered = raw;
            self.trend = T::IDENTITY;
        }

        self.raw = raw;
        self.sample_count += 1;

        // Extrapolate the trend ahead, then pull the prediction back
        // toward the raw sample if it drifted too far.
        let step = T::IDENTITY.interpolate(self.trend, self.params.prediction);
        let mut predicted = self.filtered.compose(step);
        if !predicted.is_valid() {
            self.filtered = raw;
            self.trend = T::IDENTITY;
            predicted = raw;
        }

        let deviation = predicted.distance(raw);
        if deviation > self.params.max_deviation_radius && deviation > 0.0 {
            predicted = raw.interpolate(predicted, self.params.max_deviation_radius / deviation);
        }

        predicted
    }

    /// Zeroes the sample count only; state values are overwritten on the
    /// next sample before they are read.
    pub fn reset(&mut self) {
        self.sample_count = 0;
    }
}
