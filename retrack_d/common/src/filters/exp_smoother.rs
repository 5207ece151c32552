use std::collections::VecDeque;

use crate::algebra::SampleAlgebra;

pub const DEFAULT_MAX_SAMPLES: usize = 25;

/// Single exponential smoothing over a bounded window of raw samples.
///
/// The forecast is recomputed from scratch over the whole retained
/// window on every query: `F[0] = S[0]`,
/// `F[i] = interpolate(S[i], F[i-1], alpha)`. O(window) per query, which
/// is fine for the small bounded windows this runs on.
#[derive(Debug, Clone)]
pub struct ExpSmoother<T> {
    samples: VecDeque<T>,
    max_samples: usize,
    alpha: f32,
}

impl<T: SampleAlgebra> ExpSmoother<T> {
    /// `alpha` in [0, 1]: 0 = no smoothing, 1 = maximum lag.
    pub fn new(alpha: f32) -> Self {
        Self::with_window(alpha, DEFAULT_MAX_SAMPLES)
    }

    pub fn with_window(alpha: f32, max_samples: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            alpha,
        }
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Push a raw sample, evicting the oldest once the bound is
    /// exceeded. Malformed samples (NaN, zero-magnitude rotations) are
    /// silently dropped.
    pub fn add_sample(&mut self, sample: T) {
        if !sample.is_valid() {
            return;
        }
        self.samples.push_back(sample);
        if self.samples.len() > self.max_samples {
            self.samples.pop_front();
        }
    }

    /// Forecast value at `index` into the retained window, `None` when
    /// the index falls outside it.
    pub fn forecast(&self, index: usize) -> Option<T> {
        let first = *self.samples.front()?;
        if index >= self.samples.len() {
            return None;
        }
        let mut value = first;
        for i in 1..=index {
            value = self.samples[i].interpolate(value, self.alpha);
        }
        Some(value)
    }

    /// Forecast at the newest retained sample.
    pub fn latest_forecast(&self) -> Option<T> {
        self.forecast(self.samples.len().checked_sub(1)?)
    }

    /// Clears the window without deallocating.
    pub fn reset(&mut self) {
        self.samples.clear();
    }
}
