mod average;
mod exp_smoother;
mod holt;

pub use average::AccumulatedAverage;
pub use exp_smoother::{ExpSmoother, DEFAULT_MAX_SAMPLES};
pub use holt::{HoltFilter, HoltParams};
