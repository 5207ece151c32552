use crate::algebra::SampleAlgebra;

/// Decaying-weight running mean: O(1) per sample, unbounded history, no
/// FIFO. Numerically the arithmetic mean for scalars/vectors and the
/// geodesic mean for rotations.
#[derive(Debug, Clone)]
pub struct AccumulatedAverage<T> {
    current: T,
    count: u32,
}

impl<T: SampleAlgebra> Default for AccumulatedAverage<T> {
    fn default() -> Self {
        Self {
            current: T::IDENTITY,
            count: 0,
        }
    }
}

impl<T: SampleAlgebra> AccumulatedAverage<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sample(&mut self, sample: T) {
        if !sample.is_valid() {
            return;
        }
        if self.count == 0 {
            self.current = sample;
        } else {
            let n = self.count as f32;
            self.current = sample.interpolate(self.current, n / (n + 1.0));
        }
        self.count += 1;
    }

    pub fn get_current(&self) -> Option<T> {
        (self.count > 0).then_some(self.current)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
