use api::Skeleton;

/// Contract between the frame driver and an independent tracking
/// source. Managers are invoked once per frame in non-decreasing
/// priority order, so a higher-priority (later) manager may read
/// skeleton state already written by earlier ones in the same frame.
pub trait TrackingManager: Send {
    /// Apply this source's samples to the skeleton for the current
    /// frame.
    fn update_tracking(&mut self, skeleton: &mut Skeleton, dt: f32);

    /// Run this manager's own calibration; sets the latch back once the
    /// manager judges it has enough stable data.
    fn calibrate(&mut self, skeleton: &Skeleton);

    fn is_calibrated(&self) -> bool;
    fn set_calibrated(&mut self, calibrated: bool);

    /// Default processing priority; lower runs first. Overridable at
    /// registration time.
    fn priority(&self) -> i32 {
        0
    }

    fn name(&self) -> &str;
}
