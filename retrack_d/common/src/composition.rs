use api::Skeleton;
use log::debug;
#[cfg(feature = "xtralog")]
use log::trace;

use crate::tracking_trait::TrackingManager;

struct Entry {
    priority: i32,
    manager: Box<dyn TrackingManager>,
}

/// Explicit ordered collection of tracking managers, owned by the frame
/// driver and populated at startup. Registration keeps the set stably
/// sorted by effective priority, so one `update` call invokes every
/// manager exactly once in non-decreasing priority order.
#[derive(Default)]
pub struct TrackingComposition {
    entries: Vec<Entry>,
}

impl TrackingComposition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register with the manager's own default priority.
    pub fn register(&mut self, manager: Box<dyn TrackingManager>) {
        let priority = manager.priority();
        self.register_with_priority(manager, priority);
    }

    /// Register with a configured priority override.
    pub fn register_with_priority(&mut self, manager: Box<dyn TrackingManager>, priority: i32) {
        debug!(
            "Registering tracking manager '{}' at priority {}",
            manager.name(),
            priority
        );
        self.entries.push(Entry { priority, manager });
        // Stable sort: equal priorities keep registration order.
        self.entries.sort_by_key(|e| e.priority);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One frame: every manager exactly once, lowest priority first.
    pub fn update(&mut self, skeleton: &mut Skeleton, dt: f32) {
        for entry in &mut self.entries {
            #[cfg(feature = "xtralog")]
            trace!(
                "update_tracking: '{}' (priority {})",
                entry.manager.name(),
                entry.priority
            );
            entry.manager.update_tracking(skeleton, dt);
        }
    }

    /// Global calibrate trigger: clears every manager's latch. Each
    /// manager re-latches independently through its own `calibrate`.
    pub fn trigger_calibration(&mut self) {
        for entry in &mut self.entries {
            debug!("Clearing calibration latch for '{}'", entry.manager.name());
            entry.manager.set_calibrated(false);
        }
    }

    /// Give uncalibrated managers a calibration pass against the current
    /// skeleton state.
    pub fn run_calibration(&mut self, skeleton: &Skeleton) {
        for entry in &mut self.entries {
            if !entry.manager.is_calibrated() {
                entry.manager.calibrate(skeleton);
            }
        }
    }

    pub fn all_calibrated(&self) -> bool {
        self.entries.iter().all(|e| e.manager.is_calibrated())
    }
}
