pub use api::{
    muscle_dof, muscle_span, BodyPose, BoneRole, JointTransform, Skeleton, TrackingState,
    TrustMask, TwistReference, MUSCLE_COUNT,
};

pub mod algebra;
mod composition;
mod config;
pub mod curve;
pub mod filters;
mod recorder;
mod retarget;
mod tracked_joint;
mod tracking_trait;

pub use algebra::SampleAlgebra;
pub use composition::TrackingComposition;
pub use config::{load_config, PipelineConfig};
pub use curve::{AnimationCurve, CurveSet, EvaluateMethod};
pub use filters::{AccumulatedAverage, ExpSmoother, HoltFilter, HoltParams};
pub use recorder::{PlayerGroup, PoseRecorder, RecordTicker};
pub use retarget::{segment_direction, PoseRetargeter};
pub use tracked_joint::TrackedJoint;
pub use tracking_trait::TrackingManager;
