use glam::{Quat, Vec3};

/// Small algebra every filterable sample type provides: an identity,
/// delta composition/difference, geodesic interpolation and a scalar
/// metric. One filter implementation covers scalars, vectors and
/// rotations through this seam.
pub trait SampleAlgebra: Copy {
    const IDENTITY: Self;

    /// Apply `delta` to `self`.
    fn compose(self, delta: Self) -> Self;

    /// The delta that takes `from` to `self`, so
    /// `from.compose(self.difference(from)) == self`.
    fn difference(self, from: Self) -> Self;

    /// Interpolate from `self` toward `other`. Deliberately unclamped:
    /// `t > 1` extrapolates past `other`.
    fn interpolate(self, other: Self, t: f32) -> Self;

    fn distance(self, other: Self) -> f32;

    /// Malformed-sample guard; invalid samples are dropped by the
    /// filters rather than propagated.
    fn is_valid(self) -> bool;
}

impl SampleAlgebra for f32 {
    const IDENTITY: Self = 0.0;

    fn compose(self, delta: Self) -> Self {
        self + delta
    }

    fn difference(self, from: Self) -> Self {
        self - from
    }

    fn interpolate(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn distance(self, other: Self) -> f32 {
        (self - other).abs()
    }

    fn is_valid(self) -> bool {
        self.is_finite()
    }
}

impl SampleAlgebra for Vec3 {
    const IDENTITY: Self = Vec3::ZERO;

    fn compose(self, delta: Self) -> Self {
        self + delta
    }

    fn difference(self, from: Self) -> Self {
        self - from
    }

    fn interpolate(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    fn is_valid(self) -> bool {
        self.is_finite()
    }
}

impl SampleAlgebra for Quat {
    const IDENTITY: Self = Quat::IDENTITY;

    fn compose(self, delta: Self) -> Self {
        delta * self
    }

    fn difference(self, from: Self) -> Self {
        self * from.inverse()
    }

    fn interpolate(self, other: Self, t: f32) -> Self {
        self.slerp(other, t)
    }

    fn distance(self, other: Self) -> f32 {
        self.angle_between(other)
    }

    fn is_valid(self) -> bool {
        self.is_finite() && self.length_squared() > 1e-6
    }
}
