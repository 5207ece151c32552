use common::{AccumulatedAverage, ExpSmoother, HoltFilter, HoltParams};
use glam::{Quat, Vec3};

const EPS: f32 = 1e-4;

#[test]
fn exp_constant_input_converges() {
    for alpha in [0.1, 0.5, 0.9] {
        let mut smoother = ExpSmoother::new(alpha);
        for _ in 0..40 {
            smoother.add_sample(2.5f32);
        }
        let forecast = smoother.latest_forecast().unwrap();
        assert!(
            (forecast - 2.5).abs() < EPS,
            "alpha={} forecast={}",
            alpha,
            forecast
        );
    }
}

#[test]
fn exp_alpha_zero_tracks_raw() {
    let mut smoother = ExpSmoother::new(0.0);
    smoother.add_sample(1.0f32);
    smoother.add_sample(2.0);
    smoother.add_sample(3.0);
    assert!((smoother.forecast(2).unwrap() - 3.0).abs() < EPS);
}

#[test]
fn exp_forecast_beyond_window_is_none() {
    let mut smoother = ExpSmoother::new(0.5);
    assert_eq!(smoother.forecast(0), None::<f32>);
    smoother.add_sample(1.0);
    smoother.add_sample(2.0);
    assert!(smoother.forecast(1).is_some());
    assert_eq!(smoother.forecast(2), None);
}

#[test]
fn exp_window_evicts_oldest() {
    let mut smoother = ExpSmoother::with_window(0.5, 4);
    for i in 0..6 {
        smoother.add_sample(i as f32);
    }
    assert_eq!(smoother.len(), 4);
    // Oldest retained sample is now 2.0, so F[0] == 2.0.
    assert!((smoother.forecast(0).unwrap() - 2.0).abs() < EPS);
}

#[test]
fn exp_rejects_degenerate_rotation() {
    let mut smoother: ExpSmoother<Quat> = ExpSmoother::new(0.5);
    smoother.add_sample(Quat::from_xyzw(0.0, 0.0, 0.0, 0.0));
    assert!(smoother.is_empty());
    smoother.add_sample(Quat::from_rotation_y(0.3));
    assert_eq!(smoother.len(), 1);
}

#[test]
fn exp_reset_clears_window() {
    let mut smoother = ExpSmoother::new(0.5);
    smoother.add_sample(1.0f32);
    smoother.reset();
    assert!(smoother.is_empty());
    assert_eq!(smoother.forecast(0), None);
}

#[test]
fn holt_first_sample_passthrough_scalar() {
    let mut filter = HoltFilter::new(HoltParams::default());
    assert_eq!(filter.filter(7.25f32), 7.25);
}

#[test]
fn holt_first_sample_passthrough_vector() {
    let mut filter = HoltFilter::new(HoltParams::default());
    let raw = Vec3::new(0.1, -2.0, 3.5);
    assert!(filter.filter(raw).distance(raw) < EPS);
}

#[test]
fn holt_first_sample_passthrough_rotation() {
    let mut filter = HoltFilter::new(HoltParams::default());
    let raw = Quat::from_rotation_y(0.8);
    assert!(filter.filter(raw).angle_between(raw) < EPS);
}

#[test]
fn holt_prediction_never_exceeds_deviation_radius() {
    let params = HoltParams {
        smoothing: 0.25,
        correction: 0.25,
        prediction: 1.5,
        jitter_radius: 0.01,
        max_deviation_radius: 0.05,
    };
    let mut filter = HoltFilter::new(params);
    for raw in [0.0f32, 1.0, 5.0, -3.0, 10.0, 10.0, -8.0, 0.5] {
        let predicted = filter.filter(raw);
        assert!(
            (predicted - raw).abs() <= params.max_deviation_radius + EPS,
            "raw={} predicted={}",
            raw,
            predicted
        );
    }
}

#[test]
fn holt_deviation_clamp_vector() {
    let params = HoltParams {
        prediction: 2.0,
        jitter_radius: 0.005,
        max_deviation_radius: 0.04,
        ..HoltParams::default()
    };
    let mut filter = HoltFilter::new(params);
    for i in 0..50 {
        let raw = Vec3::new((i as f32 * 0.7).sin() * 3.0, i as f32 * 0.1, 0.0);
        let predicted = filter.filter(raw);
        assert!(predicted.distance(raw) <= params.max_deviation_radius + EPS);
    }
    assert_eq!(filter.sample_count(), 50);
}

// The jitter-rejection factor distance/jitter_radius is intentionally
// not clamped to [0, 1]: an outlier beyond the radius extrapolates past
// the raw sample instead of being rejected. Reference behavior, kept.
#[test]
fn holt_jitter_factor_is_unclamped() {
    let params = HoltParams {
        smoothing: 0.0,
        correction: 0.0,
        prediction: 0.0,
        jitter_radius: 0.5,
        max_deviation_radius: 100.0,
    };
    let mut filter = HoltFilter::new(params);
    filter.filter(0.0f32);
    filter.filter(0.0);
    // distance(1.0, 0.0) / 0.5 == 2.0, so the filtered value lands at
    // 2.0 -- past the raw sample.
    let predicted = filter.filter(1.0);
    assert!((predicted - 2.0).abs() < EPS, "predicted={}", predicted);
}

// Each outlier beyond jitter_radius multiplies the internal error, so
// a hostile sequence overflows f32 range quickly. The filter must
// resync instead of leaking inf/NaN through the deviation clamp.
#[test]
fn holt_recovers_from_state_overflow() {
    let params = HoltParams {
        jitter_radius: 0.01,
        max_deviation_radius: 0.05,
        ..HoltParams::default()
    };
    let mut filter = HoltFilter::new(params);
    let mut raw = 1.0f32;
    for _ in 0..64 {
        let predicted = filter.filter(raw);
        assert!(predicted.is_finite(), "raw={} predicted={}", raw, predicted);
        assert!(
            (predicted - raw).abs() <= params.max_deviation_radius + EPS,
            "raw={} predicted={}",
            raw,
            predicted
        );
        raw = -raw * 2.0;
    }
}

#[test]
fn holt_reset_restores_first_sample_behavior() {
    let mut filter = HoltFilter::new(HoltParams::default());
    filter.filter(1.0f32);
    filter.filter(2.0);
    filter.filter(3.0);
    filter.reset();
    assert_eq!(filter.filter(9.0), 9.0);
}

#[test]
fn holt_ignores_invalid_sample() {
    let mut filter = HoltFilter::new(HoltParams::default());
    filter.filter(4.0f32);
    let count = filter.sample_count();
    filter.filter(f32::NAN);
    assert_eq!(filter.sample_count(), count);
}

#[test]
fn average_identical_samples_is_exact() {
    let mut avg = AccumulatedAverage::new();
    for _ in 0..7 {
        avg.add_sample(1.75f32);
    }
    assert!((avg.get_current().unwrap() - 1.75).abs() < EPS);
}

#[test]
fn average_two_samples_is_midpoint() {
    let mut avg = AccumulatedAverage::new();
    avg.add_sample(2.0f32);
    avg.add_sample(6.0);
    assert!((avg.get_current().unwrap() - 4.0).abs() < EPS);

    let mut vavg = AccumulatedAverage::new();
    vavg.add_sample(Vec3::new(1.0, 0.0, 0.0));
    vavg.add_sample(Vec3::new(3.0, 2.0, 0.0));
    assert!(vavg.get_current().unwrap().distance(Vec3::new(2.0, 1.0, 0.0)) < EPS);
}

#[test]
fn average_empty_is_none() {
    let avg: AccumulatedAverage<f32> = AccumulatedAverage::new();
    assert_eq!(avg.get_current(), None);
}

#[test]
fn average_rotation_is_geodesic() {
    let mut avg = AccumulatedAverage::new();
    avg.add_sample(Quat::IDENTITY);
    avg.add_sample(Quat::from_rotation_y(0.8));
    let mean = avg.get_current().unwrap();
    assert!(mean.angle_between(Quat::from_rotation_y(0.4)) < 1e-3);
}

#[test]
fn average_reset_discards_history() {
    let mut avg = AccumulatedAverage::new();
    avg.add_sample(10.0f32);
    avg.reset();
    avg.add_sample(2.0);
    assert!((avg.get_current().unwrap() - 2.0).abs() < EPS);
}
