use std::f64::consts::PI;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use lapsim::{LapSimConfig, LapSimulator};
use mechanics::{FrictionModel, VehicleSpec};
use nalgebra::Vector2;
use powertrain::{PowertrainSpec, TorqueCurve};
use simcore::{Centerline, LapSummary, SimError, StepLimit, GRAVITY};
use track::{SampledTrack, TrackCurve, TrackLayout};

fn circle(radius: f64, n: usize) -> TrackCurve {
    let points: Vec<Vector2<f64>> = (0..n)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / n as f64;
            Vector2::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect();
    TrackCurve::new(&points, true).unwrap()
}

fn default_sim() -> LapSimulator {
    LapSimulator::new(VehicleSpec::default(), PowertrainSpec::default()).unwrap()
}

fn oval_track() -> SampledTrack {
    let curve = TrackLayout::oval(60.0, 15.0).build_curve(1.0).unwrap();
    SampledTrack::from_centerline(&curve, 0.5).unwrap()
}

#[test]
fn engine_limited_straight() {
    let vehicle = VehicleSpec::default()
        .with_aero(0.0, 0.0, 0.0)
        .with_friction(FrictionModel::constant(100.0), FrictionModel::constant(100.0));
    let curve = TorqueCurve::new(vec![(2500.0, 33.72), (10000.0, 29.83)]).unwrap();
    let powertrain = PowertrainSpec::default().with_gear_ratios(vec![1.0]).with_torque_curve(curve.clone());
    let sim = LapSimulator::new(vehicle.clone(), powertrain.clone()).unwrap();

    let trace = sim.accelerate(60.0, 0.25).unwrap();
    assert_eq!(trace.len(), 241);

    for pair in trace.records().windows(2) {
        let (prev, r) = (&pair[0], &pair[1]);
        assert_eq!(r.limit, StepLimit::Traction);
        let rpm = powertrain.rpm_at_velocity(0, prev.velocity).max(0.0);
        assert_relative_eq!(r.rpm, rpm, max_relative = 1e-12);
        let expected = curve.torque_at(rpm) * powertrain.final_drive / powertrain.tire_radius / vehicle.mass;
        assert_relative_eq!(r.longitudinal_acceleration, expected, max_relative = 1e-9);
    }
}

#[test]
fn cornering_clamp_holds_corner_speed() {
    let (radius, corner_speed) = (25.0, 15.0);
    let mu_lat = corner_speed * corner_speed / (GRAVITY * radius);
    let vehicle = VehicleSpec::default()
        .with_aero(0.0, 0.0, 0.0)
        .with_friction(FrictionModel::constant(mu_lat), FrictionModel::constant(1.3));
    let sim = LapSimulator::new(vehicle, PowertrainSpec::default()).unwrap();

    let line = TrackCurve::from_xy(&[(0.0, 0.0), (45.0, 0.0), (90.0, 0.0)], false).unwrap();
    let track = SampledTrack::from_radius_table(&line, &[(50.0, f64::INFINITY), (90.0, radius)], 0.5).unwrap();
    let trace = sim.simulate(&track);

    let corner: Vec<_> = trace.records().iter().filter(|r| r.radius == radius).collect();
    assert!(!corner.is_empty());
    // Reached the corner speed on the straight, so the entry is clamped
    assert_eq!(corner[0].limit, StepLimit::Cornering);
    for r in &corner {
        assert_relative_eq!(r.velocity, corner_speed, max_relative = 1e-9);
        assert_abs_diff_eq!(r.longitudinal_acceleration, 0.0, epsilon = 1e-6);
    }
}

#[test]
fn steady_state_circle_converges_to_grip_limit() {
    let radius = 30.0;
    let vehicle = VehicleSpec::default().with_aero(0.0, 0.0, 0.0);
    let strong = TorqueCurve::new(TorqueCurve::default().points().iter().map(|&(rpm, t)| (rpm, 10.0 * t)).collect())
        .unwrap();
    let powertrain = PowertrainSpec::default().with_torque_curve(strong);
    let sim = LapSimulator::new(vehicle, powertrain).unwrap();

    let curve = circle(radius, 72);
    let track = SampledTrack::from_radius_table(&curve, &[(curve.length(), radius)], 0.5).unwrap();
    let trace = sim.simulate(&track);

    let expected = (1.8 * GRAVITY * radius).sqrt();
    let tail = &trace.records()[trace.len() * 3 / 4..];
    for r in tail {
        assert_relative_eq!(r.velocity, expected, max_relative = 1e-9);
    }
}

#[test]
fn steady_state_circle_from_fitted_curvature() {
    let radius = 30.0;
    let vehicle = VehicleSpec::default().with_aero(0.0, 0.0, 0.0);
    let sim = LapSimulator::new(vehicle, PowertrainSpec::default()).unwrap();

    let curve = circle(radius, 72);
    let track = SampledTrack::from_centerline(&curve, 0.5).unwrap();
    let trace = sim.simulate(&track);

    let expected = (1.8 * GRAVITY * radius).sqrt();
    let last = trace.records().last().unwrap();
    assert_relative_eq!(last.velocity, expected, max_relative = 1e-2);
}

#[test]
fn records_follow_the_sample_grid() {
    let track = oval_track();
    let trace = default_sim().simulate(&track);

    assert_eq!(trace.len(), track.steps() + 1);
    assert!(trace.is_closed());
    for (i, r) in trace.records().iter().enumerate() {
        assert_eq!(r.index, i);
        assert_eq!(r.distance, i as f64 * track.step());
    }
    assert_relative_eq!(trace.lap_length(), track.length(), max_relative = 1e-12);
    // The closing record sits back on the start line
    let first = &trace.records()[0];
    let last = trace.records().last().unwrap();
    assert_eq!((last.x, last.y), (first.x, first.y));
}

#[test]
fn time_increases_and_limits_hold() {
    let sim = default_sim();
    let trace = sim.simulate(&oval_track());
    let max_rpm = sim.powertrain().torque_curve.max_rpm();

    for pair in trace.records().windows(2) {
        assert!(pair[1].time > pair[0].time);
        assert!(pair[1].dt > 0.0);
    }
    for r in trace.records() {
        assert!(r.rpm <= max_rpm);
        assert!(r.velocity >= 0.0);
        let lat = r.lateral_force_used / r.lateral_force_max;
        let long = r.longitudinal_force_used / r.longitudinal_force_capacity;
        assert!(lat * lat + long * long <= 1.0 + 1e-9, "ellipse exceeded at record {}", r.index);
        assert!(r.grip_utilisation() <= 1.0 + 1e-9);
    }
    assert!(trace.records().iter().any(|r| r.limit == StepLimit::Cornering));
}

#[test]
fn identical_inputs_give_identical_traces() {
    let track = oval_track();
    let a = default_sim().simulate(&track);
    let b = default_sim().simulate(&track);
    assert_eq!(a, b);
}

#[test]
fn summary_reproduces_lap_time_and_length() {
    let trace = default_sim().simulate(&oval_track());
    let summary = LapSummary::from_records(trace.records());
    assert_eq!(summary.lap_time, trace.lap_time());
    assert_eq!(summary.lap_length, trace.lap_length());
    assert_eq!(summary, trace.summary());
    assert!(summary.max_velocity > 0.0);
    assert!(summary.max_lateral_g() > 1.0);
}

#[test]
fn acceleration_run_time_lookup() {
    let trace = default_sim().accelerate(75.0, 0.1).unwrap();
    assert!(!trace.is_closed());
    assert_relative_eq!(trace.lap_length(), 75.0, max_relative = 1e-12);
    assert_eq!(trace.time_at_distance(trace.lap_length()), trace.lap_time());
    let half = trace.time_at_distance(37.5);
    assert!(half > 0.0 && half < trace.lap_time());
    // Quicker through the second half than the first
    assert!(trace.lap_time() - half < half);
}

#[test]
fn setup_errors_surface_before_simulation() {
    let heavy_nothing = VehicleSpec::default().with_mass(0.0);
    assert!(matches!(
        LapSimulator::new(heavy_nothing, PowertrainSpec::default()),
        Err(SimError::InvalidVehicleConfig(_))
    ));
    assert!(matches!(
        LapSimulator::new(VehicleSpec::default(), PowertrainSpec::default().with_final_drive(0.0)),
        Err(SimError::InvalidPowertrainConfig(_))
    ));
    assert!(matches!(default_sim().accelerate(75.0, 0.0), Err(SimError::NonPositiveStep(_))));
    assert!(matches!(default_sim().accelerate(-5.0, 0.1), Err(SimError::InvalidTrackGeometry(_))));
    assert!(matches!(default_sim().accelerate(10.0, 1e-300), Err(SimError::InvalidTrackGeometry(_))));
}

#[test]
fn config_drives_a_lap() {
    let config = LapSimConfig::from_json_str(r#"{ "step": 0.5 }"#).unwrap();
    let curve = TrackLayout::oval(60.0, 15.0).build_curve(1.0).unwrap();
    let track = SampledTrack::from_centerline(&curve, config.step).unwrap();
    let trace = config.simulator().unwrap().simulate(&track);
    assert_eq!(trace, default_sim().simulate(&oval_track()));
}
