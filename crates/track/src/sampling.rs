use log::debug;
use nalgebra::Vector2;
use simcore::{Centerline, ClampLog, NumericClamp, Sample, SimError, SimResult};

use crate::curvature::triangle_radius;

/// Finest discretization accepted for one lap.
const MAX_STEPS: usize = 10_000_000;

/// A track resampled at a constant arclength step, with a curvature radius
/// per sample.
///
/// Closed tracks hold N samples and index N wraps to the start. Open tracks
/// hold N + 1 samples, the last one sitting on the finish at s = L.
#[derive(Debug, Clone)]
pub struct SampledTrack {
    samples: Vec<Sample>,
    step: f64,
    steps: usize,
    length: f64,
    closed: bool,
    clamps: ClampLog,
}

impl SampledTrack {
    /// Resample `curve` every ~`target_step` metres and estimate each sample's
    /// radius from the circle through its neighbours one step either side.
    /// The end samples of an open track borrow the radius of the triple next
    /// to them.
    pub fn from_centerline<C: Centerline>(curve: &C, target_step: f64) -> SimResult<Self> {
        let (steps, step) = discretize(curve.length(), target_step)?;
        let closed = curve.is_closed();
        let mut clamps = ClampLog::default();

        let samples = (0..sample_count(steps, closed))
            .map(|i| {
                let s = i as f64 * step;
                let mid = curve.position(s);
                let centre = triple_centre(i, steps, closed) as f64 * step;
                let est = triangle_radius(
                    curve.position(centre - step),
                    curve.position(centre),
                    curve.position(centre + step),
                );
                if est.cosine_clamped {
                    clamps.record(NumericClamp::CosineOvershoot, i);
                }
                if est.collinear {
                    clamps.record(NumericClamp::CollinearTriple, i);
                }
                Sample { index: i, distance: s, x: mid.x, y: mid.y, radius: est.radius }
            })
            .collect();

        debug!(
            "sampled {:.3} m track into {} steps of {:.4} m ({} clamped radii)",
            curve.length(),
            steps,
            step,
            clamps.collinear_triple
        );
        Ok(SampledTrack { samples, step, steps, length: curve.length(), closed, clamps })
    }

    /// Resample a pre-fitted curve whose curvature is already tabulated.
    ///
    /// `table` rows are `(end_distance, radius)`: a sample at `s` takes the
    /// radius of the first row whose end distance is beyond `s`, and the last
    /// row applies past the end of the table. Infinite radii mark straights.
    pub fn from_radius_table<C: Centerline>(curve: &C, table: &[(f64, f64)], target_step: f64) -> SimResult<Self> {
        validate_radius_table(table)?;
        let (steps, step) = discretize(curve.length(), target_step)?;
        let closed = curve.is_closed();

        let samples = (0..sample_count(steps, closed))
            .map(|i| {
                let s = i as f64 * step;
                let p = curve.position(s);
                let row = table.partition_point(|&(end, _)| end <= s).min(table.len() - 1);
                Sample { index: i, distance: s, x: p.x, y: p.y, radius: table[row].1 }
            })
            .collect();

        debug!("sampled tabulated track into {} steps of {:.4} m", steps, step);
        Ok(SampledTrack { samples, step, steps, length: curve.length(), closed, clamps: ClampLog::default() })
    }

    /// Open, perfectly straight track along +x.
    pub fn straight(length: f64, target_step: f64) -> SimResult<Self> {
        let line = StraightLine { length };
        let (steps, step) = discretize(line.length(), target_step)?;
        let samples = (0..=steps)
            .map(|i| {
                let s = i as f64 * step;
                let p = line.position(s);
                Sample { index: i, distance: s, x: p.x, y: p.y, radius: f64::INFINITY }
            })
            .collect();
        Ok(SampledTrack { samples, step, steps, length, closed: false, clamps: ClampLog::default() })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Sample `i`, wrapping past the end of a closed track.
    pub fn sample(&self, i: usize) -> &Sample {
        if self.closed {
            &self.samples[i % self.samples.len()]
        } else {
            &self.samples[i.min(self.samples.len() - 1)]
        }
    }

    /// Constant arclength step Δs = L / N.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of steps N covering one lap.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn clamps(&self) -> &ClampLog {
        &self.clamps
    }
}

struct StraightLine {
    length: f64,
}

impl Centerline for StraightLine {
    fn length(&self) -> f64 {
        self.length
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn position(&self, s: f64) -> Vector2<f64> {
        Vector2::new(s, 0.0)
    }
}

/// Number of steps N and their size Δs for a track of `length`.
fn discretize(length: f64, target_step: f64) -> SimResult<(usize, f64)> {
    if !(target_step.is_finite() && target_step > 0.0) {
        return Err(SimError::NonPositiveStep(target_step));
    }
    if !(length.is_finite() && length > 0.0) {
        return Err(SimError::InvalidTrackGeometry(format!("track length must be positive, got {}", length)));
    }
    let steps = (length / target_step).round();
    if steps > MAX_STEPS as f64 {
        return Err(SimError::InvalidTrackGeometry(format!(
            "step {} m splits a {} m track into more than {} steps",
            target_step, length, MAX_STEPS
        )));
    }
    let steps = steps as usize;
    if steps == 0 {
        return Err(SimError::InvalidTrackGeometry(format!(
            "step {} m leaves no samples on a {} m track",
            target_step, length
        )));
    }
    Ok((steps, length / steps as f64))
}

/// Index of the sample whose neighbours give sample `i` its radius.
fn triple_centre(i: usize, steps: usize, closed: bool) -> usize {
    if closed || steps < 2 { i } else { i.clamp(1, steps - 1) }
}

fn sample_count(steps: usize, closed: bool) -> usize {
    if closed { steps } else { steps + 1 }
}

fn validate_radius_table(table: &[(f64, f64)]) -> SimResult<()> {
    if table.is_empty() {
        return Err(SimError::InvalidTrackGeometry("radius table is empty".to_string()));
    }
    for (i, &(end, radius)) in table.iter().enumerate() {
        if !end.is_finite() {
            return Err(SimError::InvalidTrackGeometry(format!("radius table row {} has no finite end distance", i)));
        }
        if !(radius > 0.0) {
            return Err(SimError::InvalidTrackGeometry(format!("radius table row {} has radius {}", i, radius)));
        }
        if i > 0 && end <= table[i - 1].0 {
            return Err(SimError::InvalidTrackGeometry(format!(
                "radius table end distances must increase (row {})",
                i
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::TrackCurve;
    use approx::assert_relative_eq;
    use simcore::STRAIGHT_RADIUS;
    use std::f64::consts::PI;

    fn circle_curve(radius: f64, n: usize) -> TrackCurve {
        let points: Vec<Vector2<f64>> = (0..n)
            .map(|i| {
                let theta = 2.0 * PI * i as f64 / n as f64;
                Vector2::new(radius * theta.cos(), radius * theta.sin())
            })
            .collect();
        TrackCurve::new(&points, true).unwrap()
    }

    #[test]
    fn test_even_spacing() {
        let curve = circle_curve(40.0, 36);
        let track = SampledTrack::from_centerline(&curve, 1.0).unwrap();
        let n = (curve.length() / 1.0).round() as usize;
        assert_eq!(track.steps(), n);
        assert_eq!(track.samples().len(), n);
        assert_relative_eq!(track.step() * n as f64, curve.length(), max_relative = 1e-12);
        for (i, sample) in track.samples().iter().enumerate() {
            assert_eq!(sample.index, i);
            assert_eq!(sample.distance, i as f64 * track.step());
        }
    }

    #[test]
    fn test_circle_radius_recovered() {
        let curve = circle_curve(40.0, 72);
        let track = SampledTrack::from_centerline(&curve, 0.5).unwrap();
        for sample in track.samples() {
            assert_relative_eq!(sample.radius, 40.0, max_relative = 5e-3);
        }
        // Closed tracks wrap
        assert_eq!(track.sample(track.steps()).index, 0);
    }

    #[test]
    fn test_straight_open_curve_is_capped() {
        let curve = TrackCurve::from_xy(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0)], false).unwrap();
        let track = SampledTrack::from_centerline(&curve, 1.0).unwrap();
        assert_eq!(track.samples().len(), 31);
        assert_eq!(track.sample(30).distance, 30.0);
        for sample in track.samples() {
            assert_eq!(sample.radius, STRAIGHT_RADIUS);
        }
        assert_eq!(track.clamps().collinear_triple, 31);
    }

    #[test]
    fn test_open_arc_radius_at_every_sample() {
        let radius = 20.0;
        let points: Vec<Vector2<f64>> = (0..31)
            .map(|i| {
                let theta = 0.5 * PI * i as f64 / 30.0;
                Vector2::new(radius * theta.cos(), radius * theta.sin())
            })
            .collect();
        let curve = TrackCurve::new(&points, false).unwrap();
        let track = SampledTrack::from_centerline(&curve, 0.5).unwrap();

        assert_eq!(track.samples().len(), track.steps() + 1);
        for sample in track.samples() {
            assert_relative_eq!(sample.radius, radius, max_relative = 1e-2);
        }
        assert_eq!(track.clamps().collinear_triple, 0);
    }

    /// Collinear but unevenly spaced along +x.
    struct Stretched;

    impl Centerline for Stretched {
        fn length(&self) -> f64 {
            1.0
        }

        fn is_closed(&self) -> bool {
            false
        }

        fn position(&self, s: f64) -> Vector2<f64> {
            Vector2::new(s * s, 0.0)
        }
    }

    #[test]
    fn test_cosine_overshoot_is_counted() {
        let track = SampledTrack::from_centerline(&Stretched, 0.1).unwrap();
        assert!(track.clamps().cosine_overshoot > 0);
        for sample in track.samples() {
            assert!(sample.radius.is_finite());
            assert!(sample.radius > 1.0e5);
        }
    }

    #[test]
    fn test_step_too_fine() {
        let err = SampledTrack::straight(10.0, 1e-300).unwrap_err();
        assert!(matches!(err, SimError::InvalidTrackGeometry(_)));
        let curve = circle_curve(10.0, 12);
        assert!(matches!(
            SampledTrack::from_centerline(&curve, 1e-9),
            Err(SimError::InvalidTrackGeometry(_))
        ));
    }

    #[test]
    fn test_non_positive_step() {
        let curve = circle_curve(10.0, 12);
        assert_eq!(SampledTrack::from_centerline(&curve, 0.0).unwrap_err(), SimError::NonPositiveStep(0.0));
        assert_eq!(SampledTrack::from_centerline(&curve, -2.0).unwrap_err(), SimError::NonPositiveStep(-2.0));
        assert!(matches!(SampledTrack::straight(10.0, f64::NAN), Err(SimError::NonPositiveStep(_))));
    }

    #[test]
    fn test_step_longer_than_track() {
        let err = SampledTrack::straight(10.0, 25.0).unwrap_err();
        assert!(matches!(err, SimError::InvalidTrackGeometry(_)));
        let err = SampledTrack::straight(0.0, 1.0).unwrap_err();
        assert!(matches!(err, SimError::InvalidTrackGeometry(_)));
    }

    #[test]
    fn test_radius_table_lookup() {
        let curve = circle_curve(20.0, 24);
        let l = curve.length();
        let table = [(l / 4.0, f64::INFINITY), (l / 2.0, 15.0), (l, 30.0)];
        let track = SampledTrack::from_radius_table(&curve, &table, l / 100.0).unwrap();
        assert_eq!(track.steps(), 100);
        assert_eq!(track.sample(0).radius, f64::INFINITY);
        assert_eq!(track.sample(24).radius, f64::INFINITY);
        assert_eq!(track.sample(26).radius, 15.0);
        assert_eq!(track.sample(60).radius, 30.0);
        assert_eq!(track.sample(99).radius, 30.0);
    }

    #[test]
    fn test_radius_table_validation() {
        let curve = circle_curve(20.0, 24);
        assert!(SampledTrack::from_radius_table(&curve, &[], 1.0).is_err());
        assert!(SampledTrack::from_radius_table(&curve, &[(10.0, 5.0), (5.0, 5.0)], 1.0).is_err());
        assert!(SampledTrack::from_radius_table(&curve, &[(10.0, 0.0)], 1.0).is_err());
        assert!(SampledTrack::from_radius_table(&curve, &[(10.0, f64::NAN)], 1.0).is_err());
    }

    #[test]
    fn test_straight_track() {
        let track = SampledTrack::straight(75.0, 0.5).unwrap();
        assert_eq!(track.steps(), 150);
        assert_eq!(track.samples().len(), 151);
        assert!(!track.is_closed());
        let last = track.sample(150);
        assert_eq!(last.x, 75.0);
        assert!(last.radius.is_infinite());
    }
}
