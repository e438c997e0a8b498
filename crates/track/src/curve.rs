use log::{debug, warn};
use nalgebra::Vector2;
use simcore::{Centerline, SimError, SimResult};

use crate::spline::CubicSpline;

/// Segments at or below this length (m) count as coincident points.
const COINCIDENT_TOLERANCE: f64 = 1e-12;

/// Interpolating cubic-spline centreline through an ordered set of points,
/// parameterized by cumulative chord length.
#[derive(Debug, Clone)]
pub struct TrackCurve {
    points: Vec<Vector2<f64>>,
    closed: bool,
    length: f64,
    x: CubicSpline,
    y: CubicSpline,
}

impl TrackCurve {
    /// Fit a curve through `points`. Closed curves are periodic and join the
    /// last point back to the first; a repeated closing point is dropped.
    pub fn new(points: &[Vector2<f64>], closed: bool) -> SimResult<Self> {
        let mut points = points.to_vec();

        if let Some(bad) = points.iter().position(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(SimError::InvalidTrackGeometry(format!("point {} is not finite", bad)));
        }
        if closed && points.len() > 3 && points.first() == points.last() {
            debug!("dropping repeated closing point of closed track");
            points.pop();
        }
        if count_distinct(&points, 3) < 3 {
            return Err(SimError::InvalidTrackGeometry(format!(
                "at least 3 distinct points are required, got {} points",
                points.len()
            )));
        }

        let mut knots = Vec::with_capacity(points.len() + 1);
        knots.push(0.0);
        for (i, pair) in points.windows(2).enumerate() {
            let chord = (pair[1] - pair[0]).norm();
            if chord <= COINCIDENT_TOLERANCE {
                return Err(SimError::InvalidTrackGeometry(format!(
                    "points {} and {} coincide",
                    i,
                    i + 1
                )));
            }
            knots.push(knots[i] + chord);
        }

        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();

        let (x, y) = if closed {
            let last = points.len() - 1;
            let closing = (points[0] - points[last]).norm();
            if closing <= COINCIDENT_TOLERANCE {
                return Err(SimError::InvalidTrackGeometry(format!(
                    "closing segment from point {} back to point 0 has zero length",
                    last
                )));
            }
            let mean_chord = knots[last] / last as f64;
            if closing > 10.0 * mean_chord {
                warn!(
                    "closed track joins its ends across a {:.3} m gap ({:.3} m mean spacing)",
                    closing, mean_chord
                );
            }
            knots.push(knots[last] + closing);
            (
                CubicSpline::periodic(knots.clone(), xs),
                CubicSpline::periodic(knots.clone(), ys),
            )
        } else {
            (
                CubicSpline::not_a_knot(knots.clone(), xs),
                CubicSpline::not_a_knot(knots.clone(), ys),
            )
        };

        let length = knots[knots.len() - 1];
        debug!(
            "fitted {} track curve through {} points, length {:.3} m",
            if closed { "closed" } else { "open" },
            points.len(),
            length
        );

        Ok(TrackCurve { points, closed, length, x, y })
    }

    /// Convenience constructor from `(x, y)` tuples.
    pub fn from_xy(points: &[(f64, f64)], closed: bool) -> SimResult<Self> {
        let points: Vec<Vector2<f64>> = points.iter().map(|&(x, y)| Vector2::new(x, y)).collect();
        Self::new(&points, closed)
    }

    pub fn control_points(&self) -> &[Vector2<f64>] {
        &self.points
    }

    /// Unit tangent at distance `s`.
    pub fn tangent(&self, s: f64) -> Vector2<f64> {
        let d = Vector2::new(self.x.derivative(s), self.y.derivative(s));
        let norm = d.norm();
        if norm > 0.0 { d / norm } else { d }
    }
}

impl Centerline for TrackCurve {
    fn length(&self) -> f64 {
        self.length
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn position(&self, s: f64) -> Vector2<f64> {
        Vector2::new(self.x.value(s), self.y.value(s))
    }
}

/// Number of distinct points, counting no further than `limit`.
fn count_distinct(points: &[Vector2<f64>], limit: usize) -> usize {
    let mut seen: Vec<&Vector2<f64>> = Vec::with_capacity(limit);
    for p in points {
        if seen.len() >= limit {
            break;
        }
        if !seen.iter().any(|q| *q == p) {
            seen.push(p);
        }
    }
    seen.len()
}
