use std::f64::consts::PI;

use nalgebra::Vector2;
use simcore::STRAIGHT_RADIUS;

/// `sin(pi - A)` below this is treated as a straight (collinear) triple.
const COLLINEAR_SIN_EPSILON: f64 = 1e-12;

/// Circumscribed-circle radius of three consecutive track points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusEstimate {
    pub radius: f64,
    /// The law-of-cosines ratio fell outside [-1, 1] and was clamped.
    pub cosine_clamped: bool,
    /// The points were (nearly) collinear; `radius` is the straight cap.
    pub collinear: bool,
}

/// Radius of the circle through `prev`, `mid` and `next`.
///
/// Never returns infinity: near-collinear triples get [`STRAIGHT_RADIUS`].
pub fn triangle_radius(prev: Vector2<f64>, mid: Vector2<f64>, next: Vector2<f64>) -> RadiusEstimate {
    let a = (prev - next).norm();
    let b = (mid - next).norm();
    let c = (mid - prev).norm();

    if b * c <= f64::MIN_POSITIVE {
        return RadiusEstimate { radius: STRAIGHT_RADIUS, cosine_clamped: false, collinear: true };
    }

    let cosine = (b * b + c * c - a * a) / (2.0 * b * c);
    let clamped = cosine.clamp(-1.0, 1.0);
    let angle = clamped.acos();
    let sine = (PI - angle).sin();

    if sine.abs() < COLLINEAR_SIN_EPSILON {
        return RadiusEstimate { radius: STRAIGHT_RADIUS, cosine_clamped: clamped != cosine, collinear: true };
    }

    RadiusEstimate {
        radius: (a / (2.0 * sine)).min(STRAIGHT_RADIUS),
        cosine_clamped: clamped != cosine,
        collinear: false,
    }
}
