//! Track layouts described as straights and constant-radius turns.

use log::debug;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use simcore::{SimError, SimResult};

use crate::curve::TrackCurve;

/// One piece of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Section {
    /// Straight of `length` metres along the current heading.
    Straight { length: f64 },
    /// Arc of `radius` metres sweeping `angle_deg` degrees, positive to the left.
    Turn { radius: f64, angle_deg: f64 },
}

impl Section {
    pub fn length(&self) -> f64 {
        match *self {
            Section::Straight { length } => length,
            Section::Turn { radius, angle_deg } => radius * angle_deg.to_radians().abs(),
        }
    }
}

/// Ordered sections starting at the origin with a given heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackLayout {
    pub sections: Vec<Section>,
    /// Initial heading in radians, 0 = +x.
    pub start_heading: f64,
    /// Join the end of the last section back to the start with a straight.
    pub closed: bool,
}

impl TrackLayout {
    pub fn new(sections: Vec<Section>, closed: bool) -> Self {
        TrackLayout { sections, start_heading: 0.0, closed }
    }

    /// Closed oval: two straights joined by two 180 degree left turns.
    pub fn oval(straight: f64, radius: f64) -> Self {
        TrackLayout::new(
            vec![
                Section::Straight { length: straight },
                Section::Turn { radius, angle_deg: 180.0 },
                Section::Straight { length: straight },
                Section::Turn { radius, angle_deg: 180.0 },
            ],
            true,
        )
    }

    /// Sum of the section lengths, excluding any closing straight.
    pub fn section_length(&self) -> f64 {
        self.sections.iter().map(Section::length).sum()
    }

    /// Centreline points spaced roughly `spacing` metres apart, starting at the origin.
    ///
    /// For closed layouts the returned points do not repeat the start point.
    pub fn points(&self, spacing: f64) -> SimResult<Vec<Vector2<f64>>> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(SimError::NonPositiveStep(spacing));
        }

        let mut heading = self.start_heading;
        let mut points = vec![Vector2::new(0.0, 0.0)];

        for (i, section) in self.sections.iter().enumerate() {
            let here = points[points.len() - 1];
            match *section {
                Section::Straight { length } => {
                    if !(length.is_finite() && length > 0.0) {
                        return Err(SimError::InvalidTrackGeometry(format!(
                            "section {} has straight length {}",
                            i, length
                        )));
                    }
                    let divisions = divisions(length, spacing);
                    let delta = direction(heading) * (length / divisions as f64);
                    points.extend((1..=divisions).map(|k| here + delta * k as f64));
                }
                Section::Turn { radius, angle_deg } => {
                    if !(radius.is_finite() && radius > 0.0) {
                        return Err(SimError::InvalidTrackGeometry(format!("section {} has turn radius {}", i, radius)));
                    }
                    if !(angle_deg.is_finite() && angle_deg != 0.0) {
                        return Err(SimError::InvalidTrackGeometry(format!("section {} has turn angle {}", i, angle_deg)));
                    }
                    let sweep = angle_deg.to_radians();
                    let side = sweep.signum();
                    let divisions = divisions(radius * sweep.abs(), spacing);
                    let increment = sweep / divisions as f64;
                    let centre = here + left_normal(heading) * (radius * side);
                    for _ in 0..divisions {
                        heading += increment;
                        points.push(centre - left_normal(heading) * (radius * side));
                    }
                }
            }
        }

        if self.closed {
            let start = points[0];
            let end = points[points.len() - 1];
            let gap = (start - end).norm();
            if gap <= spacing * 1e-6 {
                points.pop();
            } else {
                let divisions = divisions(gap, spacing);
                let delta = (start - end) / divisions as f64;
                points.extend((1..divisions).map(|k| end + delta * k as f64));
            }
        }

        debug!(
            "generated {} points from {} layout sections ({:.3} m)",
            points.len(),
            self.sections.len(),
            self.section_length()
        );
        Ok(points)
    }

    /// Fit a [`TrackCurve`] through [`TrackLayout::points`].
    pub fn build_curve(&self, spacing: f64) -> SimResult<TrackCurve> {
        TrackCurve::new(&self.points(spacing)?, self.closed)
    }
}

fn divisions(length: f64, spacing: f64) -> usize {
    ((length / spacing).round() as usize).max(1)
}

fn direction(heading: f64) -> Vector2<f64> {
    Vector2::new(heading.cos(), heading.sin())
}

fn left_normal(heading: f64) -> Vector2<f64> {
    Vector2::new(-heading.sin(), heading.cos())
}
