use log::trace;
use serde::{Deserialize, Serialize};

/// Numeric edge cases that are corrected in place instead of failing the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericClamp {
    /// Law-of-cosines ratio overshot [-1, 1] through rounding.
    CosineOvershoot,
    /// Three curvature points were (nearly) collinear; the straight radius cap was used.
    CollinearTriple,
    /// Acceleration too small (or the kinematic root missing) for the quadratic
    /// time-step; the average-velocity form was used.
    AverageVelocityStep,
}

/// Running count of [`NumericClamp`] events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClampLog {
    pub cosine_overshoot: usize,
    pub collinear_triple: usize,
    pub average_velocity_step: usize,
}

impl ClampLog {
    pub fn record(&mut self, clamp: NumericClamp, index: usize) {
        trace!("numeric clamp {:?} at sample {}", clamp, index);
        match clamp {
            NumericClamp::CosineOvershoot => self.cosine_overshoot += 1,
            NumericClamp::CollinearTriple => self.collinear_triple += 1,
            NumericClamp::AverageVelocityStep => self.average_velocity_step += 1,
        }
    }

    pub fn merge(&mut self, other: &ClampLog) {
        self.cosine_overshoot += other.cosine_overshoot;
        self.collinear_triple += other.collinear_triple;
        self.average_velocity_step += other.average_velocity_step;
    }

    pub fn total(&self) -> usize {
        self.cosine_overshoot + self.collinear_triple + self.average_velocity_step
    }
}
