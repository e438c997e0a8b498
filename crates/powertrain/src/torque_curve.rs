use serde::{Deserialize, Serialize};
use simcore::{SimError, SimResult};

/// Engine torque (N*m) tabulated against engine speed (rpm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TorqueCurve {
    points: Vec<(f64, f64)>,
}

impl TorqueCurve {
    /// Build a curve from `(rpm, torque)` pairs, which must have strictly
    /// increasing rpm.
    pub fn new(points: Vec<(f64, f64)>) -> SimResult<Self> {
        let curve = TorqueCurve { points };
        curve.validate()?;
        Ok(curve)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.points.len() < 2 {
            return Err(SimError::InvalidPowertrainConfig(format!(
                "torque curve needs at least 2 points, got {}",
                self.points.len()
            )));
        }
        for (i, &(rpm, torque)) in self.points.iter().enumerate() {
            if !rpm.is_finite() || !torque.is_finite() {
                return Err(SimError::InvalidPowertrainConfig(format!("torque curve point {} is not finite", i)));
            }
            if torque < 0.0 {
                return Err(SimError::InvalidPowertrainConfig(format!(
                    "torque curve point {} has negative torque {}",
                    i, torque
                )));
            }
            if i > 0 && rpm <= self.points[i - 1].0 {
                return Err(SimError::InvalidPowertrainConfig(format!(
                    "torque curve rpm must strictly increase (point {} at {} rpm)",
                    i, rpm
                )));
            }
        }
        Ok(())
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn min_rpm(&self) -> f64 {
        self.points[0].0
    }

    pub fn max_rpm(&self) -> f64 {
        self.points[self.points.len() - 1].0
    }

    /// Piecewise-linear torque at `rpm`, held flat beyond either end of the table.
    pub fn torque_at(&self, rpm: f64) -> f64 {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if rpm <= first.0 {
            return first.1;
        }
        if rpm >= last.0 {
            return last.1;
        }
        let upper = self.points.partition_point(|&(r, _)| r <= rpm);
        let (r0, t0) = self.points[upper - 1];
        let (r1, t1) = self.points[upper];
        t0 + (rpm - r0) * (t1 - t0) / (r1 - r0)
    }

    /// `(rpm, torque)` point with the highest torque.
    pub fn peak_torque(&self) -> (f64, f64) {
        self.points
            .iter()
            .copied()
            .fold((self.min_rpm(), f64::NEG_INFINITY), |best, p| if p.1 > best.1 { p } else { best })
    }
}

impl Default for TorqueCurve {
    /// Single-cylinder formula car engine.
    fn default() -> Self {
        TorqueCurve {
            points: vec![
                (2500.0, 33.72),
                (3000.0, 30.26),
                (4000.0, 33.60),
                (5000.0, 32.59),
                (6000.0, 30.07),
                (7000.0, 30.59),
                (8000.0, 33.93),
                (9000.0, 32.75),
                (10000.0, 29.83),
            ],
        }
    }
}
