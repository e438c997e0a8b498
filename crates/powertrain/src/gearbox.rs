use std::f64::consts::PI;

use log::debug;
use serde::{Deserialize, Serialize};
use simcore::{SimError, SimResult};

use crate::torque_curve::TorqueCurve;

/// Engine, gearbox and driven wheel of the vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowertrainSpec {
    /// Reduction ratio of each gear, first gear first.
    pub gear_ratios: Vec<f64>,
    pub final_drive: f64,
    /// Engine speed (rpm) at which the next gear is taken.
    pub upshift_rpm: f64,
    /// Rolling radius of the driven tire (m).
    pub tire_radius: f64,
    pub torque_curve: TorqueCurve,
}

/// Result of the gear search for one wheel speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GearSelection {
    /// Zero-based gear index.
    pub gear: usize,
    /// Engine speed (rpm), never above the top of the torque curve.
    pub rpm: f64,
    /// Engine torque (N*m) at `rpm`.
    pub torque: f64,
    /// The input velocity, or the top speed in `gear` when the engine would
    /// otherwise run past the end of its torque curve.
    pub capped_velocity: f64,
}

impl GearSelection {
    pub fn is_capped(&self, velocity: f64) -> bool {
        velocity > self.capped_velocity
    }
}

impl Default for PowertrainSpec {
    fn default() -> Self {
        PowertrainSpec {
            gear_ratios: vec![35.0 / 14.0, 30.0 / 15.0, 31.0 / 19.0, 28.0 / 21.0, 23.0 / 21.0],
            final_drive: 61.0 / 23.0 * 37.0 / 13.0,
            upshift_rpm: 9500.0,
            tire_radius: 0.22098,
            torque_curve: TorqueCurve::default(),
        }
    }
}

impl PowertrainSpec {
    pub fn new(
        gear_ratios: Vec<f64>,
        final_drive: f64,
        upshift_rpm: f64,
        tire_radius: f64,
        torque_curve: TorqueCurve,
    ) -> Self {
        PowertrainSpec { gear_ratios, final_drive, upshift_rpm, tire_radius, torque_curve }
    }

    pub fn with_gear_ratios(mut self, gear_ratios: Vec<f64>) -> Self {
        self.gear_ratios = gear_ratios;
        self
    }

    pub fn with_final_drive(mut self, final_drive: f64) -> Self {
        self.final_drive = final_drive;
        self
    }

    pub fn with_upshift_rpm(mut self, upshift_rpm: f64) -> Self {
        self.upshift_rpm = upshift_rpm;
        self
    }

    pub fn with_tire_radius(mut self, tire_radius: f64) -> Self {
        self.tire_radius = tire_radius;
        self
    }

    pub fn with_torque_curve(mut self, torque_curve: TorqueCurve) -> Self {
        self.torque_curve = torque_curve;
        self
    }

    /// Check the configuration once before simulating.
    pub fn validate(&self) -> SimResult<()> {
        if self.gear_ratios.is_empty() {
            return Err(SimError::InvalidPowertrainConfig("gear list is empty".to_string()));
        }
        if let Some(g) = self.gear_ratios.iter().position(|r| !(r.is_finite() && *r > 0.0)) {
            return Err(SimError::InvalidPowertrainConfig(format!(
                "gear {} has ratio {}",
                g + 1,
                self.gear_ratios[g]
            )));
        }
        if !(self.final_drive.is_finite() && self.final_drive > 0.0) {
            return Err(SimError::InvalidPowertrainConfig(format!("final drive ratio {}", self.final_drive)));
        }
        if !(self.tire_radius.is_finite() && self.tire_radius > 0.0) {
            return Err(SimError::InvalidPowertrainConfig(format!("tire radius {}", self.tire_radius)));
        }
        if !(self.upshift_rpm.is_finite() && self.upshift_rpm > 0.0) {
            return Err(SimError::InvalidPowertrainConfig(format!("upshift rpm {}", self.upshift_rpm)));
        }
        self.torque_curve.validate()?;
        if self.torque_curve.torque_at(0.0) <= 0.0 {
            return Err(SimError::InvalidPowertrainConfig(
                "torque curve gives no torque at standstill".to_string(),
            ));
        }
        if self.upshift_rpm > self.torque_curve.max_rpm() {
            debug!(
                "upshift at {} rpm lies past the torque curve end ({} rpm)",
                self.upshift_rpm,
                self.torque_curve.max_rpm()
            );
        }
        Ok(())
    }

    pub fn gear_count(&self) -> usize {
        self.gear_ratios.len()
    }

    /// Engine speed (rpm) when driving at `velocity` (m/s) in `gear`.
    pub fn rpm_at_velocity(&self, gear: usize, velocity: f64) -> f64 {
        velocity / (2.0 * PI * self.tire_radius) * 60.0 * self.final_drive * self.gear_ratios[gear]
    }

    /// Road speed (m/s) at engine speed `rpm` in `gear`.
    pub fn velocity_at_rpm(&self, gear: usize, rpm: f64) -> f64 {
        rpm * 2.0 * PI * self.tire_radius / (60.0 * self.final_drive * self.gear_ratios[gear])
    }

    /// Tractive force (N) at the tire contact patch for a gear selection.
    pub fn wheel_force(&self, selection: &GearSelection) -> f64 {
        selection.torque * self.final_drive * self.gear_ratios[selection.gear] / self.tire_radius
    }

    /// Gear-limited top speed (m/s): top of the torque curve in the last gear.
    pub fn top_speed(&self) -> f64 {
        self.velocity_at_rpm(self.gear_count() - 1, self.torque_curve.max_rpm())
    }

    /// Pick the lowest gear that does not yet call for an upshift, or the top
    /// gear if every gear does, and look up the engine torque there.
    ///
    /// Engine speed is capped at the end of the torque curve; when that cap
    /// bites, `capped_velocity` reports the matching road speed.
    pub fn select_gear_and_torque(&self, velocity: f64) -> GearSelection {
        let top = self.gear_count() - 1;
        let gear = (0..self.gear_count())
            .find(|&g| self.rpm_at_velocity(g, velocity) < self.upshift_rpm)
            .unwrap_or(top);

        let max_rpm = self.torque_curve.max_rpm();
        let rpm = self.rpm_at_velocity(gear, velocity);
        let (rpm, capped_velocity) = if rpm > max_rpm {
            (max_rpm, self.velocity_at_rpm(gear, max_rpm))
        } else {
            (rpm, velocity)
        };

        GearSelection { gear, rpm, torque: self.torque_curve.torque_at(rpm), capped_velocity }
    }
}
