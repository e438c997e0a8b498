use mechanics::VehicleSpec;
use powertrain::PowertrainSpec;
use serde::{Deserialize, Serialize};
use simcore::{SimError, SimResult};

use crate::integrator::LapSimulator;

/// Default arclength step between samples (m).
pub const DEFAULT_STEP: f64 = 0.1;

/// Everything needed to set up a run, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LapSimConfig {
    pub vehicle: VehicleSpec,
    pub powertrain: PowertrainSpec,
    /// Target sample spacing (m).
    pub step: f64,
}

impl Default for LapSimConfig {
    fn default() -> Self {
        LapSimConfig {
            vehicle: VehicleSpec::default(),
            powertrain: PowertrainSpec::default(),
            step: DEFAULT_STEP,
        }
    }
}

impl LapSimConfig {
    pub fn with_vehicle(mut self, vehicle: VehicleSpec) -> Self {
        self.vehicle = vehicle;
        self
    }

    pub fn with_powertrain(mut self, powertrain: PowertrainSpec) -> Self {
        self.powertrain = powertrain;
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Parse and validate a configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let config: LapSimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(SimError::NonPositiveStep(self.step));
        }
        self.vehicle.validate()?;
        self.powertrain.validate()
    }

    pub fn simulator(&self) -> SimResult<LapSimulator> {
        LapSimulator::new(self.vehicle.clone(), self.powertrain.clone())
    }
}
