use log::debug;
use serde::{Deserialize, Serialize};
use simcore::{SimError, SimResult, AIR_DENSITY, GRAVITY};

use crate::friction::FrictionModel;

/// Power of velocity that aerodynamic forces scale with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AeroExponent {
    /// Force proportional to v. Reproduces older tuned setups.
    Linear,
    /// Force proportional to v^2.
    #[default]
    Quadratic,
}

impl AeroExponent {
    pub fn apply(self, velocity: f64) -> f64 {
        match self {
            AeroExponent::Linear => velocity,
            AeroExponent::Quadratic => velocity * velocity,
        }
    }
}

/// Which axle's normal load limits tractive force.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrivenAxle {
    #[default]
    Rear,
    /// Traction limited by the total normal load.
    All,
}

/// Point-mass vehicle parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleSpec {
    /// Mass including driver (kg).
    pub mass: f64,
    pub drag_coefficient: f64,
    /// Downforce coefficient; positive pushes the car onto the road.
    pub lift_coefficient: f64,
    /// Frontal area (m^2).
    pub frontal_area: f64,
    /// Share of the static weight on the front axle, 0..=1.
    pub front_weight_fraction: f64,
    /// Share of the downforce acting on the front axle, 0..=1.
    pub downforce_front_fraction: f64,
    pub mu_lateral: FrictionModel,
    pub mu_longitudinal: FrictionModel,
    /// Air density (kg/m^3).
    pub air_density: f64,
    pub aero_exponent: AeroExponent,
    pub driven_axle: DrivenAxle,
}

impl Default for VehicleSpec {
    /// Formula student car with driver.
    fn default() -> Self {
        VehicleSpec {
            mass: 190.0 + 69.0,
            drag_coefficient: 0.436,
            lift_coefficient: 1.07,
            frontal_area: 3.84,
            front_weight_fraction: 0.45,
            downforce_front_fraction: 0.45,
            mu_lateral: FrictionModel::constant(1.8),
            mu_longitudinal: FrictionModel::constant(1.3),
            air_density: AIR_DENSITY,
            aero_exponent: AeroExponent::Quadratic,
            driven_axle: DrivenAxle::Rear,
        }
    }
}

impl VehicleSpec {
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Set drag and downforce coefficients
    pub fn with_aero(mut self, drag_coefficient: f64, lift_coefficient: f64, frontal_area: f64) -> Self {
        self.drag_coefficient = drag_coefficient;
        self.lift_coefficient = lift_coefficient;
        self.frontal_area = frontal_area;
        self
    }

    pub fn with_aero_exponent(mut self, exponent: AeroExponent) -> Self {
        self.aero_exponent = exponent;
        self
    }

    pub fn with_weight_distribution(mut self, front_weight_fraction: f64, downforce_front_fraction: f64) -> Self {
        self.front_weight_fraction = front_weight_fraction;
        self.downforce_front_fraction = downforce_front_fraction;
        self
    }

    pub fn with_friction(mut self, mu_lateral: FrictionModel, mu_longitudinal: FrictionModel) -> Self {
        self.mu_lateral = mu_lateral;
        self.mu_longitudinal = mu_longitudinal;
        self
    }

    pub fn with_driven_axle(mut self, axle: DrivenAxle) -> Self {
        self.driven_axle = axle;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        let invalid = |what: &str, value: f64| -> SimResult<()> {
            Err(SimError::InvalidVehicleConfig(format!("{} {}", what, value)))
        };

        if !(self.mass.is_finite() && self.mass > 0.0) {
            return invalid("mass", self.mass);
        }
        if !(self.frontal_area.is_finite() && self.frontal_area >= 0.0) {
            return invalid("frontal area", self.frontal_area);
        }
        if !self.drag_coefficient.is_finite() {
            return invalid("drag coefficient", self.drag_coefficient);
        }
        if !self.lift_coefficient.is_finite() {
            return invalid("lift coefficient", self.lift_coefficient);
        }
        if !(self.air_density.is_finite() && self.air_density >= 0.0) {
            return invalid("air density", self.air_density);
        }
        if !(0.0..=1.0).contains(&self.front_weight_fraction) {
            return invalid("front weight fraction", self.front_weight_fraction);
        }
        if !(0.0..=1.0).contains(&self.downforce_front_fraction) {
            return invalid("downforce front fraction", self.downforce_front_fraction);
        }
        if !self.mu_lateral.is_finite() || self.mu_lateral.coefficient(self.weight()) <= 0.0 {
            return Err(SimError::InvalidVehicleConfig(format!(
                "lateral friction must be positive at static load, got {:?}",
                self.mu_lateral
            )));
        }
        let driven = self.static_driven_load();
        if !self.mu_longitudinal.is_finite() || self.mu_longitudinal.coefficient(driven) <= 0.0 || driven <= 0.0 {
            return Err(SimError::InvalidVehicleConfig(format!(
                "longitudinal friction must be positive on the driven axle, got {:?} at {} N",
                self.mu_longitudinal, driven
            )));
        }
        debug!(
            "vehicle {} kg, CdA {:.3} m^2, ClA {:.3} m^2, {:?} drive",
            self.mass,
            self.drag_coefficient * self.frontal_area,
            self.lift_coefficient * self.frontal_area,
            self.driven_axle
        );
        Ok(())
    }

    /// Static weight (N).
    pub fn weight(&self) -> f64 {
        self.mass * GRAVITY
    }

    /// Aerodynamic drag (N) at `velocity`.
    pub fn drag(&self, velocity: f64) -> f64 {
        0.5 * self.air_density * self.frontal_area * self.drag_coefficient * self.aero_exponent.apply(velocity)
    }

    /// Aerodynamic downforce (N) at `velocity`.
    pub fn downforce(&self, velocity: f64) -> f64 {
        0.5 * self.air_density * self.frontal_area * self.lift_coefficient * self.aero_exponent.apply(velocity)
    }

    /// Front and rear axle normal loads (N) for a given downforce.
    pub fn axle_loads(&self, downforce: f64) -> (f64, f64) {
        let weight = self.weight();
        let front = weight * self.front_weight_fraction + downforce * self.downforce_front_fraction;
        let rear = weight * (1.0 - self.front_weight_fraction) + downforce * (1.0 - self.downforce_front_fraction);
        (front.max(0.0), rear.max(0.0))
    }

    /// Normal load on the driven axle (N) given the axle loads.
    pub fn driven_load(&self, front: f64, rear: f64) -> f64 {
        match self.driven_axle {
            DrivenAxle::Rear => rear,
            DrivenAxle::All => front + rear,
        }
    }

    fn static_driven_load(&self) -> f64 {
        let (front, rear) = self.axle_loads(0.0);
        self.driven_load(front, rear)
    }
}
