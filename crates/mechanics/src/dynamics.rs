use powertrain::{GearSelection, PowertrainSpec};
use serde::{Deserialize, Serialize};

use crate::tire::{ellipse_utilisation, remaining_longitudinal_capacity};
use crate::vehicle::VehicleSpec;

/// Quasi-steady force balance of the point mass at one velocity and radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceBudget {
    pub selection: GearSelection,

    pub drag: f64,
    pub downforce: f64,
    pub normal_front: f64,
    pub normal_rear: f64,

    /// Lateral force needed to hold the radius at this velocity.
    pub lateral_required: f64,
    /// Lateral grip limit of all four tires.
    pub lateral_max: f64,
    pub lateral_used: f64,
    /// Fastest speed the radius allows with the current lateral grip.
    pub corner_velocity: f64,

    /// Driven-axle longitudinal grip with no cornering load.
    pub longitudinal_capacity: f64,
    /// Longitudinal grip left after cornering.
    pub longitudinal_available: f64,
    /// Tractive force the engine can deliver in the selected gear.
    pub engine_force: f64,
    pub longitudinal_used: f64,

    /// Net longitudinal force after drag.
    pub net_force: f64,
    pub acceleration: f64,
}

impl ForceBudget {
    /// Evaluate the force budget at `velocity` (m/s) on a section of radius
    /// `radius` (m, infinite for a straight).
    pub fn evaluate(vehicle: &VehicleSpec, powertrain: &PowertrainSpec, velocity: f64, radius: f64) -> Self {
        let selection = powertrain.select_gear_and_torque(velocity);

        // Aero and loads
        let drag = vehicle.drag(velocity);
        let downforce = vehicle.downforce(velocity);
        let (normal_front, normal_rear) = vehicle.axle_loads(downforce);
        let normal_total = normal_front + normal_rear;

        // Cornering
        let lateral_required = if radius.is_infinite() { 0.0 } else { vehicle.mass * velocity * velocity / radius };
        let lateral_max = vehicle.mu_lateral.force_limit(normal_total);
        let lateral_used = lateral_required.min(lateral_max);
        let corner_velocity = (lateral_max / vehicle.mass * radius).sqrt();

        // Friction ellipse on the driven axle
        let driven_load = vehicle.driven_load(normal_front, normal_rear);
        let longitudinal_capacity = vehicle.mu_longitudinal.force_limit(driven_load);
        let longitudinal_available = remaining_longitudinal_capacity(lateral_used, lateral_max, longitudinal_capacity);

        let engine_force = powertrain.wheel_force(&selection);
        let longitudinal_used = longitudinal_available.min(engine_force);
        let net_force = longitudinal_used - drag;

        ForceBudget {
            selection,
            drag,
            downforce,
            normal_front,
            normal_rear,
            lateral_required,
            lateral_max,
            lateral_used,
            corner_velocity,
            longitudinal_capacity,
            longitudinal_available,
            engine_force,
            longitudinal_used,
            net_force,
            acceleration: net_force / vehicle.mass,
        }
    }

    pub fn normal_total(&self) -> f64 {
        self.normal_front + self.normal_rear
    }

    /// Whether the engine, rather than tire grip, bounds the tractive force.
    pub fn is_engine_limited(&self) -> bool {
        self.engine_force < self.longitudinal_available
    }

    /// Combined grip utilisation of the used forces, at most 1.
    pub fn utilisation(&self) -> f64 {
        ellipse_utilisation(self.longitudinal_used, self.lateral_used, self.longitudinal_capacity, self.lateral_max)
    }
}
