use serde::{Deserialize, Serialize};

/// One resampled point of the track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub index: usize,
    /// Arclength from the start line (m), `index * step`.
    pub distance: f64,
    pub x: f64,
    pub y: f64,
    /// Local radius of curvature (m). Very large (or infinite) means straight.
    pub radius: f64,
}

/// What bounded the velocity of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepLimit {
    /// The standing start record.
    #[default]
    Start,
    /// Velocity followed from the longitudinal force (tire or engine bound).
    Traction,
    /// Velocity was clamped to the cornering speed limit.
    Cornering,
    /// Velocity was reduced retroactively to the gear-limited top speed.
    EngineSpeed,
}

/// Vehicle state at one sample of the lap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    pub index: usize,
    /// Distance from the start line (m).
    pub distance: f64,
    /// Elapsed time since the start (s).
    pub time: f64,
    /// Time spent on the step that ends at this sample (s).
    pub dt: f64,
    pub x: f64,
    pub y: f64,
    pub radius: f64,

    pub velocity: f64,
    pub longitudinal_acceleration: f64,
    pub lateral_acceleration: f64,

    // Engine context used for this step
    pub gear: usize,
    pub rpm: f64,
    pub engine_torque: f64,
    pub engine_force: f64,

    // Loads
    pub normal_force_front: f64,
    pub normal_force_rear: f64,
    pub drag_force: f64,
    pub downforce: f64,

    // Tire force budget
    pub lateral_force_used: f64,
    pub lateral_force_max: f64,
    pub longitudinal_force_used: f64,
    pub longitudinal_force_available: f64,
    /// Longitudinal tire capacity with no lateral demand.
    pub longitudinal_force_capacity: f64,

    pub limit: StepLimit,
}

impl VehicleState {
    /// Combined friction-ellipse utilisation, 0 (unused) to 1 (saturated).
    pub fn grip_utilisation(&self) -> f64 {
        let lat = ratio(self.lateral_force_used, self.lateral_force_max);
        let long = ratio(self.longitudinal_force_used, self.longitudinal_force_capacity);
        (lat * lat + long * long).sqrt()
    }
}

fn ratio(used: f64, max: f64) -> f64 {
    if max > 0.0 { used / max } else { 0.0 }
}
