pub mod error;
pub mod traits;
pub mod state;
pub mod trace;
pub mod diagnostics;

pub use error::{SimError, SimResult};
pub use traits::Centerline;
pub use state::{Sample, StepLimit, VehicleState};
pub use trace::{LapSummary, LapTrace};
pub use diagnostics::{ClampLog, NumericClamp};

/// Gravitational acceleration (m/s^2) used for static loads and G-normalised output.
pub const GRAVITY: f64 = 9.8;

/// Sea-level air density (kg/m^3).
pub const AIR_DENSITY: f64 = 1.2041;

/// Radius (m) reported for sections that are effectively straight.
///
/// Stays finite so cornering limits and lateral force requirements never
/// produce NaN downstream.
pub const STRAIGHT_RADIUS: f64 = 1.0e9;
