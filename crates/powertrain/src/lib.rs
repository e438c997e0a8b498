pub mod torque_curve;
pub mod gearbox;

pub use torque_curve::TorqueCurve;
pub use gearbox::{GearSelection, PowertrainSpec};
