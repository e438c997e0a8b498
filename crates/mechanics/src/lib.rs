pub mod friction;
pub mod tire;
pub mod vehicle;
pub mod dynamics;

pub use friction::FrictionModel;
pub use vehicle::{AeroExponent, DrivenAxle, VehicleSpec};
pub use dynamics::ForceBudget;
