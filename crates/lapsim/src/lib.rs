pub mod config;
pub mod integrator;

pub use config::LapSimConfig;
pub use integrator::LapSimulator;
