use serde::{Deserialize, Serialize};

/// Tire friction coefficient as a function of normal load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FrictionModel {
    /// Same coefficient at every load
    Constant {
        mu: f64,
    },
    /// Linear load sensitivity around a reference load
    LoadSensitive {
        /// Coefficient at `reference_load`
        nominal: f64,
        /// Normal load (N) where the coefficient equals `nominal`
        reference_load: f64,
        /// Change in coefficient per newton of extra load (usually negative)
        sensitivity: f64,
    },
}

impl Default for FrictionModel {
    fn default() -> Self {
        FrictionModel::Constant { mu: 1.0 }
    }
}

impl FrictionModel {
    pub fn constant(mu: f64) -> Self {
        FrictionModel::Constant { mu }
    }

    /// Coefficient of friction at `normal_load` (N). Never negative.
    pub fn coefficient(&self, normal_load: f64) -> f64 {
        match *self {
            FrictionModel::Constant { mu } => mu,
            FrictionModel::LoadSensitive { nominal, reference_load, sensitivity } => {
                (nominal + sensitivity * (normal_load - reference_load)).max(0.0)
            }
        }
    }

    /// Friction force limit (N) at `normal_load`.
    pub fn force_limit(&self, normal_load: f64) -> f64 {
        normal_load.max(0.0) * self.coefficient(normal_load)
    }

    pub fn is_finite(&self) -> bool {
        match *self {
            FrictionModel::Constant { mu } => mu.is_finite(),
            FrictionModel::LoadSensitive { nominal, reference_load, sensitivity } => {
                nominal.is_finite() && reference_load.is_finite() && sensitivity.is_finite()
            }
        }
    }
}
