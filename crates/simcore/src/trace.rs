use serde::{Deserialize, Serialize};

use crate::diagnostics::ClampLog;
use crate::state::VehicleState;
use crate::GRAVITY;

/// Finalised record of one simulated lap, indexed by sample number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapTrace {
    records: Vec<VehicleState>,
    step: f64,
    closed: bool,
    clamps: ClampLog,
}

impl LapTrace {
    pub fn new(records: Vec<VehicleState>, step: f64, closed: bool, clamps: ClampLog) -> Self {
        LapTrace { records, step, closed, clamps }
    }

    pub fn records(&self) -> &[VehicleState] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&VehicleState> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distance between consecutive records (m).
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn clamps(&self) -> &ClampLog {
        &self.clamps
    }

    pub fn lap_time(&self) -> f64 {
        self.records.last().map_or(0.0, |r| r.time)
    }

    pub fn lap_length(&self) -> f64 {
        self.records.last().map_or(0.0, |r| r.distance)
    }

    pub fn summary(&self) -> LapSummary {
        LapSummary::from_records(&self.records)
    }

    /// Elapsed time when the vehicle passes `distance`, interpolated linearly
    /// between records. Distances outside the trace clamp to its ends.
    pub fn time_at_distance(&self, distance: f64) -> f64 {
        let (first, last) = match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if distance <= first.distance {
            return first.time;
        }
        if distance >= last.distance {
            return last.time;
        }
        let upper = self.records.partition_point(|r| r.distance < distance);
        let hi = &self.records[upper];
        let lo = &self.records[upper - 1];
        let span = hi.distance - lo.distance;
        if span <= 0.0 {
            return hi.time;
        }
        lo.time + (distance - lo.distance) / span * (hi.time - lo.time)
    }
}

/// Headline figures of a lap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LapSummary {
    /// Lap time (s).
    pub lap_time: f64,
    /// Lap length (m).
    pub lap_length: f64,
    /// Maximum velocity (m/s).
    pub max_velocity: f64,
    /// Maximum |lateral acceleration| (m/s^2).
    pub max_lateral_acceleration: f64,
    /// Maximum |longitudinal acceleration| (m/s^2).
    pub max_longitudinal_acceleration: f64,
}

impl LapSummary {
    pub fn from_records(records: &[VehicleState]) -> Self {
        records.iter().fold(LapSummary::default(), |acc, r| LapSummary {
            lap_time: r.time,
            lap_length: r.distance,
            max_velocity: acc.max_velocity.max(r.velocity),
            max_lateral_acceleration: acc.max_lateral_acceleration.max(r.lateral_acceleration.abs()),
            max_longitudinal_acceleration: acc
                .max_longitudinal_acceleration
                .max(r.longitudinal_acceleration.abs()),
        })
    }

    pub fn max_lateral_g(&self) -> f64 {
        self.max_lateral_acceleration / GRAVITY
    }

    pub fn max_longitudinal_g(&self) -> f64 {
        self.max_longitudinal_acceleration / GRAVITY
    }

    /// Mean speed over the lap (m/s).
    pub fn average_velocity(&self) -> f64 {
        if self.lap_time > 0.0 { self.lap_length / self.lap_time } else { 0.0 }
    }
}
