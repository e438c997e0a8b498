use log::{debug, trace};
use mechanics::{ForceBudget, VehicleSpec};
use powertrain::PowertrainSpec;
use simcore::{ClampLog, LapTrace, NumericClamp, Sample, SimResult, StepLimit, VehicleState};
use track::SampledTrack;

/// Accelerations below this magnitude (m/s^2) use the average-velocity step.
const ACCEL_EPSILON: f64 = 1e-9;

/// Quasi-steady-state point-mass lap simulator.
///
/// Each step first revisits the previous record and pulls its velocity back
/// to the engine's top speed in gear if it overshot, then advances one
/// sample using the force budget at the (corrected) previous velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct LapSimulator {
    vehicle: VehicleSpec,
    powertrain: PowertrainSpec,
}

impl LapSimulator {
    pub fn new(vehicle: VehicleSpec, powertrain: PowertrainSpec) -> SimResult<Self> {
        vehicle.validate()?;
        powertrain.validate()?;
        Ok(LapSimulator { vehicle, powertrain })
    }

    pub fn vehicle(&self) -> &VehicleSpec {
        &self.vehicle
    }

    pub fn powertrain(&self) -> &PowertrainSpec {
        &self.powertrain
    }

    /// Drive one lap of `track` from a standing start.
    ///
    /// The trace holds N + 1 records, the last one closing the lap at the
    /// track length.
    pub fn simulate(&self, track: &SampledTrack) -> LapTrace {
        let steps = track.steps();
        let step = track.step();
        let mut clamps = *track.clamps();

        let mut records = Vec::with_capacity(steps + 1);
        records.push(self.launch(track.sample(0)));

        for i in 1..=steps {
            self.limit_engine_speed(&mut records, i - 1, step);
            let next = self.advance(&records[i - 1], track, i, &mut clamps);
            records.push(next);
        }
        self.limit_engine_speed(&mut records, steps, step);

        let trace = LapTrace::new(records, step, track.is_closed(), clamps);
        debug!(
            "simulated {:.3} m in {} steps: {:.3} s ({} numeric clamps)",
            trace.lap_length(),
            steps,
            trace.lap_time(),
            trace.clamps().total()
        );
        trace
    }

    /// Standing-start acceleration run over `distance` metres of straight.
    pub fn accelerate(&self, distance: f64, step: f64) -> SimResult<LapTrace> {
        let track = SampledTrack::straight(distance, step)?;
        Ok(self.simulate(&track))
    }

    fn launch(&self, sample: &Sample) -> VehicleState {
        let budget = ForceBudget::evaluate(&self.vehicle, &self.powertrain, 0.0, sample.radius);
        VehicleState { limit: StepLimit::Start, ..self.record(0, 0.0, sample, &budget) }
    }

    /// Tentative record `index`, advanced from `prev` over one step.
    fn advance(&self, prev: &VehicleState, track: &SampledTrack, index: usize, clamps: &mut ClampLog) -> VehicleState {
        let step = track.step();
        let sample = track.sample(index);
        let budget = ForceBudget::evaluate(&self.vehicle, &self.powertrain, prev.velocity, sample.radius);

        let candidate = (prev.velocity * prev.velocity + 2.0 * budget.acceleration * step).max(0.0).sqrt();
        let (velocity, acceleration, dt, limit) = if candidate > budget.corner_velocity {
            let velocity = budget.corner_velocity;
            (velocity, 0.0, average_velocity_step(prev.velocity, velocity, step), StepLimit::Cornering)
        } else {
            let dt = kinematic_step(prev.velocity, budget.acceleration, step).unwrap_or_else(|| {
                clamps.record(NumericClamp::AverageVelocityStep, index);
                average_velocity_step(prev.velocity, candidate, step)
            });
            (candidate, budget.acceleration, dt, StepLimit::Traction)
        };

        VehicleState {
            time: prev.time + dt,
            dt,
            velocity,
            longitudinal_acceleration: acceleration,
            limit,
            ..self.record(index, index as f64 * step, sample, &budget)
        }
    }

    /// Pull record `index` back to the top speed of its gear if the engine
    /// would otherwise run past the end of its torque curve.
    fn limit_engine_speed(&self, records: &mut [VehicleState], index: usize, step: f64) {
        if index == 0 {
            return;
        }
        let (done, rest) = records.split_at_mut(index);
        let prev = &done[index - 1];
        let state = &mut rest[0];

        let selection = self.powertrain.select_gear_and_torque(state.velocity);
        if !selection.is_capped(state.velocity) {
            return;
        }
        trace!(
            "record {}: {:.3} m/s capped to {:.3} m/s in gear {}",
            index,
            state.velocity,
            selection.capped_velocity,
            selection.gear + 1
        );
        state.velocity = selection.capped_velocity;
        state.longitudinal_acceleration = 0.0;
        state.dt = average_velocity_step(prev.velocity, state.velocity, step);
        state.time = prev.time + state.dt;
        state.limit = StepLimit::EngineSpeed;
    }

    /// Record fields that come straight from the force budget.
    fn record(&self, index: usize, distance: f64, sample: &Sample, budget: &ForceBudget) -> VehicleState {
        VehicleState {
            index,
            distance,
            x: sample.x,
            y: sample.y,
            radius: sample.radius,
            lateral_acceleration: budget.lateral_used / self.vehicle.mass,
            gear: budget.selection.gear,
            rpm: budget.selection.rpm,
            engine_torque: budget.selection.torque,
            engine_force: budget.engine_force,
            normal_force_front: budget.normal_front,
            normal_force_rear: budget.normal_rear,
            drag_force: budget.drag,
            downforce: budget.downforce,
            lateral_force_used: budget.lateral_used,
            lateral_force_max: budget.lateral_max,
            longitudinal_force_used: budget.longitudinal_used,
            longitudinal_force_available: budget.longitudinal_available,
            longitudinal_force_capacity: budget.longitudinal_capacity,
            ..VehicleState::default()
        }
    }
}

/// Positive root of `a/2 dt^2 + v dt - step = 0`, or `None` when the
/// acceleration is negligible or the step is never reached.
fn kinematic_step(velocity: f64, acceleration: f64, step: f64) -> Option<f64> {
    if acceleration.abs() < ACCEL_EPSILON {
        return None;
    }
    let discriminant = velocity * velocity + 2.0 * acceleration * step;
    if discriminant < 0.0 {
        return None;
    }
    // Rationalised root, stable for small accelerations
    Some(2.0 * step / (velocity + discriminant.sqrt()))
}

fn average_velocity_step(from: f64, to: f64, step: f64) -> f64 {
    step / (0.5 * (from + to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kinematic_step_matches_quadratic_root() {
        let (v, a, ds) = (12.0, 3.5, 0.5);
        let dt = kinematic_step(v, a, ds).unwrap();
        assert_relative_eq!(0.5 * a * dt * dt + v * dt, ds, max_relative = 1e-12);

        let dt = kinematic_step(0.0, 4.0, 2.0).unwrap();
        assert_relative_eq!(dt, 1.0, max_relative = 1e-12);

        let dt = kinematic_step(10.0, -2.0, 1.0).unwrap();
        assert_relative_eq!(0.5 * -2.0 * dt * dt + 10.0 * dt, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_kinematic_step_fallbacks() {
        assert_eq!(kinematic_step(10.0, 0.0, 1.0), None);
        assert_eq!(kinematic_step(10.0, 1e-12, 1.0), None);
        // Decelerates to a stop before covering the step
        assert_eq!(kinematic_step(1.0, -10.0, 1.0), None);
        assert_relative_eq!(average_velocity_step(8.0, 12.0, 1.0), 0.1, max_relative = 1e-12);
    }

    #[test]
    fn test_launch_record() {
        let sim = LapSimulator::new(VehicleSpec::default(), PowertrainSpec::default()).unwrap();
        let trace = sim.accelerate(20.0, 0.5).unwrap();
        let first = &trace.records()[0];
        assert_eq!(first.velocity, 0.0);
        assert_eq!(first.time, 0.0);
        assert_eq!(first.distance, 0.0);
        assert_eq!(first.limit, StepLimit::Start);
        assert_eq!(first.gear, 0);
    }

    #[test]
    fn test_engine_speed_correction_only_slows() {
        // A single short gear tops out quickly and forces corrections
        let powertrain = PowertrainSpec::default().with_gear_ratios(vec![35.0 / 14.0]);
        let sim = LapSimulator::new(VehicleSpec::default(), powertrain.clone()).unwrap();
        let trace = sim.accelerate(150.0, 0.5).unwrap();
        let top = powertrain.top_speed();

        let corrected: Vec<&VehicleState> =
            trace.records().iter().filter(|r| r.limit == StepLimit::EngineSpeed).collect();
        assert!(!corrected.is_empty());
        for r in &corrected {
            assert_relative_eq!(r.velocity, top, max_relative = 1e-12);
            assert_eq!(r.longitudinal_acceleration, 0.0);
        }
        for r in trace.records() {
            assert!(r.velocity <= top * (1.0 + 1e-12));
        }
        for pair in trace.records().windows(2) {
            assert!(pair[1].time > pair[0].time);
            assert_relative_eq!(pair[1].dt, pair[1].time - pair[0].time, max_relative = 1e-9);
        }
    }
}
