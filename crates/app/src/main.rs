use std::env;
use std::fs::{self, File};
use std::io::Write;

use lapsim::LapSimConfig;
use log::{info, warn, LevelFilter};
use simcore::LapTrace;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use track::{SampledTrack, Section, TrackLayout};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    TermLogger::init(LevelFilter::Info, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;

    // Optional JSON config as the first argument, default car otherwise
    let config = match env::args().nth(1) {
        Some(path) => LapSimConfig::from_json_str(&fs::read_to_string(path)?)?,
        None => LapSimConfig::default(),
    };
    let sim = config.simulator()?;
    let (peak_rpm, peak_torque) = sim.powertrain().torque_curve.peak_torque();
    info!(
        "{} kg car, peak torque {:.2} N*m at {:.0} rpm, top speed {:.2} m/s",
        sim.vehicle().mass,
        peak_torque,
        peak_rpm,
        sim.powertrain().top_speed()
    );

    // Closed rectangle with four corners of different radius
    let layout = TrackLayout::new(
        vec![
            Section::Straight { length: 80.0 },
            Section::Turn { radius: 20.0, angle_deg: 90.0 },
            Section::Straight { length: 40.0 },
            Section::Turn { radius: 9.0, angle_deg: 90.0 },
            Section::Straight { length: 88.0 },
            Section::Turn { radius: 15.0, angle_deg: 90.0 },
            Section::Straight { length: 42.0 },
            Section::Turn { radius: 12.0, angle_deg: 90.0 },
        ],
        true,
    );
    let curve = layout.build_curve(1.0)?;
    let track = SampledTrack::from_centerline(&curve, config.step)?;

    let lap = sim.simulate(&track);
    report("lap", &lap);
    if lap.clamps().total() > 0 {
        warn!("{:?}", lap.clamps());
    }

    let accel = sim.accelerate(75.0, config.step)?;
    report("75 m acceleration", &accel);

    let mut csv = File::create("lap_trace.csv")?;
    writeln!(csv, "distance,time,x,y,radius,velocity,long_accel,lat_accel,gear,rpm,limit")?;
    for r in lap.records() {
        writeln!(
            csv,
            "{},{},{},{},{},{},{},{},{},{},{:?}",
            r.distance,
            r.time,
            r.x,
            r.y,
            r.radius,
            r.velocity,
            r.longitudinal_acceleration,
            r.lateral_acceleration,
            r.gear + 1,
            r.rpm,
            r.limit
        )?;
    }
    info!("wrote {} records to lap_trace.csv", lap.len());

    Ok(())
}

fn report(name: &str, trace: &LapTrace) {
    let summary = trace.summary();
    info!(
        "{}: {:.3} s over {:.1} m, top speed {:.2} m/s (avg {:.2} m/s), peak {:.2} G lateral, {:.2} G longitudinal",
        name,
        summary.lap_time,
        summary.lap_length,
        summary.max_velocity,
        summary.average_velocity(),
        summary.max_lateral_g(),
        summary.max_longitudinal_g()
    );
}
