//! # Flight Core Simulator
//!
//! Runs the flight core against the built-in ballistic host: a small rocket
//! on the pad, held nose-up by `SmartAss` while `Translatron` climbs at a
//! fixed vertical speed. Halfway through, a console client takes the
//! attitude over, which makes `SmartAss` stand down.
//!
//! Global module settings are loaded before awake and written back on exit.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use flight_common::consts::DEFAULT_BASE_WINDOW_ID;
use flight_common::prelude::{
    ConfigLoader, ControlOutput, Direction, FlightCoreConfig, ModuleId, ReferenceFrame,
    TranslationCommand, TranslationMode,
};
use flight_core::cycle::FlightCore;
use flight_core::module::{HostEvent, PartEvent};
use flight_core::modules::readout::Readout;
use flight_core::modules::smart_ass::SmartAss;
use flight_core::modules::translatron::Translatron;
use flight_core::sim::BallisticHost;
use flight_core::ui::TextSurface;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const CONSOLE: ModuleId = ModuleId::new("Console");

/// Flight Core: module dispatch and control arbitration over a synthetic host
#[derive(Parser, Debug)]
#[command(name = "flight_core")]
#[command(version)]
#[command(about = "Runs the flight automation core against a ballistic test host")]
struct Args {
    /// Path to the core configuration TOML. Defaults apply when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of fixed updates to simulate.
    #[arg(long, default_value_t = 500)]
    ticks: u64,

    /// Global settings file (overrides `settings_path` from the config).
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Target climb rate for the vertical hold [m/s].
    #[arg(long, default_value_t = 30.0)]
    climb_rate: f64,

    /// Ticks between readout dumps (0 = never).
    #[arg(long, default_value_t = 100)]
    report_every: u64,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("Flight Core v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Flight Core shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            FlightCoreConfig::load(path)?
        }
        None => FlightCoreConfig::default(),
    };
    config.validate()?;
    info!(
        "Config OK: instance={}, attitude kp={}, throttle kp={}",
        config.shared.service_name, config.attitude.kp, config.throttle.kp
    );

    let settings_path = args
        .settings
        .clone()
        .unwrap_or_else(|| PathBuf::from(config.settings_path()));

    let mut core = FlightCore::new(config);
    core.load_settings_file(&settings_path)?;
    info!(
        "Loaded {} global settings from {}",
        core.settings().len(),
        settings_path.display()
    );

    let mut smart_ass = SmartAss::new();
    smart_ass.engage(ReferenceFrame::SurfaceNorth, Direction::Up);
    let mut translatron = Translatron::new();
    translatron.set_command(TranslationCommand::new(
        TranslationMode::KeepVertical,
        args.climb_rate,
        true,
    ));
    core.register(Box::new(smart_ass))?;
    core.register(Box::new(translatron))?;
    core.register(Box::new(Readout::new()))?;

    let mut host = BallisticHost::sample_rocket();
    for event in [
        HostEvent::Awake,
        HostEvent::Start,
        HostEvent::FlightStart,
        HostEvent::FlightStartAtLaunchpad,
    ] {
        core.handle_host_event(event);
    }

    for line in ["enable smartass", "enable translatron"] {
        if let Err(e) = core.execute_command(CONSOLE, line) {
            warn!("console '{line}': {e}");
        }
    }

    let mut console = core.external_client(CONSOLE);
    let handover = args.ticks / 2;
    let mut ui = TextSurface::new();
    let mut lifted_off = false;

    for _ in 0..args.ticks {
        if core.tick() == handover {
            if let Err(e) = console.submit_line("attitude surface_north forward") {
                warn!("console handover failed: {e}");
            }
        }

        let mut output = ControlOutput::default();
        let report = core.on_part_fixed_update(host.telemetry(), &mut output);
        host.step(&output);
        core.on_part_update();

        if !lifted_off && !host.is_landed() {
            lifted_off = true;
            core.handle_host_event(HostEvent::Liftoff);
        }

        debug!(
            tick = report.tick,
            flags = ?report.flags,
            throttle = report.output.main_throttle,
            "tick"
        );

        if args.report_every > 0 && report.tick % args.report_every == 0 {
            core.draw_gui(&mut ui, DEFAULT_BASE_WINDOW_ID);
            let owner = report.attitude_owner.map_or("none", ModuleId::name);
            info!(
                "tick {}: alt {:.1} m, v_vert {:.2} m/s, throttle {:.3}, attitude owner {owner}, translation {}",
                report.tick,
                host.altitude(),
                core.vessel_state().speed_vertical.value(),
                report.output.main_throttle,
                report.translation,
            );
            for line in ui.take_text().lines() {
                debug!("{line}");
            }
        }
    }

    let stats = core.stats();
    info!("Run complete: {stats}");
    if let Some(fault) = core.last_error() {
        warn!("Last error: {fault}");
    }

    core.handle_host_event(HostEvent::Part(PartEvent::Destroy));
    core.save_settings_file(&settings_path)?;
    info!("Settings saved to {}", settings_path.display());

    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
