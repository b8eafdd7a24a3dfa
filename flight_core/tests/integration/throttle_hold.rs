//! Closed-loop vertical speed hold against the ballistic host.

use flight_common::prelude::{
    ArbitrationFlags, ControlOutput, FlightCoreConfig, TranslationCommand, TranslationMode,
};
use flight_core::cycle::FlightCore;
use flight_core::module::HostEvent;
use flight_core::modules::translatron::{TRANSLATRON, Translatron};
use flight_core::sim::BallisticHost;

fn climbing_core(target: f64) -> FlightCore {
    let mut translatron = Translatron::new();
    translatron.set_command(TranslationCommand::new(
        TranslationMode::KeepVertical,
        target,
        false,
    ));
    let mut core = FlightCore::new(FlightCoreConfig::default());
    core.register(Box::new(translatron)).unwrap();
    core.handle_host_event(HostEvent::Awake);
    core.set_enabled(TRANSLATRON, true).unwrap();
    core
}

#[test]
fn vertical_hold_climbs_without_overshoot() {
    let target = 20.0;
    let mut core = climbing_core(target);
    let mut host = BallisticHost::sample_rocket();

    let mut first_throttle = None;
    for _ in 0..750 {
        let mut output = ControlOutput::default();
        let report = core.on_part_fixed_update(host.telemetry(), &mut output);
        assert!(report.flags.contains(ArbitrationFlags::TRANSLATION_ACTIVE));
        assert!((0.0..=1.0).contains(&output.main_throttle));
        first_throttle.get_or_insert(output.main_throttle);
        host.step(&output);
    }

    // 20 m/s deficit over 30 m/s² of available acceleration.
    let first = first_throttle.unwrap();
    assert!((first - 2.0 / 3.0).abs() < 1e-9, "first throttle {first}");
    assert!(!host.is_landed());
    assert!(host.altitude() > 50.0);
    let vertical = core.vessel_state().speed_vertical.value();
    assert!(vertical > 0.0 && vertical < target + 2.0, "vertical speed {vertical}");
}

#[test]
fn disabling_translatron_hands_throttle_back() {
    let mut core = climbing_core(20.0);
    let host = BallisticHost::sample_rocket();

    let mut output = ControlOutput::default();
    core.on_part_fixed_update(host.telemetry(), &mut output);
    assert_eq!(core.translation().mode, TranslationMode::KeepVertical);

    core.set_enabled(TRANSLATRON, false).unwrap();
    assert_eq!(core.translation().mode, TranslationMode::Off);

    let mut output = ControlOutput {
        main_throttle: 0.4,
        ..ControlOutput::default()
    };
    let report = core.on_part_fixed_update(host.telemetry(), &mut output);
    assert!(!report.flags.contains(ArbitrationFlags::TRANSLATION_ACTIVE));
    assert_eq!(output.main_throttle, 0.4);
}
