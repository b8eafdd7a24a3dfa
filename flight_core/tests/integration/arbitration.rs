//! Attitude claim sequences across ticks.

use flight_common::prelude::{
    ArbitrationFlags, AttitudeSetpoint, AttitudeTarget, ControlOutput, Direction, ModuleId, ReferenceFrame,
    TranslationMode,
};
use flight_core::control::attitude::attitude_error;
use flight_core::cycle::{FlightCore, TickReport};
use nalgebra::Vector3;

use super::{Log, Scripted, awake_core, entries, orbiting_telemetry, tick};

fn orbit_prograde() -> AttitudeSetpoint {
    AttitudeSetpoint::new(ReferenceFrame::Orbit, Direction::Forward.into())
}

fn surface_north() -> AttitudeSetpoint {
    AttitudeSetpoint::new(ReferenceFrame::SurfaceNorth, Direction::Forward.into())
}

fn orbit_tick(core: &mut FlightCore) -> TickReport {
    let mut output = ControlOutput::default();
    core.on_part_fixed_update(&orbiting_telemetry(), &mut output)
}

/// Torque points the same way as the current orientation error.
fn assert_drives_toward(core: &FlightCore, report: &TickReport, setpoint: AttitudeSetpoint) {
    assert!(!report.flags.contains(ArbitrationFlags::ATTITUDE_DEGENERATE));
    let error = attitude_error(core.vessel_state(), &setpoint).unwrap();
    assert!(error.norm() > 0.1, "no error to correct");
    let torque = report.output.torque();
    assert!(torque.dot(&error) > 0.0, "torque {torque:?} against error {error:?}");
}

#[test]
fn two_modules_hand_over_attitude() {
    let log = Log::default();
    let a = Scripted::new("A", &log).claim_at(1, orbit_prograde());
    let b = Scripted::new("B", &log).claim_at(2, surface_north());
    let a_changes = a.changes.clone();
    let b_changes = b.changes.clone();
    let mut core = awake_core(vec![a, b], &log);
    core.set_enabled(ModuleId::new("A"), true).unwrap();
    core.set_enabled(ModuleId::new("B"), true).unwrap();

    let first = orbit_tick(&mut core);
    assert_eq!(first.attitude_owner, Some(ModuleId::new("A")));
    assert!(first.flags.contains(ArbitrationFlags::ATTITUDE_ACTIVE));
    assert_drives_toward(&core, &first, orbit_prograde());
    assert_eq!(a_changes.borrow().len(), 1);
    assert_eq!(b_changes.borrow().len(), 1);
    assert_eq!(a_changes.borrow()[0].old_owner, None);

    let second = orbit_tick(&mut core);
    assert_eq!(second.attitude_owner, Some(ModuleId::new("B")));
    assert_drives_toward(&core, &second, surface_north());
    assert_eq!(a_changes.borrow().len(), 2);
    assert_eq!(b_changes.borrow().len(), 2);

    let handover = b_changes.borrow()[1];
    assert_eq!(a_changes.borrow()[1], handover);
    assert_eq!(handover.old_owner, Some(ModuleId::new("A")));
    assert_eq!(handover.old, Some(orbit_prograde()));
    assert_eq!(handover.new_owner, ModuleId::new("B"));
    assert_eq!(handover.new, surface_north());
    assert!(handover.preempted(ModuleId::new("A")));

    // Nobody claims on tick 3: no further notifications, claim persists.
    let third = orbit_tick(&mut core);
    assert_eq!(third.attitude_owner, Some(ModuleId::new("B")));
    assert_eq!(a_changes.borrow().len(), 2);
    assert_eq!(entries(&log, "attitude_change").len(), 4);
}

#[test]
fn disabled_modules_are_still_notified() {
    let log = Log::default();
    let a = Scripted::new("A", &log).claim_at(1, orbit_prograde());
    let b = Scripted::new("B", &log);
    let b_changes = b.changes.clone();
    let mut core = awake_core(vec![a, b], &log);
    core.set_enabled(ModuleId::new("A"), true).unwrap();

    tick(&mut core);
    assert!(!core.is_enabled(ModuleId::new("B")));
    assert_eq!(b_changes.borrow().len(), 1);
}

#[test]
fn repeated_identical_claims_notify_once() {
    let log = Log::default();
    let a = Scripted::new("A", &log)
        .claim_at(1, orbit_prograde())
        .claim_at(2, orbit_prograde())
        .claim_at(3, orbit_prograde());
    let changes = a.changes.clone();
    let mut core = awake_core(vec![a], &log);
    core.set_enabled(ModuleId::new("A"), true).unwrap();

    for _ in 0..3 {
        tick(&mut core);
    }
    assert_eq!(changes.borrow().len(), 1);
}

#[test]
fn repeated_nan_claims_from_outside_notify_once() {
    let log = Log::default();
    let a = Scripted::new("A", &log);
    let changes = a.changes.clone();
    let mut core = awake_core(vec![a], &log);
    let console = ModuleId::new("Console");
    let degenerate = AttitudeTarget::Direction(Vector3::new(f64::NAN, 0.0, 1.0));

    for _ in 0..3 {
        core.claim_attitude(console, ReferenceFrame::Inertial, degenerate);
    }
    assert_eq!(changes.borrow().len(), 1);

    let report = tick(&mut core);
    assert!(report.flags.contains(ArbitrationFlags::ATTITUDE_DEGENERATE));
    assert_eq!(report.output.torque(), Vector3::zeros());
}

#[test]
fn release_is_owner_checked() {
    let log = Log::default();
    let mut a = Scripted::new("A", &log).claim_at(1, orbit_prograde());
    a.release_at = Some(3);
    let mut b = Scripted::new("B", &log);
    b.release_at = Some(2);
    let mut core = awake_core(vec![a, b], &log);
    core.set_enabled(ModuleId::new("A"), true).unwrap();
    core.set_enabled(ModuleId::new("B"), true).unwrap();

    tick(&mut core);
    tick(&mut core);
    assert_eq!(core.attitude_owner(), Some(ModuleId::new("A")));
    tick(&mut core);
    assert_eq!(core.attitude_owner(), None);

    let report = tick(&mut core);
    assert!(!report.flags.contains(ArbitrationFlags::ATTITUDE_ACTIVE));
}

#[test]
fn translation_register_is_last_write_wins() {
    let log = Log::default();
    let mut core = awake_core(vec![Scripted::new("A", &log)], &log);

    core.set_translation(TranslationMode::KeepOrbital, 100.0, false);
    core.set_translation(TranslationMode::KeepVertical, 5.0, true);
    let report = tick(&mut core);
    assert_eq!(report.translation, TranslationMode::KeepVertical);
    assert!(report.flags.contains(ArbitrationFlags::TRANSLATION_ACTIVE));
    assert!(report.flags.contains(ArbitrationFlags::LATERAL_KILL));

    // Independent of the attitude channel.
    assert_eq!(report.attitude_owner, None);
}
