//! A misbehaving module never stops the rest of the dispatch.

use flight_common::prelude::{ArbitrationFlags, ModuleError, ModuleId};

use super::{Log, Scripted, awake_core, entries, tick};

#[test]
fn panicking_module_is_contained() {
    let log = Log::default();
    let mut first = Scripted::new("First", &log);
    first.panic_at = Some(2);
    let mut core = awake_core(vec![first, Scripted::new("Second", &log)], &log);

    tick(&mut core);
    let report = tick(&mut core);

    assert_eq!(report.faults, 1);
    assert!(report.flags.contains(ArbitrationFlags::HOOK_FAULT));
    assert_eq!(
        entries(&log, "fixed_update"),
        ["First:fixed_update", "Second:fixed_update", "Second:fixed_update"]
    );

    let fault = core.last_error().unwrap();
    assert_eq!(fault.source, ModuleId::new("First"));
    assert_eq!(fault.tick, 2);
    assert!(fault.message.contains("First blew up"));

    // The module keeps being dispatched afterwards.
    let report = tick(&mut core);
    assert_eq!(report.faults, 0);
    assert_eq!(core.stats().hook_faults, 1);
}

#[test]
fn hook_errors_are_recorded_not_propagated() {
    let log = Log::default();
    let mut a = Scripted::new("A", &log);
    a.fail_at = Some(1);
    let mut core = awake_core(vec![a], &log);

    let report = tick(&mut core);
    assert_eq!(report.faults, 1);
    let fault = core.last_error().unwrap();
    assert_eq!(fault.context, "on_fixed_update");
    assert_eq!(
        fault.message.as_str(),
        ModuleError::hook("scripted failure").to_string()
    );
}
