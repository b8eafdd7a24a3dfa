//! Broadcast order and enable gating.

use flight_common::prelude::ModuleId;
use flight_core::module::{EnableTransition, HostEvent, Lifecycle, PartEvent};
use flight_core::ui::TextSurface;

use super::{Log, Scripted, awake_core, entries, tick};

#[test]
fn lifecycle_events_follow_registration_order() {
    let log = Log::default();
    let mut core = awake_core(
        vec![
            Scripted::new("C", &log),
            Scripted::new("A", &log),
            Scripted::new("B", &log),
        ],
        &log,
    );
    core.set_enabled(ModuleId::new("A"), true).unwrap();
    log.borrow_mut().clear();

    core.handle_host_event(HostEvent::Start);
    core.handle_host_event(HostEvent::Part(PartEvent::Touchdown));
    assert_eq!(
        *log.borrow(),
        [
            "C:start",
            "A:start",
            "B:start",
            "C:touchdown",
            "A:touchdown",
            "B:touchdown"
        ]
    );
}

#[test]
fn active_hooks_reach_enabled_modules_only() {
    let log = Log::default();
    let mut core = awake_core(
        vec![Scripted::new("A", &log), Scripted::new("B", &log)],
        &log,
    );
    core.set_enabled(ModuleId::new("B"), true).unwrap();
    log.borrow_mut().clear();

    tick(&mut core);
    core.on_part_update();

    assert_eq!(entries(&log, "fixed_update"), ["A:fixed_update", "B:fixed_update"]);
    assert_eq!(entries(&log, "active_fixed_update"), ["B:active_fixed_update"]);
    assert_eq!(entries(&log, "drive"), ["B:drive"]);
    assert_eq!(entries(&log, "update"), ["A:update", "B:update"]);
    assert_eq!(entries(&log, "active_update"), ["B:active_update"]);
}

#[test]
fn fixed_update_precedes_active_and_drive() {
    let log = Log::default();
    let mut core = awake_core(
        vec![Scripted::new("A", &log), Scripted::new("B", &log)],
        &log,
    );
    core.set_enabled(ModuleId::new("A"), true).unwrap();
    core.set_enabled(ModuleId::new("B"), true).unwrap();
    log.borrow_mut().clear();

    tick(&mut core);
    assert_eq!(
        *log.borrow(),
        [
            "A:fixed_update",
            "B:fixed_update",
            "A:active_fixed_update",
            "B:active_fixed_update",
            "A:drive",
            "B:drive"
        ]
    );
}

#[test]
fn enable_toggling_is_idempotent_and_marks_dirty() {
    let log = Log::default();
    let mut core = awake_core(vec![Scripted::new("A", &log)], &log);
    let a = ModuleId::new("A");
    assert!(!core.take_settings_dirty());

    assert_eq!(core.set_enabled(a, true).unwrap(), EnableTransition::Activated);
    assert_eq!(core.set_enabled(a, true).unwrap(), EnableTransition::Unchanged);
    assert!(core.take_settings_dirty());
    assert_eq!(core.set_enabled(a, true).unwrap(), EnableTransition::Unchanged);
    assert!(!core.take_settings_dirty());

    assert_eq!(core.set_enabled(a, false).unwrap(), EnableTransition::Deactivated);
    assert_eq!(core.set_enabled(a, false).unwrap(), EnableTransition::Unchanged);
    assert!(core.take_settings_dirty());

    assert_eq!(*log.borrow(), ["A:enabled", "A:disabled"]);
}

#[test]
fn destroyed_modules_receive_nothing() {
    let log = Log::default();
    let mut core = awake_core(vec![Scripted::new("A", &log)], &log);
    let a = ModuleId::new("A");
    core.set_enabled(a, true).unwrap();

    core.handle_host_event(HostEvent::Part(PartEvent::Destroy));
    assert_eq!(core.lifecycle(a), Some(Lifecycle::Destroyed));
    assert!(matches!(
        core.set_enabled(a, true).unwrap(),
        EnableTransition::Rejected(_)
    ));

    log.borrow_mut().clear();
    tick(&mut core);
    core.handle_host_event(HostEvent::Start);
    assert!(log.borrow().is_empty());
}

#[test]
fn gui_windows_get_stable_ids() {
    let log = Log::default();
    let mut core = awake_core(
        vec![
            Scripted::new("A", &log),
            Scripted::new("B", &log),
            Scripted::new("C", &log),
        ],
        &log,
    );
    core.set_enabled(ModuleId::new("A"), true).unwrap();
    core.set_enabled(ModuleId::new("C"), true).unwrap();

    let mut ui = TextSurface::new();
    core.draw_gui(&mut ui, 500);
    let text = ui.take_text();
    assert!(text.contains("[500] A"));
    assert!(text.contains("[502] C"));
    assert!(!text.contains("[501]"));
}

#[test]
fn hook_sequence_repeats_identically_every_tick() {
    let log = Log::default();
    let mut core = awake_core(
        vec![
            Scripted::new("C", &log),
            Scripted::new("A", &log),
            Scripted::new("B", &log),
        ],
        &log,
    );
    core.set_enabled(ModuleId::new("C"), true).unwrap();
    core.set_enabled(ModuleId::new("A"), true).unwrap();

    let mut rounds = Vec::new();
    for _ in 0..6 {
        log.borrow_mut().clear();
        tick(&mut core);
        core.on_part_update();
        core.handle_host_event(HostEvent::Part(PartEvent::Touchdown));
        rounds.push(log.borrow().clone());
    }

    assert_eq!(
        rounds[0],
        [
            "C:fixed_update",
            "A:fixed_update",
            "B:fixed_update",
            "C:active_fixed_update",
            "A:active_fixed_update",
            "C:drive",
            "A:drive",
            "C:update",
            "A:update",
            "B:update",
            "C:active_update",
            "A:active_update",
            "C:touchdown",
            "A:touchdown",
            "B:touchdown",
        ]
    );
    for (i, round) in rounds.iter().enumerate().skip(1) {
        assert_eq!(round, &rounds[0], "round {i} diverged");
    }
}
