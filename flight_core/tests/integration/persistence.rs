//! Global settings file and per-vehicle flight state across core instances.

use std::fs::OpenOptions;
use std::io::Write;

use flight_common::prelude::{Direction, FlightCoreConfig, ModuleId, ReferenceFrame};
use flight_core::cycle::FlightCore;
use flight_core::module::{HostEvent, Lifecycle, PartEvent};
use flight_core::modules::smart_ass::{SMART_ASS, SmartAss};
use flight_core::settings::VesselRecord;
use flight_core::ui::WindowRect;
use tempfile::tempdir;

use super::{Log, Scripted, awake_core};

#[test]
fn window_and_enabled_survive_a_corrupt_settings_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.cfg");
    let log = Log::default();
    let m = ModuleId::new("M");

    let mut core = awake_core(vec![Scripted::new("M", &log)], &log);
    core.set_window(m, WindowRect::new(12.5, 40.0, 220.0, 150.0), true);
    core.set_enabled(m, true).unwrap();
    assert!(core.settings_dirty());
    core.save_settings_file(&path).unwrap();
    assert!(!core.settings_dirty());

    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    writeln!(file, "this line has no separator").unwrap();
    writeln!(file, "M.broken=vector4,1,2").unwrap();
    drop(file);

    let mut restored = FlightCore::new(FlightCoreConfig::default());
    restored.load_settings_file(&path).unwrap();
    assert_eq!(restored.settings().rejected(), 2);
    restored.register(Box::new(Scripted::new("M", &log))).unwrap();
    restored.handle_host_event(HostEvent::Awake);

    let window = restored.window(m).unwrap();
    assert_eq!((window.x, window.y), (12.5, 40.0));
    assert_eq!((window.width, window.height), (220.0, 150.0));
    assert_eq!(restored.lifecycle(m), Some(Lifecycle::Enabled));
    assert!(!restored.settings_dirty());
}

#[test]
fn missing_settings_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let mut core = FlightCore::new(FlightCoreConfig::default());
    core.load_settings_file(&dir.path().join("absent.cfg")).unwrap();
    assert!(core.settings().is_empty());

    core.register(Box::new(SmartAss::new())).unwrap();
    core.handle_host_event(HostEvent::Awake);
    assert_eq!(core.lifecycle(SMART_ASS), Some(Lifecycle::Disabled));
}

#[test]
fn destroy_keeps_enabled_flags_for_the_next_flight() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.cfg");
    let log = Log::default();
    let m = ModuleId::new("M");

    let mut core = awake_core(vec![Scripted::new("M", &log)], &log);
    core.set_enabled(m, true).unwrap();
    core.handle_host_event(HostEvent::Part(PartEvent::Destroy));
    core.save_settings_file(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("M.enabled=boolean,true"));
}

#[test]
fn flight_state_round_trips_through_toml() {
    let mut smart_ass = SmartAss::new();
    smart_ass.engage(ReferenceFrame::OrbitHorizontal, Direction::Left);
    let mut core = FlightCore::new(FlightCoreConfig::default());
    core.register(Box::new(smart_ass)).unwrap();
    core.handle_host_event(HostEvent::Awake);

    let text = core.save_flight_state().to_toml().unwrap();
    let record = VesselRecord::from_toml(&text).unwrap();
    assert_eq!(
        record.section(SMART_ASS).and_then(|s| s.get("frame")),
        Some("orbit_horizontal")
    );

    let mut next = FlightCore::new(FlightCoreConfig::default());
    next.register(Box::new(SmartAss::new())).unwrap();
    next.register(Box::new(Scripted::new("Other", &Log::default()))).unwrap();
    next.handle_host_event(HostEvent::Awake);
    next.load_flight_state(&record);
    assert!(next.last_error().is_none());

    let again = next.save_flight_state();
    assert_eq!(again.section(SMART_ASS), record.section(SMART_ASS));
}
