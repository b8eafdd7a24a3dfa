//! Consumers outside the tick thread and the console grammar.

use std::thread;

use flight_common::prelude::{
    AttitudeTarget, Direction, ModuleId, ReferenceFrame, ScriptErrorKind, TranslationMode,
};

use super::{Log, Scripted, awake_core, tick};

const SCRIPT: ModuleId = ModuleId::new("ScriptConsole");

#[test]
fn requests_from_another_thread_apply_on_next_tick() {
    let log = Log::default();
    let a = Scripted::new("A", &log);
    let changes = a.changes.clone();
    let mut core = awake_core(vec![a], &log);

    let mut client = core.external_client(SCRIPT);
    thread::spawn(move || {
        client.submit_line("attitude orbit retrograde").unwrap();
        client.submit_line("translate orbital 2200").unwrap();
        client.submit_line("enable a").unwrap();
    })
    .join()
    .unwrap();

    assert_eq!(core.attitude_owner(), None);
    tick(&mut core);

    assert_eq!(core.attitude_owner(), Some(SCRIPT));
    let setpoint = core.attitude_setpoint().unwrap();
    assert_eq!(setpoint.frame, ReferenceFrame::Orbit);
    assert_eq!(setpoint.target, AttitudeTarget::from(Direction::Back));
    assert_eq!(core.translation().mode, TranslationMode::KeepOrbital);
    assert_eq!(core.translation().target_speed, 2200.0);
    assert!(core.is_enabled(ModuleId::new("A")));
    assert_eq!(changes.borrow().len(), 1);
}

#[test]
fn malformed_lines_fail_at_the_client() {
    let log = Log::default();
    let core = awake_core(vec![Scripted::new("A", &log)], &log);
    let mut client = core.external_client(SCRIPT);

    let err = client.submit_line("attitude sideways up").unwrap_err();
    assert_eq!(err.kind, ScriptErrorKind::BadArgument);
    assert_eq!(client.last_error(), Some(err));
}

#[test]
fn unknown_module_is_reported_on_the_core() {
    let log = Log::default();
    let mut core = awake_core(vec![Scripted::new("A", &log)], &log);
    let mut client = core.external_client(SCRIPT);
    client.submit_line("disable Ghost").unwrap();
    assert!(client.last_error().is_none());

    tick(&mut core);
    let fault = core.last_error().unwrap();
    assert_eq!(fault.source, SCRIPT);
    assert_eq!(fault.context, "command");
    assert!(fault.message.contains("Ghost"));

    let err = client.last_error().unwrap();
    assert_eq!(err.kind, ScriptErrorKind::UnknownModule);
    assert!(err.message.contains("Ghost"));
}

#[test]
fn apply_errors_name_the_client_that_sent_them() {
    let log = Log::default();
    let mut core = awake_core(vec![Scripted::new("A", &log)], &log);
    let mut script = core.external_client(SCRIPT);
    let mut other = core.external_client(ModuleId::new("Telemetry"));

    other.submit_line("enable a").unwrap();
    script.submit_line("enable Nobody").unwrap();
    tick(&mut core);

    assert!(core.is_enabled(ModuleId::new("A")));
    assert_eq!(core.last_error().map(|f| f.source), Some(SCRIPT));
    assert!(other.last_error().is_none());
    assert_eq!(
        script.last_error().map(|e| e.kind),
        Some(ScriptErrorKind::UnknownModule)
    );
}

#[test]
fn console_release_only_affects_its_own_claim() {
    let log = Log::default();
    let mut core = awake_core(vec![Scripted::new("A", &log)], &log);
    core.claim_attitude(
        ModuleId::new("A"),
        ReferenceFrame::SurfaceNorth,
        Direction::Up.into(),
    );

    core.execute_command(SCRIPT, "attitude off").unwrap();
    assert_eq!(core.attitude_owner(), Some(ModuleId::new("A")));

    let err = core.execute_command(SCRIPT, "").unwrap_err();
    assert_eq!(err.kind, ScriptErrorKind::Empty);
}
