//! Shared fixtures: a scriptable recording module and core builders.

mod arbitration;
mod dispatch;
mod external;
mod faults;
mod persistence;
mod throttle_hold;

use std::cell::RefCell;
use std::rc::Rc;

use flight_common::prelude::{
    AttitudeChange, AttitudeSetpoint, ControlOutput, FlightCoreConfig, ModuleError, ModuleId,
    VesselTelemetry,
};
use flight_core::cycle::{FlightCore, TickReport};
use flight_core::module::{FlightModule, HookResult, HostEvent, ModuleContext, PartEvent};
use nalgebra::{UnitQuaternion, Vector3};

pub type Log = Rc<RefCell<Vec<String>>>;

/// Records every hook it receives as `"<id>:<hook>"` and follows a script of
/// claims, releases and failures keyed by tick.
pub struct Scripted {
    pub id: ModuleId,
    pub log: Log,
    pub claims: Vec<(u64, AttitudeSetpoint)>,
    pub release_at: Option<u64>,
    pub panic_at: Option<u64>,
    pub fail_at: Option<u64>,
    pub changes: Rc<RefCell<Vec<AttitudeChange>>>,
}

impl Scripted {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self {
            id: ModuleId::new(name),
            log: Rc::clone(log),
            claims: Vec::new(),
            release_at: None,
            panic_at: None,
            fail_at: None,
            changes: Rc::default(),
        }
    }

    pub fn claim_at(mut self, tick: u64, setpoint: AttitudeSetpoint) -> Self {
        self.claims.push((tick, setpoint));
        self
    }

    fn note(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{}:{hook}", self.id));
    }
}

impl FlightModule for Scripted {
    fn id(&self) -> ModuleId {
        self.id
    }

    fn on_module_enabled(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        self.note("enabled");
        Ok(())
    }

    fn on_module_disabled(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        self.note("disabled");
        Ok(())
    }

    fn on_attitude_change(
        &mut self,
        _ctx: &mut ModuleContext<'_>,
        change: &AttitudeChange,
    ) -> HookResult {
        self.note("attitude_change");
        self.changes.borrow_mut().push(*change);
        Ok(())
    }

    fn on_awake(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        self.note("awake");
        Ok(())
    }

    fn on_start(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        self.note("start");
        Ok(())
    }

    fn on_part_event(&mut self, _ctx: &mut ModuleContext<'_>, event: PartEvent) -> HookResult {
        self.note(event.name());
        Ok(())
    }

    fn on_fixed_update(&mut self, ctx: &mut ModuleContext<'_>) -> HookResult {
        if self.panic_at == Some(ctx.tick()) {
            panic!("{} blew up", self.id);
        }
        if self.fail_at == Some(ctx.tick()) {
            return Err(ModuleError::hook("scripted failure"));
        }
        self.note("fixed_update");
        Ok(())
    }

    fn on_active_fixed_update(&mut self, ctx: &mut ModuleContext<'_>) -> HookResult {
        self.note("active_fixed_update");
        let tick = ctx.tick();
        for (_, setpoint) in self.claims.iter().filter(|(at, _)| *at == tick) {
            ctx.claim_attitude(*setpoint);
        }
        if self.release_at == Some(tick) {
            ctx.release_attitude();
        }
        Ok(())
    }

    fn on_update(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        self.note("update");
        Ok(())
    }

    fn on_active_update(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        self.note("active_update");
        Ok(())
    }

    fn drive(&mut self, _ctx: &mut ModuleContext<'_>, _output: &mut ControlOutput) -> HookResult {
        self.note("drive");
        Ok(())
    }
}

/// Register `modules` in order, awake the core and clear the log.
pub fn awake_core(modules: Vec<Scripted>, log: &Log) -> FlightCore {
    let mut core = FlightCore::new(FlightCoreConfig::default());
    for module in modules {
        core.register(Box::new(module)).unwrap();
    }
    core.handle_host_event(HostEvent::Awake);
    log.borrow_mut().clear();
    core
}

/// Circular-ish orbit 100 km up, nose pointing radially out.
pub fn orbiting_telemetry() -> VesselTelemetry {
    let mut telemetry = VesselTelemetry::default();
    let r = telemetry.body.radius + 100_000.0;
    telemetry.position = Vector3::new(r, 0.0, 0.0);
    telemetry.velocity =
        Vector3::new(0.0, (telemetry.body.gravitational_parameter / r).sqrt(), 0.0);
    telemetry.rotation = UnitQuaternion::face_towards(&Vector3::x(), &Vector3::z());
    telemetry.terrain_height = None;
    telemetry
}

pub fn tick(core: &mut FlightCore) -> TickReport {
    let mut output = ControlOutput::default();
    core.on_part_fixed_update(&VesselTelemetry::default(), &mut output)
}

/// Log entries whose hook part equals `hook`, in order.
pub fn entries(log: &Log, hook: &str) -> Vec<String> {
    log.borrow()
        .iter()
        .filter(|e| e.split_once(':').is_some_and(|(_, h)| h == hook))
        .cloned()
        .collect()
}
