//! The flight core: module dispatch, per-tick arbitration and persistence.
//!
//! ## Tick Body
//!
//! 1. Rebuild the [`VesselState`] from host telemetry.
//! 2. Apply queued external requests.
//! 3. `on_fixed_update` to every live module, then `on_active_fixed_update`
//!    to enabled modules.
//! 4. Arbitration: attitude torque from the current claim, throttle and RCS
//!    from the translation register, written into the output record.
//! 5. `drive` to enabled modules, in registration order.
//! 6. Sanitize the record; it goes back to the host once.
//!
//! Attitude notifications queued by a hook are broadcast as soon as that hook
//! returns, followed by any enable requests it made. Claims made after step 4
//! govern the next tick.

use std::path::Path;
use std::time::Instant;

use flight_common::consts::{MAX_NOTIFICATION_ROUNDS, MAX_PENDING_NOTIFICATIONS};
use flight_common::prelude::{
    ArbitrationFlags, AttitudeChange, AttitudeSetpoint, AttitudeTarget, ControlOutput,
    FlightCoreConfig, ModuleError, ModuleId, ReferenceFrame, ScriptError, ScriptErrorKind,
    TranslationCommand, TranslationMode, VesselTelemetry,
};
use tracing::{debug, error, info, trace, warn};

use crate::arbitration::{AttitudeClaim, ClaimOutcome, ControlArbiter};
use crate::command::{ArbitrationRequest, ExternalClient, RequestQueue, parse_command};
use crate::control::attitude::AttitudeController;
use crate::control::throttle::throttle_correction;
use crate::error::{FaultRecord, guarded};
use crate::module::lifecycle::awake_transition;
use crate::module::{
    EnableRequests, EnableTransition, FlightModule, HookResult, HostEvent, Lifecycle,
    ModuleContext, ModuleRegistry, PartEvent, enable_transition,
};
use crate::settings::{FlightRecord, SettingsError, SettingsScope, SettingsStore, VesselRecord};
use crate::ui::{UiSurface, WindowRect};
use crate::vessel_state::VesselState;

// ─── Tick Statistics ────────────────────────────────────────────────

/// O(1) per-tick timing and fault counters.
#[derive(Debug, Clone)]
pub struct TickStats {
    pub tick_count: u64,
    /// Last tick duration [ns].
    pub last_tick_ns: u64,
    pub min_tick_ns: u64,
    pub max_tick_ns: u64,
    pub sum_tick_ns: u64,
    /// Hook failures contained since start.
    pub hook_faults: u64,
    /// Ticks whose attitude claim could not be resolved.
    pub degenerate_ticks: u64,
}

impl Default for TickStats {
    fn default() -> Self {
        Self::new()
    }
}

impl TickStats {
    pub const fn new() -> Self {
        Self {
            tick_count: 0,
            last_tick_ns: 0,
            min_tick_ns: u64::MAX,
            max_tick_ns: 0,
            sum_tick_ns: 0,
            hook_faults: 0,
            degenerate_ticks: 0,
        }
    }

    #[inline]
    pub fn record(&mut self, duration_ns: u64) {
        self.tick_count += 1;
        self.last_tick_ns = duration_ns;
        self.min_tick_ns = self.min_tick_ns.min(duration_ns);
        self.max_tick_ns = self.max_tick_ns.max(duration_ns);
        self.sum_tick_ns = self.sum_tick_ns.saturating_add(duration_ns);
    }

    /// Average tick time [ns] (0 before the first tick).
    #[inline]
    pub fn avg_tick_ns(&self) -> u64 {
        if self.tick_count == 0 {
            0
        } else {
            self.sum_tick_ns / self.tick_count
        }
    }
}

impl std::fmt::Display for TickStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let min = if self.tick_count == 0 { 0 } else { self.min_tick_ns };
        write!(
            f,
            "{} ticks, min/avg/max {}/{}/{} ns, {} hook faults, {} degenerate",
            self.tick_count,
            min,
            self.avg_tick_ns(),
            self.max_tick_ns,
            self.hook_faults,
            self.degenerate_ticks
        )
    }
}

/// Outcome of one fixed update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub flags: ArbitrationFlags,
    pub attitude_owner: Option<ModuleId>,
    pub translation: TranslationMode,
    /// Hooks that failed during this tick.
    pub faults: u32,
    pub output: ControlOutput,
}

// ─── Dispatch Audience ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Audience {
    /// Every module that has not been destroyed.
    All,
    Enabled,
}

impl Audience {
    const fn admits(self, lifecycle: Lifecycle) -> bool {
        match self {
            Self::All => !matches!(lifecycle, Lifecycle::Destroyed),
            Self::Enabled => lifecycle.is_enabled(),
        }
    }
}

// ─── Flight Core ────────────────────────────────────────────────────

pub struct FlightCore {
    config: FlightCoreConfig,
    state: VesselState,
    arbiter: ControlArbiter,
    attitude_ctl: AttitudeController,
    registry: ModuleRegistry,
    settings: SettingsStore,
    settings_dirty: bool,
    last_error: Option<FaultRecord>,
    stats: TickStats,
    requests: RequestQueue,
    tick: u64,
    tick_faults: u32,
    paused: bool,
    /// Nesting of notification/enable-request settling.
    settle_depth: usize,
    /// Enable requests held back by a too-deep cascade; the outermost settle
    /// applies them.
    deferred: EnableRequests,
}

impl FlightCore {
    pub fn new(config: FlightCoreConfig) -> Self {
        Self {
            config,
            state: VesselState::new(),
            arbiter: ControlArbiter::new(),
            attitude_ctl: AttitudeController::new(),
            registry: ModuleRegistry::new(),
            settings: SettingsStore::new(),
            settings_dirty: false,
            last_error: None,
            stats: TickStats::new(),
            requests: RequestQueue::default(),
            tick: 0,
            tick_faults: 0,
            paused: false,
            settle_depth: 0,
            deferred: EnableRequests::new(),
        }
    }

    /// Append a module. Registration order is dispatch order.
    pub fn register(&mut self, module: Box<dyn FlightModule>) -> Result<ModuleId, ModuleError> {
        let id = module.id();
        let index = self.registry.register(module)?;
        debug!(module = %id, index, "module registered");
        Ok(id)
    }

    // ─── Accessors ──────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &FlightCoreConfig {
        &self.config
    }

    #[inline]
    pub fn vessel_state(&self) -> &VesselState {
        &self.state
    }

    #[inline]
    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn last_error(&self) -> Option<&FaultRecord> {
        self.last_error.as_ref()
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn lifecycle(&self, id: ModuleId) -> Option<Lifecycle> {
        self.registry.lifecycle(id)
    }

    pub fn is_enabled(&self, id: ModuleId) -> bool {
        self.lifecycle(id).is_some_and(Lifecycle::is_enabled)
    }

    pub fn window(&self, id: ModuleId) -> Option<WindowRect> {
        let index = self.registry.index_of(id)?;
        self.registry.get(index).map(|slot| slot.window)
    }

    pub fn set_window(&mut self, id: ModuleId, rect: WindowRect, visible: bool) {
        if let Some(slot) = self.registry.index_of(id).and_then(|i| self.registry.get_mut(i)) {
            if slot.window != rect || slot.window_visible != visible {
                slot.window = rect;
                slot.window_visible = visible;
                self.settings_dirty = true;
            }
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// True if enabled flags or windows changed since the last call.
    pub fn take_settings_dirty(&mut self) -> bool {
        std::mem::take(&mut self.settings_dirty)
    }

    #[inline]
    pub fn settings_dirty(&self) -> bool {
        self.settings_dirty
    }

    // ─── Arbitration API ────────────────────────────────────────────

    pub fn attitude_owner(&self) -> Option<ModuleId> {
        self.arbiter.attitude.owner()
    }

    pub fn attitude_setpoint(&self) -> Option<AttitudeSetpoint> {
        self.arbiter.attitude.setpoint()
    }

    pub fn translation(&self) -> TranslationCommand {
        self.arbiter.translation.get()
    }

    /// Claim attitude from outside any hook; the change is broadcast before
    /// this returns.
    pub fn claim_attitude(
        &mut self,
        requester: ModuleId,
        frame: ReferenceFrame,
        target: AttitudeTarget,
    ) -> ClaimOutcome {
        let outcome = self
            .arbiter
            .attitude
            .claim(requester, AttitudeSetpoint::new(frame, target));
        self.settle(EnableRequests::new());
        outcome
    }

    pub fn release_attitude(&mut self, requester: ModuleId) -> bool {
        self.arbiter.attitude.release(requester)
    }

    pub fn set_translation(&mut self, mode: TranslationMode, target_speed: f64, kill_lateral: bool) {
        self.arbiter
            .translation
            .set(TranslationCommand::new(mode, target_speed, kill_lateral));
    }

    /// Handle for a consumer on another thread; see [`ExternalClient`].
    pub fn external_client(&self, id: ModuleId) -> ExternalClient {
        self.requests.client(id)
    }

    /// Run one console line on the tick thread.
    pub fn execute_command(&mut self, requester: ModuleId, line: &str) -> Result<(), ScriptError> {
        let result = parse_command(requester, line).and_then(|request| self.apply_request(&request));
        if let Err(e) = &result {
            self.record_script_error(requester, e);
        }
        result
    }

    fn apply_request(&mut self, request: &ArbitrationRequest) -> Result<(), ScriptError> {
        match request {
            ArbitrationRequest::ClaimAttitude {
                requester,
                setpoint,
            } => {
                self.claim_attitude(*requester, setpoint.frame, setpoint.target);
            }
            ArbitrationRequest::ReleaseAttitude { requester } => {
                self.release_attitude(*requester);
            }
            ArbitrationRequest::SetTranslation { requester, command } => {
                trace!(
                    client = %requester,
                    mode = %command.mode,
                    speed = command.target_speed,
                    "translation set"
                );
                self.arbiter.translation.set(*command);
            }
            ArbitrationRequest::SetEnabled {
                module, enabled, ..
            } => {
                let id = self.registry.find_by_name(module).ok_or_else(|| {
                    ScriptError::new(ScriptErrorKind::UnknownModule, format!("'{module}'"))
                })?;
                if let Ok(EnableTransition::Rejected(reason)) = self.set_enabled(id, *enabled) {
                    return Err(ScriptError::new(
                        ScriptErrorKind::BadArgument,
                        format!("{id}: {reason}"),
                    ));
                }
            }
        }
        Ok(())
    }

    fn drain_external(&mut self) {
        while let Some(queued) = self.requests.next() {
            if let Err(e) = self.apply_request(&queued.request) {
                self.record_script_error(queued.request.requester(), &e);
                queued.reject(&e);
            }
        }
    }

    // ─── Enable Setter ──────────────────────────────────────────────

    /// The only path to `on_module_enabled` / `on_module_disabled`.
    ///
    /// Setting the current value again is a no-op; an actual change marks
    /// the settings dirty and fires the hook before returning.
    pub fn set_enabled(
        &mut self,
        id: ModuleId,
        enabled: bool,
    ) -> Result<EnableTransition, ModuleError> {
        let unknown = || ModuleError::UnknownModule(id.name().to_string());
        let index = self.registry.index_of(id).ok_or_else(unknown)?;
        let slot = self.registry.get_mut(index).ok_or_else(unknown)?;

        let (next, transition) = enable_transition(slot.lifecycle, enabled);
        slot.lifecycle = next;
        match transition {
            EnableTransition::Activated => {
                self.settings_dirty = true;
                debug!(module = %id, "enabled");
                self.call(index, "on_module_enabled", |m, ctx| m.on_module_enabled(ctx));
            }
            EnableTransition::Deactivated => {
                self.settings_dirty = true;
                debug!(module = %id, "disabled");
                self.call(index, "on_module_disabled", |m, ctx| m.on_module_disabled(ctx));
            }
            EnableTransition::Unchanged => {}
            EnableTransition::Rejected(reason) => {
                warn!(module = %id, enabled, "enable request rejected: {reason}");
            }
        }
        Ok(transition)
    }

    // ─── Host Events ────────────────────────────────────────────────

    /// Forward a host lifecycle event to every live module.
    ///
    /// `Awake` initializes fresh modules and then applies global settings.
    /// `Part(Destroy)` collects global settings and destroys every module.
    pub fn handle_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Awake => {
                for slot in self.registry.iter_mut() {
                    slot.lifecycle = awake_transition(slot.lifecycle);
                }
                info!(modules = self.registry.len(), "flight core awake");
            }
            HostEvent::GamePause => self.paused = true,
            HostEvent::GameResume => self.paused = false,
            _ => {}
        }

        debug!("host event: {event}");
        self.broadcast(Audience::All, event.hook_name(), |m, ctx| event.dispatch(m, ctx));

        match event {
            HostEvent::Awake => self.load_global_settings(),
            HostEvent::Part(PartEvent::Destroy) => {
                self.save_global_settings();
                for slot in self.registry.iter_mut() {
                    slot.lifecycle = Lifecycle::Destroyed;
                }
                info!("flight core destroyed");
            }
            _ => {}
        }
    }

    /// One physics tick. `output` arrives with the host's own inputs and
    /// leaves with the arbitrated, module-refined record.
    pub fn on_part_fixed_update(
        &mut self,
        telemetry: &VesselTelemetry,
        output: &mut ControlOutput,
    ) -> TickReport {
        let started = Instant::now();
        self.tick += 1;
        self.tick_faults = 0;

        self.state.update(telemetry);
        self.drain_external();

        self.broadcast(Audience::All, "on_fixed_update", |m, ctx| m.on_fixed_update(ctx));
        self.broadcast(Audience::Enabled, "on_active_fixed_update", |m, ctx| {
            m.on_active_fixed_update(ctx)
        });

        let mut flags = self.arbitrate(output);

        self.broadcast(Audience::Enabled, "drive", |m, ctx| m.drive(ctx, output));
        output.sanitize();

        if self.tick_faults > 0 {
            flags |= ArbitrationFlags::HOOK_FAULT;
        }
        if flags.contains(ArbitrationFlags::ATTITUDE_DEGENERATE) {
            self.stats.degenerate_ticks += 1;
        }
        self.stats
            .record(u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX));

        let report = TickReport {
            tick: self.tick,
            flags,
            attitude_owner: self.arbiter.attitude.owner(),
            translation: self.arbiter.translation.get().mode,
            faults: self.tick_faults,
            output: *output,
        };
        trace!(?report, "tick");
        report
    }

    /// Render-frame update.
    pub fn on_part_update(&mut self) {
        self.broadcast(Audience::All, "on_update", |m, ctx| m.on_update(ctx));
        self.broadcast(Audience::Enabled, "on_active_update", |m, ctx| m.on_active_update(ctx));
    }

    /// GUI pass: one window per enabled, visible module, ids
    /// `base_window_id + slot`.
    pub fn draw_gui(&mut self, ui: &mut dyn UiSurface, base_window_id: u32) {
        for index in 0..self.registry.len() {
            let Some(slot) = self.registry.get(index) else {
                continue;
            };
            if !slot.lifecycle.is_enabled() || !slot.window_visible {
                continue;
            }
            let title = slot.module.title().to_string();
            let window_id = base_window_id.wrapping_add(index as u32);
            let rect = ui.window(window_id, &title, slot.window);

            let requests = self.invoke(index, "draw_ui", |m, ctx| m.draw_ui(ctx, &mut *ui));
            ui.end_window();

            if let Some(slot) = self.registry.get_mut(index) {
                if slot.window != rect {
                    slot.window = rect;
                    self.settings_dirty = true;
                }
            }
            self.settle(requests);
        }
    }

    // ─── Arbitration Step ───────────────────────────────────────────

    fn arbitrate(&mut self, output: &mut ControlOutput) -> ArbitrationFlags {
        let mut flags = ArbitrationFlags::empty();

        if let AttitudeClaim::Claimed { owner, setpoint } = self.arbiter.attitude.claim_state() {
            flags |= ArbitrationFlags::ATTITUDE_ACTIVE;
            let torque = self.attitude_ctl.update(
                &self.state,
                &setpoint,
                self.arbiter.attitude.generation(),
                &self.config.attitude,
            );
            match torque {
                Some(torque) => output.set_torque(torque),
                None => {
                    output.set_torque(nalgebra::Vector3::zeros());
                    flags |= ArbitrationFlags::ATTITUDE_DEGENERATE;
                    trace!(owner = %owner, "attitude setpoint unresolvable: {setpoint}");
                }
            }
        }

        let command = self.arbiter.translation.get();
        if let Some(correction) = throttle_correction(&self.state, &command, &self.config.throttle) {
            flags |= ArbitrationFlags::TRANSLATION_ACTIVE;
            output.main_throttle = correction.throttle;
            if correction.saturated {
                flags |= ArbitrationFlags::THROTTLE_SATURATED;
            }
            if let Some(translation) = correction.translation {
                output.set_translation(translation);
                flags |= ArbitrationFlags::LATERAL_KILL;
            }
        }

        flags
    }

    // ─── Dispatch ───────────────────────────────────────────────────

    fn broadcast<F>(&mut self, audience: Audience, hook: &'static str, mut f: F)
    where
        F: FnMut(&mut dyn FlightModule, &mut ModuleContext<'_>) -> HookResult,
    {
        for index in 0..self.registry.len() {
            let admitted = self
                .registry
                .get(index)
                .is_some_and(|slot| audience.admits(slot.lifecycle));
            if admitted {
                let requests = self.invoke(index, hook, &mut f);
                self.settle(requests);
            }
        }
    }

    /// Call one hook and settle what it queued.
    fn call<F>(&mut self, index: usize, hook: &'static str, f: F)
    where
        F: FnOnce(&mut dyn FlightModule, &mut ModuleContext<'_>) -> HookResult,
    {
        let requests = self.invoke(index, hook, f);
        self.settle(requests);
    }

    /// Call one hook inside the fault boundary. Returns its enable requests;
    /// attitude notifications it caused stay queued in the arbiter.
    fn invoke<F>(&mut self, index: usize, hook: &'static str, f: F) -> EnableRequests
    where
        F: FnOnce(&mut dyn FlightModule, &mut ModuleContext<'_>) -> HookResult,
    {
        let directory = self.registry.directory();
        let mut requests = EnableRequests::new();
        let tick = self.tick;
        let Some(slot) = self.registry.get_mut(index) else {
            return requests;
        };
        let id = slot.id();

        let result = {
            let mut ctx = ModuleContext::new(
                id,
                tick,
                &self.state,
                &mut self.arbiter,
                &directory,
                &mut requests,
            );
            guarded(|| f(slot.module.as_mut(), &mut ctx))
        };

        if let Err(e) = result {
            self.record_fault(id, hook, &e);
        }
        requests
    }

    /// Broadcast queued attitude changes to every live module, then apply
    /// enable requests. Handlers may claim again; rounds are bounded. Too
    /// deep a nesting parks its enable requests for the outermost settle.
    fn settle(&mut self, mut requests: EnableRequests) {
        if self.settle_depth >= MAX_NOTIFICATION_ROUNDS {
            // Queued notifications stay in the arbiter for an enclosing settle.
            if !requests.is_empty() {
                warn!(
                    count = requests.len(),
                    "notification cascade too deep, deferring enable requests"
                );
            }
            for request in requests {
                if let Err((id, _)) = self.deferred.push(request) {
                    warn!(module = %id, "deferred enable queue full, request dropped");
                }
            }
            return;
        }
        self.settle_depth += 1;

        let mut rounds = 0;
        while self.arbiter.attitude.has_pending() {
            rounds += 1;
            if rounds > MAX_NOTIFICATION_ROUNDS {
                let mut dropped = 0;
                while self.arbiter.attitude.next_notification().is_some() {
                    dropped += 1;
                }
                warn!(dropped, "attitude claims kept changing during notification, giving up");
                break;
            }

            let mut batch = heapless::Vec::<AttitudeChange, MAX_PENDING_NOTIFICATIONS>::new();
            while let Some(change) = self.arbiter.attitude.next_notification() {
                // Same capacity as the arbiter queue.
                let _ = batch.push(change);
            }
            for change in batch {
                self.notify_attitude_change(&change, &mut requests);
            }
        }

        for (id, enabled) in requests {
            if let Err(e) = self.set_enabled(id, enabled) {
                warn!("deferred enable request failed: {e}");
            }
        }
        if self.settle_depth == 1 {
            self.apply_deferred();
        }
        self.settle_depth -= 1;
    }

    /// Drain requests parked by [`Self::settle`]. Each pass may park more;
    /// passes are bounded like notification rounds.
    fn apply_deferred(&mut self) {
        let mut passes = 0;
        while !self.deferred.is_empty() {
            passes += 1;
            if passes > MAX_NOTIFICATION_ROUNDS {
                warn!(
                    dropped = self.deferred.len(),
                    "enable requests kept cascading, giving up"
                );
                self.deferred.clear();
                break;
            }
            for (id, enabled) in core::mem::take(&mut self.deferred) {
                if let Err(e) = self.set_enabled(id, enabled) {
                    warn!("deferred enable request failed: {e}");
                }
            }
        }
    }

    fn notify_attitude_change(&mut self, change: &AttitudeChange, requests: &mut EnableRequests) {
        for index in 0..self.registry.len() {
            let admitted = self
                .registry
                .get(index)
                .is_some_and(|slot| Audience::All.admits(slot.lifecycle));
            if !admitted {
                continue;
            }
            let queued = self.invoke(index, "on_attitude_change", |m, ctx| {
                m.on_attitude_change(ctx, change)
            });
            for request in queued {
                if requests.push(request).is_err() {
                    warn!("enable request queue full, request dropped");
                }
            }
        }
    }

    fn record_fault(&mut self, source: ModuleId, hook: &'static str, err: &ModuleError) {
        error!(module = %source, hook, tick = self.tick, "{err}");
        self.stats.hook_faults += 1;
        self.tick_faults += 1;
        self.last_error = Some(FaultRecord::new(source, hook, &err.to_string(), self.tick));
    }

    /// Faults that overflowed a save pass still count.
    fn count_unrecorded_faults(&mut self, count: u32) {
        self.stats.hook_faults += u64::from(count);
        self.tick_faults += count;
    }

    fn record_script_error(&mut self, source: ModuleId, err: &ScriptError) {
        warn!(client = %source, "{err}");
        self.last_error = Some(FaultRecord::new(source, "command", &err.to_string(), self.tick));
    }

    // ─── Global Settings ────────────────────────────────────────────

    /// Write every live module's window, enabled flag and own settings into
    /// the in-memory store. Destroyed modules keep what they saved last.
    pub fn save_global_settings(&mut self) {
        let mut faults = heapless::Vec::<(ModuleId, ModuleError), 4>::new();
        let mut unrecorded = 0;
        for slot in self.registry.iter_mut() {
            if !slot.lifecycle.is_live() {
                continue;
            }
            let id = slot.id();
            let mut scope = SettingsScope::new(&mut self.settings, id);
            scope.set_vector4("windowPos", slot.window.to_array());
            scope.set_boolean("enabled", slot.lifecycle.is_enabled());
            if let Err(e) = guarded(|| slot.module.on_save_global_settings(&mut scope)) {
                if faults.push((id, e)).is_err() {
                    warn!(module = %id, "settings fault not recorded");
                    unrecorded += 1;
                }
            }
        }
        self.count_unrecorded_faults(unrecorded);
        for (id, e) in faults {
            self.record_fault(id, "on_save_global_settings", &e);
        }
    }

    /// Apply the in-memory store to every module. Enabled flags go through
    /// the enable setter; loading itself does not mark settings dirty.
    pub fn load_global_settings(&mut self) {
        let dirty = self.settings_dirty;
        for index in 0..self.registry.len() {
            let Some(slot) = self.registry.get_mut(index) else {
                continue;
            };
            let id = slot.id();
            let scope = SettingsScope::new(&mut self.settings, id);
            slot.window = WindowRect::from_array(scope.get_vector4("windowPos", slot.window.to_array()));
            let enabled = scope.get_boolean("enabled", slot.module.enabled_by_default());
            let result = guarded(|| slot.module.on_load_global_settings(&scope));
            if let Err(e) = result {
                self.record_fault(id, "on_load_global_settings", &e);
            }
            if let Err(e) = self.set_enabled(id, enabled) {
                warn!("cannot restore enabled flag: {e}");
            }
        }
        self.settings_dirty = dirty;
    }

    /// Replace the store with the file's contents (missing file: empty).
    pub fn load_settings_file(&mut self, path: &Path) -> Result<(), SettingsError> {
        self.settings = SettingsStore::load(path)?;
        if self.settings.rejected() > 0 {
            warn!(
                rejected = self.settings.rejected(),
                path = %path.display(),
                "settings file had malformed lines"
            );
        }
        Ok(())
    }

    /// Collect settings from every module and write them out.
    pub fn save_settings_file(&mut self, path: &Path) -> Result<(), SettingsError> {
        self.save_global_settings();
        self.settings.save(path)?;
        self.settings_dirty = false;
        Ok(())
    }

    // ─── Per-Vehicle Flight State ───────────────────────────────────

    pub fn save_flight_state(&mut self) -> VesselRecord {
        let mut record = VesselRecord::new();
        let mut faults = heapless::Vec::<(ModuleId, ModuleError), 4>::new();
        let mut unrecorded = 0;
        for slot in self.registry.iter_mut() {
            let id = slot.id();
            let section = record.section_mut(id);
            if let Err(e) = guarded(|| slot.module.on_flight_state_save(section)) {
                if let Err((id, e)) = faults.push((id, e)) {
                    warn!(module = %id, "flight state fault not recorded: {e}");
                    unrecorded += 1;
                }
            }
        }
        self.count_unrecorded_faults(unrecorded);
        for (id, e) in faults {
            self.record_fault(id, "on_flight_state_save", &e);
        }
        record
    }

    /// Modules without a section load an empty record.
    pub fn load_flight_state(&mut self, record: &VesselRecord) {
        let empty = FlightRecord::new();
        for index in 0..self.registry.len() {
            let Some(slot) = self.registry.get_mut(index) else {
                continue;
            };
            let id = slot.id();
            let section = record.section(id).unwrap_or(&empty);
            if let Err(e) = guarded(|| slot.module.on_flight_state_load(section)) {
                self.record_fault(id, "on_flight_state_load", &e);
            }
        }
    }
}

impl std::fmt::Debug for FlightCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightCore")
            .field("tick", &self.tick)
            .field("modules", &self.registry)
            .field("attitude", &self.arbiter.attitude.claim_state())
            .field("translation", &self.arbiter.translation.get())
            .finish_non_exhaustive()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
