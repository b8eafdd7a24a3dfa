//! What a hook may touch: the snapshot (read-only), the arbiter (through
//! claims stamped with the caller's identity) and a read-only directory of
//! the other modules.

use flight_common::consts::MAX_MODULES;
use flight_common::prelude::{
    AttitudeSetpoint, ModuleError, ModuleId, TranslationCommand,
};

use super::lifecycle::Lifecycle;
use crate::arbitration::{ClaimOutcome, ControlArbiter};
use crate::vessel_state::VesselState;

/// `(id, lifecycle)` of every registered module, registration order.
pub type Directory = heapless::Vec<(ModuleId, Lifecycle), MAX_MODULES>;

/// Enable requests made during a hook; applied once it returns.
pub type EnableRequests = heapless::Vec<(ModuleId, bool), MAX_MODULES>;

pub struct ModuleContext<'a> {
    id: ModuleId,
    tick: u64,
    state: &'a VesselState,
    arbiter: &'a mut ControlArbiter,
    directory: &'a Directory,
    requests: &'a mut EnableRequests,
}

impl<'a> ModuleContext<'a> {
    pub fn new(
        id: ModuleId,
        tick: u64,
        state: &'a VesselState,
        arbiter: &'a mut ControlArbiter,
        directory: &'a Directory,
        requests: &'a mut EnableRequests,
    ) -> Self {
        Self {
            id,
            tick,
            state,
            arbiter,
            directory,
            requests,
        }
    }

    /// Identity every claim from this context is stamped with.
    #[inline]
    pub fn id(&self) -> ModuleId {
        self.id
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// May be the not-yet-updated snapshot; check `is_valid()`.
    #[inline]
    pub fn vessel_state(&self) -> &VesselState {
        self.state
    }

    // ─── Arbitration ────────────────────────────────────────────────

    pub fn claim_attitude(&mut self, setpoint: AttitudeSetpoint) -> ClaimOutcome {
        self.arbiter.attitude.claim(self.id, setpoint)
    }

    /// No-op unless this module owns the claim.
    pub fn release_attitude(&mut self) -> bool {
        self.arbiter.attitude.release(self.id)
    }

    pub fn attitude_owner(&self) -> Option<ModuleId> {
        self.arbiter.attitude.owner()
    }

    pub fn attitude_setpoint(&self) -> Option<AttitudeSetpoint> {
        self.arbiter.attitude.setpoint()
    }

    pub fn set_translation(&mut self, command: TranslationCommand) {
        self.arbiter.translation.set(command);
    }

    pub fn translation(&self) -> TranslationCommand {
        self.arbiter.translation.get()
    }

    // ─── Other Modules ──────────────────────────────────────────────

    pub fn modules(&self) -> impl Iterator<Item = (ModuleId, Lifecycle)> + '_ {
        self.directory.iter().copied()
    }

    pub fn lookup(&self, name: &str) -> Option<ModuleId> {
        self.directory
            .iter()
            .find(|(id, _)| id.name() == name)
            .map(|(id, _)| *id)
    }

    /// `None` if no such module is registered.
    pub fn is_enabled(&self, module: ModuleId) -> Option<bool> {
        self.directory
            .iter()
            .find(|(id, _)| *id == module)
            .map(|(_, lifecycle)| lifecycle.is_enabled())
    }

    /// Ask the core to enable/disable `module` after this hook returns.
    pub fn request_enabled(&mut self, module: ModuleId, enabled: bool) -> Result<(), ModuleError> {
        if self.is_enabled(module).is_none() {
            return Err(ModuleError::UnknownModule(module.name().to_string()));
        }
        self.requests
            .push((module, enabled))
            .map_err(|_| ModuleError::RegistryFull(MAX_MODULES))
    }
}
