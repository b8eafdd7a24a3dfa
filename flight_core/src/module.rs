//! Module framework: the [`FlightModule`] capability trait, its lifecycle,
//! the per-hook [`ModuleContext`] and the ordered [`ModuleRegistry`].
//!
//! ## Dispatch Rules
//!
//! - Lifecycle events reach every module in registration order, enabled or not.
//! - `on_active_*`, `drive` and `draw_ui` reach enabled modules only.
//! - `on_module_enabled` / `on_module_disabled` fire only from the core's
//!   enable setter, synchronously, and only on an actual state change.
//! - Every hook returns a [`HookResult`]; the core contains failures.

pub mod context;
pub mod events;
pub mod lifecycle;
pub mod registry;

use flight_common::prelude::{AttitudeChange, ControlOutput, ModuleError, ModuleId};

use crate::settings::{FlightRecord, SettingsScope};
use crate::ui::{UiSurface, WindowRect};

pub use context::{Directory, EnableRequests, ModuleContext};
pub use events::{HostEvent, PartEvent};
pub use lifecycle::{EnableTransition, Lifecycle, enable_transition};
pub use registry::{ModuleRegistry, ModuleSlot};

pub type HookResult = Result<(), ModuleError>;

/// A unit of flight behavior. All hooks default to no-ops.
pub trait FlightModule {
    /// Stable identity, the behavior type name.
    fn id(&self) -> ModuleId;

    /// Window caption.
    fn title(&self) -> &str {
        self.id().name()
    }

    /// Enabled state applied at awake when no setting is stored.
    fn enabled_by_default(&self) -> bool {
        false
    }

    fn default_window_size(&self) -> WindowRect {
        WindowRect::default()
    }

    // ─── Enable Transitions ─────────────────────────────────────────

    fn on_module_enabled(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    fn on_module_disabled(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    // ─── Arbitration ────────────────────────────────────────────────

    /// Every module sees every attitude change, including its own claims.
    fn on_attitude_change(
        &mut self,
        _ctx: &mut ModuleContext<'_>,
        _change: &AttitudeChange,
    ) -> HookResult {
        Ok(())
    }

    // ─── Host Lifecycle ─────────────────────────────────────────────

    fn on_awake(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    fn on_start(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    fn on_flight_start(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    fn on_flight_start_at_launchpad(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    fn on_liftoff(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    fn on_backup(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    fn on_decouple(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    fn on_disconnect(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    fn on_pack(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    fn on_unpack(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    fn on_part_event(&mut self, _ctx: &mut ModuleContext<'_>, _event: PartEvent) -> HookResult {
        Ok(())
    }

    fn on_game_pause(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    fn on_game_resume(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    // ─── Per-Tick ───────────────────────────────────────────────────

    fn on_fixed_update(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    fn on_update(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    /// Enabled only. Claims made here govern this tick's arbitration.
    fn on_active_fixed_update(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    /// Enabled only.
    fn on_active_update(&mut self, _ctx: &mut ModuleContext<'_>) -> HookResult {
        Ok(())
    }

    /// Enabled only. Refines the arbitrated control record.
    fn drive(&mut self, _ctx: &mut ModuleContext<'_>, _output: &mut ControlOutput) -> HookResult {
        Ok(())
    }

    /// Enabled only, inside this module's window.
    fn draw_ui(&mut self, _ctx: &mut ModuleContext<'_>, _ui: &mut dyn UiSurface) -> HookResult {
        Ok(())
    }

    // ─── Persistence ────────────────────────────────────────────────

    fn on_flight_state_save(&mut self, _record: &mut FlightRecord) -> HookResult {
        Ok(())
    }

    fn on_flight_state_load(&mut self, _record: &FlightRecord) -> HookResult {
        Ok(())
    }

    fn on_save_global_settings(&mut self, _settings: &mut SettingsScope<'_>) -> HookResult {
        Ok(())
    }

    fn on_load_global_settings(&mut self, _settings: &SettingsScope<'_>) -> HookResult {
        Ok(())
    }
}
