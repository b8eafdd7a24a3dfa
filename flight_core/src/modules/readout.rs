//! Telemetry panel. UI only; never touches the arbiter.

use flight_common::prelude::ModuleId;

use crate::module::{FlightModule, HookResult, ModuleContext};
use crate::settings::SettingsScope;
use crate::ui::{UiSurface, WindowRect};

pub const READOUT: ModuleId = ModuleId::new("Readout");

#[derive(Debug)]
pub struct Readout {
    show_orbit: bool,
}

impl Default for Readout {
    fn default() -> Self {
        Self { show_orbit: true }
    }
}

impl Readout {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlightModule for Readout {
    fn id(&self) -> ModuleId {
        READOUT
    }

    fn enabled_by_default(&self) -> bool {
        true
    }

    fn default_window_size(&self) -> WindowRect {
        WindowRect::new(480.0, 80.0, 220.0, 260.0)
    }

    fn draw_ui(&mut self, ctx: &mut ModuleContext<'_>, ui: &mut dyn UiSurface) -> HookResult {
        let state = ctx.vessel_state();
        if !state.is_valid() {
            ui.label("No telemetry");
            return Ok(());
        }
        ui.label(&format!("Altitude (ASL)   {:>10.1} m", state.altitude_asl.value()));
        ui.label(&format!("Altitude (true)  {:>10.1} m", state.altitude_true.value()));
        ui.label(&format!("Vertical speed   {:>10.2} m/s", state.speed_vertical.value()));
        ui.label(&format!("Surface speed    {:>10.2} m/s", state.speed_surface.value()));
        ui.label(&format!("Heading {:>5.1}  Pitch {:>5.1}", state.heading.value(), state.pitch.value()));
        if self.show_orbit {
            ui.label(&format!("Apoapsis   {:>10.0} m", state.apoapsis.value()));
            ui.label(&format!("Periapsis  {:>10.0} m", state.periapsis.value()));
            ui.label(&format!("Inclination {:>6.2}°", state.inclination.value()));
        }
        let owner = ctx.attitude_owner().map_or("none", ModuleId::name);
        ui.label(&format!("Attitude: {owner}"));
        if ui.button(if self.show_orbit { "Hide orbit" } else { "Show orbit" }) {
            self.show_orbit = !self.show_orbit;
        }
        Ok(())
    }

    fn on_save_global_settings(&mut self, settings: &mut SettingsScope<'_>) -> HookResult {
        settings.set_boolean("showOrbit", self.show_orbit);
        Ok(())
    }

    fn on_load_global_settings(&mut self, settings: &SettingsScope<'_>) -> HookResult {
        self.show_orbit = settings.get_boolean("showOrbit", true);
        Ok(())
    }
}
