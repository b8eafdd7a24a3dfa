//! Translation-mode driver: writes its speed hold into the translation
//! register every active tick and clears the register when disabled.

use flight_common::prelude::{ModuleId, TranslationCommand, TranslationMode};

use crate::module::{FlightModule, HookResult, ModuleContext};
use crate::settings::{FlightRecord, SettingsScope};
use crate::ui::{UiSurface, WindowRect};

pub const TRANSLATRON: ModuleId = ModuleId::new("Translatron");

const SPEED_STEP: f64 = 1.0;

#[derive(Debug, Default)]
pub struct Translatron {
    command: TranslationCommand,
}

impl Translatron {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command(&self) -> TranslationCommand {
        self.command
    }

    pub fn set_command(&mut self, command: TranslationCommand) {
        self.command = command;
    }
}

impl FlightModule for Translatron {
    fn id(&self) -> ModuleId {
        TRANSLATRON
    }

    fn default_window_size(&self) -> WindowRect {
        WindowRect::new(260.0, 80.0, 200.0, 160.0)
    }

    fn on_module_disabled(&mut self, ctx: &mut ModuleContext<'_>) -> HookResult {
        ctx.set_translation(TranslationCommand::OFF);
        Ok(())
    }

    fn on_active_fixed_update(&mut self, ctx: &mut ModuleContext<'_>) -> HookResult {
        if self.command.is_active() {
            ctx.set_translation(self.command);
        }
        Ok(())
    }

    fn draw_ui(&mut self, ctx: &mut ModuleContext<'_>, ui: &mut dyn UiSurface) -> HookResult {
        ui.label(&format!(
            "{} {:.1} m/s{}",
            self.command.mode,
            self.command.target_speed,
            if self.command.kill_lateral { " +kill" } else { "" }
        ));
        for mode in [
            TranslationMode::Off,
            TranslationMode::KeepOrbital,
            TranslationMode::KeepSurface,
            TranslationMode::KeepVertical,
        ] {
            if ui.button(mode.name()) {
                self.command.mode = mode;
                if mode == TranslationMode::Off {
                    ctx.set_translation(TranslationCommand::OFF);
                }
            }
        }
        if ui.button("+") {
            self.command.target_speed += SPEED_STEP;
        }
        if ui.button("-") {
            self.command.target_speed -= SPEED_STEP;
        }
        if ui.button("kill h/s") {
            self.command.kill_lateral = !self.command.kill_lateral;
        }
        Ok(())
    }

    fn on_flight_state_save(&mut self, record: &mut FlightRecord) -> HookResult {
        record.set("mode", self.command.mode);
        Ok(())
    }

    fn on_flight_state_load(&mut self, record: &FlightRecord) -> HookResult {
        self.command.mode = record.get_parsed_or("mode", TranslationMode::Off);
        Ok(())
    }

    fn on_save_global_settings(&mut self, settings: &mut SettingsScope<'_>) -> HookResult {
        settings.set_decimal("targetSpeed", self.command.target_speed);
        settings.set_boolean("killLateral", self.command.kill_lateral);
        Ok(())
    }

    fn on_load_global_settings(&mut self, settings: &SettingsScope<'_>) -> HookResult {
        self.command.target_speed = settings.get_decimal("targetSpeed", 0.0);
        self.command.kill_lateral = settings.get_boolean("killLateral", false);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsStore;

    #[test]
    fn global_settings_round_trip() {
        let mut module = Translatron::new();
        module.set_command(TranslationCommand::new(TranslationMode::KeepSurface, 12.5, true));
        let mut store = SettingsStore::new();
        module
            .on_save_global_settings(&mut SettingsScope::new(&mut store, TRANSLATRON))
            .unwrap();

        let mut reparsed = SettingsStore::parse(&store.to_text());
        let mut restored = Translatron::new();
        restored
            .on_load_global_settings(&SettingsScope::new(&mut reparsed, TRANSLATRON))
            .unwrap();
        assert_eq!(restored.command().target_speed, 12.5);
        assert!(restored.command().kill_lateral);
        // Mode is per-vehicle, not global.
        assert_eq!(restored.command().mode, TranslationMode::Off);
    }

    #[test]
    fn mode_persists_per_vehicle() {
        let mut module = Translatron::new();
        module.set_command(TranslationCommand::new(TranslationMode::KeepVertical, 0.0, false));
        let mut record = FlightRecord::new();
        module.on_flight_state_save(&mut record).unwrap();
        assert_eq!(record.get("mode"), Some("vertical"));

        let mut restored = Translatron::new();
        restored.on_flight_state_load(&record).unwrap();
        assert_eq!(restored.command().mode, TranslationMode::KeepVertical);
    }
}
