//! Attitude holder: keeps the vessel pointed along an axis of a reference
//! frame, and lets go when another claimant takes over.

use flight_common::prelude::{AttitudeChange, AttitudeSetpoint, Direction, ModuleId, ReferenceFrame};
use tracing::info;

use crate::module::{FlightModule, HookResult, ModuleContext};
use crate::settings::{FlightRecord, SettingsScope};
use crate::ui::{UiSurface, WindowRect};

pub const SMART_ASS: ModuleId = ModuleId::new("SmartAss");

const BUTTONS: [(&str, ReferenceFrame, Direction); 6] = [
    ("Prograde", ReferenceFrame::Orbit, Direction::Forward),
    ("Retrograde", ReferenceFrame::Orbit, Direction::Back),
    ("Normal", ReferenceFrame::Orbit, Direction::Right),
    ("Anti-normal", ReferenceFrame::Orbit, Direction::Left),
    ("Radial out", ReferenceFrame::Orbit, Direction::Up),
    ("Surface up", ReferenceFrame::SurfaceNorth, Direction::Up),
];

#[derive(Debug, Default)]
pub struct SmartAss {
    hold: Option<(ReferenceFrame, Direction)>,
    /// Frame used by the last engaged hold, remembered across vehicles.
    preferred_frame: Option<ReferenceFrame>,
}

impl SmartAss {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(&self) -> Option<(ReferenceFrame, Direction)> {
        self.hold
    }

    pub fn engage(&mut self, frame: ReferenceFrame, direction: Direction) {
        self.hold = Some((frame, direction));
        self.preferred_frame = Some(frame);
    }

    fn setpoint(&self) -> Option<AttitudeSetpoint> {
        self.hold
            .map(|(frame, direction)| AttitudeSetpoint::new(frame, direction.into()))
    }
}

impl FlightModule for SmartAss {
    fn id(&self) -> ModuleId {
        SMART_ASS
    }

    fn title(&self) -> &str {
        "Smart A.S.S."
    }

    fn default_window_size(&self) -> WindowRect {
        WindowRect::new(60.0, 80.0, 180.0, 220.0)
    }

    fn on_module_disabled(&mut self, ctx: &mut ModuleContext<'_>) -> HookResult {
        ctx.release_attitude();
        Ok(())
    }

    fn on_attitude_change(
        &mut self,
        ctx: &mut ModuleContext<'_>,
        change: &AttitudeChange,
    ) -> HookResult {
        if change.preempted(ctx.id()) && self.hold.is_some() {
            info!("attitude taken over by {}, disengaging", change.new_owner);
            self.hold = None;
        }
        Ok(())
    }

    fn on_active_fixed_update(&mut self, ctx: &mut ModuleContext<'_>) -> HookResult {
        if let Some(setpoint) = self.setpoint() {
            ctx.claim_attitude(setpoint);
        }
        Ok(())
    }

    fn draw_ui(&mut self, ctx: &mut ModuleContext<'_>, ui: &mut dyn UiSurface) -> HookResult {
        match self.hold {
            Some((frame, direction)) => ui.label(&format!("Holding {direction} ({frame})")),
            None => ui.label("Off"),
        }
        for (caption, frame, direction) in BUTTONS {
            if ui.button(caption) {
                self.engage(frame, direction);
            }
        }
        if ui.button("Off") {
            self.hold = None;
            ctx.release_attitude();
        }
        Ok(())
    }

    fn on_flight_state_save(&mut self, record: &mut FlightRecord) -> HookResult {
        match self.hold {
            Some((frame, direction)) => {
                record.set("frame", frame);
                record.set("direction", direction);
            }
            None => record.set("frame", "off"),
        }
        Ok(())
    }

    fn on_flight_state_load(&mut self, record: &FlightRecord) -> HookResult {
        let frame = record.get("frame").and_then(|f| f.parse::<ReferenceFrame>().ok());
        let direction = record.get("direction").and_then(|d| d.parse::<Direction>().ok());
        self.hold = frame.zip(direction);
        Ok(())
    }

    fn on_save_global_settings(&mut self, settings: &mut SettingsScope<'_>) -> HookResult {
        if let Some(frame) = self.preferred_frame {
            settings.set_string("preferredFrame", frame.name());
        }
        Ok(())
    }

    fn on_load_global_settings(&mut self, settings: &SettingsScope<'_>) -> HookResult {
        self.preferred_frame = settings
            .get_string("preferredFrame", "")
            .parse::<ReferenceFrame>()
            .ok();
        Ok(())
    }
}
