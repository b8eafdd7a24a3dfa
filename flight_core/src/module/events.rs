//! Host lifecycle events and their mapping onto module hooks.

use std::fmt;

use super::{FlightModule, HookResult, ModuleContext};

/// Part-level notifications forwarded from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartEvent {
    Activate,
    Deactivate,
    Delete,
    /// Terminal: the core saves global settings and destroys every module.
    Destroy,
    Explode,
    Load,
    Splashdown,
    Touchdown,
}

impl PartEvent {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
            Self::Delete => "delete",
            Self::Destroy => "destroy",
            Self::Explode => "explode",
            Self::Load => "load",
            Self::Splashdown => "splashdown",
            Self::Touchdown => "touchdown",
        }
    }
}

/// Lifecycle events broadcast to every module regardless of enabled state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEvent {
    Awake,
    Start,
    FlightStart,
    FlightStartAtLaunchpad,
    Liftoff,
    Backup,
    Decouple,
    Disconnect,
    Pack,
    Unpack,
    Part(PartEvent),
    GamePause,
    GameResume,
}

impl HostEvent {
    /// Hook name, used in fault records and logs.
    pub const fn hook_name(self) -> &'static str {
        match self {
            Self::Awake => "on_awake",
            Self::Start => "on_start",
            Self::FlightStart => "on_flight_start",
            Self::FlightStartAtLaunchpad => "on_flight_start_at_launchpad",
            Self::Liftoff => "on_liftoff",
            Self::Backup => "on_backup",
            Self::Decouple => "on_decouple",
            Self::Disconnect => "on_disconnect",
            Self::Pack => "on_pack",
            Self::Unpack => "on_unpack",
            Self::Part(_) => "on_part_event",
            Self::GamePause => "on_game_pause",
            Self::GameResume => "on_game_resume",
        }
    }

    /// Call the matching hook on `module`.
    pub fn dispatch(
        self,
        module: &mut dyn FlightModule,
        ctx: &mut ModuleContext<'_>,
    ) -> HookResult {
        match self {
            Self::Awake => module.on_awake(ctx),
            Self::Start => module.on_start(ctx),
            Self::FlightStart => module.on_flight_start(ctx),
            Self::FlightStartAtLaunchpad => module.on_flight_start_at_launchpad(ctx),
            Self::Liftoff => module.on_liftoff(ctx),
            Self::Backup => module.on_backup(ctx),
            Self::Decouple => module.on_decouple(ctx),
            Self::Disconnect => module.on_disconnect(ctx),
            Self::Pack => module.on_pack(ctx),
            Self::Unpack => module.on_unpack(ctx),
            Self::Part(event) => module.on_part_event(ctx, event),
            Self::GamePause => module.on_game_pause(ctx),
            Self::GameResume => module.on_game_resume(ctx),
        }
    }
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Part(event) => write!(f, "part {}", event.name()),
            other => f.write_str(other.hook_name().trim_start_matches("on_")),
        }
    }
}
