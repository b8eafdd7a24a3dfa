//! Arbitration vocabulary: claimant identity, attitude setpoints,
//! change notifications and the translation register contents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::frame::{AttitudeTarget, ReferenceFrame};

/// Identity of a module or external claimant.
///
/// Modules use their behavior type name; external consumers pick a name of
/// their own (e.g. `"ScriptConsole"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(&'static str);

impl ModuleId {
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Frame + target pair held by the attitude claim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttitudeSetpoint {
    pub frame: ReferenceFrame,
    pub target: AttitudeTarget,
}

impl AttitudeSetpoint {
    pub const fn new(frame: ReferenceFrame, target: AttitudeTarget) -> Self {
        Self { frame, target }
    }

    /// Same frame and a bitwise-identical target. Unlike `==`, a setpoint
    /// with a NaN component is the same as itself.
    pub fn same_as(&self, other: &Self) -> bool {
        self.frame == other.frame && self.target.same_as(&other.target)
    }
}

impl fmt::Display for AttitudeSetpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.frame, self.target)
    }
}

/// Broadcast to every module when the attitude claim changes hands or target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttitudeChange {
    /// Claimant before the change (`None` if the channel was idle).
    pub old_owner: Option<ModuleId>,
    /// Setpoint before the change.
    pub old: Option<AttitudeSetpoint>,
    /// Claimant after the change.
    pub new_owner: ModuleId,
    /// Setpoint after the change.
    pub new: AttitudeSetpoint,
}

impl AttitudeChange {
    /// True if `module` held the claim before and no longer does.
    #[inline]
    pub fn preempted(&self, module: ModuleId) -> bool {
        self.old_owner == Some(module) && self.new_owner != module
    }
}

/// Mode of the translation/throttle register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TranslationMode {
    /// Throttle is whatever the drive hooks write.
    #[default]
    Off = 0,
    /// Hold orbital speed.
    KeepOrbital = 1,
    /// Hold surface speed.
    KeepSurface = 2,
    /// Hold vertical speed.
    KeepVertical = 3,
}

impl TranslationMode {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::KeepOrbital => "orbital",
            Self::KeepSurface => "surface",
            Self::KeepVertical => "vertical",
        }
    }
}

impl fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TranslationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "orbital" | "keep_orbital" => Ok(Self::KeepOrbital),
            "surface" | "keep_surface" => Ok(Self::KeepSurface),
            "vertical" | "keep_vertical" => Ok(Self::KeepVertical),
            other => Err(format!("unknown translation mode '{other}'")),
        }
    }
}

/// Contents of the single translation register.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TranslationCommand {
    pub mode: TranslationMode,
    /// Target speed along the mode's axis [m/s].
    pub target_speed: f64,
    /// Cancel horizontal surface velocity through the RCS axes.
    pub kill_lateral: bool,
}

impl TranslationCommand {
    pub const OFF: Self = Self {
        mode: TranslationMode::Off,
        target_speed: 0.0,
        kill_lateral: false,
    };

    pub const fn new(mode: TranslationMode, target_speed: f64, kill_lateral: bool) -> Self {
        Self {
            mode,
            target_speed,
            kill_lateral,
        }
    }

    #[inline]
    pub const fn is_active(&self) -> bool {
        !matches!(self.mode, TranslationMode::Off)
    }
}
