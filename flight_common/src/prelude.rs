//! Prelude module for common re-exports.
//!
//! ```rust
//! use flight_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};
pub use crate::flight::config::{AttitudeGains, FlightCoreConfig, ThrottleGains};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{MAX_MODULES, SMOOTHING_WINDOW};

// ─── Flight vocabulary ──────────────────────────────────────────────
pub use crate::flight::command::{
    AttitudeChange, AttitudeSetpoint, ModuleId, TranslationCommand, TranslationMode,
};
pub use crate::flight::control::ControlOutput;
pub use crate::flight::error::{ArbitrationFlags, ModuleError, ScriptError, ScriptErrorKind};
pub use crate::flight::frame::{AttitudeTarget, Direction, ReferenceFrame};
pub use crate::flight::telemetry::{BodyTelemetry, PartTelemetry, TargetTelemetry, VesselTelemetry};
