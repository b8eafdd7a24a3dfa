//! Error and diagnostic types.
//!
//! Module faults and scripting errors are `thiserror` enums; the per-tick
//! arbitration outcome is a bitflag set reported with every tick.

use std::fmt;

use bitflags::bitflags;
use thiserror::Error;

bitflags! {
    /// What the arbitration step did this tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ArbitrationFlags: u8 {
        /// An attitude claim was active.
        const ATTITUDE_ACTIVE     = 0x01;
        /// The claim could not be resolved; torque forced to zero.
        const ATTITUDE_DEGENERATE = 0x02;
        /// The translation register was not `Off`.
        const TRANSLATION_ACTIVE  = 0x04;
        /// Lateral velocity kill wrote the RCS axes.
        const LATERAL_KILL        = 0x08;
        /// Throttle demand exceeded full throttle.
        const THROTTLE_SATURATED  = 0x10;
        /// At least one module hook faulted this tick.
        const HOOK_FAULT          = 0x20;
    }
}

impl Default for ArbitrationFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Category of a scripting/automation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptErrorKind {
    /// Blank command line.
    Empty,
    /// First word is not a known command.
    UnknownCommand,
    /// Missing or unparsable argument.
    BadArgument,
    /// Command names a module that is not registered.
    UnknownModule,
    /// The core side of the command channel is gone.
    Disconnected,
}

impl fmt::Display for ScriptErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty command",
            Self::UnknownCommand => "unknown command",
            Self::BadArgument => "bad argument",
            Self::UnknownModule => "unknown module",
            Self::Disconnected => "disconnected",
        };
        f.write_str(name)
    }
}

/// Structured error returned at the scripting boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ScriptError {
    pub kind: ScriptErrorKind,
    pub message: String,
}

impl ScriptError {
    pub fn new(kind: ScriptErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Failure of a module hook or of a registry operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModuleError {
    /// The hook reported a failure.
    #[error("hook failed: {0}")]
    Hook(String),

    /// The hook panicked; the panic was contained.
    #[error("hook panicked: {0}")]
    Panicked(String),

    /// No free slot left in the registry.
    #[error("module registry full ({0} modules)")]
    RegistryFull(usize),

    /// A module of the same type is already registered.
    #[error("module {0} already registered")]
    Duplicate(String),

    /// No registered module carries this name.
    #[error("unknown module {0}")]
    UnknownModule(String),

    #[error(transparent)]
    Script(#[from] ScriptError),
}

impl ModuleError {
    pub fn hook(message: impl Into<String>) -> Self {
        Self::Hook(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_error_display_has_kind_and_message() {
        let err = ScriptError::new(ScriptErrorKind::BadArgument, "speed 'fast' is not a number");
        assert_eq!(err.to_string(), "bad argument: speed 'fast' is not a number");
    }

    #[test]
    fn script_error_converts_into_module_error() {
        let err: ModuleError = ScriptError::new(ScriptErrorKind::Empty, "").into();
        assert!(matches!(err, ModuleError::Script(_)));
    }

    #[test]
    fn flags_combine() {
        let flags = ArbitrationFlags::ATTITUDE_ACTIVE | ArbitrationFlags::ATTITUDE_DEGENERATE;
        assert!(flags.contains(ArbitrationFlags::ATTITUDE_ACTIVE));
        assert!(!flags.contains(ArbitrationFlags::TRANSLATION_ACTIVE));
        assert!(ArbitrationFlags::default().is_empty());
    }
}
