//! System-wide constants for the flight workspace.
//!
//! Single source of truth for capacity limits and default paths.

use static_assertions::const_assert;

/// Length of every smoothing ring buffer in the vessel state [ticks].
pub const SMOOTHING_WINDOW: usize = 10;

/// Maximum number of modules a core can register.
pub const MAX_MODULES: usize = 32;

/// Attitude-change notifications that can queue up during one hook call.
pub const MAX_PENDING_NOTIFICATIONS: usize = 16;

/// Notification flush rounds before a claim ping-pong is cut off.
pub const MAX_NOTIFICATION_ROUNDS: usize = 8;

/// Capacity of the bounded last-error message [bytes].
pub const LAST_ERROR_CAPACITY: usize = 192;

/// Physics step assumed when telemetry reports none [s].
pub const DEFAULT_FIXED_DELTA_TIME: f64 = 0.02;

/// Default global settings file name.
pub const DEFAULT_SETTINGS_FILE: &str = "flight_core_settings.cfg";

/// Base id for module windows handed to the UI host.
pub const DEFAULT_BASE_WINDOW_ID: u32 = 8_400;

const_assert!(SMOOTHING_WINDOW > 0);
const_assert!(MAX_MODULES > 0 && MAX_MODULES <= 256);
const_assert!(MAX_PENDING_NOTIFICATIONS >= 2);
