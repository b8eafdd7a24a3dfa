//! Configuration structures for the flight core.
//!
//! All config types use `serde::Deserialize` for TOML loading. Numeric
//! parameters have const `MIN`/`MAX` bounds checked by `validate()`. Every
//! field has a default so an empty document is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SharedConfig};
use crate::consts::DEFAULT_SETTINGS_FILE;

pub const GAIN_MAX: f64 = 1_000.0;
pub const TIME_CONSTANT_MAX: f64 = 60.0;
pub const LOWPASS_HZ_MAX: f64 = 500.0;
pub const SPEED_TOLERANCE_MIN: f64 = 0.0;
pub const SPEED_TOLERANCE_MAX: f64 = 100.0;

// ─── Top-Level Config ───────────────────────────────────────────────

/// Top-level flight core configuration.
///
/// # TOML Example
///
/// ```toml
/// settings_path = "settings.cfg"
///
/// [shared]
/// log_level = "debug"
///
/// [attitude]
/// kp = 4.0
/// kd = 1.2
///
/// [throttle]
/// tolerance = 0.1
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightCoreConfig {
    pub shared: SharedConfig,
    pub attitude: AttitudeGains,
    pub throttle: ThrottleGains,
    /// Where global (cross-vehicle) module settings are persisted.
    pub settings_path: Option<String>,
}

impl FlightCoreConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.attitude
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("attitude: {e}")))?;
        self.throttle
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("throttle: {e}")))?;
        Ok(())
    }

    /// Settings path, falling back to the default file name.
    pub fn settings_path(&self) -> &str {
        self.settings_path.as_deref().unwrap_or(DEFAULT_SETTINGS_FILE)
    }
}

// ─── Attitude ───────────────────────────────────────────────────────

/// Per-axis PID gains of the attitude controller.
///
/// The same gains drive pitch, yaw and roll. Output is normalized torque.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttitudeGains {
    /// Proportional gain [1/rad].
    pub kp: f64,
    /// Integral gain (0 = disabled).
    pub ki: f64,
    /// Derivative gain (0 = disabled).
    pub kd: f64,
    /// Derivative filter time constant [s] (0 = unfiltered).
    pub tf: f64,
    /// Anti-windup tracking time constant [s] (0 = disabled).
    pub tt: f64,
    /// Torque output low-pass cutoff [Hz] (0 = disabled).
    pub lowpass_hz: f64,
}

impl Default for AttitudeGains {
    fn default() -> Self {
        Self {
            kp: 3.0,
            ki: 0.0,
            kd: 0.8,
            tf: 0.1,
            tt: 0.5,
            lowpass_hz: 0.0,
        }
    }
}

impl AttitudeGains {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [("kp", self.kp), ("ki", self.ki), ("kd", self.kd)] {
            if !(0.0..=GAIN_MAX).contains(&value) {
                return Err(format!("{name} {value} out of range [0, {GAIN_MAX}]"));
            }
        }
        for (name, value) in [("tf", self.tf), ("tt", self.tt)] {
            if !(0.0..=TIME_CONSTANT_MAX).contains(&value) {
                return Err(format!(
                    "{name} {value} out of range [0, {TIME_CONSTANT_MAX}]"
                ));
            }
        }
        if !(0.0..=LOWPASS_HZ_MAX).contains(&self.lowpass_hz) {
            return Err(format!(
                "lowpass_hz {} out of range [0, {LOWPASS_HZ_MAX}]",
                self.lowpass_hz
            ));
        }
        Ok(())
    }
}

// ─── Throttle ───────────────────────────────────────────────────────

/// Gains of the translation/throttle correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleGains {
    /// Throttle per (m/s of error / m/s² of thrust acceleration).
    pub kp: f64,
    /// Speed dead-band around the target [m/s]; correction is zero inside it.
    pub tolerance: f64,
    /// RCS demand per m/s of horizontal surface velocity.
    pub lateral_gain: f64,
}

impl Default for ThrottleGains {
    fn default() -> Self {
        Self {
            kp: 1.0,
            tolerance: 0.1,
            lateral_gain: 0.5,
        }
    }
}

impl ThrottleGains {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=GAIN_MAX).contains(&self.kp) {
            return Err(format!("kp {} out of range [0, {GAIN_MAX}]", self.kp));
        }
        if !(0.0..=GAIN_MAX).contains(&self.lateral_gain) {
            return Err(format!(
                "lateral_gain {} out of range [0, {GAIN_MAX}]",
                self.lateral_gain
            ));
        }
        if !(SPEED_TOLERANCE_MIN..=SPEED_TOLERANCE_MAX).contains(&self.tolerance) {
            return Err(format!(
                "tolerance {} out of range [{SPEED_TOLERANCE_MIN}, {SPEED_TOLERANCE_MAX}]",
                self.tolerance
            ));
        }
        Ok(())
    }
}
