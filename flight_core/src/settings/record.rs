//! Per-vehicle flight state: one flat string section per module.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use flight_common::prelude::ModuleId;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::SettingsError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightRecord {
    values: BTreeMap<String, String>,
}

impl FlightRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Display) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Parsed value, or `default` when missing or unparsable (logged).
    pub fn get_parsed_or<T: FromStr>(&self, key: &str, default: T) -> T {
        match self.values.get(key) {
            None => default,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("flight record value {key}={raw:?} unparsable, using default");
                default
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// All module sections of one vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VesselRecord {
    #[serde(default)]
    pub modules: BTreeMap<String, FlightRecord>,
}

impl VesselRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, module: ModuleId) -> Option<&FlightRecord> {
        self.modules.get(module.name())
    }

    pub fn section_mut(&mut self, module: ModuleId) -> &mut FlightRecord {
        self.modules.entry(module.name().to_string()).or_default()
    }

    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string(self).map_err(|e| SettingsError::Encode(e.to_string()))
    }

    pub fn from_toml(text: &str) -> Result<Self, SettingsError> {
        toml::from_str(text).map_err(|e| SettingsError::Decode(e.to_string()))
    }
}
