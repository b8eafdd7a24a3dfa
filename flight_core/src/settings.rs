//! Persistence: global module settings and per-vehicle flight records.
//!
//! Global settings use a line format shared across vehicles:
//!
//! ```text
//! SmartAss.windowPos=vector4,100,100,200,120
//! Translatron.targetSpeed=decimal,12.5
//! Readout.enabled=boolean,true
//! ```
//!
//! Flight records are per-module string sections serialized as TOML.

pub mod record;
pub mod store;

use thiserror::Error;

pub use record::{FlightRecord, VesselRecord};
pub use store::{SettingValue, SettingsScope, SettingsStore};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("flight record encoding failed: {0}")]
    Encode(String),

    #[error("flight record decoding failed: {0}")]
    Decode(String),
}
