//! Flight Common Library
//!
//! Shared constants, configuration loading and the vocabulary types exchanged
//! between the host adapter, the flight core and its modules.
//!
//! # Module Structure
//!
//! - [`consts`] - Capacity limits and defaults
//! - [`config`] - Configuration loading traits and types
//! - [`flight`] - Telemetry, control output, reference frames, claims, errors
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use flight_common::prelude::*;
//!
//! let setpoint = AttitudeSetpoint::new(ReferenceFrame::Orbit, Direction::Forward.into());
//! assert_eq!(setpoint.frame, ReferenceFrame::Orbit);
//! ```

pub mod config;
pub mod consts;
pub mod flight;
pub mod prelude;
