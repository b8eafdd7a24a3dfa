//! Flight vocabulary shared between the host adapter, the core and modules.
//!
//! Organized by domain: raw telemetry, the control output record, attitude
//! reference frames, arbitration commands, error types and configuration.

pub mod command;
pub mod config;
pub mod control;
pub mod error;
pub mod frame;
pub mod telemetry;
