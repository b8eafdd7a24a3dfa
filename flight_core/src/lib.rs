//! # Flight Core Library
//!
//! Flight-automation core hosted inside a physics simulation it does not own.
//! Every physics tick the host hands over telemetry; the core rebuilds the
//! smoothed vessel state, dispatches lifecycle and tick hooks to every
//! registered module, arbitrates one owner per actuation channel and hands a
//! single control record back.
//!
//! ## Tick Phases
//!
//! 1. **Snapshot**: [`vessel_state::VesselState::update`]
//! 2. **Fixed update**: all modules, then enabled modules (claims happen here)
//! 3. **Arbitration**: attitude torque + throttle/lateral correction
//! 4. **Drive**: enabled modules refine the arbitrated record
//!
//! ## Single-Threaded Contract
//!
//! Everything runs on the host's tick thread. Arbitration is last-write-wins
//! with no locking; external consumers on other threads go through
//! [`command::ExternalClient`], drained at the start of each tick.

pub mod arbitration;
pub mod command;
pub mod control;
pub mod cycle;
pub mod error;
pub mod module;
pub mod modules;
pub mod settings;
pub mod sim;
pub mod ui;
pub mod vessel_state;
