//! Arbitration control laws.
//!
//! Attitude: per-axis PID on the vessel-frame orientation error, optional
//! low-pass on the torque command. Throttle: proportional speed hold along
//! the translation mode's axis with a dead-band, plus lateral velocity kill.
//! Zero gains disable the corresponding term.

pub mod attitude;
pub mod filters;
pub mod pid;
pub mod throttle;
