//! Fault containment around module hooks.
//!
//! Every hook call goes through [`guarded`]: a returned error and a panic both
//! become a [`ModuleError`], the core logs it, records a [`FaultRecord`] and
//! moves on to the next module.

pub mod fault;

pub use fault::{FaultRecord, guarded};
