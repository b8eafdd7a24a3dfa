//! Single-writer arbitration state.
//!
//! Two independent channels: the attitude claim ([`AttitudeArbiter`]) and the
//! translation register ([`TranslationRegister`]). Both are last-write-wins.
//! The core owns one [`ControlArbiter`] and lends it to hooks through the
//! module context; nothing here is global.

pub mod attitude;
pub mod translation;

pub use attitude::{AttitudeArbiter, AttitudeClaim, ClaimOutcome};
pub use translation::TranslationRegister;

#[derive(Debug, Default)]
pub struct ControlArbiter {
    pub attitude: AttitudeArbiter,
    pub translation: TranslationRegister,
}

impl ControlArbiter {
    pub fn new() -> Self {
        Self::default()
    }
}
