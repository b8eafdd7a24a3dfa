//! Bundled behaviors built on the module framework.

pub mod readout;
pub mod smart_ass;
pub mod translatron;

pub use readout::Readout;
pub use smart_ass::SmartAss;
pub use translatron::Translatron;
