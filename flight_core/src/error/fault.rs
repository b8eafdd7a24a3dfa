use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use flight_common::consts::LAST_ERROR_CAPACITY;
use flight_common::prelude::{ModuleError, ModuleId};

/// Run one hook inside the fault boundary.
pub fn guarded<F>(hook: F) -> Result<(), ModuleError>
where
    F: FnOnce() -> Result<(), ModuleError>,
{
    match catch_unwind(AssertUnwindSafe(hook)) {
        Ok(result) => result,
        Err(payload) => Err(ModuleError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Most recent failure seen by the core, hook fault or scripting error.
#[derive(Debug, Clone, PartialEq)]
pub struct FaultRecord {
    /// Module or external client that failed.
    pub source: ModuleId,
    /// Hook or operation name.
    pub context: &'static str,
    /// Truncated to [`LAST_ERROR_CAPACITY`] bytes on a char boundary.
    pub message: heapless::String<LAST_ERROR_CAPACITY>,
    pub tick: u64,
}

impl FaultRecord {
    pub fn new(source: ModuleId, context: &'static str, message: &str, tick: u64) -> Self {
        let mut bounded = heapless::String::new();
        for c in message.chars() {
            if bounded.push(c).is_err() {
                break;
            }
        }
        Self {
            source,
            context,
            message: bounded,
            tick,
        }
    }
}

impl std::fmt::Display for FaultRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}::{} at tick {}: {}",
            self.source, self.context, self.tick, self.message
        )
    }
}
