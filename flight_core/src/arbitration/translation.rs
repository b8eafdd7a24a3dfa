//! Translation register: last write wins, independent of the attitude claim.

use flight_common::prelude::TranslationCommand;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct TranslationRegister {
    command: TranslationCommand,
}

impl TranslationRegister {
    #[inline]
    pub fn get(&self) -> TranslationCommand {
        self.command
    }

    /// Overwrite the register; returns the previous contents.
    pub fn set(&mut self, command: TranslationCommand) -> TranslationCommand {
        if command != self.command {
            debug!(
                mode = %command.mode,
                speed = command.target_speed,
                kill_lateral = command.kill_lateral,
                "translation set"
            );
        }
        std::mem::replace(&mut self.command, command)
    }
}
