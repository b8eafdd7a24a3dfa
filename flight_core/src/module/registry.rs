//! Fixed-capacity, registration-ordered module collection.

use std::fmt;

use flight_common::consts::MAX_MODULES;
use flight_common::prelude::{ModuleError, ModuleId};

use super::FlightModule;
use super::context::Directory;
use super::lifecycle::Lifecycle;
use crate::ui::WindowRect;

pub struct ModuleSlot {
    pub module: Box<dyn FlightModule>,
    pub lifecycle: Lifecycle,
    pub window: WindowRect,
    pub window_visible: bool,
}

impl ModuleSlot {
    fn new(module: Box<dyn FlightModule>) -> Self {
        let window = module.default_window_size();
        Self {
            module,
            lifecycle: Lifecycle::Uninitialized,
            window,
            window_visible: true,
        }
    }

    #[inline]
    pub fn id(&self) -> ModuleId {
        self.module.id()
    }
}

#[derive(Default)]
pub struct ModuleRegistry {
    slots: heapless::Vec<ModuleSlot, MAX_MODULES>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a module; returns its slot index. One module per id.
    pub fn register(&mut self, module: Box<dyn FlightModule>) -> Result<usize, ModuleError> {
        let id = module.id();
        if self.index_of(id).is_some() {
            return Err(ModuleError::Duplicate(id.name().to_string()));
        }
        self.slots
            .push(ModuleSlot::new(module))
            .map_err(|_| ModuleError::RegistryFull(MAX_MODULES))?;
        Ok(self.slots.len() - 1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn index_of(&self, id: ModuleId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id() == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<ModuleId> {
        self.slots
            .iter()
            .map(ModuleSlot::id)
            .find(|id| id.name().eq_ignore_ascii_case(name))
    }

    pub fn get(&self, index: usize) -> Option<&ModuleSlot> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ModuleSlot> {
        self.slots.get_mut(index)
    }

    pub fn lifecycle(&self, id: ModuleId) -> Option<Lifecycle> {
        self.index_of(id).map(|i| self.slots[i].lifecycle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleSlot> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ModuleSlot> {
        self.slots.iter_mut()
    }

    /// Snapshot of ids and lifecycles for module contexts.
    pub fn directory(&self) -> Directory {
        let mut directory = Directory::new();
        for slot in &self.slots {
            // Same capacity as the registry.
            let _ = directory.push((slot.id(), slot.lifecycle));
        }
        directory
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|s| (s.id(), s.lifecycle)))
            .finish()
    }
}
