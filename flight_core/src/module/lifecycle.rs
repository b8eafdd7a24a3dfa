//! Module lifecycle: `Uninitialized → Disabled ⇄ Enabled → Destroyed`.
//!
//! Transitions are pure functions; the core applies the returned state and
//! fires the activation hooks the result asks for.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifecycle {
    /// Registered, awake not yet received.
    #[default]
    Uninitialized,
    Disabled,
    Enabled,
    /// Terminal.
    Destroyed,
}

impl Lifecycle {
    #[inline]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }

    #[inline]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Disabled | Self::Enabled)
    }
}

/// What an enable request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableTransition {
    /// `Disabled → Enabled`; fire `on_module_enabled`.
    Activated,
    /// `Enabled → Disabled`; fire `on_module_disabled`.
    Deactivated,
    /// Already in the requested state; no hook, no state change.
    Unchanged,
    /// Not allowed from the current state.
    Rejected(&'static str),
}

/// Evaluate `set_enabled(enabled)` from `current`.
pub const fn enable_transition(current: Lifecycle, enabled: bool) -> (Lifecycle, EnableTransition) {
    match (current, enabled) {
        (Lifecycle::Disabled, true) => (Lifecycle::Enabled, EnableTransition::Activated),
        (Lifecycle::Enabled, false) => (Lifecycle::Disabled, EnableTransition::Deactivated),
        (Lifecycle::Enabled, true) | (Lifecycle::Disabled, false) => {
            (current, EnableTransition::Unchanged)
        }
        (Lifecycle::Uninitialized, _) => (
            current,
            EnableTransition::Rejected("module has not received awake"),
        ),
        (Lifecycle::Destroyed, _) => (current, EnableTransition::Rejected("module destroyed")),
    }
}

/// Awake moves a fresh module to `Disabled`; any other state is kept.
pub const fn awake_transition(current: Lifecycle) -> Lifecycle {
    match current {
        Lifecycle::Uninitialized => Lifecycle::Disabled,
        other => other,
    }
}
