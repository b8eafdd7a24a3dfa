//! Attitude claim: one owner, replaced by every new claim.
//!
//! A claim that changes the owner, frame or target queues one
//! [`AttitudeChange`]; the core drains the queue after the hook that made the
//! claim returns and broadcasts each change to every module. Releasing never
//! notifies.

use flight_common::consts::MAX_PENDING_NOTIFICATIONS;
use flight_common::prelude::{AttitudeChange, AttitudeSetpoint, ModuleId};
use heapless::Deque;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AttitudeClaim {
    #[default]
    Idle,
    Claimed {
        owner: ModuleId,
        setpoint: AttitudeSetpoint,
    },
}

impl AttitudeClaim {
    pub fn owner(&self) -> Option<ModuleId> {
        match self {
            Self::Idle => None,
            Self::Claimed { owner, .. } => Some(*owner),
        }
    }

    pub fn setpoint(&self) -> Option<AttitudeSetpoint> {
        match self {
            Self::Idle => None,
            Self::Claimed { setpoint, .. } => Some(*setpoint),
        }
    }
}

/// Result of [`AttitudeArbiter::claim`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClaimOutcome {
    /// Same owner, frame and target as before; nothing queued.
    Unchanged,
    /// Claim replaced; the change was queued for broadcast.
    Changed(AttitudeChange),
}

#[derive(Debug, Default)]
pub struct AttitudeArbiter {
    claim: AttitudeClaim,
    /// Bumped on every change; controllers reset when it moves.
    generation: u64,
    pending: Deque<AttitudeChange, MAX_PENDING_NOTIFICATIONS>,
    overflowed: u64,
}

impl AttitudeArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn claim_state(&self) -> AttitudeClaim {
        self.claim
    }

    #[inline]
    pub fn owner(&self) -> Option<ModuleId> {
        self.claim.owner()
    }

    #[inline]
    pub fn setpoint(&self) -> Option<AttitudeSetpoint> {
        self.claim.setpoint()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Notifications dropped because the queue was full.
    #[inline]
    pub fn overflowed(&self) -> u64 {
        self.overflowed
    }

    /// Take the claim. Always succeeds; the previous owner is replaced.
    pub fn claim(&mut self, requester: ModuleId, setpoint: AttitudeSetpoint) -> ClaimOutcome {
        let previous = self.claim;
        let same_setpoint = previous.setpoint().is_some_and(|old| old.same_as(&setpoint));
        if previous.owner() == Some(requester) && same_setpoint {
            return ClaimOutcome::Unchanged;
        }

        self.claim = AttitudeClaim::Claimed {
            owner: requester,
            setpoint,
        };
        self.generation = self.generation.wrapping_add(1);

        let change = AttitudeChange {
            old_owner: previous.owner(),
            old: previous.setpoint(),
            new_owner: requester,
            new: setpoint,
        };
        debug!(
            owner = %requester,
            previous = ?previous.owner().map(ModuleId::name),
            "attitude claimed: {setpoint}"
        );

        if let Err(change) = self.pending.push_back(change) {
            // Keep the newest changes; the oldest one is lost.
            self.pending.pop_front();
            let _ = self.pending.push_back(change);
            self.overflowed += 1;
            warn!("attitude notification queue full, oldest change dropped");
        }
        ClaimOutcome::Changed(change)
    }

    /// Clear the claim if `requester` owns it. Returns whether it did.
    pub fn release(&mut self, requester: ModuleId) -> bool {
        if self.claim.owner() != Some(requester) {
            return false;
        }
        self.claim = AttitudeClaim::Idle;
        self.generation = self.generation.wrapping_add(1);
        debug!(owner = %requester, "attitude released");
        true
    }

    /// Next queued change, oldest first.
    #[inline]
    pub fn next_notification(&mut self) -> Option<AttitudeChange> {
        self.pending.pop_front()
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
