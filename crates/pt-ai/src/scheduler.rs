//! Single-slot reconsideration scheduler.

use std::time::Duration;

use pt_core::{AgentId, TimerHandle};
use pt_timer::TimerFacility;

/// Holds at most one pending reconsideration timer for one agent.
///
/// Scheduling replaces, never queues: the previous timer is cancelled
/// before the new one is armed.  When a timer fires the owner calls
/// [`detach`][Self::detach] before evaluating, so anything the evaluation
/// schedules lands in an empty slot.
#[derive(Debug, Default)]
pub struct Scheduler {
    slot: Option<TimerHandle>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any pending timer and arm a new one after `delay`.
    pub fn schedule(
        &mut self,
        timers: &mut dyn TimerFacility,
        owner:  AgentId,
        delay:  Duration,
    ) -> TimerHandle {
        self.cancel(timers);
        let handle = timers.create_timer(owner, delay);
        self.slot = Some(handle);
        tracing::debug!(agent = %owner, %handle, ?delay, "reconsideration scheduled");
        handle
    }

    /// Cancel the pending timer, if any.  Returns whether one was pending.
    pub fn cancel(&mut self, timers: &mut dyn TimerFacility) -> bool {
        match self.slot.take() {
            Some(handle) => {
                timers.cancel_timer(handle);
                true
            }
            None => false,
        }
    }

    /// Clear the slot for a timer that has just fired.
    ///
    /// Returns `false` (and leaves the slot alone) if `fired` is not the
    /// pending timer, i.e. the fire is stale.
    pub fn detach(&mut self, fired: TimerHandle) -> bool {
        if self.slot == Some(fired) {
            self.slot = None;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn pending(&self) -> Option<TimerHandle> {
        self.slot
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }
}
