//! The timer contract the AI core schedules reconsiderations through.

use std::time::Duration;

use pt_core::{AgentId, TimerHandle};

/// A one-shot timer service provided by the embedding host.
///
/// # Contract
///
/// - `create_timer` never fires synchronously; the fire is delivered by the
///   host loop after the current callback returns.
/// - `cancel_timer` on an unknown, cancelled or already-fired handle is a
///   no-op.
pub trait TimerFacility {
    /// Arm a timer for `owner` that fires once after `delay`.
    fn create_timer(&mut self, owner: AgentId, delay: Duration) -> TimerHandle;

    /// Disarm `handle` so it never fires.
    fn cancel_timer(&mut self, handle: TimerHandle);
}
