//! Simulation observer trait for progress reporting and data collection.

use pt_ai::{EventName, Reconsideration};
use pt_core::{AgentId, Tick};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — counting fault reports
///
/// ```rust,ignore
/// struct Faults(usize);
///
/// impl SimObserver for Faults {
///     fn on_reconsider(&mut self, _tick: Tick, _agent: AgentId, outcome: Reconsideration) {
///         if outcome == Reconsideration::NoMatch {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after each queued event has been offered to its agent.
    ///
    /// `handled` is `false` if nothing was bound to `name` or the agent has
    /// been destroyed since the event was posted.
    fn on_event(&mut self, _tick: Tick, _agent: AgentId, _name: &EventName, _handled: bool) {}

    /// Called after each reconsideration timer fire has been routed.
    fn on_reconsider(&mut self, _tick: Tick, _agent: AgentId, _outcome: Reconsideration) {}

    /// Called at the end of each tick.
    ///
    /// `fired` is the number of reconsideration timers delivered this tick.
    fn on_tick_end(&mut self, _tick: Tick, _fired: usize) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
