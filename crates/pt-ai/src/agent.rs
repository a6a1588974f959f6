//! The `Agent` trait: the world-side handle a controller drives.

/// The embedding application's handle on one AI-controlled entity.
///
/// The controller treats the agent as opaque.  Rule callbacks read and
/// write its domain state through the [`Ai`][crate::Ai] context; the core
/// itself only asks whether it is still alive and hands it rendered
/// communications.
pub trait Agent: 'static {
    /// Argument passed to event handlers (the attacker, the docking
    /// station, …).  Use an enum when events carry different arguments.
    type Payload: 'static;

    /// `false` once the entity has left the world.  A reconsideration that
    /// fires against an invalid agent is dropped without evaluation.
    fn is_valid(&self) -> bool;

    /// Deliver a rendered communication.
    ///
    /// Default: the message is discarded.
    fn comms_message(&mut self, _message: &str) {}
}
