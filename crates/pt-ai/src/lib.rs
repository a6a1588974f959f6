//! `pt-ai` — priority-tree evaluation and reconsideration for one agent.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`agent`]      | `Agent` trait, the world-side handle                          |
//! | [`rule`]       | `Rule`, `PriorityTree`, callback types                        |
//! | [`evaluator`]  | `evaluate`: ordered, first-match, depth-first walk            |
//! | [`scheduler`]  | `Scheduler`: single-slot reconsideration timer                |
//! | [`handlers`]   | `EventName`, `HandlerSet`, `EventSurface`, `HandlerManager`   |
//! | [`params`]     | `ParameterStore`                                              |
//! | [`comms`]      | `CommunicationRegistry`                                       |
//! | [`controller`] | `Controller`, `Ai` callback context, `Reconsideration`        |
//! | [`error`]      | `AiError`, `AiResult<T>`                                      |
//!
//! # Execution model
//!
//! Everything is synchronous and single-threaded per agent.  The host
//! delivers two kinds of callbacks, one at a time:
//!
//! 1. **Timer fire** → [`Controller::on_timer`]: clear the slot, check the
//!    agent is still valid, walk the tree, run the selected behaviour.
//! 2. **Event** → [`Controller::handle_event`]: run the handler the current
//!    behaviour bound to that name.
//!
//! Rule code never re-enters evaluation directly.  `reconsider_now` only
//! arms the timer, so the next walk starts after the current callback has
//! returned.

pub mod agent;
pub mod comms;
pub mod controller;
pub mod error;
pub mod evaluator;
pub mod handlers;
pub mod params;
pub mod rule;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use agent::Agent;
pub use comms::{CommunicationRegistry, SUBSTITUTION_TOKEN};
pub use controller::{Ai, AiConfig, Controller, Reconsideration};
pub use error::{AiError, AiResult};
pub use evaluator::evaluate;
pub use handlers::{EventName, EventSurface, Handler, HandlerManager, HandlerSet, handler};
pub use params::{CORE_PREFIX, ParameterStore, SELECTED_KEY};
pub use rule::{Behaviour, Condition, Configuration, PriorityTree, Rule, behaviour};
pub use scheduler::Scheduler;
