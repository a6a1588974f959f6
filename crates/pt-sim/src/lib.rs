//! `pt-sim` — single-threaded host loop for priority-tree AI agents.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Events  — pop queued external events in posting order and run the
//!               handler the agent's current behaviour bound to that name.
//!   ② Timers  — drain reconsideration timers due at this tick and route
//!               each to its owner's Controller::on_timer.
//! ```
//!
//! Callbacks never overlap: each handler, condition and behaviour runs to
//! completion before the next one starts.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pt_ai::{PriorityTree, Rule};
//! use pt_core::SimConfig;
//! use pt_sim::{NoopObserver, Sim, SimBuilder};
//!
//! let mut sim: Sim<Ship> = SimBuilder::new(SimConfig::default()).build()?;
//! let id = sim.spawn_with_tree(ship, "patrol-ai", PriorityTree::new(vec![
//!     Rule::new().condition(has_target).behaviour(attack).reconsider_after_secs(5.0),
//!     Rule::fallback(patrol),
//! ]));
//! sim.post_event(id, "ship_being_attacked", attacker)?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
