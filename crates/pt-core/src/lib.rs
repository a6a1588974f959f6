//! `pt-core` — foundational types for the priority-tree AI framework.
//!
//! This crate is a dependency of every other `pt-*` crate.  It intentionally
//! has no `pt-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `TimerHandle`                                  |
//! | [`time`]    | `Tick`, `SimClock`, `SimConfig`                           |
//! | [`rng`]     | `AgentRng` (per-agent, handed to rule callbacks)          |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, ticks and config.   |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, TimerHandle};
pub use rng::AgentRng;
pub use time::{SimClock, SimConfig, Tick};
