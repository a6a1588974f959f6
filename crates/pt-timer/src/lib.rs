//! `pt-timer` — the timer facility consumed by the AI core, plus a
//! deterministic host implementation.
//!
//! # Crate layout
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`facility`]    | `TimerFacility` trait (`create_timer`, `cancel_timer`) |
//! | [`timer_queue`] | `TimerQueue` (`BTreeMap<Tick, Vec<Timer>>`), `Timer`  |
//! | [`error`]       | `TimerError`, `TimerResult<T>`                        |
//!
//! # Firing model
//!
//! Timers carry no callback.  A fire is reported to the host as a
//! [`Timer`] record naming its owner, and the host routes it to that
//! owner's controller.  A timer is never due on the tick in which it was
//! created, so a zero-delay request made inside a callback always runs
//! after that callback has returned.

pub mod error;
pub mod facility;
pub mod timer_queue;

#[cfg(test)]
mod tests;

pub use error::{TimerError, TimerResult};
pub use facility::TimerFacility;
pub use timer_queue::{Timer, TimerQueue};
