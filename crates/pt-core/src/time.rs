//! Host time model.
//!
//! The host loop advances in fixed ticks.  Rule code speaks in seconds
//! (`reconsider_after`, the reconsider-now delay), so `SimClock` converts a
//! `Duration` into a whole number of ticks, always rounding up so a timer
//! never fires before its delay has elapsed.

use std::fmt;
use std::time::Duration;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute host tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Maps ticks to elapsed host time.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Milliseconds of host time represented by one tick.  Never zero.
    pub tick_millis: u32,
    /// The current tick, advanced by `SimClock::advance()`.
    pub current_tick: Tick,
}

impl SimClock {
    /// Create a clock at tick 0.
    ///
    /// Returns `CoreError::Config` if `tick_millis` is zero.
    pub fn new(tick_millis: u32) -> CoreResult<Self> {
        if tick_millis == 0 {
            return Err(CoreError::Config("tick_millis must be greater than zero".into()));
        }
        Ok(Self { tick_millis, current_tick: Tick::ZERO })
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Host time elapsed since tick 0.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.current_tick.0 * self.tick_millis as u64)
    }

    /// Ticks spanned by `delay`, rounded up.  A zero delay spans zero ticks.
    pub fn ticks_for(&self, delay: Duration) -> u64 {
        let tick_nanos = self.tick_millis as u128 * 1_000_000;
        let ticks = delay.as_nanos().div_ceil(tick_nanos);
        u64::try_from(ticks).unwrap_or(u64::MAX)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (+{:.2}s)", self.current_tick, self.elapsed().as_secs_f64())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level host configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the host loop builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Milliseconds per tick.  Default: 250.
    pub tick_millis: u32,

    /// Total ticks to run.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical decisions.
    pub seed: u64,

    /// Delay used by `reconsider_now`.  Default: 250 ms.
    pub reconsider_now_millis: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_millis:           250,
            total_ticks:           4 * 60,
            seed:                  0,
            reconsider_now_millis: 250,
        }
    }
}

impl SimConfig {
    /// The tick at which the run ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> CoreResult<SimClock> {
        SimClock::new(self.tick_millis)
    }

    #[inline]
    pub fn reconsider_now_delay(&self) -> Duration {
        Duration::from_millis(self.reconsider_now_millis)
    }
}
