//! `TimerQueue` — sparse per-tick timer queue.
//!
//! Timers are bucketed by due tick in a `BTreeMap`, so draining a tick is
//! O(log W) in the number W of distinct pending ticks.  A side index maps
//! each live handle to its bucket, which makes cancellation exact: a
//! cancelled timer is removed from its bucket immediately and `len()` only
//! ever counts timers that can still fire.

use std::collections::BTreeMap;
use std::time::Duration;

use pt_core::{AgentId, SimClock, Tick, TimerHandle};
use rustc_hash::FxHashMap;

use crate::{TimerFacility, TimerResult};

/// One pending (or just fired) timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timer {
    pub handle: TimerHandle,
    pub owner:  AgentId,
    pub due:    Tick,
}

/// A priority queue mapping host ticks → timers due at that tick.
#[derive(Debug)]
pub struct TimerQueue {
    inner:       BTreeMap<Tick, Vec<Timer>>,
    live:        FxHashMap<TimerHandle, Tick>,
    /// The host's current tick; delays are measured from here.
    clock:       SimClock,
    next_handle: TimerHandle,
}

impl TimerQueue {
    /// Create an empty queue at tick 0 with `tick_millis` resolution.
    pub fn new(tick_millis: u32) -> TimerResult<Self> {
        Ok(Self {
            inner:       BTreeMap::new(),
            live:        FxHashMap::default(),
            clock:       SimClock::new(tick_millis)?,
            next_handle: TimerHandle(0),
        })
    }

    /// The tick delays are currently measured from.
    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    /// Move `now()` forward to `tick`.  Never moves backwards.
    ///
    /// Hosts call this at the start of every tick, before running any
    /// callback that may arm a timer.
    pub fn advance_to(&mut self, tick: Tick) {
        if tick > self.clock.current_tick {
            self.clock.current_tick = tick;
        }
    }

    /// Remove and return every live timer due at or before `tick`, in due
    /// order and creation order within a tick.  Advances `now()` to `tick`.
    pub fn drain_due(&mut self, tick: Tick) -> Vec<Timer> {
        self.advance_to(tick);
        let later = self.inner.split_off(&tick.offset(1));
        let due = std::mem::replace(&mut self.inner, later);

        let mut fired = Vec::new();
        for (_, bucket) in due {
            for timer in bucket {
                self.live.remove(&timer.handle);
                fired.push(timer);
            }
        }
        fired
    }

    /// `true` while `handle` is armed and has not fired.
    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.live.contains_key(&handle)
    }

    /// Due tick of a live timer.
    pub fn due_tick(&self, handle: TimerHandle) -> Option<Tick> {
        self.live.get(&handle).copied()
    }

    /// The earliest tick with at least one live timer, or `None` if empty.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    /// Number of live timers.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Number of distinct future ticks that have at least one live timer.
    pub fn tick_count(&self) -> usize {
        self.inner.len()
    }

    fn allocate_handle(&mut self) -> TimerHandle {
        let handle = self.next_handle;
        self.next_handle = handle.next();
        handle
    }
}

impl TimerFacility for TimerQueue {
    fn create_timer(&mut self, owner: AgentId, delay: Duration) -> TimerHandle {
        let ticks = self.clock.ticks_for(delay).max(1);
        let due = self.clock.current_tick.offset(ticks);
        let handle = self.allocate_handle();

        self.inner.entry(due).or_default().push(Timer { handle, owner, due });
        self.live.insert(handle, due);
        tracing::trace!(%owner, %handle, %due, "timer armed");
        handle
    }

    fn cancel_timer(&mut self, handle: TimerHandle) {
        let Some(due) = self.live.remove(&handle) else {
            return;
        };
        if let Some(bucket) = self.inner.get_mut(&due) {
            bucket.retain(|t| t.handle != handle);
            if bucket.is_empty() {
                self.inner.remove(&due);
            }
        }
        tracing::trace!(%handle, %due, "timer cancelled");
    }
}
