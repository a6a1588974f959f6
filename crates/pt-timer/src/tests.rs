//! Unit tests for pt-timer.

use std::time::Duration;

use pt_core::{AgentId, Tick, TimerHandle};

use crate::{TimerFacility, TimerQueue};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 250 ms per tick, the default host resolution.
fn queue() -> TimerQueue {
    TimerQueue::new(250).unwrap()
}

fn secs(s: f64) -> Duration {
    Duration::from_secs_f64(s)
}

// ── Construction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod construction {
    use super::*;

    #[test]
    fn zero_resolution_rejected() {
        assert!(TimerQueue::new(0).is_err());
    }

    #[test]
    fn empty_queue() {
        let q = queue();
        assert!(q.is_empty());
        assert_eq!(q.len(), 0);
        assert!(q.next_tick().is_none());
        assert_eq!(q.now(), Tick::ZERO);
    }
}

// ── Arming ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod arming {
    use super::*;

    #[test]
    fn delay_rounds_up_to_ticks() {
        let mut q = queue();
        let h = q.create_timer(AgentId(0), secs(1.0));
        assert_eq!(q.due_tick(h), Some(Tick(4)));
        let h = q.create_timer(AgentId(0), secs(0.3));
        assert_eq!(q.due_tick(h), Some(Tick(2)));
    }

    #[test]
    fn zero_delay_is_due_next_tick() {
        let mut q = queue();
        let h = q.create_timer(AgentId(0), Duration::ZERO);
        assert_eq!(q.due_tick(h), Some(Tick(1)));
        assert!(q.drain_due(Tick(0)).is_empty());
        assert!(q.is_live(h));
    }

    #[test]
    fn handles_are_unique() {
        let mut q = queue();
        let a = q.create_timer(AgentId(0), secs(1.0));
        let b = q.create_timer(AgentId(0), secs(1.0));
        assert_ne!(a, b);
        assert_eq!(q.len(), 2);
        assert_eq!(q.tick_count(), 1);
    }

    #[test]
    fn delays_measured_from_last_drain() {
        let mut q = queue();
        q.drain_due(Tick(10));
        let h = q.create_timer(AgentId(1), secs(0.5));
        assert_eq!(q.due_tick(h), Some(Tick(12)));
    }
}

// ── Draining ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod draining {
    use super::*;

    #[test]
    fn drain_returns_due_timers_in_order() {
        let mut q = queue();
        let late = q.create_timer(AgentId(0), secs(2.0));
        let early = q.create_timer(AgentId(1), secs(0.25));
        let same = q.create_timer(AgentId(2), secs(0.25));

        let fired = q.drain_due(Tick(1));
        let handles: Vec<TimerHandle> = fired.iter().map(|t| t.handle).collect();
        assert_eq!(handles, vec![early, same]);
        assert_eq!(fired[0].owner, AgentId(1));
        assert_eq!(q.len(), 1);
        assert!(q.is_live(late));
        assert!(!q.is_live(early));
    }

    #[test]
    fn drain_catches_up_on_skipped_ticks() {
        let mut q = queue();
        q.create_timer(AgentId(0), secs(0.25));
        q.create_timer(AgentId(0), secs(0.5));
        let fired = q.drain_due(Tick(5));
        assert_eq!(fired.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn drain_absent_tick_returns_empty() {
        let mut q = queue();
        q.create_timer(AgentId(0), secs(10.0));
        assert!(q.drain_due(Tick(3)).is_empty());
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn advance_to_moves_the_delay_origin() {
        let mut q = queue();
        q.advance_to(Tick(10));
        assert_eq!(q.now(), Tick(10));
        let h = q.create_timer(AgentId(0), secs(1.0));
        assert_eq!(q.due_tick(h), Some(Tick(14)));
        assert!(q.drain_due(Tick(13)).is_empty());
        assert_eq!(q.drain_due(Tick(14)).len(), 1);
    }

    #[test]
    fn advance_to_never_goes_back() {
        let mut q = queue();
        q.advance_to(Tick(6));
        q.advance_to(Tick(2));
        assert_eq!(q.now(), Tick(6));
    }
}

// ── Cancellation ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod cancellation {
    use super::*;

    #[test]
    fn cancelled_timer_never_fires() {
        let mut q = queue();
        let h = q.create_timer(AgentId(0), secs(1.0));
        q.cancel_timer(h);
        assert!(q.is_empty());
        assert!(q.next_tick().is_none());
        assert!(q.drain_due(Tick(100)).is_empty());
    }

    #[test]
    fn cancel_unknown_or_fired_is_noop() {
        let mut q = queue();
        q.cancel_timer(TimerHandle(42));
        let h = q.create_timer(AgentId(0), secs(0.25));
        assert_eq!(q.drain_due(Tick(1)).len(), 1);
        q.cancel_timer(h);
        q.cancel_timer(h);
        assert!(q.is_empty());
    }

    #[test]
    fn cancel_keeps_bucket_neighbours() {
        let mut q = queue();
        let a = q.create_timer(AgentId(0), secs(1.0));
        let b = q.create_timer(AgentId(1), secs(1.0));
        q.cancel_timer(a);
        let fired = q.drain_due(Tick(4));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].handle, b);
    }

    #[test]
    fn usable_as_trait_object() {
        let mut q = queue();
        let facility: &mut dyn TimerFacility = &mut q;
        let h = facility.create_timer(AgentId(3), secs(0.5));
        facility.cancel_timer(h);
        assert!(q.is_empty());
    }
}
