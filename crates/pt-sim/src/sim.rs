//! The `Sim` struct and its tick loop.

use std::collections::VecDeque;

use pt_ai::{Agent, Ai, AiConfig, Controller, EventName, PriorityTree};
use pt_core::{AgentId, SimClock, SimConfig, Tick};
use pt_timer::TimerQueue;

use crate::{SimError, SimObserver, SimResult};

/// An external event waiting for the next tick.
pub(crate) struct PendingEvent<P> {
    agent:   AgentId,
    name:    EventName,
    payload: P,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The host loop: owns every controller, the shared timer queue and the
/// external event queue, and delivers callbacks one at a time.
///
/// Each tick runs two phases:
///
/// 1. **Events**: queued events are offered to their agents in posting
///    order.
/// 2. **Timers**: every reconsideration timer due at this tick is drained
///    and routed to its owner's [`Controller::on_timer`].
///
/// The timer queue is moved to the current tick before either phase (and
/// before `spawn` / `with_ai` run a callback), so every delay is measured
/// from the tick in which it was requested and a timer is always due on a
/// later tick.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<A: Agent> {
    /// Global configuration (tick length, run length, seed, …).
    pub config: SimConfig,

    /// Tracks the current tick and maps it to simulated time.
    pub clock: SimClock,

    /// The timer facility every controller schedules against.
    pub timers: TimerQueue,

    pub(crate) ai_config:   AiConfig,
    /// Indexed by `AgentId`; `None` once destroyed.
    pub(crate) controllers: Vec<Option<Controller<A>>>,
    pub(crate) events:      VecDeque<PendingEvent<A::Payload>>,
}

impl<A: Agent> Sim<A> {
    // ── Agents ────────────────────────────────────────────────────────────

    /// Add an agent and run `setup` with its fresh [`Ai`] context.
    ///
    /// `setup` is where communications are registered, parameters seeded
    /// and the first tree installed with `set_priorities`.
    ///
    /// Fails with [`SimError::TooManyAgents`] once every valid `AgentId`
    /// has been handed out.
    pub fn spawn<F>(&mut self, agent: A, name: impl Into<String>, setup: F) -> SimResult<AgentId>
    where
        F: FnOnce(&mut Ai<'_, A>),
    {
        let id = agent_id_for(self.controllers.len())?;
        self.timers.advance_to(self.clock.current_tick);
        let mut ctl = Controller::new(id, name, agent, self.config.seed)
            .with_config(self.ai_config.clone());
        ctl.with_ai(&mut self.timers, setup);
        tracing::debug!(agent = %id, ai = %ctl.name(), "agent spawned");
        self.controllers.push(Some(ctl));
        Ok(id)
    }

    /// [`spawn`][Self::spawn] with a setup that only installs `tree`.
    pub fn spawn_with_tree(
        &mut self,
        agent: A,
        name:  impl Into<String>,
        tree:  PriorityTree<A>,
    ) -> SimResult<AgentId> {
        self.spawn(agent, name, move |ai| ai.set_priorities(tree))
    }

    /// Remove an agent from the world.
    ///
    /// Fires [`EventName::ENTITY_DESTROYED`] with `payload`, then tears the
    /// controller down and hands it back.  Queued events and timers for
    /// the agent are discarded when they come due.
    pub fn destroy(&mut self, agent: AgentId, payload: A::Payload) -> SimResult<Controller<A>> {
        let mut ctl = self
            .controllers
            .get_mut(agent.index())
            .and_then(Option::take)
            .ok_or(SimError::AgentNotFound(agent))?;

        ctl.handle_event(&EventName::ENTITY_DESTROYED, &payload, &mut self.timers);
        ctl.teardown(&mut self.timers);
        tracing::debug!(agent = %agent, ai = %ctl.name(), "agent destroyed");
        Ok(ctl)
    }

    pub fn controller(&self, agent: AgentId) -> Option<&Controller<A>> {
        self.controllers.get(agent.index()).and_then(Option::as_ref)
    }

    pub fn controller_mut(&mut self, agent: AgentId) -> Option<&mut Controller<A>> {
        self.controllers.get_mut(agent.index()).and_then(Option::as_mut)
    }

    /// Run `f` against a live agent's [`Ai`] context from outside the loop.
    pub fn with_ai<R>(
        &mut self,
        agent: AgentId,
        f:     impl FnOnce(&mut Ai<'_, A>) -> R,
    ) -> SimResult<R> {
        let ctl = self
            .controllers
            .get_mut(agent.index())
            .and_then(Option::as_mut)
            .ok_or(SimError::AgentNotFound(agent))?;
        self.timers.advance_to(self.clock.current_tick);
        Ok(ctl.with_ai(&mut self.timers, f))
    }

    /// Ids of every agent not yet destroyed, ascending.
    pub fn live_agents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.controllers
            .iter()
            .filter_map(|slot| slot.as_ref().map(Controller::id))
    }

    // ── Events ────────────────────────────────────────────────────────────

    /// Queue `name` for `agent`; delivered at the start of the next
    /// processed tick.
    pub fn post_event(
        &mut self,
        agent:   AgentId,
        name:    impl Into<EventName>,
        payload: A::Payload,
    ) -> SimResult<()> {
        if self.controller(agent).is_none() {
            return Err(SimError::AgentNotFound(agent));
        }
        self.events.push_back(PendingEvent { agent, name: name.into(), payload });
        Ok(())
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick() {
                break;
            }
            self.step(now, observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let now = self.clock.current_tick;
            self.step(now, observer);
        }
        Ok(())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, now: Tick, observer: &mut O) {
        observer.on_tick_start(now);
        self.timers.advance_to(now);
        self.deliver_events(now, observer);
        let fired = self.fire_timers(now, observer);
        observer.on_tick_end(now, fired);
        self.clock.advance();
    }

    fn deliver_events<O: SimObserver>(&mut self, now: Tick, observer: &mut O) {
        while let Some(ev) = self.events.pop_front() {
            let handled = match self.controllers.get_mut(ev.agent.index()).and_then(Option::as_mut) {
                Some(ctl) => ctl.handle_event(&ev.name, &ev.payload, &mut self.timers),
                None      => false,
            };
            if !handled {
                tracing::debug!(agent = %ev.agent, event = %ev.name, "event not handled");
            }
            observer.on_event(now, ev.agent, &ev.name, handled);
        }
    }

    fn fire_timers<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> usize {
        let mut fired = 0;
        for timer in self.timers.drain_due(now) {
            // Owner destroyed.
            let Some(ctl) = self.controllers.get_mut(timer.owner.index()).and_then(Option::as_mut) else {
                continue;
            };
            let outcome = ctl.on_timer(timer.handle, &mut self.timers);
            observer.on_reconsider(now, timer.owner, outcome);
            fired += 1;
        }
        fired
    }
}

/// The id for controller slot `index`.  Indices that do not fit in an
/// `AgentId`, or that would collide with `AgentId::INVALID`, are refused.
pub(crate) fn agent_id_for(index: usize) -> SimResult<AgentId> {
    AgentId::try_from(index)
        .ok()
        .filter(|id| id.is_valid())
        .ok_or(SimError::TooManyAgents(index))
}
