//! The per-agent controller and the context handed to rule callbacks.

use std::any::Any;
use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use pt_core::{AgentId, AgentRng, SimConfig, TimerHandle};
use pt_timer::TimerFacility;

use crate::{
    Agent, CommunicationRegistry, EventName, EventSurface, HandlerManager, HandlerSet,
    ParameterStore, PriorityTree, Scheduler, evaluate,
};

// ── AiConfig ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct AiConfig {
    /// Delay used by `reconsider_now`.  Default: 250 ms.
    pub reconsider_now: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self { reconsider_now: Duration::from_millis(250) }
    }
}

impl From<&SimConfig> for AiConfig {
    fn from(config: &SimConfig) -> Self {
        Self { reconsider_now: config.reconsider_now_delay() }
    }
}

// ── Reconsideration ───────────────────────────────────────────────────────────

/// What happened when a reconsideration timer fired.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reconsideration {
    /// The fired handle was not the pending one; nothing ran.
    Stale,
    /// The agent is no longer in the world; nothing ran.
    AgentGone,
    /// No rule matched.  The previous behaviour's handlers stay bound.
    NoMatch,
    /// A behaviour was selected and has run.
    Selected,
}

// ── Controller ────────────────────────────────────────────────────────────────

/// Binds one agent to its priority tree, parameters, communications,
/// event handlers and reconsideration timer.
///
/// Nothing here is shared between agents.  Entry points that may schedule
/// take the host's [`TimerFacility`] explicitly; rule callbacks reach the
/// same operations through [`Ai`].
pub struct Controller<A: Agent> {
    id:        AgentId,
    name:      String,
    agent:     A,
    config:    AiConfig,
    tree:      PriorityTree<A>,
    params:    ParameterStore,
    comms:     CommunicationRegistry,
    surface:   EventSurface<A>,
    handlers:  HandlerManager,
    scheduler: Scheduler,
    rng:       AgentRng,
}

impl<A: Agent> Controller<A> {
    /// Create an idle controller.  Nothing is scheduled until
    /// [`set_priorities`][Self::set_priorities] is called.
    ///
    /// `name` identifies the AI in logs; `seed` is the run's global seed.
    pub fn new(id: AgentId, name: impl Into<String>, agent: A, seed: u64) -> Self {
        Self {
            id,
            name:      name.into(),
            agent,
            config:    AiConfig::default(),
            tree:      PriorityTree::default(),
            params:    ParameterStore::new(),
            comms:     CommunicationRegistry::new(),
            surface:   EventSurface::new(),
            handlers:  HandlerManager::new(),
            scheduler: Scheduler::new(),
            rng:       AgentRng::new(seed, id),
        }
    }

    pub fn with_config(mut self, config: AiConfig) -> Self {
        self.config = config;
        self
    }

    // ── Identity and state ────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut A {
        &mut self.agent
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn tree(&self) -> &PriorityTree<A> {
        &self.tree
    }

    pub fn rng(&mut self) -> &mut AgentRng {
        &mut self.rng
    }

    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    pub fn comms(&self) -> &CommunicationRegistry {
        &self.comms
    }

    pub fn surface(&self) -> &EventSurface<A> {
        &self.surface
    }

    /// Direct access for handlers the application manages itself; those
    /// survive behaviour changes unless a behaviour installs the same name.
    pub fn surface_mut(&mut self) -> &mut EventSurface<A> {
        &mut self.surface
    }

    pub fn active_handlers(&self) -> &BTreeSet<EventName> {
        self.handlers.active()
    }

    pub fn pending_reconsideration(&self) -> Option<TimerHandle> {
        self.scheduler.pending()
    }

    // ── Parameters ────────────────────────────────────────────────────────

    pub fn set_parameter<T: Any + Send>(&mut self, key: impl Into<String>, value: T) {
        self.params.set(key, value);
    }

    /// `None` clears the key.
    pub fn set_parameter_opt<T: Any + Send>(&mut self, key: impl Into<String>, value: Option<T>) {
        self.params.set_opt(key, value);
    }

    /// `None` if `key` is unset or holds another type.
    pub fn parameter<T: Any>(&self, key: &str) -> Option<&T> {
        self.params.get(key)
    }

    pub fn parameter_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.params.get_mut(key)
    }

    pub fn clear_parameter(&mut self, key: &str) -> bool {
        self.params.clear(key)
    }

    pub fn has_parameter(&self, key: &str) -> bool {
        self.params.contains(key)
    }

    /// See [`ParameterStore::select_first`].
    pub fn select_from_parameter<T, P>(&mut self, list_key: &str, predicate: P) -> bool
    where
        T: Any + Send + Clone,
        P: Fn(&T) -> bool,
    {
        self.params.select_first(list_key, predicate)
    }

    // ── Communications ────────────────────────────────────────────────────

    pub fn set_communication(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.comms.set(key, template);
    }

    /// Render the template registered under `key` and hand it to the agent.
    /// Unregistered keys are ignored.
    pub fn communicate(&mut self, key: &str, substitution: &str) {
        if let Some(message) = self.comms.render(key, substitution) {
            self.agent.comms_message(&message);
        }
    }

    // ── Handlers ──────────────────────────────────────────────────────────

    /// Replace the active handler set.  See [`HandlerManager::install`].
    pub fn install_handlers(&mut self, set: HandlerSet<A>) {
        self.handlers.install(&mut self.surface, set);
    }

    // ── Scheduling ────────────────────────────────────────────────────────

    /// Replace the tree wholesale and request a reconsideration.  Never
    /// evaluates inline.
    pub fn set_priorities(&mut self, tree: PriorityTree<A>, timers: &mut dyn TimerFacility) {
        if let Err(e) = tree.check_fallback() {
            tracing::warn!(agent = %self.id, ai = %self.name, "{e}");
        }
        self.tree = tree;
        self.reconsider_now(timers);
    }

    /// Schedule a reconsideration after the short reconsider-now delay.
    pub fn reconsider_now(&mut self, timers: &mut dyn TimerFacility) {
        let delay = self.config.reconsider_now;
        self.schedule_reconsideration(delay, timers);
    }

    pub fn schedule_reconsideration(&mut self, delay: Duration, timers: &mut dyn TimerFacility) {
        self.scheduler.schedule(timers, self.id, delay);
    }

    pub fn cancel_reconsideration(&mut self, timers: &mut dyn TimerFacility) {
        if self.scheduler.cancel(timers) {
            tracing::debug!(agent = %self.id, "reconsideration cancelled");
        }
    }

    // ── Host entry points ─────────────────────────────────────────────────

    /// Run `f` with this controller's callback context.
    pub fn with_ai<R>(
        &mut self,
        timers: &mut dyn TimerFacility,
        f:      impl FnOnce(&mut Ai<'_, A>) -> R,
    ) -> R {
        let mut ai = Ai { ctl: self, timers };
        f(&mut ai)
    }

    /// Handle a fired reconsideration timer.
    ///
    /// The slot is cleared before the tree is walked, so the walk and the
    /// selected behaviour may schedule freely.
    pub fn on_timer(&mut self, fired: TimerHandle, timers: &mut dyn TimerFacility) -> Reconsideration {
        if !self.scheduler.detach(fired) {
            tracing::debug!(agent = %self.id, %fired, "ignoring stale reconsideration timer");
            return Reconsideration::Stale;
        }
        if !self.agent.is_valid() {
            return Reconsideration::AgentGone;
        }

        let tree = self.tree.clone();
        let mut ai = Ai { ctl: self, timers };
        match evaluate(tree.rules(), &mut ai) {
            Some(behaviour) => {
                tracing::debug!(agent = %ai.ctl.id, ai = %ai.ctl.name, "behaviour selected");
                behaviour(&mut ai);
                Reconsideration::Selected
            }
            None => {
                tracing::warn!(
                    agent = %ai.ctl.id,
                    ai = %ai.ctl.name,
                    "all priorities failed; priority trees should end with an unconditional entry"
                );
                Reconsideration::NoMatch
            }
        }
    }

    /// Run whatever is bound to `name`.  Returns `false` if nothing is.
    pub fn handle_event(
        &mut self,
        name:    &EventName,
        payload: &A::Payload,
        timers:  &mut dyn TimerFacility,
    ) -> bool {
        let Some(h) = self.surface.handler(name) else {
            return false;
        };
        let mut ai = Ai { ctl: self, timers };
        h(&mut ai, payload);
        true
    }

    /// Release everything this controller holds in the host: the pending
    /// timer and every handler the current behaviour installed.
    pub fn teardown(&mut self, timers: &mut dyn TimerFacility) {
        self.cancel_reconsideration(timers);
        self.handlers.uninstall_all(&mut self.surface);
    }
}

impl<A: Agent + std::fmt::Debug> std::fmt::Debug for Controller<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("agent", &self.agent)
            .field("params", &self.params)
            .field("active_handlers", self.handlers.active())
            .field("pending", &self.scheduler.pending())
            .finish()
    }
}

// ── Ai ────────────────────────────────────────────────────────────────────────

/// The context every condition, configuration, behaviour and handler
/// receives.
///
/// Dereferences to the [`Controller`], so parameter, communication and
/// handler operations are available directly; the scheduling operations
/// below route through the host's timer facility.
pub struct Ai<'c, A: Agent> {
    ctl:    &'c mut Controller<A>,
    timers: &'c mut dyn TimerFacility,
}

impl<A: Agent> Ai<'_, A> {
    /// Ask for a reconsideration shortly.  The walk happens on the timer
    /// fire, never inside the current call stack.
    pub fn reconsider_now(&mut self) {
        self.ctl.reconsider_now(self.timers);
    }

    pub fn schedule_reconsideration(&mut self, delay: Duration) {
        self.ctl.schedule_reconsideration(delay, self.timers);
    }

    pub fn cancel_reconsideration(&mut self) {
        self.ctl.cancel_reconsideration(self.timers);
    }

    /// Swap in a new tree.  A walk already in progress finishes on the old
    /// one.
    pub fn set_priorities(&mut self, tree: PriorityTree<A>) {
        self.ctl.set_priorities(tree, self.timers);
    }
}

impl<A: Agent> Deref for Ai<'_, A> {
    type Target = Controller<A>;

    fn deref(&self) -> &Controller<A> {
        self.ctl
    }
}

impl<A: Agent> DerefMut for Ai<'_, A> {
    fn deref_mut(&mut self) -> &mut Controller<A> {
        self.ctl
    }
}
