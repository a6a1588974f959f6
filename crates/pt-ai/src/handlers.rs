//! Event names, handler sets, the agent's event surface and the manager
//! that swaps handler sets between behaviours.
//!
//! # Lifecycle
//!
//! A behaviour builds a [`HandlerSet`] and installs it.  Installation first
//! unbinds every name the previous behaviour installed (whether or not the
//! new set redefines it), injects the teardown handler under
//! [`EventName::ENTITY_DESTROYED`], then binds the new set.  Handlers bound
//! to the surface by other means are left alone unless their name was part
//! of the previous set.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::{Agent, Ai};

// ── EventName ─────────────────────────────────────────────────────────────────

/// Name of an external event an agent can react to.
///
/// The set is open: the embedding application names its own events
/// (`EventName::new("ship_being_attacked")`).  Only
/// [`ENTITY_DESTROYED`][Self::ENTITY_DESTROYED] has meaning to the core.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventName(Cow<'static, str>);

impl EventName {
    /// Fired by the host when the agent is removed from the world.
    pub const ENTITY_DESTROYED: EventName = EventName::new("entity_destroyed");

    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for EventName {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for EventName {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventName({:?})", self.0)
    }
}

// ── Handler ───────────────────────────────────────────────────────────────────

/// Callback bound to an event name.
pub type Handler<A> = Arc<dyn Fn(&mut Ai<'_, A>, &<A as Agent>::Payload) + Send + Sync>;

/// Wrap a closure or `fn` as a [`Handler`].
pub fn handler<A, F>(f: F) -> Handler<A>
where
    A: Agent,
    F: Fn(&mut Ai<'_, A>, &A::Payload) + Send + Sync + 'static,
{
    Arc::new(f)
}

// ── HandlerSet ────────────────────────────────────────────────────────────────

/// The handlers one behaviour wants active, keyed by event name.
///
/// Sets compose: a behaviour typically starts from a shared group of
/// standard responses and [`merge`][Self::merge]s or
/// [`on`][Self::on]-overrides the events it treats specially.
pub struct HandlerSet<A: Agent> {
    map: BTreeMap<EventName, Handler<A>>,
}

impl<A: Agent> HandlerSet<A> {
    pub fn new() -> Self {
        Self { map: BTreeMap::new() }
    }

    /// Builder form of [`insert`][Self::insert].
    pub fn on<F>(mut self, name: impl Into<EventName>, f: F) -> Self
    where
        F: Fn(&mut Ai<'_, A>, &A::Payload) + Send + Sync + 'static,
    {
        self.insert(name, f);
        self
    }

    /// Bind `f` to `name`, replacing any earlier handler for that name.
    pub fn insert<F>(&mut self, name: impl Into<EventName>, f: F)
    where
        F: Fn(&mut Ai<'_, A>, &A::Payload) + Send + Sync + 'static,
    {
        self.map.insert(name.into(), Arc::new(f));
    }

    pub fn insert_handler(&mut self, name: impl Into<EventName>, h: Handler<A>) {
        self.map.insert(name.into(), h);
    }

    /// Copy every handler of `other` into `self`; `other` wins on clashes.
    pub fn merge(mut self, other: &HandlerSet<A>) -> Self {
        for (name, h) in &other.map {
            self.map.insert(name.clone(), Arc::clone(h));
        }
        self
    }

    pub fn remove(&mut self, name: &EventName) -> Option<Handler<A>> {
        self.map.remove(name)
    }

    pub fn get(&self, name: &EventName) -> Option<&Handler<A>> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &EventName) -> bool {
        self.map.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &EventName> + '_ {
        self.map.keys()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<A: Agent> Default for HandlerSet<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Agent> Clone for HandlerSet<A> {
    fn clone(&self) -> Self {
        Self { map: self.map.clone() }
    }
}

impl<A: Agent> IntoIterator for HandlerSet<A> {
    type Item = (EventName, Handler<A>);
    type IntoIter = std::collections::btree_map::IntoIter<EventName, Handler<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<A: Agent> fmt::Debug for HandlerSet<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.map.keys()).finish()
    }
}

// ── EventSurface ──────────────────────────────────────────────────────────────

/// The agent's externally visible event slots.
///
/// The host fires events by name; whatever is bound at that moment runs.
pub struct EventSurface<A: Agent> {
    bound: BTreeMap<EventName, Handler<A>>,
}

impl<A: Agent> EventSurface<A> {
    pub fn new() -> Self {
        Self { bound: BTreeMap::new() }
    }

    /// Bind `h` to `name`, returning whatever was bound before.
    pub fn bind(&mut self, name: EventName, h: Handler<A>) -> Option<Handler<A>> {
        self.bound.insert(name, h)
    }

    pub fn unbind(&mut self, name: &EventName) -> Option<Handler<A>> {
        self.bound.remove(name)
    }

    /// A shared handle on the bound handler, so it can be called while the
    /// surface itself is borrowed mutably by the callback.
    pub fn handler(&self, name: &EventName) -> Option<Handler<A>> {
        self.bound.get(name).cloned()
    }

    pub fn is_bound(&self, name: &EventName) -> bool {
        self.bound.contains_key(name)
    }

    pub fn bound_names(&self) -> impl Iterator<Item = &EventName> + '_ {
        self.bound.keys()
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

impl<A: Agent> Default for EventSurface<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Agent> fmt::Debug for EventSurface<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.bound.keys()).finish()
    }
}

// ── HandlerManager ────────────────────────────────────────────────────────────

/// Tracks which names the current behaviour installed.
#[derive(Debug, Default)]
pub struct HandlerManager {
    active: BTreeSet<EventName>,
}

impl HandlerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active set on `surface` with `set` plus the teardown
    /// handler.
    pub fn install<A: Agent>(&mut self, surface: &mut EventSurface<A>, mut set: HandlerSet<A>) {
        self.uninstall_all(surface);

        let teardown = match set.remove(&EventName::ENTITY_DESTROYED) {
            None => handler(|ai: &mut Ai<'_, A>, _: &A::Payload| {
                ai.cancel_reconsideration();
            }),
            Some(supplied) => handler(move |ai: &mut Ai<'_, A>, payload: &A::Payload| {
                ai.cancel_reconsideration();
                supplied(ai, payload);
            }),
        };
        set.insert_handler(EventName::ENTITY_DESTROYED, teardown);

        for (name, h) in set {
            surface.bind(name.clone(), h);
            self.active.insert(name);
        }
    }

    /// Unbind every name in the active set.
    pub fn uninstall_all<A: Agent>(&mut self, surface: &mut EventSurface<A>) {
        for name in std::mem::take(&mut self.active) {
            surface.unbind(&name);
        }
    }

    pub fn active(&self) -> &BTreeSet<EventName> {
        &self.active
    }

    pub fn is_active(&self, name: &EventName) -> bool {
        self.active.contains(name)
    }
}
