//! Rule nodes and the priority tree.
//!
//! A tree is plain data: an ordered list of [`Rule`]s whose fields hold
//! shared callbacks.  Every callback takes the owning agent's [`Ai`] context
//! explicitly; nothing is captured from the controller.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::{Agent, Ai, AiError, AiResult};

// ── Callback types ────────────────────────────────────────────────────────────

/// Predicate consulted during evaluation.
pub type Condition<A> = Arc<dyn Fn(&mut Ai<'_, A>) -> bool + Send + Sync>;

/// Setup procedure run before a condition (`precheck`) or after a match
/// (`on_match`).
pub type Configuration<A> = Arc<dyn Fn(&mut Ai<'_, A>) + Send + Sync>;

/// Terminal action run once per reconsideration that selects it.
pub type Behaviour<A> = Arc<dyn Fn(&mut Ai<'_, A>) + Send + Sync>;

/// Wrap a closure or `fn` as a [`Behaviour`].
pub fn behaviour<A, F>(f: F) -> Behaviour<A>
where
    A: Agent,
    F: Fn(&mut Ai<'_, A>) + Send + Sync + 'static,
{
    Arc::new(f)
}

// ── Rule ──────────────────────────────────────────────────────────────────────

/// One node of a priority tree.
///
/// Build with the fluent setters:
///
/// ```rust,ignore
/// Rule::new()
///     .precheck(scan_for_targets)
///     .condition(has_target)
///     .behaviour(attack)
///     .reconsider_after_secs(5.0)
/// ```
///
/// A rule with a `behaviour` is a leaf: `when_true` is never consulted.
/// Empty branch lists behave exactly like absent ones.
pub struct Rule<A: Agent> {
    /// Always runs before `condition`, even when the condition is false.
    pub precheck:         Option<Configuration<A>>,
    /// Absent ⇒ always true.
    pub condition:        Option<Condition<A>>,
    /// Runs when `condition` holds, before the behaviour or `when_true`.
    pub on_match:         Option<Configuration<A>>,
    pub behaviour:        Option<Behaviour<A>>,
    /// Re-arms the reconsideration timer when this rule's behaviour is chosen.
    /// A zero delay arms nothing.
    pub reconsider_after: Option<Duration>,
    pub when_true:        Vec<Rule<A>>,
    pub when_false:       Vec<Rule<A>>,
}

impl<A: Agent> Rule<A> {
    pub fn new() -> Self {
        Self {
            precheck:         None,
            condition:        None,
            on_match:         None,
            behaviour:        None,
            reconsider_after: None,
            when_true:        Vec::new(),
            when_false:       Vec::new(),
        }
    }

    /// An unconditional leaf, the shape every tree should end with.
    pub fn fallback<F>(f: F) -> Self
    where
        F: Fn(&mut Ai<'_, A>) + Send + Sync + 'static,
    {
        Self::new().behaviour(f)
    }

    pub fn precheck<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Ai<'_, A>) + Send + Sync + 'static,
    {
        self.precheck = Some(Arc::new(f));
        self
    }

    pub fn condition<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Ai<'_, A>) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(f));
        self
    }

    pub fn on_match<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Ai<'_, A>) + Send + Sync + 'static,
    {
        self.on_match = Some(Arc::new(f));
        self
    }

    pub fn behaviour<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Ai<'_, A>) + Send + Sync + 'static,
    {
        self.behaviour = Some(Arc::new(f));
        self
    }

    /// Use an already-shared behaviour (several rules selecting the same one).
    pub fn shared_behaviour(mut self, b: Behaviour<A>) -> Self {
        self.behaviour = Some(b);
        self
    }

    pub fn reconsider_after(mut self, delay: Duration) -> Self {
        self.reconsider_after = Some(delay);
        self
    }

    /// Convenience for rule tables written in seconds.  Negative or
    /// non-finite values are treated as zero, so they never re-arm.
    pub fn reconsider_after_secs(self, secs: f64) -> Self {
        let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
        self.reconsider_after(Duration::from_secs_f64(secs))
    }

    pub fn when_true(mut self, rules: Vec<Rule<A>>) -> Self {
        self.when_true = rules;
        self
    }

    pub fn when_false(mut self, rules: Vec<Rule<A>>) -> Self {
        self.when_false = rules;
        self
    }

    /// `true` if the rule has no condition and selects a behaviour.
    pub fn is_unconditional_leaf(&self) -> bool {
        self.condition.is_none() && self.behaviour.is_some()
    }
}

impl<A: Agent> Default for Rule<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Agent> Clone for Rule<A> {
    fn clone(&self) -> Self {
        Self {
            precheck:         self.precheck.clone(),
            condition:        self.condition.clone(),
            on_match:         self.on_match.clone(),
            behaviour:        self.behaviour.clone(),
            reconsider_after: self.reconsider_after,
            when_true:        self.when_true.clone(),
            when_false:       self.when_false.clone(),
        }
    }
}

impl<A: Agent> fmt::Debug for Rule<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("precheck", &self.precheck.is_some())
            .field("condition", &self.condition.is_some())
            .field("on_match", &self.on_match.is_some())
            .field("behaviour", &self.behaviour.is_some())
            .field("reconsider_after", &self.reconsider_after)
            .field("when_true", &self.when_true)
            .field("when_false", &self.when_false)
            .finish()
    }
}

// ── PriorityTree ──────────────────────────────────────────────────────────────

/// An ordered, immutable list of root rules.
///
/// Cloning is an `Arc` bump, so a controller can keep walking the tree it
/// started with even if a callback installs a replacement mid-walk.
pub struct PriorityTree<A: Agent>(Arc<[Rule<A>]>);

impl<A: Agent> PriorityTree<A> {
    pub fn new(rules: Vec<Rule<A>>) -> Self {
        Self(Arc::from(rules))
    }

    #[inline]
    pub fn rules(&self) -> &[Rule<A>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check that evaluation can always select something: the last root
    /// rule must be unconditional and carry a behaviour.
    ///
    /// A failing tree is still usable; it simply risks the "no matching
    /// rule" fault at run time.
    pub fn check_fallback(&self) -> AiResult<()> {
        match self.0.last() {
            None => Err(AiError::EmptyTree),
            Some(last) if last.is_unconditional_leaf() => Ok(()),
            Some(_) => Err(AiError::MissingFallback { rules: self.0.len() }),
        }
    }
}

impl<A: Agent> Clone for PriorityTree<A> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<A: Agent> Default for PriorityTree<A> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<A: Agent> From<Vec<Rule<A>>> for PriorityTree<A> {
    fn from(rules: Vec<Rule<A>>) -> Self {
        Self::new(rules)
    }
}

impl<A: Agent> FromIterator<Rule<A>> for PriorityTree<A> {
    fn from_iter<I: IntoIterator<Item = Rule<A>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<A: Agent> fmt::Debug for PriorityTree<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}
