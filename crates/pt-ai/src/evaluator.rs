//! The priority-tree walk.
//!
//! Depth-first, ordered, first match wins:
//!
//! ```text
//! for rule in rules:
//!   precheck()                              always, before the condition
//!   if condition() (absent ⇒ true):
//!     on_match()
//!     behaviour?  → arm reconsider_after (if non-zero), return it (ends the whole walk)
//!     when_true?  → recurse; Some ⇒ return, None ⇒ next sibling
//!   else when_false? → recurse; Some ⇒ return, None ⇒ next sibling
//! return None
//! ```
//!
//! A branch whose condition held but which found nothing usable is not a
//! failure: the walk resumes with the next sibling of that branch.

use std::sync::Arc;

use crate::{Agent, Ai, Behaviour, Rule};

/// Walk `rules` and return the behaviour to run, or `None` if nothing in
/// the list (or any branch reached from it) matched.
pub fn evaluate<A: Agent>(rules: &[Rule<A>], ai: &mut Ai<'_, A>) -> Option<Behaviour<A>> {
    walk(rules, ai, 0)
}

fn walk<A: Agent>(rules: &[Rule<A>], ai: &mut Ai<'_, A>, depth: usize) -> Option<Behaviour<A>> {
    for (index, rule) in rules.iter().enumerate() {
        if let Some(precheck) = &rule.precheck {
            precheck(ai);
        }

        let matched = match &rule.condition {
            Some(condition) => condition(ai),
            None            => true,
        };
        tracing::trace!(agent = %ai.id(), depth, index, matched, "rule evaluated");

        let branch = if matched {
            if let Some(on_match) = &rule.on_match {
                on_match(ai);
            }
            if let Some(behaviour) = &rule.behaviour {
                if let Some(delay) = rule.reconsider_after.filter(|d| !d.is_zero()) {
                    ai.schedule_reconsideration(delay);
                }
                return Some(Arc::clone(behaviour));
            }
            &rule.when_true
        } else {
            &rule.when_false
        };

        if !branch.is_empty() {
            if let Some(found) = walk(branch, ai, depth + 1) {
                return Some(found);
            }
        }
    }
    None
}
