//! Unit tests for pt-ai.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pt_core::{AgentId, Tick};
use pt_timer::TimerQueue;

use crate::{
    Agent, Ai, Controller, EventName, HandlerSet, PriorityTree, Reconsideration, Rule, evaluate,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Ship {
    gone:  bool,
    hull:  u32,
    log:   Vec<String>,
    inbox: Vec<String>,
}

impl Agent for Ship {
    type Payload = u32;

    fn is_valid(&self) -> bool {
        !self.gone
    }

    fn comms_message(&mut self, message: &str) {
        self.inbox.push(message.to_string());
    }
}

type R = Rule<Ship>;
type Handlers = HandlerSet<Ship>;

const ON_HIT: EventName = EventName::new("on_hit");
const ON_DOCK: EventName = EventName::new("on_dock");

fn queue() -> TimerQueue {
    TimerQueue::new(250).unwrap()
}

fn controller() -> Controller<Ship> {
    Controller::new(AgentId(0), "test-ai", Ship { hull: 100, ..Ship::default() }, 7)
}

/// A behaviour (or configuration) that records `label` in the ship's log.
fn note(label: &'static str) -> impl Fn(&mut Ai<'_, Ship>) + Send + Sync + 'static {
    move |ai| ai.agent_mut().log.push(label.to_string())
}

fn yes() -> impl Fn(&mut Ai<'_, Ship>) -> bool + Send + Sync + 'static {
    |_| true
}

fn no() -> impl Fn(&mut Ai<'_, Ship>) -> bool + Send + Sync + 'static {
    |_| false
}

/// Walk `rules` once, run whatever was selected and return the last log
/// entry, or `None` if nothing matched.
fn select(ctl: &mut Controller<Ship>, timers: &mut TimerQueue, rules: Vec<R>) -> Option<String> {
    let tree = PriorityTree::new(rules);
    let ran = ctl.with_ai(timers, |ai| {
        let behaviour = evaluate(tree.rules(), ai)?;
        behaviour(ai);
        Some(())
    });
    ran.and_then(|_| ctl.agent().log.last().cloned())
}

/// Drain timers due at `tick` and deliver this controller's fires.
fn fire_due(
    ctl:    &mut Controller<Ship>,
    timers: &mut TimerQueue,
    tick:   Tick,
) -> Vec<Reconsideration> {
    let mut outcomes = Vec::new();
    for timer in timers.drain_due(tick) {
        if timer.owner == ctl.id() {
            outcomes.push(ctl.on_timer(timer.handle, timers));
        }
    }
    outcomes
}

// ── Evaluator ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod evaluator_tests {
    use super::*;

    #[test]
    fn first_match_wins() {
        let (mut ctl, mut timers) = (controller(), queue());
        let picked = select(&mut ctl, &mut timers, vec![
            R::new().condition(no()).behaviour(note("A")),
            R::new().condition(yes()).behaviour(note("X")),
            R::new().condition(yes()).behaviour(note("Y")),
        ]);
        assert_eq!(picked.as_deref(), Some("X"));
        assert_eq!(ctl.agent().log, vec!["X"]);
    }

    #[test]
    fn exhausted_true_branch_falls_through_to_next_sibling() {
        let (mut ctl, mut timers) = (controller(), queue());
        let picked = select(&mut ctl, &mut timers, vec![
            R::new()
                .condition(yes())
                .when_true(vec![R::new().condition(no()).behaviour(note("D"))]),
            R::new().condition(yes()).behaviour(note("Z")),
        ]);
        assert_eq!(picked.as_deref(), Some("Z"));
    }

    #[test]
    fn false_branch_is_taken_when_condition_fails() {
        let (mut ctl, mut timers) = (controller(), queue());
        let picked = select(&mut ctl, &mut timers, vec![
            R::new()
                .condition(no())
                .when_true(vec![R::fallback(note("T"))])
                .when_false(vec![R::fallback(note("F"))]),
            R::fallback(note("last")),
        ]);
        assert_eq!(picked.as_deref(), Some("F"));
    }

    #[test]
    fn deep_match_ends_the_whole_walk() {
        let (mut ctl, mut timers) = (controller(), queue());
        let picked = select(&mut ctl, &mut timers, vec![
            R::new().condition(yes()).when_true(vec![
                R::new().condition(no()).behaviour(note("skip")),
                R::new().condition(yes()).when_true(vec![R::fallback(note("deep"))]),
            ]),
            R::fallback(note("root")),
        ]);
        assert_eq!(picked.as_deref(), Some("deep"));
        assert_eq!(ctl.agent().log, vec!["deep"]);
    }

    #[test]
    fn exhausted_list_yields_nothing() {
        let (mut ctl, mut timers) = (controller(), queue());
        let picked = select(&mut ctl, &mut timers, vec![
            R::new().condition(no()).behaviour(note("A")),
            R::new().condition(yes()).when_true(vec![R::new().condition(no()).behaviour(note("B"))]),
        ]);
        assert!(picked.is_none());
        assert!(ctl.agent().log.is_empty());
    }

    #[test]
    fn on_match_runs_only_for_matching_rules() {
        let (mut ctl, mut timers) = (controller(), queue());
        select(&mut ctl, &mut timers, vec![
            R::new().condition(no()).on_match(note("configured-A")).behaviour(note("A")),
            R::new().condition(yes()).on_match(note("configured-B")).behaviour(note("B")),
        ]);
        assert_eq!(ctl.agent().log, vec!["configured-B", "B"]);
    }

    #[test]
    fn precheck_runs_before_condition_even_when_false() {
        let (mut ctl, mut timers) = (controller(), queue());
        let staged = |value: bool, label: &'static str| {
            move |ai: &mut Ai<'_, Ship>| {
                ai.agent_mut().log.push(label.to_string());
                ai.set_parameter("test_hull_ok", value);
            }
        };
        let reads = |label: &'static str| {
            move |ai: &mut Ai<'_, Ship>| {
                ai.agent_mut().log.push(label.to_string());
                ai.parameter::<bool>("test_hull_ok") == Some(&true)
            }
        };
        select(&mut ctl, &mut timers, vec![
            R::new().precheck(staged(false, "pre1")).condition(reads("cond1")).behaviour(note("one")),
            R::new().precheck(staged(true, "pre2")).condition(reads("cond2")).behaviour(note("two")),
        ]);
        assert_eq!(ctl.agent().log, vec!["pre1", "cond1", "pre2", "cond2", "two"]);
    }

    #[test]
    fn behaviour_takes_precedence_over_true_branch() {
        let (mut ctl, mut timers) = (controller(), queue());
        let picked = select(&mut ctl, &mut timers, vec![
            R::new().behaviour(note("leaf")).when_true(vec![R::fallback(note("child"))]),
        ]);
        assert_eq!(picked.as_deref(), Some("leaf"));
    }

    #[test]
    fn chosen_rule_arms_reconsider_after() {
        let (mut ctl, mut timers) = (controller(), queue());
        select(&mut ctl, &mut timers, vec![
            R::new().condition(no()).behaviour(note("A")).reconsider_after_secs(1.0),
            R::fallback(note("B")).reconsider_after(Duration::from_secs(5)),
        ]);
        let pending = ctl.pending_reconsideration().expect("timer armed");
        assert_eq!(timers.due_tick(pending), Some(Tick(20)));
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn zero_reconsider_after_arms_nothing() {
        let (mut ctl, mut timers) = (controller(), queue());
        select(&mut ctl, &mut timers, vec![R::fallback(note("A")).reconsider_after(Duration::ZERO)]);
        assert_eq!(ctl.agent().log, ["A"]);
        assert_eq!(ctl.pending_reconsideration(), None);
        assert!(timers.is_empty());

        select(&mut ctl, &mut timers, vec![R::fallback(note("B")).reconsider_after_secs(-2.0)]);
        assert_eq!(ctl.pending_reconsideration(), None);
        assert!(timers.is_empty());
    }

    #[test]
    fn unconditional_tail_always_selects() {
        let rules = || {
            vec![
                R::new().condition(|ai| ai.rng().chance(0.5)).behaviour(note("coin")),
                R::new()
                    .condition(|ai| ai.agent().hull < 50)
                    .when_true(vec![R::new().condition(|ai| ai.rng().chance(0.3)).behaviour(note("flee"))]),
                R::fallback(note("idle")),
            ]
        };
        assert!(PriorityTree::new(rules()).check_fallback().is_ok());

        for seed in 0..50 {
            for hull in [0, 49, 50, 100] {
                let mut ctl = Controller::new(AgentId(seed), "coin", Ship { hull, ..Ship::default() }, seed as u64);
                let mut timers = queue();
                assert!(select(&mut ctl, &mut timers, rules()).is_some(), "seed {seed} hull {hull}");
            }
        }
    }

    #[test]
    fn check_fallback_detects_missing_tail() {
        assert!(PriorityTree::<Ship>::default().check_fallback().is_err());
        let conditional_tail = PriorityTree::new(vec![R::new().condition(yes()).behaviour(note("A"))]);
        assert!(conditional_tail.check_fallback().is_err());
        let branch_tail = PriorityTree::new(vec![R::new().when_true(vec![R::fallback(note("A"))])]);
        assert!(branch_tail.check_fallback().is_err());
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler_tests {
    use crate::Scheduler;

    use super::*;

    #[test]
    fn detach_only_matches_pending_handle() {
        let mut timers = queue();
        let mut s = Scheduler::new();
        let h = s.schedule(&mut timers, AgentId(0), Duration::from_secs(1));
        assert!(!s.detach(pt_core::TimerHandle(99)));
        assert!(s.is_pending());
        assert!(s.detach(h));
        assert!(!s.is_pending());
    }

    #[test]
    fn rescheduling_replaces_the_pending_timer() {
        let (mut ctl, mut timers) = (controller(), queue());
        ctl.set_priorities(PriorityTree::new(vec![R::fallback(note("patrol"))]), &mut timers);
        ctl.schedule_reconsideration(Duration::from_secs(5), &mut timers);
        ctl.schedule_reconsideration(Duration::from_secs(1), &mut timers);
        assert_eq!(timers.len(), 1);

        let mut fires = Vec::new();
        for t in 1..=40 {
            for outcome in fire_due(&mut ctl, &mut timers, Tick(t)) {
                fires.push((t, outcome));
            }
        }
        assert_eq!(fires, vec![(4, Reconsideration::Selected)]);
        assert_eq!(ctl.agent().log, vec!["patrol"]);
    }

    #[test]
    fn cancel_clears_slot_and_timer() {
        let (mut ctl, mut timers) = (controller(), queue());
        ctl.schedule_reconsideration(Duration::from_secs(2), &mut timers);
        ctl.cancel_reconsideration(&mut timers);
        assert!(ctl.pending_reconsideration().is_none());
        assert!(timers.is_empty());
    }

    #[test]
    fn superseded_handle_is_stale() {
        let (mut ctl, mut timers) = (controller(), queue());
        ctl.schedule_reconsideration(Duration::from_secs(1), &mut timers);
        let first = ctl.pending_reconsideration().unwrap();
        ctl.schedule_reconsideration(Duration::from_secs(2), &mut timers);
        let second = ctl.pending_reconsideration().unwrap();

        assert_eq!(ctl.on_timer(first, &mut timers), Reconsideration::Stale);
        assert_eq!(ctl.pending_reconsideration(), Some(second));
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod controller_tests {
    use super::*;

    #[test]
    fn set_priorities_defers_evaluation_to_the_timer() {
        let (mut ctl, mut timers) = (controller(), queue());
        ctl.set_priorities(PriorityTree::new(vec![R::fallback(note("patrol"))]), &mut timers);
        assert!(ctl.agent().log.is_empty());
        let pending = ctl.pending_reconsideration().expect("reconsideration requested");
        assert_eq!(timers.due_tick(pending), Some(Tick(1)));

        assert_eq!(fire_due(&mut ctl, &mut timers, Tick(1)), vec![Reconsideration::Selected]);
        assert_eq!(ctl.agent().log, vec!["patrol"]);
        assert!(ctl.pending_reconsideration().is_none());
    }

    #[test]
    fn reconsider_now_from_behaviour_waits_for_next_fire() {
        let (mut ctl, mut timers) = (controller(), queue());
        let walks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&walks);
        let tree = PriorityTree::new(vec![
            R::new()
                .precheck(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .behaviour(|ai| ai.reconsider_now()),
        ]);
        ctl.set_priorities(tree, &mut timers);

        assert_eq!(fire_due(&mut ctl, &mut timers, Tick(1)), vec![Reconsideration::Selected]);
        assert_eq!(walks.load(Ordering::SeqCst), 1);
        let next = ctl.pending_reconsideration().expect("re-armed from inside the fire");
        assert_eq!(timers.due_tick(next), Some(Tick(2)));

        assert_eq!(fire_due(&mut ctl, &mut timers, Tick(2)), vec![Reconsideration::Selected]);
        assert_eq!(walks.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invalid_agent_fire_is_silent() {
        let (mut ctl, mut timers) = (controller(), queue());
        ctl.set_priorities(PriorityTree::new(vec![R::fallback(note("patrol"))]), &mut timers);
        ctl.agent_mut().gone = true;

        assert_eq!(fire_due(&mut ctl, &mut timers, Tick(1)), vec![Reconsideration::AgentGone]);
        assert!(ctl.agent().log.is_empty());
        assert!(ctl.pending_reconsideration().is_none());
        assert!(timers.is_empty());
    }

    #[test]
    fn no_match_keeps_previous_handlers() {
        let (mut ctl, mut timers) = (controller(), queue());
        let guard = |ai: &mut Ai<'_, Ship>| {
            ai.install_handlers(Handlers::new().on(ON_HIT, |ai, _| ai.reconsider_now()));
        };
        ctl.set_priorities(PriorityTree::new(vec![R::fallback(guard)]), &mut timers);
        assert_eq!(fire_due(&mut ctl, &mut timers, Tick(1)), vec![Reconsideration::Selected]);
        assert!(ctl.surface().is_bound(&ON_HIT));

        ctl.set_priorities(PriorityTree::new(vec![R::new().condition(no()).behaviour(note("A"))]), &mut timers);
        assert_eq!(fire_due(&mut ctl, &mut timers, Tick(2)), vec![Reconsideration::NoMatch]);
        assert!(ctl.surface().is_bound(&ON_HIT));
        assert!(ctl.pending_reconsideration().is_none());
    }

    #[test]
    fn empty_tree_is_a_no_match() {
        let (mut ctl, mut timers) = (controller(), queue());
        ctl.set_priorities(PriorityTree::default(), &mut timers);
        assert_eq!(fire_due(&mut ctl, &mut timers, Tick(1)), vec![Reconsideration::NoMatch]);
    }

    #[test]
    fn behaviour_can_swap_the_tree() {
        let (mut ctl, mut timers) = (controller(), queue());
        let tree = PriorityTree::new(vec![R::fallback(|ai| {
            ai.agent_mut().log.push("launch".into());
            ai.set_priorities(PriorityTree::new(vec![R::fallback(note("cruise"))]));
        })]);
        ctl.set_priorities(tree, &mut timers);

        fire_due(&mut ctl, &mut timers, Tick(1));
        fire_due(&mut ctl, &mut timers, Tick(2));
        assert_eq!(ctl.agent().log, vec!["launch", "cruise"]);
    }

    #[test]
    fn reconsider_now_uses_configured_delay() {
        let mut ctl = controller().with_config(crate::AiConfig { reconsider_now: Duration::from_secs(1) });
        let mut timers = queue();
        ctl.reconsider_now(&mut timers);
        let pending = ctl.pending_reconsideration().unwrap();
        assert_eq!(timers.due_tick(pending), Some(Tick(4)));
    }

    #[test]
    fn rng_is_deterministic_per_seed() {
        let rolls = |seed| {
            let mut ctl = Controller::new(AgentId(3), "dice", Ship::default(), seed);
            (0..16).map(|_| ctl.rng().gen_range(0..100u32)).collect::<Vec<_>>()
        };
        assert_eq!(rolls(11), rolls(11));
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod handler_tests {
    use super::*;

    #[test]
    fn installing_a_new_set_unbinds_the_old_one() {
        let mut ctl = controller();
        ctl.install_handlers(Handlers::new().on(ON_HIT, |ai, _| ai.reconsider_now()));
        assert!(ctl.surface().is_bound(&ON_HIT));

        ctl.install_handlers(Handlers::new().on(ON_DOCK, |ai, _| ai.reconsider_now()));
        assert!(!ctl.surface().is_bound(&ON_HIT));
        assert!(ctl.surface().is_bound(&ON_DOCK));
        let active: Vec<&str> = ctl.active_handlers().iter().map(EventName::as_str).collect();
        assert_eq!(active, vec!["entity_destroyed", "on_dock"]);
    }

    #[test]
    fn empty_set_still_gets_teardown() {
        let mut ctl = controller();
        ctl.install_handlers(Handlers::new());
        assert!(ctl.surface().is_bound(&EventName::ENTITY_DESTROYED));
        assert_eq!(ctl.surface().len(), 1);
    }

    #[test]
    fn entity_destroyed_cancels_pending_reconsideration() {
        let (mut ctl, mut timers) = (controller(), queue());
        ctl.install_handlers(Handlers::new());
        ctl.schedule_reconsideration(Duration::from_secs(3), &mut timers);

        assert!(ctl.handle_event(&EventName::ENTITY_DESTROYED, &0, &mut timers));
        assert!(ctl.pending_reconsideration().is_none());
        assert!(timers.is_empty());
    }

    #[test]
    fn supplied_entity_destroyed_is_chained() {
        let (mut ctl, mut timers) = (controller(), queue());
        ctl.install_handlers(
            Handlers::new().on(EventName::ENTITY_DESTROYED, |ai, _| {
                let still_pending = ai.pending_reconsideration().is_some();
                ai.agent_mut().log.push(format!("wreck pending={still_pending}"));
            }),
        );
        ctl.reconsider_now(&mut timers);
        ctl.handle_event(&EventName::ENTITY_DESTROYED, &0, &mut timers);
        assert_eq!(ctl.agent().log, vec!["wreck pending=false"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn handler_receives_payload_and_context() {
        let (mut ctl, mut timers) = (controller(), queue());
        ctl.install_handlers(Handlers::new().on(ON_HIT, |ai, damage| {
            ai.agent_mut().hull -= *damage;
            ai.reconsider_now();
        }));
        assert!(ctl.handle_event(&ON_HIT, &30, &mut timers));
        assert_eq!(ctl.agent().hull, 70);
        assert!(ctl.pending_reconsideration().is_some());
    }

    #[test]
    fn unbound_event_is_not_handled() {
        let (mut ctl, mut timers) = (controller(), queue());
        assert!(!ctl.handle_event(&ON_DOCK, &0, &mut timers));
    }

    #[test]
    fn externally_bound_handlers_survive_unrelated_installs() {
        let mut ctl = controller();
        let radio = EventName::from("radio".to_string());
        ctl.surface_mut().bind(radio.clone(), crate::handler(|_: &mut Ai<'_, Ship>, _: &u32| {}));
        ctl.install_handlers(Handlers::new().on(ON_HIT, |_, _| {}));
        ctl.install_handlers(Handlers::new().on(ON_DOCK, |_, _| {}));
        assert!(ctl.surface().is_bound(&radio));
        assert!(!ctl.active_handlers().contains(&radio));
    }

    #[test]
    fn merged_sets_let_later_handlers_win() {
        let (mut ctl, mut timers) = (controller(), queue());
        let standard = Handlers::new()
            .on(ON_HIT, |ai, _| ai.agent_mut().log.push("standard-hit".into()))
            .on(ON_DOCK, |ai, _| ai.agent_mut().log.push("standard-dock".into()));
        let special = Handlers::new().on(ON_DOCK, |ai, _| ai.agent_mut().log.push("special-dock".into()));

        let set = standard.merge(&special);
        assert_eq!(set.len(), 2);
        ctl.install_handlers(set);
        ctl.handle_event(&ON_HIT, &0, &mut timers);
        ctl.handle_event(&ON_DOCK, &0, &mut timers);
        assert_eq!(ctl.agent().log, vec!["standard-hit", "special-dock"]);
    }

    #[test]
    fn teardown_releases_timer_and_handlers() {
        let (mut ctl, mut timers) = (controller(), queue());
        ctl.install_handlers(Handlers::new().on(ON_HIT, |_, _| {}));
        ctl.reconsider_now(&mut timers);

        ctl.teardown(&mut timers);
        assert!(timers.is_empty());
        assert!(ctl.surface().is_empty());
        assert!(ctl.active_handlers().is_empty());
    }

    #[test]
    fn event_names_compare_by_text() {
        assert_eq!(EventName::from("on_hit".to_string()), ON_HIT);
        assert_eq!(EventName::ENTITY_DESTROYED.to_string(), "entity_destroyed");
    }
}

// ── Parameters ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod params_tests {
    use crate::{CORE_PREFIX, ParameterStore, SELECTED_KEY};

    #[test]
    fn absent_key_is_none() {
        let store = ParameterStore::new();
        assert!(store.get::<u32>("missing").is_none());
        assert!(!store.contains("missing"));
    }

    #[test]
    fn wrong_type_reads_as_absent() {
        let mut store = ParameterStore::new();
        store.set("range", 25_600.0_f64);
        assert!(store.get::<u32>("range").is_none());
        assert_eq!(store.get::<f64>("range"), Some(&25_600.0));
        assert!(store.take::<u32>("range").is_none());
        assert!(store.contains("range"));
    }

    #[test]
    fn set_opt_none_clears() {
        let mut store = ParameterStore::new();
        store.set("last_fleeing", AgentIdLike(4));
        store.set_opt::<AgentIdLike>("last_fleeing", None);
        assert!(store.get::<AgentIdLike>("last_fleeing").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn get_mut_and_take() {
        let mut store = ParameterStore::new();
        store.set("waypoints", vec![1, 2, 3]);
        store.get_mut::<Vec<i32>>("waypoints").unwrap().pop();
        assert_eq!(store.take::<Vec<i32>>("waypoints"), Some(vec![1, 2]));
        assert!(!store.contains("waypoints"));
    }

    #[test]
    fn select_first_stores_match_under_core_key() {
        let mut store = ParameterStore::new();
        store.set("scan", vec![3u32, 8, 12]);
        assert!(SELECTED_KEY.starts_with(CORE_PREFIX));

        assert!(store.select_first::<u32, _>("scan", |v| *v > 5));
        assert_eq!(store.get::<u32>(SELECTED_KEY), Some(&8));

        assert!(!store.select_first::<u32, _>("scan", |v| *v > 50));
        assert_eq!(store.get::<u32>(SELECTED_KEY), Some(&8));
        assert!(!store.select_first::<u32, _>("nothing", |_| true));
    }

    #[test]
    fn debug_lists_sorted_keys() {
        let mut store = ParameterStore::new();
        store.set("b", 1u8);
        store.set("a", 2u8);
        assert_eq!(format!("{store:?}"), r#"ParameterStore { keys: ["a", "b"] }"#);
    }

    #[derive(Debug, PartialEq)]
    struct AgentIdLike(u32);
}

// ── Communications ────────────────────────────────────────────────────────────

#[cfg(test)]
mod comms_tests {
    use super::*;

    #[test]
    fn communicate_substitutes_and_delivers() {
        let mut ctl = controller();
        ctl.set_communication("begin_attack", "Prepare to die, [p1]!");
        ctl.communicate("begin_attack", "Cobra Mk III");
        assert_eq!(ctl.agent().inbox, vec!["Prepare to die, Cobra Mk III!"]);
    }

    #[test]
    fn unregistered_key_is_silent() {
        let mut ctl = controller();
        ctl.communicate("friendly_fire", "anyone");
        assert!(ctl.agent().inbox.is_empty());
    }

    #[test]
    fn registry_render() {
        let mut reg = crate::CommunicationRegistry::new();
        reg.set("k", "no token");
        assert_eq!(reg.render("k", "x").as_deref(), Some("no token"));
        assert!(reg.render("other", "x").is_none());
        assert_eq!(reg.len(), 1);
    }
}
