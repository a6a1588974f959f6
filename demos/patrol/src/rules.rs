//! Rule content for the patrol demo.
//!
//! A light fighter that flees when badly damaged, fights back when attacked,
//! looks for an open station when fuel runs low, and otherwise patrols.

use pt_ai::{Agent, Ai, EventName, HandlerSet, PriorityTree, Rule, SELECTED_KEY};

pub const SHIP_BEING_ATTACKED: EventName = EventName::new("ship_being_attacked");

const ATTACKER_KEY: &str = "patrol_attacker";
const STATIONS_KEY: &str = "patrol_stations";

/// Station names and the chance each is accepting ships on a given scan.
const STATIONS: [(&str, f64); 3] = [("Lave Station", 0.5), ("Diso Orbital", 0.3), ("Leesti Hub", 0.2)];

type ShipRule = Rule<Ship>;

// ── World types ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Attack {
    pub attacker: String,
    pub damage:   u32,
}

#[derive(Clone, Debug)]
struct Station {
    name: &'static str,
    open: bool,
}

#[derive(Debug)]
pub struct Ship {
    pub callsign:      String,
    pub hull:          u32,
    pub fuel:          u32,
    pub docked_at:     Option<&'static str>,
    pub last_attacker: Option<String>,
}

impl Ship {
    pub fn new(callsign: impl Into<String>) -> Self {
        Self {
            callsign:      callsign.into(),
            hull:          100,
            fuel:          100,
            docked_at:     None,
            last_attacker: None,
        }
    }
}

impl Agent for Ship {
    type Payload = Attack;

    fn is_valid(&self) -> bool {
        self.hull > 0
    }

    fn comms_message(&mut self, message: &str) {
        tracing::info!(ship = %self.callsign, "\"{message}\"");
    }
}

// ── AI start ──────────────────────────────────────────────────────────────────

/// Register communications and install the tree.
pub fn start(ai: &mut Ai<'_, Ship>) {
    ai.set_communication("begin_attack", "[p1], you picked the wrong ship.");
    ai.set_communication("flee", "Mayday! Breaking off from [p1].");
    ai.set_communication("dock", "Requesting docking clearance at [p1].");
    ai.set_priorities(tree());
}

pub fn tree() -> PriorityTree<Ship> {
    PriorityTree::new(vec![
        ShipRule::new()
            .condition(|ai| ai.agent().hull < 40)
            .behaviour(flee)
            .reconsider_after_secs(5.0),
        ShipRule::new()
            .condition(|ai| ai.has_parameter(ATTACKER_KEY))
            .behaviour(engage)
            .reconsider_after_secs(2.0),
        ShipRule::new()
            .condition(|ai| ai.agent().fuel < 30)
            .when_true(vec![
                ShipRule::new()
                    .precheck(scan_stations)
                    .condition(|ai| ai.select_from_parameter::<Station, _>(STATIONS_KEY, |s| s.open))
                    .behaviour(dock)
                    .reconsider_after_secs(4.0),
            ]),
        ShipRule::fallback(patrol).reconsider_after_secs(3.0),
    ])
}

// ── Handlers ──────────────────────────────────────────────────────────────────

fn take_hit(ai: &mut Ai<'_, Ship>, attack: &Attack) {
    let ship = ai.agent_mut();
    ship.hull = ship.hull.saturating_sub(attack.damage);
    ship.last_attacker = Some(attack.attacker.clone());
    tracing::info!(ship = %ship.callsign, attacker = %attack.attacker, hull = ship.hull, "hit");
}

fn standard_responses() -> HandlerSet<Ship> {
    HandlerSet::<Ship>::new()
        .on(SHIP_BEING_ATTACKED, |ai, attack| {
            take_hit(ai, attack);
            ai.set_parameter(ATTACKER_KEY, attack.attacker.clone());
            ai.reconsider_now();
        })
        .on(EventName::ENTITY_DESTROYED, |ai, attack| {
            tracing::warn!(ship = %ai.agent().callsign, attacker = %attack.attacker, "ship destroyed");
        })
}

// ── Behaviours ────────────────────────────────────────────────────────────────

fn patrol(ai: &mut Ai<'_, Ship>) {
    let ship = ai.agent_mut();
    ship.docked_at = None;
    ship.fuel = ship.fuel.saturating_sub(8);
    tracing::debug!(ship = %ship.callsign, fuel = ship.fuel, "patrolling");
    ai.install_handlers(standard_responses());
}

fn engage(ai: &mut Ai<'_, Ship>) {
    let attacker = ai.parameter::<String>(ATTACKER_KEY).cloned().unwrap_or_default();
    ai.communicate("begin_attack", &attacker);
    let ship = ai.agent_mut();
    ship.fuel = ship.fuel.saturating_sub(3);

    if ai.rng().chance(0.4) {
        tracing::info!(ship = %ai.agent().callsign, %attacker, "attacker driven off");
        ai.clear_parameter(ATTACKER_KEY);
    }

    // Already fighting: a further hit only matters if it forces a retreat.
    let fighting = HandlerSet::<Ship>::new().on(SHIP_BEING_ATTACKED, |ai, attack| {
        take_hit(ai, attack);
        if ai.agent().hull < 40 {
            ai.reconsider_now();
        }
    });
    ai.install_handlers(standard_responses().merge(&fighting));
}

fn flee(ai: &mut Ai<'_, Ship>) {
    let from = ai.agent().last_attacker.clone().unwrap_or_else(|| "hostiles".into());
    ai.communicate("flee", &from);
    ai.set_parameter_opt::<String>(ATTACKER_KEY, None);
    let ship = ai.agent_mut();
    ship.hull = (ship.hull + 15).min(100);
    ship.fuel = ship.fuel.saturating_sub(5);
    ai.install_handlers(standard_responses());
}

fn scan_stations(ai: &mut Ai<'_, Ship>) {
    let stations: Vec<Station> = STATIONS
        .iter()
        .map(|&(name, open_chance)| Station { name, open: ai.rng().chance(open_chance) })
        .collect();
    ai.set_parameter(STATIONS_KEY, stations);
}

fn dock(ai: &mut Ai<'_, Ship>) {
    let Some(station) = ai.parameter::<Station>(SELECTED_KEY).cloned() else {
        return;
    };
    ai.communicate("dock", station.name);
    let ship = ai.agent_mut();
    ship.docked_at = Some(station.name);
    ship.fuel = 100;
    ai.install_handlers(standard_responses());
}
