//! patrol — a handful of ships driven by priority trees.
//!
//! Each ship patrols, refuels when low, fights back when raided and flees
//! when badly damaged.  Raids are scripted in the config file; everything
//! else is decided by the ships' priority trees.
//!
//! Run with:
//!   cargo run -p patrol -- demos/patrol/config.json
//!   RUST_LOG=debug cargo run -p patrol        (built-in defaults, verbose)

mod rules;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use pt_ai::{EventName, Reconsideration};
use pt_core::{AgentId, SimConfig, Tick};
use pt_sim::{Sim, SimBuilder, SimObserver, SimResult};

use rules::{Attack, Ship};

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    sim:   SimConfig,
    ships: Vec<String>,
    raids: Vec<Raid>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sim:   SimConfig { seed: 42, ..SimConfig::default() },
            ships: vec!["Viper".into(), "Cobra".into()],
            raids: vec![Raid { tick: 40, ship: 0, attacker: "Krait".into(), damage: 45 }],
        }
    }
}

/// An attack posted to `ships[ship]` at `tick`.
#[derive(Clone, Debug, Deserialize)]
struct Raid {
    tick:     u64,
    ship:     usize,
    attacker: String,
    damage:   u32,
}

fn load_config(path: &Path) -> Result<DemoConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Tally {
    selected:  usize,
    no_match:  usize,
    gone:      usize,
    stale:     usize,
    handled:   usize,
    unhandled: usize,
}

impl SimObserver for Tally {
    fn on_event(&mut self, _tick: Tick, _agent: AgentId, _name: &EventName, handled: bool) {
        if handled {
            self.handled += 1;
        } else {
            self.unhandled += 1;
        }
    }

    fn on_reconsider(&mut self, _tick: Tick, _agent: AgentId, outcome: Reconsideration) {
        match outcome {
            Reconsideration::Selected  => self.selected += 1,
            Reconsideration::NoMatch   => self.no_match += 1,
            Reconsideration::AgentGone => self.gone += 1,
            Reconsideration::Stale     => self.stale += 1,
        }
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None       => DemoConfig::default(),
    };

    let mut sim: Sim<Ship> = SimBuilder::new(config.sim.clone())
        .capacity(config.ships.len())
        .build()?;

    let ids: Vec<AgentId> = config
        .ships
        .iter()
        .map(|name| sim.spawn(Ship::new(name.as_str()), format!("{name}-ai"), rules::start))
        .collect::<SimResult<_>>()?;

    let mut raids = config.raids.clone();
    raids.sort_by_key(|r| r.tick);
    let mut raids = raids.into_iter().peekable();

    println!(
        "patrol: {} ships, {} ticks of {} ms, seed {}",
        ids.len(),
        config.sim.total_ticks,
        config.sim.tick_millis,
        config.sim.seed,
    );

    let mut tally = Tally::default();
    let t0 = Instant::now();
    let end = sim.config.end_tick();

    while sim.clock.current_tick < end {
        let now = sim.clock.current_tick;

        while let Some(raid) = raids.next_if(|r| r.tick <= now.0) {
            let Some(&target) = ids.get(raid.ship) else {
                tracing::warn!(ship = raid.ship, "raid targets an unknown ship");
                continue;
            };
            if sim.controller(target).is_none() {
                continue;
            }
            let attack = Attack { attacker: raid.attacker, damage: raid.damage };
            sim.post_event(target, rules::SHIP_BEING_ATTACKED, attack)?;
        }

        sim.run_ticks(1, &mut tally)?;

        let wrecks: Vec<AgentId> = sim
            .live_agents()
            .filter(|&id| sim.controller(id).is_some_and(|c| c.agent().hull == 0))
            .collect();
        for id in wrecks {
            let attacker = sim
                .controller(id)
                .and_then(|c| c.agent().last_attacker.clone())
                .unwrap_or_else(|| "unknown".into());
            sim.destroy(id, Attack { attacker, damage: 0 })?;
        }
    }

    println!("\nfinished in {:.1?} at simulated {:.1?}", t0.elapsed(), sim.clock.elapsed());
    println!(
        "reconsiderations: {} selected, {} no-match, {} gone, {} stale",
        tally.selected, tally.no_match, tally.gone, tally.stale,
    );
    println!("events: {} handled, {} unhandled", tally.handled, tally.unhandled);

    for (&id, name) in ids.iter().zip(&config.ships) {
        match sim.controller(id) {
            Some(ctl) => {
                let ship = ctl.agent();
                println!(
                    "  {name:<10} hull {:>3}  fuel {:>3}  {}",
                    ship.hull,
                    ship.fuel,
                    ship.docked_at.unwrap_or("in flight"),
                );
            }
            None => println!("  {name:<10} destroyed"),
        }
    }
    Ok(())
}
