//! Fluent builder for constructing a [`Sim`].

use std::collections::VecDeque;

use pt_ai::{Agent, AiConfig};
use pt_core::SimConfig;
use pt_timer::TimerQueue;

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<A>`].
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                                   |
/// |--------------------|-------------------------------------------|
/// | `.ai_config(c)`    | Derived from `SimConfig` (`reconsider_now_millis`) |
/// | `.capacity(n)`     | No pre-allocation                         |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim: Sim<Ship> = SimBuilder::new(config).build()?;
/// let id = sim.spawn_with_tree(ship, "patrol-ai", tree);
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:    SimConfig,
    ai_config: Option<AiConfig>,
    capacity:  usize,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self { config, ai_config: None, capacity: 0 }
    }

    /// Override the controller configuration every spawned agent receives.
    pub fn ai_config(mut self, ai_config: AiConfig) -> Self {
        self.ai_config = Some(ai_config);
        self
    }

    /// Pre-allocate room for `n` agents.
    pub fn capacity(mut self, n: usize) -> Self {
        self.capacity = n;
        self
    }

    /// Validate the configuration and return an empty, ready-to-run [`Sim`].
    pub fn build<A: Agent>(self) -> SimResult<Sim<A>> {
        if self.config.tick_millis == 0 {
            return Err(SimError::Config("tick_millis must be greater than zero".into()));
        }

        let ai_config = self.ai_config.unwrap_or_else(|| AiConfig::from(&self.config));
        let timers = TimerQueue::new(self.config.tick_millis)?;

        Ok(Sim {
            clock:       self.config.make_clock()?,
            config:      self.config,
            timers,
            ai_config,
            controllers: Vec::with_capacity(self.capacity),
            events:      VecDeque::new(),
        })
    }
}
