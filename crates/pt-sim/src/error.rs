use pt_core::{AgentId, CoreError};
use pt_timer::TimerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("no live agent with id {0}")]
    AgentNotFound(AgentId),

    #[error("agent table full: slot {0} has no valid AgentId")]
    TooManyAgents(usize),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("timer error: {0}")]
    Timer(#[from] TimerError),
}

pub type SimResult<T> = Result<T, SimError>;
