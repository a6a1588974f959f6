use pt_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimerError {
    #[error("timer configuration error: {0}")]
    Core(#[from] CoreError),
}

pub type TimerResult<T> = Result<T, TimerError>;
