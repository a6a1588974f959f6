use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("priority tree is empty")]
    EmptyTree,

    #[error("last of {rules} root rules is not an unconditional behaviour; evaluation can fall through")]
    MissingFallback { rules: usize },
}

pub type AiResult<T> = Result<T, AiError>;
