//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant.

use thiserror::Error;

/// The base error type shared by the `pt-*` crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `pt-core`.
pub type CoreResult<T> = Result<T, CoreError>;
