//! Error types for edit normalization.

use thiserror::Error;

/// Errors raised while turning a raw edit payload into a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The payload was an event that carried no value on either target.
    #[error("edit event carries no value on its target or current target")]
    MissingValue,

    /// A custom normalizer refused the payload.
    #[error("edit rejected: {0}")]
    Rejected(String),
}

/// Result alias for normalizer output.
pub type InputResult<T> = Result<T, InputError>;
