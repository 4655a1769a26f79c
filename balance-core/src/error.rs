//! Errors in the library.
use thiserror::Error;

/// Errors raised by the core components.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The key was not found in a record.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// The value in a record has a type different from the requested one.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// A replay buffer was asked for samples before it held enough transitions.
    #[error("Replay buffer holds {len} transitions, sampling requires at least {required}")]
    NotEnoughTransitions {
        /// Number of transitions in the buffer.
        len: usize,
        /// Number of transitions required.
        required: usize,
    },

    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A component does not support the given observation or action space.
    #[error("Unsupported space: {0}")]
    UnsupportedSpec(String),
}
