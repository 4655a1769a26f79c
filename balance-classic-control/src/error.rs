use thiserror::Error;

/// Errors raised by the classic control environments.
#[derive(Error, Debug, PartialEq)]
pub enum CartPoleError {
    /// The action index is not 0 (push left) or 1 (push right).
    #[error("Invalid action {0}, expected 0 or 1")]
    InvalidAction(i64),

    /// The environment name is not registered.
    #[error("Unknown environment {0}")]
    UnknownEnv(String),
}
