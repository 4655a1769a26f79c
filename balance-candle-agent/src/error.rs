use thiserror::Error;

/// Errors raised by the DQN agent.
#[derive(Error, Debug)]
pub enum DqnError {
    /// A batch does not agree with the observation or action dimensions of the model.
    #[error("Batch does not match the model: {0}")]
    SpecMismatch(String),

    /// The agent configuration is incomplete or inconsistent.
    #[error("Invalid DQN configuration: {0}")]
    InvalidConfig(String),
}
