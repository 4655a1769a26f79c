#![warn(missing_docs)]
//! Core components for training value-based agents on episodic environments.
//!
//! The crate defines the traits an environment, a policy, an agent and a replay
//! buffer implement, together with the generic pieces that glue them into a
//! training run:
//!
//! * [`Env`], [`Policy`], [`Agent`], [`ReplayBufferBase`] and [`ExperienceBufferBase`]
//! * [`Step`] and [`StepProcessor`], turning environment steps into transitions
//! * [`generic_replay_buffer::SimpleReplayBuffer`], a ring buffer sampling
//!   windows of consecutive transitions
//! * [`RandomPolicy`], the warm-up policy
//! * [`DefaultEvaluator`], averaging episode returns of a policy
//! * [`Trainer`], the warm-up/training state machine producing a [`ReturnSeries`]
//! * [`record`], key-value records and the recorders that aggregate them
pub mod error;
pub mod generic_replay_buffer;
pub mod record;

mod base;
pub use base::{
    Act, Agent, Env, ExperienceBufferBase, Info, Obs, Policy, ReplayBufferBase, Spec, Step,
    StepProcessor, TransitionBatch,
};

mod random_policy;
pub use random_policy::RandomPolicy;

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod trainer;
pub use trainer::{Phase, ReturnSeries, Sampler, Trainer, TrainerConfig};

#[cfg(test)]
mod dummy;
