//! A generic replay buffer.
//!
//! [`SimpleReplayBuffer`] stores transitions in columns, one per component of a
//! transition, each of them implementing [`BatchBase`]. Observation and action
//! columns are provided by the user of the buffer, so the buffer does not depend
//! on any tensor library.
//!
//! Sampling picks windows of `window` consecutive transitions (2 by default),
//! so a sampled transition can be read together with the ones that follow it.
mod base;
mod batch;
mod config;
mod step_proc;
pub use base::SimpleReplayBuffer;
pub use batch::{BatchBase, GenericTransitionBatch};
pub use config::SimpleReplayBufferConfig;
pub use step_proc::{SimpleStepProcessor, SimpleStepProcessorConfig};
