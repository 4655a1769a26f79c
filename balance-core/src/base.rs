//! Core functionalities.
mod agent;
mod batch;
mod env;
mod policy;
mod replay_buffer;
mod spec;
mod step;
pub use agent::Agent;
pub use batch::TransitionBatch;
pub use env::Env;
pub use policy::Policy;
pub use replay_buffer::{ExperienceBufferBase, ReplayBufferBase};
pub use spec::Spec;
pub use step::{Info, Step, StepProcessor};
use std::fmt::Debug;

/// A set of observations of an environment.
///
/// Old versions of the library support vectorized environments and
/// the length of the observation was the number of environments;
/// here an observation always describes a single environment.
pub trait Obs: Clone + Debug {
    /// Returns the number of observations in the object, 1 for a single environment.
    fn len(&self) -> usize;
}

/// A set of actions of the environment.
pub trait Act: Clone + Debug {
    /// Returns the number of actions in the object.
    fn len(&self) -> usize {
        1
    }
}
