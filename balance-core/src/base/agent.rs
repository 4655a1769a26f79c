//! Agent.
use super::{Env, Policy, ReplayBufferBase};
use crate::record::Record;
use anyhow::Result;

/// Represents a trainable policy on an environment.
///
/// An agent owns its parameters and hands out two views of them: a
/// collection policy used while gathering experience and a greedy policy used
/// for evaluation. Both views borrow the agent, so they always reflect the
/// latest parameters and there is no mode to switch.
pub trait Agent<E: Env, R: ReplayBufferBase> {
    /// Policy used while collecting transitions, typically exploratory.
    type CollectPolicy<'a>: Policy<E>
    where
        Self: 'a;

    /// Policy used for evaluation, deterministic given the parameters.
    type GreedyPolicy<'a>: Policy<E>
    where
        Self: 'a;

    /// Returns the exploratory view of the agent.
    fn collect_policy(&mut self) -> Self::CollectPolicy<'_>;

    /// Returns the greedy view of the agent.
    fn policy(&self) -> Self::GreedyPolicy<'_>;

    /// Performs an optimization step and returns some information.
    fn opt_with_record(&mut self, buffer: &mut R) -> Result<Record>;

    /// Performs an optimization step.
    fn opt(&mut self, buffer: &mut R) -> Result<()> {
        let _ = self.opt_with_record(buffer)?;
        Ok(())
    }

    /// Number of optimization steps done so far.
    ///
    /// Collecting transitions never changes this value.
    fn train_step_counter(&self) -> usize;
}
