//! Replay buffer.
use anyhow::Result;

/// Interface of buffers of experiences from environments.
///
/// Methods of this trait are used to push experiences; sampling is done
/// through [`ReplayBufferBase`].
pub trait ExperienceBufferBase {
    /// Items pushed into the buffer.
    type Item;

    /// Pushes a transition into the buffer.
    fn push(&mut self, tr: Self::Item) -> Result<()>;

    /// The number of samples in the buffer.
    fn len(&self) -> usize;

    /// Returns `true` if the buffer holds no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interface of replay buffers.
///
/// Replay buffers of this trait are used to sample batches for training agents.
pub trait ReplayBufferBase {
    /// Configuration of the replay buffer.
    type Config: Clone;

    /// Batch generated from the buffer.
    type Batch;

    /// Build a replay buffer from [Self::Config].
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Constructs a batch.
    ///
    /// Fails when the buffer does not hold enough transitions yet.
    fn batch(&mut self, size: usize) -> Result<Self::Batch>;
}
