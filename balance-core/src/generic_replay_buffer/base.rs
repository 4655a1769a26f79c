//! Ring buffer of transitions sampled in windows.
use super::{BatchBase, GenericTransitionBatch, SimpleReplayBufferConfig};
use crate::{error::CoreError, ExperienceBufferBase, ReplayBufferBase, TransitionBatch};
use anyhow::Result;
use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A replay buffer with a fixed capacity.
///
/// Transitions are written at a cursor that wraps around, so once the buffer is
/// full every push evicts the oldest transition. Transitions are sampled
/// uniformly with replacement, as windows of `window` consecutive entries in
/// insertion order. A window never wraps from the newest entry to the oldest.
pub struct SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    capacity: usize,

    window: usize,

    /// Position of the next write.
    i: usize,

    size: usize,

    obs: O,

    act: A,

    next_obs: O,

    reward: Vec<f32>,

    is_terminated: Vec<i8>,

    is_truncated: Vec<i8>,

    rng: StdRng,
}

impl<O, A> SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    #[inline]
    fn push_column<T: Copy>(column: &mut [T], i: usize, values: &[T]) {
        let capacity = column.len();
        for (k, v) in values.iter().enumerate() {
            column[(i + k) % capacity] = *v;
        }
    }

    /// Physical index of the oldest transition.
    fn oldest(&self) -> usize {
        if self.size < self.capacity {
            0
        } else {
            self.i
        }
    }

    fn gather(&self, ixs: Vec<usize>) -> GenericTransitionBatch<O, A> {
        GenericTransitionBatch {
            obs: self.obs.sample(&ixs),
            act: self.act.sample(&ixs),
            next_obs: self.next_obs.sample(&ixs),
            reward: ixs.iter().map(|&ix| self.reward[ix]).collect(),
            is_terminated: ixs.iter().map(|&ix| self.is_terminated[ix]).collect(),
            is_truncated: ixs.iter().map(|&ix| self.is_truncated[ix]).collect(),
            ix_sample: Some(ixs),
        }
    }

    /// Samples physical indices of window starts.
    fn sample_starts(&mut self, size: usize) -> Result<Vec<usize>> {
        if self.size < self.window {
            return Err(CoreError::NotEnoughTransitions {
                len: self.size,
                required: self.window,
            }
            .into());
        }
        let n_starts = self.size - self.window + 1;
        let oldest = self.oldest();
        Ok((0..size)
            .map(|_| (oldest + self.rng.gen_range(0..n_starts)) % self.capacity)
            .collect())
    }

    /// Samples `size` windows and returns one batch per offset in the window.
    ///
    /// The `k`-th batch holds, for every sampled window, the transition `k`
    /// positions after the window start.
    pub fn sample_window(&mut self, size: usize) -> Result<Vec<GenericTransitionBatch<O, A>>> {
        let starts = self.sample_starts(size)?;
        Ok((0..self.window)
            .map(|k| {
                let ixs = starts.iter().map(|s| (s + k) % self.capacity).collect();
                self.gather(ixs)
            })
            .collect())
    }

    /// Returns the `k`-th oldest transition.
    pub fn get(&self, k: usize) -> Option<GenericTransitionBatch<O, A>> {
        if k >= self.size {
            return None;
        }
        Some(self.gather(vec![(self.oldest() + k) % self.capacity]))
    }

    /// Maximum number of transitions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of consecutive transitions in a sampled window.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Sum of the rewards of the stored transitions.
    pub fn sum_rewards(&self) -> f32 {
        (0..self.size)
            .map(|k| self.reward[(self.oldest() + k) % self.capacity])
            .sum()
    }

    /// Number of stored transitions ending an episode by termination.
    pub fn num_terminated_flags(&self) -> usize {
        (0..self.size)
            .filter(|k| self.is_terminated[(self.oldest() + k) % self.capacity] == 1)
            .count()
    }
}

impl<O, A> ExperienceBufferBase for SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type Item = GenericTransitionBatch<O, A>;

    fn len(&self) -> usize {
        self.size
    }

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        let len = tr.len();
        let (obs, act, next_obs, reward, is_terminated, is_truncated, _) = tr.unpack();
        self.obs.push(self.i, obs);
        self.act.push(self.i, act);
        self.next_obs.push(self.i, next_obs);
        Self::push_column(&mut self.reward, self.i, &reward);
        Self::push_column(&mut self.is_terminated, self.i, &is_terminated);
        Self::push_column(&mut self.is_truncated, self.i, &is_truncated);

        self.i = (self.i + len) % self.capacity;
        self.size = (self.size + len).min(self.capacity);
        trace!("Pushed {} transition(s), size = {}", len, self.size);

        Ok(())
    }
}

impl<O, A> ReplayBufferBase for SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type Config = SimpleReplayBufferConfig;
    type Batch = GenericTransitionBatch<O, A>;

    fn build(config: &Self::Config) -> Result<Self> {
        let capacity = config.capacity;
        if capacity == 0 {
            return Err(CoreError::InvalidConfig("replay buffer capacity must be positive".into()).into());
        }
        if config.window == 0 || config.window > capacity {
            return Err(CoreError::InvalidConfig(format!(
                "window must be in 1..={}, got {}",
                capacity, config.window
            ))
            .into());
        }

        Ok(Self {
            capacity,
            window: config.window,
            i: 0,
            size: 0,
            obs: O::new(capacity),
            act: A::new(capacity),
            next_obs: O::new(capacity),
            reward: vec![0.; capacity],
            is_terminated: vec![0; capacity],
            is_truncated: vec![0; capacity],
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    /// Samples `size` transitions with the same window constraint as
    /// [`sample_window`](Self::sample_window), returning only the first
    /// transition of each window.
    ///
    /// Within an episode the `next_obs` of a transition equals the `obs` of the
    /// one after it, so the TD target needs nothing else from the window. The
    /// constraint keeps the newest transition, whose successor is not stored
    /// yet, out of the batch.
    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        let starts = self.sample_starts(size)?;
        Ok(self.gather(starts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::VecBatch;

    type Buffer = SimpleReplayBuffer<VecBatch, VecBatch>;

    fn transition(v: f32, is_terminated: i8) -> GenericTransitionBatch<VecBatch, VecBatch> {
        GenericTransitionBatch {
            obs: VecBatch(vec![v]),
            act: VecBatch(vec![0.0]),
            next_obs: VecBatch(vec![v + 1.0]),
            reward: vec![v],
            is_terminated: vec![is_terminated],
            is_truncated: vec![0],
            ix_sample: None,
        }
    }

    fn build(capacity: usize) -> Result<Buffer> {
        Buffer::build(&SimpleReplayBufferConfig::default().capacity(capacity).seed(7))
    }

    #[test]
    fn test_eviction() -> Result<()> {
        let mut buffer = build(5)?;
        for v in 0..8 {
            buffer.push(transition(v as f32, 0))?;
        }
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.get(0).unwrap().reward, vec![3.0]);
        assert_eq!(buffer.get(4).unwrap().reward, vec![7.0]);
        assert!(buffer.get(5).is_none());

        for _ in 0..20 {
            let batch = buffer.batch(16)?;
            assert!(batch.reward.iter().all(|&r| r >= 3.0));
        }
        Ok(())
    }

    #[test]
    fn test_not_enough_transitions() -> Result<()> {
        let mut buffer = build(5)?;
        buffer.push(transition(0.0, 0))?;
        let err = buffer.batch(4).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::NotEnoughTransitions { len: 1, required: 2 })
        ));

        buffer.push(transition(1.0, 0))?;
        let batch = buffer.batch(4)?;
        assert_eq!(batch.len(), 4);
        // With two entries only the first one has a successor.
        assert!(batch.reward.iter().all(|&r| r == 0.0));
        Ok(())
    }

    #[test]
    fn test_windows_are_consecutive() -> Result<()> {
        let mut buffer = build(6)?;
        for v in 0..9 {
            buffer.push(transition(v as f32, 0))?;
        }
        let windows = buffer.sample_window(32)?;
        assert_eq!(windows.len(), 2);
        for (first, second) in windows[0].reward.iter().zip(windows[1].reward.iter()) {
            assert_eq!(*second, first + 1.0);
        }
        // The newest entry never starts a window.
        assert!(windows[0].reward.iter().all(|&r| r < 8.0));
        Ok(())
    }

    #[test]
    fn test_batch_is_first_of_window() -> Result<()> {
        let mut buffer = build(6)?;
        for v in 0..9 {
            buffer.push(transition(v as f32, 0))?;
        }
        let windows = buffer.sample_window(32)?;
        for (first, second) in windows[0].next_obs.0.iter().zip(windows[1].obs.0.iter()) {
            assert_eq!(first, second);
        }

        // Same seed, so `batch` draws the starts `sample_window` drew.
        let mut buffer_ = build(6)?;
        for v in 0..9 {
            buffer_.push(transition(v as f32, 0))?;
        }
        let batch = buffer_.batch(32)?;
        assert_eq!(batch.reward, windows[0].reward);
        assert_eq!(batch.next_obs.0, windows[1].obs.0);
        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        assert!(build(0).is_err());
        let config = SimpleReplayBufferConfig::default().capacity(3).window(4);
        assert!(Buffer::build(&config).is_err());
    }

    #[test]
    fn test_flags() -> Result<()> {
        let mut buffer = build(4)?;
        buffer.push(transition(1.0, 0))?;
        buffer.push(transition(2.0, 1))?;
        assert_eq!(buffer.num_terminated_flags(), 1);
        assert_eq!(buffer.sum_rewards(), 3.0);
        Ok(())
    }

    #[test]
    fn test_serde_config() -> Result<()> {
        let config = SimpleReplayBufferConfig::default().capacity(100).window(3);
        let dir = tempdir::TempDir::new("replay_buffer_config")?;
        let path = dir.path().join("replay_buffer.yaml");
        config.save(&path)?;
        assert_eq!(config, SimpleReplayBufferConfig::load(&path)?);
        Ok(())
    }
}
