//! Train [`Agent`].
mod config;
mod return_series;
mod sampler;
use crate::{
    record::{
        AggregateRecorder, Record,
        RecordValue::{DateTime, Scalar},
    },
    Agent, Env, Evaluator, ExperienceBufferBase, Policy, ReplayBufferBase, StepProcessor,
};
use anyhow::Result;
use chrono::Local;
pub use config::TrainerConfig;
use log::info;
pub use return_series::ReturnSeries;
pub use sampler::Sampler;
use std::time::{Duration, Instant};

/// Phase of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Filling the replay buffer with the warm-up policy.
    Warmup,

    /// Alternating collection and optimization.
    Training,

    /// All iterations are done.
    Done,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop.
///
/// # Training loop
///
/// 1. [`Phase::Warmup`]: take exactly `initial_collect_steps` environment steps
///    with the warm-up policy and push the transitions into the replay buffer.
///    The last warm-up episode may be cut in the middle; training continues it.
/// 2. Evaluate the greedy policy of the agent; this is the first entry of the
///    returned [`ReturnSeries`], at iteration 0.
/// 3. [`Phase::Training`], repeated `num_iterations` times:
///     1. Take `collect_steps_per_iteration` environment steps with the
///        collection policy of the agent.
///     2. Do one optimization step.
///     3. If `n % log_interval == 0`, where `n` is the number of optimization
///        steps done in this run, log the loss, record computation costs and
///        flush the recorder.
///     4. If `n % eval_interval == 0`, evaluate the greedy policy and append
///        `(n, average_return)` to the series.
/// 4. [`Phase::Done`]: return the series, which has
///    `num_iterations / eval_interval + 1` entries.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     B -->|"Step&lt;E: Env&gt;"|C[StepProcessor]
///     C -->|ExperienceBufferBase::Item|D[ReplayBufferBase]
///     D -->|ReplayBufferBase::Batch|A
/// ```
pub struct Trainer {
    config: TrainerConfig,

    phase: Phase,

    /// Optimization steps for computing optimization steps per second.
    opt_steps_for_ops: usize,

    /// Timer for computing optimization steps per second.
    timer_for_ops: Duration,
}

impl Trainer {
    /// Constructs a trainer.
    ///
    /// Fails if an interval in the configuration is zero.
    pub fn build(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            phase: Phase::Warmup,
            opt_steps_for_ops: 0,
            timer_for_ops: Duration::new(0, 0),
        })
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Configuration.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Returns optimization steps per second, then resets the internal counter.
    fn opt_steps_per_sec(&mut self) -> f32 {
        let secs = self.timer_for_ops.as_secs_f32();
        let osps = match secs > 0.0 {
            true => self.opt_steps_for_ops as f32 / secs,
            false => 0.0,
        };
        self.opt_steps_for_ops = 0;
        self.timer_for_ops = Duration::new(0, 0);
        osps
    }

    /// Takes `initial_collect_steps` environment steps with `policy`.
    ///
    /// Returns the number of transitions pushed into `buffer`.
    pub fn warmup<E, P, R, W>(
        &mut self,
        sampler: &mut Sampler<E, P>,
        policy: &mut W,
        buffer: &mut R,
    ) -> Result<usize>
    where
        E: Env,
        P: StepProcessor<E>,
        R: ExperienceBufferBase<Item = P::Output>,
        W: Policy<E>,
    {
        self.phase = Phase::Warmup;
        let mut n = 0;
        while n < self.config.initial_collect_steps {
            sampler.sample_and_push(policy, buffer)?;
            n += 1;
        }
        Ok(n)
    }

    /// Performs a training iteration: collection followed by one optimization step.
    pub fn train_step<E, P, R, A>(
        &mut self,
        agent: &mut A,
        buffer: &mut R,
        sampler: &mut Sampler<E, P>,
    ) -> Result<Record>
    where
        E: Env,
        P: StepProcessor<E>,
        R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
        A: Agent<E, R>,
    {
        let mut record = Record::empty();
        for _ in 0..self.config.collect_steps_per_iteration {
            let r = sampler.sample_and_push(&mut agent.collect_policy(), buffer)?;
            record.merge_inplace(r);
        }

        let timer = Instant::now();
        let record_agent = agent.opt_with_record(buffer)?;
        self.timer_for_ops += timer.elapsed();
        self.opt_steps_for_ops += 1;

        record.merge_inplace(record_agent);
        Ok(record)
    }

    /// Trains the agent and returns the evaluation results.
    ///
    /// `warmup_policy` fills the buffer in [`Phase::Warmup`]; the agent's
    /// collection policy is used afterwards.
    #[allow(clippy::too_many_arguments)]
    pub fn train<E, P, R, A, D, W>(
        &mut self,
        env: E,
        step_proc: P,
        warmup_policy: &mut W,
        agent: &mut A,
        buffer: &mut R,
        recorder: &mut dyn AggregateRecorder,
        evaluator: &mut D,
    ) -> Result<ReturnSeries>
    where
        E: Env,
        P: StepProcessor<E>,
        R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
        A: Agent<E, R>,
        D: Evaluator<E>,
        W: Policy<E>,
    {
        let mut sampler = Sampler::new(env, step_proc);
        let mut series = ReturnSeries::new();

        let n = self.warmup(&mut sampler, warmup_policy, buffer)?;
        info!("Collected {} transitions with the warm-up policy", n);

        self.phase = Phase::Training;
        let start = agent.train_step_counter();
        let avg_return = evaluator.evaluate(&mut agent.policy())?;
        info!("step = 0: Average Return = {}", avg_return);
        series.push(0, avg_return);
        sampler.env_steps_per_sec();

        for _ in 0..self.config.num_iterations {
            let mut record = self.train_step(agent, buffer, &mut sampler)?;
            let step = agent.train_step_counter() - start;

            if step % self.config.log_interval == 0 {
                if let Ok(loss) = record.get_scalar("loss") {
                    info!("step = {}: loss = {}", step, loss);
                }
                record.insert("datetime", DateTime(Local::now()));
                record.insert("opt_steps_per_sec", Scalar(self.opt_steps_per_sec()));
                record.insert("env_steps_per_sec", Scalar(sampler.env_steps_per_sec()));
            }

            if step % self.config.eval_interval == 0 {
                let avg_return = evaluator.evaluate(&mut agent.policy())?;
                info!("step = {}: Average Return = {}", step, avg_return);
                record.insert("eval_return", Scalar(avg_return));
                series.push(step, avg_return);
            }

            if !record.is_empty() {
                recorder.store(record);
            }

            if step % self.config.log_interval == 0 {
                recorder.flush(step as _)?;
            }
        }

        self.phase = Phase::Done;
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dummy::{
            CounterBuffer, CounterConfig, CounterEnv, CountingAgent, ParityPolicy, VecBatch,
        },
        generic_replay_buffer::{SimpleReplayBufferConfig, SimpleStepProcessor},
        record::{BufferedRecorder, NullRecorder},
        DefaultEvaluator, RandomPolicy,
    };

    type StepProc = SimpleStepProcessor<CounterEnv, VecBatch, VecBatch>;

    fn run(
        config: TrainerConfig,
        agent: &mut CountingAgent,
        buffer: &mut CounterBuffer,
        recorder: &mut dyn AggregateRecorder,
    ) -> Result<(Trainer, ReturnSeries)> {
        let env_config = CounterConfig::default().episode_len(5);
        let env = CounterEnv::build(&env_config, 0)?;
        let mut evaluator = DefaultEvaluator::<CounterEnv>::new(&env_config, 1, 2)?;
        let mut warmup_policy = RandomPolicy::<CounterEnv>::build(&env.action_spec(), 0)?;
        let step_proc = StepProc::build(&Default::default());
        let mut trainer = Trainer::build(config)?;
        let series = trainer.train(
            env,
            step_proc,
            &mut warmup_policy,
            agent,
            buffer,
            recorder,
            &mut evaluator,
        )?;
        Ok((trainer, series))
    }

    fn buffer(capacity: usize) -> Result<CounterBuffer> {
        CounterBuffer::build(&SimpleReplayBufferConfig::default().capacity(capacity))
    }

    #[test]
    fn test_series_length() -> Result<()> {
        let config = TrainerConfig::default()
            .num_iterations(50)
            .initial_collect_steps(10)
            .log_interval(5)
            .eval_interval(10);
        let mut agent = CountingAgent::default();
        let mut buffer = buffer(1000)?;
        let mut recorder = BufferedRecorder::new();
        let (trainer, series) = run(config, &mut agent, &mut buffer, &mut recorder)?;

        assert_eq!(trainer.phase(), Phase::Done);
        assert_eq!(series.len(), 50 / 10 + 1);
        assert_eq!(series.iterations(), vec![0, 10, 20, 30, 40, 50]);
        assert_eq!(agent.train_step_counter(), 50);
        assert_eq!(agent.n_collect_calls, 50);
        assert_eq!(buffer.len(), 10 + 50);
        // One aggregated record per logging interval.
        assert_eq!(recorder.len(), 10);
        let last = recorder.iter().last().unwrap();
        assert_eq!(last.get_scalar("opt_steps")?, 50.0);
        assert!(last.get_scalar("eval_return").is_ok());
        assert!(matches!(
            last.get("datetime"),
            Some(crate::record::RecordValue::DateTime(_))
        ));
        Ok(())
    }

    #[test]
    fn test_warmup_only() -> Result<()> {
        let config = TrainerConfig::default()
            .num_iterations(0)
            .initial_collect_steps(13);
        let mut agent = CountingAgent::default();
        let mut buffer = buffer(1000)?;
        let mut recorder = BufferedRecorder::new();
        let (_, series) = run(config, &mut agent, &mut buffer, &mut recorder)?;

        assert_eq!(series.len(), 1);
        assert_eq!(agent.train_step_counter(), 0);
        assert_eq!(buffer.len(), 13);
        assert!(recorder.is_empty());
        Ok(())
    }

    #[test]
    fn test_counter_ignores_collection() -> Result<()> {
        let config = TrainerConfig::default()
            .num_iterations(7)
            .initial_collect_steps(4)
            .collect_steps_per_iteration(3)
            .log_interval(100)
            .eval_interval(100);
        let mut agent = CountingAgent::default();
        let mut buffer = buffer(1000)?;
        let mut recorder = NullRecorder::new();
        let (_, series) = run(config, &mut agent, &mut buffer, &mut recorder)?;

        assert_eq!(agent.train_step_counter(), 7);
        assert_eq!(buffer.len(), 4 + 7 * 3);
        assert_eq!(series.len(), 1);
        Ok(())
    }

    #[test]
    fn test_training_without_warmup_fails_on_empty_buffer() -> Result<()> {
        let config = TrainerConfig::default()
            .num_iterations(1)
            .initial_collect_steps(0);
        let mut agent = CountingAgent::default();
        let mut buffer = buffer(1000)?;
        let mut recorder = NullRecorder::new();
        assert!(run(config, &mut agent, &mut buffer, &mut recorder).is_err());
        Ok(())
    }

    struct FailingRecorder {
        n_flushes: usize,
    }

    impl AggregateRecorder for FailingRecorder {
        fn store(&mut self, _record: Record) {}

        fn flush(&mut self, _step: i64) -> Result<()> {
            self.n_flushes += 1;
            anyhow::bail!("disk full")
        }
    }

    #[test]
    fn test_recorder_failure_stops_training() -> Result<()> {
        let config = TrainerConfig::default()
            .num_iterations(20)
            .initial_collect_steps(10)
            .log_interval(5)
            .eval_interval(10);
        let mut agent = CountingAgent::default();
        let mut buffer = buffer(1000)?;
        let mut recorder = FailingRecorder { n_flushes: 0 };
        let err = run(config, &mut agent, &mut buffer, &mut recorder)
            .err()
            .ok_or_else(|| anyhow::anyhow!("training should fail"))?;

        assert!(err.to_string().contains("disk full"));
        assert_eq!(recorder.n_flushes, 1);
        assert_eq!(agent.train_step_counter(), 5);
        Ok(())
    }

    #[test]
    fn test_greedy_policy_evaluation() -> Result<()> {
        let env_config = CounterConfig::default().episode_len(4);
        let mut evaluator = DefaultEvaluator::<CounterEnv>::new(&env_config, 1, 3)?;
        let agent = CountingAgent::default();
        assert_eq!(evaluator.evaluate(&mut agent.policy())?, 4.0);
        assert_eq!(evaluator.evaluate(&mut ParityPolicy)?, 4.0);
        Ok(())
    }
}
