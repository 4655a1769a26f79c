use crate::{render, CartPoleAct, CartPoleConfig, CartPoleError, CartPoleObs};
use anyhow::Result;
use balance_core::{record::Record, Env, Spec, Step};
use image::RgbImage;
use log::warn;
use rand::{rngs::StdRng, Rng, SeedableRng};

const GRAVITY: f64 = 9.8;
const MASSCART: f64 = 1.0;
const MASSPOLE: f64 = 0.1;
const TOTAL_MASS: f64 = MASSCART + MASSPOLE;
/// Half of the pole length.
pub(crate) const LENGTH: f64 = 0.5;
const POLEMASS_LENGTH: f64 = MASSPOLE * LENGTH;
const FORCE_MAG: f64 = 10.0;
/// Seconds between state updates.
const TAU: f64 = 0.02;
/// 12 degrees.
const THETA_THRESHOLD_RADIANS: f64 = 12.0 * 2.0 * std::f64::consts::PI / 360.0;
pub(crate) const X_THRESHOLD: f64 = 2.4;
const INIT_RANGE: f64 = 0.05;

/// Physical state of cart-pole.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CartPoleState {
    /// Cart position.
    pub x: f64,
    /// Cart velocity.
    pub x_dot: f64,
    /// Pole angle, 0 is upright.
    pub theta: f64,
    /// Pole angular velocity.
    pub theta_dot: f64,
}

impl CartPoleState {
    fn sample(rng: &mut impl Rng) -> Self {
        let mut u = || rng.gen_range(-INIT_RANGE..INIT_RANGE);
        Self {
            x: u(),
            x_dot: u(),
            theta: u(),
            theta_dot: u(),
        }
    }

    fn obs(&self) -> CartPoleObs {
        CartPoleObs([
            self.x as f32,
            self.x_dot as f32,
            self.theta as f32,
            self.theta_dot as f32,
        ])
    }

    fn is_failed(&self) -> bool {
        self.x.abs() > X_THRESHOLD || self.theta.abs() > THETA_THRESHOLD_RADIANS
    }

    /// Euler step of the equations of motion under a horizontal force.
    fn advance(&mut self, force: f64) {
        let cos_theta = self.theta.cos();
        let sin_theta = self.theta.sin();

        let temp = (force + POLEMASS_LENGTH * self.theta_dot.powi(2) * sin_theta) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (LENGTH * (4.0 / 3.0 - MASSPOLE * cos_theta.powi(2) / TOTAL_MASS));
        let x_acc = temp - POLEMASS_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

        self.x += TAU * self.x_dot;
        self.x_dot += TAU * x_acc;
        self.theta += TAU * self.theta_dot;
        self.theta_dot += TAU * theta_acc;
    }
}

/// Cart-pole balancing task.
///
/// A reward of 1 is given for every step, including the one that ends the
/// episode. Episodes terminate when the cart leaves `[-2.4, 2.4]` or the pole
/// tilts more than 12 degrees, and are truncated after
/// [`CartPoleConfig::max_episode_steps`] steps.
pub struct CartPoleEnv {
    config: CartPoleConfig,
    seed: i64,
    rng: StdRng,
    state: CartPoleState,
    n_steps: usize,
    is_done: bool,
}

impl CartPoleEnv {
    /// Current physical state.
    pub fn state(&self) -> &CartPoleState {
        &self.state
    }

    /// Number of steps in the current episode.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Task configuration.
    pub fn config(&self) -> &CartPoleConfig {
        &self.config
    }

    /// Draws the current state into `frame`, scaled to its size.
    pub fn render(&self, frame: &mut RgbImage) {
        render::draw(&self.state, frame);
    }

    fn start_episode(&mut self, state: CartPoleState) -> CartPoleObs {
        self.state = state;
        self.n_steps = 0;
        self.is_done = false;
        state.obs()
    }
}

impl Env for CartPoleEnv {
    type Config = CartPoleConfig;
    type Obs = CartPoleObs;
    type Act = CartPoleAct;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            seed,
            rng: StdRng::seed_from_u64(seed as u64),
            state: CartPoleState::default(),
            n_steps: 0,
            is_done: true,
        })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        let force = match a.0 {
            0 => -FORCE_MAG,
            1 => FORCE_MAG,
            a => return Err(CartPoleError::InvalidAction(a).into()),
        };

        let reward = if self.is_done {
            warn!("step() called on a finished episode, call reset() first");
            0.0
        } else {
            1.0
        };

        self.state.advance(force);
        self.n_steps += 1;

        let is_terminated = self.state.is_failed();
        let is_truncated = self.n_steps >= self.config.max_episode_steps;
        self.is_done = self.is_done || is_terminated || is_truncated;

        let step = Step::new(
            self.state.obs(),
            *a,
            reward,
            is_terminated as i8,
            is_truncated as i8,
            (),
            None,
        );
        Ok((step, Record::empty()))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        let state = CartPoleState::sample(&mut self.rng);
        Ok(self.start_episode(state))
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        let mut rng = StdRng::seed_from_u64(((self.seed as u64) << 32) ^ ix as u64);
        let state = CartPoleState::sample(&mut rng);
        Ok(self.start_episode(state))
    }

    fn observation_spec(&self) -> Spec {
        let high = vec![
            (X_THRESHOLD * 2.0) as f32,
            f32::MAX,
            (THETA_THRESHOLD_RADIANS * 2.0) as f32,
            f32::MAX,
        ];
        Spec::Box {
            shape: vec![4],
            low: high.iter().map(|v| -v).collect(),
            high,
        }
    }

    fn action_spec(&self) -> Spec {
        Spec::Discrete { n: 2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upright_pole_falls_toward_push() {
        let mut state = CartPoleState::default();
        state.advance(FORCE_MAG);
        // Pushing right accelerates the cart right and tilts the pole left.
        assert!(state.x_dot > 0.0);
        assert!(state.theta_dot < 0.0);
        assert_eq!(state.x, 0.0);
    }

    #[test]
    fn test_threshold() {
        let state = CartPoleState {
            theta: 0.21,
            ..Default::default()
        };
        assert!(state.is_failed());
        let state = CartPoleState {
            x: -2.39,
            theta: 0.2,
            ..Default::default()
        };
        assert!(!state.is_failed());
    }
}
