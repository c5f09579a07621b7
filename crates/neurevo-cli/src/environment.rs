//! Built-in demo environment: the XOR regression task.
//!
//! A stand-in for an external simulation so the binary is runnable end to
//! end. Each agent maps the four XOR input pairs through its network; the
//! episode score is `4 - Σ squared error`, so a perfect network scores 4.0.
//! The task is deterministic, which makes training progress easy to read
//! off the generation reports.

use neurevo_evaluator::{Environment, EnvironmentFactory, EvaluationError};
use neurevo_network::Network;

const XOR_CASES: [([f32; 2], f32); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

/// Maximum achievable episode score.
pub const MAX_SCORE: f32 = 4.0;

/// Agents hosted per episode. The task has no inter-agent interaction, so
/// the capacity is just a batch size.
const AGENT_CAPACITY: usize = 64;

#[derive(Debug, Default, Clone, Copy)]
pub struct XorEnvironment;

impl XorEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for XorEnvironment {
    fn agent_capacity(&self) -> usize {
        AGENT_CAPACITY
    }

    fn run_episode(&mut self, agents: &[Network]) -> Result<Vec<f32>, EvaluationError> {
        agents
            .iter()
            .map(|net| {
                let mut error = 0.0;
                for (input, expected) in &XOR_CASES {
                    let output = net
                        .feed_forward(input)
                        .map_err(|err| EvaluationError::Episode(err.to_string()))?;
                    error += (output[0] - expected).powi(2);
                }
                Ok(MAX_SCORE - error)
            })
            .collect()
    }
}

/// Spawns one isolated (and, for this task, stateless) environment per
/// worker.
#[derive(Debug, Default, Clone, Copy)]
pub struct XorEnvironmentFactory;

impl EnvironmentFactory for XorEnvironmentFactory {
    type Env = XorEnvironment;

    fn spawn(&self, _worker: usize) -> Result<Self::Env, EvaluationError> {
        Ok(XorEnvironment::new())
    }
}

/// The demo task feeds 2 inputs and reads 1 output.
pub fn check_shape(shape: &[usize]) -> anyhow::Result<()> {
    anyhow::ensure!(
        shape.first() == Some(&2) && shape.last() == Some(&1),
        "the XOR demo environment needs shape [2, ..., 1], got {shape:?}"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn scores_are_bounded_by_the_maximum() {
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let agents: Vec<Network> = (0..5)
            .map(|_| Network::new(vec![2, 4, 1], &mut rng).unwrap())
            .collect();
        let mut env = XorEnvironment::new();
        let scores = env.run_episode(&agents).unwrap();
        assert_eq!(scores.len(), 5);
        assert!(scores.iter().all(|s| (0.0..=MAX_SCORE).contains(s)));
    }

    #[test]
    fn wrong_input_width_fails_the_episode() {
        let mut rng = Pcg64Mcg::seed_from_u64(4);
        let agent = Network::new(vec![3, 2, 1], &mut rng).unwrap();
        let mut env = XorEnvironment::new();
        assert!(env.run_episode(std::slice::from_ref(&agent)).is_err());
    }

    #[test]
    fn shape_check_requires_two_inputs_one_output() {
        assert!(check_shape(&[2, 8, 1]).is_ok());
        assert!(check_shape(&[3, 8, 1]).is_err());
        assert!(check_shape(&[2, 8, 2]).is_err());
    }
}
