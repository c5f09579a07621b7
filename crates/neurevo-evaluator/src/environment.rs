//! The simulation boundary consumed by the evaluators.

use neurevo_network::Network;

use crate::error::EvaluationError;

/// One simulation instance.
///
/// An environment hosts up to [`agent_capacity`](Environment::agent_capacity)
/// agents per episode, plays all of them until the simulation terminates
/// every one of them, and returns the cumulative reward each agent earned.
/// There is no engine-side timeout; termination is the environment's
/// responsibility.
pub trait Environment {
    /// Number of agents one episode can host simultaneously. Always >= 1.
    fn agent_capacity(&self) -> usize;

    /// Plays one episode with `agents.len()` agents
    /// (at most [`agent_capacity`](Environment::agent_capacity)) and returns
    /// one score per agent, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Episode`] if the simulation fails.
    fn run_episode(&mut self, agents: &[Network]) -> Result<Vec<f32>, EvaluationError>;

    /// Plays one single-agent episode. Used by tournament selection and by
    /// the crossover operator's child comparison.
    ///
    /// # Errors
    ///
    /// Propagates [`run_episode`](Environment::run_episode) failures and
    /// returns [`EvaluationError::ScoreCount`] if the episode did not yield
    /// exactly one score.
    fn score_one(&mut self, agent: &Network) -> Result<f32, EvaluationError> {
        let scores = self.run_episode(std::slice::from_ref(agent))?;
        match scores.as_slice() {
            [score] => Ok(*score),
            _ => Err(EvaluationError::ScoreCount {
                expected: 1,
                actual: scores.len(),
            }),
        }
    }
}

/// Builds isolated environment instances, one per parallel worker.
///
/// Implementations must not share mutable simulation state between spawned
/// instances; any seeding should be derived from the worker index so that
/// workers diverge.
pub trait EnvironmentFactory: Sync {
    type Env: Environment;

    /// Spawns the environment instance for `worker`.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Episode`] if the simulation cannot be
    /// brought up.
    fn spawn(&self, worker: usize) -> Result<Self::Env, EvaluationError>;
}
