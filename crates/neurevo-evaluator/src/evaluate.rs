//! Sequential and parallel batch evaluation.

use std::{sync::mpsc, thread};

use neurevo_network::Network;

use crate::{
    environment::{Environment, EnvironmentFactory},
    error::EvaluationError,
};

/// Independent episode runs averaged into each individual's score.
pub const EPISODE_REPEATS: usize = 4;

/// Scores a list of individuals.
///
/// Implementations return exactly `individuals.len()` scores, aligned with
/// the input order, each the mean of [`EPISODE_REPEATS`] episode runs.
pub trait Evaluator {
    /// # Errors
    ///
    /// Returns [`EvaluationError`] if any episode or worker fails; no
    /// partial results are produced.
    fn evaluate(&mut self, individuals: &[Network]) -> Result<Vec<f32>, EvaluationError>;
}

/// Runs the repeated-episode loop against one environment instance.
///
/// Individuals are fed to the environment in batches of up to its agent
/// capacity, the whole list is played [`EPISODE_REPEATS`] times, and the
/// per-individual totals are averaged.
fn evaluate_with_env<E>(env: &mut E, individuals: &[Network]) -> Result<Vec<f32>, EvaluationError>
where
    E: Environment + ?Sized,
{
    let capacity = env.agent_capacity();
    let mut totals = vec![0.0_f32; individuals.len()];
    for _ in 0..EPISODE_REPEATS {
        let mut offset = 0;
        for batch in individuals.chunks(capacity) {
            let scores = env.run_episode(batch)?;
            if scores.len() != batch.len() {
                return Err(EvaluationError::ScoreCount {
                    expected: batch.len(),
                    actual: scores.len(),
                });
            }
            for (total, score) in totals[offset..].iter_mut().zip(&scores) {
                *total += score;
            }
            offset += batch.len();
        }
    }
    #[expect(clippy::cast_precision_loss)]
    let repeats = EPISODE_REPEATS as f32;
    for total in &mut totals {
        *total /= repeats;
    }
    Ok(totals)
}

/// Single-threaded evaluator driving one environment.
#[derive(Debug)]
pub struct SequentialEvaluator<E> {
    env: E,
}

impl<E> SequentialEvaluator<E>
where
    E: Environment,
{
    pub fn new(env: E) -> Self {
        Self { env }
    }
}

impl<E> Evaluator for SequentialEvaluator<E>
where
    E: Environment,
{
    fn evaluate(&mut self, individuals: &[Network]) -> Result<Vec<f32>, EvaluationError> {
        evaluate_with_env(&mut self.env, individuals)
    }
}

/// Multi-worker evaluator.
///
/// The individual list is split into `n_workers` contiguous chunks; each
/// worker thread spawns its own environment through the factory, scores its
/// chunk, and sends the result back tagged with the chunk index. The caller
/// reassembles scores in chunk order, so the output alignment never depends
/// on worker completion order.
#[derive(Debug)]
pub struct ParallelEvaluator<F> {
    factory: F,
    n_workers: usize,
}

impl<F> ParallelEvaluator<F>
where
    F: EnvironmentFactory,
{
    /// # Panics
    ///
    /// Panics if `n_workers` is zero.
    pub fn new(factory: F, n_workers: usize) -> Self {
        assert!(n_workers > 0);
        Self { factory, n_workers }
    }
}

impl<F> Evaluator for ParallelEvaluator<F>
where
    F: EnvironmentFactory,
{
    fn evaluate(&mut self, individuals: &[Network]) -> Result<Vec<f32>, EvaluationError> {
        let chunks = split_contiguous(individuals, self.n_workers);
        let (tx, rx) = mpsc::channel();
        thread::scope(|s| {
            for (index, chunk) in chunks.into_iter().enumerate() {
                let tx = tx.clone();
                let factory = &self.factory;
                s.spawn(move || {
                    let result = evaluate_chunk(factory, index, chunk);
                    // receiver outlives the scope, send cannot fail
                    let _ = tx.send((index, result));
                });
            }
        });
        drop(tx);

        let mut results: Vec<_> = rx.try_iter().collect();
        results.sort_by_key(|(index, _)| *index);

        let mut scores = Vec::with_capacity(individuals.len());
        for (worker, result) in results {
            scores.extend(result.map_err(|err| EvaluationError::Worker {
                worker,
                message: err.to_string(),
            })?);
        }
        Ok(scores)
    }
}

fn evaluate_chunk<F>(
    factory: &F,
    worker: usize,
    chunk: &[Network],
) -> Result<Vec<f32>, EvaluationError>
where
    F: EnvironmentFactory,
{
    if chunk.is_empty() {
        return Ok(vec![]);
    }
    let mut env = factory.spawn(worker)?;
    evaluate_with_env(&mut env, chunk)
}

/// Splits `items` into `n` contiguous, order-preserving chunks whose sizes
/// differ by at most one, longer chunks first. Chunks may be empty when
/// there are more workers than items.
fn split_contiguous<T>(items: &[T], n: usize) -> Vec<&[T]> {
    let base = items.len() / n;
    let extra = items.len() % n;
    let mut chunks = Vec::with_capacity(n);
    let mut offset = 0;
    for index in 0..n {
        let len = base + usize::from(index < extra);
        chunks.push(&items[offset..offset + len]);
        offset += len;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    /// Environment whose episodes score each agent by its single weight.
    struct StubEnvironment {
        capacity: usize,
        episodes_run: usize,
    }

    impl StubEnvironment {
        fn new(capacity: usize) -> Self {
            Self {
                capacity,
                episodes_run: 0,
            }
        }
    }

    impl Environment for StubEnvironment {
        fn agent_capacity(&self) -> usize {
            self.capacity
        }

        fn run_episode(&mut self, agents: &[Network]) -> Result<Vec<f32>, EvaluationError> {
            self.episodes_run += 1;
            Ok(agents.iter().map(|net| net.weights()[0][0][0]).collect())
        }
    }

    struct StubFactory {
        capacity: usize,
    }

    impl EnvironmentFactory for StubFactory {
        type Env = StubEnvironment;

        fn spawn(&self, _worker: usize) -> Result<Self::Env, EvaluationError> {
            Ok(StubEnvironment::new(self.capacity))
        }
    }

    struct FailingFactory;

    impl EnvironmentFactory for FailingFactory {
        type Env = StubEnvironment;

        fn spawn(&self, worker: usize) -> Result<Self::Env, EvaluationError> {
            if worker == 1 {
                Err(EvaluationError::Episode("simulation went away".into()))
            } else {
                Ok(StubEnvironment::new(4))
            }
        }
    }

    fn marker_network(value: f32) -> Network {
        let mut rng = Pcg64Mcg::seed_from_u64(0);
        let mut net = Network::new(vec![1, 1], &mut rng).unwrap();
        net.weights_mut()[0][0][0] = value;
        net
    }

    fn marker_batch(len: u16) -> Vec<Network> {
        (0..len).map(|i| marker_network(f32::from(i))).collect()
    }

    #[test]
    fn sequential_preserves_length_and_order() {
        let batch = marker_batch(7);
        let mut evaluator = SequentialEvaluator::new(StubEnvironment::new(3));
        let scores = evaluator.evaluate(&batch).unwrap();
        let expected: Vec<f32> = (0_u16..7).map(f32::from).collect();
        assert_eq!(scores, expected);
    }

    #[test]
    fn sequential_runs_four_repeats_in_capacity_batches() {
        let batch = marker_batch(7);
        let mut evaluator = SequentialEvaluator::new(StubEnvironment::new(3));
        evaluator.evaluate(&batch).unwrap();
        // 3 batches (3+3+1 agents) times 4 repetitions
        assert_eq!(evaluator.env.episodes_run, 12);
    }

    #[test]
    fn parallel_preserves_length_and_order() {
        let batch = marker_batch(10);
        let mut evaluator = ParallelEvaluator::new(StubFactory { capacity: 2 }, 3);
        let scores = evaluator.evaluate(&batch).unwrap();
        let expected: Vec<f32> = (0_u16..10).map(f32::from).collect();
        assert_eq!(scores, expected);
    }

    #[test]
    fn parallel_handles_more_workers_than_individuals() {
        let batch = marker_batch(2);
        let mut evaluator = ParallelEvaluator::new(StubFactory { capacity: 8 }, 5);
        let scores = evaluator.evaluate(&batch).unwrap();
        assert_eq!(scores, vec![0.0, 1.0]);
    }

    #[test]
    fn parallel_worker_failure_is_fatal() {
        let batch = marker_batch(6);
        let mut evaluator = ParallelEvaluator::new(FailingFactory, 3);
        let err = evaluator.evaluate(&batch).unwrap_err();
        assert!(matches!(err, EvaluationError::Worker { worker: 1, .. }));
    }

    #[test]
    fn split_is_contiguous_with_long_chunks_first() {
        let items: Vec<u32> = (0..10).collect();
        let chunks = split_contiguous(&items, 3);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], &[0, 1, 2, 3]);
        assert_eq!(chunks[1], &[4, 5, 6]);
        assert_eq!(chunks[2], &[7, 8, 9]);
    }

    #[test]
    fn score_one_returns_a_single_score() {
        let net = marker_network(3.5);
        let mut env = StubEnvironment::new(4);
        assert_eq!(env.score_one(&net).unwrap(), 3.5);
    }

    #[test]
    fn empty_batch_yields_empty_scores() {
        let mut evaluator = SequentialEvaluator::new(StubEnvironment::new(3));
        assert_eq!(evaluator.evaluate(&[]).unwrap(), Vec::<f32>::new());
        let mut parallel = ParallelEvaluator::new(StubFactory { capacity: 3 }, 2);
        assert_eq!(parallel.evaluate(&[]).unwrap(), Vec::<f32>::new());
    }
}
