//! The generation loop.

use std::time::Instant;

use neurevo_evaluator::{Environment, Evaluator};
use neurevo_network::{Network, NetworkStore};
use rand::Rng;

use crate::{
    config::{ConfigError, EvolutionConfig},
    crossover::produce_child,
    error::EvolutionError,
    mutation::mutate,
    report::GenerationRecord,
};

/// Ranked slots never overwritten by the post-ranking perturbation pass.
/// A fixed absolute count, deliberately not scaled with population size.
const PROTECTED_RANK_COUNT: usize = 10;

/// Fraction of the candidate pool given an extra mutation after ranking.
const PERTURBATION_FRACTION: f32 = 0.2;

/// Candidates drawn per selection tournament.
const TOURNAMENT_SIZE: usize = 3;

/// Final state of a finished run.
#[derive(Debug)]
pub struct EvolutionRun {
    /// One record per completed generation, in order.
    pub records: Vec<GenerationRecord>,
    /// The last generation's population, ranked best first (up to the
    /// perturbation pass, which may have re-mutated slots below the
    /// protected top 10).
    pub population: Vec<Network>,
}

/// Orchestrates selection, reproduction, evaluation and replacement.
///
/// The engine owns three collaborators: an [`Environment`] for the
/// single-episode scores used by tournaments and crossover, an
/// [`Evaluator`] for the full-pool fitness pass, and a [`NetworkStore`]
/// that receives the best individual of every generation as `gen_<N>`.
#[derive(Debug)]
pub struct EvolutionEngine<E, V, S> {
    config: EvolutionConfig,
    env: E,
    evaluator: V,
    store: S,
}

impl<E, V, S> EvolutionEngine<E, V, S>
where
    E: Environment,
    V: Evaluator,
    S: NetworkStore,
{
    /// Builds an engine, validating the configuration before anything runs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for out-of-range rates, zero sizes or a
    /// malformed network shape.
    pub fn new(
        config: EvolutionConfig,
        env: E,
        evaluator: V,
        store: S,
    ) -> Result<Self, EvolutionError> {
        config.validate()?;
        Ok(Self {
            config,
            env,
            evaluator,
            store,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Consumes the engine, returning the store (useful for inspecting
    /// in-memory checkpoints after a run).
    pub fn into_store(self) -> S {
        self.store
    }

    /// Runs the configured number of generations from a fresh random
    /// population.
    ///
    /// `observer` is called once per completed generation, before the next
    /// one starts; pass `|_| {}` when live progress is not needed.
    ///
    /// # Errors
    ///
    /// Any evaluation, operator or storage failure aborts the run.
    pub fn run<R, F>(&mut self, rng: &mut R, observer: F) -> Result<EvolutionRun, EvolutionError>
    where
        R: Rng + ?Sized,
        F: FnMut(&GenerationRecord),
    {
        let population = (0..self.config.population_size)
            .map(|_| Network::new(self.config.network_shape.clone(), rng))
            .collect::<Result<Vec<_>, _>>()?;
        self.run_from(population, rng, observer)
    }

    /// Runs the configured number of generations from a caller-provided
    /// first generation (e.g. restored checkpoints).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PopulationSize`] if the seed population does
    /// not match `population_size`; otherwise as [`run`](Self::run).
    pub fn run_from<R, F>(
        &mut self,
        mut population: Vec<Network>,
        rng: &mut R,
        mut observer: F,
    ) -> Result<EvolutionRun, EvolutionError>
    where
        R: Rng + ?Sized,
        F: FnMut(&GenerationRecord),
    {
        if population.len() != self.config.population_size {
            return Err(ConfigError::PopulationSize.into());
        }
        #[expect(
            clippy::cast_precision_loss,
            clippy::cast_sign_loss,
            clippy::cast_possible_truncation
        )]
        let crossover_count =
            (self.config.crossover_rate * self.config.population_size as f32) as usize;
        #[expect(
            clippy::cast_precision_loss,
            clippy::cast_sign_loss,
            clippy::cast_possible_truncation
        )]
        let mutation_count =
            (self.config.mutation_rate * self.config.population_size as f32) as usize;

        let mut records = Vec::with_capacity(self.config.generation_count);
        for generation in 1..=self.config.generation_count {
            let started = Instant::now();

            let parents = self.select_parents(&population, crossover_count, rng)?;
            let children = self.produce_children(&parents, rng)?;
            let mutants = self.produce_mutants(&population, mutation_count, rng)?;

            let mut pool = population;
            pool.extend(children);
            pool.extend(mutants);

            let scores = self.evaluator.evaluate(&pool)?;
            for (net, score) in pool.iter_mut().zip(&scores) {
                net.set_fitness(*score);
            }
            pool.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));

            self.store.persist(&pool[0], &format!("gen_{generation}"))?;

            self.perturb_tail(&mut pool, rng)?;
            pool.truncate(self.config.population_size);
            population = pool;

            let record = GenerationRecord::from_ranked(generation, &population, started.elapsed());
            observer(&record);
            records.push(record);
        }

        Ok(EvolutionRun {
            records,
            population,
        })
    }

    /// Tournament selection: draws [`TOURNAMENT_SIZE`] individuals with
    /// replacement, plays each through one single-agent episode, keeps the
    /// strict maximum. Ties resolve to the earliest-drawn contender.
    fn select_parents<R>(
        &mut self,
        population: &[Network],
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Network>, EvolutionError>
    where
        R: Rng + ?Sized,
    {
        let mut parents = Vec::with_capacity(count);
        for _ in 0..count {
            let mut contenders = Vec::with_capacity(TOURNAMENT_SIZE);
            for _ in 0..TOURNAMENT_SIZE {
                contenders.push(&population[rng.random_range(0..population.len())]);
            }
            parents.push(self.tournament(&contenders)?.clone());
        }
        Ok(parents)
    }

    fn tournament<'a>(
        &mut self,
        contenders: &[&'a Network],
    ) -> Result<&'a Network, EvolutionError> {
        let mut winner = None;
        for &net in contenders {
            let score = self.env.score_one(net)?;
            winner = match winner {
                Some((_, best)) if score <= best => winner,
                _ => Some((net, score)),
            };
        }
        // contenders is never empty
        Ok(winner.map(|(net, _)| net).unwrap())
    }

    /// Draws random parent pairs (with replacement) from the selected list
    /// and crosses them over; one child per selected parent.
    fn produce_children<R>(
        &mut self,
        parents: &[Network],
        rng: &mut R,
    ) -> Result<Vec<Network>, EvolutionError>
    where
        R: Rng + ?Sized,
    {
        let mut children = Vec::with_capacity(parents.len());
        for _ in 0..parents.len() {
            let first = &parents[rng.random_range(0..parents.len())];
            let second = &parents[rng.random_range(0..parents.len())];
            children.push(produce_child(
                &mut self.env,
                first,
                second,
                self.config.crossover_method,
                self.config.bias_fallback_probability,
                rng,
            )?);
        }
        Ok(children)
    }

    /// Mutates individuals drawn with replacement from the pre-generation
    /// population (never from this generation's children).
    fn produce_mutants<R>(
        &mut self,
        population: &[Network],
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Network>, EvolutionError>
    where
        R: Rng + ?Sized,
    {
        let mut mutants = Vec::with_capacity(count);
        for _ in 0..count {
            let source = &population[rng.random_range(0..population.len())];
            mutants.push(mutate(
                source,
                self.config.mutation_method,
                self.config.bias_fallback_probability,
                rng,
            )?);
        }
        Ok(mutants)
    }

    /// Extra perturbation pass over the ranked pool: for 20% of the pool
    /// size, replaces a random slot below the protected top 10 with a
    /// mutant of its current occupant. Runs after ranking and before
    /// truncation, so it can overwrite would-be survivors. Skipped when the
    /// pool has no unprotected slots.
    fn perturb_tail<R>(&self, pool: &mut [Network], rng: &mut R) -> Result<(), EvolutionError>
    where
        R: Rng + ?Sized,
    {
        if pool.len() <= PROTECTED_RANK_COUNT {
            return Ok(());
        }
        #[expect(
            clippy::cast_precision_loss,
            clippy::cast_sign_loss,
            clippy::cast_possible_truncation
        )]
        let count = (PERTURBATION_FRACTION * pool.len() as f32) as usize;
        for _ in 0..count {
            let index = rng.random_range(PROTECTED_RANK_COUNT..pool.len());
            let mutant = mutate(
                &pool[index],
                self.config.mutation_method,
                self.config.bias_fallback_probability,
                rng,
            )?;
            pool[index] = mutant;
        }
        Ok(())
    }
}
