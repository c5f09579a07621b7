//! Genetic-algorithm engine for evolving feed-forward networks.
//!
//! This crate implements the evolution side of the system: genetic operators
//! that recombine and perturb network parameters, tournament selection, and
//! the generation loop that ties them to fitness evaluation.
//!
//! # Generation Cycle
//!
//! Each generation performs, in order:
//!
//! 1. **Selection** - tournament selection picks parents from the current
//!    population (best of 3 random draws, each scored by one episode)
//! 2. **Offspring** - crossover combines random parent pairs; each crossover
//!    plays both resulting clones and keeps the better one
//! 3. **Mutants** - mutation produces fresh individuals from random members
//!    of the pre-generation population
//! 4. **Evaluation** - the whole pool (old + offspring + mutants) is scored
//!    through the [`Evaluator`](neurevo_evaluator::Evaluator)
//! 5. **Ranking** - the pool is sorted by fitness and the best individual is
//!    checkpointed as `gen_<N>`
//! 6. **Perturbation** - extra mutations overwrite random ranked slots below
//!    the protected top 10
//! 7. **Truncation** - the best `population_size` individuals survive
//!
//! # Operator Granularity
//!
//! Crossover swaps a single weight, a neuron row, or a whole layer matrix
//! between two clones; mutation redraws a weight, a neuron row, or a bias
//! from the standard normal distribution. Both dispatchers keep the
//! inherited bias-fallback policy: with [`EvolutionConfig::bias_fallback_probability`]
//! (default 0.5) the configured method is overridden by the bias-level
//! operator. Operators never touch their inputs; they edit private clones.
//!
//! # Randomness
//!
//! Every operator and the engine itself take an explicit `&mut R: Rng`
//! handle, so unit tests can run fully seeded. Reproducibility across
//! different worker counts is explicitly not guaranteed.

pub mod config;
pub mod crossover;
pub mod error;
pub mod genetic;
pub mod mutation;
pub mod report;

pub use self::{
    config::{ConfigError, CrossoverMethod, EvolutionConfig, MutationMethod},
    error::EvolutionError,
    genetic::{EvolutionEngine, EvolutionRun},
    report::GenerationRecord,
};
