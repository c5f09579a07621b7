//! Fitness evaluation for network populations.
//!
//! This crate defines the boundary between the evolution engine and the
//! simulated environment that actually plays episodes:
//!
//! - [`Environment`] - one simulation instance that can host a batch of
//!   agents for a single episode and returns a cumulative reward per agent
//! - [`Evaluator`] - scores a whole list of individuals, each score the mean
//!   of [`EPISODE_REPEATS`] independent episode runs
//!
//! Two evaluator implementations share the same contract: exactly
//! `individuals.len()` scores, in input order.
//!
//! # Sequential
//!
//! [`SequentialEvaluator`] drives one environment on the caller's thread,
//! batching individuals up to the environment's agent capacity.
//!
//! # Parallel
//!
//! [`ParallelEvaluator`] splits the individual list into contiguous chunks,
//! one per worker. Each worker runs on its own thread with its own
//! environment instance spawned through [`EnvironmentFactory`], so workers
//! share no simulation state. Results carry their chunk index back over a
//! channel and are reassembled in chunk order, never arrival order. The
//! caller blocks until every worker reports; a single worker failure fails
//! the whole call.

pub mod environment;
pub mod error;
pub mod evaluate;

pub use self::{
    environment::{Environment, EnvironmentFactory},
    error::EvaluationError,
    evaluate::{EPISODE_REPEATS, Evaluator, ParallelEvaluator, SequentialEvaluator},
};
