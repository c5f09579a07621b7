//! Crossover operators.
//!
//! Each operator swaps one piece of parameter state between two networks at
//! a uniformly random coordinate: a single weight, a neuron's incoming row,
//! a whole layer matrix, or a single bias. The dispatcher [`produce_child`]
//! works on private clones of the parents, then plays both clones through a
//! single-agent episode and returns the higher scorer, so selection pressure
//! is applied inside the operator itself.
//!
//! Coordinates are sampled from the first network's current dimensions at
//! call time; both networks must share a shape.

use neurevo_evaluator::Environment;
use neurevo_network::Network;
use rand::Rng;

use crate::{config::CrossoverMethod, error::EvolutionError};

fn pick_layer<R>(net: &Network, rng: &mut R) -> Result<usize, EvolutionError>
where
    R: Rng + ?Sized,
{
    if net.depth() == 0 {
        return Err(EvolutionError::EmptyNetwork);
    }
    Ok(rng.random_range(0..net.depth()))
}

/// Swaps one scalar weight between `a` and `b`.
///
/// # Errors
///
/// Returns [`EvolutionError::EmptyNetwork`] for zero-layer networks.
pub fn weight_crossover<R>(a: &mut Network, b: &mut Network, rng: &mut R) -> Result<(), EvolutionError>
where
    R: Rng + ?Sized,
{
    let layer = pick_layer(a, rng)?;
    let row = rng.random_range(0..a.weights()[layer].len());
    let col = rng.random_range(0..a.weights()[layer][row].len());
    let tmp = a.weights()[layer][row][col];
    a.weights_mut()[layer][row][col] = b.weights()[layer][row][col];
    b.weights_mut()[layer][row][col] = tmp;
    Ok(())
}

/// Swaps one neuron's full incoming-weight row between `a` and `b`.
///
/// # Errors
///
/// Returns [`EvolutionError::EmptyNetwork`] for zero-layer networks.
pub fn neuron_crossover<R>(a: &mut Network, b: &mut Network, rng: &mut R) -> Result<(), EvolutionError>
where
    R: Rng + ?Sized,
{
    let layer = pick_layer(a, rng)?;
    let row = rng.random_range(0..a.weights()[layer].len());
    std::mem::swap(
        &mut a.weights_mut()[layer][row],
        &mut b.weights_mut()[layer][row],
    );
    Ok(())
}

/// Swaps one layer's entire weight matrix between `a` and `b`.
///
/// # Errors
///
/// Returns [`EvolutionError::EmptyNetwork`] for zero-layer networks.
pub fn layer_crossover<R>(a: &mut Network, b: &mut Network, rng: &mut R) -> Result<(), EvolutionError>
where
    R: Rng + ?Sized,
{
    let layer = pick_layer(a, rng)?;
    std::mem::swap(&mut a.weights_mut()[layer], &mut b.weights_mut()[layer]);
    Ok(())
}

/// Swaps one scalar bias between `a` and `b`.
///
/// # Errors
///
/// Returns [`EvolutionError::EmptyNetwork`] for zero-layer networks.
pub fn bias_crossover<R>(a: &mut Network, b: &mut Network, rng: &mut R) -> Result<(), EvolutionError>
where
    R: Rng + ?Sized,
{
    let layer = pick_layer(a, rng)?;
    let index = rng.random_range(0..a.biases()[layer].len());
    let tmp = a.biases()[layer][index];
    a.biases_mut()[layer][index] = b.biases()[layer][index];
    b.biases_mut()[layer][index] = tmp;
    Ok(())
}

/// Produces one child from two parents.
///
/// Both parents are cloned; with probability `bias_fallback_probability` the
/// bias-level swap is applied, otherwise the configured structural method.
/// Each clone then plays one single-agent episode and the higher scorer is
/// returned (the second clone on ties). The parents are never modified.
///
/// # Errors
///
/// Propagates operator errors and episode failures.
pub fn produce_child<E, R>(
    env: &mut E,
    parent1: &Network,
    parent2: &Network,
    method: CrossoverMethod,
    bias_fallback_probability: f32,
    rng: &mut R,
) -> Result<Network, EvolutionError>
where
    E: Environment + ?Sized,
    R: Rng + ?Sized,
{
    let mut first = parent1.clone();
    let mut second = parent2.clone();
    if rng.random_bool(bias_fallback_probability.into()) {
        bias_crossover(&mut first, &mut second, rng)?;
    } else {
        match method {
            CrossoverMethod::Weight => weight_crossover(&mut first, &mut second, rng)?,
            CrossoverMethod::Neuron => neuron_crossover(&mut first, &mut second, rng)?,
            CrossoverMethod::Layer => layer_crossover(&mut first, &mut second, rng)?,
        }
    }
    let score1 = env.score_one(&first)?;
    let score2 = env.score_one(&second)?;
    Ok(if score1 > score2 { first } else { second })
}
