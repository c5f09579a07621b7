//! Mutation operators.
//!
//! Each operator redraws one piece of a network's parameters from the
//! standard normal distribution: a single weight, a neuron's full incoming
//! row, or a single bias. The dispatcher [`mutate`] clones its input and
//! applies exactly one operator to the clone; unlike crossover it does not
//! evaluate the result.
//!
//! Coordinate ranges are computed from the network's current dimensions at
//! call time, never cached.

use neurevo_network::Network;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::{config::MutationMethod, error::EvolutionError};

fn pick_layer<R>(net: &Network, rng: &mut R) -> Result<usize, EvolutionError>
where
    R: Rng + ?Sized,
{
    if net.depth() == 0 {
        return Err(EvolutionError::EmptyNetwork);
    }
    Ok(rng.random_range(0..net.depth()))
}

/// Replaces the weight at an explicit coordinate with a fresh draw.
pub fn weight_mutation_at<R>(net: &mut Network, layer: usize, row: usize, col: usize, rng: &mut R)
where
    R: Rng + ?Sized,
{
    net.weights_mut()[layer][row][col] = rng.sample(StandardNormal);
}

/// Replaces one uniformly chosen weight with a fresh standard-normal draw.
///
/// # Errors
///
/// Returns [`EvolutionError::EmptyNetwork`] for zero-layer networks.
pub fn weight_mutation<R>(net: &mut Network, rng: &mut R) -> Result<(), EvolutionError>
where
    R: Rng + ?Sized,
{
    let layer = pick_layer(net, rng)?;
    let row = rng.random_range(0..net.weights()[layer].len());
    let col = rng.random_range(0..net.weights()[layer][row].len());
    weight_mutation_at(net, layer, row, col, rng);
    Ok(())
}

/// Replaces one uniformly chosen neuron row with fresh standard-normal
/// draws, preserving the row length.
///
/// # Errors
///
/// Returns [`EvolutionError::EmptyNetwork`] for zero-layer networks.
pub fn neuron_mutation<R>(net: &mut Network, rng: &mut R) -> Result<(), EvolutionError>
where
    R: Rng + ?Sized,
{
    let layer = pick_layer(net, rng)?;
    let row = rng.random_range(0..net.weights()[layer].len());
    let len = net.weights()[layer][row].len();
    net.weights_mut()[layer][row] = (0..len).map(|_| rng.sample(StandardNormal)).collect();
    Ok(())
}

/// Replaces one uniformly chosen bias with a fresh standard-normal draw.
///
/// # Errors
///
/// Returns [`EvolutionError::EmptyNetwork`] for zero-layer networks.
pub fn bias_mutation<R>(net: &mut Network, rng: &mut R) -> Result<(), EvolutionError>
where
    R: Rng + ?Sized,
{
    let layer = pick_layer(net, rng)?;
    let index = rng.random_range(0..net.biases()[layer].len());
    net.biases_mut()[layer][index] = rng.sample(StandardNormal);
    Ok(())
}

/// Produces a mutant from `net`.
///
/// Clones the input, then with probability `bias_fallback_probability`
/// applies the bias mutation, otherwise the configured method. The source
/// network is never modified; the clone keeps its cached fitness until the
/// next evaluation overwrites it.
///
/// # Errors
///
/// Returns [`EvolutionError::EmptyNetwork`] for zero-layer networks.
pub fn mutate<R>(
    net: &Network,
    method: MutationMethod,
    bias_fallback_probability: f32,
    rng: &mut R,
) -> Result<Network, EvolutionError>
where
    R: Rng + ?Sized,
{
    let mut mutant = net.clone();
    if rng.random_bool(bias_fallback_probability.into()) {
        bias_mutation(&mut mutant, rng)?;
    } else {
        match method {
            MutationMethod::Weight => weight_mutation(&mut mutant, rng)?,
            MutationMethod::Neuron => neuron_mutation(&mut mutant, rng)?,
        }
    }
    Ok(mutant)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn network() -> Network {
        let mut rng = Pcg64Mcg::seed_from_u64(21);
        Network::new(vec![4, 3, 2], &mut rng).unwrap()
    }

    fn weight_diffs(x: &Network, y: &Network) -> Vec<(usize, usize, usize)> {
        let mut diffs = vec![];
        for (l, matrix) in x.weights().iter().enumerate() {
            for (r, row) in matrix.iter().enumerate() {
                for (c, w) in row.iter().enumerate() {
                    if *w != y.weights()[l][r][c] {
                        diffs.push((l, r, c));
                    }
                }
            }
        }
        diffs
    }

    #[test]
    fn forced_coordinate_mutation_touches_exactly_that_scalar() {
        let source = network();
        let mut mutated = source.clone();
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        weight_mutation_at(&mut mutated, 0, 1, 2, &mut rng);
        assert_eq!(weight_diffs(&mutated, &source), vec![(0, 1, 2)]);
        assert_eq!(mutated.biases(), source.biases());
        assert_eq!(mutated.shape(), source.shape());
    }

    #[test]
    fn weight_mutation_touches_exactly_one_scalar() {
        let source = network();
        let mut mutated = source.clone();
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        weight_mutation(&mut mutated, &mut rng).unwrap();
        assert_eq!(weight_diffs(&mutated, &source).len(), 1);
        assert_eq!(mutated.biases(), source.biases());
    }

    #[test]
    fn neuron_mutation_replaces_one_row_preserving_length() {
        let source = network();
        let mut mutated = source.clone();
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        neuron_mutation(&mut mutated, &mut rng).unwrap();
        let diffs = weight_diffs(&mutated, &source);
        let (layer, row, _) = diffs[0];
        assert!(diffs.iter().all(|&(l, r, _)| l == layer && r == row));
        assert_eq!(diffs.len(), source.weights()[layer][row].len());
        assert_eq!(
            mutated.weights()[layer][row].len(),
            source.weights()[layer][row].len()
        );
        assert_eq!(mutated.biases(), source.biases());
    }

    #[test]
    fn bias_mutation_touches_exactly_one_bias() {
        let source = network();
        let mut mutated = source.clone();
        let mut rng = Pcg64Mcg::seed_from_u64(4);
        bias_mutation(&mut mutated, &mut rng).unwrap();
        assert!(weight_diffs(&mutated, &source).is_empty());
        let bias_diffs = mutated
            .biases()
            .iter()
            .flatten()
            .zip(source.biases().iter().flatten())
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(bias_diffs, 1);
    }

    #[test]
    fn mutate_never_modifies_the_source() {
        let source = network();
        let snapshot = source.clone();
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        for _ in 0..20 {
            let mutant = mutate(&source, MutationMethod::Neuron, 0.5, &mut rng).unwrap();
            assert_eq!(mutant.shape(), source.shape());
            assert_eq!(mutant.weights().len(), source.weights().len());
            assert_eq!(mutant.biases().len(), source.biases().len());
        }
        assert_eq!(source, snapshot);
    }

    #[test]
    fn mutate_fallback_extremes_select_the_operator_family() {
        let source = network();
        let mut rng = Pcg64Mcg::seed_from_u64(6);
        let mutant = mutate(&source, MutationMethod::Weight, 1.0, &mut rng).unwrap();
        assert_eq!(mutant.weights(), source.weights());
        assert_ne!(mutant.biases(), source.biases());
        let mutant = mutate(&source, MutationMethod::Weight, 0.0, &mut rng).unwrap();
        assert_eq!(mutant.biases(), source.biases());
        assert_ne!(mutant.weights(), source.weights());
    }
}
