//! Dense feed-forward network parameters and forward pass.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::NetworkError;

/// A single individual: one feed-forward network plus its cached fitness.
///
/// `Clone` performs a deep copy; every matrix and vector gets fresh storage,
/// so mutating a clone never touches the source. The genetic operators rely
/// on this.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    shape: Vec<usize>,
    weights: Vec<Vec<Vec<f32>>>,
    biases: Vec<Vec<f32>>,
    fitness: f32,
}

impl Network {
    /// Creates a network with every weight and bias drawn independently from
    /// the standard normal distribution.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidShape`] if `shape` has fewer than two
    /// entries or any zero-width layer.
    pub fn new<R>(shape: Vec<usize>, rng: &mut R) -> Result<Self, NetworkError>
    where
        R: Rng + ?Sized,
    {
        validate_shape(&shape)?;
        let weights = shape
            .windows(2)
            .map(|w| {
                (0..w[1])
                    .map(|_| (0..w[0]).map(|_| rng.sample(StandardNormal)).collect())
                    .collect()
            })
            .collect();
        let biases = shape[1..]
            .iter()
            .map(|&width| (0..width).map(|_| rng.sample(StandardNormal)).collect())
            .collect();
        Ok(Self {
            shape,
            weights,
            biases,
            fitness: 0.0,
        })
    }

    /// Rebuilds a network from explicit parameters, checking the dimension
    /// invariant. Used when restoring persisted artifacts.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidShape`] if the shape is malformed or
    /// any matrix/vector dimension disagrees with it.
    pub fn from_parts(
        shape: Vec<usize>,
        weights: Vec<Vec<Vec<f32>>>,
        biases: Vec<Vec<f32>>,
    ) -> Result<Self, NetworkError> {
        validate_shape(&shape)?;
        let depth = shape.len() - 1;
        let invalid = || NetworkError::InvalidShape {
            shape: shape.clone(),
        };
        if weights.len() != depth || biases.len() != depth {
            return Err(invalid());
        }
        for layer in 0..depth {
            if weights[layer].len() != shape[layer + 1] || biases[layer].len() != shape[layer + 1] {
                return Err(invalid());
            }
            if weights[layer].iter().any(|row| row.len() != shape[layer]) {
                return Err(invalid());
            }
        }
        Ok(Self {
            shape,
            weights,
            biases,
            fitness: 0.0,
        })
    }

    /// Layer widths, input first.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of weight layers (`shape.len() - 1`).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn weights(&self) -> &[Vec<Vec<f32>>] {
        &self.weights
    }

    #[must_use]
    pub fn biases(&self) -> &[Vec<f32>] {
        &self.biases
    }

    /// Mutable weight access for the genetic operators. Callers must keep
    /// matrix dimensions consistent with `shape`.
    pub fn weights_mut(&mut self) -> &mut [Vec<Vec<f32>>] {
        &mut self.weights
    }

    /// Mutable bias access for the genetic operators.
    pub fn biases_mut(&mut self) -> &mut [Vec<f32>] {
        &mut self.biases
    }

    /// Cached fitness from the most recent evaluation. Zero for a network
    /// that has never been scored.
    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f32) {
        self.fitness = fitness;
    }

    /// Propagates an input vector through the network.
    ///
    /// Applies `sigmoid(W · a + b)` in layer order and returns the final
    /// activation vector. Pure; no state is modified.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::DimensionMismatch`] when the input length does
    /// not equal the network's input width.
    pub fn feed_forward(&self, input: &[f32]) -> Result<Vec<f32>, NetworkError> {
        if input.len() != self.shape[0] {
            return Err(NetworkError::DimensionMismatch {
                expected: self.shape[0],
                actual: input.len(),
            });
        }
        let mut activation = input.to_vec();
        for (matrix, bias) in self.weights.iter().zip(&self.biases) {
            activation = matrix
                .iter()
                .zip(bias)
                .map(|(row, b)| {
                    let z = row.iter().zip(&activation).map(|(w, a)| w * a).sum::<f32>() + b;
                    sigmoid(z)
                })
                .collect();
        }
        Ok(activation)
    }
}

/// Logistic sigmoid, the fixed activation for every layer.
fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}

fn validate_shape(shape: &[usize]) -> Result<(), NetworkError> {
    if shape.len() < 2 || shape.contains(&0) {
        return Err(NetworkError::InvalidShape {
            shape: shape.to_vec(),
        });
    }
    Ok(())
}
