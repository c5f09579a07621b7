//! Feed-forward network individuals for genetic-algorithm training.
//!
//! This crate defines the parameter representation that the evolution engine
//! operates on: a dense feed-forward network with an ordered list of weight
//! matrices and bias vectors, plus a cached fitness score.
//!
//! # Representation
//!
//! A network with shape `[4, 3, 2]` has two layers:
//!
//! ```text
//! weights[0]: 3×4 matrix    biases[0]: 3 values
//! weights[1]: 2×3 matrix    biases[1]: 2 values
//! ```
//!
//! The forward pass applies `sigmoid(W · a + b)` layer by layer. There is no
//! gradient machinery anywhere in this crate; parameters only change through
//! the genetic operators in `neurevo-training`, which always edit private
//! clones.
//!
//! # Persistence
//!
//! [`storage`] defines the [`NetworkStore`] boundary used by the generation
//! loop to checkpoint the best individual of each generation, with a JSON
//! directory implementation and an in-memory one for tests.

pub mod error;
pub mod network;
pub mod storage;

pub use self::{
    error::NetworkError,
    network::Network,
    storage::{JsonDirectoryStore, MemoryStore, NetworkArtifact, NetworkStore, StorageError},
};
