//! Persistence boundary for network checkpoints.
//!
//! The generation loop saves the best individual of every generation through
//! the [`NetworkStore`] trait. The on-disk format is one pretty-printed JSON
//! artifact per tag; [`MemoryStore`] keeps artifacts in a map for tests and
//! for callers that want to inspect checkpoints without touching the
//! filesystem.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufReader, BufWriter, Write as _},
    path::PathBuf,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::NetworkError, network::Network};

/// Errors from persisting or restoring network artifacts.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No artifact stored under the requested tag
    #[error("no artifact found for tag `{tag}`")]
    NotFound { tag: String },

    /// Stored parameters violate the dimension invariant
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Serialized form of a network checkpoint.
///
/// Round-tripping through an artifact preserves `shape`, `weights` and
/// `biases` exactly; `fitness` is carried along for inspection but is not
/// part of the network's identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkArtifact {
    pub tag: String,
    pub saved_at: DateTime<Utc>,
    pub fitness: f32,
    pub shape: Vec<usize>,
    pub weights: Vec<Vec<Vec<f32>>>,
    pub biases: Vec<Vec<f32>>,
}

impl NetworkArtifact {
    #[must_use]
    pub fn from_network(network: &Network, tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            saved_at: Utc::now(),
            fitness: network.fitness(),
            shape: network.shape().to_vec(),
            weights: network.weights().to_vec(),
            biases: network.biases().to_vec(),
        }
    }

    /// Rebuilds the network, revalidating the dimension invariant.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidShape`] if the stored parameters are
    /// inconsistent.
    pub fn into_network(self) -> Result<Network, NetworkError> {
        let mut network = Network::from_parts(self.shape, self.weights, self.biases)?;
        network.set_fitness(self.fitness);
        Ok(network)
    }
}

/// Storage boundary consumed by the generation loop.
pub trait NetworkStore {
    /// Persists `network` under `tag`, overwriting any previous artifact
    /// with the same tag.
    fn persist(&mut self, network: &Network, tag: &str) -> Result<(), StorageError>;

    /// Restores the network persisted under `tag`.
    fn restore(&self, tag: &str) -> Result<Network, StorageError>;
}

/// One `<tag>.json` file per artifact under a base directory.
#[derive(Debug)]
pub struct JsonDirectoryStore {
    dir: PathBuf,
}

impl JsonDirectoryStore {
    /// Opens (creating if needed) the artifact directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn artifact_path(&self, tag: &str) -> PathBuf {
        self.dir.join(format!("{tag}.json"))
    }
}

impl NetworkStore for JsonDirectoryStore {
    fn persist(&mut self, network: &Network, tag: &str) -> Result<(), StorageError> {
        let artifact = NetworkArtifact::from_network(network, tag);
        let file = File::create(self.artifact_path(tag))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &artifact)?;
        writer.flush()?;
        Ok(())
    }

    fn restore(&self, tag: &str) -> Result<Network, StorageError> {
        let path = self.artifact_path(tag);
        let file = File::open(&path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound {
                    tag: tag.to_owned(),
                }
            } else {
                StorageError::Io(err)
            }
        })?;
        let artifact: NetworkArtifact = serde_json::from_reader(BufReader::new(file))?;
        Ok(artifact.into_network()?)
    }
}

/// In-memory store keyed by tag.
#[derive(Debug, Default)]
pub struct MemoryStore {
    artifacts: BTreeMap<String, NetworkArtifact>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn artifacts(&self) -> &BTreeMap<String, NetworkArtifact> {
        &self.artifacts
    }
}

impl NetworkStore for MemoryStore {
    fn persist(&mut self, network: &Network, tag: &str) -> Result<(), StorageError> {
        self.artifacts
            .insert(tag.to_owned(), NetworkArtifact::from_network(network, tag));
        Ok(())
    }

    fn restore(&self, tag: &str) -> Result<Network, StorageError> {
        let artifact = self
            .artifacts
            .get(tag)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                tag: tag.to_owned(),
            })?;
        Ok(artifact.into_network()?)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn network() -> Network {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let mut net = Network::new(vec![4, 3, 2], &mut rng).unwrap();
        net.set_fitness(12.5);
        net
    }

    #[test]
    fn memory_store_round_trips_parameters_exactly() {
        let net = network();
        let mut store = MemoryStore::new();
        store.persist(&net, "gen_1").unwrap();
        let restored = store.restore("gen_1").unwrap();
        assert_eq!(restored.shape(), net.shape());
        assert_eq!(restored.weights(), net.weights());
        assert_eq!(restored.biases(), net.biases());
    }

    #[test]
    fn restore_of_unknown_tag_fails() {
        let store = MemoryStore::new();
        let err = store.restore("missing").unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[test]
    fn artifact_json_round_trip_is_exact() {
        let net = network();
        let artifact = NetworkArtifact::from_network(&net, "best");
        let json = serde_json::to_string_pretty(&artifact).unwrap();
        let parsed: NetworkArtifact = serde_json::from_str(&json).unwrap();
        let restored = parsed.into_network().unwrap();
        assert_eq!(restored.shape(), net.shape());
        assert_eq!(restored.weights(), net.weights());
        assert_eq!(restored.biases(), net.biases());
        assert_eq!(restored.fitness(), net.fitness());
    }

    #[test]
    fn json_directory_store_round_trips_via_disk() {
        let dir = std::env::temp_dir().join(format!("neurevo-store-{}", std::process::id()));
        let net = network();
        let mut store = JsonDirectoryStore::open(&dir).unwrap();
        store.persist(&net, "gen_3").unwrap();
        let restored = store.restore("gen_3").unwrap();
        assert_eq!(restored.weights(), net.weights());
        assert_eq!(restored.biases(), net.biases());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn corrupted_artifact_fails_validation() {
        let net = network();
        let mut artifact = NetworkArtifact::from_network(&net, "bad");
        artifact.biases[0].pop();
        assert!(artifact.into_network().is_err());
    }
}
