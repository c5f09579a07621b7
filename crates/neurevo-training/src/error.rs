use neurevo_evaluator::EvaluationError;
use neurevo_network::{NetworkError, StorageError};

use crate::config::ConfigError;

/// Errors surfaced by the genetic operators and the generation loop.
///
/// Any evaluation failure aborts the current generation; the engine does
/// not retry or continue with partial scores.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    /// A genetic operator was applied to a network with zero layers.
    #[error("genetic operator applied to a network with no layers")]
    EmptyNetwork,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
