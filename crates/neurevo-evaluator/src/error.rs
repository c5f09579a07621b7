/// Errors from episode execution and batch evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    /// The environment failed to run an episode to completion.
    #[error("episode failed: {0}")]
    Episode(String),

    /// An episode returned the wrong number of scores for its agent batch.
    #[error("episode returned {actual} scores for {expected} agents")]
    ScoreCount { expected: usize, actual: usize },

    /// A parallel evaluation worker failed or panicked; the whole
    /// evaluation is abandoned.
    #[error("evaluation worker {worker} failed: {message}")]
    Worker { worker: usize, message: String },
}
