/// Errors produced by network construction and the forward pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// Shape has fewer than two entries or a zero-width layer.
    #[error("invalid network shape {shape:?}: need at least 2 layers, all widths >= 1")]
    InvalidShape { shape: Vec<usize> },

    /// Input vector length does not match the network's input width.
    #[error("input has {actual} values, network expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}
