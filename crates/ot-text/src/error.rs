use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtError {
    /// The document does not have the length the operation was built for.
    #[error("base length mismatch: operation expects {expected} chars, document has {actual}")]
    BaseLengthMismatch { expected: usize, actual: usize },

    #[error("cannot compose: first operation produces {target} chars, second expects {base}")]
    ComposeLengthMismatch { target: usize, base: usize },

    #[error("cannot transform: base lengths differ ({left} vs {right})")]
    TransformLengthMismatch { left: usize, right: usize },

    #[error("invalid operation component: {0}")]
    InvalidComponent(String),
}
