use thiserror::Error;

/// Errors returned by this crate's quantization and mapping entry points.
///
/// Every fallible operation here returns a typed `Error` rather than
/// panicking or aborting the process — a library does not get to terminate
/// its caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("palette bit depth must be in 1..=8, got {n}")]
    InvalidBitDepth { n: u8 },

    #[error("decimation factor must be positive, got {d}")]
    InvalidDecimation { d: i64 },

    #[error("cluster count must be positive, got {k}")]
    InvalidClusterCount { k: usize },

    #[error("requested {k} clusters but only {unique} unique colors are available")]
    TooManyClusters { k: usize, unique: usize },

    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),

    #[error("cannot map pixels against an empty palette")]
    EmptyPalette,
}
