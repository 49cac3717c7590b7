use thiserror::Error;

/// Top-level error type for the geomkit library.
#[derive(Debug, Error)]
pub enum GeomkitError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Offset(#[from] OffsetError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to operation inputs.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Fatal conditions raised by the polyline parallel offset.
#[derive(Debug, Error, PartialEq)]
pub enum OffsetError {
    #[error("at least 2 points are required for polyline offset, got {count}")]
    TooFewPoints { count: usize },

    #[error("expected 1 or {expected} offset distances, got {actual}")]
    DistanceCountMismatch { expected: usize, actual: usize },

    #[error("polyline is degenerate: every vertex is colinear or duplicate")]
    DegeneratePolyline,

    #[error(
        "colinear segments at vertex {index} have different offset distances ({first} vs {second})"
    )]
    InconsistentColinearOffsets {
        index: usize,
        first: f64,
        second: f64,
    },
}

/// Convenience type alias for results using [`GeomkitError`].
pub type Result<T> = std::result::Result<T, GeomkitError>;
