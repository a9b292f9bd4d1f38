use thiserror::Error;

/// Top-level error type for the contour graph engine.
#[derive(Debug, Error)]
pub enum ContourGraphError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to input geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Structural errors raised by graph edit primitives.
///
/// These are local to one edit. Algorithm phases treat them as "skip this
/// candidate", never as a failure of the whole computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("vertex not found")]
    VertexNotFound,

    #[error("edge not found")]
    EdgeNotFound,

    #[error("edge endpoints must be distinct vertices")]
    SelfEdge,

    #[error("an edge between these vertices already exists")]
    DuplicateEdge,

    #[error("vertices are not connected by an edge")]
    NotAdjacent,
}

/// Errors related to offset, repair and extraction operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`ContourGraphError`].
pub type Result<T> = std::result::Result<T, ContourGraphError>;
