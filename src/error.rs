use thiserror::Error;

/// Top-level error type for the warping engine.
#[derive(Debug, Error)]
pub enum CurveWarpError {
    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

/// Errors raised by the linear system solver.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("malformed linear system: {0}")]
    MalformedSystem(String),

    #[error("singular linear system: no usable elimination pivot")]
    SingularSystem,
}

/// Errors related to the input geometry or output buffers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("invalid quad: {0}")]
    InvalidQuad(String),

    #[error("segment counts must be at least 1, got {x} x {y}")]
    InvalidSegmentCount { x: usize, y: usize },

    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("expected {required} grid points, got {actual}")]
    PointCount { required: usize, actual: usize },

    #[error("cell ({col}, {row}) is outside the grid")]
    CellOutOfRange { col: usize, row: usize },
}

/// Errors raised while filling vertex, index or uniform buffers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TessellationError {
    #[error("buffer too small: need {required} elements, got {actual}")]
    BufferTooSmall { required: usize, actual: usize },

    #[error("grid is empty")]
    EmptyGrid,

    #[error("{vertices} vertices cannot be addressed with 32-bit indices")]
    IndexOverflow { vertices: usize },
}

impl CurveWarpError {
    /// Returns `true` when the error comes from a degenerate (singular) system,
    /// which renderers treat as "skip this cell".
    #[must_use]
    pub fn is_singular(&self) -> bool {
        matches!(self, Self::Solver(SolverError::SingularSystem))
    }
}

/// Convenience type alias for results using [`CurveWarpError`].
pub type Result<T> = std::result::Result<T, CurveWarpError>;
