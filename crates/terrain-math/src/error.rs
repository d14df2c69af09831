//! Error types for the linear algebra core.

use thiserror::Error;

/// Errors raised by matrix and geometry operations.
#[derive(Error, Debug)]
pub enum MathError {
    /// Operand dimensions are incompatible with the operation.
    #[error("matrix dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A row, column, or element index is outside the matrix.
    #[error("index out of bounds: {0}")]
    IndexOutOfBounds(String),

    /// The input geometry has no usable area or length.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

impl MathError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    /// Create an IndexOutOfBounds error.
    pub fn index_out_of_bounds(msg: impl Into<String>) -> Self {
        Self::IndexOutOfBounds(msg.into())
    }

    /// Create a DegenerateGeometry error.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateGeometry(msg.into())
    }
}

/// Convenience result alias for math operations.
pub type MathResult<T> = Result<T, MathError>;
