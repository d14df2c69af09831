//! Error types for the render pipeline.

use terrain_math::MathError;
use thiserror::Error;

/// Errors that can occur while building or rendering a terrain.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Heightfield resolution must be at least 1.
    #[error("invalid resolution: {0}")]
    InvalidResolution(usize),

    /// A user-supplied parameter could not be interpreted.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A linear algebra operation failed.
    #[error("math error: {0}")]
    Math(#[from] MathError),
}

impl RenderError {
    /// Create an InvalidParameter error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

/// Convenience result alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
