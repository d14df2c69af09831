//! Linear algebra core for the terrain plot renderer.
//!
//! A small self-contained stack: a generic 2D [`Matrix`] of doubles,
//! a 3D point type carrying texture coordinates, homogeneous transform
//! builders, an axis-angle rotation, and the triangle/mesh types consumed
//! by the rasterizer.

pub mod error;
pub mod matrix;
pub mod model;
pub mod point;
pub mod polygon;
pub mod rotation;
pub mod transform;

pub use error::{MathError, MathResult};
pub use matrix::Matrix;
pub use model::Model;
pub use point::Point3;
pub use polygon::Polygon;
pub use rotation::Rotation3;
pub use transform::Transform3;
