//! Shared pixel types for the terrain plot renderer.
//!
//! Everything downstream of the sampling stage works on [`Raster`], an owned
//! row-major RGBA buffer, with [`Color`] as the value type carried through
//! blending and filtering.

pub mod color;
pub mod raster;

pub use color::{hex_to_color, Color};
pub use raster::Raster;
