//! Texture sampling for the terrain plot renderer.
//!
//! Covers UV-space fetches from a [`terrain_common::Raster`], the
//! two-axis mipmap pyramid behind anisotropic-style filtering, the
//! perceptual color-space converters, and the inverse-distance-weighting
//! color mapper that turns a bitmap into a scalar height field.

pub mod colorspace;
pub mod mapper;
pub mod mipmap;
pub mod sampling;

pub use mapper::{ColorMapper, ColorMode};
pub use mipmap::Mipmapper;
pub use sampling::Filtering;
