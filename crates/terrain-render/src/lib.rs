//! Software terrain renderer: heightfield sampling, mesh generation, and
//! scan-conversion rasterization with contour overlays.
//!
//! The pipeline: a scalar height function is sampled into a
//! [`HeightField`], which lazily builds a triangle [`terrain_math::Model`];
//! the [`Renderer`] transforms and projects that mesh, scan-converts each
//! triangle against a per-frame z-buffer, and textures every pixel from a
//! mipmap pyramid built over either a user bitmap or the
//! [`texture_gen::TextureGenerator`] output.

pub mod error;
pub mod heightfield;
pub mod params;
pub mod renderer;
pub mod scanline;
pub mod texture_gen;

pub use error::{RenderError, RenderResult};
pub use heightfield::HeightField;
pub use params::{ProjectionMode, RenderParams};
pub use renderer::Renderer;
pub use texture_gen::TextureGenerator;
