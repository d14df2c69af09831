//! Sampled scalar field over a rectangular domain.

use std::sync::OnceLock;

use terrain_math::{Model, Point3};
use terrain_texture::sampling::interpolate;
use tracing::debug;

use crate::error::{RenderError, RenderResult};

/// A height function sampled once into a `(resolution + 1)²` grid.
///
/// The grid is row-major with x varying fastest. `min`/`max` track the
/// extrema of the valid (non-NaN) samples and stay NaN when every sample
/// is NaN. The triangle mesh over the grid is built lazily on first use.
#[derive(Debug)]
pub struct HeightField {
    resolution: usize,
    lower_x: f64,
    upper_x: f64,
    lower_y: f64,
    upper_y: f64,
    data: Vec<f64>,
    min: f64,
    max: f64,
    model: OnceLock<Model>,
    valid: bool,
}

impl HeightField {
    /// Sample `function` on a uniform `(resolution + 1)²` grid spanning
    /// the closed domain `[lower_x, upper_x] × [lower_y, upper_y]`.
    pub fn new(
        function: impl Fn(f64, f64) -> f64,
        resolution: usize,
        lower_x: f64,
        upper_x: f64,
        lower_y: f64,
        upper_y: f64,
    ) -> RenderResult<Self> {
        if resolution < 1 {
            return Err(RenderError::InvalidResolution(resolution));
        }

        let size = resolution + 1;
        let dx = (upper_x - lower_x) / resolution as f64;
        let dy = (upper_y - lower_y) / resolution as f64;

        let mut data = Vec::with_capacity(size * size);
        let mut min = f64::NAN;
        let mut max = f64::NAN;
        for i in 0..size {
            for j in 0..size {
                let val = function(lower_x + dx * j as f64, lower_y + dy * i as f64);
                data.push(val);
                // NaN samples never win either comparison
                if (min.is_nan() && !val.is_nan()) || val < min {
                    min = val;
                }
                if (max.is_nan() && !val.is_nan()) || val > max {
                    max = val;
                }
            }
        }
        debug!(resolution, min, max, "sampled height function");

        Ok(Self {
            resolution,
            lower_x,
            upper_x,
            lower_y,
            upper_y,
            data,
            min,
            max,
            model: OnceLock::new(),
            valid: true,
        })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn lower_x(&self) -> f64 {
        self.lower_x
    }

    pub fn upper_x(&self) -> f64 {
        self.upper_x
    }

    pub fn lower_y(&self) -> f64 {
        self.lower_y
    }

    pub fn upper_y(&self) -> f64 {
        self.upper_y
    }

    /// Minimum valid sample, NaN when the field has none.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum valid sample, NaN when the field has none.
    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Mark the field stale; consumers fall back to placeholder output.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    fn grid(&self, row: usize, col: usize) -> f64 {
        self.data[row * (self.resolution + 1) + col]
    }

    /// Bilinear lookup at domain coordinates, clamped to the boundary.
    pub fn get(&self, x: f64, y: f64) -> f64 {
        let x = x.max(self.lower_x).min(self.upper_x);
        let y = y.max(self.lower_y).min(self.upper_y);

        let col = self.resolution as f64 * (x - self.lower_x) / (self.upper_x - self.lower_x);
        let row = self.resolution as f64 * (y - self.lower_y) / (self.upper_y - self.lower_y);

        let c0 = (col.floor() as usize).min(self.resolution);
        let c1 = (col.ceil() as usize).min(self.resolution);
        let r0 = (row.floor() as usize).min(self.resolution);
        let r1 = (row.ceil() as usize).min(self.resolution);

        let b = interpolate(self.grid(r0, c0), self.grid(r0, c1), col.fract());
        let t = interpolate(self.grid(r1, c0), self.grid(r1, c1), col.fract());
        interpolate(b, t, row.fract())
    }

    /// Cutoff height of contour band `index` out of `total`, between the
    /// field's min and max. Band centers sit at half-steps, shifted by
    /// `offset` bands.
    pub fn contour_cutoff_value(&self, index: usize, total: usize, offset: f64) -> f64 {
        let dz = (self.max - self.min) / total as f64;
        self.min + (index as f64 + offset + 0.5) * dz
    }

    /// Like [`HeightField::contour_cutoff_value`] but over the normalized
    /// height range [-1, 1] used by the generated mesh.
    pub fn contour_cutoff_value_normalized(&self, index: usize, total: usize, offset: f64) -> f64 {
        let dz = 2.0 / total as f64;
        -1.0 + (index as f64 + offset + 0.5) * dz
    }

    /// The triangle mesh over the sample grid, built on first access.
    pub fn model(&self) -> &Model {
        self.model.get_or_init(|| self.generate_model())
    }

    /// Build the mesh: one vertex per grid point with x/z spread over
    /// [-1, 1], height normalized into [-1, 1] on y (0 for a flat field),
    /// and two counter-wound triangles per grid cell. UVs run with the
    /// grid so the texture maps onto the full domain.
    pub fn generate_model(&self) -> Model {
        let res = self.resolution;
        let row_size = res + 1;
        let range = self.max - self.min;

        let mut vertices = Vec::with_capacity(row_size * row_size);
        for i in 0..row_size {
            for j in 0..row_size {
                let height = self.grid(i, j);
                let norm_x = 2.0 * j as f64 / res as f64 - 1.0;
                let norm_y = 2.0 * i as f64 / res as f64 - 1.0;
                let norm_z = if range > 0.0 {
                    2.0 * (height - self.min) / range - 1.0
                } else {
                    0.0
                };
                vertices.push(Point3::with_uv(
                    norm_x,
                    norm_z,
                    norm_y,
                    j as f64 / res as f64,
                    i as f64 / res as f64,
                ));
            }
        }

        let mut edges = Vec::with_capacity(3 * res * res);
        let mut triangles = Vec::with_capacity(2 * res * res);
        for i in 0..row_size {
            for j in 0..row_size {
                let index = i * row_size + j;
                if j < res {
                    edges.push((index, index + 1));
                }
                if i < res {
                    edges.push((index, index + row_size));
                    if j < res {
                        edges.push((index, index + row_size + 1));
                        triangles.push([index, index + row_size, index + row_size + 1]);
                        triangles.push([index + row_size + 1, index + 1, index]);
                    }
                }
            }
        }

        Model::new(vertices, edges, triangles)
    }
}
