//! Contour texture synthesis from a sampled height field.

use terrain_common::{Color, Raster};
use terrain_texture::sampling::interpolate_color;
use tracing::debug;

use crate::heightfield::HeightField;

/// Gradient endpoint for the highest heights.
pub const HIGH_COLOR: Color = Color::from_rgb_u32(0xff6600);
/// Gradient endpoint for the lowest heights.
pub const LOW_COLOR: Color = Color::from_rgb_u32(0x669955);
/// Color of contour lines and bands.
pub const CONTOUR_COLOR: Color = Color::from_rgb_u32(0x111111);

/// Renders a height field into a color texture: a low→high gradient with
/// evenly spaced contour lines overlaid destructively.
///
/// Two contour styles exist. The default runs an edge-detection filter per
/// band over the rasterized heights, with the neighborhood picked by
/// `contour_width`. The alternate style instead paints every pixel whose
/// height falls within `contour_width` bands of a cutoff, giving solid
/// bands rather than lines.
#[derive(Debug)]
pub struct TextureGenerator<'a> {
    cache: &'a HeightField,
    width: usize,
    height: usize,

    /// Clamp of the gradient range from below.
    pub lower_z: f64,
    /// Clamp of the gradient range from above.
    pub upper_z: f64,
    pub contours: usize,
    pub contour_width: f64,
    pub contour_offset: f64,
    pub alternate_contours: bool,
}

impl<'a> TextureGenerator<'a> {
    pub fn new(cache: &'a HeightField, width: usize, height: usize) -> Self {
        Self {
            cache,
            width,
            height,
            lower_z: f64::NEG_INFINITY,
            upper_z: f64::INFINITY,
            contours: 20,
            contour_width: 0.2,
            contour_offset: 0.0,
            alternate_contours: false,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Texture pixel → domain coordinates. Row 0 maps to the upper edge of
    /// the y domain so the texture reads the usual way up.
    fn graph_to_value(&self, i: usize, j: usize) -> (f64, f64) {
        let val_x = i as f64 / self.width as f64;
        let val_y = (j as f64 - self.height as f64) / -(self.height as f64);
        (
            self.cache.lower_x() * (1.0 - val_x) + self.cache.upper_x() * val_x,
            self.cache.lower_y() * (1.0 - val_y) + self.cache.upper_y() * val_y,
        )
    }

    pub fn generate_texture(&self) -> Raster {
        debug!(
            width = self.width,
            height = self.height,
            contours = self.contours,
            alternate = self.alternate_contours,
            "generating contour texture"
        );

        let mut pixels = vec![Color::BLACK; self.width * self.height];

        let max = self.upper_z.min(self.cache.max());
        let min = self.lower_z.max(self.cache.min());
        let dz = (max - min) / self.contours as f64;

        for i in 0..self.width {
            for j in 0..self.height {
                let (x, y) = self.graph_to_value(i, j);
                let val = self.cache.get(x, y);

                let mut matched = false;
                if self.alternate_contours && self.contours > 0 {
                    for k in 0..=self.contours {
                        let center = k as f64 + self.contour_offset + 0.5;
                        let lo = min + (center - 0.5 * self.contour_width) * dz;
                        let hi = min + (center + 0.5 * self.contour_width) * dz;
                        if val >= lo && val <= hi {
                            matched = true;
                            break;
                        }
                    }
                }

                pixels[j * self.width + i] = if matched {
                    CONTOUR_COLOR
                } else {
                    let alpha = ((val - min) / (max - min)).max(0.0).min(1.0);
                    interpolate_color(LOW_COLOR, HIGH_COLOR, alpha)
                };
            }
        }

        if !self.alternate_contours {
            for k in 0..self.contours {
                self.overlay_contour_line(&mut pixels, min + (k as f64 + self.contour_offset + 0.5) * dz);
            }
        }

        Raster::from_pixels(self.width, self.height, pixels)
    }

    /// Overlay one contour line at the given cutoff height.
    fn overlay_contour_line(&self, pixels: &mut [Color], target: f64) {
        let (w, h) = (self.width, self.height);

        // above-cutoff map, column-major
        let mut data = vec![false; w * h];
        for i in 0..w {
            for j in 0..h {
                let (x, y) = self.graph_to_value(i, j);
                data[i * h + j] = self.cache.get(x, y) > target;
            }
        }
        let at = |i: i64, j: i64| -> bool {
            let i = i.clamp(0, w as i64 - 1) as usize;
            let j = j.clamp(0, h as i64 - 1) as usize;
            data[i * h + j]
        };

        for i in 0..w as i64 {
            for j in 0..h as i64 {
                let cc = at(i, j);
                let four_sides = [at(i, j + 1), at(i - 1, j), at(i + 1, j), at(i, j - 1)];
                let eight_sides = [
                    at(i - 1, j + 1),
                    at(i, j + 1),
                    at(i + 1, j + 1),
                    at(i - 1, j),
                    at(i + 1, j),
                    at(i - 1, j - 1),
                    at(i, j - 1),
                    at(i + 1, j - 1),
                ];

                // wider strokes mark the boundary on both sides of the
                // cutoff and look at more neighbors
                let edge = if self.contour_width > 0.5 {
                    (cc && eight_sides.iter().any(|n| !n))
                        || (!cc && eight_sides.iter().any(|n| *n))
                } else if self.contour_width > 0.25 {
                    (cc && four_sides.iter().any(|n| !n))
                        || (!cc && four_sides.iter().any(|n| *n))
                } else {
                    cc && four_sides.iter().any(|n| !n)
                };

                if edge {
                    pixels[j as usize * w + i as usize] = CONTOUR_COLOR;
                }
            }
        }
    }
}
