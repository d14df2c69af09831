//! Separable two-axis mipmap pyramid.
//!
//! Levels are indexed independently per axis: `level(u_level, v_level)` has
//! the base width halved `u_level` times and the base height halved
//! `v_level` times. The full grid lets the sampler pick different detail
//! along U and V, which is what gives the anisotropic-style filtering its
//! sharpness on oblique surfaces.

use std::sync::OnceLock;

use rayon::prelude::*;
use terrain_common::{Color, Raster};
use tracing::debug;

use crate::sampling::{self, interpolate_color, Filtering};

/// Mipmap pyramid over one source texture.
///
/// Generation is lazy: the base level is always available, and the first
/// access to any other level builds the whole grid (rows in parallel).
/// Once built, the grid is immutable until [`Mipmapper::load_texture`]
/// replaces the source.
#[derive(Debug)]
pub struct Mipmapper {
    texture: Raster,
    levels: OnceLock<Vec<Vec<Raster>>>,
}

/// Average a vertical texel pair in gamma space. A missing partner texel
/// falls back to the remaining one; a fully out-of-range pair is
/// transparent black.
fn halve_vertical(prev: &Raster) -> Raster {
    let width = prev.width();
    let height = prev.height() / 2;
    let pixels: Vec<Color> = (0..height)
        .into_par_iter()
        .flat_map_iter(|i| {
            (0..width).map(move |j| {
                if 2 * i >= prev.height() {
                    Color::transparent()
                } else if 2 * i + 1 >= prev.height() {
                    prev.get(j, 2 * i)
                } else {
                    interpolate_color(prev.get(j, 2 * i), prev.get(j, 2 * i + 1), 0.5)
                }
            })
        })
        .collect();
    Raster::from_pixels(width, height, pixels)
}

/// Horizontal counterpart of [`halve_vertical`].
fn halve_horizontal(prev: &Raster) -> Raster {
    let width = prev.width() / 2;
    let height = prev.height();
    let pixels: Vec<Color> = (0..height)
        .into_par_iter()
        .flat_map_iter(|i| {
            (0..width).map(move |j| {
                if 2 * j >= prev.width() {
                    Color::transparent()
                } else if 2 * j + 1 >= prev.width() {
                    prev.get(2 * j, i)
                } else {
                    interpolate_color(prev.get(2 * j, i), prev.get(2 * j + 1, i), 0.5)
                }
            })
        })
        .collect();
    Raster::from_pixels(width, height, pixels)
}

impl Mipmapper {
    pub fn new(texture: Raster) -> Self {
        Self {
            texture,
            levels: OnceLock::new(),
        }
    }

    /// Replace the source texture, discarding any generated levels.
    pub fn load_texture(&mut self, texture: Raster) {
        self.texture = texture;
        self.levels = OnceLock::new();
    }

    pub fn texture(&self) -> &Raster {
        &self.texture
    }

    /// Pyramid depth per axis: `ceil(log2(min(width, height)))`.
    pub fn depth(&self) -> usize {
        let min = self.texture.width().min(self.texture.height());
        if min < 2 {
            return if min == 1 { 1 } else { 0 };
        }
        (min as f64).log2().ceil() as usize
    }

    fn generate(&self) -> Vec<Vec<Raster>> {
        let steps = self.depth();
        debug!(
            width = self.texture.width(),
            height = self.texture.height(),
            steps,
            "generating mipmap pyramid"
        );
        let mut grid: Vec<Vec<Raster>> = Vec::with_capacity(steps);
        for m in 0..steps.max(1) {
            let first = if m == 0 {
                self.texture.clone()
            } else {
                halve_vertical(&grid[m - 1][0])
            };
            let mut row = Vec::with_capacity(steps.max(1));
            row.push(first);
            for n in 1..steps {
                let next = halve_horizontal(&row[n - 1]);
                row.push(next);
            }
            grid.push(row);
        }
        grid
    }

    /// Mipmap level with the width halved `u_level` times and the height
    /// halved `v_level` times. Indices clamp into the valid range; any
    /// non-base access triggers full generation.
    pub fn level(&self, u_level: usize, v_level: usize) -> &Raster {
        if u_level == 0 && v_level == 0 {
            return &self.texture;
        }
        let grid = self.levels.get_or_init(|| self.generate());
        let v = v_level.min(grid.len() - 1);
        let u = u_level.min(grid[v].len() - 1);
        &grid[v][u]
    }

    /// Sample the pyramid at (u, v) with fractional detail levels `mm_u`
    /// and `mm_v` (0 = full resolution, each step halves).
    ///
    /// Off/Bilinear round the levels to a single shared level; Trilinear
    /// forces the coarser of the two levels on both axes; Anisotropic
    /// blends the four surrounding levels quadrilinearly.
    pub fn color_at(&self, u: f64, v: f64, mm_u: f64, mm_v: f64, filter: Filtering) -> Color {
        let max_level = self.depth().saturating_sub(1) as f64;
        match filter {
            Filtering::Off | Filtering::Bilinear => {
                let level = (mm_u.round().min(max_level))
                    .max(mm_v.round().min(max_level))
                    .max(0.0) as usize;
                sampling::sample(self.level(level, level), u, v, filter)
            }
            Filtering::Trilinear => {
                let mm = mm_u.max(mm_v);
                self.color_quadrilinear(u, v, mm, mm)
            }
            Filtering::Anisotropic => self.color_quadrilinear(u, v, mm_u, mm_v),
        }
    }

    /// Bilinear fetches at the four neighboring (u-level, v-level) pairs,
    /// blended with the fractional level weights on both axes.
    fn color_quadrilinear(&self, u: f64, v: f64, mm_u: f64, mm_v: f64) -> Color {
        let max_level = self.depth().saturating_sub(1) as f64;
        let mm_u = mm_u.max(0.0);
        let mm_v = mm_v.max(0.0);

        let lo_u = mm_u.floor() as usize;
        let hi_u = mm_u.ceil().min(max_level) as usize;
        let lo_v = mm_v.floor() as usize;
        let hi_v = mm_v.ceil().min(max_level) as usize;

        let tl = sampling::sample_bilinear(self.level(lo_u, lo_v), u, v);
        let tr = sampling::sample_bilinear(self.level(hi_u, lo_v), u, v);
        let bl = sampling::sample_bilinear(self.level(lo_u, hi_v), u, v);
        let br = sampling::sample_bilinear(self.level(hi_u, hi_v), u, v);

        let ax = 1.0 - (mm_u.ceil().min(max_level) - mm_u).abs();
        let ay = 1.0 - (mm_v.ceil().min(max_level) - mm_v).abs();

        let t = interpolate_color(tl, tr, ax);
        let b = interpolate_color(bl, br, ax);
        interpolate_color(t, b, ay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_raster(width: usize, height: usize) -> Raster {
        let mut r = Raster::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = (255 * x / width.max(1)) as u8;
                r.put(x as i64, y as i64, Color::rgb(v, v, v));
            }
        }
        r
    }

    #[test]
    fn test_base_level_is_source() {
        let src = gradient_raster(16, 16);
        let mm = Mipmapper::new(src.clone());
        assert_eq!(mm.level(0, 0), &src);
    }

    #[test]
    fn test_depth() {
        assert_eq!(Mipmapper::new(gradient_raster(512, 512)).depth(), 9);
        assert_eq!(Mipmapper::new(gradient_raster(20, 20)).depth(), 5);
        assert_eq!(Mipmapper::new(gradient_raster(64, 16)).depth(), 4);
    }

    #[test]
    fn test_dimensions_halve() {
        let mm = Mipmapper::new(gradient_raster(16, 16));
        let l = mm.level(1, 0);
        assert_eq!((l.width(), l.height()), (8, 16));
        let l = mm.level(0, 2);
        assert_eq!((l.width(), l.height()), (16, 4));
        let l = mm.level(3, 3);
        assert_eq!((l.width(), l.height()), (2, 2));
    }

    #[test]
    fn test_level_indices_clamp() {
        let mm = Mipmapper::new(gradient_raster(16, 16));
        assert_eq!(mm.level(100, 100), mm.level(3, 3));
    }

    #[test]
    fn test_uniform_texture_stays_uniform() {
        let mm = Mipmapper::new(Raster::filled(32, 32, Color::rgb(90, 120, 30)));
        for (u_l, v_l) in [(1, 0), (0, 1), (2, 3), (4, 4)] {
            let level = mm.level(u_l, v_l);
            assert!(level
                .pixels()
                .iter()
                .all(|p| *p == Color::rgb(90, 120, 30)));
        }
        let c = mm.color_at(0.4, 0.6, 1.5, 2.5, Filtering::Anisotropic);
        assert_eq!(c, Color::rgb(90, 120, 30));
    }

    #[test]
    fn test_odd_dimension_fallback() {
        // 5 wide: halves to 2 without touching out-of-range texels
        let mm = Mipmapper::new(gradient_raster(5, 4));
        let l = mm.level(1, 0);
        assert_eq!((l.width(), l.height()), (2, 4));
    }
}
