//! UV-space texture fetches and gamma-correct blending.

use serde::{Deserialize, Serialize};
use terrain_common::{Color, Raster};

/// Display gamma assumed for all color blending.
pub const GAMMA: f64 = 2.2;

/// Texture filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Filtering {
    Off,
    Bilinear,
    Trilinear,
    #[default]
    Anisotropic,
}

/// Linear interpolation: `alpha` = 0 gives `a`, 1 gives `b`.
pub fn interpolate(a: f64, b: f64, alpha: f64) -> f64 {
    b * alpha + a * (1.0 - alpha)
}

/// Blend two colors in gamma space: components are linearized with
/// [`GAMMA`], mixed, and re-encoded. Alpha mixes linearly.
pub fn interpolate_color(c1: Color, c2: Color, alpha: f64) -> Color {
    let mix = |a: u8, b: u8| -> u8 {
        let lin = interpolate(
            (a as f64 / 255.0).powf(GAMMA),
            (b as f64 / 255.0).powf(GAMMA),
            alpha,
        );
        (255.0 * lin.powf(1.0 / GAMMA)).round() as u8
    };
    Color::new(
        mix(c1.r, c2.r),
        mix(c1.g, c2.g),
        mix(c1.b, c2.b),
        interpolate(c1.a as f64, c2.a as f64, alpha).round() as u8,
    )
}

/// Wrap UV coordinates into [0, 1) and scale to texel space.
///
/// Whole-number parts are discarded, with negative inputs shifted up so
/// the texture tiles in both directions.
pub fn uv_to_xy(texture: &Raster, u: f64, v: f64) -> (f64, f64) {
    let wrap = |t: f64| t - t.trunc() + if t < 0.0 { 1.0 } else { 0.0 };
    (
        texture.width() as f64 * wrap(u),
        texture.height() as f64 * wrap(v),
    )
}

/// Nearest-texel fetch with edge clamping.
pub fn sample_nearest(texture: &Raster, u: f64, v: f64) -> Color {
    let (x, y) = uv_to_xy(texture, u, v);
    texture.get_clamped(x.round() as i64, y.round() as i64)
}

/// 4-texel bilinear fetch with edge clamping and gamma-space blending.
pub fn sample_bilinear(texture: &Raster, u: f64, v: f64) -> Color {
    let (x, y) = uv_to_xy(texture, u, v);

    let tl = texture.get_clamped(x.floor() as i64, y.floor() as i64);
    let tr = texture.get_clamped(x.ceil() as i64, y.floor() as i64);
    let bl = texture.get_clamped(x.floor() as i64, y.ceil() as i64);
    let br = texture.get_clamped(x.ceil() as i64, y.ceil() as i64);

    // fractional weights, collapsing to 0 at the clamped right/bottom edge
    let ax = 1.0 - (x.ceil().min(texture.width() as f64 - 1.0) - x).abs();
    let ay = 1.0 - (y.ceil().min(texture.height() as f64 - 1.0) - y).abs();

    let t = interpolate_color(tl, tr, ax);
    let b = interpolate_color(bl, br, ax);
    interpolate_color(t, b, ay)
}

/// Fetch honoring the filtering mode: nearest for [`Filtering::Off`],
/// bilinear otherwise (mip level selection happens a layer up).
pub fn sample(texture: &Raster, u: f64, v: f64, filter: Filtering) -> Color {
    match filter {
        Filtering::Off => sample_nearest(texture, u, v),
        Filtering::Bilinear | Filtering::Trilinear | Filtering::Anisotropic => {
            sample_bilinear(texture, u, v)
        }
    }
}
