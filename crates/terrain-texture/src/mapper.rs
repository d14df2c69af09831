//! Color → scalar height mapping by inverse-distance weighting.

use serde::{Deserialize, Serialize};
use terrain_common::Color;
use tracing::trace;

use crate::colorspace::{Hsl, Hsv, Lab, Xyz};
use crate::mipmap::Mipmapper;
use crate::sampling::Filtering;

/// Color space used for perceptual distance.
///
/// `Cie94` and `CieDe2000` are accepted for configuration compatibility but
/// fall through to the plain gamma-corrected RGB distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Rgb,
    Hsv,
    Hsl,
    Cie76,
    Cie94,
    CieDe2000,
}

/// Maps texture colors to scalar heights through a sparse set of reference
/// (color → value) pairs.
///
/// The produced field is a weighted average of the reference values, with
/// weights falling off as `distance^-power` in the configured color space,
/// so it passes exactly through every reference color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMapper {
    pub mode: ColorMode,
    /// Exponent of the inverse-distance weight.
    pub distance_power: f64,
    pub gamma: f64,
    pub use_mipmaps: bool,
    /// Per-axis weights of the distance metric.
    pub weights: [f64; 3],
}

impl Default for ColorMapper {
    fn default() -> Self {
        Self {
            mode: ColorMode::Rgb,
            distance_power: 2.0,
            gamma: 2.2,
            use_mipmaps: true,
            weights: [1.0, 1.0, 1.0],
        }
    }
}

/// Hue difference along the shorter arc, normalized so 180° maps to 1.
fn hue_distance(h0: f64, h1: f64) -> f64 {
    let d = (h1 - h0).abs();
    d.min(360.0 - d) / 180.0
}

impl ColorMapper {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Weighted distance between two colors in the configured space.
    ///
    /// Symmetric in its arguments for every mode.
    pub fn color_distance(&self, a: Color, b: Color) -> f64 {
        let lin = |c: u8| (c as f64 / 255.0).powf(self.gamma);
        let (r1, g1, b1) = (lin(a.r), lin(a.g), lin(a.b));
        let (r2, g2, b2) = (lin(b.r), lin(b.g), lin(b.b));
        let [m1, m2, m3] = self.weights;

        match self.mode {
            ColorMode::Hsv => {
                let c0 = Hsv::from_rgb(r1, g1, b1);
                let c1 = Hsv::from_rgb(r2, g2, b2);
                let dh = hue_distance(c0.h, c1.h);
                let ds = (c1.s - c0.s).abs();
                let dv = (c1.v - c0.v).abs();
                (m1 * dh * dh + m2 * ds * ds + m3 * dv * dv).sqrt()
            }
            ColorMode::Hsl => {
                let c0 = Hsl::from_rgb(r1, g1, b1);
                let c1 = Hsl::from_rgb(r2, g2, b2);
                let dh = hue_distance(c0.h, c1.h);
                let ds = (c1.s - c0.s).abs();
                let dl = (c1.l - c0.l).abs();
                (m1 * dh * dh + m2 * ds * ds + m3 * dl * dl).sqrt()
            }
            ColorMode::Cie76 => {
                let c0 = Lab::from_xyz(Xyz::from_rgb(r1, g1, b1));
                let c1 = Lab::from_xyz(Xyz::from_rgb(r2, g2, b2));
                let dl = c0.l - c1.l;
                let da = c0.a - c1.a;
                let db = c0.b - c1.b;
                (m1 * dl * dl + m2 * da * da + m3 * db * db).sqrt()
            }
            // Cie94 and CieDe2000 are declared but not implemented; they use
            // the plain RGB metric.
            ColorMode::Rgb | ColorMode::Cie94 | ColorMode::CieDe2000 => {
                let dr = r1 - r2;
                let dg = g1 - g2;
                let db = b1 - b2;
                (m1 * dr * dr + m2 * dg * dg + m3 * db * db).sqrt()
            }
        }
    }

    /// Build the UV → scalar field over `image`.
    ///
    /// Each query samples the texture (anisotropically when mipmapping is
    /// on, with detail levels derived from `texture_size / resolution`),
    /// then either returns the sample's luminance (no references) or the
    /// inverse-distance-weighted average of the reference values. A sample
    /// matching a reference color exactly returns that reference's value.
    pub fn map_colors<'a>(
        &self,
        image: &'a Mipmapper,
        resolution: u32,
        color_data: &'a [(Color, f64)],
    ) -> impl Fn(f64, f64) -> f64 + 'a {
        let mapper = *self;
        move |in_u: f64, in_v: f64| {
            let u = in_u.clamp(0.0, 1.0);
            let v = in_v.clamp(0.0, 1.0);

            let point_color = if mapper.use_mipmaps && resolution > 0 {
                let mm_u =
                    (image.texture().width() as f64 / resolution as f64).max(1.0).log2();
                let mm_v =
                    (image.texture().height() as f64 / resolution as f64).max(1.0).log2();
                image.color_at(u, v, mm_u, mm_v, Filtering::Anisotropic)
            } else {
                image.color_at(u, v, 0.0, 0.0, Filtering::Bilinear)
            };

            if color_data.is_empty() {
                return point_color.luminance();
            }

            let mut total_value = 0.0;
            let mut total_weight = 0.0;
            for &(reference, value) in color_data {
                let distance = mapper.color_distance(reference, point_color);
                if distance <= 0.0 {
                    // exact control point; also avoids the 1/0 weight
                    return value;
                }
                let weight = distance.powf(-mapper.distance_power);
                total_value += weight * value;
                total_weight += weight;
            }
            trace!(u, v, total_weight, "inverse-distance weighted sample");
            total_value / total_weight
        }
    }
}
