//! Declarative render configuration.
//!
//! [`RenderParams`] is the serde-backed settings bundle: projection and
//! camera factors, model transform, contour styling, texture filtering,
//! and the color→height reference table consumed by the color mapper.
//! Every field has a default, so partial JSON documents work.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use terrain_common::{hex_to_color, Color};
use terrain_math::{Point3, Transform3};
use terrain_texture::{ColorMapper, ColorMode, Filtering};

use crate::error::{RenderError, RenderResult};
use crate::renderer::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    Parallel,
    #[default]
    Warp,
}

/// Full render configuration. Angles are in degrees here and converted
/// when applied.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderParams {
    pub projection: ProjectionMode,
    pub angle_a_deg: f64,
    pub factor_l: f64,
    pub factor_d: f64,
    pub warp_x: bool,
    pub warp_y: bool,
    pub warp_z: bool,

    pub offset: [f64; 3],
    pub rotation_deg: [f64; 3],
    pub scale: [f64; 3],
    /// Projection-space units per screen pixel.
    pub view_scale: f64,

    /// Height field grid resolution.
    pub resolution: usize,
    /// Side length of the generated texture.
    pub texture_resolution: usize,

    pub filtering: Filtering,
    pub use_mipmaps: bool,
    pub mipmap_bias_u: f64,
    pub mipmap_bias_v: f64,

    pub show_contours: bool,
    pub contours: usize,
    pub contour_offset: f64,
    pub show_base_texture: bool,
    pub bright_contours: bool,
    pub show_outline: bool,

    pub color_mode: ColorMode,
    pub distance_power: f64,
    pub gamma: f64,
    pub weights: [f64; 3],

    /// Reference colors as `"rrggbb"` hex keys mapped to heights.
    pub color_table: BTreeMap<String, f64>,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            projection: ProjectionMode::Warp,
            angle_a_deg: 30.0,
            factor_l: 0.5,
            factor_d: 10.0,
            warp_x: true,
            warp_y: true,
            warp_z: true,
            offset: [0.0; 3],
            rotation_deg: [0.0; 3],
            scale: [1.0; 3],
            view_scale: 1.0,
            resolution: 100,
            texture_resolution: 512,
            filtering: Filtering::Anisotropic,
            use_mipmaps: true,
            mipmap_bias_u: 0.0,
            mipmap_bias_v: 0.0,
            show_contours: true,
            contours: 20,
            contour_offset: 0.0,
            show_base_texture: true,
            bright_contours: false,
            show_outline: false,
            color_mode: ColorMode::Rgb,
            distance_power: 2.0,
            gamma: 2.2,
            weights: [1.0; 3],
            color_table: BTreeMap::new(),
        }
    }
}

impl RenderParams {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// The model transform, with rotations converted to radians.
    pub fn transform(&self) -> Transform3 {
        Transform3::new(
            Point3::new(self.offset[0], self.offset[1], self.offset[2]),
            Point3::new(
                self.rotation_deg[0].to_radians(),
                self.rotation_deg[1].to_radians(),
                self.rotation_deg[2].to_radians(),
            ),
            Point3::new(self.scale[0], self.scale[1], self.scale[2]),
        )
    }

    /// Contour line color: white for bright contours, black over the base
    /// texture, cyan when the base texture is hidden.
    pub fn contour_color(&self) -> Color {
        if self.bright_contours {
            Color::WHITE
        } else if self.show_base_texture {
            Color::BLACK
        } else {
            Color::CYAN
        }
    }

    /// Color mapper configured from the perceptual-distance settings.
    pub fn color_mapper(&self) -> ColorMapper {
        ColorMapper {
            mode: self.color_mode,
            distance_power: self.distance_power,
            gamma: self.gamma,
            use_mipmaps: self.use_mipmaps,
            weights: self.weights,
        }
    }

    /// Parse the color table into (color, height) reference pairs.
    pub fn color_references(&self) -> RenderResult<Vec<(Color, f64)>> {
        self.color_table
            .iter()
            .map(|(hex, &height)| {
                let color = hex_to_color(hex).ok_or_else(|| {
                    RenderError::invalid_parameter(format!("bad color table entry: {hex:?}"))
                })?;
                Ok((color, height))
            })
            .collect()
    }

    /// Push these settings into a renderer.
    pub fn apply(&self, renderer: &mut Renderer) {
        renderer.scale = self.view_scale;
        renderer.parallel_mode = self.projection == ProjectionMode::Parallel;
        renderer.angle_a = self.angle_a_deg.to_radians();
        renderer.factor_l = self.factor_l;
        renderer.factor_d = self.factor_d;
        renderer.warp_x = self.warp_x;
        renderer.warp_y = self.warp_y;
        renderer.warp_z = self.warp_z;
        renderer.filtering = self.filtering;
        renderer.texture_resolution = self.texture_resolution;
        renderer.show_outline = self.show_outline;
        renderer.use_mipmap = self.use_mipmaps;
        renderer.mipmap_bias_u = self.mipmap_bias_u;
        renderer.mipmap_bias_v = self.mipmap_bias_v;
        renderer.draw_contours = self.show_contours;
        renderer.contours = self.contours;
        renderer.contour_offset = self.contour_offset;
        renderer.contour_color = self.contour_color();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let mut params = RenderParams::default();
        params.projection = ProjectionMode::Parallel;
        params.color_table.insert("ff6600".into(), 1.5);
        let json = params.to_json().unwrap();
        assert_eq!(RenderParams::from_json(&json).unwrap(), params);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params = RenderParams::from_json(r#"{"contours": 5, "view_scale": 0.25}"#).unwrap();
        assert_eq!(params.contours, 5);
        assert_eq!(params.view_scale, 0.25);
        assert_eq!(params.resolution, 100);
        assert_eq!(params.projection, ProjectionMode::Warp);
    }

    #[test]
    fn test_contour_color_selection() {
        let mut params = RenderParams::default();
        assert_eq!(params.contour_color(), Color::BLACK);
        params.show_base_texture = false;
        assert_eq!(params.contour_color(), Color::CYAN);
        params.bright_contours = true;
        assert_eq!(params.contour_color(), Color::WHITE);
    }

    #[test]
    fn test_color_references_parse_and_reject() {
        let mut params = RenderParams::default();
        params.color_table.insert("669955".into(), -2.0);
        params.color_table.insert("#ff6600".into(), 3.0);
        let refs = params.color_references().unwrap();
        assert_eq!(refs.len(), 2);
        assert!(refs.contains(&(Color::rgb(0x66, 0x99, 0x55), -2.0)));

        params.color_table.insert("not-a-color".into(), 0.0);
        assert!(params.color_references().is_err());
    }

    #[test]
    fn test_apply_converts_degrees() {
        let params = RenderParams {
            projection: ProjectionMode::Parallel,
            angle_a_deg: 45.0,
            rotation_deg: [90.0, 0.0, 0.0],
            ..RenderParams::default()
        };
        let mut renderer = Renderer::default();
        params.apply(&mut renderer);
        assert!(renderer.parallel_mode);
        assert!((renderer.angle_a - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
        assert!(
            (params.transform().rotation.x - std::f64::consts::FRAC_PI_2).abs() < 1e-12
        );
    }
}
