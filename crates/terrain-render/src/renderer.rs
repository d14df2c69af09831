//! Frame assembly: transform, project, scan-convert, shade.

use terrain_common::{Color, Raster};
use terrain_math::{Matrix, Model, Point3, Polygon, Transform3};
use terrain_texture::sampling::interpolate_color;
use terrain_texture::{Filtering, Mipmapper};
use tracing::{debug, warn};

use crate::error::RenderResult;
use crate::heightfield::HeightField;
use crate::scanline;
use crate::texture_gen::TextureGenerator;

const GRID_COLOR: Color = Color::WHITE;
const MODEL_COLOR: Color = Color::from_rgb_u32(0xff5599);

/// Half-length of the background coordinate axes.
const AXIS_LENGTH: f64 = 10_000.0;

/// Software renderer for textured terrain meshes.
///
/// Every frame starts from a fresh z-buffer. The fixed coordinate axes
/// are drawn first, then each registered model is transformed, projected
/// (parallel oblique or perspective-style warp), scan-converted, and shaded
/// from the mipmapped texture, with contour lines overlaid per triangle.
///
/// All angles are in radians.
#[derive(Debug)]
pub struct Renderer {
    /// Models with their transforms, drawn in insertion order.
    pub models: Vec<(Model, Transform3)>,

    /// Projection-space units per pixel.
    pub scale: f64,
    /// Oblique parallel projection instead of the warp projection.
    pub parallel_mode: bool,
    /// Direction of the parallel projection's depth axis.
    pub angle_a: f64,
    /// Depth foreshortening of the parallel projection.
    pub factor_l: f64,
    /// Warp divisor; larger values flatten the warp toward orthographic.
    pub factor_d: f64,

    pub warp_x: bool,
    pub warp_y: bool,
    pub warp_z: bool,

    pub filtering: Filtering,
    pub texture_resolution: usize,
    pub cache: Option<HeightField>,

    pub show_outline: bool,
    pub use_mipmap: bool,
    pub mipmap_bias_u: f64,
    pub mipmap_bias_v: f64,

    pub draw_contours: bool,
    pub contours: usize,
    pub contour_offset: f64,
    pub contour_color: Color,

    /// Explicit texture; when unset one is generated from the cache.
    pub image: Option<Raster>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            scale: 1.0,
            parallel_mode: false,
            angle_a: 0.0,
            factor_l: 0.5,
            factor_d: 10.0,
            warp_x: true,
            warp_y: true,
            warp_z: true,
            filtering: Filtering::Anisotropic,
            texture_resolution: 512,
            cache: None,
            show_outline: false,
            use_mipmap: true,
            mipmap_bias_u: 0.0,
            mipmap_bias_v: 0.0,
            draw_contours: true,
            contours: 20,
            contour_offset: 0.0,
            contour_color: Color::BLACK,
            image: None,
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_model(&mut self, model: Model, transform: Transform3) {
        self.models.push((model, transform));
    }

    /// Render a frame of the given pixel dimensions.
    pub fn render(&self, width: usize, height: usize) -> Raster {
        debug!(width, height, models = self.models.len(), "rendering frame");

        let mut raster = Raster::filled(width, height, Color::BLACK);
        let mut zbuffer = vec![f64::INFINITY; width * height];
        let mipmapper = Mipmapper::new(self.select_texture());

        let axis = Model::axis(AXIS_LENGTH);
        self.draw_model(
            &mut raster,
            &mut zbuffer,
            &axis,
            &Transform3::default(),
            GRID_COLOR,
            false,
            &mipmapper,
        );
        for (model, transform) in &self.models {
            self.draw_model(
                &mut raster,
                &mut zbuffer,
                model,
                transform,
                MODEL_COLOR,
                true,
                &mipmapper,
            );
        }
        raster
    }

    /// The texture every model is shaded from this frame: the explicit
    /// image if set, a generated contour texture when a valid cache
    /// exists, and a placeholder gradient otherwise.
    fn select_texture(&self) -> Raster {
        match &self.cache {
            Some(cache) if cache.is_valid() => match &self.image {
                Some(image) => image.clone(),
                None => {
                    TextureGenerator::new(cache, self.texture_resolution, self.texture_resolution)
                        .generate_texture()
                }
            },
            _ => fallback_texture(),
        }
    }

    /// Projection-space x to screen column.
    fn norm_x(&self, x: f64, width: usize) -> i64 {
        (x / self.scale + 0.5 * width as f64).round() as i64
    }

    /// Projection-space y to screen row; y points up, rows point down.
    fn norm_y(&self, y: f64, height: usize) -> i64 {
        (0.5 * height as f64 - y / self.scale).round() as i64
    }

    /// Flatten a transformed point onto the view plane. The parallel
    /// projection shears by depth; the warp projection divides by a
    /// distance-dependent factor. `z` is kept for depth testing.
    fn project(&self, p: Point3, warp: bool) -> Point3 {
        if self.parallel_mode {
            let l = self.factor_l;
            Point3::with_uv(
                p.x + p.z * l * self.angle_a.cos(),
                p.y + p.z * l * self.angle_a.sin(),
                p.z,
                p.u,
                p.v,
            )
        } else if warp {
            let d = self.factor_d;
            let flag = |on: bool| if on { 1.0 } else { 0.0 };
            let divisor = 1.0
                + p.x.abs() * flag(self.warp_x) / d
                + p.y.abs() * flag(self.warp_y) / d
                + p.z * flag(self.warp_z) / d;
            Point3::with_uv(p.x / divisor, p.y / divisor, p.z, p.u, p.v)
        } else {
            p
        }
    }

    fn draw_model(
        &self,
        raster: &mut Raster,
        zbuffer: &mut [f64],
        model: &Model,
        transform: &Transform3,
        color: Color,
        warp: bool,
        mipmapper: &Mipmapper,
    ) {
        let matrix = match transform.to_matrix() {
            Ok(m) => m,
            Err(error) => {
                warn!(%error, "skipping model with unusable transform");
                return;
            }
        };

        // faceless models render as wireframes
        if model.triangle_count() == 0 {
            self.draw_wireframe(raster, model, &matrix, color, warp);
        }

        for polygon in model.polygons() {
            if let Err(error) = self.render_polygon(raster, zbuffer, &polygon, &matrix, warp, color, mipmapper)
            {
                warn!(%error, "skipping polygon");
            }
        }
    }

    fn draw_wireframe(
        &self,
        raster: &mut Raster,
        model: &Model,
        matrix: &Matrix,
        color: Color,
        warp: bool,
    ) {
        let (width, height) = (raster.width(), raster.height());
        for &(ai, bi) in model.edges() {
            let (Some(&a), Some(&b)) = (model.vertices().get(ai), model.vertices().get(bi)) else {
                continue;
            };
            let (Ok(a), Ok(b)) = (transform_point(a, matrix), transform_point(b, matrix)) else {
                continue;
            };
            let a = self.project(a, warp);
            let b = self.project(b, warp);
            raster.draw_line(
                self.norm_x(a.x, width),
                self.norm_y(a.y, height),
                self.norm_x(b.x, width),
                self.norm_y(b.y, height),
                color,
            );
        }
    }

    fn render_polygon(
        &self,
        raster: &mut Raster,
        zbuffer: &mut [f64],
        polygon: &Polygon,
        matrix: &Matrix,
        warp: bool,
        color: Color,
        mipmapper: &Mipmapper,
    ) -> RenderResult<()> {
        let a = self.project(transform_point(polygon.a, matrix)?, warp);
        let b = self.project(transform_point(polygon.b, matrix)?, warp);
        let c = self.project(transform_point(polygon.c, matrix)?, warp);
        let projected = Polygon::new(a, b, c);

        self.draw_polygon(raster, zbuffer, &projected, polygon, mipmapper);

        if self.show_outline {
            let (width, height) = (raster.width(), raster.height());
            for (p, q) in [(a, b), (b, c), (c, a)] {
                raster.draw_line(
                    self.norm_x(p.x, width),
                    self.norm_y(p.y, height),
                    self.norm_x(q.x, width),
                    self.norm_y(q.y, height),
                    color,
                );
            }
        }
        Ok(())
    }

    /// Scan-convert one projected triangle: contour mask first, then the
    /// depth-tested texture pass.
    fn draw_polygon(
        &self,
        raster: &mut Raster,
        zbuffer: &mut [f64],
        p: &Polygon,
        orig: &Polygon,
        mipmapper: &Mipmapper,
    ) {
        let (width, height) = (raster.width(), raster.height());

        // flattened copy: barycentric lookups against the screen plane
        let mut proj = *p;
        proj.a.z = 0.0;
        proj.b.z = 0.0;
        proj.c.z = 0.0;

        let min_x = p.a.x.min(p.b.x).min(p.c.x).round() as i64;
        let min_y = p.a.y.min(p.b.y).min(p.c.y).round() as i64;
        let max_x = p.a.x.max(p.b.x).max(p.c.x).round() as i64;
        let max_y = p.a.y.max(p.b.y).max(p.c.y).round() as i64;
        let grid_w = (max_x - min_x + 1) as usize;
        let grid_h = (max_y - min_y + 1) as usize;

        // per-band edge detection over the pre-transform normalized
        // heights, unioned across all bands
        let mut contour_mask: Option<Vec<bool>> = None;
        if self.draw_contours {
            if let Some(cache) = &self.cache {
                let mask = contour_mask.insert(vec![false; grid_w * grid_h]);
                for k in 0..self.contours {
                    let cutoff =
                        cache.contour_cutoff_value_normalized(k, self.contours, self.contour_offset);

                    let mut band: Vec<Option<bool>> = vec![None; grid_w * grid_h];
                    scanline::rasterize_triangle(p, &mut |x, y| {
                        let bary = p.barycentric(Point3::new(x as f64, y as f64, 0.0));
                        let val = orig.a.y * bary.x + orig.b.y * bary.y + orig.c.y * bary.z;
                        let i = x - min_x;
                        let j = y - min_y;
                        if (0..grid_w as i64).contains(&i) && (0..grid_h as i64).contains(&j) {
                            band[i as usize * grid_h + j as usize] = Some(val >= cutoff);
                        }
                    });

                    let at = |i: i64, j: i64| -> Option<bool> {
                        let i = i.clamp(0, grid_w as i64 - 1) as usize;
                        let j = j.clamp(0, grid_h as i64 - 1) as usize;
                        band[i * grid_h + j]
                    };
                    for i in 0..grid_w as i64 {
                        for j in 0..grid_h as i64 {
                            let above = at(i, j) == Some(true);
                            let any_below = [at(i, j + 1), at(i - 1, j), at(i + 1, j), at(i, j - 1)]
                                .iter()
                                .any(|n| *n == Some(false));
                            if above && any_below {
                                mask[i as usize * grid_h + j as usize] = true;
                            }
                        }
                    }
                }
            }
        }

        let tex_w = mipmapper.texture().width() as f64;
        let tex_h = mipmapper.texture().height() as f64;

        scanline::rasterize_triangle(p, &mut |x, y| {
            let point = Point3::new(x as f64, y as f64, 0.0);

            let bary = proj.barycentric(point);
            let z = bary.x * p.a.z + bary.y * p.b.z + bary.z * p.c.z;

            let sx = self.norm_x(x as f64, width);
            let sy = self.norm_y(y as f64, height);
            if sx >= 0
                && sx < width as i64
                && sy >= 0
                && sy < height as i64
                && z < zbuffer[sy as usize * width + sx as usize]
            {
                zbuffer[sy as usize * width + sx as usize] = z;
            } else {
                return;
            }

            let (u, v) = proj.uv(point);
            let (ul, vl) = proj.uv(Point3::new((x - 1) as f64, y as f64, 0.0));
            let (ur, vr) = proj.uv(Point3::new((x + 1) as f64, y as f64, 0.0));
            let (ut, vt) = proj.uv(Point3::new(x as f64, (y - 1) as f64, 0.0));
            let (ub, vb) = proj.uv(Point3::new(x as f64, (y + 1) as f64, 0.0));

            // 4-neighbor finite differences drive the detail level
            let dudx =
                ((u - ul).abs() + (u - ur).abs() + (u - ut).abs() + (u - ub).abs()) / 2.0 * tex_w;
            let dvdy =
                ((v - vl).abs() + (v - vr).abs() + (v - vt).abs() + (v - vb).abs()) / 2.0 * tex_h;
            let mm_u = (dudx.log2() + self.mipmap_bias_u).max(0.0);
            let mm_v = (dvdy.log2() + self.mipmap_bias_v).max(0.0);

            let on_contour = contour_mask.as_ref().is_some_and(|mask| {
                let i = x - min_x;
                let j = y - min_y;
                (0..grid_w as i64).contains(&i)
                    && (0..grid_h as i64).contains(&j)
                    && mask[i as usize * grid_h + j as usize]
            });

            let color = if on_contour {
                self.contour_color
            } else {
                mipmapper.color_at(
                    u,
                    1.0 - v,
                    if self.use_mipmap { mm_u } else { 0.0 },
                    if self.use_mipmap { mm_v } else { 0.0 },
                    self.filtering,
                )
            };
            raster.put(sx, sy, color);
        });
    }
}

fn transform_point(p: Point3, matrix: &Matrix) -> RenderResult<Point3> {
    let m = p.to_row_matrix().multiply(matrix)?;
    Ok(Point3::with_uv(m.get(0, 0), m.get(1, 0), m.get(2, 0), p.u, p.v))
}

/// Placeholder texture shown while no valid height field exists: a 20×20
/// four-corner gradient.
fn fallback_texture() -> Raster {
    let mut pixels = Vec::with_capacity(20 * 20);
    for i in 0..20 * 20 {
        let fx = (i % 20) as f64 / 20.0;
        let fy = (i - i % 20) as f64 / 400.0;
        pixels.push(interpolate_color(
            interpolate_color(Color::BLUE, Color::RED, fx),
            interpolate_color(Color::CYAN, Color::ORANGE, fx),
            fy,
        ));
    }
    Raster::from_pixels(20, 20, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_texture_corners() {
        let tex = fallback_texture();
        assert_eq!((tex.width(), tex.height()), (20, 20));
        assert_eq!(tex.get(0, 0), Color::BLUE);
        // the far corner blends toward orange, away from blue
        let c = tex.get(19, 19);
        assert!(c.r > c.b);
    }

    #[test]
    fn test_screen_mapping_center() {
        let r = Renderer::default();
        assert_eq!(r.norm_x(0.0, 100), 50);
        assert_eq!(r.norm_y(0.0, 100), 50);
        // y up means smaller rows
        assert!(r.norm_y(10.0, 100) < 50);
        assert_eq!(r.norm_x(10.0, 100), 60);
    }

    #[test]
    fn test_screen_mapping_honors_scale() {
        let r = Renderer {
            scale: 0.5,
            ..Renderer::default()
        };
        assert_eq!(r.norm_x(10.0, 100), 70);
    }

    #[test]
    fn test_parallel_projection_shears_by_depth() {
        let r = Renderer {
            parallel_mode: true,
            angle_a: 0.0,
            factor_l: 0.5,
            ..Renderer::default()
        };
        let p = r.project(Point3::new(1.0, 2.0, 4.0), true);
        assert!((p.x - 3.0).abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
        assert_eq!(p.z, 4.0);
    }

    #[test]
    fn test_warp_projection_shrinks_distant_points() {
        let r = Renderer::default();
        let near = r.project(Point3::new(1.0, 0.0, 0.0), true);
        let far = r.project(Point3::new(1.0, 0.0, 5.0), true);
        assert!(far.x < near.x);
    }

    #[test]
    fn test_warp_flags_disable_axes() {
        let r = Renderer {
            warp_x: false,
            warp_y: false,
            warp_z: false,
            ..Renderer::default()
        };
        let p = r.project(Point3::new(3.0, -2.0, 7.0), true);
        assert_eq!(p.x, 3.0);
        assert_eq!(p.y, -2.0);
    }

    #[test]
    fn test_unwarped_point_passes_through() {
        let r = Renderer::default();
        let p = r.project(Point3::new(3.0, -2.0, 7.0), false);
        assert_eq!(p.x, 3.0);
        assert_eq!(p.y, -2.0);
    }
}
