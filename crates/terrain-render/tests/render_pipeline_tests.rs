//! End-to-end tests for the render pipeline.
//!
//! Meshes come out of the height field normalized to [-1, 1], so tests
//! scale them up through the model transform to cover a useful number of
//! pixels; the view scale stays 1 so projection units equal pixels.

use terrain_common::{Color, Raster};
use terrain_math::{Model, Point3, Transform3};
use terrain_render::texture_gen::CONTOUR_COLOR;
use terrain_render::{HeightField, Renderer, TextureGenerator};
use terrain_texture::{ColorMapper, Filtering, Mipmapper};

fn sine_terrain() -> HeightField {
    HeightField::new(
        |x, y| (3.0 * x).sin() * (3.0 * y).cos(),
        24,
        0.0,
        1.0,
        0.0,
        1.0,
    )
    .unwrap()
}

fn scaled(factor: f64) -> Transform3 {
    Transform3 {
        scale: Point3::new(factor, factor, factor),
        ..Transform3::default()
    }
}

/// Oblique parallel view that keeps x unchanged on screen.
fn oblique_renderer() -> Renderer {
    Renderer {
        parallel_mode: true,
        angle_a: std::f64::consts::FRAC_PI_2,
        factor_l: 0.5,
        ..Renderer::default()
    }
}

// ============================================================================
// Full pipeline smoke tests
// ============================================================================

#[test]
fn test_render_paints_terrain() {
    let cache = sine_terrain();
    let mut renderer = oblique_renderer();
    renderer.add_model(cache.model().clone(), scaled(40.0));
    renderer.cache = Some(cache);

    let frame = renderer.render(100, 100);
    let painted = frame
        .pixels()
        .iter()
        .filter(|p| **p != Color::BLACK && **p != Color::WHITE)
        .count();
    // the mesh spans most of the view
    assert!(painted > 1000, "painted only {painted} pixels");
}

#[test]
fn test_render_warp_projection() {
    let cache = sine_terrain();
    let mut renderer = Renderer::default();
    renderer.add_model(cache.model().clone(), scaled(40.0));
    renderer.cache = Some(cache);

    let frame = renderer.render(80, 80);
    let painted = frame
        .pixels()
        .iter()
        .filter(|p| **p != Color::BLACK && **p != Color::WHITE)
        .count();
    assert!(painted > 100, "painted only {painted} pixels");
}

#[test]
fn test_axis_drawn_without_models() {
    let renderer = Renderer {
        parallel_mode: true,
        factor_l: 0.0,
        ..Renderer::default()
    };
    let frame = renderer.render(60, 60);
    // x and y axes cross the screen center in white
    assert_eq!(frame.get(30, 30), Color::WHITE);
    assert_eq!(frame.get(5, 30), Color::WHITE);
    assert_eq!(frame.get(30, 5), Color::WHITE);
}

#[test]
fn test_fallback_texture_used_without_cache() {
    // a single screen-filling triangle, no height field attached
    let model = Model::new(
        vec![
            Point3::with_uv(-20.0, -20.0, 1.0, 0.0, 0.0),
            Point3::with_uv(20.0, -20.0, 1.0, 1.0, 0.0),
            Point3::with_uv(0.0, 20.0, 1.0, 0.5, 1.0),
        ],
        Vec::new(),
        vec![[0, 1, 2]],
    );
    let mut renderer = Renderer {
        parallel_mode: true,
        factor_l: 0.0,
        draw_contours: false,
        ..Renderer::default()
    };
    renderer.add_model(model, Transform3::default());

    let frame = renderer.render(60, 60);
    let colored = frame
        .pixels()
        .iter()
        .filter(|p| **p != Color::BLACK && **p != Color::WHITE)
        .count();
    assert!(colored > 100, "placeholder texture not visible: {colored}");
}

// ============================================================================
// Depth buffering
// ============================================================================

fn depth_test_renderer(texture: Raster) -> Renderer {
    Renderer {
        parallel_mode: true,
        factor_l: 0.0,
        draw_contours: false,
        use_mipmap: false,
        filtering: Filtering::Off,
        image: Some(texture),
        cache: Some(HeightField::new(|_, _| 0.0, 2, 0.0, 1.0, 0.0, 1.0).unwrap()),
        ..Renderer::default()
    }
}

fn overlapping_triangles(first: (f64, f64), second: (f64, f64)) -> Model {
    let tri = |(z, u): (f64, f64)| {
        [
            Point3::with_uv(-15.0, -15.0, z, u, 0.0),
            Point3::with_uv(15.0, -15.0, z, u, 0.0),
            Point3::with_uv(0.0, 15.0, z, u, 0.0),
        ]
    };
    Model::new(
        tri(first).into_iter().chain(tri(second)).collect(),
        Vec::new(),
        vec![[0, 1, 2], [3, 4, 5]],
    )
}

#[test]
fn test_nearer_triangle_wins_depth_test() {
    // the near triangle samples the red texel, the far one the blue texel
    let mut texture = Raster::filled(2, 1, Color::RED);
    texture.put(1, 0, Color::BLUE);

    let mut renderer = depth_test_renderer(texture);
    renderer.add_model(overlapping_triangles((1.0, 0.0), (5.0, 0.75)), Transform3::default());
    assert_eq!(renderer.render(60, 60).get(30, 30), Color::RED);
}

#[test]
fn test_draw_order_does_not_matter() {
    let mut texture = Raster::filled(2, 1, Color::RED);
    texture.put(1, 0, Color::BLUE);

    for (first, second) in [((1.0, 0.0), (5.0, 0.75)), ((5.0, 0.75), (1.0, 0.0))] {
        let mut renderer = depth_test_renderer(texture.clone());
        renderer.add_model(overlapping_triangles(first, second), Transform3::default());
        // the z = 1 triangle shows regardless of insertion order
        assert_eq!(renderer.render(60, 60).get(30, 30), Color::RED);
    }
}

// ============================================================================
// Contour overlay
// ============================================================================

#[test]
fn test_flat_field_renders_no_contours() {
    let cache = HeightField::new(|_, _| 7.0, 12, 0.0, 1.0, 0.0, 1.0).unwrap();
    let mut renderer = oblique_renderer();
    renderer.contour_color = Color::CYAN;
    renderer.add_model(cache.model().clone(), scaled(40.0));
    renderer.cache = Some(cache);

    let frame = renderer.render(100, 100);
    let contour_pixels = frame.pixels().iter().filter(|p| **p == Color::CYAN).count();
    assert_eq!(contour_pixels, 0);
}

#[test]
fn test_single_contour_band_sits_at_mid_height() {
    let cache = HeightField::new(|x, _| x, 16, 0.0, 1.0, 0.0, 1.0).unwrap();
    let mut renderer = oblique_renderer();
    renderer.contours = 1;
    renderer.contour_color = Color::CYAN;
    renderer.add_model(cache.model().clone(), scaled(40.0));
    renderer.cache = Some(cache);

    let frame = renderer.render(100, 100);
    let contour_columns: Vec<usize> = (0..100)
        .filter(|&x| (0..100).any(|y| frame.get(x, y) == Color::CYAN))
        .collect();
    // the single cutoff crosses mid height; for a linear x ramp that is the
    // center of the screen, give or take the cells straddling it
    assert!(!contour_columns.is_empty());
    for x in contour_columns {
        assert!(
            (x as i64 - 50).abs() <= 10,
            "contour pixel far from center column: {x}"
        );
    }
}

#[test]
fn test_contours_can_be_disabled() {
    let cache = HeightField::new(|x, _| x, 16, 0.0, 1.0, 0.0, 1.0).unwrap();
    let mut renderer = oblique_renderer();
    renderer.draw_contours = false;
    renderer.contour_color = Color::CYAN;
    renderer.add_model(cache.model().clone(), scaled(40.0));
    renderer.cache = Some(cache);

    let frame = renderer.render(100, 100);
    assert!(frame.pixels().iter().all(|p| *p != Color::CYAN));
}

// ============================================================================
// Image-driven height fields (color mapper feeding the cache)
// ============================================================================

#[test]
fn test_color_mapped_image_builds_flat_field() {
    let image = Mipmapper::new(Raster::filled(16, 16, Color::RED));
    let refs = vec![(Color::RED, 2.0), (Color::BLUE, -2.0)];
    let mapper = ColorMapper::default();
    let f = mapper.map_colors(&image, 16, &refs);

    let cache = HeightField::new(|x, y| f(x, 1.0 - y), 8, 0.0, 1.0, 0.0, 1.0).unwrap();
    assert_eq!(cache.min(), 2.0);
    assert_eq!(cache.max(), 2.0);
    assert!(cache.model().vertices().iter().all(|v| v.y == 0.0));
}

#[test]
fn test_texture_generator_feeds_renderer() {
    let cache = sine_terrain();
    let tex = TextureGenerator::new(&cache, 64, 64).generate_texture();
    assert_eq!((tex.width(), tex.height()), (64, 64));
    assert!(tex.pixels().iter().any(|p| *p == CONTOUR_COLOR));
}
