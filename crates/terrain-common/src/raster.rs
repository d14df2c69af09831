//! Owned row-major RGBA pixel buffer.

use image::RgbaImage;

use crate::color::Color;

/// A width × height grid of [`Color`] pixels, row-major.
///
/// This is the output surface of the renderer and the storage behind every
/// mipmap level. Reads outside the buffer clamp to the nearest edge pixel;
/// writes outside the buffer are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Raster {
    /// Create a raster filled with a single color.
    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    /// Create a transparent-black raster.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Color::transparent())
    }

    /// Wrap an already-assembled row-major pixel vector.
    ///
    /// Panics if the vector length does not match the dimensions.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Color>) -> Self {
        assert_eq!(pixels.len(), width * height, "pixel count mismatch");
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    /// Read with indices clamped into the valid range.
    pub fn get_clamped(&self, x: i64, y: i64) -> Color {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.pixels[y * self.width + x]
    }

    /// Write a pixel; coordinates outside the raster are ignored.
    pub fn put(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.pixels[y as usize * self.width + x as usize] = color;
    }

    /// Walk the line from `(x0, y0)` to `(x1, y1)` writing `color` at each
    /// step along the major axis. Out-of-bounds steps are dropped by `put`.
    pub fn draw_line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Color) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs());
        if steps == 0 {
            self.put(x0, y0, color);
            return;
        }
        let sx = dx as f64 / steps as f64;
        let sy = dy as f64 / steps as f64;
        for i in 0..=steps {
            let x = (x0 as f64 + sx * i as f64).round() as i64;
            let y = (y0 as f64 + sy * i as f64).round() as i64;
            self.put(x, y, color);
        }
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Flatten to raw RGBA bytes (4 bytes per pixel, row-major).
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            bytes.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
        bytes
    }

    /// Copy a decoded image into an owned raster.
    pub fn from_image(img: &RgbaImage) -> Self {
        let width = img.width() as usize;
        let height = img.height() as usize;
        let mut pixels = Vec::with_capacity(width * height);
        for p in img.pixels() {
            pixels.push(Color::new(p.0[0], p.0[1], p.0[2], p.0[3]));
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert into an `image` buffer for encoding.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_raw(self.width as u32, self.height as u32, self.to_rgba_bytes())
            .expect("raster dimensions match pixel count")
    }
}
