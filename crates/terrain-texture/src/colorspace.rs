//! Color-space converters used for perceptual color distance.
//!
//! All converters work on normalized RGB components in [0, 1]; gamma
//! handling is the caller's concern. Hue is in degrees.

/// Hue/saturation/value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// Hue/saturation/lightness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// CIE XYZ tristimulus values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// CIE L*a*b*.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

fn hue_chroma_to_rgb(h: f64, c: f64, m: f64) -> (f64, f64, f64) {
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    (r + m, g + m, b + m)
}

fn hue_of(r: f64, g: f64, b: f64, c_max: f64, delta: f64) -> f64 {
    if delta == 0.0 {
        0.0
    } else if c_max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if c_max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    }
}

impl Hsv {
    pub fn from_rgb(r: f64, g: f64, b: f64) -> Self {
        let c_max = r.max(g).max(b);
        let c_min = r.min(g).min(b);
        let delta = c_max - c_min;

        let s = if c_max == 0.0 { 0.0 } else { delta / c_max };

        Self {
            h: hue_of(r, g, b, c_max, delta),
            s,
            v: c_max,
        }
    }

    pub fn to_rgb(&self) -> (f64, f64, f64) {
        let h = self.h.rem_euclid(360.0);
        let c = self.v * self.s;
        hue_chroma_to_rgb(h, c, self.v - c)
    }
}

impl Hsl {
    pub fn from_rgb(r: f64, g: f64, b: f64) -> Self {
        let c_max = r.max(g).max(b);
        let c_min = r.min(g).min(b);
        let delta = c_max - c_min;

        let l = (c_max + c_min) / 2.0;
        let s = if delta == 0.0 {
            0.0
        } else {
            delta / (1.0 - (2.0 * l - 1.0).abs())
        };

        Self {
            h: hue_of(r, g, b, c_max, delta),
            s,
            l,
        }
    }

    pub fn to_rgb(&self) -> (f64, f64, f64) {
        let h = self.h.rem_euclid(360.0);
        let c = (1.0 - (2.0 * self.l - 1.0).abs()) * self.s;
        hue_chroma_to_rgb(h, c, self.l - c / 2.0)
    }
}

impl Xyz {
    pub fn from_rgb(r: f64, g: f64, b: f64) -> Self {
        Self {
            x: 0.4124564 * r + 0.3575761 * g + 0.1804375 * b,
            y: 0.2126729 * r + 0.7151522 * g + 0.0721750 * b,
            z: 0.0193339 * r + 0.1191920 * g + 0.9503041 * b,
        }
    }

    /// Inverse of [`Xyz::from_rgb`]; components may fall outside [0, 1]
    /// for out-of-gamut inputs.
    pub fn to_rgb(&self) -> (f64, f64, f64) {
        (
            3.2404542 * self.x - 1.5371385 * self.y - 0.4985314 * self.z,
            -0.9692660 * self.x + 1.8760108 * self.y + 0.0415560 * self.z,
            0.0556434 * self.x - 0.2040259 * self.y + 1.0572252 * self.z,
        )
    }
}

// D65 reference white
const XN: f64 = 95.0489;
const YN: f64 = 100.0;
const ZN: f64 = 108.8840;

const D: f64 = 6.0 / 29.0;

fn lab_f(t: f64) -> f64 {
    if t > D * D * D {
        t.cbrt()
    } else {
        t / (3.0 * D * D) + 4.0 / 29.0
    }
}

fn lab_f_inv(t: f64) -> f64 {
    if t > D {
        t * t * t
    } else {
        3.0 * D * D * (t - 4.0 / 29.0)
    }
}

impl Lab {
    pub fn from_xyz(xyz: Xyz) -> Self {
        let fy = lab_f(xyz.y / YN);
        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (lab_f(xyz.x / XN) - fy),
            b: 200.0 * (fy - lab_f(xyz.z / ZN)),
        }
    }

    pub fn to_xyz(&self) -> Xyz {
        let fy = (self.l + 16.0) / 116.0;
        Xyz {
            x: XN * lab_f_inv(fy + self.a / 500.0),
            y: YN * lab_f_inv(fy),
            z: ZN * lab_f_inv(fy - self.b / 200.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_hsv_primaries() {
        let red = Hsv::from_rgb(1.0, 0.0, 0.0);
        assert!(close(red.h, 0.0) && close(red.s, 1.0) && close(red.v, 1.0));
        let green = Hsv::from_rgb(0.0, 1.0, 0.0);
        assert!(close(green.h, 120.0));
        let blue = Hsv::from_rgb(0.0, 0.0, 1.0);
        assert!(close(blue.h, 240.0));
    }

    #[test]
    fn test_hsv_round_trip() {
        for (r, g, b) in [(0.2, 0.5, 0.9), (0.7, 0.1, 0.1), (0.3, 0.3, 0.3)] {
            let (r2, g2, b2) = Hsv::from_rgb(r, g, b).to_rgb();
            assert!(close(r, r2) && close(g, g2) && close(b, b2));
        }
    }

    #[test]
    fn test_hsl_round_trip() {
        for (r, g, b) in [(0.2, 0.5, 0.9), (0.95, 0.4, 0.0), (0.5, 0.5, 0.5)] {
            let (r2, g2, b2) = Hsl::from_rgb(r, g, b).to_rgb();
            assert!(close(r, r2) && close(g, g2) && close(b, b2));
        }
    }

    #[test]
    fn test_hsl_lightness_of_gray() {
        let gray = Hsl::from_rgb(0.25, 0.25, 0.25);
        assert!(close(gray.l, 0.25) && close(gray.s, 0.0));
    }

    #[test]
    fn test_xyz_round_trip() {
        let (r, g, b) = (0.4, 0.6, 0.2);
        let (r2, g2, b2) = Xyz::from_rgb(r, g, b).to_rgb();
        assert!((r - r2).abs() < 1e-6);
        assert!((g - g2).abs() < 1e-6);
        assert!((b - b2).abs() < 1e-6);
    }

    #[test]
    fn test_lab_white_point() {
        let lab = Lab::from_xyz(Xyz {
            x: XN,
            y: YN,
            z: ZN,
        });
        assert!((lab.l - 100.0).abs() < 1e-9);
        assert!(lab.a.abs() < 1e-9);
        assert!(lab.b.abs() < 1e-9);
    }

    #[test]
    fn test_lab_round_trip() {
        let xyz = Xyz::from_rgb(0.3, 0.7, 0.5);
        // scale into the same range as the reference white
        let xyz = Xyz {
            x: xyz.x * 100.0,
            y: xyz.y * 100.0,
            z: xyz.z * 100.0,
        };
        let back = Lab::from_xyz(xyz).to_xyz();
        assert!((back.x - xyz.x).abs() < 1e-6);
        assert!((back.y - xyz.y).abs() < 1e-6);
        assert!((back.z - xyz.z).abs() < 1e-6);
    }
}
