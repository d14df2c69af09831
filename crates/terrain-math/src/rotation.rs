//! Axis-angle rotation applied through quaternion conjugation.

use crate::matrix::Matrix;
use crate::point::Point3;

/// Rotation by `angle` radians around `axis`.
///
/// This is the general-purpose rotation abstraction: it can rotate a point
/// directly ([`Rotation3::apply_to`]) or produce a homogeneous matrix for
/// the row-vector transform pipeline ([`Rotation3::to_matrix`]). A zero
/// axis behaves as the identity rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation3 {
    pub angle: f64,
    pub axis: Point3,
}

/// Quaternion (w, x, y, z) used internally for rotation composition.
#[derive(Debug, Clone, Copy)]
struct Quat {
    w: f64,
    x: f64,
    y: f64,
    z: f64,
}

impl Quat {
    fn multiply(&self, o: &Quat) -> Quat {
        Quat {
            w: self.w * o.w - self.x * o.x - self.y * o.y - self.z * o.z,
            x: self.w * o.x + self.x * o.w + self.y * o.z - self.z * o.y,
            y: self.w * o.y - self.x * o.z + self.y * o.w + self.z * o.x,
            z: self.w * o.z + self.x * o.y - self.y * o.x + self.z * o.w,
        }
    }

    fn conjugate(&self) -> Quat {
        Quat {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Rotation3 {
    pub fn new(angle: f64, axis: Point3) -> Self {
        Self { angle, axis }
    }

    fn unit_quat(&self) -> Option<Quat> {
        let n = self.axis.normalize()?;
        let half = self.angle / 2.0;
        let sin = half.sin();
        Some(Quat {
            w: half.cos(),
            x: sin * n.x,
            y: sin * n.y,
            z: sin * n.z,
        })
    }

    /// Rotate a point, preserving its texture coordinates.
    pub fn apply_to(&self, p: Point3) -> Point3 {
        let Some(q) = self.unit_quat() else {
            return p;
        };
        let v = Quat {
            w: 0.0,
            x: p.x,
            y: p.y,
            z: p.z,
        };
        let r = q.multiply(&v).multiply(&q.conjugate());
        Point3::with_uv(r.x, r.y, r.z, p.u, p.v)
    }

    /// Homogeneous rotation matrix equivalent to [`Rotation3::apply_to`],
    /// for composing with the other row-vector transform builders.
    pub fn to_matrix(&self) -> Matrix {
        let Some(q) = self.unit_quat() else {
            return Matrix::identity(4);
        };
        let (w, x, y, z) = (q.w, q.x, q.y, q.z);
        let r = [
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - w * z),
                2.0 * (x * z + w * y),
            ],
            [
                2.0 * (x * y + w * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - w * x),
            ],
            [
                2.0 * (x * z - w * y),
                2.0 * (y * z + w * x),
                1.0 - 2.0 * (x * x + y * y),
            ],
        ];
        Matrix::identity(4).fill(|i, k| {
            if i < 3 && k < 3 {
                r[i][k]
            } else if i == k {
                1.0
            } else {
                0.0
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_quarter_turn_about_z() {
        let rot = Rotation3::new(FRAC_PI_2, Point3::new(0.0, 0.0, 1.0));
        let p = rot.apply_to(Point3::new(1.0, 0.0, 0.0));
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_axis_is_identity() {
        let rot = Rotation3::new(PI, Point3::new(0.0, 0.0, 0.0));
        let p = Point3::with_uv(1.0, 2.0, 3.0, 0.1, 0.9);
        assert_eq!(rot.apply_to(p), p);
        assert_eq!(rot.to_matrix(), Matrix::identity(4));
    }

    #[test]
    fn test_matrix_matches_direct_application() {
        let rot = Rotation3::new(1.1, Point3::new(1.0, 2.0, -0.5));
        let p = Point3::new(0.3, -0.7, 1.9);
        let direct = rot.apply_to(p);
        let m = p.to_row_matrix().multiply(&rot.to_matrix()).unwrap();
        assert!((m.get(0, 0) - direct.x).abs() < 1e-12);
        assert!((m.get(1, 0) - direct.y).abs() < 1e-12);
        assert!((m.get(2, 0) - direct.z).abs() < 1e-12);
    }

    #[test]
    fn test_preserves_length() {
        let rot = Rotation3::new(2.3, Point3::new(0.2, 0.9, 0.4));
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!((rot.apply_to(p).magnitude() - p.magnitude()).abs() < 1e-12);
    }
}
