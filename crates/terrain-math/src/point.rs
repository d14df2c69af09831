//! 3D point carrying texture coordinates.

use std::ops::{Add, Mul, Sub};

use crate::matrix::Matrix;

/// A position in 3D space plus the (u, v) texture coordinates that ride
/// along with it through the transform pipeline.
///
/// Value type: every stage copies the points it transforms, so no stage
/// observes another's mutations. The vector operations act on (x, y, z)
/// only; `u` and `v` pass through unchanged from the left operand.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub u: f64,
    pub v: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            u: 0.0,
            v: 0.0,
        }
    }

    pub fn with_uv(x: f64, y: f64, z: f64, u: f64, v: f64) -> Self {
        Self { x, y, z, u, v }
    }

    pub fn dot(&self, other: &Point3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Right-handed cross product.
    pub fn cross(&self, other: &Point3) -> Point3 {
        Point3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn normalize(&self) -> Option<Point3> {
        let m = self.magnitude();
        if m == 0.0 {
            return None;
        }
        Some(*self * (1.0 / m))
    }

    /// Homogeneous row vector `[x y z 1]` (4 columns, 1 row), the shape the
    /// transform matrices multiply on the right of.
    pub fn to_row_matrix(&self) -> Matrix {
        let (x, y, z) = (self.x, self.y, self.z);
        Matrix::empty(4, 1).fill(|i, _| match i {
            0 => x,
            1 => y,
            2 => z,
            _ => 1.0,
        })
    }
}

impl Add for Point3 {
    type Output = Point3;

    fn add(self, other: Point3) -> Point3 {
        Point3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
            u: self.u,
            v: self.v,
        }
    }
}

impl Sub for Point3 {
    type Output = Point3;

    fn sub(self, other: Point3) -> Point3 {
        Point3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
            u: self.u,
            v: self.v,
        }
    }
}

impl Mul<f64> for Point3 {
    type Output = Point3;

    fn mul(self, f: f64) -> Point3 {
        Point3 {
            x: self.x * f,
            y: self.y * f,
            z: self.z * f,
            u: self.u,
            v: self.v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_right_handed() {
        let x = Point3::new(1.0, 0.0, 0.0);
        let y = Point3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Point3::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross(&x), Point3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_cross_is_orthogonal() {
        let a = Point3::new(1.5, -2.0, 0.25);
        let b = Point3::new(0.5, 3.0, -1.0);
        let c = a.cross(&b);
        assert!(c.dot(&a).abs() < 1e-12);
        assert!(c.dot(&b).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_zero() {
        assert!(Point3::new(0.0, 0.0, 0.0).normalize().is_none());
        let n = Point3::new(3.0, 4.0, 0.0).normalize().unwrap();
        assert!((n.magnitude() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_uv_carried_through_ops() {
        let a = Point3::with_uv(1.0, 2.0, 3.0, 0.25, 0.75);
        let b = Point3::new(1.0, 1.0, 1.0);
        assert_eq!((a + b).u, 0.25);
        assert_eq!((a - b).v, 0.75);
        assert_eq!((a * 2.0).u, 0.25);
    }

    #[test]
    fn test_row_matrix_shape() {
        let m = Point3::new(1.0, 2.0, 3.0).to_row_matrix();
        assert_eq!((m.size_x(), m.size_y()), (4, 1));
        assert_eq!(m.get(3, 0), 1.0);
    }
}
