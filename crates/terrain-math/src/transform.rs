//! Scale/rotate/translate transform description.

use crate::error::MathResult;
use crate::matrix::Matrix;
use crate::point::Point3;

/// Offset, Euler rotation (radians), and per-axis scale, applied to points
/// in the fixed order scale → rotate → translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3 {
    pub offset: Point3,
    pub rotation: Point3,
    pub scale: Point3,
}

impl Default for Transform3 {
    fn default() -> Self {
        Self {
            offset: Point3::default(),
            rotation: Point3::default(),
            scale: Point3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform3 {
    pub fn new(offset: Point3, rotation: Point3, scale: Point3) -> Self {
        Self {
            offset,
            rotation,
            scale,
        }
    }

    /// Combined homogeneous matrix: `S * R * T` for row-vector points, so a
    /// point is scaled first and translated last.
    pub fn to_matrix(&self) -> MathResult<Matrix> {
        let s = Matrix::scale_matrix_3d(self.scale.x, self.scale.y, self.scale.z);
        let r = Matrix::rotation_matrix_3d(self.rotation.x, self.rotation.y, self.rotation.z);
        let t = Matrix::offset_matrix_3d(self.offset.x, self.offset.y, self.offset.z);
        s.multiply(&r)?.multiply(&t)
    }

    /// Transform a single point, carrying its texture coordinates through.
    pub fn apply_to(&self, p: Point3) -> MathResult<Point3> {
        let m = p.to_row_matrix().multiply(&self.to_matrix()?)?;
        Ok(Point3::with_uv(
            m.get(0, 0),
            m.get(1, 0),
            m.get(2, 0),
            p.u,
            p.v,
        ))
    }
}
