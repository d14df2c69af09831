//! Triangle primitive with barycentric interpolation.

use crate::error::MathResult;
use crate::point::Point3;
use crate::transform::Transform3;

/// A triangle of three [`Point3`] corners.
///
/// Barycentric coordinates are the single source of truth here: point
/// containment, UV interpolation, and depth interpolation all derive from
/// the same signed sub-triangle areas. For a degenerate (zero-area)
/// triangle the coordinates come out NaN, which downstream comparisons
/// reject naturally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polygon {
    pub a: Point3,
    pub b: Point3,
    pub c: Point3,
}

impl Polygon {
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self { a, b, c }
    }

    /// Barycentric coordinates of `p` with respect to this triangle,
    /// returned as (weight of a, weight of b, weight of c).
    ///
    /// Each weight is the sub-triangle area opposite the corner divided by
    /// the full area, signed by the sub-triangle normal's agreement with
    /// the full triangle's normal. Weights are all non-negative exactly when
    /// `p` lies inside.
    pub fn barycentric(&self, p: Point3) -> Point3 {
        let v1 = self.a - p;
        let v2 = self.b - p;
        let v3 = self.c - p;

        let full = (self.a - self.b).cross(&(self.a - self.c));
        let opp_a = v2.cross(&v3);
        let opp_b = v3.cross(&v1);
        let opp_c = v1.cross(&v2);

        let area = full.magnitude();

        Point3::new(
            (opp_a.magnitude() / area) * full.dot(&opp_a).signum(),
            (opp_b.magnitude() / area) * full.dot(&opp_b).signum(),
            (opp_c.magnitude() / area) * full.dot(&opp_c).signum(),
        )
    }

    /// Texture coordinates at `p`, interpolated barycentrically.
    pub fn uv(&self, p: Point3) -> (f64, f64) {
        let bary = self.barycentric(p);
        (
            self.a.u * bary.x + self.b.u * bary.y + self.c.u * bary.z,
            self.a.v * bary.x + self.b.v * bary.y + self.c.v * bary.z,
        )
    }

    /// Corner `y` values (the height axis) interpolated at `p`.
    pub fn interpolate_height(&self, p: Point3) -> f64 {
        let bary = self.barycentric(p);
        self.a.y * bary.x + self.b.y * bary.y + self.c.y * bary.z
    }

    pub fn contains(&self, p: Point3) -> bool {
        let b = self.barycentric(p);
        b.x >= 0.0 && b.y >= 0.0 && b.z >= 0.0
    }

    /// Unit normal, or `None` for a degenerate triangle.
    pub fn normal(&self) -> Option<Point3> {
        (self.a - self.b).cross(&(self.a - self.c)).normalize()
    }

    /// New triangle with the transform applied to each corner; texture
    /// coordinates are untouched.
    pub fn apply_transform(&self, t: &Transform3) -> MathResult<Polygon> {
        Ok(Polygon::new(
            t.apply_to(self.a)?,
            t.apply_to(self.b)?,
            t.apply_to(self.c)?,
        ))
    }
}
