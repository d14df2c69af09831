//! Indexed mesh: shared vertices, wireframe edges, triangle faces.

use crate::point::Point3;
use crate::polygon::Polygon;

/// An immutable collection of vertices with edge index pairs (wireframe
/// display) and triangle index triples (shaded surface).
///
/// Triangles reference shared vertices by index; [`Model::polygon`]
/// materializes an owned [`Polygon`] copy on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    vertices: Vec<Point3>,
    edges: Vec<(usize, usize)>,
    triangles: Vec<[usize; 3]>,
}

impl Model {
    pub fn new(
        vertices: Vec<Point3>,
        edges: Vec<(usize, usize)>,
        triangles: Vec<[usize; 3]>,
    ) -> Self {
        Self {
            vertices,
            edges,
            triangles,
        }
    }

    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Materialize triangle `i` as an owned [`Polygon`]; `None` when `i` or
    /// any referenced vertex index is out of range.
    pub fn polygon(&self, i: usize) -> Option<Polygon> {
        let [a, b, c] = *self.triangles.get(i)?;
        Some(Polygon::new(
            *self.vertices.get(a)?,
            *self.vertices.get(b)?,
            *self.vertices.get(c)?,
        ))
    }

    /// Iterator over all triangles as owned polygons, skipping any with
    /// out-of-range indices.
    pub fn polygons(&self) -> impl Iterator<Item = Polygon> + '_ {
        (0..self.triangles.len()).filter_map(|i| self.polygon(i))
    }

    /// The three coordinate axes as a wireframe model of the given
    /// half-length.
    pub fn axis(length: f64) -> Self {
        Self::new(
            vec![
                Point3::new(length, 0.0, 0.0),
                Point3::new(-length, 0.0, 0.0),
                Point3::new(0.0, length, 0.0),
                Point3::new(0.0, -length, 0.0),
                Point3::new(0.0, 0.0, length),
                Point3::new(0.0, 0.0, -length),
            ],
            vec![(0, 1), (2, 3), (4, 5)],
            Vec::new(),
        )
    }

    /// Wireframe cube with the given edge length, centered on the origin.
    pub fn cube(length: f64) -> Self {
        let hl = length / 2.0;
        Self::new(
            vec![
                Point3::new(hl, hl, hl),
                Point3::new(hl, hl, -hl),
                Point3::new(hl, -hl, hl),
                Point3::new(hl, -hl, -hl),
                Point3::new(-hl, hl, hl),
                Point3::new(-hl, hl, -hl),
                Point3::new(-hl, -hl, hl),
                Point3::new(-hl, -hl, -hl),
            ],
            vec![
                (0, 1),
                (0, 2),
                (0, 4),
                (7, 6),
                (7, 5),
                (7, 3),
                (1, 5),
                (1, 3),
                (2, 3),
                (4, 5),
                (6, 2),
                (6, 4),
            ],
            Vec::new(),
        )
    }

    /// Wireframe cube with edge midpoints subdividing every edge in two.
    pub fn cube_subdivided(length: f64) -> Self {
        let hl = length / 2.0;
        Self::new(
            vec![
                Point3::new(hl, hl, hl),
                Point3::new(hl, hl, -hl),
                Point3::new(hl, -hl, hl),
                Point3::new(hl, -hl, -hl),
                Point3::new(-hl, hl, hl),
                Point3::new(-hl, hl, -hl),
                Point3::new(-hl, -hl, hl),
                Point3::new(-hl, -hl, -hl),
                Point3::new(0.0, hl, hl),
                Point3::new(0.0, hl, -hl),
                Point3::new(0.0, -hl, hl),
                Point3::new(0.0, -hl, -hl),
                Point3::new(hl, 0.0, hl),
                Point3::new(hl, 0.0, -hl),
                Point3::new(-hl, 0.0, hl),
                Point3::new(-hl, 0.0, -hl),
                Point3::new(hl, hl, 0.0),
                Point3::new(hl, -hl, 0.0),
                Point3::new(-hl, hl, 0.0),
                Point3::new(-hl, -hl, 0.0),
            ],
            vec![
                (0, 16),
                (0, 12),
                (0, 8),
                (7, 19),
                (7, 15),
                (7, 11),
                (1, 9),
                (1, 13),
                (2, 17),
                (4, 18),
                (6, 10),
                (6, 14),
                (16, 1),
                (12, 2),
                (8, 4),
                (19, 6),
                (15, 5),
                (11, 3),
                (9, 5),
                (13, 3),
                (17, 3),
                (18, 5),
                (10, 2),
                (14, 4),
            ],
            Vec::new(),
        )
    }
}
