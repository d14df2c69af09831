//! Generic 2D matrix of doubles.
//!
//! Indexing is `(x, y)` where `x` selects the column and `y` the row;
//! `size_x` is the column count and `size_y` the row count. Every
//! "mutating" operation returns a new matrix, so values can be shared
//! freely between pipeline stages.
//!
//! Points travel through the transform pipeline as 1-row homogeneous
//! vectors, so the 3D builder matrices here keep translation in the bottom
//! row and a point is transformed as `row_vector.multiply(&matrix)`.

use crate::error::{MathError, MathResult};

/// Immutable-by-convention 2D grid of doubles.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    size_x: usize,
    size_y: usize,
}

impl Matrix {
    /// Zero-filled matrix with `size_x` columns and `size_y` rows.
    pub fn empty(size_x: usize, size_y: usize) -> Self {
        Self {
            data: vec![0.0; size_x * size_y],
            size_x,
            size_y,
        }
    }

    /// Square zero-filled matrix.
    pub fn empty_square(size: usize) -> Self {
        Self::empty(size, size)
    }

    /// Matrix with every element set to `value`.
    pub fn value(size_x: usize, size_y: usize, value: f64) -> Self {
        Self {
            data: vec![value; size_x * size_y],
            size_x,
            size_y,
        }
    }

    pub fn identity(size: usize) -> Self {
        let mut m = Self::empty(size, size);
        for i in 0..size {
            m.set(i, i, 1.0);
        }
        m
    }

    /// Homogeneous 3D translation (translation in the bottom row, for
    /// row-vector points).
    pub fn offset_matrix_3d(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Self::identity(4);
        m.set(0, 3, dx);
        m.set(1, 3, dy);
        m.set(2, 3, dz);
        m
    }

    /// Homogeneous 3D scale.
    pub fn scale_matrix_3d(sx: f64, sy: f64, sz: f64) -> Self {
        let mut m = Self::identity(4);
        m.set(0, 0, sx);
        m.set(1, 1, sy);
        m.set(2, 2, sz);
        m
    }

    /// Homogeneous 3D rotation from Euler angles (radians), XYZ order.
    pub fn rotation_matrix_3d(rx: f64, ry: f64, rz: f64) -> Self {
        let a = rx.cos();
        let b = rx.sin();
        let c = ry.cos();
        let d = ry.sin();
        let e = rz.cos();
        let f = rz.sin();

        let ad = a * d;
        let bd = b * d;

        let mut m = Self::identity(4);

        m.set(0, 0, c * e);
        m.set(1, 0, -c * f);
        m.set(2, 0, -d);

        m.set(0, 1, -bd * e + a * f);
        m.set(1, 1, bd * f + a * e);
        m.set(2, 1, -b * c);

        m.set(0, 2, ad * e + b * f);
        m.set(1, 2, -ad * f + b * e);
        m.set(2, 2, a * c);

        m
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }

    pub fn size_y(&self) -> usize {
        self.size_y
    }

    pub fn is_square(&self) -> bool {
        self.size_x == self.size_y
    }

    /// Element at column `x`, row `y`. Panics on out-of-range indices; use
    /// [`Matrix::try_get`] for a checked read.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        assert!(
            x < self.size_x && y < self.size_y,
            "matrix index ({x}, {y}) out of bounds ({}, {})",
            self.size_x,
            self.size_y
        );
        self.data[y * self.size_x + x]
    }

    pub fn try_get(&self, x: usize, y: usize) -> MathResult<f64> {
        if x >= self.size_x || y >= self.size_y {
            return Err(MathError::index_out_of_bounds(format!(
                "({x}, {y}) in {}x{} matrix",
                self.size_x, self.size_y
            )));
        }
        Ok(self.data[y * self.size_x + x])
    }

    fn set(&mut self, x: usize, y: usize, value: f64) {
        self.data[y * self.size_x + x] = value;
    }

    /// New matrix of the same shape with every element produced by
    /// `filler(x, y)`.
    pub fn fill(&self, mut filler: impl FnMut(usize, usize) -> f64) -> Self {
        let mut m = Self::empty(self.size_x, self.size_y);
        for y in 0..self.size_y {
            for x in 0..self.size_x {
                m.set(x, y, filler(x, y));
            }
        }
        m
    }

    /// Copy with `other` written over the block starting at
    /// `(column_offset, row_offset)`.
    pub fn fill_block(
        &self,
        column_offset: usize,
        row_offset: usize,
        other: &Matrix,
    ) -> MathResult<Self> {
        if column_offset + other.size_x > self.size_x || row_offset + other.size_y > self.size_y {
            return Err(MathError::dimension_mismatch(format!(
                "{}x{} block at ({column_offset}, {row_offset}) does not fit in {}x{}",
                other.size_x, other.size_y, self.size_x, self.size_y
            )));
        }
        let mut m = self.clone();
        for y in 0..other.size_y {
            for x in 0..other.size_x {
                m.set(column_offset + x, row_offset + y, other.get(x, y));
            }
        }
        Ok(m)
    }

    /// Element-wise map.
    pub fn map(&self, mut mapper: impl FnMut(f64) -> f64) -> Self {
        self.fill(|x, y| mapper(self.get(x, y)))
    }

    pub fn transpose(&self) -> Self {
        let mut m = Self::empty(self.size_y, self.size_x);
        for y in 0..self.size_y {
            for x in 0..self.size_x {
                m.set(y, x, self.get(x, y));
            }
        }
        m
    }

    /// Element-wise sum with a same-shaped matrix.
    pub fn add(&self, other: &Matrix) -> MathResult<Self> {
        if other.size_x != self.size_x || other.size_y != self.size_y {
            return Err(MathError::dimension_mismatch(format!(
                "add: {}x{} vs {}x{}",
                self.size_x, self.size_y, other.size_x, other.size_y
            )));
        }
        Ok(self.fill(|x, y| self.get(x, y) + other.get(x, y)))
    }

    pub fn add_scalar(&self, value: f64) -> Self {
        self.map(|v| v + value)
    }

    pub fn negate(&self) -> Self {
        self.map(|v| -v)
    }

    /// Matrix product `self * other`.
    ///
    /// Requires `self.size_x == other.size_y`; the result has `other`'s
    /// column count and `self`'s row count.
    pub fn multiply(&self, other: &Matrix) -> MathResult<Self> {
        if other.size_y != self.size_x {
            return Err(MathError::dimension_mismatch(format!(
                "multiply: left has {} columns, right has {} rows",
                self.size_x, other.size_y
            )));
        }
        let mut m = Self::empty(other.size_x, self.size_y);
        for y in 0..m.size_y {
            for x in 0..m.size_x {
                let mut acc = 0.0;
                for k in 0..self.size_x {
                    acc += self.get(k, y) * other.get(x, k);
                }
                m.set(x, y, acc);
            }
        }
        Ok(m)
    }

    /// Element-wise (Hadamard) product with a same-shaped matrix.
    pub fn multiply_each(&self, other: &Matrix) -> MathResult<Self> {
        if other.size_x != self.size_x || other.size_y != self.size_y {
            return Err(MathError::dimension_mismatch(format!(
                "multiply_each: {}x{} vs {}x{}",
                self.size_x, self.size_y, other.size_x, other.size_y
            )));
        }
        Ok(self.fill(|x, y| self.get(x, y) * other.get(x, y)))
    }

    pub fn scale(&self, value: f64) -> Self {
        self.map(|v| v * value)
    }

    /// Rectangular slice `[start_x, end_x) × [start_y, end_y)`.
    pub fn submatrix(
        &self,
        start_x: usize,
        end_x: usize,
        start_y: usize,
        end_y: usize,
    ) -> MathResult<Self> {
        if start_x > end_x || start_y > end_y {
            return Err(MathError::index_out_of_bounds(format!(
                "submatrix range [{start_x}, {end_x}) x [{start_y}, {end_y}) is inverted"
            )));
        }
        if end_x > self.size_x || end_y > self.size_y {
            return Err(MathError::index_out_of_bounds(format!(
                "submatrix range [{start_x}, {end_x}) x [{start_y}, {end_y}) exceeds {}x{}",
                self.size_x, self.size_y
            )));
        }
        let mut m = Self::empty(end_x - start_x, end_y - start_y);
        for y in 0..m.size_y {
            for x in 0..m.size_x {
                m.set(x, y, self.get(start_x + x, start_y + y));
            }
        }
        Ok(m)
    }

    /// Stack `other` below `self` (column counts must match).
    pub fn concat_rows(&self, other: &Matrix) -> MathResult<Self> {
        if other.size_x != self.size_x {
            return Err(MathError::dimension_mismatch(format!(
                "concat_rows: {} vs {} columns",
                self.size_x, other.size_x
            )));
        }
        let mut m = Self::empty(self.size_x, self.size_y + other.size_y);
        m = m.fill_block(0, 0, self)?;
        m.fill_block(0, self.size_y, other)
    }

    /// Append `other` to the right of `self` (row counts must match).
    pub fn concat_columns(&self, other: &Matrix) -> MathResult<Self> {
        if other.size_y != self.size_y {
            return Err(MathError::dimension_mismatch(format!(
                "concat_columns: {} vs {} rows",
                self.size_y, other.size_y
            )));
        }
        let mut m = Self::empty(self.size_x + other.size_x, self.size_y);
        m = m.fill_block(0, 0, self)?;
        m.fill_block(self.size_x, 0, other)
    }

    /// Matrix with column `x` and row `y` removed, reassembled from the four
    /// surrounding quadrants.
    pub fn minor(&self, x: usize, y: usize) -> MathResult<Self> {
        if self.size_x < 2 || self.size_y < 2 {
            return Err(MathError::dimension_mismatch(
                "minor of a matrix smaller than 2x2",
            ));
        }
        if x >= self.size_x || y >= self.size_y {
            return Err(MathError::index_out_of_bounds(format!(
                "minor at ({x}, {y}) in {}x{} matrix",
                self.size_x, self.size_y
            )));
        }

        let lt = if x > 0 && y > 0 {
            Some(self.submatrix(0, x, 0, y)?)
        } else {
            None
        };
        let rt = if x < self.size_x - 1 && y > 0 {
            Some(self.submatrix(x + 1, self.size_x, 0, y)?)
        } else {
            None
        };
        let lb = if x > 0 && y < self.size_y - 1 {
            Some(self.submatrix(0, x, y + 1, self.size_y)?)
        } else {
            None
        };
        let rb = if x < self.size_x - 1 && y < self.size_y - 1 {
            Some(self.submatrix(x + 1, self.size_x, y + 1, self.size_y)?)
        } else {
            None
        };

        let top = match (lt, rt) {
            (Some(l), Some(r)) => Some(l.concat_columns(&r)?),
            (l, r) => l.or(r),
        };
        let bottom = match (lb, rb) {
            (Some(l), Some(r)) => Some(l.concat_columns(&r)?),
            (l, r) => l.or(r),
        };

        match (top, bottom) {
            (Some(t), Some(b)) => t.concat_rows(&b),
            (t, b) => t.or(b).ok_or_else(|| {
                MathError::dimension_mismatch("minor produced an empty matrix")
            }),
        }
    }

    /// Determinant by cofactor expansion along row 0. `None` when the matrix
    /// is not square.
    pub fn determinant(&self) -> Option<f64> {
        if !self.is_square() {
            return None;
        }
        if self.size_x == 1 {
            return Some(self.get(0, 0));
        }

        let mut result = 0.0;
        for x in 0..self.size_x {
            // minor() on a valid square matrix cannot fail
            let det = self.minor(x, 0).ok()?.determinant()?;
            if x % 2 == 0 {
                result += self.get(x, 0) * det;
            } else {
                result -= self.get(x, 0) * det;
            }
        }
        Some(result)
    }

    /// Determinant of the largest top-left square block of a rectangular
    /// matrix.
    pub fn determinant_cut_to_square(&self) -> Option<f64> {
        let min = self.size_x.min(self.size_y);
        self.submatrix(0, min, 0, min).ok()?.determinant()
    }

    pub fn swap_rows(&self, a: usize, b: usize) -> MathResult<Self> {
        if a >= self.size_y || b >= self.size_y {
            return Err(MathError::index_out_of_bounds(format!(
                "swap_rows({a}, {b}) with {} rows",
                self.size_y
            )));
        }
        Ok(self.fill(|x, y| {
            let src = if y == a { b } else if y == b { a } else { y };
            self.get(x, src)
        }))
    }

    pub fn swap_columns(&self, a: usize, b: usize) -> MathResult<Self> {
        if a >= self.size_x || b >= self.size_x {
            return Err(MathError::index_out_of_bounds(format!(
                "swap_columns({a}, {b}) with {} columns",
                self.size_x
            )));
        }
        Ok(self.fill(|x, y| {
            let src = if x == a { b } else if x == b { a } else { x };
            self.get(src, y)
        }))
    }

    /// Row `y` as a 1-row matrix.
    pub fn get_row(&self, y: usize) -> MathResult<Self> {
        self.submatrix(0, self.size_x, y, y + 1)
    }

    /// Column `x` as a 1-column matrix.
    pub fn get_column(&self, x: usize) -> MathResult<Self> {
        self.submatrix(x, x + 1, 0, self.size_y)
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    pub fn sum_map(&self, mut op: impl FnMut(f64) -> f64) -> f64 {
        self.data.iter().map(|v| op(*v)).sum()
    }

    pub fn sum_row(&self, y: usize) -> MathResult<f64> {
        Ok(self.get_row(y)?.sum())
    }

    pub fn sum_column(&self, x: usize) -> MathResult<f64> {
        Ok(self.get_column(x)?.sum())
    }

    /// Maximum absolute row sum.
    pub fn row_norm(&self) -> f64 {
        (0..self.size_y)
            .map(|y| self.get_row(y).map(|r| r.sum_map(f64::abs)).unwrap_or(f64::NAN))
            .fold(f64::NAN, f64::max)
    }

    /// Maximum absolute column sum.
    pub fn column_norm(&self) -> f64 {
        (0..self.size_x)
            .map(|x| {
                self.get_column(x)
                    .map(|c| c.sum_map(f64::abs))
                    .unwrap_or(f64::NAN)
            })
            .fold(f64::NAN, f64::max)
    }

    /// Frobenius norm.
    pub fn abs(&self) -> f64 {
        self.sum_map(|v| v * v).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_rows(rows: &[&[f64]]) -> Matrix {
        Matrix::empty(rows[0].len(), rows.len()).fill(|x, y| rows[y][x])
    }

    #[test]
    fn test_identity_multiply_point() {
        let identity = Matrix::identity(4);
        let point = from_rows(&[&[3.0], &[-1.5], &[7.0], &[1.0]]);
        let result = identity.multiply(&point).unwrap();
        assert_eq!(result, point);
    }

    #[test]
    fn test_rotation_zero_is_identity() {
        let m = Matrix::rotation_matrix_3d(0.0, 0.0, 0.0);
        assert_eq!(m, Matrix::identity(4));
    }

    #[test]
    fn test_offset_applies_to_row_vector() {
        let p = from_rows(&[&[1.0, 2.0, 3.0, 1.0]]);
        let m = Matrix::offset_matrix_3d(10.0, 20.0, 30.0);
        let r = p.multiply(&m).unwrap();
        assert_eq!(r.get(0, 0), 11.0);
        assert_eq!(r.get(1, 0), 22.0);
        assert_eq!(r.get(2, 0), 33.0);
        assert_eq!(r.get(3, 0), 1.0);
    }

    #[test]
    fn test_multiply_dimension_mismatch() {
        let a = Matrix::empty(3, 2);
        let b = Matrix::empty(2, 2);
        assert!(matches!(
            a.multiply(&b),
            Err(MathError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_determinant_2x2() {
        let m = from_rows(&[&[3.0, 8.0], &[4.0, 6.0]]);
        assert_eq!(m.determinant(), Some(3.0 * 6.0 - 8.0 * 4.0));
    }

    #[test]
    fn test_determinant_3x3() {
        let m = from_rows(&[&[6.0, 1.0, 1.0], &[4.0, -2.0, 5.0], &[2.0, 8.0, 7.0]]);
        assert_eq!(m.determinant(), Some(-306.0));
    }

    #[test]
    fn test_determinant_non_square() {
        assert_eq!(Matrix::empty(2, 3).determinant(), None);
        assert_eq!(Matrix::identity(3).concat_columns(&Matrix::empty(1, 3)).unwrap().determinant_cut_to_square(), Some(1.0));
    }

    #[test]
    fn test_minor_removes_row_and_column() {
        let m = from_rows(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
        let minor = m.minor(1, 1).unwrap();
        assert_eq!(minor, from_rows(&[&[1.0, 3.0], &[7.0, 9.0]]));
    }

    #[test]
    fn test_transpose() {
        let m = from_rows(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        let t = m.transpose();
        assert_eq!(t.size_x(), 3);
        assert_eq!(t.size_y(), 2);
        assert_eq!(t.get(2, 1), m.get(1, 2));
    }

    #[test]
    fn test_concat_and_swap() {
        let a = from_rows(&[&[1.0, 2.0]]);
        let b = from_rows(&[&[3.0, 4.0]]);
        let stacked = a.concat_rows(&b).unwrap();
        assert_eq!(stacked.size_y(), 2);
        let swapped = stacked.swap_rows(0, 1).unwrap();
        assert_eq!(swapped.get(0, 0), 3.0);
        assert_eq!(swapped.get(0, 1), 1.0);
    }

    #[test]
    fn test_norms() {
        let m = from_rows(&[&[1.0, -2.0], &[-3.0, 4.0]]);
        assert_eq!(m.row_norm(), 7.0);
        assert_eq!(m.column_norm(), 6.0);
        assert!((m.abs() - (30.0f64).sqrt()).abs() < 1e-12);
    }
}
