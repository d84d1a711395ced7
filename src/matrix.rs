use std::fmt;
use std::ops::{ Index, IndexMut, Mul };
use std::convert::From;

use crate::feq;
use crate::tuple::Tuple4D;

/// A 2x2 matrix, stored row-major.
///
/// Only needed as the submatrix of a `Matrix3D`.
#[derive(Copy, Clone, Debug, PartialOrd)]
pub struct Matrix2D {
    data: [f64; 4],
}

/// A 3x3 matrix, stored row-major.
///
/// Mostly needed as the submatrix of a `Matrix4D` when computing cofactors.
#[derive(Copy, Clone, Debug, PartialOrd)]
pub struct Matrix3D {
    data: [f64; 9],
}

/// A 4x4 matrix, stored row-major.
///
/// These matrices are used almost universally in the ray caster. They encode
/// affine transformations in 3D space, transforming both vectors and points
/// (`w` components of `0.0` and `1.0`, respectively). Shapes and cameras only
/// ever see this order of matrix.
///
/// The default matrix is the identity. Builders for common transformations
/// (translation, rotation, view transforms, ...) live in `crate::transform`.
///
/// # Examples
///
/// Creating an identity matrix:
///
/// ```
/// # use ray_caster::matrix::Matrix4D;
/// let mat = Matrix4D::identity();
/// assert_eq!(mat.determinant(), 1.0);
/// assert_eq!(mat, Matrix4D::default());
/// ```
///
/// Inverting a matrix:
///
/// ```
/// # use ray_caster::matrix::Matrix4D;
/// let m = Matrix4D::translation(1.0, 2.0, 3.0);
/// assert_eq!(m.inverse(), Some(Matrix4D::translation(-1.0, -2.0, -3.0)));
///
/// let singular = Matrix4D::scaling(0.0, 1.0, 1.0);
/// assert_eq!(singular.inverse(), None);
/// ```
#[derive(Copy, Clone, Debug, PartialOrd)]
pub struct Matrix4D {
    data: [f64; 16],
}

macro_rules! square_matrix_common {
    ($name:ident, $n:expr) => {
        impl Default for $name {
            fn default() -> $name {
                $name::identity()
            }
        }

        impl From<[f64; $n * $n]> for $name {
            fn from(data: [f64; $n * $n]) -> $name {
                $name { data }
            }
        }

        impl Index<(usize, usize)> for $name {
            type Output = f64;

            fn index(&self, index: (usize, usize)) -> &f64 {
                &self.data[(index.0 * $n) + index.1]
            }
        }

        impl IndexMut<(usize, usize)> for $name {
            fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
                &mut self.data[(index.0 * $n) + index.1]
            }
        }

        /// Matrices are compared element-wise, approximately.
        impl PartialEq for $name {
            fn eq(&self, other: &$name) -> bool {
                self.data.iter().zip(other.data.iter())
                    .all(|(x, y)| feq(*x, *y))
            }
        }

        impl $name {
            /// Creates a matrix with every element set to `0.0`.
            pub fn zero() -> $name {
                $name { data: [0.0; $n * $n] }
            }

            /// Instantiates an identity matrix.
            pub fn identity() -> $name {
                let mut m = $name::zero();
                for i in 0..$n {
                    m[(i, i)] = 1.0;
                }

                m
            }

            /// Produces the transpose of a matrix in-place.
            ///
            /// The transpose swaps rows with columns: `A^T_{ij} = A_{ji}`.
            pub fn transpose(&mut self) {
                for r in 0..$n {
                    for c in (r + 1)..$n {
                        let tmp = self[(r, c)];
                        self[(r, c)] = self[(c, r)];
                        self[(c, r)] = tmp;
                    }
                }
            }

            /// Produces the transpose of a matrix, returning a new matrix.
            ///
            /// See `transpose` for the in-place version.
            pub fn transposition(&self) -> $name {
                let mut buf = *self;
                buf.transpose();
                buf
            }
        }
    };
}

square_matrix_common!(Matrix2D, 2);
square_matrix_common!(Matrix3D, 3);
square_matrix_common!(Matrix4D, 4);

impl Matrix2D {
    /// Calculates the determinant of a `Matrix2D`.
    pub fn determinant(&self) -> f64 {
        self[(0, 0)] * self[(1, 1)] - self[(0, 1)] * self[(1, 0)]
    }
}

impl Matrix3D {
    /// Returns the submatrix of a `Matrix3D`.
    ///
    /// A submatrix "eliminates" one row and one column of a larger matrix,
    /// keeping the remaining entries in their relative order. For example,
    /// given the following 3x3 matrix:
    ///
    /// ```text
    /// [
    ///     1.0, 0.0, 2.0,
    ///     3.0, 1.0, 0.0,
    ///     1.0, 1.0, 1.0
    /// ]
    /// ```
    ///
    /// The submatrix for `row == 1`, `col == 2` (zero-indexed) is:
    ///
    /// ```text
    /// [
    ///     1.0, 0.0,
    ///     1.0, 1.0
    /// ]
    /// ```
    pub fn submatrix(&self, row: usize, col: usize) -> Matrix2D {
        let mut buf: [f64; 4] = [0.0; 4];
        let mut count = 0;

        for r in (0..3).filter(|&r| r != row) {
            for c in (0..3).filter(|&c| c != col) {
                buf[count] = self[(r, c)];
                count += 1;
            }
        }

        Matrix2D { data: buf }
    }

    /// Returns the minor of a `Matrix3D` at row and column.
    ///
    /// The "minor" is the determinant of the submatrix at `row` and `col`.
    pub fn minor(&self, row: usize, col: usize) -> f64 {
        self.submatrix(row, col).determinant()
    }

    /// Returns the cofactor of a `Matrix3D` at row and column.
    ///
    /// The cofactor is the minor, negated when `row + col` is odd.
    pub fn cofactor(&self, row: usize, col: usize) -> f64 {
        let m = self.minor(row, col);
        if (row + col) % 2 == 0 { m } else { -m }
    }

    /// Calculates the determinant of a `Matrix3D` with the rule of Sarrus.
    pub fn determinant(&self) -> f64 {
        let m = &self.data;

        m[0] * m[4] * m[8]
            + m[1] * m[5] * m[6]
            + m[2] * m[3] * m[7]
            - m[6] * m[4] * m[2]
            - m[7] * m[5] * m[0]
            - m[8] * m[3] * m[1]
    }

    /// Calculates the inverse of a `Matrix3D`, if it exists.
    ///
    /// Returns `None` exactly when the determinant is `0.0`.
    pub fn inverse(&self) -> Option<Matrix3D> {
        let det = self.determinant();
        if det == 0.0 {
            return None;
        }

        let mut inv = Matrix3D::zero();
        for r in 0..3 {
            for c in 0..3 {
                inv[(c, r)] = self.cofactor(r, c) / det;
            }
        }

        Some(inv)
    }
}

impl Matrix4D {
    /// Whether every entry is finite (no NaN or infinity).
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// Returns the submatrix of a `Matrix4D`, removing `row` and `col`.
    ///
    /// See `Matrix3D::submatrix` for what a submatrix is.
    pub fn submatrix(&self, row: usize, col: usize) -> Matrix3D {
        let mut buf: [f64; 9] = [0.0; 9];
        let mut count = 0;

        for r in (0..4).filter(|&r| r != row) {
            for c in (0..4).filter(|&c| c != col) {
                buf[count] = self[(r, c)];
                count += 1;
            }
        }

        Matrix3D { data: buf }
    }

    /// Returns the minor of a `Matrix4D` at row and column.
    pub fn minor(&self, row: usize, col: usize) -> f64 {
        self.submatrix(row, col).determinant()
    }

    /// Returns the cofactor of a `Matrix4D` at row and column.
    ///
    /// The cofactor is the minor, negated when `row + col` is odd.
    pub fn cofactor(&self, row: usize, col: usize) -> f64 {
        let m = self.minor(row, col);
        if (row + col) % 2 == 0 { m } else { -m }
    }

    /// Calculates the determinant of a `Matrix4D`.
    ///
    /// Uses the full Leibniz expansion (all 24 signed permutation products)
    /// so no submatrices are built.
    pub fn determinant(&self) -> f64 {
        let m = &self.data;

        m[0] * m[5] * m[10] * m[15]
            + m[0] * m[9] * m[14] * m[7]
            + m[0] * m[13] * m[6] * m[11]
            + m[4] * m[1] * m[14] * m[11]
            + m[4] * m[9] * m[2] * m[15]
            + m[4] * m[13] * m[10] * m[3]
            + m[8] * m[1] * m[6] * m[15]
            + m[8] * m[5] * m[14] * m[3]
            + m[8] * m[13] * m[2] * m[7]
            + m[12] * m[1] * m[10] * m[7]
            + m[12] * m[5] * m[2] * m[11]
            + m[12] * m[9] * m[6] * m[3]
            - m[0] * m[5] * m[14] * m[11]
            - m[0] * m[9] * m[6] * m[15]
            - m[0] * m[13] * m[10] * m[7]
            - m[4] * m[1] * m[10] * m[15]
            - m[4] * m[9] * m[14] * m[3]
            - m[4] * m[13] * m[2] * m[11]
            - m[8] * m[1] * m[14] * m[7]
            - m[8] * m[5] * m[2] * m[15]
            - m[8] * m[13] * m[6] * m[3]
            - m[12] * m[1] * m[6] * m[11]
            - m[12] * m[5] * m[10] * m[3]
            - m[12] * m[9] * m[2] * m[7]
    }

    /// Calculates the inverse of a `Matrix4D`, if it exists.
    ///
    /// If a `Matrix4D` is non-invertible, this function returns `None`. The
    /// test is an exact comparison of the determinant against `0.0`; nearly
    /// singular matrices are still inverted.
    pub fn inverse(&self) -> Option<Matrix4D> {
        let det = self.determinant();
        if det == 0.0 {
            return None;
        }

        let mut inv = Matrix4D::zero();
        for r in 0..4 {
            for c in 0..4 {
                inv[(c, r)] = self.cofactor(r, c) / det;
            }
        }

        Some(inv)
    }
}

/// Multiplication between two matrices.
///
/// Note that matrix multiplication is not commutative; in other words, for
/// matrix `A` and matrix `B`, `A * B` is not necessarily equal to `B * A`.
/// In a product of transforms, the rightmost one acts first on a point.
///
/// # Examples
///
/// ```
/// # use ray_caster::matrix::Matrix4D;
/// let m1 = Matrix4D::scaling(2.0, 3.0, 4.0);
/// let m2 = Matrix4D::scaling(4.0, 3.0, 2.0);
/// assert_eq!(m1 * m2, Matrix4D::scaling(8.0, 9.0, 8.0));
/// ```
impl Mul<Matrix4D> for Matrix4D {
    type Output = Matrix4D;

    fn mul(self, other: Matrix4D) -> Matrix4D {
        let mut res = Matrix4D::zero();

        for r in 0..4 {
            for c in 0..4 {
                res[(r, c)] = self[(r, 0)] * other[(0, c)]
                    + self[(r, 1)] * other[(1, c)]
                    + self[(r, 2)] * other[(2, c)]
                    + self[(r, 3)] * other[(3, c)]
            }
        }

        res
    }
}

/// Multiplication between a matrix and a `Tuple4D`.
///
/// `Tuple4D`s are multiplied on the right, as a column vector.
///
/// # Examples
///
/// ```
/// # use ray_caster::tuple::Tuple4D;
/// # use ray_caster::matrix::Matrix4D;
/// let v = Tuple4D::vector(1.0, 4.0, 5.0);
/// let m = Matrix4D::scaling(2.0, 2.0, 2.0);
/// assert_eq!(m * v, Tuple4D::vector(2.0, 8.0, 10.0));
/// ```
impl Mul<Tuple4D> for Matrix4D {
    type Output = Tuple4D;

    fn mul(self, other: Tuple4D) -> Tuple4D {
        let mut buf: [f64; 4] = Default::default();

        for (r, v) in buf.iter_mut().enumerate() {
            *v = self[(r, 0)] * other.x
                + self[(r, 1)] * other.y
                + self[(r, 2)] * other.z
                + self[(r, 3)] * other.w;
        }

        Tuple4D { x: buf[0], y: buf[1], z: buf[2], w: buf[3] }
    }
}

impl fmt::Display for Matrix4D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..4 {
            write!(f, "|")?;
            for c in 0..4 {
                write!(f, " {} |", self[(r, c)])?;
            }

            // No newline after the final row
            if r != 3 {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

#[test]
fn default_is_identity() {
    assert_eq!(Matrix2D::default(), Matrix2D::from([1.0, 0.0, 0.0, 1.0]));
    assert_eq!(Matrix3D::default(), Matrix3D::identity());
    assert_eq!(Matrix4D::default(), Matrix4D::identity());
}

#[test]
fn mat4_is_finite() {
    let mut m = Matrix4D::translation(1.0, 2.0, 3.0);
    assert!(m.is_finite());

    m[(1, 2)] = f64::NAN;
    assert!(!m.is_finite());
}

#[test]
fn identity() {
    let i = Matrix4D::identity();
    let a: Matrix4D = [ 0.0, 1.0,  2.0,  4.0,
                        1.0, 2.0,  4.0,  8.0,
                        2.0, 4.0,  8.0, 16.0,
                        4.0, 8.0, 16.0, 32.0, ].into();

    assert_eq!(i * a, a);
    assert_eq!(a * i, a);
}

#[test]
fn multiply_matrices() {
    let a: Matrix4D = [ 1.0, 2.0, 3.0, 4.0,
                        5.0, 6.0, 7.0, 8.0,
                        9.0, 8.0, 7.0, 6.0,
                        5.0, 4.0, 3.0, 2.0, ].into();

    let b: Matrix4D = [ -2.0, 1.0, 2.0,  3.0,
                         3.0, 2.0, 1.0, -1.0,
                         4.0, 3.0, 6.0,  5.0,
                         1.0, 2.0, 7.0,  8.0, ].into();

    let c: Matrix4D = [ 20.0, 22.0,  50.0,  48.0,
                        44.0, 54.0, 114.0, 108.0,
                        40.0, 58.0, 110.0, 102.0,
                        16.0, 26.0,  46.0,  42.0, ].into();

    assert_eq!(a * b, c);
}

#[test]
fn multiply_matrix_by_tuple() {
    let a: Matrix4D = [ 1.0, 2.0, 3.0, 4.0,
                        2.0, 4.0, 4.0, 2.0,
                        8.0, 6.0, 4.0, 1.0,
                        0.0, 0.0, 0.0, 1.0, ].into();

    let b = Tuple4D::tuple(1.0, 2.0, 3.0, 1.0);
    assert_eq!(a * b, Tuple4D::tuple(18.0, 24.0, 33.0, 1.0));
}

#[test]
fn transpose() {
    let a: Matrix4D = [ 0.0, 9.0, 3.0, 0.0,
                        9.0, 8.0, 0.0, 8.0,
                        1.0, 8.0, 5.0, 3.0,
                        0.0, 0.0, 5.0, 8.0, ].into();

    let t: Matrix4D = [ 0.0, 9.0, 1.0, 0.0,
                        9.0, 8.0, 8.0, 0.0,
                        3.0, 0.0, 5.0, 5.0,
                        0.0, 8.0, 3.0, 8.0, ].into();

    assert_eq!(t, a.transposition());
    assert_eq!(t.transposition(), a);

    let mut b = a;
    b.transpose();
    assert_eq!(b, t);
}

#[test]
fn transpose_identity() {
    let i = Matrix4D::identity();
    assert_eq!(i, i.transposition());
}

#[test]
fn mat2_determinant() {
    let a: Matrix2D = [ 1.0, 5.0,
                       -3.0, 2.0 ].into();

    assert_eq!(a.determinant(), 17.0);
}

#[test]
fn mat3_submatrix() {
    let a: Matrix3D = [  1.0, 5.0,  0.0,
                        -3.0, 2.0,  7.0,
                         0.0, 6.0, -3.0, ].into();

    let s: Matrix2D = [ -3.0, 2.0,
                         0.0, 6.0  ].into();

    assert_eq!(a.submatrix(0, 2), s);
}

#[test]
fn mat3_submatrix_removing_first_row_and_column() {
    let a: Matrix3D = [ 1.0, 2.0, 3.0,
                        4.0, 5.0, 6.0,
                        7.0, 8.0, 9.0, ].into();

    let s: Matrix2D = [ 5.0, 6.0,
                        8.0, 9.0 ].into();

    assert_eq!(a.submatrix(0, 0), s);
}

#[test]
fn mat4_submatrix() {
    let a: Matrix4D = [ -6.0, 1.0,  1.0, 6.0,
                        -8.0, 5.0,  8.0, 6.0,
                        -1.0, 0.0,  8.0, 2.0,
                        -7.0, 1.0, -1.0, 1.0, ].into();

    let s: Matrix3D = [ -6.0,  1.0, 6.0,
                        -8.0,  8.0, 6.0,
                        -7.0, -1.0, 1.0, ].into();

    assert_eq!(a.submatrix(2, 1), s);
}

#[test]
fn mat3_cofactor() {
    let a: Matrix3D = [ 3.0,  5.0,  0.0,
                        2.0, -1.0, -7.0,
                        6.0, -1.0,  5.0, ].into();

    assert_eq!(a.minor(0, 0), -12.0);
    assert_eq!(a.cofactor(0, 0), -12.0);
    assert_eq!(a.minor(1, 0), 25.0);
    assert_eq!(a.cofactor(1, 0), -25.0);
}

#[test]
fn mat3_determinant() {
    let a: Matrix3D = [  1.0, 2.0,  6.0,
                        -5.0, 8.0, -4.0,
                         2.0, 6.0,  4.0, ].into();

    assert_eq!(a.cofactor(0, 0), 56.0);
    assert_eq!(a.cofactor(0, 1), 12.0);
    assert_eq!(a.cofactor(0, 2), -46.0);
    assert_eq!(a.determinant(), -196.0);
}

#[test]
fn mat3_inverse() {
    let a: Matrix3D = [ 2.0, 0.0, 0.0,
                        0.0, 4.0, 0.0,
                        1.0, 0.0, 1.0, ].into();

    let i: Matrix3D = [  0.5, 0.0,  0.0,
                         0.0, 0.25, 0.0,
                        -0.5, 0.0,  1.0, ].into();

    assert_eq!(a.inverse(), Some(i));
    assert_eq!(Matrix3D::zero().inverse(), None);
}

#[test]
fn mat4_determinant() {
    let a: Matrix4D = [ -2.0, -8.0,  3.0,  5.0,
                        -3.0,  1.0,  7.0,  3.0,
                         1.0,  2.0, -9.0,  6.0,
                        -6.0,  7.0,  7.0, -9.0, ].into();

    assert_eq!(a.cofactor(0, 0), 690.0);
    assert_eq!(a.cofactor(0, 1), 447.0);
    assert_eq!(a.cofactor(0, 2), 210.0);
    assert_eq!(a.cofactor(0, 3), 51.0);
    assert_eq!(a.determinant(), -4071.0);
}

#[test]
fn mat4_singular_has_no_inverse() {
    let a: Matrix4D = [ -4.0,  2.0, -2.0, -3.0,
                         9.0,  6.0,  2.0,  6.0,
                         0.0, -5.0,  1.0, -5.0,
                         0.0,  0.0,  0.0,  0.0, ].into();

    assert_eq!(a.determinant(), 0.0);
    assert!(a.inverse().is_none());
}

#[test]
fn mat4_inverse() {
    let a: Matrix4D = [  8.0, -5.0,  9.0,  2.0,
                         7.0,  5.0,  6.0,  1.0,
                        -6.0,  0.0,  9.0,  6.0,
                        -3.0,  0.0, -9.0, -4.0, ].into();

    let i: Matrix4D = [ -0.15385, -0.15385, -0.28205, -0.53846,
                        -0.07692,  0.12308,  0.02564,  0.03077,
                         0.35897,  0.35897,  0.43590,  0.92308,
                        -0.69231, -0.69231, -0.76923, -1.92308, ].into();

    assert_eq!(a.inverse().unwrap(), i);
}

#[test]
fn mat4_inverse_mult() {
    let a: Matrix4D = [  3.0, -9.0,  7.0,  3.0,
                         3.0,  8.0,  2.0, -9.0,
                        -4.0,  4.0,  4.0,  1.0,
                        -6.0,  5.0, -1.0,  1.0, ].into();

    let b: Matrix4D = [ 8.0,  2.0, 2.0, 2.0,
                        3.0, -1.0, 7.0, 0.0,
                        7.0,  0.0, 5.0, 4.0,
                        6.0, -2.0, 0.0, 5.0  ].into();

    let c = a * b;

    assert_eq!(a, c * b.inverse().unwrap());
    assert_eq!(a * a.inverse().unwrap(), Matrix4D::identity());
}
