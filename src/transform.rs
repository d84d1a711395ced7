//! Builders for 4x4 transformation matrices.
//!
//! All of these are pure constructors on `Matrix4D`. Compose them with `*`;
//! the rightmost factor is applied to a point first, so
//! `translation(..) * scaling(..)` scales in object space and then moves the
//! result.

use crate::matrix::Matrix4D;
use crate::tuple::Tuple4D;

impl Matrix4D {
    /// Instantiates a 4x4 translation matrix.
    ///
    /// This matrix offsets a point by `x`, `y` and `z`. Vectors are left
    /// unchanged, since their `w` component is `0.0`.
    pub fn translation(x: f64, y: f64, z: f64) -> Matrix4D {
        [
            1.0, 0.0, 0.0, x,
            0.0, 1.0, 0.0, y,
            0.0, 0.0, 1.0, z,
            0.0, 0.0, 0.0, 1.0,
        ].into()
    }

    /// Instantiates a 4x4 scaling matrix.
    ///
    /// This matrix scales vectors or points by `x`, `y` and `z` along the X, Y
    /// and Z axes, respectively. A negative factor reflects across that axis.
    pub fn scaling(x: f64, y: f64, z: f64) -> Matrix4D {
        [
            x,   0.0, 0.0, 0.0,
            0.0, y,   0.0, 0.0,
            0.0, 0.0, z,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ].into()
    }

    /// Instantiates a rotation about the X axis by `r` radians.
    ///
    /// ```
    /// # use ray_caster::tuple::Tuple4D;
    /// # use ray_caster::matrix::Matrix4D;
    /// let point = Tuple4D::point(0.0, 1.0, 0.0);
    /// let m = Matrix4D::rotation_x(std::f64::consts::PI / 2.0);
    /// assert_eq!(m * point, Tuple4D::point(0.0, 0.0, 1.0));
    /// ```
    pub fn rotation_x(r: f64) -> Matrix4D {
        let (s, c) = r.sin_cos();
        [
            1.0, 0.0, 0.0, 0.0,
            0.0, c,   -s,  0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ].into()
    }

    /// Instantiates a rotation about the Y axis by `r` radians.
    pub fn rotation_y(r: f64) -> Matrix4D {
        let (s, c) = r.sin_cos();
        [
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
            -s,  0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ].into()
    }

    /// Instantiates a rotation about the Z axis by `r` radians.
    pub fn rotation_z(r: f64) -> Matrix4D {
        let (s, c) = r.sin_cos();
        [
            c,   -s,  0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ].into()
    }

    /// Instantiates a rotation of `angle` radians about an arbitrary axis.
    ///
    /// Built with Rodrigues' rotation formula. The axis is normalized first;
    /// a zero-length axis produces a matrix full of NaNs.
    ///
    /// For the coordinate axes this agrees with `rotation_x`, `rotation_y`
    /// and `rotation_z`:
    ///
    /// ```
    /// # use ray_caster::tuple::Tuple4D;
    /// # use ray_caster::matrix::Matrix4D;
    /// let angle = std::f64::consts::PI / 3.0;
    /// let axis = Tuple4D::vector(0.0, 1.0, 0.0);
    /// assert_eq!(Matrix4D::rotation(axis, angle), Matrix4D::rotation_y(angle));
    /// ```
    pub fn rotation(axis: Tuple4D, angle: f64) -> Matrix4D {
        let axis = axis.normalize();
        let (x, y, z) = (axis.x, axis.y, axis.z);

        let c = angle.cos();
        let s = angle.sin();
        let ic = 1.0 - c;

        [
            x * x + (1.0 - x * x) * c, ic * x * y - z * s, ic * x * z + y * s, 0.0,
            ic * x * y + z * s, y * y + (1.0 - y * y) * c, ic * y * z - x * s, 0.0,
            ic * x * z - y * s, ic * y * z + x * s, z * z + (1.0 - z * z) * c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ].into()
    }

    /// Instantiates a 4x4 shearing matrix.
    ///
    /// Each parameter moves one coordinate in proportion to another: `xy`
    /// moves `x` in proportion to `y`, `zx` moves `z` in proportion to `x`,
    /// and so on.
    ///
    /// ```
    /// # use ray_caster::tuple::Tuple4D;
    /// # use ray_caster::matrix::Matrix4D;
    /// let point = Tuple4D::point(2.0, 3.0, 4.0);
    /// let m = Matrix4D::shearing(1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    /// assert_eq!(m * point, Tuple4D::point(5.0, 3.0, 4.0));
    /// ```
    pub fn shearing(xy: f64, xz: f64, yx: f64, yz: f64, zx: f64, zy: f64)
        -> Matrix4D {
        [
            1.0, xy,  xz,  0.0,
            yx,  1.0, yz,  0.0,
            zx,  zy,  1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ].into()
    }

    /// Generates a view transformation.
    ///
    /// The `from` parameter is where the eye is, the `to` parameter is where
    /// the eye is looking, and the `up` parameter roughly indicates which way
    /// is up. The default orientation (identity) has the eye at the origin
    /// looking down `-z` with `+y` up.
    ///
    /// The view transformation moves the *world* relative to the eye, not the
    /// other way around. If `up` is parallel to the viewing direction the
    /// basis is degenerate and the result is meaningless; this is not checked.
    pub fn view_transform(from: Tuple4D, to: Tuple4D, up: Tuple4D) -> Matrix4D {
        let forward = (to - from).normalize();
        let left = forward.cross(&up.normalize());
        let true_up = left.cross(&forward);

        let orientation: Matrix4D = [
             left.x,     left.y,     left.z,    0.0,
             true_up.x,  true_up.y,  true_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
             0.0,        0.0,        0.0,       1.0,
        ].into();

        orientation * Matrix4D::translation(-from.x, -from.y, -from.z)
    }
}

#[cfg(test)]
use std::f64::consts::PI;

#[test]
fn translation() {
    let transform = Matrix4D::translation(5.0, -3.0, 2.0);
    let point = Tuple4D::point(-3.0, 4.0, 5.0);

    assert_eq!(transform * point, Tuple4D::point(2.0, 1.0, 7.0));
}

#[test]
fn translation_inverse() {
    let transform = Matrix4D::translation(5.0, -3.0, 2.0).inverse().unwrap();
    let point = Tuple4D::point(-3.0, 4.0, 5.0);

    assert_eq!(transform, Matrix4D::translation(-5.0, 3.0, -2.0));
    assert_eq!(transform * point, Tuple4D::point(-8.0, 7.0, 3.0));
}

#[test]
fn translation_ignores_vectors() {
    let transform = Matrix4D::translation(5.0, -3.0, 2.0);
    let vector = Tuple4D::vector(-3.0, 4.0, 5.0);

    assert_eq!(transform * vector, vector);
}

#[test]
fn scaling() {
    let transform = Matrix4D::scaling(2.0, 3.0, 4.0);
    let vector = Tuple4D::vector(-4.0, 6.0, 8.0);

    assert_eq!(transform * vector, Tuple4D::vector(-8.0, 18.0, 32.0));

    let inv = transform.inverse().unwrap();
    assert_eq!(inv * vector, Tuple4D::vector(-2.0, 2.0, 2.0));
}

#[test]
fn scaling_reflection() {
    let transform = Matrix4D::scaling(-1.0, 1.0, 1.0);
    let point = Tuple4D::point(2.0, 3.0, 4.0);

    assert_eq!(transform * point, Tuple4D::point(-2.0, 3.0, 4.0));
}

#[test]
fn rotate_x() {
    let half_quarter = Matrix4D::rotation_x(PI / 4.0);
    let full_quarter = Matrix4D::rotation_x(PI / 2.0);
    let point = Tuple4D::point(0.0, 1.0, 0.0);

    assert_eq!(full_quarter * point,
        Tuple4D::point(0.0, 0.0, 1.0));
    assert_eq!(half_quarter * point,
        Tuple4D::point(0.0, 2.0f64.sqrt() / 2.0, 2.0f64.sqrt() / 2.0));
}

#[test]
fn rotate_y() {
    let half_quarter = Matrix4D::rotation_y(PI / 4.0);
    let full_quarter = Matrix4D::rotation_y(PI / 2.0);
    let point = Tuple4D::point(0.0, 0.0, 1.0);

    assert_eq!(full_quarter * point,
        Tuple4D::point(1.0, 0.0, 0.0));
    assert_eq!(half_quarter * point,
        Tuple4D::point(2.0f64.sqrt() / 2.0, 0.0, 2.0f64.sqrt() / 2.0));
}

#[test]
fn rotate_z() {
    let half_quarter = Matrix4D::rotation_z(PI / 4.0);
    let full_quarter = Matrix4D::rotation_z(PI / 2.0);
    let point = Tuple4D::point(0.0, 1.0, 0.0);

    assert_eq!(full_quarter * point,
        Tuple4D::point(-1.0, 0.0, 0.0));
    assert_eq!(half_quarter * point,
        Tuple4D::point(-2.0f64.sqrt() / 2.0, 2.0f64.sqrt() / 2.0, 0.0));
}

#[test]
fn rotate_about_coordinate_axes() {
    let angle = 0.7;

    assert_eq!(Matrix4D::rotation(Tuple4D::vector(1.0, 0.0, 0.0), angle),
        Matrix4D::rotation_x(angle));
    assert_eq!(Matrix4D::rotation(Tuple4D::vector(0.0, 2.0, 0.0), angle),
        Matrix4D::rotation_y(angle));
    assert_eq!(Matrix4D::rotation(Tuple4D::vector(0.0, 0.0, 1.0), angle),
        Matrix4D::rotation_z(angle));
}

#[test]
fn rotate_about_diagonal_axis() {
    // A third of a turn about (1,1,1) cycles the coordinate axes.
    let m = Matrix4D::rotation(Tuple4D::vector(1.0, 1.0, 1.0), 2.0 * PI / 3.0);

    assert_eq!(m * Tuple4D::point(1.0, 0.0, 0.0), Tuple4D::point(0.0, 1.0, 0.0));
    assert_eq!(m * Tuple4D::point(0.0, 1.0, 0.0), Tuple4D::point(0.0, 0.0, 1.0));
}

#[test]
fn shear_each_axis() {
    let point = Tuple4D::point(2.0, 3.0, 4.0);

    assert_eq!(Matrix4D::shearing(0.0, 1.0, 0.0, 0.0, 0.0, 0.0) * point,
        Tuple4D::point(6.0, 3.0, 4.0));
    assert_eq!(Matrix4D::shearing(0.0, 0.0, 1.0, 0.0, 0.0, 0.0) * point,
        Tuple4D::point(2.0, 5.0, 4.0));
    assert_eq!(Matrix4D::shearing(0.0, 0.0, 0.0, 1.0, 0.0, 0.0) * point,
        Tuple4D::point(2.0, 7.0, 4.0));
    assert_eq!(Matrix4D::shearing(0.0, 0.0, 0.0, 0.0, 1.0, 0.0) * point,
        Tuple4D::point(2.0, 3.0, 6.0));
    assert_eq!(Matrix4D::shearing(0.0, 0.0, 0.0, 0.0, 0.0, 1.0) * point,
        Tuple4D::point(2.0, 3.0, 7.0));
}

#[test]
fn chained_transforms() {
    let a = Matrix4D::rotation_x(PI / 2.0);
    let b = Matrix4D::scaling(5.0, 5.0, 5.0);
    let c = Matrix4D::translation(10.0, 5.0, 7.0);

    let t = c * b * a;
    let p = Tuple4D::point(1.0, 0.0, 1.0);

    assert_eq!(t * p, Tuple4D::point(15.0, 0.0, 7.0));
}

#[test]
fn default_view() {
    let from = Tuple4D::point(0.0, 0.0, 0.0);
    let to = Tuple4D::point(0.0, 0.0, -1.0);
    let up = Tuple4D::vector(0.0, 1.0, 0.0);

    assert_eq!(Matrix4D::identity(), Matrix4D::view_transform(from, to, up));
}

#[test]
fn positive_z_view() {
    let from = Tuple4D::point(0.0, 0.0, 0.0);
    let to = Tuple4D::point(0.0, 0.0, 1.0);
    let up = Tuple4D::vector(0.0, 1.0, 0.0);

    assert_eq!(Matrix4D::view_transform(from, to, up),
        Matrix4D::scaling(-1.0, 1.0, -1.0));
}

#[test]
fn view_moves_world() {
    let from = Tuple4D::point(0.0, 0.0, 8.0);
    let to = Tuple4D::point(0.0, 0.0, 0.0);
    let up = Tuple4D::vector(0.0, 1.0, 0.0);

    assert_eq!(Matrix4D::view_transform(from, to, up),
        Matrix4D::translation(0.0, 0.0, -8.0));
}

#[test]
fn arbitrary_view() {
    let from = Tuple4D::point(1.0, 3.0, 2.0);
    let to = Tuple4D::point(4.0, -2.0, 8.0);
    let up = Tuple4D::vector(1.0, 1.0, 0.0);

    let a: Matrix4D = [ -0.50709, 0.50709,  0.67612, -2.36643,
                         0.76772, 0.60609,  0.12122, -2.82843,
                        -0.35857, 0.59761, -0.71714,  0.00000,
                         0.00000, 0.00000,  0.00000,  1.00000, ].into();

    assert_eq!(Matrix4D::view_transform(from, to, up), a);
}
