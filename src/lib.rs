pub mod consts;
pub mod error;

pub mod tuple;
pub mod matrix;
pub mod transform;
pub mod ray;

pub mod shape;
pub mod intersect;
pub mod light;
pub mod world;
pub mod camera;

pub mod color;
pub mod canvas;

pub mod parallel;
pub mod scene;

use consts::FEQ_EPSILON;

/// Approximate equality for floats, used by every `PartialEq` on geometry.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
