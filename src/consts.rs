// Runtime defaults
pub const DEFAULT_NUM_THREADS: usize = 1;
pub const DEFAULT_CANVAS_WIDTH: usize = 640;
pub const DEFAULT_CANVAS_HEIGHT: usize = 480;
pub const DEFAULT_OUT_FILE: &str = "out.ppm";

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Offset along the normal for shadow ray origins ("shadow acne")
pub const SHADOW_BIAS: f64 = 0.0001;

// Rays with a smaller local Y direction are treated as parallel to a plane
pub const PLANE_PARALLEL_EPSILON: f64 = 0.0001;

// Color returned by the lighting model for a shadowed point, independent of
// the material and light.
pub const SHADOWED_COLOR: (f64, f64, f64) = (0.1, 0.1, 0.1);
