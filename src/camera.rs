use crate::ray::Ray4D;
use crate::tuple::Tuple4D;
use crate::matrix::Matrix4D;
use crate::color::Color;
use crate::world::World;
use crate::canvas::Canvas;

/// A camera record for generating a canvas.
///
/// This record gives a "frame" of the world. Based on camera parameters,
/// different perspectives can be produced. The canvas sits one unit in front
/// of the eye, at z = -1 in camera space.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// The horizontal size of the resultant canvas.
    pub hsize: usize,

    /// The vertical size of the resultant canvas.
    pub vsize: usize,

    pub half_width: f64,
    pub half_height: f64,
    pub pixel_size: f64,

    /// The angle describing "how much" the camera can see.
    pub field_of_view: f64,

    /// A matrix describing how the world should be oriented relative to the
    /// camera (typically a view transformation).
    transform: Matrix4D,

    /// Cached inverse of `transform`; `None` when it is singular.
    inverse_transform: Option<Matrix4D>,
}

impl Camera {
    /// Creates a camera.
    ///
    /// The pixel size is derived from the field of view along the longer of
    /// the two canvas sides.
    ///
    /// ```
    /// # use ray_caster::camera::Camera;
    /// # use ray_caster::matrix::Matrix4D;
    /// let c = Camera::new(200, 125, std::f64::consts::PI / 2.0,
    ///     Matrix4D::identity());
    /// assert!((c.pixel_size - 0.01).abs() < 0.0001);
    /// ```
    pub fn new(hsize: usize, vsize: usize, field_of_view: f64,
        transform: Matrix4D) -> Camera {
        let half_view = (field_of_view / 2.0).tan();
        let aspect = (hsize as f64) / (vsize as f64);

        let half_width: f64;
        let half_height: f64;

        if aspect >= 1.0 {
            half_width = half_view;
            half_height = half_view / aspect;
        } else {
            half_width = half_view * aspect;
            half_height = half_view;
        }

        let pixel_size = half_width * 2.0 / (hsize as f64);
        Camera {
            hsize,
            vsize,
            half_width,
            half_height,
            pixel_size,
            field_of_view,
            inverse_transform: transform.inverse(),
            transform,
        }
    }

    pub fn transform(&self) -> &Matrix4D {
        &self.transform
    }

    /// Replaces the view transformation, recomputing its inverse.
    pub fn set_transform(&mut self, transform: Matrix4D) {
        self.inverse_transform = transform.inverse();
        self.transform = transform;
    }

    pub fn inverse_transform(&self) -> Option<&Matrix4D> {
        self.inverse_transform.as_ref()
    }

    /// Builds the world-space ray passing through the center of a pixel.
    ///
    /// Returns `None` if the camera transform cannot be inverted.
    pub fn ray_for_pixel(&self, px: usize, py: usize) -> Option<Ray4D> {
        let tr_inv = self.inverse_transform.as_ref()?;

        // Offsets from the edge of the canvas to the pixel's center
        let xoffset = (px as f64 + 0.5) * self.pixel_size;
        let yoffset = (py as f64 + 0.5) * self.pixel_size;

        // The untransformed coordinates of the pixel in camera space
        let world_x = self.half_width - xoffset;
        let world_y = self.half_height - yoffset;

        // Using the camera matrix, transform the canvas point and origin,
        // computing the ray's direction vector
        let pixel = *tr_inv * Tuple4D::point(world_x, world_y, -1.0);
        let origin = *tr_inv * Tuple4D::origin();
        let direction = (pixel - origin).normalize();

        Some(Ray4D::new(origin, direction))
    }

    /// Computes the colors of a single row of the canvas, left to right.
    ///
    /// Pixels without a ray are black.
    pub fn render_row(&self, w: &World, y: usize) -> Vec<Color> {
        (0..self.hsize)
            .map(|x| match self.ray_for_pixel(x, y) {
                Some(ray) => w.color_at(&ray),
                None => Color::black(),
            })
            .collect()
    }

    /// Renders a world onto a new canvas, one pixel at a time.
    pub fn render(&self, w: &World) -> Canvas {
        let mut image = Canvas::new(self.hsize, self.vsize);

        for y in 0..self.vsize {
            for (x, color) in self.render_row(w, y).iter().enumerate() {
                image.write_pixel(x, y, color);
            }
        }

        image
    }
}

#[test]
fn construct_camera() {
    let c = Camera::new(160, 120, std::f64::consts::PI / 2.0,
        Matrix4D::identity());

    assert_eq!(c.hsize, 160);
    assert_eq!(c.vsize, 120);
    assert_eq!(*c.transform(), Matrix4D::identity());
    assert_eq!(c.inverse_transform(), Some(&Matrix4D::identity()));
}

#[test]
fn pixel_size_horizontal_canvas() {
    let c = Camera::new(200, 125, std::f64::consts::PI / 2.0,
        Matrix4D::identity());

    assert!(crate::feq(c.pixel_size, 0.01));
}

#[test]
fn pixel_size_vertical_canvas() {
    let c = Camera::new(125, 200, std::f64::consts::PI / 2.0,
        Matrix4D::identity());

    assert!(crate::feq(c.pixel_size, 0.01));
}

#[test]
fn ray_through_center() {
    let c = Camera::new(201, 101, std::f64::consts::PI / 2.0,
        Matrix4D::identity());
    let r = c.ray_for_pixel(100, 50).unwrap();

    assert_eq!(r.origin, Tuple4D::point(0.0, 0.0, 0.0));
    assert_eq!(r.direction, Tuple4D::vector(0.0, 0.0, -1.0));
}

#[test]
fn ray_through_corner() {
    let c = Camera::new(201, 101, std::f64::consts::PI / 2.0,
        Matrix4D::identity());
    let r = c.ray_for_pixel(0, 0).unwrap();

    assert_eq!(r.origin, Tuple4D::point(0.0, 0.0, 0.0));
    assert_eq!(r.direction, Tuple4D::vector(0.66519, 0.33259, -0.66851));
}

#[test]
fn ray_when_camera_transformed() {
    let c = Camera::new(201, 101, std::f64::consts::PI / 2.0,
        Matrix4D::rotation_y(std::f64::consts::PI / 4.0)
            * Matrix4D::translation(0.0, -2.0, 5.0));
    let r = c.ray_for_pixel(100, 50).unwrap();

    assert_eq!(r.origin, Tuple4D::point(0.0, 2.0, -5.0));
    assert_eq!(r.direction,
        Tuple4D::vector(2.0f64.sqrt() / 2.0, 0.0, -(2.0f64.sqrt() / 2.0)));
}

#[test]
fn ray_with_singular_camera() {
    let c = Camera::new(11, 11, std::f64::consts::PI / 2.0,
        Matrix4D::zero());

    assert!(c.inverse_transform().is_none());
    assert!(c.ray_for_pixel(5, 5).is_none());
}

#[test]
fn render_world_with_camera() {
    let w: World = Default::default();
    let mut c = Camera::new(11, 11, std::f64::consts::PI / 2.0,
        Matrix4D::identity());

    let from = Tuple4D::point(0.0, 0.0, -5.0);
    let to = Tuple4D::point(0.0, 0.0, 0.0);
    let up = Tuple4D::vector(0.0, 1.0, 0.0);

    c.set_transform(Matrix4D::view_transform(from, to, up));

    let image = c.render(&w);
    assert_eq!(image.read_pixel(5, 5).unwrap(),
        Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn render_with_singular_camera_is_black() {
    let w: World = Default::default();
    let c = Camera::new(4, 3, std::f64::consts::PI / 2.0,
        Matrix4D::scaling(1.0, 1.0, 0.0));

    let image = c.render(&w);
    assert_eq!(image.pixels().len(), 12);
    assert!(image.pixels().iter().all(|p| *p == Color::black()));
}
