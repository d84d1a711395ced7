use crate::consts::PLANE_PARALLEL_EPSILON;
use crate::tuple::Tuple4D;
use crate::ray::Ray4D;
use crate::light::Material;
use crate::matrix::Matrix4D;
use crate::intersect::{ Intersection, Intersections };

/// The primitive a `Shape` is made of.
///
/// Every variant is defined in its own object space; the owning `Shape`
/// carries the transform that places it in the world.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ShapeType {
    /// A unit sphere with its center at the object-space origin.
    Sphere,

    /// The object-space XZ plane (`y == 0`), facing up along +Y.
    Plane,
}

/// A primitive with a transform and a material.
///
/// The inverse of `transform` is cached whenever the transform is set. If the
/// transform is singular there is no inverse; such a shape reports no
/// intersections and no normals, so it never appears in a render.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub ty: ShapeType,
    pub material: Material,

    transform: Matrix4D,
    inverse_transform: Option<Matrix4D>,
}

impl Shape {
    fn with_type(ty: ShapeType) -> Shape {
        Shape {
            ty,
            material: Default::default(),
            transform: Matrix4D::identity(),
            inverse_transform: Some(Matrix4D::identity()),
        }
    }

    /// Creates a unit sphere with identity transform and default material.
    pub fn sphere() -> Shape {
        Self::with_type(ShapeType::Sphere)
    }

    /// Creates a plane with a normal pointing up along the Y axis.
    pub fn plane() -> Shape {
        Self::with_type(ShapeType::Plane)
    }

    /// Builder-style transform assignment.
    ///
    /// ```
    /// # use ray_caster::shape::Shape;
    /// # use ray_caster::matrix::Matrix4D;
    /// let s = Shape::sphere().with_transform(Matrix4D::scaling(2.0, 2.0, 2.0));
    /// assert!(s.inverse_transform().is_some());
    /// ```
    pub fn with_transform(mut self, transform: Matrix4D) -> Shape {
        self.set_transform(transform);
        self
    }

    /// Builder-style material assignment.
    pub fn with_material(mut self, material: Material) -> Shape {
        self.material = material;
        self
    }

    /// Returns a reference to the object-to-world transform.
    pub fn transform(&self) -> &Matrix4D {
        &self.transform
    }

    /// Sets the transform, recomputing the cached inverse.
    pub fn set_transform(&mut self, transform: Matrix4D) {
        self.transform = transform;
        self.inverse_transform = transform.inverse();
    }

    /// The cached world-to-object transform, or `None` if singular.
    pub fn inverse_transform(&self) -> Option<&Matrix4D> {
        self.inverse_transform.as_ref()
    }

    /// Returns a reference to this Shape's material.
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Returns a mutable reference to this Shape's material.
    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    /// Intersects a world-space ray with this shape.
    ///
    /// The ray is moved into object space with the cached inverse transform,
    /// then handed to the primitive. Returns `None` when the transform is
    /// singular; a ray that simply misses yields an empty `Intersections`.
    pub fn intersect(&self, ray: &Ray4D) -> Option<Intersections<'_>> {
        let inv = self.inverse_transform.as_ref()?;
        let local_ray = ray.transform(inv);

        let intersections = self.local_intersect(&local_ray)
            .into_iter()
            .map(|t| Intersection::new(t, self))
            .collect();

        Some(Intersections { intersections })
    }

    /// Computes the world-space surface normal at a world-space point.
    ///
    /// The object-space normal is carried back to world space by the
    /// transpose of the inverse transform, which keeps it perpendicular to the
    /// surface under non-uniform scaling. The result is a unit vector, or
    /// `None` when the transform is singular.
    pub fn normal_at(&self, world_point: Tuple4D) -> Option<Tuple4D> {
        let inv = self.inverse_transform.as_ref()?;

        let local_point = *inv * world_point;
        let local_normal = self.local_normal_at(&local_point);

        let mut world_normal = inv.transposition() * local_normal;
        world_normal.w = 0.0;

        Some(world_normal.normalize())
    }

    /// Intersects an object-space ray with the primitive.
    ///
    /// Returns the ray parameters `t` of every crossing, in ascending order.
    pub fn local_intersect(&self, ray: &Ray4D) -> Vec<f64> {
        match self.ty {
            ShapeType::Sphere => Self::intersect_sphere(ray),
            ShapeType::Plane => Self::intersect_plane(ray),
        }
    }

    /// Obtains the object-space normal of the primitive at `at`.
    pub fn local_normal_at(&self, at: &Tuple4D) -> Tuple4D {
        match self.ty {
            ShapeType::Sphere => Self::normal_at_sphere(at),
            ShapeType::Plane => Self::normal_at_plane(at),
        }
    }

    /// Checks whether a ray intersects the unit sphere.
    ///
    /// Solves `a*t^2 + b*t + c = 0` for the ray against the sphere. A negative
    /// discriminant means a miss. Otherwise both roots are reported, smaller
    /// first; a tangent ray yields two equal roots.
    fn intersect_sphere(ray: &Ray4D) -> Vec<f64> {
        // Subtracting a point removes the 'w' part of the ray origin.
        let sphere_to_ray = ray.origin - Tuple4D::origin();

        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * ray.direction.dot(&sphere_to_ray);
        let c = sphere_to_ray.dot(&sphere_to_ray) - 1.0;

        let discriminant = b.powi(2) - (4.0 * a * c);

        if discriminant < 0.0 {
            return Vec::new();
        }

        let t1 = (-b - discriminant.sqrt()) / (2.0 * a);
        let t2 = (-b + discriminant.sqrt()) / (2.0 * a);

        vec![t1, t2]
    }

    /// The normal of a unit sphere is the vector from its center to `at`.
    fn normal_at_sphere(at: &Tuple4D) -> Tuple4D {
        *at - Tuple4D::origin()
    }

    /// Intersects a ray with the plane `y == 0`.
    ///
    /// Rays (nearly) parallel to the plane never hit it, including rays lying
    /// in the plane.
    fn intersect_plane(ray: &Ray4D) -> Vec<f64> {
        if ray.direction.y.abs() < PLANE_PARALLEL_EPSILON {
            return Vec::new();
        }

        vec![-ray.origin.y / ray.direction.y]
    }

    /// A plane has the same normal vector at all points across itself.
    fn normal_at_plane(_at: &Tuple4D) -> Tuple4D {
        Tuple4D::vector(0.0, 1.0, 0.0)
    }
}

#[cfg(test)]
fn ts(is: &Intersections<'_>) -> Vec<f64> {
    is.intersections.iter().map(|i| i.t).collect()
}

#[test]
fn default_transform_is_identity() {
    let s = Shape::sphere();

    assert_eq!(*s.transform(), Matrix4D::identity());
    assert_eq!(s.inverse_transform(), Some(&Matrix4D::identity()));
}

#[test]
fn set_transform_caches_inverse() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::translation(2.0, 3.0, 4.0));

    assert_eq!(s.inverse_transform(),
        Some(&Matrix4D::translation(-2.0, -3.0, -4.0)));

    s.set_transform(Matrix4D::scaling(0.0, 1.0, 1.0));
    assert_eq!(s.inverse_transform(), None);
}

#[test]
fn ray_pierces_sphere() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0),
                       Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere();
    let xs = s.intersect(&r).unwrap();

    assert_eq!(ts(&xs), vec![4.0, 6.0]);
    assert!(std::ptr::eq(xs.intersections[0].what, &s));
    assert!(std::ptr::eq(xs.intersections[1].what, &s));
}

#[test]
fn ray_is_tangent_to_sphere() {
    let r = Ray4D::new(Tuple4D::point(0.0, 1.0, -5.0),
                       Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere();
    let xs = s.intersect(&r).unwrap();

    assert_eq!(ts(&xs), vec![5.0, 5.0]);
}

#[test]
fn ray_misses_sphere() {
    let r = Ray4D::new(Tuple4D::point(0.0, 2.0, -5.0),
                       Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere();
    let xs = s.intersect(&r).unwrap();

    assert!(xs.intersections.is_empty());
}

#[test]
fn ray_is_inside_sphere() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, 0.0),
                       Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere();
    let xs = s.intersect(&r).unwrap();

    assert_eq!(ts(&xs), vec![-1.0, 1.0]);
}

#[test]
fn sphere_is_behind_ray() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0),
                       Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere();
    let xs = s.intersect(&r).unwrap();

    assert_eq!(ts(&xs), vec![-6.0, -4.0]);
}

#[test]
fn ray_hits_scaled_sphere() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0),
                       Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere().with_transform(Matrix4D::scaling(2.0, 2.0, 2.0));

    assert_eq!(ts(&s.intersect(&r).unwrap()), vec![3.0, 7.0]);
}

#[test]
fn ray_misses_translated_sphere() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0),
                       Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere().with_transform(Matrix4D::translation(5.0, 0.0, 0.0));

    assert!(s.intersect(&r).unwrap().intersections.is_empty());
}

#[test]
fn singular_shape_is_invisible() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0),
                       Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere().with_transform(Matrix4D::scaling(1.0, 0.0, 1.0));

    assert!(s.intersect(&r).is_none());
    assert!(s.normal_at(Tuple4D::point(0.0, 0.0, -1.0)).is_none());
}

#[test]
fn normal_on_sphere_axes() {
    let s = Shape::sphere();

    assert_eq!(s.normal_at(Tuple4D::point(1.0, 0.0, 0.0)),
        Some(Tuple4D::vector(1.0, 0.0, 0.0)));
    assert_eq!(s.normal_at(Tuple4D::point(0.0, 1.0, 0.0)),
        Some(Tuple4D::vector(0.0, 1.0, 0.0)));
    assert_eq!(s.normal_at(Tuple4D::point(0.0, 0.0, 1.0)),
        Some(Tuple4D::vector(0.0, 0.0, 1.0)));
}

#[test]
fn normal_on_sphere_nonaxial() {
    let k = 3.0f64.sqrt() / 3.0;
    let n = Shape::sphere().normal_at(Tuple4D::point(k, k, k)).unwrap();

    assert_eq!(n, Tuple4D::vector(k, k, k));
    assert_eq!(n, n.normalize());
}

#[test]
fn normal_on_translated_sphere() {
    let s = Shape::sphere().with_transform(Matrix4D::translation(0.0, 1.0, 0.0));
    let n = s.normal_at(Tuple4D::point(0.0, 1.70711, -0.70711));

    assert_eq!(n, Some(Tuple4D::vector(0.0, 0.70711, -0.70711)));
}

#[test]
fn normal_on_transformed_sphere() {
    let s = Shape::sphere().with_transform(
        Matrix4D::scaling(1.0, 0.5, 1.0)
            * Matrix4D::rotation_z(std::f64::consts::PI / 5.0));
    let n = s.normal_at(
        Tuple4D::point(0.0, 2.0f64.sqrt() / 2.0, -(2.0f64.sqrt() / 2.0))
    );

    assert_eq!(n, Some(Tuple4D::vector(0.0, 0.97014, -0.24254)));
}

#[test]
fn normal_on_plane_is_constant() {
    let p = Shape::plane();

    for at in &[Tuple4D::point(0.0, 0.0, 0.0),
                Tuple4D::point(10.0, 0.0, -10.0),
                Tuple4D::point(-5.0, 0.0, 150.0)] {
        assert_eq!(p.local_normal_at(at), Tuple4D::vector(0.0, 1.0, 0.0));
        assert_eq!(p.normal_at(*at), Some(Tuple4D::vector(0.0, 1.0, 0.0)));
    }
}

#[test]
fn ray_parallel_to_plane() {
    let p = Shape::plane();
    let above = Ray4D::new(Tuple4D::point(0.0, 10.0, 0.0),
                           Tuple4D::vector(0.0, 0.0, 1.0));
    let coplanar = Ray4D::new(Tuple4D::point(0.0, 0.0, 0.0),
                              Tuple4D::vector(0.0, 0.0, 1.0));

    assert!(p.local_intersect(&above).is_empty());
    assert!(p.local_intersect(&coplanar).is_empty());
}

#[test]
fn ray_intersecting_plane_from_above_and_below() {
    let p = Shape::plane();
    let above = Ray4D::new(Tuple4D::point(0.0, 1.0, 0.0),
                           Tuple4D::vector(0.0, -1.0, 0.0));
    let below = Ray4D::new(Tuple4D::point(0.0, -1.0, 0.0),
                           Tuple4D::vector(0.0, 1.0, 0.0));

    assert_eq!(p.local_intersect(&above), vec![1.0]);
    assert_eq!(p.local_intersect(&below), vec![1.0]);
}

#[test]
fn transformed_plane() {
    // A plane stood upright, facing -z, one unit in front of the origin.
    let p = Shape::plane().with_transform(
        Matrix4D::translation(0.0, 0.0, 1.0)
            * Matrix4D::rotation_x(-std::f64::consts::PI / 2.0));
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -2.0),
                       Tuple4D::vector(0.0, 0.0, 1.0));

    let xs = p.intersect(&r).unwrap();
    assert_eq!(xs.len(), 1);
    assert!(crate::feq(xs.intersections[0].t, 3.0));
    assert_eq!(p.normal_at(Tuple4D::point(0.0, 0.0, 1.0)),
        Some(Tuple4D::vector(0.0, 0.0, -1.0)));
}
