use crate::ray::Ray4D;
use crate::tuple::Tuple4D;
use crate::color::Color;
use crate::matrix::Matrix4D;
use crate::shape::Shape;
use crate::light::{ PointLight, Material };
use crate::intersect::{ Intersections, IntersectionComputation };

/// A world with objects and lights.
///
/// Worlds collect all objects as well as lights for rendering. Most logic is
/// performed within worlds for the ray caster. Lights and objects keep the
/// order they were added in; lighting contributions are summed in that
/// order.
#[derive(Clone, Debug)]
pub struct World {
    pub lights: Vec<PointLight>,
    pub objects: Vec<Shape>,
}

/// The default world: one white light at (-10, 10, -10) and two concentric
/// spheres, the inner one scaled by half.
impl Default for World {
    fn default() -> World {
        let light = PointLight::new(
            Tuple4D::point(-10.0, 10.0, -10.0),
            Color::rgb(1.0, 1.0, 1.0),
        );

        let s1 = Shape::sphere().with_material(Material {
            color: Color::rgb(0.8, 1.0, 0.6),
            diffuse: 0.7,
            specular: 0.2,
            ..Default::default()
        });

        let s2 = Shape::sphere()
            .with_transform(Matrix4D::scaling(0.5, 0.5, 0.5));

        World {
            lights: vec![light],
            objects: vec![s1, s2],
        }
    }
}

impl World {
    /// Creates a default world with two spheres.
    pub fn new() -> World {
        Default::default()
    }

    /// Creates an empty world with no objects and no lights.
    pub fn empty() -> World {
        World { lights: Vec::new(), objects: Vec::new() }
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn add_object(&mut self, object: Shape) {
        self.objects.push(object);
    }

    /// Intersects a ray against all objects in a world.
    ///
    /// Objects with a singular transform are skipped. The result is sorted
    /// by ascending `t` and borrows from this world's objects.
    pub fn intersect(&self, r: &Ray4D) -> Intersections<'_> {
        let mut intersections = Intersections::new();
        for obj in self.objects.iter() {
            if let Some(mut is) = obj.intersect(r) {
                intersections.intersections.append(&mut is.intersections);
            }
        }

        intersections.sort();
        intersections
    }

    /// Determines whether `point` is hidden from `light` by some object.
    ///
    /// The point is occluded when the nearest hit along the ray towards the
    /// light lies strictly closer than the light itself.
    pub fn is_shadowed(&self, light: &PointLight, point: Tuple4D) -> bool {
        let v = light.position - point;
        let distance = v.magnitude();
        let direction = v.normalize();

        let r = Ray4D::new(point, direction);
        match self.intersect(&r).hit() {
            Some(i) => i.t < distance,
            None => false,
        }
    }

    /// Calculates the color for a hit, based on shadows and light.
    ///
    /// Sums the lighting of every light source. Returns black if the hit has
    /// no usable normal.
    pub fn shade_hit(&self, comps: &IntersectionComputation<'_>) -> Color {
        let (normalv, over_point) = match (comps.normalv, comps.over_point) {
            (Some(n), Some(p)) => (n, p),
            _ => return Color::black(),
        };

        let material = comps.obj.material();
        self.lights.iter().fold(Color::black(), |acc, light| {
            let shadowed = self.is_shadowed(light, over_point);
            acc + material.lighting(
                light, comps.point, comps.eyev, normalv, shadowed
            )
        })
    }

    /// Determines a color based on the intersection of a ray and the objects.
    pub fn color_at(&self, r: &Ray4D) -> Color {
        // If at least one object is hit, return the color, else return black
        match self.intersect(r).hit() {
            None => Color::black(),
            Some(i) => self.shade_hit(&i.precompute(r)),
        }
    }
}

#[cfg(test)]
use crate::intersect::Intersection;

#[test]
fn empty_world() {
    let w = World::empty();

    assert!(w.lights.is_empty());
    assert!(w.objects.is_empty());
}

#[test]
fn default_world() {
    let w = World::new();

    assert_eq!(w.lights, vec![PointLight::new(
        Tuple4D::point(-10.0, 10.0, -10.0),
        Color::white(),
    )]);
    assert_eq!(w.objects.len(), 2);
    assert_eq!(w.objects[0].material().color, Color::rgb(0.8, 1.0, 0.6));
    assert_eq!(*w.objects[1].transform(), Matrix4D::scaling(0.5, 0.5, 0.5));
}

#[test]
fn intersect_default_world_with_ray() {
    let w: World = Default::default();
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0),
    );

    let is: Intersections = w.intersect(&r);

    assert_eq!(is.intersections.len(), 4);
    assert_eq!(is.intersections[0].t, 4.0);
    assert_eq!(is.intersections[1].t, 4.5);
    assert_eq!(is.intersections[2].t, 5.5);
    assert_eq!(is.intersections[3].t, 6.0);
}

#[test]
fn intersect_skips_singular_objects() {
    let mut w: World = Default::default();
    w.add_object(
        Shape::sphere().with_transform(Matrix4D::scaling(0.0, 1.0, 1.0))
    );

    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0),
    );

    assert_eq!(w.intersect(&r).len(), 4);
}

#[test]
fn shade_intersection_from_outside() {
    let w: World = Default::default();
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );

    let i = Intersection::new(4.0, &w.objects[0]);

    let comps = IntersectionComputation::new(&r, &i);
    let c = w.shade_hit(&comps);

    assert_eq!(c, Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn shade_intersection_from_inside() {
    let mut w: World = Default::default();
    w.lights = vec![PointLight::new(
        Tuple4D::point(0.0, 0.25, 0.0),
        Color::rgb(1.0, 1.0, 1.0),
    )];

    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 0.0, 1.0),
    );

    let i = Intersection::new(0.5, &w.objects[1]);

    let comps = IntersectionComputation::new(&r, &i);
    let c = w.shade_hit(&comps);

    assert_eq!(c, Color::rgb(0.90498, 0.90498, 0.90498));
}

#[test]
fn shade_intersection_in_shadow() {
    let mut w: World = World::empty();
    w.add_light(PointLight::new(
        Tuple4D::point(0.0, 0.0, -10.0),
        Color::rgb(1.0, 1.0, 1.0),
    ));

    w.add_object(Shape::sphere());
    w.add_object(
        Shape::sphere().with_transform(Matrix4D::translation(0.0, 0.0, 10.0))
    );

    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::vector(0.0, 0.0, 1.0),
    );

    let i = Intersection::new(4.0, &w.objects[1]);
    let comps = IntersectionComputation::new(&r, &i);
    let c = w.shade_hit(&comps);

    assert_eq!(c, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn shade_hit_sums_lights() {
    let mut w: World = Default::default();
    let light = w.lights[0];
    w.add_light(light);

    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );

    let comps = Intersection::new(4.0, &w.objects[0]).precompute(&r);
    let c = w.shade_hit(&comps);

    assert_eq!(c, Color::rgb(0.76132, 0.95166, 0.571));
}

#[test]
fn shade_hit_without_lights_is_black() {
    let mut w: World = Default::default();
    w.lights.clear();

    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );

    assert_eq!(w.color_at(&r), Color::black());
}

#[test]
fn shade_hit_on_singular_shape_is_black() {
    let w: World = Default::default();
    let singular = Shape::sphere()
        .with_transform(Matrix4D::scaling(1.0, 0.0, 1.0));

    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );

    let comps = Intersection::new(4.0, &singular).precompute(&r);
    assert_eq!(w.shade_hit(&comps), Color::black());
}

#[test]
fn color_ray_miss() {
    let w: World = Default::default();
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 1.0, 0.0),
    );

    assert_eq!(w.color_at(&r), Color::black());
}

#[test]
fn color_ray_hit() {
    let w: World = Default::default();
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0),
    );

    assert_eq!(w.color_at(&r), Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn color_behind_ray() {
    let mut w: World = Default::default();
    w.objects[0].material_mut().ambient = 1.0;
    w.objects[1].material_mut().ambient = 1.0;

    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, 0.75),
        Tuple4D::vector(0.0, 0.0, -1.0)
    );

    // The light is blocked by the outer sphere, so the hit on the inner
    // sphere is shadowed.
    assert_eq!(w.color_at(&r), Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn shadow_collinear_point_and_light() {
    let w: World = Default::default();
    let p = Tuple4D::point(0.0, 10.0, 0.0);

    assert!(!w.is_shadowed(&w.lights[0], p));
}

#[test]
fn shadow_object_between_point_and_light() {
    let w: World = Default::default();
    let p = Tuple4D::point(10.0, -10.0, 10.0);

    assert!(w.is_shadowed(&w.lights[0], p));
}

#[test]
fn shadow_object_behind_light() {
    let w: World = Default::default();
    let p = Tuple4D::point(-20.0, 20.0, -20.0);

    assert!(!w.is_shadowed(&w.lights[0], p));
}

#[test]
fn shadow_object_behind_point() {
    let w: World = Default::default();
    let p = Tuple4D::point(-2.0, 2.0, -2.0);

    assert!(!w.is_shadowed(&w.lights[0], p));
}
