use std::cmp::Ordering;

use crate::consts::SHADOW_BIAS;
use crate::tuple::Tuple4D;
use crate::ray::Ray4D;
use crate::shape::Shape;

/// An intersection.
///
/// This structure assumes that some ray produced an intersection. Parameter `t`
/// is the offset along that ray, and `what` is the shape that was hit.
/// Intersections are produced per query and borrow from the shapes they
/// refer to; they never outlive the `World`.
#[derive(Copy, Clone, Debug)]
pub struct Intersection<'a> {
    pub t: f64,
    pub what: &'a Shape,
}

/// Implements partial equality on an Intersection.
///
/// Two intersections are equal if their offsets `t` are equal and they refer
/// to the *same* shape (pointer identity, not structural equality).
impl<'a> PartialEq for Intersection<'a> {
    fn eq(&self, other: &Intersection<'a>) -> bool {
        self.t == other.t && std::ptr::eq(self.what, other.what)
    }
}

impl<'a> Intersection<'a> {
    pub fn new(t: f64, what: &'a Shape) -> Intersection<'a> {
        Intersection { t, what }
    }

    /// Shorthand for `IntersectionComputation::new(ray, self)`.
    pub fn precompute(&self, ray: &Ray4D) -> IntersectionComputation<'a> {
        IntersectionComputation::new(ray, self)
    }
}

/// A collection of intersections.
///
/// Mostly a wrapper for a vector of `Intersection` objects.
#[derive(Clone, Debug, Default)]
pub struct Intersections<'a> {
    pub intersections: Vec<Intersection<'a>>,
}

impl<'a> Intersections<'a> {
    /// Creates a new list of intersections.
    pub fn new() -> Intersections<'a> {
        Intersections { intersections: Vec::new() }
    }

    /// Finds the visible intersection.
    ///
    /// The hit is the intersection with the smallest non-negative `t`;
    /// anything behind the ray origin is invisible. Returns `None` if every
    /// intersection is negative (or there are none).
    ///
    /// The list does not have to be sorted, and it is not modified. Among
    /// several intersections with the same smallest `t`, the first in the
    /// list wins.
    pub fn hit(&self) -> Option<Intersection<'a>> {
        self.intersections.iter()
            .filter(|i| i.t >= 0.0)
            .min_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(Ordering::Equal))
            .copied()
    }

    /// Sorts the intersections by ascending `t`. The sort is stable.
    pub fn sort(&mut self) {
        self.intersections.sort_by(|a, b|
            a.t.partial_cmp(&b.t).unwrap_or(Ordering::Equal)
        );
    }

    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }
}

impl<'a> From<Vec<Intersection<'a>>> for Intersections<'a> {
    fn from(intersections: Vec<Intersection<'a>>) -> Intersections<'a> {
        Intersections { intersections }
    }
}

/// A record for computations associated with an `Intersection`.
///
/// Everything shading needs about a hit, derived once per hit.
#[derive(Clone, Debug)]
pub struct IntersectionComputation<'a> {
    /// The "time" of the ray intersection.
    pub t: f64,

    /// The object being intersected.
    pub obj: &'a Shape,

    /// The point where the intersection occurs.
    pub point: Tuple4D,

    /// The eye vector for the intersection (the reversed ray direction).
    pub eyev: Tuple4D,

    /// The surface normal, flipped to face the eye. `None` if the shape has
    /// a singular transform.
    pub normalv: Option<Tuple4D>,

    /// Whether the intersection occurs within the object or not.
    pub inside: bool,

    /// A point slightly above the intersected surface, on the eye's side.
    /// Used as the origin of shadow rays so that an object does not shadow
    /// itself ("acne"). `None` whenever `normalv` is.
    pub over_point: Option<Tuple4D>,
}

impl<'a> IntersectionComputation<'a> {
    /// Creates a new intersection computation, given a ray and intersection.
    pub fn new(r: &Ray4D, hit: &Intersection<'a>)
        -> IntersectionComputation<'a> {
        let t = hit.t;
        let obj = hit.what;
        let point = r.position(t);
        let eyev = -r.direction;

        let mut inside = false;
        let normalv = obj.normal_at(point).map(|n| {
            if n.dot(&eyev) < 0.0 {
                inside = true;
                -n
            } else {
                n
            }
        });

        let over_point = normalv.map(|n| point + n * SHADOW_BIAS);

        IntersectionComputation {
            t, obj,
            point, eyev, normalv,
            inside,
            over_point,
        }
    }
}

#[cfg(test)]
use crate::matrix::Matrix4D;

#[test]
fn intersection_encapsulates_t_and_object() {
    let s = Shape::sphere();
    let i = Intersection::new(3.5, &s);

    assert_eq!(i.t, 3.5);
    assert!(std::ptr::eq(i.what, &s));
}

#[test]
fn equal_intersections_need_the_same_shape() {
    let s1 = Shape::sphere();
    let s2 = Shape::sphere();

    assert_eq!(Intersection::new(1.0, &s1), Intersection::new(1.0, &s1));
    assert_ne!(Intersection::new(1.0, &s1), Intersection::new(1.0, &s2));
}

#[test]
fn hit_with_all_positive() {
    let s = Shape::sphere();
    let i1 = Intersection::new(1.0, &s);
    let i2 = Intersection::new(2.0, &s);
    let is: Intersections = vec![i2, i1].into();

    assert_eq!(is.hit(), Some(i1));
}

#[test]
fn hit_with_some_negative() {
    let s = Shape::sphere();
    let i1 = Intersection::new(-1.0, &s);
    let i2 = Intersection::new(1.0, &s);
    let is: Intersections = vec![i2, i1].into();

    assert_eq!(is.hit(), Some(i2));
}

#[test]
fn hit_with_all_negative() {
    let s = Shape::sphere();
    let is: Intersections = vec![
        Intersection::new(-2.0, &s),
        Intersection::new(-1.0, &s),
    ].into();

    assert_eq!(is.hit(), None);
    assert_eq!(Intersections::new().hit(), None);
}

#[test]
fn hit_is_lowest_nonnegative() {
    let s = Shape::sphere();
    let i1 = Intersection::new(5.0, &s);
    let i2 = Intersection::new(7.0, &s);
    let i3 = Intersection::new(-3.0, &s);
    let i4 = Intersection::new(2.0, &s);
    let is: Intersections = vec![i1, i2, i3, i4].into();

    assert_eq!(is.hit(), Some(i4));
    assert_eq!(is.len(), 4);
}

#[test]
fn hit_at_zero_is_visible() {
    let s = Shape::sphere();
    let i = Intersection::new(0.0, &s);
    let is: Intersections = vec![Intersection::new(-0.5, &s), i].into();

    assert_eq!(is.hit(), Some(i));
}

#[test]
fn hit_tie_goes_to_first_in_list() {
    let sphere = Shape::sphere();
    let plane = Shape::plane();

    let is: Intersections = vec![
        Intersection::new(2.0, &sphere),
        Intersection::new(2.0, &plane),
    ].into();
    let hit = is.hit().unwrap();
    assert!(std::ptr::eq(hit.what, &sphere));

    let is: Intersections = vec![
        Intersection::new(2.0, &plane),
        Intersection::new(2.0, &sphere),
    ].into();
    let hit = is.hit().unwrap();
    assert!(std::ptr::eq(hit.what, &plane));
}

#[test]
fn sort_orders_by_t() {
    let s = Shape::sphere();
    let mut is: Intersections = vec![
        Intersection::new(6.0, &s),
        Intersection::new(-1.0, &s),
        Intersection::new(4.5, &s),
    ].into();

    is.sort();
    let ts: Vec<f64> = is.intersections.iter().map(|i| i.t).collect();
    assert_eq!(ts, vec![-1.0, 4.5, 6.0]);
}

#[test]
fn precompute_intersection_state() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0),
    );

    let shape = Shape::sphere();
    let i = Intersection::new(4.0, &shape);

    let comps = i.precompute(&r);

    assert!(std::ptr::eq(comps.obj, i.what));
    assert_eq!(comps.t, i.t);
    assert_eq!(comps.point, Tuple4D::point(0.0, 0.0, -1.0));
    assert_eq!(comps.eyev, Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(comps.normalv, Some(Tuple4D::vector(0.0, 0.0, -1.0)));
    assert!(!comps.inside);
}

#[test]
fn precompute_inside_intersection() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 0.0, 1.0),
    );

    let shape = Shape::sphere();
    let i = Intersection::new(1.0, &shape);

    let comps = IntersectionComputation::new(&r, &i);

    assert!(comps.inside);
    assert_eq!(comps.point, Tuple4D::point(0.0, 0.0, 1.0));
    assert_eq!(comps.eyev, Tuple4D::vector(0.0, 0.0, -1.0));

    // Normal would have been (0, 0, 1), but is inverted.
    assert_eq!(comps.normalv, Some(Tuple4D::vector(0.0, 0.0, -1.0)));
}

#[test]
fn hit_should_offset_point() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0),
    );

    let shape = Shape::sphere()
        .with_transform(Matrix4D::translation(0.0, 0.0, 1.0));

    let i = Intersection::new(5.0, &shape);
    let comps = i.precompute(&r);
    let over_point = comps.over_point.unwrap();

    assert!(over_point.z < -SHADOW_BIAS / 2.0);
    assert!(comps.point.z > over_point.z);
}

#[test]
fn precompute_on_singular_shape_has_no_normal() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0),
    );

    let shape = Shape::sphere()
        .with_transform(Matrix4D::scaling(0.0, 0.0, 0.0));
    let comps = Intersection::new(4.0, &shape).precompute(&r);

    assert!(comps.normalv.is_none());
    assert!(comps.over_point.is_none());
    assert!(!comps.inside);
}
