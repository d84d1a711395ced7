use std::f64::consts::PI;

use ray_caster::feq;
use ray_caster::tuple::Tuple4D;
use ray_caster::color::Color;
use ray_caster::matrix::Matrix4D;
use ray_caster::ray::Ray4D;
use ray_caster::shape::Shape;
use ray_caster::intersect::{ Intersection, Intersections };
use ray_caster::world::World;
use ray_caster::camera::Camera;
use ray_caster::scene::Scene;

fn sample_matrices() -> Vec<Matrix4D> {
    vec![
        [ 8.0, -5.0,  9.0,  2.0,
          7.0,  5.0,  6.0,  1.0,
         -6.0,  0.0,  9.0,  6.0,
         -3.0,  0.0, -9.0, -4.0].into(),
        [ 9.0,  3.0,  0.0,  9.0,
         -5.0, -2.0, -6.0, -3.0,
         -4.0,  9.0,  6.0,  4.0,
         -7.0,  6.0,  6.0,  2.0].into(),
        Matrix4D::translation(1.0, -2.0, 3.0)
            * Matrix4D::rotation_y(0.7)
            * Matrix4D::scaling(2.0, 0.5, 3.0),
        Matrix4D::shearing(1.0, 0.0, 0.5, 0.0, 0.0, 2.0),
    ]
}

fn sample_directions() -> Vec<Tuple4D> {
    vec![
        Tuple4D::vector(0.0, 0.0, 1.0),
        Tuple4D::vector(1.0, 0.0, 0.0),
        Tuple4D::vector(1.0, 2.0, 3.0).normalize(),
        Tuple4D::vector(-0.3, 0.8, -0.1).normalize(),
        Tuple4D::vector(-1.0, -1.0, -1.0).normalize(),
    ]
}

/// Every ordering of `items`.
fn permutations<T: Copy>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }

    let mut result = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let first = rest.remove(i);

        for mut tail in permutations(&rest) {
            tail.insert(0, first);
            result.push(tail);
        }
    }

    result
}

#[test]
fn identity_is_neutral() {
    for m in sample_matrices() {
        assert_eq!(m * Matrix4D::identity(), m);
        assert_eq!(Matrix4D::identity() * m, m);
    }
}

#[test]
fn inverse_round_trip() {
    for m in sample_matrices() {
        let inv = m.inverse().expect("sample matrices are invertible");

        assert_eq!(m * inv, Matrix4D::identity());
        assert_eq!(inv * m, Matrix4D::identity());
    }
}

#[test]
fn singular_matrix_has_no_inverse() {
    let m: Matrix4D = [
        -4.0,  2.0, -2.0, -3.0,
         9.0,  6.0,  2.0,  6.0,
         0.0, -5.0,  1.0, -5.0,
         0.0,  0.0,  0.0,  0.0].into();

    assert_eq!(m.determinant(), 0.0);
    assert!(m.inverse().is_none());
}

#[test]
fn translation_inverse_is_negated_translation() {
    let inv = Matrix4D::translation(5.0, -3.0, 2.0).inverse().unwrap();

    assert_eq!(inv, Matrix4D::translation(-5.0, 3.0, -2.0));
}

#[test]
fn sphere_roots_satisfy_vieta() {
    let s = Shape::sphere();

    for d in sample_directions() {
        for &k in &[-5.0, -0.5, 0.0, 3.0] {
            // A ray passing through the world origin.
            let origin = Tuple4D::origin() + d * k;
            let r = Ray4D::new(origin, d);

            let sphere_to_ray = r.origin - Tuple4D::origin();
            let a = r.direction.dot(&r.direction);
            let b = 2.0 * r.direction.dot(&sphere_to_ray);
            let c = sphere_to_ray.dot(&sphere_to_ray) - 1.0;

            let xs = s.intersect(&r).unwrap();
            assert_eq!(xs.len(), 2);

            let (t0, t1) = (xs.intersections[0].t, xs.intersections[1].t);
            assert!(feq(t0 * t1, c / a));
            assert!(feq(t0 + t1, -b / a));
        }
    }
}

#[test]
fn hit_ignores_order() {
    let s1 = Shape::sphere();
    let s2 = Shape::plane();
    let base = vec![
        Intersection::new(5.0, &s1),
        Intersection::new(-1.0, &s2),
        Intersection::new(2.0, &s2),
        Intersection::new(7.0, &s1),
    ];

    let expected = Intersection::new(2.0, &s2);
    for order in permutations(&base) {
        let xs: Intersections = order.into();
        assert_eq!(xs.hit(), Some(expected));
    }
}

#[test]
fn normals_are_unit_length() {
    let transforms = vec![
        Matrix4D::identity(),
        Matrix4D::scaling(1.0, 0.5, 3.0),
        Matrix4D::rotation_z(PI / 5.0) * Matrix4D::scaling(2.0, 1.0, 1.0),
        Matrix4D::translation(0.0, 1.0, -2.0)
            * Matrix4D::rotation(Tuple4D::vector(1.0, 1.0, 0.0), 0.3),
        Matrix4D::shearing(0.5, 0.0, 0.0, 1.0, 0.0, 0.0),
    ];

    for m in transforms {
        let sphere = Shape::sphere().with_transform(m);
        let plane = Shape::plane().with_transform(m);

        for d in sample_directions() {
            // Points on the surfaces, carried into world space.
            let on_sphere = m * (Tuple4D::origin() + d);
            let on_plane = m * Tuple4D::point(d.x * 4.0, 0.0, d.z * 4.0);

            let n = sphere.normal_at(on_sphere).unwrap();
            assert!(feq(n.magnitude(), 1.0));
            assert!(n.is_vector());

            let n = plane.normal_at(on_plane).unwrap();
            assert!(feq(n.magnitude(), 1.0));
            assert!(n.is_vector());
        }
    }
}

#[test]
fn center_pixel_ray_looks_down_negative_z() {
    for &size in &[11, 101, 201] {
        let c = Camera::new(size, size, PI / 2.0, Matrix4D::identity());
        let r = c.ray_for_pixel(size / 2, size / 2).unwrap();

        assert_eq!(r.origin, Tuple4D::origin());
        assert_eq!(r.direction, Tuple4D::vector(0.0, 0.0, -1.0));
    }
}

#[test]
fn default_world_end_to_end() {
    let w = World::default();
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0),
    );

    let xs = w.intersect(&r);
    let ts: Vec<f64> = xs.intersections.iter().map(|i| i.t).collect();
    assert_eq!(ts, vec![4.0, 4.5, 5.5, 6.0]);

    let hit = xs.hit().unwrap();
    assert_eq!(hit.t, 4.0);

    let comps = hit.precompute(&r);
    assert_eq!(w.shade_hit(&comps), Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn default_world_shadows() {
    let w = World::default();
    let light = &w.lights[0];

    assert!(!w.is_shadowed(light, Tuple4D::point(0.0, 10.0, 0.0)));
    assert!(w.is_shadowed(light, Tuple4D::point(10.0, -10.0, 10.0)));
}

#[test]
fn scene_file_renders() {
    let json = r#"{
        "canvas_width": 11,
        "canvas_height": 11,
        "field_of_view": 1.5707963267948966,
        "camera": { "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 1, 0] },
        "lights": [ { "position": [-10, 10, -10], "intensity": [1, 1, 1] } ],
        "shapes": [
            { "type": "sphere",
              "material": { "color": [0.8, 1.0, 0.6], "diffuse": 0.7, "specular": 0.2 } },
            { "type": "sphere", "transform": [ { "scale": [0.5, 0.5, 0.5] } ] }
        ]
    }"#;

    let dir = std::env::temp_dir()
        .join(format!("ray-caster-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let scene_path = dir.join("scene.json");
    std::fs::write(&scene_path, json).unwrap();

    let scene = Scene::load(&scene_path).unwrap();
    let image = scene.render(1);
    assert_eq!(image.read_pixel(5, 5).unwrap(),
        Color::rgb(0.38066, 0.47583, 0.2855));
    assert_eq!(scene.render(3), image);

    let out_path = dir.join("out.ppm");
    image.save(&out_path).unwrap();
    let ppm = std::fs::read_to_string(&out_path).unwrap();
    assert!(ppm.starts_with("P3\n11 11\n255\n"));
    assert!(ppm.lines().all(|l| l.len() <= 70));

    std::fs::remove_dir_all(&dir).unwrap();
}
