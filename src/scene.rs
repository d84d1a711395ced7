use std::convert::TryFrom;
use std::fs;
use std::path::Path;

use log::{ debug, info, warn };
use serde::Deserialize;

use crate::consts::{ DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT, FEQ_EPSILON };
use crate::error::{ Error, Result };
use crate::tuple::Tuple4D;
use crate::color::Color;
use crate::matrix::Matrix4D;
use crate::light::{ PointLight, Material };
use crate::shape::Shape;
use crate::world::World;
use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::parallel;

/// A renderable scene: a world and the camera looking at it.
#[derive(Clone, Debug)]
pub struct Scene {
    pub world: World,
    pub camera: Camera,
}

impl Scene {
    /// Parses a JSON scene description.
    pub fn from_json(json: &str) -> Result<Scene> {
        let scene_json: SceneJson = serde_json::from_str(json)?;
        Scene::try_from(scene_json)
    }

    /// Reads and parses a JSON scene description file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Scene> {
        let path = path.as_ref();
        info!("loading scene from {}", path.display());

        let json = fs::read_to_string(path)?;
        Scene::from_json(&json)
    }

    /// The built-in scene: three spheres resting on a floor, lit by two
    /// white lights.
    pub fn demo() -> Scene {
        let mut world = World::empty();
        world.add_light(PointLight::new(
            Tuple4D::point(-10.0, 10.0, -10.0),
            Color::white(),
        ));
        world.add_light(PointLight::new(
            Tuple4D::point(10.0, 5.0, -10.0),
            Color::white(),
        ));

        let floor = Shape::plane();

        let middle = Shape::sphere()
            .with_transform(Matrix4D::translation(-0.5, 1.0, 0.5))
            .with_material(Material {
                color: Color::rgb(0.1, 1.0, 0.5),
                diffuse: 0.7,
                specular: 0.3,
                ..Default::default()
            });

        let right = Shape::sphere()
            .with_transform(Matrix4D::translation(1.5, 0.5, -0.5)
                * Matrix4D::scaling(0.5, 0.5, 0.5))
            .with_material(Material {
                color: Color::rgb(0.5, 1.0, 0.1),
                diffuse: 0.7,
                specular: 0.3,
                ..Default::default()
            });

        let left = Shape::sphere()
            .with_transform(Matrix4D::translation(-1.5, 0.33, -0.75)
                * Matrix4D::scaling(0.33, 0.33, 0.33))
            .with_material(Material {
                color: Color::rgb(1.0, 0.8, 0.1),
                diffuse: 0.7,
                specular: 0.3,
                ..Default::default()
            });

        world.objects = vec![floor, middle, right, left];

        let camera = Camera::new(
            DEFAULT_CANVAS_WIDTH,
            DEFAULT_CANVAS_HEIGHT,
            std::f64::consts::PI / 3.0,
            Matrix4D::view_transform(
                Tuple4D::point(0.0, 1.5, -5.0),
                Tuple4D::point(0.0, 1.0, 0.0),
                Tuple4D::vector(0.0, 1.0, 0.0),
            ),
        );

        Scene { world, camera }
    }

    /// Changes the canvas size, keeping the field of view and view transform.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        check_canvas_size(width, height)?;

        self.camera = Camera::new(width, height, self.camera.field_of_view,
            *self.camera.transform());
        Ok(())
    }

    /// Renders the scene. More than one thread uses the worker pool.
    pub fn render(&self, threads: usize) -> Canvas {
        if threads > 1 {
            parallel::render(&self.world, &self.camera, threads)
        } else {
            self.camera.render(&self.world)
        }
    }
}

fn check_canvas_size(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidScene(
            format!("canvas size must be non-zero, got {}x{}", width, height)
        ));
    }

    Ok(())
}

fn default_canvas_width() -> usize {
    DEFAULT_CANVAS_WIDTH
}

fn default_canvas_height() -> usize {
    DEFAULT_CANVAS_HEIGHT
}

fn default_field_of_view() -> f64 {
    std::f64::consts::PI / 3.0
}

fn default_intensity() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

/// The JSON form of a scene.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneJson {
    #[serde(default = "default_canvas_width")]
    canvas_width: usize,
    #[serde(default = "default_canvas_height")]
    canvas_height: usize,
    #[serde(default = "default_field_of_view")]
    field_of_view: f64,

    camera: CameraJson,

    #[serde(default)]
    lights: Vec<LightJson>,
    #[serde(default)]
    shapes: Vec<ShapeJson>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CameraJson {
    from: [f64; 3],
    to: [f64; 3],
    up: [f64; 3],
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LightJson {
    position: [f64; 3],
    #[serde(default = "default_intensity")]
    intensity: [f64; 3],
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ShapeKind {
    Sphere,
    Plane,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShapeJson {
    #[serde(rename = "type")]
    kind: ShapeKind,
    #[serde(default)]
    transform: Vec<TransformJson>,
    #[serde(default)]
    material: MaterialJson,
}

/// Material fields; anything omitted takes the `Material` default.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MaterialJson {
    color: Option<[f64; 3]>,
    ambient: Option<f64>,
    diffuse: Option<f64>,
    specular: Option<f64>,
    shininess: Option<f64>,
}

/// One factor of a shape's transform.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TransformJson {
    Translate([f64; 3]),
    Scale([f64; 3]),
    RotateX(f64),
    RotateY(f64),
    RotateZ(f64),
    Rotate { axis: [f64; 3], angle: f64 },
    Shear([f64; 6]),
}

impl From<&TransformJson> for Matrix4D {
    fn from(t: &TransformJson) -> Matrix4D {
        match *t {
            TransformJson::Translate([x, y, z]) =>
                Matrix4D::translation(x, y, z),
            TransformJson::Scale([x, y, z]) => Matrix4D::scaling(x, y, z),
            TransformJson::RotateX(r) => Matrix4D::rotation_x(r),
            TransformJson::RotateY(r) => Matrix4D::rotation_y(r),
            TransformJson::RotateZ(r) => Matrix4D::rotation_z(r),
            TransformJson::Rotate { axis: [x, y, z], angle } =>
                Matrix4D::rotation(Tuple4D::vector(x, y, z), angle),
            TransformJson::Shear([xy, xz, yx, yz, zx, zy]) =>
                Matrix4D::shearing(xy, xz, yx, yz, zx, zy),
        }
    }
}

impl From<MaterialJson> for Material {
    fn from(m: MaterialJson) -> Material {
        let default = Material::default();

        Material {
            color: m.color.map(Color::from).unwrap_or(default.color),
            ambient: m.ambient.unwrap_or(default.ambient),
            diffuse: m.diffuse.unwrap_or(default.diffuse),
            specular: m.specular.unwrap_or(default.specular),
            shininess: m.shininess.unwrap_or(default.shininess),
        }
    }
}

impl From<ShapeJson> for Shape {
    fn from(shape_json: ShapeJson) -> Shape {
        let shape = match shape_json.kind {
            ShapeKind::Sphere => Shape::sphere(),
            ShapeKind::Plane => Shape::plane(),
        };

        // Factors compose in the order written: the last one acts first.
        let transform = shape_json.transform.iter()
            .fold(Matrix4D::identity(), |acc, t| acc * Matrix4D::from(t));

        shape
            .with_transform(transform)
            .with_material(shape_json.material.into())
    }
}

impl TryFrom<SceneJson> for Scene {
    type Error = Error;

    fn try_from(scene_json: SceneJson) -> Result<Scene> {
        check_canvas_size(scene_json.canvas_width, scene_json.canvas_height)?;

        let fov = scene_json.field_of_view;
        if !(fov > 0.0 && fov < std::f64::consts::PI) {
            return Err(Error::InvalidScene(
                format!("field of view must be within (0, pi), got {}", fov)
            ));
        }

        let [fx, fy, fz] = scene_json.camera.from;
        let [tx, ty, tz] = scene_json.camera.to;
        let [ux, uy, uz] = scene_json.camera.up;
        let from = Tuple4D::point(fx, fy, fz);
        let to = Tuple4D::point(tx, ty, tz);
        let up = Tuple4D::vector(ux, uy, uz);

        if from == to {
            return Err(Error::InvalidScene(
                "camera looks from and to the same point".to_string()
            ));
        }

        if up.magnitude() < FEQ_EPSILON {
            return Err(Error::InvalidScene(
                "camera up vector has zero length".to_string()
            ));
        }

        let view = Matrix4D::view_transform(from, to, up);
        if !view.is_finite() {
            return Err(Error::InvalidScene(
                "camera view transform is not finite".to_string()
            ));
        }

        // Create the camera.
        let camera = Camera::new(
            scene_json.canvas_width,
            scene_json.canvas_height,
            fov,
            view,
        );

        if camera.inverse_transform().is_none() {
            return Err(Error::InvalidScene(
                "camera view transform is singular (is `up` parallel to the \
                 view direction?)".to_string()
            ));
        }

        // Create the world.
        let mut world = World::empty();

        for light_json in scene_json.lights {
            let [px, py, pz] = light_json.position;
            let light = PointLight::new(
                Tuple4D::point(px, py, pz),
                light_json.intensity.into(),
            );

            debug!("light at {:?}, intensity {:?}", light.position,
                light.intensity);
            world.add_light(light);
        }

        for (i, shape_json) in scene_json.shapes.into_iter().enumerate() {
            let shape: Shape = shape_json.into();

            if shape.inverse_transform().is_none() {
                warn!("shape {} ({:?}) has a singular transform and will not \
                    be visible", i, shape.ty);
            }

            debug!("shape {}: {:?}", i, shape.ty);
            world.add_object(shape);
        }

        if world.lights.is_empty() {
            warn!("scene has no lights; every pixel will be black");
        }

        Ok(Scene { world, camera })
    }
}

#[cfg(test)]
const MINIMAL_SCENE: &str = r#"{
    "canvas_width": 20,
    "canvas_height": 10,
    "camera": { "from": [0, 1.5, -5], "to": [0, 1, 0], "up": [0, 1, 0] },
    "lights": [ { "position": [-10, 10, -10] } ],
    "shapes": [
        { "type": "plane" },
        { "type": "sphere",
          "transform": [ { "translate": [0, 1, 0] }, { "scale": [0.5, 0.5, 0.5] } ],
          "material": { "color": [0.1, 1, 0.5], "diffuse": 0.7 } }
    ]
}"#;

#[test]
fn load_minimal_scene() {
    let scene = Scene::from_json(MINIMAL_SCENE).unwrap();

    assert_eq!(scene.camera.hsize, 20);
    assert_eq!(scene.camera.vsize, 10);
    assert!(crate::feq(scene.camera.field_of_view, std::f64::consts::PI / 3.0));

    assert_eq!(scene.world.lights, vec![PointLight::new(
        Tuple4D::point(-10.0, 10.0, -10.0),
        Color::white(),
    )]);

    assert_eq!(scene.world.objects.len(), 2);
    assert_eq!(scene.world.objects[0].ty, crate::shape::ShapeType::Plane);
    assert_eq!(*scene.world.objects[0].material(), Material::default());

    let sphere = &scene.world.objects[1];
    assert_eq!(sphere.ty, crate::shape::ShapeType::Sphere);
    assert_eq!(*sphere.transform(),
        Matrix4D::translation(0.0, 1.0, 0.0)
            * Matrix4D::scaling(0.5, 0.5, 0.5));
    assert_eq!(sphere.material().color, Color::rgb(0.1, 1.0, 0.5));
    assert_eq!(sphere.material().diffuse, 0.7);
    assert_eq!(sphere.material().specular, 0.9);
}

#[test]
fn transform_ops() {
    let json = r#"{
        "camera": { "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 1, 0] },
        "shapes": [ { "type": "sphere", "transform": [
            { "rotate_x": 1.0 },
            { "rotate_y": 0.5 },
            { "rotate_z": 0.25 },
            { "rotate": { "axis": [0, 0, 2], "angle": 0.1 } },
            { "shear": [1, 0, 0, 0, 0, 0] }
        ] } ]
    }"#;

    let scene = Scene::from_json(json).unwrap();
    let expected = Matrix4D::rotation_x(1.0)
        * Matrix4D::rotation_y(0.5)
        * Matrix4D::rotation_z(0.25)
        * Matrix4D::rotation_z(0.1)
        * Matrix4D::shearing(1.0, 0.0, 0.0, 0.0, 0.0, 0.0);

    assert_eq!(*scene.world.objects[0].transform(), expected);
    assert_eq!(scene.camera.hsize, DEFAULT_CANVAS_WIDTH);
    assert_eq!(scene.camera.vsize, DEFAULT_CANVAS_HEIGHT);
}

#[test]
fn reject_zero_canvas() {
    let json = r#"{
        "canvas_width": 0,
        "camera": { "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 1, 0] }
    }"#;

    assert!(matches!(Scene::from_json(json), Err(Error::InvalidScene(_))));
}

#[test]
fn reject_degenerate_camera() {
    let same_point = r#"{
        "camera": { "from": [0, 0, 0], "to": [0, 0, 0], "up": [0, 1, 0] }
    }"#;
    let parallel_up = r#"{
        "camera": { "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 0, 1] }
    }"#;
    let zero_up = r#"{
        "camera": { "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 0, 0] }
    }"#;
    let overflowing_view = r#"{
        "camera": { "from": [1e308, 0, 0], "to": [-1e308, 0, 0], "up": [0, 1, 0] }
    }"#;

    assert!(matches!(Scene::from_json(same_point),
        Err(Error::InvalidScene(_))));
    assert!(matches!(Scene::from_json(parallel_up),
        Err(Error::InvalidScene(_))));
    assert!(matches!(Scene::from_json(zero_up),
        Err(Error::InvalidScene(_))));
    assert!(matches!(Scene::from_json(overflowing_view),
        Err(Error::InvalidScene(_))));
}

#[test]
fn reject_bad_field_of_view() {
    let json = r#"{
        "field_of_view": 0,
        "camera": { "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 1, 0] }
    }"#;

    assert!(matches!(Scene::from_json(json), Err(Error::InvalidScene(_))));
}

#[test]
fn reject_malformed_json() {
    let unknown_shape = r#"{
        "camera": { "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 1, 0] },
        "shapes": [ { "type": "cube" } ]
    }"#;

    assert!(matches!(Scene::from_json(unknown_shape), Err(Error::Json(_))));
    assert!(matches!(Scene::from_json("{"), Err(Error::Json(_))));
}

#[test]
fn singular_shape_is_kept() {
    let json = r#"{
        "camera": { "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 1, 0] },
        "shapes": [ { "type": "sphere", "transform": [ { "scale": [0, 1, 1] } ] } ]
    }"#;

    let scene = Scene::from_json(json).unwrap();
    assert_eq!(scene.world.objects.len(), 1);
    assert!(scene.world.objects[0].inverse_transform().is_none());
}

#[test]
fn load_missing_file() {
    let err = Scene::load("/nonexistent/scene.json").unwrap_err();

    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn demo_scene() {
    let scene = Scene::demo();

    assert_eq!(scene.world.lights.len(), 2);
    assert_eq!(scene.world.objects.len(), 4);
    assert_eq!(scene.camera.hsize, 640);
    assert_eq!(scene.camera.vsize, 480);
    assert!(scene.world.objects.iter()
        .all(|o| o.inverse_transform().is_some()));
}

#[test]
fn resize_keeps_view() {
    let mut scene = Scene::demo();
    let transform = *scene.camera.transform();

    scene.resize(32, 24).unwrap();
    assert_eq!(scene.camera.hsize, 32);
    assert_eq!(scene.camera.vsize, 24);
    assert_eq!(*scene.camera.transform(), transform);

    assert!(scene.resize(0, 24).is_err());
}

#[test]
fn render_single_and_multi_threaded() {
    let mut scene = Scene::from_json(MINIMAL_SCENE).unwrap();
    scene.resize(8, 4).unwrap();

    assert_eq!(scene.render(1), scene.render(3));
}
