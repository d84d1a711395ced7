use crate::consts::SHADOWED_COLOR;
use crate::color::Color;
use crate::tuple::Tuple4D;

/// A point light.
///
/// A very simple light source. Provides a color and a position where light is
/// produced from.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointLight {
    pub position: Tuple4D,
    pub intensity: Color,
}

impl PointLight {
    /// Creates a point light.
    ///
    /// If `position` isn't a point, it is converted to a point automatically.
    ///
    /// ```
    /// # use ray_caster::light::PointLight;
    /// # use ray_caster::color::Color;
    /// # use ray_caster::tuple::Tuple4D;
    /// let light = PointLight::new(
    ///     Tuple4D::point(-10.0, 10.0, -10.0),
    ///     Color::white(),
    /// );
    /// assert!(light.position.is_point());
    /// ```
    pub fn new(mut position: Tuple4D, intensity: Color) -> PointLight {
        if !position.is_point() {
            position.w = 1.0;
        }

        PointLight { position, intensity }
    }
}

/// A material record.
///
/// Materials use attributes from the Phong reflection model; ambient, diffuse,
/// specular and shininess.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub color: Color,

    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            color: Color::white(),

            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            shininess: 200.0,
        }
    }
}

impl Material {
    /// Calculate the lighting of a point on this material from one light.
    ///
    /// Takes a single light, a point, the eye vector and the (eye-facing)
    /// normal vector, and calculates how the light looks from the eye.
    /// Contributions from several lights are summed by the caller.
    ///
    /// A shadowed point gets the fixed dim gray `SHADOWED_COLOR`, whatever
    /// the material's color or ambient coefficient and the light's
    /// intensity.
    pub fn lighting(&self, light: &PointLight, point: Tuple4D,
        eyev: Tuple4D, normalv: Tuple4D, in_shadow: bool) -> Color {
        if in_shadow {
            return SHADOWED_COLOR.into();
        }

        // Combine surface color with light's color
        let effective_color = self.color * light.intensity;

        // Find direction to light source
        let lightv = (light.position - point).normalize();

        let ambient = effective_color * self.ambient;

        // Light is on the other side of the surface
        let light_dot_normal = lightv.dot(&normalv);
        if light_dot_normal < 0.0 {
            return ambient;
        }

        let diffuse = effective_color * (self.diffuse * light_dot_normal);

        // Specular highlight is only visible if the reflection points to the eye
        let reflectv = (-lightv).reflect(&normalv);
        let reflect_dot_eye = reflectv.dot(&eyev);
        if reflect_dot_eye <= 0.0 {
            return ambient + diffuse;
        }

        let factor = reflect_dot_eye.powf(self.shininess);
        let specular = light.intensity * (self.specular * factor);

        ambient + diffuse + specular
    }
}

#[cfg(test)]
fn lighting_fixture() -> (Material, Tuple4D) {
    (Material::default(), Tuple4D::point(0.0, 0.0, 0.0))
}

#[test]
fn default_material() {
    let m = Material::default();

    assert_eq!(m.color, Color::rgb(1.0, 1.0, 1.0));
    assert_eq!(m.ambient, 0.1);
    assert_eq!(m.diffuse, 0.9);
    assert_eq!(m.specular, 0.9);
    assert_eq!(m.shininess, 200.0);
}

#[test]
fn point_light_forces_point() {
    let light = PointLight::new(
        Tuple4D::vector(1.0, 2.0, 3.0),
        Color::white(),
    );

    assert_eq!(light.position, Tuple4D::point(1.0, 2.0, 3.0));
    assert_eq!(light.intensity, Color::white());
}

#[test]
fn eye_between_light_and_surface() {
    let (m, position) = lighting_fixture();

    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Tuple4D::point(0.0, 0.0, -10.0),
        Color::rgb(1.0, 1.0, 1.0),
    );

    let res = m.lighting(&light, position, eyev, normalv, false);
    assert_eq!(res, Color::rgb(1.9, 1.9, 1.9));
}

#[test]
fn eye_between_light_and_surface_offset_45() {
    let (m, position) = lighting_fixture();

    let eyev = Tuple4D::vector(0.0, 2.0f64.sqrt() / 2.0, 2.0f64.sqrt() / 2.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Tuple4D::point(0.0, 0.0, -10.0),
        Color::rgb(1.0, 1.0, 1.0),
    );

    let res = m.lighting(&light, position, eyev, normalv, false);
    assert_eq!(res, Color::rgb(1.0, 1.0, 1.0));
}

#[test]
fn eye_opposite_from_surface_offset_45() {
    let (m, position) = lighting_fixture();

    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Tuple4D::point(0.0, 10.0, -10.0),
        Color::rgb(1.0, 1.0, 1.0),
    );

    let res = m.lighting(&light, position, eyev, normalv, false);
    assert_eq!(res, Color::rgb(0.7364, 0.7364, 0.7364));
}

#[test]
fn eye_opposite_from_surface_in_reflection() {
    let (m, position) = lighting_fixture();

    let eyev = Tuple4D::vector(0., -(2.0f64.sqrt())/2., -(2.0f64.sqrt())/2.);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Tuple4D::point(0.0, 10.0, -10.0),
        Color::rgb(1.0, 1.0, 1.0),
    );

    let res = m.lighting(&light, position, eyev, normalv, false);
    assert_eq!(res, Color::rgb(1.6364, 1.6364, 1.6364));
}

#[test]
fn eye_across_surface_from_light() {
    let (m, position) = lighting_fixture();

    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Tuple4D::point(0.0, 0.0, 10.0),
        Color::rgb(1.0, 1.0, 1.0),
    );

    let res = m.lighting(&light, position, eyev, normalv, false);
    assert_eq!(res, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn lighting_with_surface_in_shadow() {
    let (m, position) = lighting_fixture();

    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Tuple4D::point(0.0, 0.0, -10.0),
        Color::rgb(1.0, 1.0, 1.0),
    );

    let res = m.lighting(&light, position, eyev, normalv, true);
    assert_eq!(res, Color::rgb(0.1, 0.1, 0.1));
}

// The shadowed color ignores the material and the light entirely.
#[test]
fn shadowed_color_is_fixed() {
    let m = Material {
        color: Color::rgb(1.0, 0.0, 0.0),
        ambient: 0.8,
        ..Default::default()
    };

    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Tuple4D::point(0.0, 0.0, -10.0),
        Color::rgb(0.5, 0.5, 2.0),
    );

    let res = m.lighting(&light, Tuple4D::origin(), eyev, normalv, true);
    assert_eq!(res, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn light_intensity_tints_result() {
    let m = Material {
        color: Color::rgb(1.0, 0.5, 0.0),
        ..Default::default()
    };

    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Tuple4D::point(0.0, 0.0, -10.0),
        Color::rgb(1.0, 1.0, 0.5),
    );

    // ambient + diffuse on (1, 0.5, 0), specular 0.9 * intensity
    let res = m.lighting(&light, Tuple4D::origin(), eyev, normalv, false);
    assert_eq!(res, Color::rgb(1.9, 1.4, 0.45));
}
