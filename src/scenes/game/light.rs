use cgmath::{Point3, Vector3};

use crate::{
    camera::Camera,
    pipelines::shader::Shader,
    scenes::game::description::{
        DirectionalLightRecord, LightSection, PointLightRecord, Rgb, SpotLightRecord, Xyz,
    },
};

impl From<Xyz> for Vector3<f32> {
    fn from(v: Xyz) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

impl From<Xyz> for Point3<f32> {
    fn from(v: Xyz) -> Self {
        Point3::new(v.x, v.y, v.z)
    }
}

impl From<Rgb> for Vector3<f32> {
    fn from(c: Rgb) -> Self {
        Vector3::new(c.r, c.g, c.b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

/// A light attached to the camera. Its position and direction are replaced
/// by the camera's every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub position: Point3<f32>,
    pub direction: Vector3<f32>,
    /// Radians.
    pub cut_off: f32,
    /// Radians.
    pub outer_cut_off: f32,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Point3<f32>,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl From<&DirectionalLightRecord> for DirectionalLight {
    fn from(r: &DirectionalLightRecord) -> Self {
        Self {
            direction: r.direction.into(),
            ambient: r.ambient.into(),
            diffuse: r.diffuse.into(),
            specular: r.specular.into(),
        }
    }
}

impl From<&SpotLightRecord> for SpotLight {
    fn from(r: &SpotLightRecord) -> Self {
        Self {
            position: r.position.into(),
            direction: r.direction.into(),
            cut_off: r.cut_off.to_radians(),
            outer_cut_off: r.outer_cut_off.to_radians(),
            ambient: r.ambient.into(),
            diffuse: r.diffuse.into(),
            specular: r.specular.into(),
            constant: r.constant,
            linear: r.linear,
            quadratic: r.quadratic,
        }
    }
}

impl From<&PointLightRecord> for PointLight {
    fn from(r: &PointLightRecord) -> Self {
        Self {
            position: r.position.into(),
            constant: r.constant,
            linear: r.linear,
            quadratic: r.quadratic,
            ambient: r.ambient.into(),
            diffuse: r.diffuse.into(),
            specular: r.specular.into(),
        }
    }
}

/// The three lights of the city.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lights {
    pub directional: DirectionalLight,
    pub spot: SpotLight,
    pub point: PointLight,
}

impl From<&LightSection> for Lights {
    fn from(section: &LightSection) -> Self {
        Self {
            directional: (&section.directional_light).into(),
            spot: (&section.spot_light).into(),
            point: (&section.point_light).into(),
        }
    }
}

impl Lights {
    /// Point the spot light along the camera.
    pub fn follow(&mut self, camera: &Camera) {
        self.spot.position = camera.position;
        self.spot.direction = camera.front;
    }

    pub fn bind(&self, shader: &mut Shader) {
        let DirectionalLight {
            direction,
            ambient,
            diffuse,
            specular,
        } = self.directional;
        shader.bind_uniform("dirLight.direction", direction);
        shader.bind_uniform("dirLight.ambient", ambient);
        shader.bind_uniform("dirLight.diffuse", diffuse);
        shader.bind_uniform("dirLight.specular", specular);

        let spot = &self.spot;
        shader.bind_uniform("spotLight.position", spot.position);
        shader.bind_uniform("spotLight.direction", spot.direction);
        shader.bind_uniform("spotLight.cutOff", spot.cut_off);
        shader.bind_uniform("spotLight.outerCutOff", spot.outer_cut_off);
        shader.bind_uniform("spotLight.ambient", spot.ambient);
        shader.bind_uniform("spotLight.diffuse", spot.diffuse);
        shader.bind_uniform("spotLight.specular", spot.specular);
        shader.bind_uniform("spotLight.constant", spot.constant);
        shader.bind_uniform("spotLight.linear", spot.linear);
        shader.bind_uniform("spotLight.quadratic", spot.quadratic);

        let point = &self.point;
        shader.bind_uniform("pointLight.position", point.position);
        shader.bind_uniform("pointLight.ambient", point.ambient);
        shader.bind_uniform("pointLight.diffuse", point.diffuse);
        shader.bind_uniform("pointLight.specular", point.specular);
        shader.bind_uniform("pointLight.constant", point.constant);
        shader.bind_uniform("pointLight.linear", point.linear);
        shader.bind_uniform("pointLight.quadratic", point.quadratic);
    }
}
