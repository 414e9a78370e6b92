//! Light and material parameterisation for the Phong shader.
//!
//! [`Lighting::uniforms`] is a pure function of elapsed time, the camera and
//! the static light configuration. It owns no state between frames.

use crate::camera::FlyCamera;
use crate::uniform::{UniformSet, UniformWriter, field};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Capacity of the shader's point light array.
pub const MAX_POINT_LIGHTS: usize = 4;

/// Distance falloff coefficients: `1 / (constant + linear*d + quadratic*d^2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    /// No falloff.
    pub const NONE: Attenuation = Attenuation {
        constant: 1.0,
        linear: 0.0,
        quadratic: 0.0,
    };

    /// Covers roughly 50 units.
    pub const RANGE_50: Attenuation = Attenuation {
        constant: 1.0,
        linear: 0.09,
        quadratic: 0.032,
    };

    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

impl UniformWriter for Attenuation {
    fn write_uniforms(&self, prefix: &str, set: &mut UniformSet) {
        set.set(field(prefix, "constant"), self.constant);
        set.set(field(prefix, "linear"), self.linear);
        set.set(field(prefix, "quadratic"), self.quadratic);
    }
}

/// Ambient, diffuse and specular intensities of a light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightColor {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl LightColor {
    pub const OFF: LightColor = LightColor {
        ambient: Vec3::ZERO,
        diffuse: Vec3::ZERO,
        specular: Vec3::ZERO,
    };
}

impl UniformWriter for LightColor {
    fn write_uniforms(&self, prefix: &str, set: &mut UniformSet) {
        set.set(field(prefix, "ambient"), self.ambient);
        set.set(field(prefix, "diffuse"), self.diffuse);
        set.set(field(prefix, "specular"), self.specular);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub color: LightColor,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-0.2, -1.0, -0.3),
            color: LightColor {
                ambient: Vec3::splat(0.05),
                diffuse: Vec3::splat(0.4),
                specular: Vec3::splat(0.5),
            },
        }
    }
}

impl DirectionalLight {
    fn write_enabled(light: Option<&Self>, prefix: &str, set: &mut UniformSet) {
        match light {
            Some(light) => {
                set.set(field(prefix, "direction"), light.direction);
                set.set(field(prefix, "enabled"), 1);
                light.color.write_uniforms(prefix, set);
            }
            None => {
                set.set(field(prefix, "direction"), Vec3::NEG_Y);
                set.set(field(prefix, "enabled"), 0);
                LightColor::OFF.write_uniforms(prefix, set);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub color: LightColor,
    pub attenuation: Attenuation,
}

impl PointLight {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            color: LightColor {
                ambient: Vec3::splat(0.05),
                diffuse: Vec3::splat(0.8),
                specular: Vec3::ONE,
            },
            attenuation: Attenuation::RANGE_50,
        }
    }
}

impl UniformWriter for PointLight {
    fn write_uniforms(&self, prefix: &str, set: &mut UniformSet) {
        set.set(field(prefix, "position"), self.position);
        self.color.write_uniforms(prefix, set);
        self.attenuation.write_uniforms(prefix, set);
    }
}

/// Camera-mounted cone light. Position and direction are taken from the
/// camera every frame; only colour, cutoffs and attenuation are configured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotLight {
    pub color: LightColor,
    pub attenuation: Attenuation,
    /// Half-angle of the fully lit cone, degrees.
    pub inner_cutoff_degrees: f32,
    /// Half-angle where the light reaches zero, degrees.
    pub outer_cutoff_degrees: f32,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            color: LightColor {
                ambient: Vec3::ZERO,
                diffuse: Vec3::ONE,
                specular: Vec3::ONE,
            },
            attenuation: Attenuation::RANGE_50,
            inner_cutoff_degrees: 12.5,
            outer_cutoff_degrees: 15.0,
        }
    }
}

impl SpotLight {
    pub fn cut_off(&self) -> f32 {
        self.inner_cutoff_degrees.to_radians().cos()
    }

    pub fn outer_cut_off(&self) -> f32 {
        self.outer_cutoff_degrees.to_radians().cos()
    }

    fn write_mounted(light: Option<&Self>, camera: &FlyCamera, prefix: &str, set: &mut UniformSet) {
        set.set(field(prefix, "position"), camera.position);
        set.set(field(prefix, "direction"), camera.front());
        match light {
            Some(light) => {
                set.set(field(prefix, "enabled"), 1);
                set.set(field(prefix, "cutOff"), light.cut_off());
                set.set(field(prefix, "outerCutOff"), light.outer_cut_off());
                light.color.write_uniforms(prefix, set);
                light.attenuation.write_uniforms(prefix, set);
            }
            None => {
                set.set(field(prefix, "enabled"), 0);
                set.set(field(prefix, "cutOff"), 1.0_f32);
                set.set(field(prefix, "outerCutOff"), 1.0_f32);
                LightColor::OFF.write_uniforms(prefix, set);
                Attenuation::NONE.write_uniforms(prefix, set);
            }
        }
    }
}

/// Surface description handed to the shader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
    /// Sample diffuse/specular maps and use the colours as multipliers.
    pub use_maps: bool,
}

impl Material {
    /// Flat coral material.
    pub fn coral() -> Self {
        Self {
            ambient: Vec3::new(1.0, 0.5, 0.31),
            diffuse: Vec3::new(1.0, 0.5, 0.31),
            specular: Vec3::splat(0.5),
            shininess: 32.0,
            use_maps: false,
        }
    }

    /// Texture-mapped material with neutral multipliers.
    pub fn textured(shininess: f32) -> Self {
        Self {
            ambient: Vec3::ONE,
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
            shininess,
            use_maps: true,
        }
    }
}

impl UniformWriter for Material {
    fn write_uniforms(&self, prefix: &str, set: &mut UniformSet) {
        set.set(field(prefix, "ambient"), self.ambient);
        set.set(field(prefix, "diffuse"), self.diffuse);
        set.set(field(prefix, "specular"), self.specular);
        set.set(field(prefix, "shininess"), self.shininess);
        set.set(field(prefix, "useMaps"), i32::from(self.use_maps));
    }
}

/// A single point light whose colour cycles with time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulsingLight {
    pub position: Vec3,
    /// Angular frequency of each colour channel, radians per second.
    pub frequencies: Vec3,
    pub diffuse_scale: f32,
    pub ambient_scale: f32,
    pub specular: Vec3,
    pub material: Material,
}

impl Default for PulsingLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(1.2, 1.0, 2.0),
            frequencies: Vec3::new(2.0, 0.7, 1.3),
            diffuse_scale: 0.5,
            ambient_scale: 0.2,
            specular: Vec3::ONE,
            material: Material::coral(),
        }
    }
}

impl PulsingLight {
    pub fn color_at(&self, time: f32) -> LightColor {
        let phase = self.frequencies * time;
        let color = Vec3::new(phase.x.sin(), phase.y.sin(), phase.z.sin());
        let diffuse = color * self.diffuse_scale;
        LightColor {
            ambient: diffuse * self.ambient_scale,
            diffuse,
            specular: self.specular,
        }
    }
}

/// Directional + point lights + camera flashlight with fixed colours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiLight {
    pub directional: DirectionalLight,
    pub point_lights: Vec<PointLight>,
    pub spot: SpotLight,
    pub shininess: f32,
}

impl Default for MultiLight {
    fn default() -> Self {
        Self {
            directional: DirectionalLight::default(),
            point_lights: vec![
                PointLight::at(Vec3::new(0.7, 0.2, 2.0)),
                PointLight::at(Vec3::new(2.3, -3.3, -4.0)),
                PointLight::at(Vec3::new(-4.0, 2.0, -12.0)),
                PointLight::at(Vec3::new(0.0, 0.0, -3.0)),
            ],
            spot: SpotLight::default(),
            shininess: 32.0,
        }
    }
}

/// Static lighting configuration of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "kebab-case")]
pub enum Lighting {
    Pulsing(PulsingLight),
    MultiLight(MultiLight),
}

impl Default for Lighting {
    fn default() -> Self {
        Lighting::MultiLight(MultiLight::default())
    }
}

impl Lighting {
    /// Build every lighting and material uniform for one frame.
    pub fn uniforms(&self, time: f32, camera: &FlyCamera) -> UniformSet {
        let mut set = UniformSet::new();
        set.set("viewPos", camera.position);

        match self {
            Lighting::Pulsing(light) => {
                light.material.write_uniforms("material", &mut set);
                DirectionalLight::write_enabled(None, "dirLight", &mut set);
                set.set("pointLightCount", 1);
                PointLight {
                    position: light.position,
                    color: light.color_at(time),
                    attenuation: Attenuation::NONE,
                }
                .write_uniforms("pointLights[0]", &mut set);
                SpotLight::write_mounted(None, camera, "spotLight", &mut set);
            }
            Lighting::MultiLight(multi) => {
                Material::textured(multi.shininess).write_uniforms("material", &mut set);
                DirectionalLight::write_enabled(Some(&multi.directional), "dirLight", &mut set);
                let lights = &multi.point_lights[..multi.point_lights.len().min(MAX_POINT_LIGHTS)];
                set.set("pointLightCount", lights.len() as i32);
                for (i, light) in lights.iter().enumerate() {
                    light.write_uniforms(&format!("pointLights[{i}]"), &mut set);
                }
                SpotLight::write_mounted(Some(&multi.spot), camera, "spotLight", &mut set);
            }
        }
        set
    }

    /// Positions that get a light-indicator cube.
    pub fn lamp_positions(&self) -> Vec<Vec3> {
        match self {
            Lighting::Pulsing(light) => vec![light.position],
            Lighting::MultiLight(multi) => multi
                .point_lights
                .iter()
                .take(MAX_POINT_LIGHTS)
                .map(|l| l.position)
                .collect(),
        }
    }

    pub fn point_light_count(&self) -> usize {
        match self {
            Lighting::Pulsing(_) => 1,
            Lighting::MultiLight(multi) => multi.point_lights.len(),
        }
    }
}
