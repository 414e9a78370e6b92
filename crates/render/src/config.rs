use crate::camera::{DEFAULT_PITCH, DEFAULT_SENSITIVITY, DEFAULT_SPEED, DEFAULT_YAW, FlyCamera};
use crate::lighting::{Lighting, MAX_POINT_LIGHTS};
use glam::Vec3;
use phongview_common::Transform;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a scene file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{count} point lights configured, the shader holds at most {max}")]
    TooManyPointLights { count: usize, max: usize },
    #[error("cube rotation axis must be finite and non-zero, got {0}")]
    RotationAxis(Vec3),
    #[error("lamp scale must be finite and positive, got {0}")]
    LampScale(f32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl CameraConfig {
    pub fn build(&self) -> FlyCamera {
        let mut camera = FlyCamera::with_orientation(self.position, Vec3::Y, self.yaw, self.pitch);
        camera.speed = self.speed;
        camera.sensitivity = self.sensitivity;
        camera
    }
}

/// Placement of the primitive cubes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeConfig {
    pub positions: Vec<Vec3>,
    pub rotation_axis: Vec3,
    /// Rotation added per instance index, degrees.
    pub rotation_step_degrees: f32,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(2.0, 5.0, -15.0),
                Vec3::new(-1.5, -2.2, -2.5),
                Vec3::new(-3.8, -2.0, -12.3),
                Vec3::new(2.4, -0.4, -3.5),
                Vec3::new(-1.7, 3.0, -7.5),
                Vec3::new(1.3, -2.0, -2.5),
                Vec3::new(1.5, 2.0, -2.5),
                Vec3::new(1.5, 0.2, -1.5),
                Vec3::new(-1.3, 1.0, -1.5),
            ],
            rotation_axis: Vec3::new(1.0, 0.3, 0.5),
            rotation_step_degrees: 20.0,
        }
    }
}

/// Everything needed to build a [`crate::Scene`], with defaults that
/// reproduce the sample scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub lighting: Lighting,
    pub cubes: CubeConfig,
    pub lamp_scale: f32,
    pub model_transform: Transform,
    pub clear_color: [f32; 4],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            lighting: Lighting::default(),
            cubes: CubeConfig::default(),
            lamp_scale: 0.2,
            model_transform: Transform {
                position: Vec3::new(0.0, -1.75, 0.0),
                scale: Vec3::splat(0.2),
                ..Transform::default()
            },
            clear_color: [0.1, 0.1, 0.1, 1.0],
        }
    }
}

impl SceneConfig {
    /// Read and validate a YAML scene file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml(&text)?;
        tracing::info!(path = %path.as_ref().display(), "scene config loaded");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.lighting.point_light_count();
        if count > MAX_POINT_LIGHTS {
            return Err(ConfigError::TooManyPointLights {
                count,
                max: MAX_POINT_LIGHTS,
            });
        }
        let axis = self.cubes.rotation_axis;
        let length_squared = axis.length_squared();
        if !(length_squared.is_finite() && length_squared > 0.0) {
            return Err(ConfigError::RotationAxis(axis));
        }
        if !(self.lamp_scale.is_finite() && self.lamp_scale > 0.0) {
            return Err(ConfigError::LampScale(self.lamp_scale));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::{MultiLight, PointLight, PulsingLight};
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        let config = SceneConfig::default();
        config.validate().unwrap();
        assert_eq!(config.cubes.positions.len(), 10);
    }

    #[test]
    fn empty_yaml_is_default() {
        let config = SceneConfig::from_yaml("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn yaml_round_trip() {
        let config = SceneConfig {
            lighting: Lighting::Pulsing(PulsingLight::default()),
            lamp_scale: 0.5,
            ..SceneConfig::default()
        };
        let text = config.to_yaml().unwrap();
        assert!(text.contains("model: pulsing"));
        assert_eq!(SceneConfig::from_yaml(&text).unwrap(), config);
    }

    #[test]
    fn partial_yaml_overrides_selected_keys() {
        let text = "lighting:\n  model: pulsing\n  position: [0.0, 2.0, 0.0]\ncamera:\n  speed: 5.0\n";
        let config = SceneConfig::from_yaml(text).unwrap();
        match &config.lighting {
            Lighting::Pulsing(light) => {
                assert_eq!(light.position, Vec3::new(0.0, 2.0, 0.0));
                assert_eq!(light.frequencies, Vec3::new(2.0, 0.7, 1.3));
            }
            other => panic!("unexpected lighting {other:?}"),
        }
        assert_eq!(config.camera.speed, 5.0);
        assert_eq!(config.camera.build().speed, 5.0);
    }

    #[test]
    fn rejects_too_many_point_lights() {
        let mut multi = MultiLight::default();
        multi.point_lights.push(PointLight::at(Vec3::ONE));
        let config = SceneConfig {
            lighting: Lighting::MultiLight(multi),
            ..SceneConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooManyPointLights { count: 5, max: 4 })
        ));
    }

    #[test]
    fn rejects_degenerate_values() {
        let mut config = SceneConfig::default();
        config.cubes.rotation_axis = Vec3::ZERO;
        assert!(matches!(config.validate(), Err(ConfigError::RotationAxis(_))));

        let config = SceneConfig {
            lamp_scale: 0.0,
            ..SceneConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::LampScale(_))));
    }

    #[test]
    fn rejects_non_finite_values() {
        for axis in [
            Vec3::new(f32::NAN, 0.3, 0.5),
            Vec3::new(f32::INFINITY, 0.0, 0.0),
            Vec3::splat(1e30),
        ] {
            let mut config = SceneConfig::default();
            config.cubes.rotation_axis = axis;
            assert!(
                matches!(config.validate(), Err(ConfigError::RotationAxis(_))),
                "{axis:?}"
            );
        }

        for lamp_scale in [f32::NAN, f32::INFINITY] {
            let config = SceneConfig {
                lamp_scale,
                ..SceneConfig::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::LampScale(_))));
        }
    }

    #[test]
    fn nan_axis_in_yaml_is_rejected() {
        let err = SceneConfig::from_yaml("cubes:\n  rotation_axis: [.nan, 0.3, 0.5]\n").unwrap_err();
        assert!(matches!(err, ConfigError::RotationAxis(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "lamp_scale: 0.3").unwrap();
        let config = SceneConfig::load(file.path()).unwrap();
        assert_eq!(config.lamp_scale, 0.3);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = SceneConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
