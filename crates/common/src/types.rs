use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Direction of a discrete camera translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

impl CameraMovement {
    /// All movements in the order the dispatcher samples them.
    pub const ALL: [CameraMovement; 4] = [
        CameraMovement::Forward,
        CameraMovement::Backward,
        CameraMovement::Left,
        CameraMovement::Right,
    ];
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Model matrix: translation * rotation * scale.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn matrix_scales_before_translating() {
        let t = Transform {
            position: Vec3::new(0.0, -1.75, 0.0),
            scale: Vec3::splat(0.2),
            ..Transform::default()
        };
        let p = t.matrix().transform_point3(Vec3::new(5.0, 5.0, 5.0));
        assert!(p.abs_diff_eq(Vec3::new(1.0, -0.75, 1.0), 1e-5));
    }

    #[test]
    fn movement_order_is_stable() {
        assert_eq!(CameraMovement::ALL[0], CameraMovement::Forward);
        assert_eq!(CameraMovement::ALL[3], CameraMovement::Right);
    }
}
