use glam::{Mat4, Vec3};
use phongview_common::CameraMovement;

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_SPEED: f32 = 2.5;
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_ZOOM: f32 = 45.0;

/// Pitch stays strictly inside +-89 degrees so the up vector never flips.
pub const MAX_PITCH: f32 = 88.999;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 45.0;

/// Free-fly camera driven by Euler angles in degrees.
///
/// `front`, `right` and `up` are derived from yaw/pitch and recomputed on
/// every orientation change; they always form a right-handed orthonormal basis.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    zoom: f32,
    pub speed: f32,
    pub sensitivity: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0))
    }
}

impl FlyCamera {
    pub fn new(position: Vec3) -> Self {
        Self::with_orientation(position, Vec3::Y, DEFAULT_YAW, DEFAULT_PITCH)
    }

    pub fn with_orientation(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: world_up.normalize_or(Vec3::Y),
            yaw,
            pitch: pitch.clamp(-MAX_PITCH, MAX_PITCH),
            zoom: DEFAULT_ZOOM,
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            near: 0.1,
            far: 100.0,
        };
        camera.update_vectors();
        camera
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Translate along the view basis. Negative `delta_time` is treated as zero.
    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.speed * delta_time.max(0.0);
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    /// Rotate by a cursor delta in pixels, scaled by `sensitivity`.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.sensitivity;
        self.pitch = (self.pitch + y_offset * self.sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
        self.update_vectors();
    }

    /// Scrolling up (positive) narrows the field of view.
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_orthonormal(cam: &FlyCamera) {
        for v in [cam.front(), cam.up(), cam.right()] {
            assert!((v.length() - 1.0).abs() < EPS, "not unit: {v}");
        }
        assert!(cam.front().dot(cam.up()).abs() < EPS);
        assert!(cam.front().dot(cam.right()).abs() < EPS);
        assert!(cam.up().dot(cam.right()).abs() < EPS);
        assert!(cam.right().cross(cam.up()).abs_diff_eq(-cam.front(), 1e-4));
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = FlyCamera::default();
        assert!(cam.front().abs_diff_eq(Vec3::NEG_Z, EPS));
        assert!(cam.right().abs_diff_eq(Vec3::X, EPS));
        assert!(cam.up().abs_diff_eq(Vec3::Y, EPS));
        assert_orthonormal(&cam);
    }

    #[test]
    fn forward_one_second_at_default_speed() {
        let mut cam = FlyCamera::default();
        cam.process_keyboard(CameraMovement::Forward, 1.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), EPS));
    }

    #[test]
    fn strafing_leaves_orientation_alone() {
        let mut cam = FlyCamera::default();
        let front = cam.front();
        cam.process_keyboard(CameraMovement::Right, 2.0);
        cam.process_keyboard(CameraMovement::Left, 1.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(2.5, 0.0, 3.0), EPS));
        assert_eq!(cam.front(), front);
    }

    #[test]
    fn opposing_moves_cancel() {
        let mut cam = FlyCamera::default();
        cam.process_keyboard(CameraMovement::Forward, 0.25);
        cam.process_keyboard(CameraMovement::Backward, 0.25);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), EPS));
    }

    #[test]
    fn negative_delta_time_does_not_move() {
        let mut cam = FlyCamera::default();
        cam.process_keyboard(CameraMovement::Forward, -3.0);
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn pitch_is_clamped_below_89() {
        let mut cam = FlyCamera::with_orientation(Vec3::ZERO, Vec3::Y, -90.0, 85.0);
        cam.sensitivity = 1.0;
        cam.process_mouse_movement(0.0, 10.0);
        assert!(cam.pitch() < 89.0);
        assert!(cam.pitch() > 88.9);
        cam.process_mouse_movement(0.0, -400.0);
        assert!(cam.pitch() > -89.0);
        assert_orthonormal(&cam);
    }

    #[test]
    fn basis_stays_orthonormal_after_many_moves() {
        let mut cam = FlyCamera::default();
        let deltas = [
            (13.0, 7.0),
            (-250.0, 900.0),
            (0.5, -0.25),
            (3000.0, -3000.0),
            (-17.0, 42.0),
        ];
        for (dx, dy) in deltas {
            cam.process_mouse_movement(dx, dy);
            assert!(cam.pitch() > -89.0 && cam.pitch() < 89.0);
            assert_orthonormal(&cam);
        }
    }

    #[test]
    fn zoom_stays_in_range() {
        let mut cam = FlyCamera::default();
        for offset in [3.0, 100.0, -7.5, -200.0, 0.25, 44.0] {
            cam.process_mouse_scroll(offset);
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&cam.zoom()));
        }
    }

    #[test]
    fn scroll_up_narrows_fov() {
        let mut cam = FlyCamera::default();
        cam.process_mouse_scroll(5.0);
        assert_eq!(cam.zoom(), 40.0);
    }

    #[test]
    fn view_matrix_round_trips_through_inverse() {
        let mut cam = FlyCamera::new(Vec3::new(1.5, -2.0, 7.0));
        cam.process_mouse_movement(123.0, -45.0);
        let view = cam.view_matrix();
        assert!((view * view.inverse()).abs_diff_eq(Mat4::IDENTITY, 1e-4));
        assert!((view.inverse() * view).abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn view_matrix_moves_eye_to_origin() {
        let cam = FlyCamera::new(Vec3::new(4.0, 5.0, 6.0));
        let eye = cam.view_matrix().transform_point3(cam.position);
        assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-4));
    }

    #[test]
    fn projection_uses_zoom_as_vertical_fov() {
        let cam = FlyCamera::default();
        let proj = cam.projection_matrix(800.0 / 600.0);
        let expected = Mat4::perspective_rh(45.0_f32.to_radians(), 800.0 / 600.0, 0.1, 100.0);
        assert!(proj.abs_diff_eq(expected, 1e-6));
        assert!(!cam.view_projection(1.0).col(0).x.is_nan());
    }
}
