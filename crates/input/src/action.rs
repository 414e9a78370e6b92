use glam::Vec2;
use phongview_common::CameraMovement;

/// A high-level action produced from raw input.
///
/// The frame loop consumes actions, never raw input events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Translate the camera for one frame.
    Move(CameraMovement),
    /// Rotate the camera by a cursor delta in pixels.
    Look(Vec2),
    /// Change the field of view by a scroll amount.
    Zoom(f32),
    /// The framebuffer changed size.
    Resize { width: u32, height: u32 },
    /// Leave the frame loop after the current iteration.
    Exit,
}
