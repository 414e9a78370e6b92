//! Renderer-agnostic core of the viewer.
//!
//! # Invariants
//! - The camera basis is derived only from yaw/pitch and is always orthonormal.
//! - Lighting uniforms are a pure function of time, camera and configuration.
//! - Backends only execute [`DrawList`]s; they never mutate camera or scene.

pub mod camera;
pub mod config;
pub mod draw;
pub mod frame;
pub mod layout;
pub mod lighting;
mod renderer;
pub mod scene;
pub mod uniform;

pub use camera::FlyCamera;
pub use config::{ConfigError, SceneConfig};
pub use draw::{DrawCommand, DrawList, ProgramKind, RenderableId};
pub use frame::{Frame, FrameClock, FrameLoop, LoopState};
pub use layout::{StructLayout, UniformBlock, UniformError, UniformLayout};
pub use lighting::{Lighting, MAX_POINT_LIGHTS};
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::{Scene, SceneRenderables};
pub use uniform::{UniformKind, UniformSet, UniformValue, UniformWriter};

pub fn crate_info() -> &'static str {
    "phongview-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
