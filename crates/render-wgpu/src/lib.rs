//! wgpu render backend for the viewer.
//!
//! Executes [`phongview_render::DrawList`]s with two programs: a Phong-lit
//! program for cubes and models, and a flat-colour program for lamp markers.
//!
//! # Invariants
//! - The renderer never mutates camera, input or scene state.
//! - A draw uses the uniform values written before it in the draw list.
//! - Missing textures fall back to 1x1 white; missing uniforms are skipped.

mod gpu;
mod mesh;
mod program;
mod replay;
pub mod shaders;
mod texture;

pub use gpu::WgpuRenderer;

/// Fatal errors from GPU setup or presentation.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

pub fn crate_info() -> &'static str {
    "phongview-render-wgpu v0.1.0"
}
