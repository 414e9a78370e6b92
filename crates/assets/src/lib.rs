//! Asset loading for the viewer.
//!
//! Decoding is delegated to the `gltf` and `image` crates; this crate only
//! converts their output into flat vertex/index/texture data ready for upload.
//!
//! # Layout
//! - [`mesh`]: vertex format and per-mesh texture references.
//! - [`texture`]: RGBA8 images.
//! - [`model`]: glTF import.
//! - [`primitives`]: built-in geometry.

pub mod mesh;
pub mod model;
pub mod primitives;
pub mod texture;

pub use mesh::{MeshData, TextureKind, TextureRef, Vertex};
pub use model::{ModelData, load_model};
pub use texture::{TextureImage, load_texture};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("mesh `{0}` has no vertex positions")]
    MissingPositions(String),
    #[error("unsupported image format {0}")]
    UnsupportedImageFormat(String),
}

pub fn crate_info() -> &'static str {
    "phongview-assets v0.1.0"
}
