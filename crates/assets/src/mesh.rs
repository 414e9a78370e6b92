use bytemuck::{Pod, Zeroable};

/// Interleaved vertex: position, normal, texture coordinates.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

/// Role a texture plays in the Phong material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
}

/// A texture bound to a mesh, by index into the owning model's images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRef {
    pub kind: TextureKind,
    pub image: usize,
}

/// Default specular exponent for imported meshes.
pub const DEFAULT_SHININESS: f32 = 16.0;

/// Triangle-list geometry with its texture bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub textures: Vec<TextureRef>,
    pub shininess: f32,
}

impl MeshData {
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            vertices,
            indices,
            textures: Vec::new(),
            shininess: DEFAULT_SHININESS,
        }
    }

    /// First texture of the given kind; later ones of the same kind are unused
    /// by the single-map shader.
    pub fn texture(&self, kind: TextureKind) -> Option<usize> {
        self.textures
            .iter()
            .find(|t| t.kind == kind)
            .map(|t| t.image)
    }
}
