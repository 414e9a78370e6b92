use crate::AssetError;
use crate::mesh::{MeshData, TextureKind, TextureRef, Vertex};
use crate::texture::TextureImage;
use std::path::Path;

/// A multi-mesh model with the images its meshes reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelData {
    pub meshes: Vec<MeshData>,
    pub images: Vec<TextureImage>,
}

impl ModelData {
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertices.len()).sum()
    }

    pub fn index_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len()).sum()
    }
}

/// Import a glTF/GLB file, one [`MeshData`] per primitive.
///
/// Missing normals default to +Y, missing UVs to the origin and missing
/// indices to a sequential list. The base colour texture becomes the
/// diffuse map.
pub fn load_model(path: impl AsRef<Path>) -> Result<ModelData, AssetError> {
    let path = path.as_ref();
    let (document, buffers, images) = gltf::import(path)?;

    let images = images
        .iter()
        .map(TextureImage::from_gltf)
        .collect::<Result<Vec<_>, _>>()?;

    let mut meshes = Vec::new();
    for mesh in document.meshes() {
        let name = mesh.name().unwrap_or("unnamed mesh");
        for (i, primitive) in mesh.primitives().enumerate() {
            let reader =
                primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .ok_or_else(|| AssetError::MissingPositions(name.to_string()))?
                .collect();
            let normals: Vec<[f32; 3]> = match reader.read_normals() {
                Some(iter) => iter.collect(),
                None => vec![[0.0, 1.0, 0.0]; positions.len()],
            };
            let tex_coords: Vec<[f32; 2]> = match reader.read_tex_coords(0) {
                Some(iter) => iter.into_f32().collect(),
                None => vec![[0.0, 0.0]; positions.len()],
            };

            let vertices: Vec<Vertex> = positions
                .iter()
                .zip(normals.iter().chain(std::iter::repeat(&[0.0, 1.0, 0.0])))
                .zip(tex_coords.iter().chain(std::iter::repeat(&[0.0, 0.0])))
                .map(|((position, normal), tex_coords)| Vertex {
                    position: *position,
                    normal: *normal,
                    tex_coords: *tex_coords,
                })
                .collect();

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..vertices.len() as u32).collect(),
            };

            let mut data = MeshData::new(format!("{name}#{i}"), vertices, indices);
            if let Some(info) = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_texture()
            {
                data.textures.push(TextureRef {
                    kind: TextureKind::Diffuse,
                    image: info.texture().source().index(),
                });
            }
            meshes.push(data);
        }
    }

    let model = ModelData { meshes, images };
    tracing::info!(
        path = %path.display(),
        meshes = model.meshes.len(),
        vertices = model.vertex_count(),
        images = model.images.len(),
        "model loaded"
    );
    Ok(model)
}
