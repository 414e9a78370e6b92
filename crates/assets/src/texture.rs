use crate::AssetError;
use std::path::Path;

/// Decoded RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// A 1x1 texture of a single colour.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }

    /// Convert decoded glTF image data to RGBA8.
    pub fn from_gltf(data: &gltf::image::Data) -> Result<Self, AssetError> {
        use gltf::image::Format;

        let rgba = match data.format {
            Format::R8G8B8A8 => data.pixels.clone(),
            Format::R8G8B8 => data
                .pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
            Format::R8G8 => data
                .pixels
                .chunks_exact(2)
                .flat_map(|p| [p[0], p[0], p[0], p[1]])
                .collect(),
            Format::R8 => data.pixels.iter().flat_map(|&l| [l, l, l, 255]).collect(),
            other => return Err(AssetError::UnsupportedImageFormat(format!("{other:?}"))),
        };
        Ok(Self {
            width: data.width,
            height: data.height,
            rgba,
        })
    }
}

/// Decode an image file (any format the `image` crate understands) to RGBA8.
pub fn load_texture(path: impl AsRef<Path>) -> Result<TextureImage, AssetError> {
    let path = path.as_ref();
    let image = image::open(path)?.to_rgba8();
    let (width, height) = image.dimensions();
    tracing::debug!(path = %path.display(), width, height, "texture decoded");
    Ok(TextureImage {
        width,
        height,
        rgba: image.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_is_one_pixel() {
        let t = TextureImage::solid([255, 0, 0, 255]);
        assert_eq!((t.width, t.height), (1, 1));
        assert_eq!(t.rgba, vec![255, 0, 0, 255]);
    }

    #[test]
    fn load_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checker.png");
        let mut img = image::RgbaImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 1, image::Rgba([10, 20, 30, 40]));
        img.save(&path).unwrap();

        let texture = load_texture(&path).unwrap();
        assert_eq!((texture.width, texture.height), (2, 2));
        assert_eq!(texture.rgba.len(), 16);
        assert_eq!(&texture.rgba[12..16], &[10, 20, 30, 40]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_texture(dir.path().join("nope.png")).is_err());
    }

    #[test]
    fn gltf_rgb_gains_opaque_alpha() {
        let data = gltf::image::Data {
            pixels: vec![1, 2, 3, 4, 5, 6],
            format: gltf::image::Format::R8G8B8,
            width: 2,
            height: 1,
        };
        let texture = TextureImage::from_gltf(&data).unwrap();
        assert_eq!(texture.rgba, vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn gltf_16_bit_is_rejected() {
        let data = gltf::image::Data {
            pixels: vec![0; 8],
            format: gltf::image::Format::R16G16B16A16,
            width: 1,
            height: 1,
        };
        assert!(matches!(
            TextureImage::from_gltf(&data),
            Err(AssetError::UnsupportedImageFormat(_))
        ));
    }
}
