//! CPU side texture preparation: premultiplied alpha, vertical flip and the
//! mip chain, done once per texture identity before upload.

use image::{RgbaImage, imageops};

use crate::{
    data_structures::texture::TextureImage,
    error::{Result, SceneError},
};

/// One level of a mip chain, tightly packed RGBA8.
#[derive(Clone, Debug, PartialEq)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Number of levels down to 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Multiply each color channel by its alpha.
pub fn premultiply_alpha(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        let a = px[3] as u32;
        for c in &mut px[..3] {
            *c = ((*c as u32 * a + 127) / 255) as u8;
        }
    }
}

/// Build the full upload-ready mip chain of `image`.
///
/// Level 0 is the premultiplied, vertically flipped source: texture
/// coordinates address the image bottom row first. Every further level halves
/// both dimensions (never below 1) with a triangle filter.
pub fn prepare_levels(image: &TextureImage) -> Result<Vec<MipLevel>> {
    let mut pixels = image.pixels.to_vec();
    premultiply_alpha(&mut pixels);
    let base = RgbaImage::from_raw(image.width, image.height, pixels).ok_or_else(|| {
        SceneError::InvalidTexture {
            id: image.id.clone(),
            reason: "pixel buffer does not match dimensions".to_string(),
        }
    })?;
    let mut current = imageops::flip_vertical(&base);

    let count = mip_level_count(image.width, image.height);
    let mut levels = Vec::with_capacity(count as usize);
    for level in 0..count {
        if level > 0 {
            let width = (current.width() / 2).max(1);
            let height = (current.height() / 2).max(1);
            current = imageops::resize(&current, width, height, imageops::FilterType::Triangle);
        }
        levels.push(MipLevel {
            width: current.width(),
            height: current.height(),
            pixels: current.as_raw().clone(),
        });
    }
    Ok(levels)
}

/// Read and decode an image file from disk.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_texture(id: &str, path: impl AsRef<std::path::Path>) -> anyhow::Result<TextureImage> {
    let bytes = std::fs::read(path.as_ref())?;
    Ok(TextureImage::from_bytes(id, &bytes)?)
}
