//! Texture images and GPU textures.
//!
//! [`TextureImage`] is the caller-facing descriptor: an identity plus RGBA8
//! pixels. Objects referencing the same `id` share one GPU texture.
//! [`Texture`] wraps the wgpu objects created for an image (or the depth
//! buffer) by the wgpu [`Context`](crate::context::Context).

use std::sync::Arc;

use crate::{
    error::{Result, SceneError},
    resources::texture::MipLevel,
};

/// Pixel data for a texture, keyed by a caller supplied identity.
///
/// Pixels are straight (not premultiplied) RGBA8, top row first. Cloning is
/// cheap: the pixel buffer is shared.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureImage {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
}

impl TextureImage {
    pub fn from_rgba(
        id: impl Into<String>,
        width: u32,
        height: u32,
        pixels: impl Into<Arc<[u8]>>,
    ) -> Result<Self> {
        let id = id.into();
        let pixels = pixels.into();
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(SceneError::InvalidTexture {
                id,
                reason: format!(
                    "expected {expected} bytes for {width}x{height} RGBA, got {}",
                    pixels.len()
                ),
            });
        }
        Ok(Self {
            id,
            width,
            height,
            pixels,
        })
    }

    /// Decode an encoded image file (png, jpeg).
    pub fn from_bytes(id: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let id = id.into();
        let img = image::load_from_memory(bytes).map_err(|e| SceneError::InvalidTexture {
            id: id.clone(),
            reason: e.to_string(),
        })?;
        Self::from_image(id, &img)
    }

    pub fn from_image(id: impl Into<String>, img: &image::DynamicImage) -> Result<Self> {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(id, width, height, rgba.into_raw())
    }
}

/// A GPU texture with a view and optional sampler.
#[derive(Clone, Debug)]
pub struct Texture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: Option<wgpu::Sampler>,
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            sampler: None,
        }
    }

    /// Upload an already prepared mip chain. Level 0 must come first.
    pub fn from_levels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        levels: &[MipLevel],
        label: &str,
    ) -> Self {
        let (width, height) = levels
            .first()
            .map(|level| (level.width, level.height))
            .unwrap_or((1, 1));
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: levels.len().max(1) as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            // Pixels are premultiplied on the CPU, so no sRGB decode here.
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in levels.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                },
                &level.pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level.width),
                    rows_per_image: Some(level.height),
                },
                wgpu::Extent3d {
                    width: level.width,
                    height: level.height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = Some(create_default_sampler(device));
        Self {
            texture,
            view,
            sampler,
        }
    }
}

pub fn create_default_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
