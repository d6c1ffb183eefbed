//! GPU resources shared between objects: one set of buffers per model type
//! and one texture per texture identity, built on first use and never rebuilt.

use std::collections::HashMap;

use crate::{
    backend::{BufferHandle, RenderBackend, TextureHandle},
    data_structures::{model::Model, texture::TextureImage},
    error::{Result, SceneError},
};

pub mod geometry;
pub mod mesh;
pub mod texture;

/// Backend handles of a model's buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelBuffers {
    pub vertices: BufferHandle,
    pub uv: Option<BufferHandle>,
    pub indices: Option<BufferHandle>,
    pub normals: Option<BufferHandle>,
    pub vertex_count: u32,
    pub index_count: u32,
}

#[derive(Debug)]
pub struct ResourceCache {
    models: HashMap<String, Model>,
    buffers: HashMap<String, ModelBuffers>,
    textures: HashMap<String, TextureHandle>,
}

impl ResourceCache {
    /// A cache knowing the built-in models. Nothing is uploaded yet.
    pub fn new() -> Self {
        let models = [
            ("plane", geometry::plane()),
            ("cube", geometry::cube()),
            ("pyramid", geometry::pyramid()),
            ("sphere", geometry::sphere(geometry::SPHERE_PRECISION)),
        ]
        .into_iter()
        .map(|(name, model)| (name.to_string(), model))
        .collect();
        Self {
            models,
            buffers: HashMap::new(),
            textures: HashMap::new(),
        }
    }

    /// Register (or replace) the geometry of a model type.
    ///
    /// Returns false and keeps the old geometry when buffers were already
    /// built for `name`; built buffers are never rebuilt.
    pub fn register_model(&mut self, name: &str, model: Model) -> bool {
        if self.buffers.contains_key(name) {
            log::warn!(
                "Model '{}' is already uploaded, ignoring the new geometry.",
                name
            );
            return false;
        }
        self.models.insert(name.to_string(), model);
        true
    }

    pub fn has_model(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    pub fn buffers(&self, name: &str) -> Option<ModelBuffers> {
        self.buffers.get(name).copied()
    }

    pub fn texture(&self, id: &str) -> Option<TextureHandle> {
        self.textures.get(id).copied()
    }

    /// Forget every texture identity so the next use uploads again.
    pub fn clear_textures(&mut self) {
        self.textures.clear();
    }

    /// Upload the buffers of model `name` unless that already happened.
    ///
    /// Explicit model normals are uploaded as the normals buffer. Without
    /// them, indexed models get synthesized smooth normals when
    /// `smooth_normals` is set.
    pub fn ensure_model_buffers(
        &mut self,
        name: &str,
        backend: &mut dyn RenderBackend,
        smooth_normals: bool,
    ) -> Result<ModelBuffers> {
        if let Some(buffers) = self.buffers.get(name) {
            return Ok(*buffers);
        }
        let model = self
            .models
            .get(name)
            .ok_or_else(|| SceneError::UnknownModel(name.to_string()))?;

        log::debug!("Building buffers of model '{}'", name);
        let vertices = backend.create_vertex_buffer(&format!("{name} vertices"), &model.vertices);
        let uv = model
            .uv
            .as_ref()
            .map(|uv| backend.create_vertex_buffer(&format!("{name} uv"), uv));
        let indices = model
            .indices
            .as_ref()
            .map(|indices| backend.create_index_buffer(&format!("{name} indices"), indices));
        let normals = match (&model.normals, &model.indices) {
            (Some(normals), _) => Some(backend.create_vertex_buffer(&format!("{name} normals"), normals)),
            (None, Some(indices)) if smooth_normals => {
                log::debug!("Computing smooth normals of model '{}'", name);
                let normals = mesh::smooth_normals(&model.vertices, indices);
                Some(backend.create_vertex_buffer(&format!("{name} normals"), &normals))
            }
            _ => None,
        };

        let buffers = ModelBuffers {
            vertices,
            uv,
            indices,
            normals,
            vertex_count: model.vertex_count(),
            index_count: model.indices.as_ref().map_or(0, |indices| indices.len() as u32),
        };
        self.buffers.insert(name.to_string(), buffers);
        Ok(buffers)
    }

    /// Upload `image` unless a texture with the same identity exists.
    pub fn ensure_texture(
        &mut self,
        image: &TextureImage,
        backend: &mut dyn RenderBackend,
    ) -> Result<TextureHandle> {
        if let Some(handle) = self.textures.get(&image.id) {
            return Ok(*handle);
        }
        let levels = texture::prepare_levels(image)?;
        log::debug!(
            "Uploading texture '{}' ({}x{}, {} levels)",
            image.id,
            image.width,
            image.height,
            levels.len()
        );
        let handle = backend.create_texture(&image.id, &levels);
        self.textures.insert(image.id.clone(), handle);
        Ok(handle)
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new()
    }
}
