//! The rendering collaborator.
//!
//! The frame renderer never talks to wgpu directly. It uploads geometry and
//! textures, pushes per-frame uniforms and issues [`DrawCall`]s through the
//! [`RenderBackend`] trait. [`crate::context::Context`] implements it on top
//! of wgpu; [`recording::RecordingBackend`] records every call for tests and
//! headless tooling.

pub mod recording;

use cgmath::{Matrix4, Vector3};

use crate::{
    data_structures::object::{Mode, ObjectState},
    resources::{ModelBuffers, texture::MipLevel},
};

/// Opaque handle to a vertex or index buffer owned by a backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

/// Opaque handle to a texture owned by a backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Result of building the shader program, one message per stage.
///
/// `None` means the stage compiled without diagnostics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgramLog {
    pub vertex: Option<String>,
    pub fragment: Option<String>,
    pub program: Option<String>,
}

impl ProgramLog {
    pub fn is_ok(&self) -> bool {
        self.vertex.is_none() && self.fragment.is_none() && self.program.is_none()
    }
}

/// Everything needed to draw one object once.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub object: String,
    pub model: Matrix4<f32>,
    pub inverse_model: Matrix4<f32>,
    /// `[smooth, lit, 0, 0]`
    pub shading: [f32; 4],
    /// `[w, h, is_billboard, 0]`
    pub billboard: [f32; 4],
    /// Base color; a zero alpha selects the bound texture instead.
    pub color: [f32; 4],
    pub texture: Option<TextureHandle>,
    pub buffers: ModelBuffers,
    pub mode: Mode,
    /// Number of indices when `indexed`, otherwise number of vertices.
    pub count: u32,
    pub indexed: bool,
}

/// The graphics API binding used by the scene.
pub trait RenderBackend {
    fn create_vertex_buffer(&mut self, label: &str, data: &[f32]) -> BufferHandle;

    fn create_index_buffer(&mut self, label: &str, data: &[u16]) -> BufferHandle;

    /// Upload a prepared mip chain, level 0 first.
    fn create_texture(&mut self, label: &str, levels: &[MipLevel]) -> TextureHandle;

    /// Build the fixed shader program. Failures are reported, never fatal.
    fn compile_program(&mut self) -> ProgramLog;

    /// Start a frame, clearing color to `clear` and depth to far.
    fn begin_frame(&mut self, clear: [f64; 4]);

    /// `eye` is the camera's world matrix, `pv` projection times view.
    fn set_camera(&mut self, eye: Matrix4<f32>, pv: Matrix4<f32>);

    fn set_light(&mut self, direction: Vector3<f32>);

    /// Toggle source-alpha blending for the following draws.
    fn set_blending(&mut self, enabled: bool);

    fn draw(&mut self, call: &DrawCall);

    /// Submit everything recorded since `begin_frame`.
    fn end_frame(&mut self) -> anyhow::Result<()>;
}

/// Draws objects tagged with a renderer name instead of the default draw.
///
/// The call is fully prepared (matrices, shading, buffers); implementations
/// may alter a copy of it and forward it to `backend`, issue several draws or
/// none at all.
pub trait CustomRenderer {
    fn render(&self, object: &ObjectState, call: &DrawCall, backend: &mut dyn RenderBackend);
}

impl<F> CustomRenderer for F
where
    F: Fn(&ObjectState, &DrawCall, &mut dyn RenderBackend),
{
    fn render(&self, object: &ObjectState, call: &DrawCall, backend: &mut dyn RenderBackend) {
        self(object, call, backend)
    }
}
