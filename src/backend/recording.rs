//! A headless backend that records every call it receives.

use std::collections::HashMap;

use cgmath::{Matrix4, Vector3};

use crate::{
    backend::{BufferHandle, DrawCall, ProgramLog, RenderBackend, TextureHandle},
    resources::texture::MipLevel,
};

#[derive(Clone, Debug, PartialEq)]
pub enum BackendEvent {
    VertexBuffer { handle: BufferHandle, label: String, len: usize },
    IndexBuffer { handle: BufferHandle, label: String, len: usize },
    Texture { handle: TextureHandle, label: String, levels: usize },
    Program,
    BeginFrame([f64; 4]),
    Camera { eye: Matrix4<f32>, pv: Matrix4<f32> },
    Light(Vector3<f32>),
    Blending(bool),
    Draw(DrawCall),
    EndFrame,
}

/// Keeps uploaded data and an ordered event log instead of touching a GPU.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub events: Vec<BackendEvent>,
    vertex_data: HashMap<BufferHandle, Vec<f32>>,
    index_data: HashMap<BufferHandle, Vec<u16>>,
    texture_data: HashMap<TextureHandle, Vec<MipLevel>>,
    next_buffer: u32,
    next_texture: u32,
    blending: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn vertex_data(&self, handle: BufferHandle) -> Option<&[f32]> {
        self.vertex_data.get(&handle).map(Vec::as_slice)
    }

    pub fn index_data(&self, handle: BufferHandle) -> Option<&[u16]> {
        self.index_data.get(&handle).map(Vec::as_slice)
    }

    pub fn texture_levels(&self, handle: TextureHandle) -> Option<&[MipLevel]> {
        self.texture_data.get(&handle).map(Vec::as_slice)
    }

    pub fn blending(&self) -> bool {
        self.blending
    }

    /// Draw calls in submission order.
    pub fn draws(&self) -> Vec<&DrawCall> {
        self.events
            .iter()
            .filter_map(|event| match event {
                BackendEvent::Draw(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    /// Names of drawn objects in submission order.
    pub fn drawn_names(&self) -> Vec<&str> {
        self.draws().into_iter().map(|call| call.object.as_str()).collect()
    }

    /// Number of buffer uploads whose label starts with `prefix`.
    pub fn buffer_uploads(&self, prefix: &str) -> usize {
        self.events
            .iter()
            .filter(|event| match event {
                BackendEvent::VertexBuffer { label, .. } | BackendEvent::IndexBuffer { label, .. } => {
                    label.starts_with(prefix)
                }
                _ => false,
            })
            .count()
    }

    pub fn texture_uploads(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, BackendEvent::Texture { .. }))
            .count()
    }

    fn next_buffer(&mut self) -> BufferHandle {
        let handle = BufferHandle(self.next_buffer);
        self.next_buffer += 1;
        handle
    }
}

impl RenderBackend for RecordingBackend {
    fn create_vertex_buffer(&mut self, label: &str, data: &[f32]) -> BufferHandle {
        let handle = self.next_buffer();
        self.vertex_data.insert(handle, data.to_vec());
        self.events.push(BackendEvent::VertexBuffer {
            handle,
            label: label.to_string(),
            len: data.len(),
        });
        handle
    }

    fn create_index_buffer(&mut self, label: &str, data: &[u16]) -> BufferHandle {
        let handle = self.next_buffer();
        self.index_data.insert(handle, data.to_vec());
        self.events.push(BackendEvent::IndexBuffer {
            handle,
            label: label.to_string(),
            len: data.len(),
        });
        handle
    }

    fn create_texture(&mut self, label: &str, levels: &[MipLevel]) -> TextureHandle {
        let handle = TextureHandle(self.next_texture);
        self.next_texture += 1;
        self.texture_data.insert(handle, levels.to_vec());
        self.events.push(BackendEvent::Texture {
            handle,
            label: label.to_string(),
            levels: levels.len(),
        });
        handle
    }

    fn compile_program(&mut self) -> ProgramLog {
        self.events.push(BackendEvent::Program);
        ProgramLog::default()
    }

    fn begin_frame(&mut self, clear: [f64; 4]) {
        self.events.push(BackendEvent::BeginFrame(clear));
    }

    fn set_camera(&mut self, eye: Matrix4<f32>, pv: Matrix4<f32>) {
        self.events.push(BackendEvent::Camera { eye, pv });
    }

    fn set_light(&mut self, direction: Vector3<f32>) {
        self.events.push(BackendEvent::Light(direction));
    }

    fn set_blending(&mut self, enabled: bool) {
        self.blending = enabled;
        self.events.push(BackendEvent::Blending(enabled));
    }

    fn draw(&mut self, call: &DrawCall) {
        self.events.push(BackendEvent::Draw(call.clone()));
    }

    fn end_frame(&mut self) -> anyhow::Result<()> {
        self.events.push(BackendEvent::EndFrame);
        Ok(())
    }
}
