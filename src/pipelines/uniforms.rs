//! Uniform layouts shared with `scene.wgsl` and the batched per-object
//! uniform buffer.

use std::mem;

use bytemuck::Pod;
use cgmath::{Matrix4, Vector3};

use crate::{backend::DrawCall, camera::OPENGL_TO_WGPU_MATRIX};

/// Per-frame data, bound once at group 0.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pv: [[f32; 4]; 4],
    eye: [[f32; 4]; 4],
    light: [f32; 4],
}

impl FrameUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            pv: Matrix4::identity().into(),
            eye: Matrix4::identity().into(),
            light: [0.0; 4],
        }
    }

    /// `pv` uses GL clip depth and is remapped to the wgpu range here.
    pub fn set_camera(&mut self, eye: Matrix4<f32>, pv: Matrix4<f32>) {
        self.eye = eye.into();
        self.pv = (OPENGL_TO_WGPU_MATRIX * pv).into();
    }

    pub fn set_light(&mut self, direction: Vector3<f32>) {
        self.light = [direction.x, direction.y, direction.z, 0.0];
    }
}

impl Default for FrameUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-object data, bound at group 1 with a dynamic offset.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    model: [[f32; 4]; 4],
    inverse_model: [[f32; 4]; 4],
    color: [f32; 4],
    shading: [f32; 4],
    billboard: [f32; 4],
}

impl From<&DrawCall> for ObjectUniform {
    fn from(call: &DrawCall) -> Self {
        Self {
            model: call.model.into(),
            inverse_model: call.inverse_model.into(),
            color: call.color,
            shading: call.shading,
            billboard: call.billboard,
        }
    }
}

/// Accumulates one uniform entry per draw on the CPU and writes them to the
/// GPU in a single `write_buffer` call.
///
/// Entries are padded to the device's uniform offset alignment so each one
/// can be selected with a dynamic offset.
pub struct DynamicUniformBuffer<T: Pod> {
    data: Vec<u8>,
    buffer: wgpu::Buffer,
    capacity: u64,
    aligned_size: u64,
    count: usize,
    label: &'static str,
    _marker: std::marker::PhantomData<T>,
}

impl<T: Pod> DynamicUniformBuffer<T> {
    pub fn new(device: &wgpu::Device, label: &'static str) -> Self {
        Self::with_capacity(device, label, 256)
    }

    pub fn with_capacity(device: &wgpu::Device, label: &'static str, initial_capacity: usize) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let aligned_size = (mem::size_of::<T>() as u64).div_ceil(alignment) * alignment;
        let capacity = aligned_size * initial_capacity.max(1) as u64;
        let buffer = create_uniform_buffer(device, label, capacity);

        Self {
            data: Vec::with_capacity(capacity as usize),
            buffer,
            capacity,
            aligned_size,
            count: 0,
            label,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn aligned_size(&self) -> u64 {
        self.aligned_size
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.count = 0;
    }

    /// Append an entry and return its byte offset.
    pub fn push(&mut self, value: &T) -> u32 {
        let offset = (self.count as u64 * self.aligned_size) as u32;
        let bytes = bytemuck::bytes_of(value);
        self.data.extend_from_slice(bytes);
        let padding = self.aligned_size as usize - bytes.len();
        self.data.extend(std::iter::repeat_n(0u8, padding));
        self.count += 1;
        offset
    }

    /// Write all entries to the GPU. Returns true when the buffer had to be
    /// reallocated, which invalidates bind groups referencing it.
    pub fn flush(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> bool {
        if self.data.is_empty() {
            return false;
        }
        let required = self.data.len() as u64;
        let reallocated = required > self.capacity;
        if reallocated {
            let mut capacity = self.capacity;
            while capacity < required {
                capacity *= 2;
            }
            self.buffer = create_uniform_buffer(device, self.label, capacity);
            self.capacity = capacity;
        }
        queue.write_buffer(&self.buffer, 0, &self.data);
        reallocated
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

fn create_uniform_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
