//! The wgpu rendering context.
//!
//! [`Context`] owns the surface, device and queue and implements
//! [`RenderBackend`]: draw calls are recorded during a frame and replayed in
//! a single render pass when the frame ends.

use std::{collections::HashSet, sync::Arc};

use cgmath::{Matrix4, Vector3};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    backend::{BufferHandle, DrawCall, ProgramLog, RenderBackend, TextureHandle},
    data_structures::{object::Mode, texture},
    pipelines::{
        SCENE_SHADER,
        basic::{SceneLayouts, ScenePipelines},
        uniforms::{DynamicUniformBuffer, FrameUniform, ObjectUniform},
    },
    resources::{ModelBuffers, texture::MipLevel},
};

/// A draw waiting for the end of the frame.
struct PendingDraw {
    mode: Mode,
    blending: bool,
    offset: u32,
    texture: Option<TextureHandle>,
    buffers: ModelBuffers,
    count: u32,
    indexed: bool,
}

pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    layouts: SceneLayouts,
    pipelines: Option<ScenePipelines>,
    frame_uniform: FrameUniform,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    objects: DynamicUniformBuffer<ObjectUniform>,
    object_bind_group: wgpu::BindGroup,
    buffers: Vec<wgpu::Buffer>,
    textures: Vec<wgpu::BindGroup>,
    default_texture: wgpu::BindGroup,
    /// Bound in place of missing uv or normal buffers.
    zero_buffer: wgpu::Buffer,
    clear: wgpu::Color,
    blending: bool,
    pending: Vec<PendingDraw>,
    approximated: HashSet<Mode>,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colors are authored in display space; keep the surface linear.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no supported formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let layouts = SceneLayouts::new(&device);

        let frame_uniform = FrameUniform::new();
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Buffer"),
            contents: bytemuck::cast_slice(&[frame_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layouts.frame,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
            label: Some("frame_bind_group"),
        });

        let objects = DynamicUniformBuffer::new(&device, "Object Buffer");
        let object_bind_group = object_bind_group(&device, &layouts, &objects);

        let white = [MipLevel {
            width: 1,
            height: 1,
            pixels: vec![255; 4],
        }];
        let white = texture::Texture::from_levels(&device, &queue, &white, "default_texture");
        let default_texture = texture_bind_group(&device, &layouts, &white);

        let zero_buffer = zero_buffer(&device, 1024);

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            layouts,
            pipelines: None,
            frame_uniform,
            frame_buffer,
            frame_bind_group,
            objects,
            object_bind_group,
            buffers: Vec::new(),
            textures: Vec::new(),
            default_texture,
            zero_buffer,
            clear: wgpu::Color::WHITE,
            blending: false,
            pending: Vec::new(),
            approximated: HashSet::new(),
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = texture::Texture::create_depth_texture(
                &self.device,
                [self.config.width, self.config.height],
                "depth_texture",
            );
        }
    }

    fn vertex_buffer(&self, handle: Option<BufferHandle>) -> &wgpu::Buffer {
        handle
            .and_then(|handle| self.buffers.get(handle.0 as usize))
            .unwrap_or(&self.zero_buffer)
    }

    fn push_buffer(&mut self, buffer: wgpu::Buffer) -> BufferHandle {
        self.buffers.push(buffer);
        BufferHandle(self.buffers.len() as u32 - 1)
    }
}

impl RenderBackend for Context {
    fn create_vertex_buffer(&mut self, label: &str, data: &[f32]) -> BufferHandle {
        // the zero buffer must cover any attribute of the largest model
        let size = std::mem::size_of_val(data) as u64;
        if size > self.zero_buffer.size() {
            self.zero_buffer = zero_buffer(&self.device, size);
        }
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::VERTEX,
        });
        self.push_buffer(buffer)
    }

    fn create_index_buffer(&mut self, label: &str, data: &[u16]) -> BufferHandle {
        // buffer sizes must be a multiple of 4 bytes
        let mut data = data.to_vec();
        if data.len() % 2 == 1 {
            data.push(0);
        }
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data),
            usage: wgpu::BufferUsages::INDEX,
        });
        self.push_buffer(buffer)
    }

    fn create_texture(&mut self, label: &str, levels: &[MipLevel]) -> TextureHandle {
        let texture = texture::Texture::from_levels(&self.device, &self.queue, levels, label);
        self.textures
            .push(texture_bind_group(&self.device, &self.layouts, &texture));
        TextureHandle(self.textures.len() as u32 - 1)
    }

    fn compile_program(&mut self) -> ProgramLog {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_SHADER.into()),
        });
        let module_log = compilation_messages(&shader);
        self.pipelines = Some(ScenePipelines::new(
            &self.device,
            &self.layouts,
            &shader,
            self.config.format,
        ));
        let program = validation_error(&self.device);

        ProgramLog {
            vertex: module_log.clone(),
            fragment: module_log,
            program,
        }
    }

    fn begin_frame(&mut self, clear: [f64; 4]) {
        self.clear = wgpu::Color {
            r: clear[0],
            g: clear[1],
            b: clear[2],
            a: clear[3],
        };
        self.blending = false;
        self.pending.clear();
        self.objects.clear();
    }

    fn set_camera(&mut self, eye: Matrix4<f32>, pv: Matrix4<f32>) {
        self.frame_uniform.set_camera(eye, pv);
    }

    fn set_light(&mut self, direction: Vector3<f32>) {
        self.frame_uniform.set_light(direction);
    }

    fn set_blending(&mut self, enabled: bool) {
        self.blending = enabled;
    }

    fn draw(&mut self, call: &DrawCall) {
        if matches!(call.mode, Mode::LineLoop | Mode::TriangleFan) && self.approximated.insert(call.mode) {
            log::warn!("{:?} is not supported by wgpu, drawing it as a strip/list", call.mode);
        }
        let offset = self.objects.push(&ObjectUniform::from(call));
        self.pending.push(PendingDraw {
            mode: call.mode,
            blending: self.blending,
            offset,
            texture: call.texture,
            buffers: call.buffers,
            count: call.count,
            indexed: call.indexed,
        });
    }

    fn end_frame(&mut self) -> anyhow::Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = self.window.inner_size();
                self.resize(size.width, size.height);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::cast_slice(&[self.frame_uniform]),
        );
        if self.objects.flush(&self.device, &self.queue) {
            self.object_bind_group = object_bind_group(&self.device, &self.layouts, &self.objects);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for draw in &self.pending {
                let Some(pipeline) = self
                    .pipelines
                    .as_ref()
                    .and_then(|pipelines| pipelines.get(draw.mode, draw.blending))
                else {
                    continue;
                };
                let texture = draw
                    .texture
                    .and_then(|handle| self.textures.get(handle.0 as usize))
                    .unwrap_or(&self.default_texture);

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &self.object_bind_group, &[draw.offset]);
                render_pass.set_bind_group(2, texture, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer(Some(draw.buffers.vertices)).slice(..));
                render_pass.set_vertex_buffer(1, self.vertex_buffer(draw.buffers.uv).slice(..));
                render_pass.set_vertex_buffer(2, self.vertex_buffer(draw.buffers.normals).slice(..));
                match draw.buffers.indices.filter(|_| draw.indexed) {
                    Some(indices) => {
                        render_pass.set_index_buffer(
                            self.vertex_buffer(Some(indices)).slice(..),
                            wgpu::IndexFormat::Uint16,
                        );
                        render_pass.draw_indexed(0..draw.count, 0, 0..1);
                    }
                    None => render_pass.draw(0..draw.count, 0..1),
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        output.present();
        self.pending.clear();
        Ok(())
    }
}

fn object_bind_group(
    device: &wgpu::Device,
    layouts: &SceneLayouts,
    objects: &DynamicUniformBuffer<ObjectUniform>,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: &layouts.object,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: objects.buffer(),
                offset: 0,
                size: std::num::NonZeroU64::new(std::mem::size_of::<ObjectUniform>() as u64),
            }),
        }],
        label: Some("object_bind_group"),
    })
}

fn texture_bind_group(
    device: &wgpu::Device,
    layouts: &SceneLayouts,
    texture: &texture::Texture,
) -> wgpu::BindGroup {
    let default_sampler;
    let sampler = match &texture.sampler {
        Some(sampler) => sampler,
        None => {
            default_sampler = texture::create_default_sampler(device);
            &default_sampler
        }
    };
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: &layouts.texture,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some("texture_bind_group"),
    })
}

fn zero_buffer(device: &wgpu::Device, size: u64) -> wgpu::Buffer {
    // new buffers are zero initialized
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Zero Buffer"),
        size: size.next_multiple_of(4),
        usage: wgpu::BufferUsages::VERTEX,
        mapped_at_creation: false,
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn compilation_messages(shader: &wgpu::ShaderModule) -> Option<String> {
    let info = futures::executor::block_on(shader.get_compilation_info());
    let messages: Vec<_> = info
        .messages
        .iter()
        .map(|message| format!("{:?}: {}", message.message_type, message.message))
        .collect();
    (!messages.is_empty()).then(|| messages.join("\n"))
}

#[cfg(not(target_arch = "wasm32"))]
fn validation_error(device: &wgpu::Device) -> Option<String> {
    futures::executor::block_on(device.pop_error_scope()).map(|e| e.to_string())
}

// Browsers resolve these asynchronously; report through the log instead.
#[cfg(target_arch = "wasm32")]
fn compilation_messages(shader: &wgpu::ShaderModule) -> Option<String> {
    let info = shader.get_compilation_info();
    wasm_bindgen_futures::spawn_local(async move {
        for message in info.await.messages {
            log::warn!("shader: {:?}: {}", message.message_type, message.message);
        }
    });
    None
}

#[cfg(target_arch = "wasm32")]
fn validation_error(device: &wgpu::Device) -> Option<String> {
    let error = device.pop_error_scope();
    wasm_bindgen_futures::spawn_local(async move {
        if let Some(e) = error.await {
            log::error!("program: {}", e);
        }
    });
    None
}
