//! The per-frame render loop.
//!
//! Each frame advances every object's transition clock, resolves world
//! matrices, pushes camera and light, draws opaque objects in name order and
//! then transparent objects back to front with blending enabled.
//!
//! # Key types
//!
//! - [`FrameRenderer`] owns per-frame scratch state and the custom renderers
//! - [`crate::backend::CustomRenderer`] replaces the default draw of tagged
//!   objects

use std::collections::HashMap;

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::{
    backend::{CustomRenderer, DrawCall, RenderBackend},
    camera::{Projection, projection_view},
    data_structures::{
        object::{Background, Field, ObjectKind, ObjectState},
        scene_graph::ResolvedTransforms,
        state::SceneState,
        transform::distance2,
    },
    error,
    resources::ResourceCache,
    scene::SceneConfig,
    transition::{compose_transform, interpolate, tick_all},
};

/// Name of the object whose world matrix is the eye matrix.
pub const CAMERA: &str = "camera";
/// Name of the object whose position is the light direction.
pub const LIGHT: &str = "light";

#[derive(Default)]
pub struct FrameRenderer {
    resolved: ResolvedTransforms,
    renderers: HashMap<String, Box<dyn CustomRenderer>>,
    last_frame: Option<f64>,
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route objects whose renderer tag is `tag` to `renderer`.
    pub fn register(&mut self, tag: impl Into<String>, renderer: Box<dyn CustomRenderer>) {
        self.renderers.insert(tag.into(), renderer);
    }

    pub fn has_renderer(&self, tag: &str) -> bool {
        self.renderers.contains_key(tag)
    }

    /// World matrices of the most recent frame.
    pub fn resolved(&self) -> &ResolvedTransforms {
        &self.resolved
    }

    /// Timestamp of the most recent frame, in milliseconds.
    pub fn last_frame(&self) -> Option<f64> {
        self.last_frame
    }

    /// Forget frame timing so the next frame starts with a zero delta.
    pub fn reset(&mut self) {
        self.resolved.clear();
        self.last_frame = None;
    }

    /// Render one frame at time `now` (milliseconds).
    pub fn draw(
        &mut self,
        now: f64,
        state: &mut SceneState,
        resources: &mut ResourceCache,
        projection: &Projection,
        config: &SceneConfig,
        backend: &mut dyn RenderBackend,
    ) -> anyhow::Result<()> {
        let dt = self.last_frame.map_or(0.0, |last| (now - last).max(0.0));
        self.last_frame = Some(now);

        tick_all(state, dt as f32);
        self.resolved.clear();

        backend.begin_frame(config.clear_colour);

        let eye = self.world(state, CAMERA);
        backend.set_camera(eye, projection_view(projection, &eye));

        let light = |field| interpolate(state, LIGHT, field).unwrap_or(0.0);
        backend.set_light(Vector3::new(light(Field::X), light(Field::Y), light(Field::Z)));

        let mut names = state.names();
        names.sort();
        let mut opaque = Vec::new();
        let mut transparent = Vec::new();
        for name in names {
            let world = self.world(state, &name);
            let Some(object) = state.next(&name) else {
                continue;
            };
            if !object.kind.is_visible() {
                continue;
            }
            if object.background.is_transparent() {
                transparent.push((name, world));
            } else {
                opaque.push((name, world));
            }
        }

        for (name, world) in &opaque {
            self.draw_object(state, name, world, resources, config, backend);
        }

        // farthest first
        transparent.sort_by(|(_, a), (_, b)| distance2(b, &eye).total_cmp(&distance2(a, &eye)));
        backend.set_blending(true);
        for (name, world) in &transparent {
            self.draw_object(state, name, world, resources, config, backend);
        }
        backend.set_blending(false);

        backend.end_frame()
    }

    /// Resolved world matrix of `name`. Objects caught in a group cycle are
    /// placed by their own transform alone.
    fn world(&mut self, state: &SceneState, name: &str) -> Matrix4<f32> {
        match self.resolved.resolve(state, name) {
            Ok(matrix) => matrix,
            Err(e) => {
                log::warn!("{}, drawing '{}' without its group", e, name);
                let matrix = compose_transform(state, name);
                self.resolved.insert(name, matrix);
                matrix
            }
        }
    }

    fn draw_object(
        &self,
        state: &SceneState,
        name: &str,
        world: &Matrix4<f32>,
        resources: &mut ResourceCache,
        config: &SceneConfig,
        backend: &mut dyn RenderBackend,
    ) {
        let Some(object) = state.next(name) else {
            return;
        };
        let call = match prepare_draw(object, world, resources, config, backend) {
            Ok(call) => call,
            Err(e) => {
                log::error!("Cannot draw '{}': {}", name, e);
                return;
            }
        };

        match &object.renderer {
            Some(tag) => match self.renderers.get(tag) {
                Some(renderer) => renderer.render(object, &call, backend),
                None => log::warn!("No renderer registered for tag '{}', skipping '{}'", tag, name),
            },
            None => backend.draw(&call),
        }
    }
}

fn prepare_draw(
    object: &ObjectState,
    world: &Matrix4<f32>,
    resources: &mut ResourceCache,
    config: &SceneConfig,
    backend: &mut dyn RenderBackend,
) -> error::Result<DrawCall> {
    let buffers = resources.ensure_model_buffers(object.kind.model_name(), backend, config.smooth_normals)?;
    let texture = match &object.background {
        Background::Texture(image) => {
            Some(resources.ensure_texture(image, backend)?)
        }
        _ => None,
    };

    let smooth = object.smooth && buffers.normals.is_some();
    let billboard = object.kind == ObjectKind::Billboard;
    let (indexed, count) = match buffers.indices {
        Some(_) => (true, buffers.index_count),
        None => (false, buffers.vertex_count),
    };

    Ok(DrawCall {
        object: object.name.clone(),
        model: *world,
        inverse_model: world.invert().unwrap_or_else(Matrix4::identity),
        shading: [
            smooth as u8 as f32,
            object.mode.is_filled() as u8 as f32,
            0.0,
            0.0,
        ],
        billboard: [object.w, object.h, billboard as u8 as f32, 0.0],
        color: object.background.shader_color(),
        texture,
        buffers,
        mode: object.mode,
        count,
        indexed,
    })
}
