//! The public scene facade.
//!
//! A [`Scene`] owns the object store, the resource cache, the deferred
//! command queue and the frame renderer, and drives a [`RenderBackend`].
//! Every mutation goes through one of the entry points below; rendering
//! happens in [`Scene::draw`], once per display refresh.
//!
//! ```
//! use transit3d::{
//!     backend::recording::RecordingBackend,
//!     data_structures::object::ObjectPatch,
//!     scene::{Scene, SceneConfig},
//! };
//!
//! let mut scene = Scene::new(RecordingBackend::new(), SceneConfig::default());
//! scene.cube(ObjectPatch::named("box").size(2.0).color("f80"), None).unwrap();
//! scene
//!     .move_object("box", ObjectPatch::new().x(10.0).duration(1000.0), None)
//!     .unwrap();
//! scene.draw(0.0).unwrap();
//! scene.draw(16.0).unwrap();
//! ```

use cgmath::Matrix4;

use crate::{
    backend::{CustomRenderer, ProgramLog, RenderBackend},
    camera::Projection,
    data_structures::{
        model::Model,
        object::{BackgroundSpec, Color, Field, ObjectKind, ObjectPatch},
        state::SceneState,
    },
    error::{Result, SceneError},
    render::{CAMERA, FrameRenderer, LIGHT},
    resources::ResourceCache,
    schedule::{Command, CommandQueue},
    transition,
};

/// Deferred entry points wait at least this long, so their effect shows up
/// no earlier than the next frame.
pub const MIN_DELAY: f64 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    /// Half of the vertical field of view, in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Surface width divided by height.
    pub aspect: f32,
    /// Log the shader program build result.
    pub debug: bool,
    /// Synthesize smooth normals for indexed models without explicit ones.
    pub smooth_normals: bool,
    pub clear_colour: [f64; 4],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fov: 0.5,
            near: 1.0,
            far: 999.0,
            aspect: 1.0,
            debug: true,
            smooth_normals: true,
            clear_colour: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

pub struct Scene<B: RenderBackend> {
    backend: B,
    config: SceneConfig,
    projection: Projection,
    state: SceneState,
    resources: ResourceCache,
    renderer: FrameRenderer,
    queue: CommandQueue,
    counter: u64,
}

impl<B: RenderBackend> Scene<B> {
    /// Build a scene over `backend` and [`reset`](Self::reset) it.
    pub fn new(backend: B, config: SceneConfig) -> Self {
        let projection = Projection {
            fov: config.fov,
            aspect: config.aspect,
            near: config.near,
            far: config.far,
        };
        let mut scene = Self {
            backend,
            config,
            projection,
            state: SceneState::new(),
            resources: ResourceCache::new(),
            renderer: FrameRenderer::new(),
            queue: CommandQueue::new(),
            counter: 0,
        };
        scene.reset();
        scene
    }

    /// Discard every object and pending command, rebuild the shader program
    /// and install the default light and camera.
    ///
    /// Texture identities are forgotten, so a reused id uploads its new
    /// pixels. Model buffers belong to the backend and are kept, as are
    /// registered models and renderers.
    pub fn reset(&mut self) {
        self.state = SceneState::new();
        self.queue.clear();
        self.resources.clear_textures();
        self.renderer.reset();
        self.counter = 0;
        self.fov(self.config.fov);

        let log = self.backend.compile_program();
        if self.config.debug {
            log_program(&log);
        }

        if let Err(e) = self.light(ObjectPatch::new().y(-1.0), None) {
            log::error!("Cannot install the default light: {}", e);
        }
        if let Err(e) = self.camera(ObjectPatch::new(), None) {
            log::error!("Cannot install the default camera: {}", e);
        }
    }

    /// Create or update an object of `kind`.
    ///
    /// The object is named after `patch.name`, or `o0`, `o1`, ... when
    /// unnamed. Without a delay the change is applied right away; with one
    /// it is queued for the first frame at least `delay` milliseconds after
    /// the last one. Returns the object's name.
    pub fn add(&mut self, kind: ObjectKind, patch: ObjectPatch, delay: Option<f64>) -> Result<String> {
        let name = match &patch.name {
            Some(name) => name.clone(),
            None => self.next_name(),
        };
        match delay {
            Some(delay) => {
                self.validate(Some(&kind), &patch)?;
                self.schedule(
                    delay,
                    Command::Upsert {
                        name: name.clone(),
                        kind: Some(kind),
                        patch,
                    },
                );
            }
            None => self.apply_upsert(&name, Some(kind), &patch)?,
        }
        Ok(name)
    }

    pub fn plane(&mut self, patch: ObjectPatch, delay: Option<f64>) -> Result<String> {
        self.add(ObjectKind::Plane, patch, delay)
    }

    /// A plane that always faces the camera.
    pub fn billboard(&mut self, patch: ObjectPatch, delay: Option<f64>) -> Result<String> {
        self.add(ObjectKind::Billboard, patch, delay)
    }

    pub fn cube(&mut self, patch: ObjectPatch, delay: Option<f64>) -> Result<String> {
        self.add(ObjectKind::Cube, patch, delay)
    }

    pub fn pyramid(&mut self, patch: ObjectPatch, delay: Option<f64>) -> Result<String> {
        self.add(ObjectKind::Pyramid, patch, delay)
    }

    pub fn sphere(&mut self, patch: ObjectPatch, delay: Option<f64>) -> Result<String> {
        self.add(ObjectKind::Sphere, patch, delay)
    }

    /// An invisible object other objects can join through their `group`.
    pub fn group(&mut self, patch: ObjectPatch, delay: Option<f64>) -> Result<String> {
        self.add(ObjectKind::Group, patch, delay)
    }

    /// Update an existing object. Always deferred, by [`MIN_DELAY`] unless a
    /// delay is given. Objects gone by then are left alone.
    pub fn move_object(&mut self, name: &str, patch: ObjectPatch, delay: Option<f64>) -> Result<()> {
        self.validate(None, &patch)?;
        self.schedule(
            delay.unwrap_or(MIN_DELAY),
            Command::Upsert {
                name: name.to_string(),
                kind: None,
                patch,
            },
        );
        Ok(())
    }

    /// Remove an object. Always deferred; deleting a missing object is a
    /// no-op.
    pub fn delete(&mut self, name: &str, delay: Option<f64>) {
        self.schedule(
            delay.unwrap_or(MIN_DELAY),
            Command::Remove {
                name: name.to_string(),
            },
        );
    }

    /// Update the camera. Always deferred.
    pub fn camera(&mut self, patch: ObjectPatch, delay: Option<f64>) -> Result<()> {
        self.add(
            ObjectKind::Camera,
            patch.name(CAMERA),
            Some(delay.unwrap_or(MIN_DELAY)),
        )
        .map(drop)
    }

    /// Update the light direction (its `x`, `y`, `z`). Immediate unless
    /// delayed.
    pub fn light(&mut self, patch: ObjectPatch, delay: Option<f64>) -> Result<()> {
        self.add(ObjectKind::Light, patch.name(LIGHT), delay).map(drop)
    }

    /// Set the field of view (half angle, radians) and rebuild the projection.
    pub fn fov(&mut self, angle: f32) {
        self.config.fov = angle;
        self.projection.fov = angle;
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
        self.config.aspect = self.projection.aspect;
    }

    /// Register geometry for a custom object type, usable through
    /// `add(ObjectKind::Custom(name), ..)`.
    pub fn register_model(&mut self, name: &str, model: Model) -> bool {
        self.resources.register_model(name, model)
    }

    /// Draw objects whose renderer tag is `tag` with `renderer`.
    pub fn register_renderer(&mut self, tag: impl Into<String>, renderer: impl CustomRenderer + 'static) {
        self.renderer.register(tag, Box::new(renderer));
    }

    /// Apply every command due by `now` (milliseconds), then render a frame.
    pub fn draw(&mut self, now: f64) -> anyhow::Result<()> {
        for command in self.queue.drain_due(now) {
            if let Err(e) = self.apply(command) {
                log::error!("Deferred scene update failed: {}", e);
            }
        }
        self.renderer.draw(
            now,
            &mut self.state,
            &mut self.resources,
            &self.projection,
            &self.config,
            &mut self.backend,
        )
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    /// Current value of an interpolated attribute.
    pub fn interpolate(&self, name: &str, field: Field) -> Option<f32> {
        transition::interpolate(&self.state, name, field)
    }

    /// World matrix `name` was drawn with in the last frame.
    pub fn resolved_transform(&self, name: &str) -> Option<Matrix4<f32>> {
        self.renderer.resolved().get(name).copied()
    }

    pub fn resources(&self) -> &ResourceCache {
        &self.resources
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn next_name(&mut self) -> String {
        let name = format!("o{}", self.counter);
        self.counter += 1;
        name
    }

    /// Timestamp deferred commands are scheduled relative to.
    fn clock(&self) -> f64 {
        self.renderer.last_frame().unwrap_or(0.0)
    }

    fn schedule(&mut self, delay: f64, command: Command) {
        self.queue.push(self.clock() + delay.max(0.0), command);
    }

    /// Checks that can run before a deferred command is queued.
    fn validate(&self, kind: Option<&ObjectKind>, patch: &ObjectPatch) -> Result<()> {
        if let Some(kind) = kind.filter(|kind| kind.is_visible()) {
            if !self.resources.has_model(kind.model_name()) {
                return Err(SceneError::UnknownModel(kind.model_name().to_string()));
            }
        }
        if let Some(BackgroundSpec::Color(src)) = &patch.background {
            Color::parse(src)?;
        }
        Ok(())
    }

    fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Upsert { name, kind, patch } => self.apply_upsert(&name, kind, &patch),
            Command::Remove { name } => {
                self.state.remove(&name);
                Ok(())
            }
        }
    }

    /// Upload whatever the object needs, then merge `patch` into the store.
    /// The store is untouched on error.
    fn apply_upsert(&mut self, name: &str, kind: Option<ObjectKind>, patch: &ObjectPatch) -> Result<()> {
        let kind = match (self.state.kind_of(name), kind) {
            (Some(existing), _) => existing.clone(),
            (None, Some(kind)) => kind,
            (None, None) => {
                log::warn!("Cannot move '{}': no such object", name);
                return Ok(());
            }
        };
        self.validate(Some(&kind), patch)?;

        if kind.is_visible() {
            self.resources
                .ensure_model_buffers(kind.model_name(), &mut self.backend, self.config.smooth_normals)?;
        }
        if let Some(image) = patch.texture_image() {
            self.resources.ensure_texture(image, &mut self.backend)?;
        }
        self.state.upsert(name, kind, patch)?;
        Ok(())
    }
}

fn log_program(log: &ProgramLog) {
    let stages = [
        ("vertex shader", &log.vertex),
        ("fragment shader", &log.fragment),
        ("program", &log.program),
    ];
    for (stage, message) in stages {
        match message {
            Some(message) => log::warn!("{}: {}", stage, message),
            None => log::info!("{}: OK", stage),
        }
    }
}
