//! transit3d
//!
//! A minimal real-time 3D scene renderer. Objects are declared by name with a
//! sparse set of attributes; every change becomes a timed transition that is
//! interpolated frame by frame. Objects can be grouped so that they inherit
//! their parent's transform, and transparent objects are drawn back to front.
//! Rendering runs on wgpu, natively and on the web.
//!
//! High-level modules
//! - `scene`: the public facade: add, move, delete, camera, light
//! - `data_structures`: object state, patches, transforms, models, textures
//!   and the group hierarchy
//! - `transition`: attribute interpolation and per-frame clock advance
//! - `schedule`: deferred command queue
//! - `render`: per-frame drawing: visibility, ordering, blending
//! - `backend`: the draw interface and a recording implementation
//! - `resources`: built-in geometry, normals, texture preparation and the
//!   upload cache
//! - `camera`: projection helpers
//! - `context`: wgpu surface/device context implementing the backend
//! - `pipelines`: shader, bind group layouts and render pipelines
//! - `flow`: window and event loop
//!

pub mod backend;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod schedule;
pub mod transition;

// Re-exports commonly used types for convenience in downstream code.
pub use backend::{RenderBackend, recording::RecordingBackend};
pub use cgmath;
pub use data_structures::{
    model::Model,
    object::{Field, Mode, ObjectKind, ObjectPatch},
    texture::TextureImage,
};
pub use error::SceneError;
pub use scene::{Scene, SceneConfig};
