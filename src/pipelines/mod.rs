//! Render pipelines for the scene shader.
//!
//! - `basic` builds the bind group layouts and one pipeline per primitive
//!   topology and blend state
//! - `uniforms` defines the uniform structs and the batched object buffer

pub mod basic;
pub mod uniforms;

/// Source of the vertex and fragment stages.
pub const SCENE_SHADER: &str = include_str!("scene.wgsl");
