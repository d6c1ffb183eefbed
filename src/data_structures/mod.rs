//! Scene data structures: objects, their dual state, transforms and textures.
//!
//! - `object` holds the attribute set of one object and the sparse patches
//!   that mutate it
//! - `state` is the `current`/`next` object store
//! - `transform` composes translation, rotation and scale into matrices
//! - `scene_graph` resolves grouped transforms
//! - `model` describes the static geometry of an object type
//! - `texture` holds caller supplied images and their GPU counterparts

pub mod model;
pub mod object;
pub mod scene_graph;
pub mod state;
pub mod texture;
pub mod transform;
