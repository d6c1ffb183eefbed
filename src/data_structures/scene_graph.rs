//! Hierarchical transform resolution.
//!
//! Objects reference their group by name only. A group is any live object,
//! usually one created through [`crate::scene::Scene::group`]; the child's
//! world matrix is the group's world matrix times the child's own matrix.
//! Groups may themselves be grouped to arbitrary (acyclic) depth.

use std::collections::HashMap;

use cgmath::Matrix4;

use crate::{
    data_structures::state::SceneState,
    error::{Result, SceneError},
    transition::compose_transform,
};

/// World matrices resolved during one frame, keyed by object name.
///
/// Cleared at the start of every frame; each object is composed at most once
/// per frame no matter how many members share its group.
#[derive(Debug, Default)]
pub struct ResolvedTransforms {
    matrices: HashMap<String, Matrix4<f32>>,
}

impl ResolvedTransforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.matrices.clear();
    }

    pub fn get(&self, name: &str) -> Option<&Matrix4<f32>> {
        self.matrices.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, matrix: Matrix4<f32>) {
        self.matrices.insert(name.into(), matrix);
    }

    /// World matrix of `name`: its own interpolated transform, premultiplied
    /// by the resolved matrix of its group when that group is alive.
    ///
    /// A group name missing from the scene is ignored. A group chain that
    /// loops back on itself yields [`SceneError::GroupCycle`] naming the
    /// object where the loop closed.
    pub fn resolve(&mut self, state: &SceneState, name: &str) -> Result<Matrix4<f32>> {
        let mut visiting = Vec::new();
        self.resolve_inner(state, name, &mut visiting)
    }

    fn resolve_inner(
        &mut self,
        state: &SceneState,
        name: &str,
        visiting: &mut Vec<String>,
    ) -> Result<Matrix4<f32>> {
        if let Some(matrix) = self.matrices.get(name) {
            return Ok(*matrix);
        }
        if visiting.iter().any(|seen| seen == name) {
            return Err(SceneError::GroupCycle(name.to_string()));
        }

        let local = compose_transform(state, name);
        let group = state
            .next(name)
            .and_then(|object| object.group.as_deref())
            .filter(|group| state.contains(group));

        let world = match group {
            Some(group) => {
                visiting.push(name.to_string());
                let parent = self.resolve_inner(state, group, visiting);
                visiting.pop();
                parent? * local
            }
            None => local,
        };
        self.matrices.insert(name.to_string(), world);
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::object::{ObjectKind, ObjectPatch};

    #[test]
    fn missing_group_is_treated_as_ungrouped() {
        let mut state = SceneState::new();
        state
            .upsert("a", ObjectKind::Cube, &ObjectPatch::new().x(2.0).group("nowhere"))
            .unwrap();
        let mut resolved = ResolvedTransforms::new();
        let world = resolved.resolve(&state, "a").unwrap();
        assert_eq!(world, compose_transform(&state, "a"));
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let mut state = SceneState::new();
        state
            .upsert("a", ObjectKind::Group, &ObjectPatch::new().group("a"))
            .unwrap();
        let mut resolved = ResolvedTransforms::new();
        assert_eq!(
            resolved.resolve(&state, "a"),
            Err(SceneError::GroupCycle("a".to_string()))
        );
        assert!(resolved.get("a").is_none());
    }
}
