//! The dual-state object store.
//!
//! Every object lives in two maps: `current` holds its state at the start of
//! the active transition and `next` holds the target. Transitions interpolate
//! from one to the other; deleting an object only removes its target.

use std::collections::HashMap;

use crate::{
    data_structures::object::{ObjectKind, ObjectPatch, ObjectState},
    error::Result,
};

#[derive(Clone, Debug, Default)]
pub struct SceneState {
    current: HashMap<String, ObjectState>,
    next: HashMap<String, ObjectState>,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `patch` into the target state of `name`.
    ///
    /// The previous target (or the default table for a new object) becomes
    /// the object's `current` state and the merged result its new target,
    /// with the transition clock reset. `kind` only applies to new objects.
    /// On error, e.g. a malformed color, neither map is touched.
    pub fn upsert(&mut self, name: &str, kind: ObjectKind, patch: &ObjectPatch) -> Result<&ObjectState> {
        let previous = self
            .next
            .get(name)
            .cloned()
            .unwrap_or_else(|| ObjectState::defaults(name, kind));
        let merged = previous.apply(patch)?;
        self.current.insert(name.to_string(), previous);
        self.next.insert(name.to_string(), merged);
        Ok(&self.next[name])
    }

    /// Drop the target state of `name`. Deleting twice is a no-op.
    pub fn remove(&mut self, name: &str) -> Option<ObjectState> {
        self.next.remove(name)
    }

    pub fn current(&self, name: &str) -> Option<&ObjectState> {
        self.current.get(name)
    }

    pub fn next(&self, name: &str) -> Option<&ObjectState> {
        self.next.get(name)
    }

    pub fn next_mut(&mut self, name: &str) -> Option<&mut ObjectState> {
        self.next.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.next.contains_key(name)
    }

    pub fn kind_of(&self, name: &str) -> Option<&ObjectKind> {
        self.next.get(name).map(|object| &object.kind)
    }

    /// Names of all live objects, in unspecified order.
    pub fn names(&self) -> Vec<String> {
        self.next.keys().cloned().collect()
    }

    pub fn objects(&self) -> impl Iterator<Item = &ObjectState> {
        self.next.values()
    }

    pub(crate) fn objects_mut(&mut self) -> impl Iterator<Item = &mut ObjectState> {
        self.next.values_mut()
    }

    pub fn len(&self) -> usize {
        self.next.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }
}
