//! Time based interpolation between an object's `current` and `next` state.
//!
//! Every object carries its own clock (`elapsed`, in milliseconds) that runs
//! from zero to its `duration`. Attributes are interpolated linearly along
//! that clock; objects without a duration snap straight to their target.

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::data_structures::{
    object::{Field, ObjectState},
    state::SceneState,
    transform::Transform,
};

/// Interpolate `field` between two states of the same object.
///
/// Exactly `current` at the start of a transition and exactly `next` at its
/// end; linear in between.
pub fn lerp(current: &ObjectState, next: &ObjectState, field: Field) -> f32 {
    let to = next.get(field);
    if next.duration <= 0.0 || next.elapsed >= next.duration {
        return to;
    }
    let from = current.get(field);
    if next.elapsed <= 0.0 {
        return from;
    }
    from + (to - from) * (next.elapsed / next.duration)
}

/// The value `field` of object `name` has at this point of its transition.
pub fn interpolate(state: &SceneState, name: &str, field: Field) -> Option<f32> {
    let next = state.next(name)?;
    let value = match state.current(name) {
        Some(current) => lerp(current, next, field),
        None => next.get(field),
    };
    Some(value)
}

/// Interpolated translation, rotation and scale of `name`.
pub fn interpolated_transform(state: &SceneState, name: &str) -> Option<Transform> {
    let field = |field| interpolate(state, name, field);
    Some(Transform {
        translation: Vector3::new(field(Field::X)?, field(Field::Y)?, field(Field::Z)?),
        rotation: Vector3::new(field(Field::Rx)?, field(Field::Ry)?, field(Field::Rz)?),
        scale: Vector3::new(field(Field::W)?, field(Field::H)?, field(Field::D)?),
    })
}

/// The object's own model matrix, without any group composition.
///
/// Unknown objects compose to the identity.
pub fn compose_transform(state: &SceneState, name: &str) -> Matrix4<f32> {
    interpolated_transform(state, name)
        .map(|transform| transform.to_matrix())
        .unwrap_or_else(Matrix4::identity)
}

/// Advance one object's clock by `dt` milliseconds, clamped to its duration.
pub fn tick(state: &mut SceneState, name: &str, dt: f32) {
    if let Some(object) = state.next_mut(name) {
        advance(object, dt);
    }
}

/// Advance every live object's clock by `dt` milliseconds.
pub fn tick_all(state: &mut SceneState, dt: f32) {
    state.objects_mut().for_each(|object| advance(object, dt));
}

fn advance(object: &mut ObjectState, dt: f32) {
    if object.elapsed < object.duration {
        object.elapsed += dt.max(0.0);
    }
    if object.elapsed > object.duration {
        object.elapsed = object.duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::object::{ObjectKind, ObjectPatch};

    #[test]
    fn clock_never_passes_duration() {
        let mut state = SceneState::new();
        state
            .upsert("a", ObjectKind::Cube, &ObjectPatch::new().duration(100.0))
            .unwrap();
        tick(&mut state, "a", 60.0);
        tick(&mut state, "a", 60.0);
        assert_eq!(state.next("a").unwrap().elapsed, 100.0);
        tick(&mut state, "a", 60.0);
        assert_eq!(state.next("a").unwrap().elapsed, 100.0);
    }

    #[test]
    fn negative_deltas_do_not_rewind() {
        let mut state = SceneState::new();
        state
            .upsert("a", ObjectKind::Cube, &ObjectPatch::new().duration(100.0))
            .unwrap();
        tick(&mut state, "a", 30.0);
        tick(&mut state, "a", -10.0);
        assert_eq!(state.next("a").unwrap().elapsed, 30.0);
    }

    #[test]
    fn unknown_objects_compose_to_identity() {
        let state = SceneState::new();
        assert_eq!(compose_transform(&state, "ghost"), Matrix4::identity());
        assert_eq!(interpolate(&state, "ghost", Field::X), None);
    }
}
