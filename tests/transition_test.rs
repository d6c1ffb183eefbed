use transit3d::{
    Field, ObjectKind, ObjectPatch,
    data_structures::state::SceneState,
    transition::{interpolate, lerp, tick, tick_all},
};

use crate::common::test_utils::{assert_approx, frame, scene};
mod common;

fn moving_cube(duration: f32) -> SceneState {
    let mut state = SceneState::new();
    state.upsert("a", ObjectKind::Cube, &ObjectPatch::new()).unwrap();
    state
        .upsert("a", ObjectKind::Cube, &ObjectPatch::new().x(10.0).duration(duration))
        .unwrap();
    state
}

#[test]
fn should_reach_target_halfway_then_clamp() {
    let mut state = moving_cube(1000.0);
    tick(&mut state, "a", 500.0);
    assert_approx(interpolate(&state, "a", Field::X).unwrap(), 5.0);

    tick(&mut state, "a", 1000.0);
    assert_approx(interpolate(&state, "a", Field::X).unwrap(), 10.0);
    assert_eq!(state.next("a").unwrap().elapsed, 1000.0);
}

#[test]
fn should_animate_new_object_from_defaults() {
    let mut state = SceneState::new();
    state
        .upsert("a", ObjectKind::Cube, &ObjectPatch::new().x(10.0).duration(1000.0))
        .unwrap();
    assert_eq!(state.current("a").unwrap().x, 0.0);
    assert_eq!(interpolate(&state, "a", Field::X), Some(0.0));

    tick(&mut state, "a", 500.0);
    assert_approx(interpolate(&state, "a", Field::X).unwrap(), 5.0);
    tick(&mut state, "a", 1000.0);
    assert_approx(interpolate(&state, "a", Field::X).unwrap(), 10.0);
}

#[test]
fn should_animate_new_scene_object_from_defaults() {
    let mut scene = scene();
    frame(&mut scene, 0.0);
    scene
        .cube(ObjectPatch::named("a").x(10.0).duration(1000.0), None)
        .unwrap();
    frame(&mut scene, 500.0);
    assert_approx(scene.interpolate("a", Field::X).unwrap(), 5.0);
    frame(&mut scene, 1500.0);
    assert_eq!(scene.interpolate("a", Field::X), Some(10.0));
}

#[test]
fn should_snap_without_duration() {
    let state = moving_cube(0.0);
    assert_eq!(interpolate(&state, "a", Field::X), Some(10.0));
}

#[test]
fn should_start_at_previous_value() {
    let state = moving_cube(1000.0);
    let current = state.current("a").unwrap();
    let next = state.next("a").unwrap();
    assert_eq!(lerp(current, next, Field::X), 0.0);
    // untouched fields are equal on both sides
    assert_eq!(lerp(current, next, Field::W), 1.0);
}

#[test]
fn should_ignore_negative_time() {
    let mut state = moving_cube(1000.0);
    tick_all(&mut state, 250.0);
    tick_all(&mut state, -100.0);
    assert_approx(interpolate(&state, "a", Field::X).unwrap(), 2.5);
}

#[test]
fn should_restart_from_interrupted_target() {
    let mut state = moving_cube(1000.0);
    tick(&mut state, "a", 500.0);
    // the new transition starts from the previous target, not the midpoint
    state
        .upsert("a", ObjectKind::Cube, &ObjectPatch::new().x(20.0).duration(1000.0))
        .unwrap();
    assert_approx(interpolate(&state, "a", Field::X).unwrap(), 10.0);
    tick(&mut state, "a", 500.0);
    assert_approx(interpolate(&state, "a", Field::X).unwrap(), 15.0);
}

#[test]
fn should_interpolate_between_frames() {
    let mut scene = scene();
    scene.cube(ObjectPatch::named("a"), None).unwrap();
    frame(&mut scene, 0.0);

    scene
        .move_object("a", ObjectPatch::new().x(10.0).duration(1000.0), None)
        .unwrap();
    // the move lands on the first frame at least a millisecond later
    frame(&mut scene, 0.5);
    assert_eq!(scene.interpolate("a", Field::X), Some(0.0));

    frame(&mut scene, 1.0);
    assert_approx(scene.interpolate("a", Field::X).unwrap(), 0.005);
    frame(&mut scene, 501.0);
    assert_approx(scene.interpolate("a", Field::X).unwrap(), 5.005);

    frame(&mut scene, 5000.0);
    assert_eq!(scene.interpolate("a", Field::X), Some(10.0));
}

#[test]
fn should_report_unknown_objects_as_missing() {
    let state = SceneState::new();
    assert_eq!(interpolate(&state, "ghost", Field::X), None);
}
