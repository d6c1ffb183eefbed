use transit3d::{
    Field, Mode, ObjectKind, ObjectPatch, SceneError,
    backend::recording::BackendEvent,
    data_structures::object::{Background, Color},
};

use crate::common::test_utils::{assert_approx, frame, scene};
mod common;

#[test]
fn should_name_unnamed_objects_sequentially() {
    let mut scene = scene();
    assert_eq!(scene.cube(ObjectPatch::new(), None).unwrap(), "o0");
    assert_eq!(scene.plane(ObjectPatch::named("floor"), None).unwrap(), "floor");
    assert_eq!(scene.sphere(ObjectPatch::new(), None).unwrap(), "o1");
}

#[test]
fn should_restart_names_after_reset() {
    let mut scene = scene();
    scene.cube(ObjectPatch::new(), None).unwrap();
    scene.reset();
    assert!(!scene.state().contains("o0"));
    assert_eq!(scene.cube(ObjectPatch::new(), None).unwrap(), "o0");
}

#[test]
fn should_reject_invalid_colors_without_side_effects() {
    let mut scene = scene();
    let result = scene.cube(ObjectPatch::named("bad").color("zzz"), None);
    assert!(matches!(result, Err(SceneError::InvalidColor(c)) if c == "zzz"));
    assert!(!scene.state().contains("bad"));

    scene.cube(ObjectPatch::named("good").color("f00"), None).unwrap();
    let pending = scene.pending();
    assert!(scene.move_object("good", ObjectPatch::new().color("12345"), None).is_err());
    assert_eq!(scene.pending(), pending);
}

#[test]
fn should_parse_short_and_long_colors() {
    let mut scene = scene();
    scene.cube(ObjectPatch::named("a").color("f80"), None).unwrap();
    scene.cube(ObjectPatch::named("b").color("ff000080"), None).unwrap();

    let a = &scene.state().next("a").unwrap().background;
    assert_eq!(
        *a,
        Background::Color(Color {
            rgba: [1.0, 8.0 / 15.0, 0.0, 1.0],
            has_alpha: false,
        })
    );
    let b = &scene.state().next("b").unwrap().background;
    assert!(b.is_transparent());
    assert_approx(b.shader_color()[3], 128.0 / 255.0);
}

#[test]
fn should_default_to_grey_triangles() {
    let mut scene = scene();
    scene.cube(ObjectPatch::named("a"), None).unwrap();
    let object = scene.state().next("a").unwrap();
    assert_eq!(object.background, Background::Color(Color::GREY));
    assert_eq!(object.mode, Mode::Triangles);
    assert_eq!((object.w, object.h, object.d), (1.0, 1.0, 1.0));
}

#[test]
fn should_let_size_override_single_axes() {
    let mut scene = scene();
    scene
        .cube(ObjectPatch::named("a").w(3.0).size(2.0), None)
        .unwrap();
    let object = scene.state().next("a").unwrap();
    assert_eq!((object.w, object.h, object.d), (2.0, 2.0, 2.0));
}

#[test]
fn should_reject_signed_color_digits() {
    let mut scene = scene();
    let result = scene.cube(ObjectPatch::named("a").color("+f+f+f"), None);
    assert!(matches!(result, Err(SceneError::InvalidColor(_))));
    assert!(!scene.state().contains("a"));
}

#[test]
fn should_force_camera_name() {
    let mut scene = scene();
    scene.camera(ObjectPatch::named("eye").x(3.0), None).unwrap();
    frame(&mut scene, 0.0);
    frame(&mut scene, 1.0);
    assert!(!scene.state().contains("eye"));
    assert_eq!(scene.interpolate("camera", Field::X), Some(3.0));
}

#[test]
fn should_defer_moves_and_keep_kind() {
    let mut scene = scene();
    scene.cube(ObjectPatch::named("a"), None).unwrap();
    scene.move_object("a", ObjectPatch::new().y(2.0), None).unwrap();
    assert_eq!(scene.interpolate("a", Field::Y), Some(0.0));

    // re-adding under another kind keeps the first geometry
    scene.sphere(ObjectPatch::named("a").x(1.0), None).unwrap();
    frame(&mut scene, 0.0);
    frame(&mut scene, 1.0);
    assert_eq!(scene.state().kind_of("a"), Some(&ObjectKind::Cube));
    assert_eq!(scene.interpolate("a", Field::X), Some(1.0));
    assert_eq!(scene.interpolate("a", Field::Y), Some(2.0));
}

#[test]
fn should_skip_moves_of_unknown_objects() {
    let mut scene = scene();
    scene.move_object("ghost", ObjectPatch::new().x(1.0), None).unwrap();
    frame(&mut scene, 0.0);
    frame(&mut scene, 1.0);
    assert!(!scene.state().contains("ghost"));
}

#[test]
fn should_apply_light_immediately_unless_delayed() {
    let mut scene = scene();
    scene.light(ObjectPatch::new().x(1.0), None).unwrap();
    assert_eq!(scene.interpolate("light", Field::X), Some(1.0));

    scene.light(ObjectPatch::new().x(2.0), Some(50.0)).unwrap();
    frame(&mut scene, 0.0);
    assert_eq!(scene.interpolate("light", Field::X), Some(1.0));
    frame(&mut scene, 50.0);
    assert_eq!(scene.interpolate("light", Field::X), Some(2.0));
}

#[test]
fn should_schedule_relative_to_last_frame() {
    let mut scene = scene();
    frame(&mut scene, 1000.0);
    scene.cube(ObjectPatch::named("a"), Some(100.0)).unwrap();
    assert!(frame(&mut scene, 1050.0).is_empty());
    assert_eq!(frame(&mut scene, 1100.0), ["a"]);
}

#[test]
fn should_compile_program_on_reset() {
    let mut scene = scene();
    scene.reset();
    let programs = scene
        .backend()
        .events
        .iter()
        .filter(|e| **e == BackendEvent::Program)
        .count();
    assert_eq!(programs, 2);
    assert!(scene.state().contains("light"));
    assert_eq!(scene.interpolate("light", Field::Y), Some(-1.0));
}

#[test]
fn should_update_projection() {
    let mut scene = scene();
    scene.fov(0.8);
    scene.resize(800, 400);
    assert_eq!(scene.projection().fov, 0.8);
    assert_eq!(scene.projection().aspect, 2.0);
    assert_eq!(scene.config().aspect, 2.0);
}
