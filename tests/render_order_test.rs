use std::{cell::RefCell, rc::Rc};

use transit3d::{
    Mode, ObjectKind, ObjectPatch, RenderBackend, TextureImage,
    backend::{DrawCall, recording::BackendEvent},
    cgmath::Vector3,
    data_structures::object::ObjectState,
};

use crate::common::test_utils::{frame, scene, translation};
mod common;

fn glass(name: &str, z: f32) -> ObjectPatch {
    ObjectPatch::named(name).z(z).color("f008")
}

#[test]
fn should_draw_transparent_objects_farthest_first() {
    let mut scene = scene();
    scene.cube(glass("near", -5.0), None).unwrap();
    scene.cube(glass("far", -20.0), None).unwrap();
    scene.cube(glass("middle", -10.0), None).unwrap();
    scene.cube(ObjectPatch::named("solid").z(-50.0), None).unwrap();

    let drawn = frame(&mut scene, 0.0);
    assert_eq!(drawn, ["solid", "far", "middle", "near"]);
}

#[test]
fn should_draw_opaque_objects_in_name_order() {
    let mut scene = scene();
    for name in ["c", "a", "b"] {
        scene.sphere(ObjectPatch::named(name), None).unwrap();
    }
    assert_eq!(frame(&mut scene, 0.0), ["a", "b", "c"]);
}

#[test]
fn should_enable_blending_only_around_transparent_pass() {
    let mut scene = scene();
    scene.cube(ObjectPatch::named("solid"), None).unwrap();
    scene.cube(glass("glass", -3.0), None).unwrap();
    frame(&mut scene, 0.0);

    let events = &scene.backend().events;
    let position = |wanted: fn(&BackendEvent) -> bool| events.iter().position(wanted).unwrap();
    let solid = position(|e| matches!(e, BackendEvent::Draw(call) if call.object == "solid"));
    let on = position(|e| *e == BackendEvent::Blending(true));
    let glass = position(|e| matches!(e, BackendEvent::Draw(call) if call.object == "glass"));
    let off = position(|e| *e == BackendEvent::Blending(false));
    assert!(solid < on && on < glass && glass < off);
    assert_eq!(events.last(), Some(&BackendEvent::EndFrame));
    assert!(!scene.backend().blending());
}

#[test]
fn should_toggle_blending_even_without_transparent_objects() {
    let mut scene = scene();
    frame(&mut scene, 0.0);
    let toggles: Vec<_> = scene
        .backend()
        .events
        .iter()
        .filter(|e| matches!(e, BackendEvent::Blending(_)))
        .collect();
    assert_eq!(toggles, [&BackendEvent::Blending(true), &BackendEvent::Blending(false)]);
}

#[test]
fn should_treat_textured_objects_as_transparent() {
    let mut scene = scene();
    let texture = TextureImage::from_rgba("red", 1, 1, vec![255, 0, 0, 255]).unwrap();
    scene.plane(ObjectPatch::named("a_textured").texture(texture), None).unwrap();
    scene.plane(ObjectPatch::named("b_plain").color("00f"), None).unwrap();

    assert_eq!(frame(&mut scene, 0.0), ["b_plain", "a_textured"]);
    let draws = scene.backend().draws();
    assert_eq!(draws[1].color, [0.0; 4]);
    assert!(draws[1].texture.is_some());
    assert!(draws[0].texture.is_none());
}

#[test]
fn should_not_draw_camera_light_or_groups() {
    let mut scene = scene();
    scene.group(ObjectPatch::named("g"), None).unwrap();
    scene.cube(ObjectPatch::named("box").group("g"), None).unwrap();
    frame(&mut scene, 0.0);
    let drawn = frame(&mut scene, 10.0);
    assert!(scene.state().contains("camera"));
    assert!(scene.state().contains("light"));
    assert_eq!(drawn, ["box"]);
}

#[test]
fn should_render_first_frame_without_camera() {
    let mut scene = scene();
    scene.cube(ObjectPatch::named("box"), None).unwrap();
    assert_eq!(frame(&mut scene, 0.0), ["box"]);
    assert!(!scene.state().contains("camera"));
    assert_eq!(scene.pending(), 1);
}

#[test]
fn should_push_default_light_direction() {
    let mut scene = scene();
    frame(&mut scene, 0.0);
    assert!(scene
        .backend()
        .events
        .contains(&BackendEvent::Light(Vector3::new(0.0, -1.0, 0.0))));
}

#[test]
fn should_push_camera_world_matrix_as_eye() {
    let mut scene = scene();
    scene.camera(ObjectPatch::new().z(5.0), None).unwrap();
    frame(&mut scene, 0.0);
    frame(&mut scene, 1.0);
    let eye = scene.backend().events.iter().find_map(|e| match e {
        BackendEvent::Camera { eye, .. } => Some(*eye),
        _ => None,
    });
    assert_eq!(eye.map(|eye| eye.w.z), Some(5.0));
}

#[test]
fn should_show_delayed_objects_on_time() {
    let mut scene = scene();
    scene.cube(ObjectPatch::named("late"), Some(100.0)).unwrap();
    assert!(frame(&mut scene, 0.0).is_empty());
    assert!(frame(&mut scene, 99.0).is_empty());
    assert_eq!(frame(&mut scene, 100.0), ["late"]);
}

#[test]
fn should_tolerate_deleting_twice() {
    let mut scene = scene();
    scene.cube(ObjectPatch::named("a"), None).unwrap();
    scene.delete("a", None);
    scene.delete("a", None);
    scene.delete("never_existed", None);
    assert_eq!(frame(&mut scene, 0.0), ["a"]);
    assert!(frame(&mut scene, 1.0).is_empty());
    assert!(!scene.state().contains("a"));
}

#[test]
fn should_fill_shading_and_billboard_vectors() {
    let mut scene = scene();
    scene
        .sphere(ObjectPatch::named("ball").smooth(true), None)
        .unwrap();
    scene
        .cube(ObjectPatch::named("edges").smooth(true).mode(Mode::Lines), None)
        .unwrap();
    scene
        .billboard(ObjectPatch::named("sign").scale(3.0, 2.0, 1.0), None)
        .unwrap();
    frame(&mut scene, 0.0);

    let draws = scene.backend().draws();
    let call = |name: &str| *draws.iter().find(|call| call.object == name).unwrap();
    assert_eq!(call("ball").shading, [1.0, 1.0, 0.0, 0.0]);
    assert!(call("ball").indexed);
    // the cube has no index buffer and thus no smooth normals
    assert_eq!(call("edges").shading, [0.0, 0.0, 0.0, 0.0]);
    assert_eq!(call("sign").billboard, [3.0, 2.0, 1.0, 0.0]);
    assert_eq!(call("ball").billboard[2], 0.0);
}

#[test]
fn should_hand_tagged_objects_to_custom_renderer() {
    let mut scene = scene();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    scene.register_renderer(
        "outline",
        move |object: &ObjectState, call: &DrawCall, backend: &mut dyn RenderBackend| {
            log.borrow_mut().push(object.name.clone());
            let mut call = call.clone();
            call.color = [0.0, 0.0, 0.0, 1.0];
            backend.draw(&call);
        },
    );
    scene
        .cube(ObjectPatch::named("fancy").renderer("outline").color("f00"), None)
        .unwrap();
    frame(&mut scene, 0.0);

    assert_eq!(*seen.borrow(), ["fancy"]);
    let draws = scene.backend().draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].color, [0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn should_skip_objects_with_unknown_renderer() {
    let mut scene = scene();
    scene
        .cube(ObjectPatch::named("lost").renderer("missing"), None)
        .unwrap();
    scene.cube(ObjectPatch::named("plain"), None).unwrap();
    assert_eq!(frame(&mut scene, 0.0), ["plain"]);
}

#[test]
fn should_return_to_default_draw_and_leave_group() {
    let mut scene = scene();
    scene.group(ObjectPatch::named("g").x(4.0), None).unwrap();
    scene
        .cube(ObjectPatch::named("a").x(1.0).renderer("gone").group("g"), None)
        .unwrap();
    assert!(frame(&mut scene, 0.0).is_empty());

    scene
        .cube(ObjectPatch::named("a").renderer(""), None)
        .unwrap();
    assert_eq!(frame(&mut scene, 1.0), ["a"]);
    assert_eq!(translation(&scene.resolved_transform("a").unwrap()).x, 5.0);

    scene
        .move_object("a", ObjectPatch::new().ungroup(), None)
        .unwrap();
    frame(&mut scene, 2.0);
    frame(&mut scene, 3.0);
    let object = scene.state().next("a").unwrap();
    assert_eq!((object.renderer.as_deref(), object.group.as_deref()), (None, None));
    assert_eq!(translation(&scene.resolved_transform("a").unwrap()).x, 1.0);
}

#[test]
fn should_draw_registered_models() {
    let mut scene = scene();
    let triangle = transit3d::Model::new(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    assert!(scene.register_model("triangle", triangle));
    scene
        .add(ObjectKind::Custom("triangle".into()), ObjectPatch::named("t"), None)
        .unwrap();
    frame(&mut scene, 0.0);
    let draws = scene.backend().draws();
    assert_eq!(draws[0].count, 3);
    assert!(!draws[0].indexed);
}
