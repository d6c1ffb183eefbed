use transit3d::{ObjectPatch, cgmath::Vector3, data_structures::transform::Transform};

use crate::common::test_utils::{assert_matrix_approx, frame, scene, translation};
mod common;

#[test]
fn should_compose_child_with_parent() {
    let mut scene = scene();
    scene
        .group(ObjectPatch::named("arm").x(5.0).ry(90.0), None)
        .unwrap();
    scene
        .cube(ObjectPatch::named("hand").x(1.0).size(0.5).group("arm"), None)
        .unwrap();
    frame(&mut scene, 0.0);

    let parent = Transform {
        translation: Vector3::new(5.0, 0.0, 0.0),
        rotation: Vector3::new(0.0, 90.0, 0.0),
        scale: Vector3::new(1.0, 1.0, 1.0),
    };
    let child = Transform {
        translation: Vector3::new(1.0, 0.0, 0.0),
        rotation: Vector3::new(0.0, 0.0, 0.0),
        scale: Vector3::new(0.5, 0.5, 0.5),
    };
    let world = scene.resolved_transform("hand").unwrap();
    assert_matrix_approx(&world, &(parent.to_matrix() * child.to_matrix()));

    // a quarter turn around y carries +x onto -z
    let t = translation(&world);
    assert!(
        (t.x - 5.0).abs() < 1e-4 && t.y.abs() < 1e-4 && (t.z + 1.0).abs() < 1e-4,
        "{t:?}"
    );
}

#[test]
fn should_chain_nested_groups() {
    let mut scene = scene();
    scene.group(ObjectPatch::named("outer").x(1.0), None).unwrap();
    scene
        .group(ObjectPatch::named("inner").x(2.0).group("outer"), None)
        .unwrap();
    scene
        .sphere(ObjectPatch::named("leaf").x(3.0).group("inner"), None)
        .unwrap();
    frame(&mut scene, 0.0);

    let world = scene.resolved_transform("leaf").unwrap();
    assert_eq!(translation(&world), Vector3::new(6.0, 0.0, 0.0));
}

#[test]
fn should_follow_animated_parent() {
    let mut scene = scene();
    scene.group(ObjectPatch::named("g"), None).unwrap();
    scene
        .cube(ObjectPatch::named("c").y(1.0).group("g"), None)
        .unwrap();
    frame(&mut scene, 0.0);
    scene
        .move_object("g", ObjectPatch::new().x(10.0).duration(100.0), None)
        .unwrap();
    frame(&mut scene, 1.0);
    frame(&mut scene, 200.0);

    let world = scene.resolved_transform("c").unwrap();
    assert_eq!(translation(&world), Vector3::new(10.0, 1.0, 0.0));
}

#[test]
fn should_fall_back_to_own_transform_on_cycle() {
    let mut scene = scene();
    scene
        .cube(ObjectPatch::named("a").x(1.0).group("b"), None)
        .unwrap();
    scene
        .cube(ObjectPatch::named("b").x(2.0).group("a"), None)
        .unwrap();

    let drawn = frame(&mut scene, 0.0);
    assert_eq!(drawn, ["a", "b"]);
    let a = scene.resolved_transform("a").unwrap();
    assert_eq!(translation(&a), Vector3::new(1.0, 0.0, 0.0));
}

#[test]
fn should_ungroup_when_parent_is_deleted() {
    let mut scene = scene();
    scene.group(ObjectPatch::named("g").x(4.0), None).unwrap();
    scene
        .cube(ObjectPatch::named("c").x(1.0).group("g"), None)
        .unwrap();
    frame(&mut scene, 0.0);
    assert_eq!(
        translation(&scene.resolved_transform("c").unwrap()),
        Vector3::new(5.0, 0.0, 0.0)
    );

    scene.delete("g", None);
    frame(&mut scene, 1.0);
    assert_eq!(
        translation(&scene.resolved_transform("c").unwrap()),
        Vector3::new(1.0, 0.0, 0.0)
    );
}
