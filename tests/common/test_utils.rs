#![allow(dead_code)]

use transit3d::{
    Scene, SceneConfig,
    backend::recording::RecordingBackend,
    cgmath::{Matrix4, Vector3},
};

pub const EPSILON: f32 = 1e-4;

/// A scene over a recording backend with program logging disabled.
pub fn scene() -> Scene<RecordingBackend> {
    let config = SceneConfig {
        debug: false,
        ..SceneConfig::default()
    };
    Scene::new(RecordingBackend::new(), config)
}

/// Draw a frame at `now` and return the names drawn, in order.
pub fn frame(scene: &mut Scene<RecordingBackend>, now: f64) -> Vec<String> {
    scene.backend_mut().clear_events();
    scene.draw(now).expect("recording backend never fails");
    scene
        .backend()
        .drawn_names()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON
}

#[track_caller]
pub fn assert_approx(actual: f32, expected: f32) {
    assert!(
        approx_eq(actual, expected),
        "expected {expected}, got {actual}"
    );
}

#[track_caller]
pub fn assert_matrix_approx(actual: &Matrix4<f32>, expected: &Matrix4<f32>) {
    let a: &[f32; 16] = actual.as_ref();
    let e: &[f32; 16] = expected.as_ref();
    for (i, (a, e)) in a.iter().zip(e.iter()).enumerate() {
        assert!(
            approx_eq(*a, *e),
            "element {i} differs: expected {expected:?}, got {actual:?}"
        );
    }
}

pub fn translation(matrix: &Matrix4<f32>) -> Vector3<f32> {
    matrix.w.truncate()
}
