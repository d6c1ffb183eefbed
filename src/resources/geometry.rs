//! Built-in geometry: plane (also used by billboards), cube, pyramid and a
//! UV sphere. All shapes are centered on the origin and fit a unit box,
//! except the sphere which has radius 1.

use std::f32::consts::PI;

use crate::data_structures::model::Model;

/// Rings and segments of the built-in sphere.
pub const SPHERE_PRECISION: u16 = 25;

//  v1------v0
//  |       |
//  |   x   |
//  |       |
//  v2------v3
pub fn plane() -> Model {
    Model::new(vec![
        0.5, 0.5, 0.0, -0.5, 0.5, 0.0, -0.5, -0.5, 0.0, //
        0.5, 0.5, 0.0, -0.5, -0.5, 0.0, 0.5, -0.5, 0.0,
    ])
    .with_uv(vec![
        0.0, 0.0, 1.0, 0.0, 1.0, 1.0, //
        0.0, 0.0, 1.0, 1.0, 0.0, 1.0,
    ])
}

pub fn cube() -> Model {
    #[rustfmt::skip]
    let vertices = vec![
         0.5, 0.5, 0.5,  -0.5, 0.5, 0.5,  -0.5,-0.5, 0.5, // front
         0.5, 0.5, 0.5,  -0.5,-0.5, 0.5,   0.5,-0.5, 0.5,
         0.5, 0.5, 0.5,   0.5,-0.5, 0.5,   0.5,-0.5,-0.5, // right
         0.5, 0.5, 0.5,   0.5,-0.5,-0.5,   0.5, 0.5,-0.5,
         0.5, 0.5, 0.5,   0.5, 0.5,-0.5,  -0.5, 0.5,-0.5, // up
         0.5, 0.5, 0.5,  -0.5, 0.5,-0.5,  -0.5, 0.5, 0.5,
        -0.5, 0.5, 0.5,  -0.5, 0.5,-0.5,  -0.5,-0.5,-0.5, // left
        -0.5, 0.5, 0.5,  -0.5,-0.5,-0.5,  -0.5,-0.5, 0.5,
        -0.5,-0.5, 0.5,   0.5,-0.5, 0.5,   0.5,-0.5,-0.5, // down
        -0.5,-0.5, 0.5,   0.5,-0.5,-0.5,  -0.5,-0.5,-0.5,
         0.5,-0.5,-0.5,  -0.5,-0.5,-0.5,  -0.5, 0.5,-0.5, // back
         0.5,-0.5,-0.5,  -0.5, 0.5,-0.5,   0.5, 0.5,-0.5,
    ];
    let face_uv = [1.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0];
    let uv = face_uv.repeat(6);
    Model::new(vertices).with_uv(uv)
}

pub fn pyramid() -> Model {
    #[rustfmt::skip]
    let vertices = vec![
        -0.5,-0.5, 0.5,   0.5,-0.5, 0.5,  0.0, 0.5, 0.0, // front
         0.5,-0.5, 0.5,   0.5,-0.5,-0.5,  0.0, 0.5, 0.0, // right
         0.5,-0.5,-0.5,  -0.5,-0.5,-0.5,  0.0, 0.5, 0.0, // back
        -0.5,-0.5,-0.5,  -0.5,-0.5, 0.5,  0.0, 0.5, 0.0, // left
        -0.5,-0.5, 0.5,  -0.5,-0.5,-0.5,  0.5,-0.5, 0.5, // base
        -0.5,-0.5,-0.5,   0.5,-0.5,-0.5,  0.5,-0.5, 0.5,
    ];
    #[rustfmt::skip]
    let uv = vec![
        0.0, 0.0,  1.0, 0.0,  0.5, 1.0,
        0.0, 0.0,  1.0, 0.0,  0.5, 1.0,
        0.0, 0.0,  1.0, 0.0,  0.5, 1.0,
        0.0, 0.0,  1.0, 0.0,  0.5, 1.0,
        1.0, 0.0,  0.0, 0.0,  0.0, 1.0,
        1.0, 0.0,  0.0, 1.0,  1.0, 1.0,
    ];
    Model::new(vertices).with_uv(uv)
}

/// Indexed UV sphere with `precision` rings and segments.
pub fn sphere(precision: u16) -> Model {
    let rows = precision as usize + 1;
    let mut vertices = Vec::with_capacity(rows * rows * 3);
    let mut uv = Vec::with_capacity(rows * rows * 2);
    let mut indices = Vec::with_capacity(precision as usize * precision as usize * 6);

    for j in 0..=precision {
        let aj = j as f32 * PI / precision as f32;
        for i in 0..=precision {
            let ai = i as f32 * 2.0 * PI / precision as f32;
            vertices.extend([ai.sin() * aj.sin(), aj.cos(), ai.cos() * aj.sin()]);
            uv.extend([(ai / 2.0).sin(), (aj / 2.0).cos()]);
            if i < precision && j < precision {
                let p1 = j * (precision + 1) + i;
                let p2 = p1 + precision + 1;
                indices.extend([p1, p2, p1 + 1, p1 + 1, p2, p2 + 1]);
            }
        }
    }
    Model::new(vertices).with_uv(uv).with_indices(indices)
}
