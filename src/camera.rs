//! Projection and view helpers.
//!
//! The camera itself is an ordinary scene object named `camera`; its world
//! matrix is the eye matrix and its inverse the view matrix.

use cgmath::{Matrix4, SquareMatrix};

/// A perspective projection with a fixed depth range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Half of the vertical field of view, in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, fov: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect: aspect_ratio(width, height),
            near,
            far,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    /// Column-major GL style perspective, clip z in `-w..w`.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        let f = 1.0 / self.fov.tan();
        let (near, far) = (self.near, self.far);
        #[rustfmt::skip]
        let matrix = Matrix4::new(
            f / self.aspect, 0.0, 0.0,                               0.0,
            0.0,             f,   0.0,                               0.0,
            0.0,             0.0, (far + near) / (near - far),       -1.0,
            0.0,             0.0, 2.0 * far * near / (near - far),   0.0,
        );
        matrix
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

/// Converts GL clip space depth (`-1..1`) into the `0..1` range wgpu expects.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Projection-view matrix for a camera with world matrix `eye`.
///
/// A singular eye matrix (e.g. a camera scaled to zero) falls back to the
/// identity view.
pub fn projection_view(projection: &Projection, eye: &Matrix4<f32>) -> Matrix4<f32> {
    let view = eye.invert().unwrap_or_else(Matrix4::identity);
    projection.calc_matrix() * view
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perspective_matches_gl_layout() {
        let projection = Projection::new(2, 1, 0.5, 1.0, 999.0);
        let m = projection.calc_matrix();
        let f = 1.0 / 0.5f32.tan();
        assert!((m.x.x - f / 2.0).abs() < 1e-6);
        assert!((m.y.y - f).abs() < 1e-6);
        assert!((m.z.z - 1000.0 / -998.0).abs() < 1e-6);
        assert_eq!(m.z.w, -1.0);
        assert!((m.w.z - 2.0 * 999.0 / -998.0).abs() < 1e-4);
        assert_eq!(m.w.w, 0.0);
    }

    #[test]
    fn zero_sized_surfaces_keep_a_finite_aspect() {
        let mut projection = Projection::new(0, 0, 0.5, 1.0, 999.0);
        assert_eq!(projection.aspect, 1.0);
        projection.resize(300, 150);
        assert_eq!(projection.aspect, 2.0);
    }
}
