//! Spatial transforms: translation, Euler rotation in degrees and scale.

use cgmath::{Deg, Matrix4, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    /// Rotation around x, y and z in degrees.
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    /// Identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Translate, then rotate, then scale, in that fixed order.
    ///
    /// Rotations are applied around z, then y, then x, so a point is first
    /// scaled, rotated about x, y, z and finally translated.
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from_angle_z(Deg(self.rotation.z))
            * Matrix4::from_angle_y(Deg(self.rotation.y))
            * Matrix4::from_angle_x(Deg(self.rotation.x))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// The translation column of an affine matrix.
pub fn translation_of(matrix: &Matrix4<f32>) -> Vector3<f32> {
    Vector3::new(matrix.w.x, matrix.w.y, matrix.w.z)
}

/// Squared Euclidean distance between the translations of two matrices.
pub fn distance2(a: &Matrix4<f32>, b: &Matrix4<f32>) -> f32 {
    let d = translation_of(b) - translation_of(a);
    d.x * d.x + d.y * d.y + d.z * d.z
}
