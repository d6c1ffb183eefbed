//! Geometry descriptors shared by every object of a type.

/// Immutable geometry registered once per type name.
///
/// `vertices` holds `x, y, z` triples, `uv` holds `u, v` pairs, `indices`
/// holds triangle vertex indices and `normals` optional `nx, ny, nz` triples.
/// Without indices the model is drawn non-indexed over all vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    pub vertices: Vec<f32>,
    pub uv: Option<Vec<f32>>,
    pub indices: Option<Vec<u16>>,
    pub normals: Option<Vec<f32>>,
}

impl Model {
    pub fn new(vertices: Vec<f32>) -> Self {
        Self {
            vertices,
            ..Default::default()
        }
    }

    pub fn with_uv(mut self, uv: Vec<f32>) -> Self {
        self.uv = Some(uv);
        self
    }

    pub fn with_indices(mut self, indices: Vec<u16>) -> Self {
        self.indices = Some(indices);
        self
    }

    pub fn with_normals(mut self, normals: Vec<f32>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn vertex_count(&self) -> u32 {
        (self.vertices.len() / 3) as u32
    }
}
