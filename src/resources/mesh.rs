/**
 * Smooth normals for indexed models.
 *
 * Every vertex accumulates the face normal (AB x BC, not normalized) of each
 * triangle that references it, so larger faces weigh more. The fragment stage
 * normalizes after interpolation.
 */
pub fn smooth_normals(vertices: &[f32], indices: &[u16]) -> Vec<f32> {
    let position = |i: u16| {
        let i = i as usize * 3;
        cgmath::Vector3::new(vertices[i], vertices[i + 1], vertices[i + 2])
    };
    let mut normals = vec![cgmath::Vector3::new(0.0f32, 0.0, 0.0); vertices.len() / 3];

    for c in indices.chunks_exact(3) {
        if c.iter().any(|&i| i as usize >= normals.len()) {
            log::warn!("Triangle {:?} references a vertex out of range, skipping it.", c);
            continue;
        }
        let (a, b, cc) = (position(c[0]), position(c[1]), position(c[2]));
        let normal = (b - a).cross(cc - b);
        for &i in c {
            normals[i as usize] += normal;
        }
    }

    normals.into_iter().flat_map(|n| [n.x, n.y, n.z]).collect()
}
