use bytemuck::{Pod, Zeroable};

/// Side length of the ocean plane in world units.
pub const OCEAN_SIZE: f32 = 20.0;
/// Subdivisions per side of the ocean plane.
pub const OCEAN_SEGMENTS: u32 = 200;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PlaneVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// A flat square grid in the XZ plane centered on the origin, facing +Y.
///
/// `(segments + 1)^2` vertices, `6 * segments^2` indices. The vertex shader
/// does all displacement, so the plane itself stays flat.
pub fn plane_mesh(size: f32, segments: u32) -> (Vec<PlaneVertex>, Vec<u32>) {
    let segments = segments.max(1);
    let columns = segments + 1;
    let half = size / 2.0;

    let mut vertices = Vec::with_capacity((columns * columns) as usize);
    for iz in 0..=segments {
        let v = iz as f32 / segments as f32;
        for ix in 0..=segments {
            let u = ix as f32 / segments as f32;
            vertices.push(PlaneVertex {
                position: [u * size - half, 0.0, v * size - half],
                uv: [u, 1.0 - v],
            });
        }
    }

    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
    for iz in 0..segments {
        for ix in 0..segments {
            let a = iz * columns + ix;
            let b = a + columns;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn ocean_plane_counts() {
        let (vertices, indices) = plane_mesh(OCEAN_SIZE, OCEAN_SEGMENTS);
        assert_eq!(vertices.len(), 201 * 201);
        assert_eq!(indices.len(), 200 * 200 * 6);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn plane_spans_size_and_is_flat() {
        let (vertices, _) = plane_mesh(20.0, 4);
        let xs = vertices.iter().map(|v| v.position[0]);
        let zs = vertices.iter().map(|v| v.position[2]);
        assert_eq!(xs.clone().fold(f32::MAX, f32::min), -10.0);
        assert_eq!(xs.fold(f32::MIN, f32::max), 10.0);
        assert_eq!(zs.fold(f32::MIN, f32::max), 10.0);
        assert!(vertices.iter().all(|v| v.position[1] == 0.0));
    }

    #[test]
    fn triangles_face_up() {
        let (vertices, indices) = plane_mesh(2.0, 3);
        for tri in indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from(vertices[tri[i] as usize].position));
            assert!((b - a).cross(c - a).y > 0.0);
        }
    }

    #[test]
    fn uv_corners() {
        let (vertices, _) = plane_mesh(1.0, 2);
        assert_eq!(vertices[0].uv, [0.0, 1.0]);
        assert_eq!(vertices.last().unwrap().uv, [1.0, 0.0]);
    }

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<PlaneVertex>(), 20);
    }
}
