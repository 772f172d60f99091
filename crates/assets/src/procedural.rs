use crate::model::{AssetId, ModelData, ModelMaterial, ModelMesh, ModelVertex, TextureData};
use std::f32::consts::{PI, TAU};

const TEXTURE_WIDTH: u32 = 256;
const TEXTURE_HEIGHT: u32 = 128;
/// Fraction of the texture height covered by each white pole cap.
const CAP: f32 = 0.12;

const GORES: [[u8; 3]; 6] = [
    [220, 40, 40],
    [250, 250, 245],
    [30, 90, 200],
    [250, 210, 40],
    [250, 250, 245],
    [40, 170, 80],
];

fn stripe_texture() -> TextureData {
    let mut rgba = Vec::with_capacity((TEXTURE_WIDTH * TEXTURE_HEIGHT * 4) as usize);
    for y in 0..TEXTURE_HEIGHT {
        let v = (y as f32 + 0.5) / TEXTURE_HEIGHT as f32;
        for x in 0..TEXTURE_WIDTH {
            let u = (x as f32 + 0.5) / TEXTURE_WIDTH as f32;
            let [r, g, b] = if v < CAP || v > 1.0 - CAP {
                [255, 255, 255]
            } else {
                GORES[((u * GORES.len() as f32) as usize).min(GORES.len() - 1)]
            };
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
    }
    TextureData {
        width: TEXTURE_WIDTH,
        height: TEXTURE_HEIGHT,
        rgba,
    }
}

/// A striped UV sphere standing in for the beach ball model.
///
/// Triangles wind counter-clockwise seen from outside. Degenerate triangles
/// at the poles are left out.
pub fn beach_ball(radius: f32, segments: u32, rings: u32) -> ModelData {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let columns = segments + 1;

    let mut vertices = Vec::with_capacity((columns * (rings + 1)) as usize);
    for r in 0..=rings {
        let v = r as f32 / rings as f32;
        let phi = PI * v;
        for s in 0..=segments {
            let u = s as f32 / segments as f32;
            let theta = TAU * u;
            let normal = [phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()];
            vertices.push(ModelVertex {
                position: normal.map(|c| c * radius),
                normal,
                uv: [u, v],
            });
        }
    }

    let mut indices = Vec::with_capacity((segments * (rings - 1) * 6) as usize);
    for r in 0..rings {
        for s in 0..segments {
            let a = r * columns + s;
            let b = a + columns;
            if r != 0 {
                indices.extend_from_slice(&[a, a + 1, b]);
            }
            if r != rings - 1 {
                indices.extend_from_slice(&[a + 1, b + 1, b]);
            }
        }
    }

    let descriptor = format!("procedural-beach-ball:{radius}:{segments}:{rings}");
    ModelData {
        id: AssetId::of_bytes(descriptor.as_bytes()),
        name: "beach_ball".into(),
        meshes: vec![ModelMesh {
            name: "ball".into(),
            vertices,
            indices,
            material: Some(0),
        }],
        materials: vec![ModelMaterial {
            name: "stripes".into(),
            texture: Some(0),
            ..ModelMaterial::default()
        }],
        textures: vec![stripe_texture()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn counts_match_grid() {
        let ball = beach_ball(1.0, 16, 8);
        assert_eq!(ball.vertex_count(), 17 * 9);
        assert_eq!(ball.triangle_count(), 2 * 16 * 7);
    }

    #[test]
    fn vertices_lie_on_sphere() {
        let ball = beach_ball(0.5, 12, 6);
        for v in &ball.meshes[0].vertices {
            assert!((Vec3::from(v.position).length() - 0.5).abs() < 1e-5);
            assert!((Vec3::from(v.normal).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn triangles_face_outward() {
        let ball = beach_ball(1.0, 12, 6);
        let mesh = &ball.meshes[0];
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from(mesh.vertices[tri[i] as usize].position));
            let n = (b - a).cross(c - a);
            assert!(n.length() > 1e-6, "degenerate triangle {tri:?}");
            assert!(n.dot(a + b + c) > 0.0, "inward triangle {tri:?}");
        }
    }

    #[test]
    fn texture_has_caps_and_gores() {
        let ball = beach_ball(1.0, 8, 4);
        let tex = &ball.textures[0];
        assert_eq!(tex.rgba.len(), (tex.width * tex.height * 4) as usize);
        let texel = |x: u32, y: u32| {
            let i = ((y * tex.width + x) * 4) as usize;
            [tex.rgba[i], tex.rgba[i + 1], tex.rgba[i + 2]]
        };
        assert_eq!(texel(0, 0), [255, 255, 255]);
        assert_eq!(texel(0, tex.height / 2), GORES[0]);
        assert_eq!(texel(tex.width - 1, tex.height / 2), GORES[5]);
        assert_eq!(ball.material(Some(0)).unwrap().texture, Some(0));
    }

    #[test]
    fn id_depends_on_shape() {
        assert_eq!(beach_ball(1.0, 8, 4).id, beach_ball(1.0, 8, 4).id);
        assert_ne!(beach_ball(1.0, 8, 4).id, beach_ball(1.0, 9, 4).id);
    }
}
