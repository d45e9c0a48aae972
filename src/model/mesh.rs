use std::path::Path;

use anyhow::{Context, Result};
use bytemuck::NoUninit;
use glam::{Vec2, Vec3};
use wgpu::util::DeviceExt;

/// Position/color/UV vertex for unlit geometry such as the reference grid.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
pub struct VertexPcu {
    pub pos: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

/// Position/color/UV/tangent/bitangent/normal vertex for lit, normal-mapped
/// meshes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
pub struct VertexPcutbn {
    pub pos: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
    pub normal: [f32; 3],
}

/// GPU-side vertex buffer for an unindexed draw.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

pub fn upload_vertices<V: NoUninit>(device: &wgpu::Device, vertices: &[V], label: &str) -> MeshBuffer {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    MeshBuffer {
        vertex_buffer,
        vertex_count: vertices.len() as u32,
    }
}

/// Loads an OBJ file and appends its triangles to `out` as a flat vertex
/// list. Tangent frames are computed per triangle since OBJ files don't carry
/// them and the normal-map shader needs a full TBN basis.
pub fn load_obj_mesh(out: &mut Vec<VertexPcutbn>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)
        .with_context(|| format!("failed to load OBJ mesh \"{}\"", path.display()))?;

    for m in &models {
        let mesh = &m.mesh;
        let start = out.len();
        for &index in &mesh.indices {
            let i = index as usize;
            out.push(VertexPcutbn {
                pos: [
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                ],
                color: [1.0, 1.0, 1.0, 1.0],
                uv: [
                    mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                    1.0 - mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                ],
                tangent: [0.0; 3],
                bitangent: [0.0; 3],
                normal: [
                    mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                    mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                    mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                ],
            });
        }
        compute_tangents(&mut out[start..]);
    }
    Ok(())
}

/// Fills in tangent/bitangent (and a face normal where the file had none) for
/// a flat triangle list.
pub fn compute_tangents(vertices: &mut [VertexPcutbn]) {
    for tri in vertices.chunks_mut(3) {
        if tri.len() < 3 {
            continue;
        }
        let pos0 = Vec3::from(tri[0].pos);
        let pos1 = Vec3::from(tri[1].pos);
        let pos2 = Vec3::from(tri[2].pos);
        let uv0 = Vec2::from(tri[0].uv);
        let uv1 = Vec2::from(tri[1].uv);
        let uv2 = Vec2::from(tri[2].uv);

        let edge1 = pos1 - pos0;
        let edge2 = pos2 - pos0;
        let delta_uv1 = uv1 - uv0;
        let delta_uv2 = uv2 - uv0;

        let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
        let (tangent, bitangent) = if det.abs() > f32::EPSILON {
            let r = 1.0 / det;
            (
                ((edge1 * delta_uv2.y - edge2 * delta_uv1.y) * r).normalize_or_zero(),
                // Flipped to match wgpu's texture coordinate handedness.
                ((edge2 * delta_uv1.x - edge1 * delta_uv2.x) * -r).normalize_or_zero(),
            )
        } else {
            (Vec3::ZERO, Vec3::ZERO)
        };

        let face_normal = edge1.cross(edge2).normalize_or_zero();
        for v in tri.iter_mut() {
            v.tangent = tangent.to_array();
            v.bitangent = bitangent.to_array();
            if Vec3::from(v.normal) == Vec3::ZERO {
                v.normal = face_normal.to_array();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_triangle() -> Vec<VertexPcutbn> {
        let v = |pos: [f32; 3], uv: [f32; 2]| VertexPcutbn {
            pos,
            color: [1.0; 4],
            uv,
            tangent: [0.0; 3],
            bitangent: [0.0; 3],
            normal: [0.0; 3],
        };
        vec![
            v([0.0, 0.0, 0.0], [0.0, 0.0]),
            v([1.0, 0.0, 0.0], [1.0, 0.0]),
            v([1.0, 1.0, 0.0], [1.0, 1.0]),
        ]
    }

    #[test]
    fn tangent_follows_u_direction() {
        let mut verts = quad_triangle();
        compute_tangents(&mut verts);
        assert!((Vec3::from(verts[0].tangent) - Vec3::X).length() < 1e-5);
        // Missing normals are replaced by the face normal.
        assert!((Vec3::from(verts[0].normal) - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn degenerate_uvs_leave_zero_tangents() {
        let mut verts = quad_triangle();
        for v in &mut verts {
            v.uv = [0.5, 0.5];
        }
        compute_tangents(&mut verts);
        assert_eq!(verts[0].tangent, [0.0; 3]);
        assert_eq!(verts[0].bitangent, [0.0; 3]);
    }

    #[test]
    fn missing_mesh_file_is_an_error() {
        let mut verts = Vec::new();
        let err = load_obj_mesh(&mut verts, "does/not/exist.obj").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.obj"));
        assert!(verts.is_empty());
    }
}
