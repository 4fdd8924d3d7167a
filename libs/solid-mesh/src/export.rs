//! # Export
//!
//! GPU mesh buffers and STL output.

use std::io::Write;

use crate::error::MeshError;
use crate::mesh::Mesh;

/// Mesh buffers suitable for GPU rendering.
///
/// Contains vertex positions and triangle indices in formats compatible
/// with WebGL/WebGPU.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use qr_solid::Aabb;
/// use solid_mesh::primitives::create_cuboid;
///
/// let mesh = create_cuboid(&Aabb::new(DVec3::ZERO, DVec3::ONE)).unwrap();
/// let buffers = mesh.to_buffers();
///
/// assert_eq!(buffers.vertices.len(), 8 * 3);
/// assert_eq!(buffers.indices.len(), 12 * 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    /// Vertex positions as flat array [x, y, z, x, y, z, ...].
    pub vertices: Vec<f32>,
    /// Triangle indices as flat array [i0, i1, i2, i0, i1, i2, ...].
    pub indices: Vec<u32>,
    /// Per-vertex normals, same layout as `vertices`.
    pub normals: Vec<f32>,
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl Mesh {
    /// Exports f32 buffers with computed vertex normals.
    pub fn to_buffers(&self) -> MeshBuffers {
        let mut with_normals = self.clone();
        with_normals.compute_normals();

        MeshBuffers {
            vertices: with_normals.vertices_f32(),
            indices: with_normals.indices_u32(),
            normals: with_normals.normals_f32().unwrap_or_default(),
        }
    }
}

/// Writes an ASCII STL file.
pub fn write_stl_ascii<W: Write>(mesh: &Mesh, name: &str, out: &mut W) -> Result<(), MeshError> {
    writeln!(out, "solid {name}")?;
    for i in 0..mesh.triangle_count() {
        let n = mesh.face_normal(i);
        writeln!(out, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z)?;
        writeln!(out, "    outer loop")?;
        for index in mesh.triangle(i) {
            let v = mesh.vertex(index);
            writeln!(out, "      vertex {:e} {:e} {:e}", v.x, v.y, v.z)?;
        }
        writeln!(out, "    endloop")?;
        writeln!(out, "  endfacet")?;
    }
    writeln!(out, "endsolid {name}")?;
    Ok(())
}

/// Writes a binary STL file: 80-byte header, little-endian triangle count,
/// then 50 bytes per triangle.
pub fn write_stl_binary<W: Write>(mesh: &Mesh, name: &str, out: &mut W) -> Result<(), MeshError> {
    let mut header = [0u8; 80];
    let label = name.as_bytes();
    let len = label.len().min(header.len());
    header[..len].copy_from_slice(&label[..len]);
    out.write_all(&header)?;

    let count = u32::try_from(mesh.triangle_count()).map_err(|_| MeshError::TooManyTriangles {
        count: mesh.triangle_count(),
        max: u32::MAX as usize,
    })?;
    out.write_all(&count.to_le_bytes())?;

    for i in 0..mesh.triangle_count() {
        let n = mesh.face_normal(i);
        let mut record = Vec::with_capacity(50);
        for component in [n.x, n.y, n.z] {
            record.extend_from_slice(&(component as f32).to_le_bytes());
        }
        for index in mesh.triangle(i) {
            let v = mesh.vertex(index);
            for component in [v.x, v.y, v.z] {
                record.extend_from_slice(&(component as f32).to_le_bytes());
            }
        }
        record.extend_from_slice(&0u16.to_le_bytes());
        out.write_all(&record)?;
    }
    Ok(())
}
