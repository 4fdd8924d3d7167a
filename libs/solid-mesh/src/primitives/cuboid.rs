//! # Cuboid Primitive
//!
//! Mesh of a single axis-aligned box.

use glam::DVec3;
use qr_solid::Aabb;

use crate::error::MeshError;
use crate::mesh::Mesh;

/// Creates the mesh of an axis-aligned box.
///
/// # Returns
///
/// A mesh with 8 vertices and 12 triangles (2 per face), wound
/// counter-clockwise seen from outside.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use qr_solid::Aabb;
/// use solid_mesh::primitives::create_cuboid;
///
/// let mesh = create_cuboid(&Aabb::new(DVec3::ZERO, DVec3::splat(10.0))).unwrap();
/// assert_eq!(mesh.vertex_count(), 8);
/// assert_eq!(mesh.triangle_count(), 12);
/// ```
pub fn create_cuboid(bounds: &Aabb) -> Result<Mesh, MeshError> {
    let extent = bounds.extent();
    if !bounds.is_finite() || extent.min_element() <= 0.0 {
        return Err(MeshError::degenerate(format!(
            "Cuboid extent must be positive: {:?}",
            extent
        )));
    }

    let (min, max) = (bounds.min, bounds.max);
    let mut mesh = Mesh::with_capacity(8, 12);

    // Bottom face (z = min.z)
    let v0 = mesh.add_vertex(DVec3::new(min.x, min.y, min.z));
    let v1 = mesh.add_vertex(DVec3::new(max.x, min.y, min.z));
    let v2 = mesh.add_vertex(DVec3::new(max.x, max.y, min.z));
    let v3 = mesh.add_vertex(DVec3::new(min.x, max.y, min.z));

    // Top face (z = max.z)
    let v4 = mesh.add_vertex(DVec3::new(min.x, min.y, max.z));
    let v5 = mesh.add_vertex(DVec3::new(max.x, min.y, max.z));
    let v6 = mesh.add_vertex(DVec3::new(max.x, max.y, max.z));
    let v7 = mesh.add_vertex(DVec3::new(min.x, max.y, max.z));

    for [a, b, c, d] in [
        [v0, v3, v2, v1], // bottom, -z
        [v4, v5, v6, v7], // top, +z
        [v0, v1, v5, v4], // front, -y
        [v2, v3, v7, v6], // back, +y
        [v3, v0, v4, v7], // left, -x
        [v1, v2, v6, v5], // right, +x
    ] {
        mesh.add_triangle(a, b, c);
        mesh.add_triangle(a, c, d);
    }

    Ok(mesh)
}
