//! # Mesh Data Structure
//!
//! Indexed triangle mesh produced from rectilinear solids.

use std::collections::HashMap;

use config::constants::VERTEX_MERGE_EPSILON;
use glam::DVec3;
use qr_solid::Aabb;

/// A triangle mesh with shared vertices.
///
/// All geometry is f64. Conversion to f32 only happens for GPU buffers and
/// STL output.
///
/// # Example
///
/// ```rust
/// use solid_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions
    vertices: Vec<DVec3>,
    /// Triangle indices, counter-clockwise seen from outside
    triangles: Vec<[u32; 3]>,
    /// Optional per-vertex normals
    normals: Option<Vec<DVec3>>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
            normals: None,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    #[inline]
    pub fn triangle(&self, index: usize) -> [u32; 3] {
        self.triangles[index]
    }

    pub fn normals(&self) -> Option<&[DVec3]> {
        self.normals.as_deref()
    }

    /// Unit normal of one triangle, zero for a degenerate triangle.
    pub fn face_normal(&self, index: usize) -> DVec3 {
        let [a, b, c] = self.triangles[index].map(|i| self.vertices[i as usize]);
        (b - a).cross(c - a).normalize_or_zero()
    }

    /// Computes area-weighted vertex normals.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![DVec3::ZERO; self.vertices.len()];

        for tri in &self.triangles {
            let v0 = self.vertices[tri[0] as usize];
            let v1 = self.vertices[tri[1] as usize];
            let v2 = self.vertices[tri[2] as usize];
            let normal = (v1 - v0).cross(v2 - v0);

            for &i in tri {
                normals[i as usize] += normal;
            }
        }

        for normal in &mut normals {
            *normal = normal.normalize_or_zero();
        }

        self.normals = Some(normals);
    }

    /// Axis-aligned bounds, `None` for a mesh without vertices.
    pub fn bounding_box(&self) -> Option<Aabb> {
        let (first, rest) = self.vertices.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), v| (min.min(*v), max.max(*v)));
        Some(Aabb { min, max })
    }

    pub fn translate(&mut self, offset: DVec3) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Appends another mesh. Vertices are not shared across the two.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;
        let had_normals = self.normals.is_some() || other.normals.is_some();

        self.vertices.extend_from_slice(&other.vertices);
        self.triangles.extend(
            other
                .triangles
                .iter()
                .map(|tri| tri.map(|i| i + offset)),
        );

        self.normals = None;
        if had_normals {
            self.compute_normals();
        }
    }

    /// Checks indices and rejects zero-area triangles.
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;

        self.triangles.iter().all(|tri| {
            if tri.iter().any(|&i| i >= vertex_count) {
                return false;
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return false;
            }
            let [a, b, c] = tri.map(|i| self.vertices[i as usize]);
            (b - a).cross(c - a).length() >= VERTEX_MERGE_EPSILON
        })
    }

    /// True when every edge is used by exactly two triangles, once in each
    /// direction.
    pub fn is_closed(&self) -> bool {
        let mut directed: HashMap<(u32, u32), usize> = HashMap::new();
        for tri in &self.triangles {
            for k in 0..3 {
                *directed.entry((tri[k], tri[(k + 1) % 3])).or_insert(0) += 1;
            }
        }
        directed
            .iter()
            .all(|(&(a, b), &count)| count == 1 && directed.get(&(b, a)) == Some(&1))
    }

    /// Enclosed volume by the divergence theorem. Positive for outward
    /// winding.
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|tri| {
                let [a, b, c] = tri.map(|i| self.vertices[i as usize]);
                a.dot(b.cross(c)) / 6.0
            })
            .sum()
    }

    /// Flattened `[x, y, z, ...]` positions for GPU upload.
    pub fn vertices_f32(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.x as f32, v.y as f32, v.z as f32])
            .collect()
    }

    /// Flattened `[i0, i1, i2, ...]` indices for GPU upload.
    pub fn indices_u32(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    pub fn normals_f32(&self) -> Option<Vec<f32>> {
        self.normals.as_ref().map(|normals| {
            normals
                .iter()
                .flat_map(|n| [n.x as f32, n.y as f32, n.z as f32])
                .collect()
        })
    }
}
