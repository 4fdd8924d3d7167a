//! # Mesh Extraction
//!
//! Converts a [`RectSolid`] into a closed triangle mesh.
//!
//! ## Algorithm
//!
//! 1. Collect the distinct x, y and z coordinates of all cell faces
//! 2. Mark the grid cells covered by the solid
//! 3. Emit one quad per grid face separating a covered cell from an empty one
//! 4. Glue quads along shared edges; where two covered cells meet only along
//!    an edge, each cell keeps its own copy of that edge
//!
//! Every quad is a whole grid face, so neighbouring quads always share full
//! edges and the output has no T-junctions. Every edge has exactly two
//! triangles on it.

use std::collections::HashMap;

use config::constants::{MAX_SOLID_CELLS, MAX_TRIANGLES, VERTEX_MERGE_EPSILON};
use glam::DVec3;

use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::primitives::create_cuboid;
use crate::solid::{find, RectSolid};

impl RectSolid {
    /// Boundary mesh of the solid, wound counter-clockwise seen from
    /// outside.
    ///
    /// # Example
    ///
    /// ```rust
    /// use glam::DVec3;
    /// use qr_solid::Aabb;
    /// use solid_mesh::RectSolid;
    ///
    /// let a = RectSolid::cuboid(Aabb::new(DVec3::ZERO, DVec3::ONE)).unwrap();
    /// let bar = a.union(&a.translated(DVec3::X)).unwrap();
    ///
    /// let mesh = bar.to_mesh().unwrap();
    /// assert!(mesh.is_closed());
    /// assert_eq!(mesh.triangle_count(), 20);
    /// ```
    pub fn to_mesh(&self) -> Result<Mesh, MeshError> {
        if let [cell] = self.cells() {
            return create_cuboid(cell);
        }
        Grid::build(self)?.mesh()
    }
}

/// A boundary quad and the covered cell it belongs to.
struct Face {
    corners: [[usize; 3]; 4],
    cell: [usize; 3],
}

/// Union-find over face corners; each root becomes one mesh vertex.
struct CornerSets {
    parent: Vec<usize>,
}

impl CornerSets {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        find(&mut self.parent, x)
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }

    /// Glues two faces along the edge they share: `(face, lo, hi)` name the
    /// corner slots holding the edge's lower and higher lattice endpoint.
    fn join_edge(
        &mut self,
        (f, f_lo, f_hi): (usize, usize, usize),
        (g, g_lo, g_hi): (usize, usize, usize),
    ) {
        self.union(f * 4 + f_lo, g * 4 + g_lo);
        self.union(f * 4 + f_hi, g * 4 + g_hi);
    }
}

/// Number of grid cells, bounded by `MAX_SOLID_CELLS`.
fn grid_cell_count(dims: [usize; 3]) -> Result<usize, MeshError> {
    dims.iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .filter(|&count| count <= MAX_SOLID_CELLS)
        .ok_or(MeshError::TooManyCells {
            count: dims.iter().fold(1usize, |acc, &d| acc.saturating_mul(d)),
            max: MAX_SOLID_CELLS,
        })
}

struct Grid {
    coords: [Vec<f64>; 3],
    dims: [usize; 3],
    occupied: Vec<bool>,
}

impl Grid {
    fn build(solid: &RectSolid) -> Result<Self, MeshError> {
        let coords = [0, 1, 2].map(|axis| {
            let mut values: Vec<f64> = solid
                .cells()
                .iter()
                .flat_map(|c| [c.min[axis], c.max[axis]])
                .collect();
            values.sort_by(f64::total_cmp);
            values.dedup_by(|b, a| (*b - *a).abs() <= VERTEX_MERGE_EPSILON);
            values
        });
        let dims = [0, 1, 2].map(|axis| coords[axis].len().saturating_sub(1));

        let count = grid_cell_count(dims)?;

        let mut grid = Grid {
            coords,
            dims,
            occupied: vec![false; count],
        };
        for cell in solid.cells() {
            let lo = [0, 1, 2].map(|axis| grid.snap(axis, cell.min[axis]));
            let hi = [0, 1, 2].map(|axis| grid.snap(axis, cell.max[axis]));
            for i in lo[0]..hi[0] {
                for j in lo[1]..hi[1] {
                    for k in lo[2]..hi[2] {
                        let index = grid.index([i, j, k]);
                        grid.occupied[index] = true;
                    }
                }
            }
        }
        Ok(grid)
    }

    /// Index of the grid plane at `value` along `axis`.
    fn snap(&self, axis: usize, value: f64) -> usize {
        self.coords[axis].partition_point(|&c| c < value - VERTEX_MERGE_EPSILON)
    }

    fn index(&self, [i, j, k]: [usize; 3]) -> usize {
        (i * self.dims[1] + j) * self.dims[2] + k
    }

    fn is_occupied(&self, cell: [usize; 3], plane: usize, axis: usize) -> bool {
        // `plane` is the grid index along `axis`; cell `plane` lies above it.
        plane < self.dims[axis] && self.occupied[self.index(cell)]
    }

    fn mesh(&self) -> Result<Mesh, MeshError> {
        let faces = self.boundary_faces()?;
        let mut sheets = CornerSets::new(faces.len() * 4);

        // Faces meeting along a lattice edge: two for a plain edge, four
        // where occupied cells touch only diagonally. Diagonal contacts are
        // split so each occupied cell keeps its own pair of faces.
        let mut edges: HashMap<([usize; 3], [usize; 3]), Vec<(usize, usize, usize)>> =
            HashMap::new();
        for (index, face) in faces.iter().enumerate() {
            for k in 0..4 {
                let (p, q) = (face.corners[k], face.corners[(k + 1) % 4]);
                let (lo, hi) = if p < q { (k, (k + 1) % 4) } else { ((k + 1) % 4, k) };
                let key = (face.corners[lo], face.corners[hi]);
                edges.entry(key).or_default().push((index, lo, hi));
            }
        }
        for around in edges.values() {
            match around.as_slice() {
                [f, g] => sheets.join_edge(*f, *g),
                [_, _, _, _] => {
                    for (n, f) in around.iter().enumerate() {
                        for g in &around[n + 1..] {
                            if faces[f.0].cell == faces[g.0].cell {
                                sheets.join_edge(*f, *g);
                            }
                        }
                    }
                }
                _ => {
                    return Err(MeshError::invalid_result(format!(
                        "{} faces around one edge",
                        around.len()
                    )));
                }
            }
        }

        let mut mesh = Mesh::with_capacity(faces.len() * 2, faces.len() * 2);
        let mut vertices: HashMap<usize, u32> = HashMap::new();
        for (index, face) in faces.iter().enumerate() {
            let [q0, q1, q2, q3] = [0, 1, 2, 3].map(|k| {
                let root = sheets.find(index * 4 + k);
                *vertices
                    .entry(root)
                    .or_insert_with(|| mesh.add_vertex(self.point(face.corners[k])))
            });
            mesh.add_triangle(q0, q1, q2);
            mesh.add_triangle(q0, q2, q3);
        }
        Ok(mesh)
    }

    /// One quad per grid face between a covered and an empty cell, wound
    /// outward.
    fn boundary_faces(&self) -> Result<Vec<Face>, MeshError> {
        let mut faces = Vec::new();
        for axis in 0..3 {
            let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
            for plane in 0..=self.dims[axis] {
                for a in 0..self.dims[u] {
                    for b in 0..self.dims[v] {
                        let mut above = [0; 3];
                        above[axis] = plane;
                        above[u] = a;
                        above[v] = b;
                        let mut below = above;
                        below[axis] = plane.wrapping_sub(1);

                        let solid_above = self.is_occupied(above, plane, axis);
                        let solid_below = plane > 0 && self.is_occupied(below, plane - 1, axis);
                        if solid_above == solid_below {
                            continue;
                        }

                        let corner = |du: usize, dv: usize| {
                            let mut p = [0; 3];
                            p[axis] = plane;
                            p[u] = a + du;
                            p[v] = b + dv;
                            p
                        };
                        let (corners, cell) = if solid_below {
                            ([corner(0, 0), corner(1, 0), corner(1, 1), corner(0, 1)], below)
                        } else {
                            ([corner(0, 0), corner(0, 1), corner(1, 1), corner(1, 0)], above)
                        };
                        faces.push(Face { corners, cell });

                        if faces.len() * 2 > MAX_TRIANGLES {
                            return Err(MeshError::TooManyTriangles {
                                count: faces.len() * 2,
                                max: MAX_TRIANGLES,
                            });
                        }
                    }
                }
            }
        }
        Ok(faces)
    }

    fn point(&self, [i, j, k]: [usize; 3]) -> DVec3 {
        DVec3::new(self.coords[0][i], self.coords[1][j], self.coords[2][k])
    }
}
