// Face-culled surface mesh generation for a voxel body.
//
// Produces flat geometry buffers from the live voxels of a `VoxelGraph`. A
// face is emitted for each side of a live voxel whose neighbor slot is
// absent or destroyed; faces between two live voxels are culled on both
// sides, and fully enclosed voxels produce no geometry at all.
//
// Each emitted face owns its 4 vertices (no sharing across faces or voxels)
// and contributes 2 triangles. Vertices are placed at the voxel's scaled
// center plus or minus half the scale along the two in-plane axes, and all
// four carry the voxel's flat color and the face's flat normal. Triangles
// wind counter-clockwise when viewed from outside, so the right-hand normal
// of every triangle points away from the voxel.
//
// After emission the axis-aligned bounds are computed from the vertex set;
// `BoxCollider::fit()` resizes a body's collider to match.
//
// This is a read-only rendering utility: it does not mutate the graph.
//
// See also: `graph.rs` for `is_face_open()`, `body.rs` which owns the
// `SurfaceMesh` and collider of each body.

use crate::graph::VoxelGraph;
use crate::types::Face;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Mesh geometry output: flat arrays ready for any mesh host.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfaceMesh {
    /// Vertex positions as flat [x, y, z, x, y, z, ...].
    pub vertices: Vec<f32>,
    /// Per-vertex normals as flat [nx, ny, nz, ...].
    pub normals: Vec<f32>,
    /// Per-vertex colors as flat [r, g, b, a, ...].
    pub colors: Vec<u8>,
    /// Triangle indices (3 per triangle).
    pub indices: Vec<u32>,
    /// Bounds of the vertex set, `None` when nothing was emitted.
    pub bounds: Option<Aabb>,
}

impl SurfaceMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of quads emitted (each face owns 4 vertices).
    pub fn face_count(&self) -> usize {
        self.vertex_count() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Position of vertex `i`.
    pub fn vertex(&self, i: usize) -> [f32; 3] {
        [
            self.vertices[i * 3],
            self.vertices[i * 3 + 1],
            self.vertices[i * 3 + 2],
        ]
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Aabb {
    /// Smallest box containing every point of a flat `[x, y, z, ...]` list.
    pub fn from_flat_points(points: &[f32]) -> Option<Self> {
        let mut chunks = points.chunks_exact(3);
        let first = chunks.next()?;
        let mut min = [first[0], first[1], first[2]];
        let mut max = min;
        for p in chunks {
            min = std::array::from_fn(|axis| min[axis].min(p[axis]));
            max = std::array::from_fn(|axis| max[axis].max(p[axis]));
        }
        Some(Self { min, max })
    }

    pub fn center(&self) -> [f32; 3] {
        std::array::from_fn(|axis| (self.min[axis] + self.max[axis]) * 0.5)
    }

    pub fn size(&self) -> [f32; 3] {
        std::array::from_fn(|axis| self.max[axis] - self.min[axis])
    }
}

/// Box-shaped bounding collider attached to a body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxCollider {
    pub center: [f32; 3],
    pub size: [f32; 3],
}

impl BoxCollider {
    /// Recenter and resize to `bounds`. Without bounds (empty mesh) the
    /// collider collapses to zero size at the origin.
    pub fn fit(&mut self, bounds: Option<Aabb>) {
        match bounds {
            Some(b) => {
                self.center = b.center();
                self.size = b.size();
            }
            None => *self = Self::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Face table
// ---------------------------------------------------------------------------

/// Corner signs (multiples of half the scale) and normal for one cube face.
struct FaceDesc {
    /// 4 corners relative to the voxel center, in units of half the scale.
    /// Counter-clockwise when viewed from outside.
    corners: [[f32; 3]; 4],
    /// Outward-facing normal.
    normal: [f32; 3],
}

/// Face geometry indexed by `Face::index()`: top, bottom, front, back,
/// right, left.
const FACES: [FaceDesc; 6] = [
    // Top (+Y)
    FaceDesc {
        corners: [
            [-1.0, 1.0, -1.0],
            [-1.0, 1.0, 1.0],
            [1.0, 1.0, 1.0],
            [1.0, 1.0, -1.0],
        ],
        normal: [0.0, 1.0, 0.0],
    },
    // Bottom (-Y)
    FaceDesc {
        corners: [
            [-1.0, -1.0, 1.0],
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [1.0, -1.0, 1.0],
        ],
        normal: [0.0, -1.0, 0.0],
    },
    // Front (+Z)
    FaceDesc {
        corners: [
            [1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
            [-1.0, -1.0, 1.0],
        ],
        normal: [0.0, 0.0, 1.0],
    },
    // Back (-Z)
    FaceDesc {
        corners: [
            [-1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [1.0, 1.0, -1.0],
            [1.0, -1.0, -1.0],
        ],
        normal: [0.0, 0.0, -1.0],
    },
    // Right (+X)
    FaceDesc {
        corners: [
            [1.0, -1.0, -1.0],
            [1.0, 1.0, -1.0],
            [1.0, 1.0, 1.0],
            [1.0, -1.0, 1.0],
        ],
        normal: [1.0, 0.0, 0.0],
    },
    // Left (-X)
    FaceDesc {
        corners: [
            [-1.0, -1.0, 1.0],
            [-1.0, 1.0, 1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, -1.0],
        ],
        normal: [-1.0, 0.0, 0.0],
    },
];

// ---------------------------------------------------------------------------
// Mesh generation
// ---------------------------------------------------------------------------

/// Build the surface of every live voxel in `graph` on a lattice of `scale`.
///
/// An empty or fully destroyed graph yields an empty mesh with no bounds.
pub fn build_surface_mesh(graph: &VoxelGraph, scale: f32) -> SurfaceMesh {
    let half = scale * 0.5;
    let mut mesh = SurfaceMesh::default();

    for voxel in graph.iter() {
        if voxel.is_destroyed() {
            continue;
        }
        let coord = voxel.coord();
        let center = coord.scaled_center(scale);
        let color = voxel.color.to_array();

        for face in Face::ALL {
            if !graph.is_face_open(coord, face) {
                continue;
            }
            let desc = &FACES[face.index()];
            let base_idx = mesh.vertex_count() as u32;

            for corner in &desc.corners {
                for (c, k) in center.iter().zip(corner) {
                    mesh.vertices.push(c + k * half);
                }
                mesh.normals.extend_from_slice(&desc.normal);
                mesh.colors.extend_from_slice(&color);
            }

            // 2 triangles: 0-1-2, 0-2-3
            mesh.indices.extend_from_slice(&[
                base_idx,
                base_idx + 1,
                base_idx + 2,
                base_idx,
                base_idx + 2,
                base_idx + 3,
            ]);
        }
    }

    mesh.bounds = Aabb::from_flat_points(&mesh.vertices);
    mesh
}
