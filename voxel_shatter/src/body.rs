// Bodies and the body registry.
//
// A `Body` is the explicit composition the rest of the crate works with:
// one `VoxelGraph`, the `SurfaceMesh` generated from it, an optional
// `BoxCollider` fitted to the mesh bounds, the lattice scale, and the id of
// the body it was split from (if any).
//
// `BodyRegistry` is an arena of bodies keyed by `BodyId` (the arena index)
// and owns the `ShatterConfig` applied to all of them. Every operation takes
// the target body id explicitly; there is no ambient lookup. Bodies are
// never removed: a body whose voxels were all carried off by splits stays
// registered with an empty graph and an empty mesh, so ids remain stable.
//
// `destroy()` is the entry point for destroy requests. It runs one batch
// (`destruction.rs`), rebuilds the target's surface once if the batch
// released, then spawns each queued fragment as a child body. Fragment
// meshes are built in parallel on the rayon pool; ids are assigned in
// extraction order so registry layout does not depend on scheduling.
//
// See also: `destruction.rs` for the batch itself, `mesh.rs` for surface
// generation and collider fitting, `hit.rs` for segment selection.

use crate::config::ShatterConfig;
use crate::destruction::destroy_batch;
use crate::error::{LoadError, SourceError};
use crate::graph::VoxelGraph;
use crate::hit;
use crate::mesh::{BoxCollider, SurfaceMesh, build_surface_mesh};
use crate::source;
use crate::types::{BodyId, Rgba, VoxelCoord};
use rayon::prelude::*;
use std::path::Path;

/// One independently tracked voxel structure.
#[derive(Clone, Debug)]
pub struct Body {
    id: BodyId,
    parent: Option<BodyId>,
    graph: VoxelGraph,
    mesh: SurfaceMesh,
    collider: Option<BoxCollider>,
    scale: f32,
}

impl Body {
    fn assemble(
        id: BodyId,
        parent: Option<BodyId>,
        graph: VoxelGraph,
        config: &ShatterConfig,
    ) -> Self {
        let mut body = Self {
            id,
            parent,
            graph,
            mesh: SurfaceMesh::default(),
            collider: config.attach_collider.then(BoxCollider::default),
            scale: config.scale,
        };
        body.rebuild_mesh();
        body
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    /// The body this one was split from, `None` for loaded bodies.
    pub fn parent(&self) -> Option<BodyId> {
        self.parent
    }

    pub fn graph(&self) -> &VoxelGraph {
        &self.graph
    }

    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    pub fn collider(&self) -> Option<&BoxCollider> {
        self.collider.as_ref()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Regenerate the surface from the current graph and refit the collider.
    pub fn rebuild_mesh(&mut self) {
        self.mesh = build_surface_mesh(&self.graph, self.scale);
        if let Some(collider) = &mut self.collider {
            collider.fit(self.mesh.bounds);
        }
    }

    /// Live voxels of this body touched by a body-local segment.
    pub fn select_segment(&self, from: [f32; 3], to: [f32; 3]) -> Vec<VoxelCoord> {
        hit::voxels_on_segment(&self.graph, self.scale, from, to)
    }
}

/// Counts describing one destroy request. Spawned bodies themselves are
/// found through `BodyRegistry::children_of()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DestroyReport {
    pub destroyed: usize,
    pub pairs_tested: usize,
    pub separations: usize,
    pub debris_voxels: usize,
    pub spawned: usize,
}

/// Arena of all bodies, indexed by `BodyId`.
#[derive(Clone, Debug, Default)]
pub struct BodyRegistry {
    bodies: Vec<Body>,
    config: ShatterConfig,
}

impl BodyRegistry {
    pub fn new(config: ShatterConfig) -> Self {
        Self {
            bodies: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &ShatterConfig {
        &self.config
    }

    /// Create a body from `(position, color)` pairs. The first occurrence of
    /// a repeated position wins.
    pub fn load(&mut self, cells: impl IntoIterator<Item = (VoxelCoord, Rgba)>) -> BodyId {
        let graph = VoxelGraph::from_colored(cells);
        let id = self.next_id();
        log::debug!("loaded {id} with {} voxels", graph.len());
        self.bodies.push(Body::assemble(id, None, graph, &self.config));
        id
    }

    /// Create a body from point-cloud text.
    pub fn load_source(&mut self, text: &str) -> Result<BodyId, SourceError> {
        let cells = source::parse_source(text)?;
        Ok(self.load(cells))
    }

    /// Create a body from a point-cloud file.
    pub fn load_source_file(&mut self, path: impl AsRef<Path>) -> Result<BodyId, LoadError> {
        let cells = source::load_source_file(path)?;
        Ok(self.load(cells))
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Bodies split directly off `parent`, in creation order.
    pub fn children_of(&self, parent: BodyId) -> impl Iterator<Item = &Body> {
        self.bodies
            .iter()
            .filter(move |b| b.parent == Some(parent))
    }

    /// Destroy `coords` in body `id`, splitting off and spawning any
    /// fragments that lose their connection to the rest of the body.
    pub fn destroy(&mut self, id: BodyId, coords: &[VoxelCoord]) -> DestroyReport {
        let Some(body) = self.bodies.get_mut(id.0 as usize) else {
            log::warn!("destroy request for unknown {id}");
            return DestroyReport::default();
        };

        let outcome = destroy_batch(&mut body.graph, coords, &self.config);
        if outcome.rebuild_required {
            body.rebuild_mesh();
        }

        let report = DestroyReport {
            destroyed: outcome.destroyed.len(),
            pairs_tested: outcome.pairs_tested,
            separations: outcome.separations,
            debris_voxels: outcome.debris_voxels,
            spawned: outcome.fragments.len(),
        };

        let base = self.bodies.len();
        let config = &self.config;
        let spawned: Vec<Body> = outcome
            .fragments
            .into_par_iter()
            .enumerate()
            .map(|(i, fragment)| {
                Body::assemble(body_id(base + i), Some(id), fragment.into_graph(), config)
            })
            .collect();
        for child in &spawned {
            log::debug!(
                "split {} off {id} with {} voxels",
                child.id,
                child.graph.len()
            );
        }
        self.bodies.extend(spawned);

        report
    }

    /// Destroy every live voxel of body `id` touched by a body-local segment.
    pub fn destroy_along_segment(
        &mut self,
        id: BodyId,
        from: [f32; 3],
        to: [f32; 3],
    ) -> DestroyReport {
        let Some(body) = self.get(id) else {
            log::warn!("segment destroy for unknown {id}");
            return DestroyReport::default();
        };
        let coords = body.select_segment(from, to);
        self.destroy(id, &coords)
    }

    fn next_id(&self) -> BodyId {
        body_id(self.bodies.len())
    }
}

/// Id for arena slot `index`. Ids are `u32`; the arena never grows past that
/// range in practice, and release builds pin overflowing ids to `u32::MAX`.
fn body_id(index: usize) -> BodyId {
    let id = u32::try_from(index);
    debug_assert!(id.is_ok(), "body arena exceeds u32 id range");
    BodyId(id.unwrap_or(u32::MAX))
}
