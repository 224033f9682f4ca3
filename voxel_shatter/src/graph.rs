// Voxel arena and six-directional adjacency for one body.
//
// A `VoxelGraph` owns every voxel of a body in a flat `Vec<Voxel>` arena,
// plus an `FxHashMap` from lattice position to arena index. Adjacency is
// stored per voxel as six optional arena indices (one per `Face`), never as
// references, so the cyclic neighbor structure has no ownership cycles.
//
// Links are written only by `calculate_neighbors()`, which recomputes every
// slot from the current position set by probing the six unit offsets. There
// is no incremental patching: when a body's voxel set changes (initial load,
// or a fragment split that seeds a new graph), the graph is rebuilt from
// scratch. This keeps adjacency symmetric by construction
// (`a.top == b` iff `b.bottom == a`), which `adjacency_is_symmetric()`
// checks in debug builds.
//
// The destroyed flag is the only mutable per-voxel state after load. It
// moves false -> true once (`mark_destroyed`) and never reverts. Destroyed
// voxels keep their arena slot and their links: "absent" and "destroyed"
// are distinct states, and both count as open space for meshing and for
// the interior test.
//
// See also: `connectivity.rs` for flood fill over `active_neighbors()`,
// `separation.rs` for the shell-restricted search that relies on
// `is_interior()`, `mesh.rs` for face extraction.

use crate::types::{ENCLOSURE_OFFSETS, Face, Rgba, VoxelCoord};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};

/// Neighbor list for one voxel. Never longer than 6.
pub type NeighborList = SmallVec<[VoxelCoord; 6]>;

/// A single lattice cell.
///
/// Identity is the lattice position: equality and hashing ignore color,
/// the destroyed flag and links.
#[derive(Clone, Debug)]
pub struct Voxel {
    coord: VoxelCoord,
    pub color: Rgba,
    destroyed: bool,
    /// Arena indices of face neighbors, indexed by `Face::index()`.
    links: [Option<u32>; 6],
}

impl Voxel {
    /// A live, unlinked voxel.
    pub fn new(coord: VoxelCoord, color: Rgba) -> Self {
        Self {
            coord,
            color,
            destroyed: false,
            links: [None; 6],
        }
    }

    pub fn coord(&self) -> VoxelCoord {
        self.coord
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// A copy with the same position and color, destroyed flag reset and no
    /// links. Used to seed the graph of a freshly split body.
    pub fn detached(&self) -> Self {
        Self::new(self.coord, self.color)
    }

    /// True if the given slot holds a link.
    pub fn has_link(&self, face: Face) -> bool {
        self.links[face.index()].is_some()
    }
}

impl PartialEq for Voxel {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for Voxel {}

impl Hash for Voxel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coord.hash(state);
    }
}

/// Voxel arena plus position index and adjacency for one body.
#[derive(Clone, Debug, Default)]
pub struct VoxelGraph {
    voxels: Vec<Voxel>,
    index: FxHashMap<VoxelCoord, u32>,
}

impl VoxelGraph {
    /// Build a graph from a voxel set and compute adjacency.
    ///
    /// Incoming links are ignored. If two voxels share a position, the
    /// first one wins. Arena indices are `u32`; voxels past that range are
    /// dropped with a warning.
    pub fn new(voxels: impl IntoIterator<Item = Voxel>) -> Self {
        let mut graph = Self::default();
        for voxel in voxels {
            if graph.index.contains_key(&voxel.coord) {
                continue;
            }
            let idx = u32::try_from(graph.voxels.len());
            debug_assert!(idx.is_ok(), "voxel arena exceeds u32 index range");
            let Ok(idx) = idx else {
                log::warn!(
                    "voxel arena full at {} voxels, dropping the rest",
                    graph.voxels.len()
                );
                break;
            };
            graph.index.insert(voxel.coord, idx);
            graph.voxels.push(voxel);
        }
        graph.calculate_neighbors();
        graph
    }

    /// Build a graph of live voxels from `(position, color)` pairs.
    pub fn from_colored(cells: impl IntoIterator<Item = (VoxelCoord, Rgba)>) -> Self {
        Self::new(cells.into_iter().map(|(c, color)| Voxel::new(c, color)))
    }

    /// Recompute every adjacency slot from the current position set.
    pub fn calculate_neighbors(&mut self) {
        for i in 0..self.voxels.len() {
            let coord = self.voxels[i].coord;
            let mut links = [None; 6];
            for face in Face::ALL {
                links[face.index()] = coord
                    .step(face)
                    .and_then(|n| self.index.get(&n).copied());
            }
            self.voxels[i].links = links;
        }
        debug_assert!(self.adjacency_is_symmetric());
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Number of voxels not yet destroyed.
    pub fn live_count(&self) -> usize {
        self.voxels.iter().filter(|v| !v.destroyed).count()
    }

    pub fn contains(&self, coord: VoxelCoord) -> bool {
        self.index.contains_key(&coord)
    }

    pub fn get(&self, coord: VoxelCoord) -> Option<&Voxel> {
        self.index.get(&coord).map(|&i| &self.voxels[i as usize])
    }

    /// True if a voxel exists at `coord` and is not destroyed.
    pub fn is_live(&self, coord: VoxelCoord) -> bool {
        self.get(coord).is_some_and(|v| !v.destroyed)
    }

    /// All voxels in arena (insertion) order, destroyed ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Voxel> {
        self.voxels.iter()
    }

    /// The neighbor linked on side `face`, if any, regardless of state.
    pub fn neighbor(&self, coord: VoxelCoord, face: Face) -> Option<&Voxel> {
        let voxel = self.get(coord)?;
        voxel.links[face.index()].map(|i| &self.voxels[i as usize])
    }

    /// Linked neighbors that are not destroyed, in `Face::ALL` order.
    pub fn active_neighbors(&self, coord: VoxelCoord) -> NeighborList {
        self.linked(coord).filter(|v| !v.destroyed).map(|v| v.coord).collect()
    }

    /// Linked neighbors regardless of destroyed state, in `Face::ALL` order.
    pub fn all_neighbors(&self, coord: VoxelCoord) -> NeighborList {
        self.linked(coord).map(|v| v.coord).collect()
    }

    fn linked(&self, coord: VoxelCoord) -> impl Iterator<Item = &Voxel> {
        self.get(coord)
            .into_iter()
            .flat_map(|v| v.links.iter().flatten())
            .map(|&i| &self.voxels[i as usize])
    }

    /// True if the face neighbor on side `face` is absent or destroyed.
    pub fn is_face_open(&self, coord: VoxelCoord, face: Face) -> bool {
        self.neighbor(coord, face).is_none_or(|v| v.destroyed)
    }

    /// True only if all 26 enclosing cells (6 face, 12 edge-diagonal,
    /// 8 corner) are present and live.
    ///
    /// Face adjacency alone is not enough to call a voxel hidden: a diagonal
    /// hole still opens a visible gap onto it.
    pub fn is_interior(&self, coord: VoxelCoord) -> bool {
        ENCLOSURE_OFFSETS
            .iter()
            .all(|&off| coord.offset(off).is_some_and(|n| self.is_live(n)))
    }

    /// Set the destroyed flag. Returns `true` if the flag changed, `false`
    /// if the voxel was already destroyed or is absent.
    pub fn mark_destroyed(&mut self, coord: VoxelCoord) -> bool {
        match self.index.get(&coord) {
            Some(&i) => {
                let voxel = &mut self.voxels[i as usize];
                let changed = !voxel.destroyed;
                voxel.destroyed = true;
                changed
            }
            None => false,
        }
    }

    /// Check that every link has a matching back-link on the opposite face.
    pub fn adjacency_is_symmetric(&self) -> bool {
        self.voxels.iter().enumerate().all(|(i, voxel)| {
            Face::ALL.iter().all(|&face| match voxel.links[face.index()] {
                Some(j) => {
                    self.voxels[j as usize].links[face.opposite().index()]
                        == u32::try_from(i).ok()
                }
                None => true,
            })
        })
    }
}
