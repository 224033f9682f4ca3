// Flood-fill connected-component extraction.
//
// BFS over the active-neighbor relation (face-adjacent, not destroyed),
// collecting *detached* copies of every reachable voxel into a `Fragment`
// keyed by lattice position. Detached copies carry position and color only;
// they are meant to seed a new `VoxelGraph` whose adjacency is re-derived
// from scratch, so a split body shares nothing with the body it came from.
//
// Two entry points:
// - `connected_component()` reads the graph and leaves it untouched.
// - `extract_component()` additionally marks every visited *original* voxel
//   destroyed, retiring the fragment from the source body.
//
// The result is a `BTreeMap`, so two fills from different seeds in the same
// component compare equal regardless of visitation order.

use crate::graph::{Voxel, VoxelGraph};
use crate::types::VoxelCoord;
use rustc_hash::FxHashSet;
use std::collections::{BTreeMap, VecDeque};

/// A connected set of detached voxel copies, keyed by position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragment {
    pub voxels: BTreeMap<VoxelCoord, Voxel>,
}

impl Fragment {
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    pub fn contains(&self, coord: VoxelCoord) -> bool {
        self.voxels.contains_key(&coord)
    }

    pub fn coords(&self) -> impl Iterator<Item = VoxelCoord> + '_ {
        self.voxels.keys().copied()
    }

    /// Consume the fragment into a standalone graph with fresh adjacency.
    pub fn into_graph(self) -> VoxelGraph {
        VoxelGraph::new(self.voxels.into_values())
    }
}

/// Collect every voxel reachable from `seed` through live face neighbors.
///
/// The seed itself is always included when it exists in the graph, even if
/// it is already destroyed. An absent seed yields an empty fragment.
pub fn connected_component(graph: &VoxelGraph, seed: VoxelCoord) -> Fragment {
    let mut fragment = Fragment::default();
    let Some(start) = graph.get(seed) else {
        return fragment;
    };

    let mut visited = FxHashSet::default();
    let mut queue = VecDeque::new();
    visited.insert(seed);
    queue.push_back(seed);
    fragment.voxels.insert(seed, start.detached());

    while let Some(current) = queue.pop_front() {
        for neighbor in graph.active_neighbors(current) {
            if !visited.insert(neighbor) {
                continue;
            }
            if let Some(voxel) = graph.get(neighbor) {
                fragment.voxels.insert(neighbor, voxel.detached());
                queue.push_back(neighbor);
            }
        }
    }

    fragment
}

/// Like `connected_component()`, but marks every visited original voxel
/// destroyed.
pub fn extract_component(graph: &mut VoxelGraph, seed: VoxelCoord) -> Fragment {
    let fragment = connected_component(graph, seed);
    for coord in fragment.coords() {
        graph.mark_destroyed(coord);
    }
    fragment
}

/// True if `to` is reachable from `from` through live face neighbors.
pub fn is_reachable(graph: &VoxelGraph, from: VoxelCoord, to: VoxelCoord) -> bool {
    connected_component(graph, from).contains(to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgba;

    fn row(n: i32) -> VoxelGraph {
        VoxelGraph::from_colored((0..n).map(|x| (VoxelCoord::new(x, 0, 0), Rgba::WHITE)))
    }

    /// Two 2x2x2 blocks joined by a one-voxel bridge along X.
    fn dumbbell() -> VoxelGraph {
        let mut cells = Vec::new();
        for &x0 in &[0, 3] {
            for x in x0..x0 + 2 {
                for y in 0..2 {
                    for z in 0..2 {
                        cells.push((VoxelCoord::new(x, y, z), Rgba::WHITE));
                    }
                }
            }
        }
        cells.push((VoxelCoord::new(2, 0, 0), Rgba::WHITE));
        VoxelGraph::from_colored(cells)
    }

    #[test]
    fn component_covers_whole_connected_body() {
        let graph = dumbbell();
        let fragment = connected_component(&graph, VoxelCoord::new(0, 0, 0));
        assert_eq!(fragment.len(), 17);
    }

    #[test]
    fn component_is_seed_independent() {
        let mut graph = dumbbell();
        graph.mark_destroyed(VoxelCoord::new(2, 0, 0));
        let a = connected_component(&graph, VoxelCoord::new(0, 0, 0));
        let b = connected_component(&graph, VoxelCoord::new(1, 1, 1));
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
        let c = connected_component(&graph, VoxelCoord::new(4, 1, 0));
        assert_eq!(c.len(), 8);
        assert!(a.coords().all(|coord| !c.contains(coord)));
    }

    #[test]
    fn component_copies_are_detached() {
        let graph = row(3);
        let fragment = connected_component(&graph, VoxelCoord::new(1, 0, 0));
        for voxel in fragment.voxels.values() {
            assert!(!voxel.is_destroyed());
        }
        // The original graph is untouched.
        assert_eq!(graph.live_count(), 3);
    }

    #[test]
    fn extract_marks_originals_destroyed() {
        let mut graph = row(5);
        graph.mark_destroyed(VoxelCoord::new(2, 0, 0));
        let fragment = extract_component(&mut graph, VoxelCoord::new(3, 0, 0));
        assert_eq!(fragment.len(), 2);
        assert!(graph.get(VoxelCoord::new(3, 0, 0)).unwrap().is_destroyed());
        assert!(graph.get(VoxelCoord::new(4, 0, 0)).unwrap().is_destroyed());
        assert!(!graph.get(VoxelCoord::new(0, 0, 0)).unwrap().is_destroyed());
        assert_eq!(graph.live_count(), 2);
        // Copies stay live even though the originals are gone.
        assert!(fragment.voxels.values().all(|v| !v.is_destroyed()));
    }

    #[test]
    fn absent_seed_is_empty() {
        let graph = row(2);
        assert!(connected_component(&graph, VoxelCoord::new(7, 7, 7)).is_empty());
    }

    #[test]
    fn isolated_seed_returns_itself() {
        let mut graph = row(3);
        graph.mark_destroyed(VoxelCoord::new(1, 0, 0));
        let fragment = connected_component(&graph, VoxelCoord::new(0, 0, 0));
        assert_eq!(fragment.len(), 1);
        assert!(fragment.contains(VoxelCoord::new(0, 0, 0)));
    }

    #[test]
    fn fragment_into_graph_is_symmetric() {
        let graph = dumbbell();
        let g2 = connected_component(&graph, VoxelCoord::new(0, 0, 0)).into_graph();
        assert_eq!(g2.len(), 17);
        assert!(g2.adjacency_is_symmetric());
    }

    #[test]
    fn reachability_follows_live_voxels() {
        let mut graph = row(4);
        assert!(is_reachable(&graph, VoxelCoord::new(0, 0, 0), VoxelCoord::new(3, 0, 0)));
        graph.mark_destroyed(VoxelCoord::new(2, 0, 0));
        assert!(!is_reachable(&graph, VoxelCoord::new(0, 0, 0), VoxelCoord::new(3, 0, 0)));
    }
}
