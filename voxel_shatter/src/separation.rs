// Shell-restricted best-first search used as a separation oracle.
//
// After a voxel is destroyed, the engine needs to know whether two of its
// former neighbors are still connected. A full flood fill answers that but
// costs O(body). This oracle instead runs a greedy best-first search from
// one neighbor toward the other, expanding only *shell* voxels (those for
// which `VoxelGraph::is_interior()` is false). Near a fresh hole the shell
// is small, so the search usually terminates after a handful of steps.
//
// Search details:
// - Open set is a `BinaryHeap` (min-heap via reversed ordering, same pattern
//   as the nav A*), keyed by `h + g` with ties broken by position.
// - `h` is the squared Euclidean distance to the goal; `g` grows by a fixed
//   `step_cost` per edge. The squared heuristic overestimates, so this is
//   greedy best-first rather than optimal A*. Only the boolean answer is
//   used, never the path.
// - A node's neighbors are taken from `all_neighbors()` minus interior
//   voxels. Seeing the goal among them reports `Connected` immediately;
//   destroyed neighbors are never expanded.
// - Exhausting the open set reports `Separated`. That is an expected
//   outcome, not an error.
//
// Known approximation: if the only surviving path between the two voxels
// runs through interior (fully enclosed) voxels, the oracle reports
// `Separated` even though a flood fill would find a path. The engine then
// extracts the side it seeded from, which is correct whenever the pieces
// really are disjoint and over-eager otherwise. This matches the visible
// surface notion of connectivity the mesher renders.
//
// `race()` launches the A->B and B->A searches concurrently with
// `rayon::join`. Whichever finishes first supplies the verdict; the other
// is drained (it runs to completion and its answer is discarded). Both
// searches read the same immutable `&VoxelGraph`, so no search can observe
// a mutation made mid-flight.

use crate::graph::VoxelGraph;
use crate::types::VoxelCoord;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::OnceLock;

/// Answer of a single separation search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The goal was reached through the shell.
    Connected,
    /// The open set emptied without reaching the goal.
    Separated,
}

impl Verdict {
    pub fn is_separated(self) -> bool {
        self == Verdict::Separated
    }
}

/// Which endpoint a search was seeded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

/// Result of racing the two directional searches for one pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RaceOutcome {
    pub verdict: Verdict,
    /// The search whose answer was used.
    pub winner: Side,
}

/// Transient search record.
#[derive(Clone, Copy, Debug)]
struct SearchNode {
    coord: VoxelCoord,
    /// Squared distance to the goal.
    h_cost: f32,
    /// Accumulated step cost from the start.
    g_cost: f32,
}

impl SearchNode {
    fn f_cost(&self) -> f32 {
        self.h_cost + self.g_cost
    }
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode {}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: smallest f_cost is "greatest".
        other
            .f_cost()
            .total_cmp(&self.f_cost())
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

/// Decide whether `goal` is reachable from `start` through the shell.
///
/// `start` is always expanded, even if it is interior. A `start` missing
/// from the graph has nothing to expand and reports `Separated`.
pub fn search(
    graph: &VoxelGraph,
    start: VoxelCoord,
    goal: VoxelCoord,
    step_cost: f32,
) -> Verdict {
    if start == goal {
        return Verdict::Connected;
    }
    if !graph.contains(start) {
        return Verdict::Separated;
    }

    let heuristic = |c: VoxelCoord| c.squared_distance(goal) as f32;

    let mut best_g: FxHashMap<VoxelCoord, f32> = FxHashMap::default();
    let mut closed: FxHashSet<VoxelCoord> = FxHashSet::default();
    let mut open = BinaryHeap::new();

    best_g.insert(start, 0.0);
    open.push(SearchNode {
        coord: start,
        h_cost: heuristic(start),
        g_cost: 0.0,
    });

    while let Some(current) = open.pop() {
        if current.coord == goal {
            return Verdict::Connected;
        }
        if !closed.insert(current.coord) {
            continue;
        }

        for neighbor in graph.all_neighbors(current.coord) {
            if graph.is_interior(neighbor) {
                continue;
            }
            if neighbor == goal {
                return Verdict::Connected;
            }
            if !graph.is_live(neighbor) || closed.contains(&neighbor) {
                continue;
            }

            let tentative_g = current.g_cost + step_cost;
            let improved = best_g.get(&neighbor).is_none_or(|&g| tentative_g < g);
            if improved {
                best_g.insert(neighbor, tentative_g);
                open.push(SearchNode {
                    coord: neighbor,
                    h_cost: heuristic(neighbor),
                    g_cost: tentative_g,
                });
            }
        }
    }

    Verdict::Separated
}

/// Race the A->B and B->A searches and take whichever finishes first.
///
/// Both searches always run to completion; the slower one is drained and
/// its answer discarded.
pub fn race(graph: &VoxelGraph, a: VoxelCoord, b: VoxelCoord, step_cost: f32) -> RaceOutcome {
    let first: OnceLock<Side> = OnceLock::new();

    let (from_a, from_b) = rayon::join(
        || {
            let verdict = search(graph, a, b, step_cost);
            let _ = first.set(Side::A);
            verdict
        },
        || {
            let verdict = search(graph, b, a, step_cost);
            let _ = first.set(Side::B);
            verdict
        },
    );

    let winner = first.into_inner().unwrap_or(Side::A);
    let verdict = match winner {
        Side::A => from_a,
        Side::B => from_b,
    };
    if from_a != from_b {
        log::warn!("separation searches disagree for {a} <-> {b}: {from_a:?} vs {from_b:?}");
    }
    RaceOutcome { verdict, winner }
}
