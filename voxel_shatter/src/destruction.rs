// Destroy-batch orchestration.
//
// `destroy_batch()` applies one destroy request to a single body's graph
// and reports what happened as data. It never spawns bodies itself; the
// fragments it returns are turned into bodies by `BodyRegistry::destroy()`.
//
// ## Batch flow
//
// 1. Every requested voxel is marked destroyed up front, so all later
//    reasoning in the batch sees the final state. Requests naming absent or
//    already destroyed voxels drop out here, which makes repeated destroys
//    of the same voxel a no-op.
// 2. Each newly destroyed voxel becomes a `DestroyTask` holding its former
//    live neighbors (captured after step 1, so other voxels of the same
//    batch are not among them).
// 3. Tasks run in lattice-coordinate order, not request order. For each
//    unordered neighbor pair `(a, b)` the task skips the pair if either
//    member has already been carried off by an extraction earlier in the
//    batch (extracted voxels are destroyed, so the destroyed flags are the
//    "already checked" memo); otherwise it asks the separation oracle.
// 4. On `Separated`, the component containing `a` is extracted (originals
//    marked destroyed, copies returned). Components above
//    `debris_max_voxels` are queued as fragments to spawn; smaller ones are
//    debris and simply stay destroyed.
// 5. A `BatchCompletion` barrier counts finished tasks and releases exactly
//    once, after the last one. Its release is what asks the caller for the
//    single surface rebuild of the batch.
// 6. Batches of more than one voxel end with a settle pass. Per-task pairs
//    only relate neighbors of the same destroyed voxel, so two tasks can
//    each leave a live piece behind without ever comparing them (a pair
//    skipped because its other member was carried off, or adjacent
//    destroyed voxels with one live neighbor each). The settle pass takes
//    the batch's surviving boundary voxels in coordinate order, keeps the
//    first as anchor, and extracts every boundary voxel the oracle
//    separates from it. The anchor's piece stays with the original body.
//
// The extracted side is always fixed by coordinates and face order, never
// by "whichever search won the race" or by request order. Both directional
// searches see the same graph and return the same verdict, so the checked
// pairs and the spawned fragment set depend only on the set of destroyed
// voxels.
//
// Mutation (marking, extraction) only happens between oracle calls, while
// no search holds a borrow of the graph.
//
// See also: `separation.rs` for the oracle and race, `connectivity.rs` for
// extraction, `body.rs` for spawning and the trailing mesh rebuild.

use crate::config::ShatterConfig;
use crate::connectivity::{Fragment, extract_component};
use crate::graph::{NeighborList, VoxelGraph};
use crate::separation::{self, RaceOutcome, Side};
use crate::types::VoxelCoord;
use std::collections::BTreeSet;

/// Pair analysis for one destroyed voxel.
#[derive(Clone, Debug)]
pub struct DestroyTask {
    pub voxel: VoxelCoord,
    /// Live neighbors at the moment the batch was marked, in face order.
    pub neighbors: NeighborList,
}

impl DestroyTask {
    /// Unordered neighbor pairs, first member earlier in face order.
    pub fn pairs(&self) -> impl Iterator<Item = (VoxelCoord, VoxelCoord)> + '_ {
        let n = &self.neighbors;
        (0..n.len()).flat_map(move |i| (i + 1..n.len()).map(move |j| (n[i], n[j])))
    }
}

/// Completion barrier for the tasks of one batch.
///
/// `finish_one()` returns `true` exactly once: when the last outstanding
/// task reports in. A batch with no tasks never calls it and so never
/// releases.
#[derive(Debug)]
pub struct BatchCompletion {
    remaining: usize,
    released: bool,
}

impl BatchCompletion {
    pub fn new(tasks: usize) -> Self {
        Self {
            remaining: tasks,
            released: false,
        }
    }

    pub fn finish_one(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 && !self.released {
            self.released = true;
            return true;
        }
        false
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

/// Everything a destroy batch did to one graph.
#[derive(Clone, Debug, Default)]
pub struct BatchOutcome {
    /// Requested voxels that actually changed from live to destroyed.
    pub destroyed: Vec<VoxelCoord>,
    /// Neighbor pairs handed to the oracle.
    pub pairs_tested: usize,
    /// Pairs the oracle reported as separated.
    pub separations: usize,
    /// Voxels retired as debris (fragments too small to spawn).
    pub debris_voxels: usize,
    /// Fragments large enough to become bodies, in extraction order.
    pub fragments: Vec<Fragment>,
    /// Set when the completion barrier released: the body's surface must be
    /// rebuilt once.
    pub rebuild_required: bool,
}

/// Apply one destroy request to `graph`.
pub fn destroy_batch(
    graph: &mut VoxelGraph,
    coords: &[VoxelCoord],
    config: &ShatterConfig,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for &coord in coords {
        if graph.mark_destroyed(coord) {
            outcome.destroyed.push(coord);
        } else if !graph.contains(coord) {
            log::warn!("destroy request names {coord}, which is not part of this body");
        }
    }

    let mut tasks: Vec<DestroyTask> = outcome
        .destroyed
        .iter()
        .map(|&voxel| DestroyTask {
            voxel,
            neighbors: graph.active_neighbors(voxel),
        })
        .collect();
    tasks.sort_by_key(|task| task.voxel);

    let mut completion = BatchCompletion::new(tasks.len());
    for task in &tasks {
        run_task(graph, task, config, &mut outcome);
        if completion.finish_one() {
            outcome.rebuild_required = true;
        }
    }

    if tasks.len() > 1 {
        let boundary: BTreeSet<VoxelCoord> = tasks
            .iter()
            .flat_map(|task| task.neighbors.iter().copied())
            .collect();
        settle(graph, &boundary, config, &mut outcome);
    }

    log::debug!(
        "destroy batch: {} destroyed, {} pairs tested, {} separations, {} fragments, {} debris voxels",
        outcome.destroyed.len(),
        outcome.pairs_tested,
        outcome.separations,
        outcome.fragments.len(),
        outcome.debris_voxels,
    );
    outcome
}

fn run_task(
    graph: &mut VoxelGraph,
    task: &DestroyTask,
    config: &ShatterConfig,
    outcome: &mut BatchOutcome,
) {
    for (a, b) in task.pairs() {
        if !graph.is_live(a) || !graph.is_live(b) {
            continue;
        }

        let result = test_pair(graph, a, b, config);
        outcome.pairs_tested += 1;
        log::trace!(
            "{}: pair {a} / {b} -> {:?} (won by {:?})",
            task.voxel,
            result.verdict,
            result.winner
        );
        if result.verdict.is_separated() {
            retire(graph, a, config, outcome);
        }
    }
}

/// Split off every boundary piece the oracle cannot connect to the anchor.
fn settle(
    graph: &mut VoxelGraph,
    boundary: &BTreeSet<VoxelCoord>,
    config: &ShatterConfig,
    outcome: &mut BatchOutcome,
) {
    let mut anchor: Option<VoxelCoord> = None;
    for &coord in boundary {
        if !graph.is_live(coord) {
            continue;
        }
        let Some(keep) = anchor.filter(|&a| graph.is_live(a)) else {
            anchor = Some(coord);
            continue;
        };

        let result = test_pair(graph, keep, coord, config);
        outcome.pairs_tested += 1;
        log::trace!("settle: {keep} / {coord} -> {:?}", result.verdict);
        if result.verdict.is_separated() {
            retire(graph, coord, config, outcome);
        }
    }
}

/// Extract the component of `seed` and sort it into fragments or debris.
fn retire(
    graph: &mut VoxelGraph,
    seed: VoxelCoord,
    config: &ShatterConfig,
    outcome: &mut BatchOutcome,
) {
    outcome.separations += 1;
    let fragment = extract_component(graph, seed);
    if fragment.len() > config.debris_max_voxels {
        outcome.fragments.push(fragment);
    } else {
        outcome.debris_voxels += fragment.len();
    }
}

fn test_pair(
    graph: &VoxelGraph,
    a: VoxelCoord,
    b: VoxelCoord,
    config: &ShatterConfig,
) -> RaceOutcome {
    if config.race_searches {
        separation::race(graph, a, b, config.search_step_cost)
    } else {
        RaceOutcome {
            verdict: separation::search(graph, a, b, config.search_step_cost),
            winner: Side::A,
        }
    }
}
