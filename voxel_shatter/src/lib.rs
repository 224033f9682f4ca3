// voxel_shatter: destructible voxel body engine.
//
// A body is a set of unit cubes on an integer lattice. Destroying voxels can
// cut a body into pieces; this crate detects the cut with a bounded pairwise
// search, carries the cut-off part away as a new body, and regenerates the
// renderable surface of everything that changed. It has no rendering,
// physics or input dependencies: meshes come out as flat arrays and hosts
// feed destroy requests in as lattice coordinates.
//
// Module overview:
// - `types.rs`:        VoxelCoord, Face directions, Rgba, BodyId, the 26-cell enclosure shell.
// - `graph.rs`:        VoxelGraph: position -> voxel map with six-directional adjacency.
// - `connectivity.rs`: Flood-fill component extraction (Fragment).
// - `separation.rs`:   Best-first separation oracle and the two-way search race.
// - `destruction.rs`:  Destroy batches: per-voxel pair analysis, debris threshold, completion barrier.
// - `mesh.rs`:         Open-face surface mesh, bounds, and box collider fitting.
// - `body.rs`:         Body (graph + mesh + collider) and the BodyRegistry arena.
// - `hit.rs`:          Segment/ray selection of live voxels.
// - `source.rs`:       Point-cloud text parsing.
// - `config.rs`:       ShatterConfig: all tunable parameters, loaded from JSON.
// - `error.rs`:        SourceError / LoadError.
//
// The command-line front end lives in the companion crate
// `voxel_shatter_cli`.
//
// **Determinism.** The separation race runs on the rayon pool, but which
// search finishes first never changes the result: fragments are always
// extracted from the same side of a pair, destroy tasks run in coordinate
// order rather than request order, and body ids are assigned in extraction
// order. Identical voxel sets give identical registries.

pub mod body;
pub mod config;
pub mod connectivity;
pub mod destruction;
pub mod error;
pub mod graph;
pub mod hit;
pub mod mesh;
pub mod separation;
pub mod source;
pub mod types;
