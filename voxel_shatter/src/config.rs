// Data-driven engine configuration.
//
// All tunable parameters of the destruction engine live in `ShatterConfig`,
// loaded from JSON. Missing fields fall back to `Default`, so a config file
// only needs to name what it changes.
//
// See also: `body.rs` which applies `scale` and `attach_collider` when a body
// is created, `destruction.rs` which reads the debris threshold, the search
// step cost and the race toggle.

use serde::{Deserialize, Serialize};

/// Tunable parameters for loading, destroying and meshing bodies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShatterConfig {
    /// Edge length of one lattice cell in body-local units.
    pub scale: f32,

    /// Fragments with at most this many voxels are debris: they are retired
    /// from the source body but never spawned as bodies of their own.
    pub debris_max_voxels: usize,

    /// Fixed cost per edge in the separation search. Only relative to the
    /// squared-distance heuristic; the oracle never reports a path length.
    pub search_step_cost: f32,

    /// Run the A->B and B->A separation searches concurrently and take the
    /// first answer. When false only the A->B search runs, on the calling
    /// thread.
    pub race_searches: bool,

    /// Give every body a box collider that tracks its mesh bounds.
    pub attach_collider: bool,
}

impl Default for ShatterConfig {
    fn default() -> Self {
        Self {
            scale: 0.1,
            debris_max_voxels: 2,
            search_step_cost: 10.0,
            race_searches: true,
            attach_collider: true,
        }
    }
}

impl ShatterConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
