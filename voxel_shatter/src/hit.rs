// Segment and ray selection of live voxels.
//
// Given a segment in body-local space, returns every live voxel whose
// axis-aligned box (`coord * scale` plus or minus half the scale) the
// segment touches. This is the only producer of destroy requests: callers
// turn a camera ray into a segment (or use `voxels_on_ray()`), then feed
// the returned coordinates to `BodyRegistry::destroy()`.
//
// Intersection uses the slab method: the segment is clipped against the
// three pairs of axis-aligned planes and hits if the clipped parameter
// interval is non-empty. Segments lying exactly in a box face plane count
// as hits. Results come back in arena order, not sorted by distance.

use crate::graph::VoxelGraph;
use crate::types::VoxelCoord;

/// Live voxels whose boxes intersect the segment `from`..`to`.
pub fn voxels_on_segment(
    graph: &VoxelGraph,
    scale: f32,
    from: [f32; 3],
    to: [f32; 3],
) -> Vec<VoxelCoord> {
    let half = scale * 0.5;
    graph
        .iter()
        .filter(|v| !v.is_destroyed())
        .filter(|v| {
            let c = v.coord().scaled_center(scale);
            let min = [c[0] - half, c[1] - half, c[2] - half];
            let max = [c[0] + half, c[1] + half, c[2] + half];
            segment_hits_box(from, to, min, max)
        })
        .map(|v| v.coord())
        .collect()
}

/// Live voxels hit by the ray `origin + t * direction` for `t` in
/// `0..=max_distance`. `direction` need not be normalized; a zero direction
/// degenerates to a point test at `origin`.
pub fn voxels_on_ray(
    graph: &VoxelGraph,
    scale: f32,
    origin: [f32; 3],
    direction: [f32; 3],
    max_distance: f32,
) -> Vec<VoxelCoord> {
    let len = (direction[0] * direction[0]
        + direction[1] * direction[1]
        + direction[2] * direction[2])
        .sqrt();
    let to = if len > 1e-8 {
        std::array::from_fn(|axis| origin[axis] + direction[axis] / len * max_distance)
    } else {
        origin
    };
    voxels_on_segment(graph, scale, origin, to)
}

/// Slab test for the segment `p0`..`p1` against the box `min`..`max`.
pub fn segment_hits_box(p0: [f32; 3], p1: [f32; 3], min: [f32; 3], max: [f32; 3]) -> bool {
    let mut t_enter = 0.0f32;
    let mut t_exit = 1.0f32;

    for axis in 0..3 {
        let d = p1[axis] - p0[axis];
        if d.abs() < f32::EPSILON {
            // Parallel to this slab: must already lie within it.
            if p0[axis] < min[axis] || p0[axis] > max[axis] {
                return false;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - p0[axis]) * inv;
        let mut t1 = (max[axis] - p0[axis]) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return false;
        }
    }

    true
}
