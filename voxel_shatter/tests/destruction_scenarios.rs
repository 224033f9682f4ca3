// End-to-end destruction scenarios through the public registry API.
//
// Each test loads a body (from cells or point-cloud text), issues destroy
// requests the way a host would, and checks the resulting registry: which
// bodies exist, their lineage, voxel counts and surfaces.

use voxel_shatter::body::{BodyRegistry, DestroyReport};
use voxel_shatter::config::ShatterConfig;
use voxel_shatter::connectivity::connected_component;
use voxel_shatter::types::{BodyId, Rgba, VoxelCoord};

fn unit_config() -> ShatterConfig {
    ShatterConfig {
        scale: 1.0,
        ..ShatterConfig::default()
    }
}

/// Axis-aligned box of voxels spanning `0..dx`, `0..dy`, `0..dz`.
fn block(dx: i32, dy: i32, dz: i32) -> Vec<(VoxelCoord, Rgba)> {
    let mut cells = Vec::new();
    for x in 0..dx {
        for y in 0..dy {
            for z in 0..dz {
                cells.push((VoxelCoord::new(x, y, z), Rgba::opaque(90, 60, 30)));
            }
        }
    }
    cells
}

/// Summary of a registry used to compare runs.
fn snapshot(registry: &BodyRegistry) -> Vec<(BodyId, Option<BodyId>, usize, usize)> {
    registry
        .iter()
        .map(|b| {
            (
                b.id(),
                b.parent(),
                b.graph().live_count(),
                b.mesh().face_count(),
            )
        })
        .collect()
}

#[test]
fn source_row_splits_off_far_end() {
    let mut text = String::from("ply\nformat ascii 1.0\nelement vertex 7\nend_header\n");
    for x in 0..7 {
        text.push_str(&format!("{x} 0 0 200 100 50\n"));
    }

    let mut registry = BodyRegistry::new(unit_config());
    let id = registry.load_source(&text).unwrap();
    // Source x maps to lattice -x.
    let report = registry.destroy(id, &[VoxelCoord::new(-3, 0, 0)]);
    assert_eq!(report.spawned, 1);

    let child = registry.children_of(id).next().unwrap();
    assert_eq!(child.graph().len(), 3);
    for voxel in child.graph().iter() {
        assert_eq!(voxel.color, Rgba::opaque(200, 100, 50));
    }
    assert_eq!(registry.get(id).unwrap().graph().live_count(), 3);
}

#[test]
fn cutting_a_wall_column_spawns_the_far_side() {
    let mut registry = BodyRegistry::new(unit_config());
    let wall = registry.load(block(6, 4, 1));

    let report = registry.destroy_along_segment(wall, [2.0, -1.0, 0.0], [2.0, 10.0, 0.0]);
    assert_eq!(report.destroyed, 4);
    assert_eq!(report.separations, 1);
    assert_eq!(report.spawned, 1);

    let remaining = registry.get(wall).unwrap();
    assert_eq!(remaining.graph().live_count(), 8);
    let collider = remaining.collider().unwrap();
    assert_eq!(collider.size, [2.0, 4.0, 1.0]);

    let child = registry.children_of(wall).next().unwrap();
    assert_eq!(child.graph().live_count(), 12);
    assert!(child.graph().iter().all(|v| v.coord().x >= 3));
    // 3x4x1 slab: two 12-face sides plus a perimeter of 14.
    assert_eq!(child.mesh().face_count(), 38);
}

#[test]
fn hole_in_a_plate_does_not_split() {
    let mut registry = BodyRegistry::new(unit_config());
    let plate = registry.load(block(5, 1, 5));
    let before = registry.get(plate).unwrap().mesh().face_count();

    let report = registry.destroy(plate, &[VoxelCoord::new(2, 0, 2)]);
    assert_eq!(report.separations, 0);
    assert_eq!(report.spawned, 0);
    assert_eq!(registry.len(), 1);

    // Top and bottom lose one face each, the hole adds four walls.
    let after = registry.get(plate).unwrap().mesh().face_count();
    assert_eq!(after, before - 2 + 4);
}

#[test]
fn chipping_a_cube_corner_keeps_one_body() {
    let mut registry = BodyRegistry::new(unit_config());
    let cube = registry.load(block(5, 5, 5));
    let report = registry.destroy(cube, &[VoxelCoord::new(0, 0, 0)]);
    assert_eq!(report.pairs_tested, 3);
    assert_eq!(report.separations, 0);
    assert_eq!(registry.get(cube).unwrap().graph().live_count(), 124);
    // A missing corner leaves the face count unchanged.
    assert_eq!(registry.get(cube).unwrap().mesh().face_count(), 150);
}

#[test]
fn small_pieces_become_debris() {
    let mut registry = BodyRegistry::new(unit_config());
    // Five in a row: removing the middle leaves a two-voxel piece on each side.
    let bar = registry.load(block(5, 1, 1));
    let report = registry.destroy(bar, &[VoxelCoord::new(2, 0, 0)]);
    assert_eq!(
        report,
        DestroyReport {
            destroyed: 1,
            pairs_tested: 1,
            separations: 1,
            debris_voxels: 2,
            spawned: 0,
        }
    );
    assert_eq!(registry.len(), 1);
}

#[test]
fn debris_threshold_is_configurable() {
    let mut registry = BodyRegistry::new(ShatterConfig {
        debris_max_voxels: 0,
        ..unit_config()
    });
    let bar = registry.load(block(5, 1, 1));
    let report = registry.destroy(bar, &[VoxelCoord::new(2, 0, 0)]);
    assert_eq!(report.spawned, 1);
    assert_eq!(report.debris_voxels, 0);
}

#[test]
fn repeated_splits_build_lineage() {
    let mut registry = BodyRegistry::new(unit_config());
    let root = registry.load(block(13, 1, 1));

    registry.destroy(root, &[VoxelCoord::new(4, 0, 0)]);
    let first = registry.children_of(root).next().unwrap().id();
    registry.destroy(first, &[VoxelCoord::new(8, 0, 0)]);
    let second = registry.children_of(first).next().unwrap().id();

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.get(second).unwrap().parent(), Some(first));
    assert_eq!(registry.get(first).unwrap().parent(), Some(root));
    let total: usize = registry.iter().map(|b| b.graph().live_count()).sum();
    assert_eq!(total, 11);
}

#[test]
fn racing_does_not_change_results() {
    let serial_config = ShatterConfig {
        race_searches: false,
        ..unit_config()
    };
    let run = |config: ShatterConfig| {
        let mut registry = BodyRegistry::new(config);
        let wall = registry.load(block(9, 4, 2));
        registry.destroy_along_segment(wall, [4.0, -1.0, 0.0], [4.0, 10.0, 0.0]);
        registry.destroy_along_segment(wall, [4.0, -1.0, 1.0], [4.0, 10.0, 1.0]);
        snapshot(&registry)
    };
    let raced = run(unit_config());
    assert_eq!(raced, run(serial_config));
    assert_eq!(raced, run(unit_config()));
}

#[test]
fn request_order_gives_the_same_registry() {
    let run = |order: [i32; 2]| {
        let mut registry = BodyRegistry::new(unit_config());
        let bar = registry.load(block(11, 1, 1));
        let coords = order.map(|x| VoxelCoord::new(x, 0, 0));
        let report = registry.destroy(bar, &coords);
        (report, snapshot(&registry))
    };
    let (forward_report, forward) = run([3, 7]);
    let (reverse_report, reverse) = run([7, 3]);
    assert_eq!(forward_report, reverse_report);
    assert_eq!(forward, reverse);
    assert_eq!(forward_report.spawned, 2);

    // Every body, the original included, is a single connected piece.
    let mut registry = BodyRegistry::new(unit_config());
    let bar = registry.load(block(11, 1, 1));
    registry.destroy(bar, &[VoxelCoord::new(3, 0, 0), VoxelCoord::new(7, 0, 0)]);
    for body in registry.iter() {
        let live: Vec<_> = body
            .graph()
            .iter()
            .filter(|v| !v.is_destroyed())
            .map(|v| v.coord())
            .collect();
        let piece = connected_component(body.graph(), live[0]);
        assert_eq!(piece.len(), live.len(), "{} is split", body.id());
    }
}
