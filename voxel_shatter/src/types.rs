// Core types shared across the destruction engine.
//
// Defines lattice coordinates (`VoxelCoord`), voxel colors (`Rgba`), the six
// face directions (`Face`) with their unit offsets, body identifiers
// (`BodyId`), and the 26-position enclosure shell used by the interior test.
// All types derive `Serialize` and `Deserialize` so configs, fixtures and
// debug dumps can carry them as JSON.
//
// Axis conventions (right-handed, matching the mesh output):
// - X: right (positive) / left   (negative)
// - Y: top   (positive) / bottom (negative)
// - Z: front (positive) / back   (negative)

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position on the voxel lattice. Each component is in voxel units; world
/// positions are obtained by multiplying with the owning body's scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The coordinate displaced by `(dx, dy, dz)`, or `None` past the edge
    /// of the `i32` lattice. Cells beyond the edge never exist, so callers
    /// treat `None` like an absent neighbor.
    pub const fn offset(self, (dx, dy, dz): (i32, i32, i32)) -> Option<Self> {
        match (
            self.x.checked_add(dx),
            self.y.checked_add(dy),
            self.z.checked_add(dz),
        ) {
            (Some(x), Some(y), Some(z)) => Some(Self::new(x, y, z)),
            _ => None,
        }
    }

    /// The face-adjacent coordinate in direction `face`.
    pub const fn step(self, face: Face) -> Option<Self> {
        self.offset(face.offset())
    }

    /// Squared Euclidean distance between two coordinates.
    pub fn squared_distance(self, other: Self) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        let dz = i64::from(self.z) - i64::from(other.z);
        dx * dx + dy * dy + dz * dz
    }

    /// Center of this voxel in body-local space for a lattice of `scale`.
    pub fn scaled_center(self, scale: f32) -> [f32; 3] {
        [
            self.x as f32 * scale,
            self.y as f32 * scale,
            self.z as f32 * scale,
        ]
    }
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// The six face directions of a lattice cell.
///
/// Declaration order is the canonical neighbor order used everywhere a
/// neighbor list is produced: top, bottom, front, back, right, left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    Top,
    Bottom,
    Front,
    Back,
    Right,
    Left,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Top,
        Face::Bottom,
        Face::Front,
        Face::Back,
        Face::Right,
        Face::Left,
    ];

    /// Unit lattice offset toward the neighbor on this side.
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Face::Top => (0, 1, 0),
            Face::Bottom => (0, -1, 0),
            Face::Front => (0, 0, 1),
            Face::Back => (0, 0, -1),
            Face::Right => (1, 0, 0),
            Face::Left => (-1, 0, 0),
        }
    }

    pub const fn opposite(self) -> Face {
        match self {
            Face::Top => Face::Bottom,
            Face::Bottom => Face::Top,
            Face::Front => Face::Back,
            Face::Back => Face::Front,
            Face::Right => Face::Left,
            Face::Left => Face::Right,
        }
    }

    /// Index into per-face arrays (same as position in `ALL`).
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// The 26 lattice offsets of the cells enclosing a voxel: 6 face neighbors,
/// 12 edge-diagonal neighbors and 8 corner neighbors.
pub const ENCLOSURE_OFFSETS: [(i32, i32, i32); 26] = enclosure_offsets();

const fn enclosure_offsets() -> [(i32, i32, i32); 26] {
    let mut out = [(0, 0, 0); 26];
    let mut n = 0;
    let mut i = 0;
    while i < 27 {
        let dx = (i % 3) as i32 - 1;
        let dy = ((i / 3) % 3) as i32 - 1;
        let dz = (i / 9) as i32 - 1;
        if dx != 0 || dy != 0 || dz != 0 {
            out[n] = (dx, dy, dz);
            n += 1;
        }
        i += 1;
    }
    out
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// Opaque RGBA color, 8 bits per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Color with alpha fixed at 255.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

// ---------------------------------------------------------------------------
// Body IDs: arena indices into the `BodyRegistry`.
// ---------------------------------------------------------------------------

/// Compact identifier for a body in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BodyId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn opposite_faces_cancel_offsets() {
        for face in Face::ALL {
            let (ax, ay, az) = face.offset();
            let (bx, by, bz) = face.opposite().offset();
            assert_eq!((ax + bx, ay + by, az + bz), (0, 0, 0));
            assert_eq!(face.opposite().opposite(), face);
        }
    }

    #[test]
    fn face_index_matches_all_order() {
        for (i, face) in Face::ALL.iter().enumerate() {
            assert_eq!(face.index(), i);
        }
    }

    #[test]
    fn enclosure_has_26_distinct_offsets() {
        let set: BTreeSet<_> = ENCLOSURE_OFFSETS.iter().copied().collect();
        assert_eq!(set.len(), 26);
        assert!(!set.contains(&(0, 0, 0)));
        let faces = set
            .iter()
            .filter(|(x, y, z)| x.abs() + y.abs() + z.abs() == 1)
            .count();
        let edges = set
            .iter()
            .filter(|(x, y, z)| x.abs() + y.abs() + z.abs() == 2)
            .count();
        let corners = set
            .iter()
            .filter(|(x, y, z)| x.abs() + y.abs() + z.abs() == 3)
            .count();
        assert_eq!((faces, edges, corners), (6, 12, 8));
    }

    #[test]
    fn squared_distance_is_symmetric() {
        let a = VoxelCoord::new(0, 0, 0);
        let b = VoxelCoord::new(1, 2, -2);
        assert_eq!(a.squared_distance(b), 9);
        assert_eq!(b.squared_distance(a), 9);
    }

    #[test]
    fn step_follows_face_offset() {
        let c = VoxelCoord::new(3, 3, 3);
        assert_eq!(c.step(Face::Top), Some(VoxelCoord::new(3, 4, 3)));
        assert_eq!(c.step(Face::Back), Some(VoxelCoord::new(3, 3, 2)));
        assert_eq!(c.step(Face::Left), Some(VoxelCoord::new(2, 3, 3)));
    }

    #[test]
    fn step_stops_at_lattice_edge() {
        let max = VoxelCoord::new(i32::MAX, 0, i32::MIN);
        assert_eq!(max.step(Face::Right), None);
        assert_eq!(max.step(Face::Back), None);
        assert_eq!(max.step(Face::Left), Some(VoxelCoord::new(i32::MAX - 1, 0, i32::MIN)));
        assert_eq!(max.offset((1, 1, 1)), None);
    }

    #[test]
    fn voxel_coord_ordering() {
        // BTreeMap keys for fragments rely on a total order.
        let a = VoxelCoord::new(0, 0, 0);
        let b = VoxelCoord::new(1, 0, 0);
        assert!(a < b);
    }

    #[test]
    fn rgba_serialization_roundtrip() {
        let c = Rgba::opaque(12, 34, 56);
        let json = serde_json::to_string(&c).unwrap();
        let restored: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(c, restored);
        assert_eq!(restored.a, 255);
    }
}
