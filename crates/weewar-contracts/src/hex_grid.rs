//! Axial/cube hex coordinates, neighbor enumeration, distance, and the
//! pixel conversions used by renderers. See `spec.md` §3 and §4.1.
//!
//! All engine logic works in axial coordinates. Row/column (offset)
//! coordinates and pixel coordinates are provided purely as a UI
//! convenience for callers outside this crate.

use serde::{Deserialize, Serialize};

/// An axial hex coordinate. The implicit cube coordinate is `s = -q - r`,
/// so `q + r + s == 0` always holds (invariant I7 in `spec.md`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxialCoord {
    pub q: i32,
    pub r: i32,
}

impl AxialCoord {
    #[must_use]
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The implicit third cube coordinate.
    #[must_use]
    pub fn s(self) -> i32 {
        -self.q - self.r
    }
}

/// The six hex neighbor directions, in the fixed order mandated by
/// `spec.md` §3: left, top-left, top-right, right, bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum Direction {
    L,
    TL,
    TR,
    R,
    BR,
    BL,
}

impl Direction {
    /// All six directions, in the canonical `spec.md` order.
    pub const ALL: [Direction; 6] = [
        Direction::L,
        Direction::TL,
        Direction::TR,
        Direction::R,
        Direction::BR,
        Direction::BL,
    ];

    /// The cube-coordinate delta `(dq, dr)` for this direction. Each step
    /// around `ALL` is a consistent 60-degree rotation.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::L => (-1, 0),
            Direction::TL => (0, -1),
            Direction::TR => (1, -1),
            Direction::R => (1, 0),
            Direction::BR => (0, 1),
            Direction::BL => (-1, 1),
        }
    }

    /// Parse a compass label as used on the wire (`spec.md` §6
    /// `Position.label`). Returns `None` for unrecognized labels.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "L" => Some(Direction::L),
            "TL" => Some(Direction::TL),
            "TR" => Some(Direction::TR),
            "R" => Some(Direction::R),
            "BR" => Some(Direction::BR),
            "BL" => Some(Direction::BL),
            _ => None,
        }
    }
}

/// Neighbor of `coord` in `dir`.
#[must_use]
pub fn neighbor(coord: AxialCoord, dir: Direction) -> AxialCoord {
    let (dq, dr) = dir.delta();
    AxialCoord::new(coord.q + dq, coord.r + dr)
}

/// All six neighbors of `coord`, in the canonical direction order.
#[must_use]
pub fn neighbors(coord: AxialCoord) -> [AxialCoord; 6] {
    Direction::ALL.map(|dir| neighbor(coord, dir))
}

/// Hex distance between two axial coordinates (property P2: symmetric,
/// zero for `distance(a, a)`).
#[must_use]
pub fn distance(a: AxialCoord, b: AxialCoord) -> u32 {
    let dq = (a.q - b.q).unsigned_abs();
    let dr = (a.r - b.r).unsigned_abs();
    let ds = (a.s() - b.s()).unsigned_abs();
    (dq + dr + ds) / 2
}

/// All coordinates within `radius` hexes of `center` (inclusive), including
/// `center` itself.
#[must_use]
pub fn range(center: AxialCoord, radius: u32) -> Vec<AxialCoord> {
    let r = i32::try_from(radius).unwrap_or(i32::MAX);
    let mut out = Vec::new();
    for dq in -r..=r {
        let lo = (-r).max(-dq - r);
        let hi = r.min(-dq + r);
        for dr in lo..=hi {
            out.push(AxialCoord::new(center.q + dq, center.r + dr));
        }
    }
    out
}

/// All coordinates exactly `radius` hexes from `center`. `ring(center, 0)`
/// is just `center`.
#[must_use]
pub fn ring(center: AxialCoord, radius: u32) -> Vec<AxialCoord> {
    if radius == 0 {
        return vec![center];
    }
    range(center, radius)
        .into_iter()
        .filter(|c| distance(*c, center) == radius)
        .collect()
}

/// Pointy-topped odd-r offset row/column, treated as a UI convenience only.
/// Odd rows are shoved half a column to the right. Round-trips exactly
/// with [`offset_to_axial`] for every integer `(row, col)`.
#[must_use]
pub fn axial_to_offset(coord: AxialCoord) -> (i32, i32) {
    let row = coord.r;
    let col = coord.q + (coord.r - (coord.r & 1)) / 2;
    (row, col)
}

/// Inverse of [`axial_to_offset`].
#[must_use]
pub fn offset_to_axial(row: i32, col: i32) -> AxialCoord {
    let q = col - (row - (row & 1)) / 2;
    AxialCoord::new(q, row)
}

/// Converts an axial coordinate to pixel space for a pointy-topped hex
/// grid with odd-r row offsetting, given a tile's pixel width, height, and
/// the vertical distance between adjacent rows.
///
/// `tile_w` and `y_increment` fully determine the coordinate math (a
/// consequence of `q + r/2` being exactly `col + 0.5` on odd rows — the
/// odd-row shove falls out of the continuous formula for free). `tile_h` is
/// accepted and validated for signature symmetry with [`pixel_to_axial`]
/// and with renderer call sites that need the full sprite bounding box; it
/// does not otherwise participate in the transform.
#[must_use]
pub fn axial_to_pixel(coord: AxialCoord, tile_w: f64, tile_h: f64, y_increment: f64) -> (f64, f64) {
    debug_assert!(tile_w > 0.0 && tile_h > 0.0 && y_increment > 0.0);
    let x = tile_w * (f64::from(coord.q) + f64::from(coord.r) / 2.0);
    let y = y_increment * f64::from(coord.r);
    (x, y)
}

/// Inverse of [`axial_to_pixel`]. Computes the fractional axial coordinate
/// implied by `(x, y)` and snaps it to the nearest integer hex using cube
/// rounding: round `q`, `r`, and `s` independently, then recompute whichever
/// of the three has the largest rounding error from the other two, so the
/// `q + r + s == 0` constraint is restored exactly.
#[must_use]
pub fn pixel_to_axial(x: f64, y: f64, tile_w: f64, tile_h: f64, y_increment: f64) -> AxialCoord {
    debug_assert!(tile_w > 0.0 && tile_h > 0.0 && y_increment > 0.0);
    let r_frac = y / y_increment;
    let q_frac = x / tile_w - r_frac / 2.0;
    let s_frac = -q_frac - r_frac;

    let mut q = q_frac.round();
    let mut r = r_frac.round();
    let s = s_frac.round();

    let q_diff = (q - q_frac).abs();
    let r_diff = (r - r_frac).abs();
    let s_diff = (s - s_frac).abs();

    if q_diff > r_diff && q_diff > s_diff {
        q = -r - s;
    } else if r_diff > s_diff {
        r = -q - s;
    }
    // else: s has the largest error, and s is implicit — nothing to fix up.

    AxialCoord::new(q as i32, r as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_constraint_holds_for_origin_and_neighbors() {
        let origin = AxialCoord::new(0, 0);
        assert_eq!(origin.q + origin.r + origin.s(), 0);
        for n in neighbors(origin) {
            assert_eq!(n.q + n.r + n.s(), 0);
        }
    }

    #[test]
    fn distance_is_symmetric_and_zero_for_self() {
        let a = AxialCoord::new(3, -2);
        let b = AxialCoord::new(-1, 4);
        assert_eq!(distance(a, b), distance(b, a));
        assert_eq!(distance(a, a), 0);
    }

    #[test]
    fn neighbors_are_six_distinct_unit_distance_coords() {
        let center = AxialCoord::new(5, -5);
        let ns = neighbors(center);
        assert_eq!(ns.len(), 6);
        for n in ns {
            assert_eq!(distance(center, n), 1);
        }
        let mut seen = std::collections::HashSet::new();
        for n in ns {
            assert!(seen.insert((n.q, n.r)), "duplicate neighbor {n:?}");
        }
    }

    #[test]
    fn direction_order_matches_spec() {
        assert_eq!(
            Direction::ALL,
            [
                Direction::L,
                Direction::TL,
                Direction::TR,
                Direction::R,
                Direction::BR,
                Direction::BL
            ]
        );
    }

    #[test]
    fn direction_rotation_is_consistent() {
        // Each direction, rotated 60 degrees CCW via (q,r,s) -> (-r,-s,-q),
        // yields the next direction in ALL (cyclically).
        let dirs = Direction::ALL;
        for i in 0..6 {
            let (q, r) = dirs[i].delta();
            let s = -q - r;
            let rotated = (-r, -s);
            assert_eq!(rotated, dirs[(i + 1) % 6].delta(), "mismatch at {i}");
        }
    }

    #[test]
    fn offset_round_trips_on_integers() {
        for r in -10..=10 {
            for q in -10..=10 {
                let coord = AxialCoord::new(q, r);
                let (row, col) = axial_to_offset(coord);
                let back = offset_to_axial(row, col);
                assert_eq!(coord, back);
            }
        }
    }

    #[test]
    fn range_radius_zero_is_just_center() {
        let center = AxialCoord::new(1, 1);
        assert_eq!(range(center, 0), vec![center]);
    }

    #[test]
    fn range_radius_n_has_expected_count() {
        // A hex grid of radius n has 1 + 3*n*(n+1) tiles.
        for n in 0..5u32 {
            let count = range(AxialCoord::new(0, 0), n).len();
            assert_eq!(count as u32, 1 + 3 * n * (n + 1));
        }
    }

    #[test]
    fn ring_radius_n_has_six_times_n_tiles_except_zero() {
        assert_eq!(ring(AxialCoord::new(0, 0), 0).len(), 1);
        for n in 1..6u32 {
            let count = ring(AxialCoord::new(0, 0), n).len();
            assert_eq!(count as u32, 6 * n);
            for c in ring(AxialCoord::new(0, 0), n) {
                assert_eq!(distance(c, AxialCoord::new(0, 0)), n);
            }
        }
    }

    #[test]
    fn pixel_round_trip_is_exact_on_hex_centers() {
        for r in -5..=5 {
            for q in -5..=5 {
                let coord = AxialCoord::new(q, r);
                let (x, y) = axial_to_pixel(coord, 64.0, 64.0, 48.0);
                let back = pixel_to_axial(x, y, 64.0, 64.0, 48.0);
                assert_eq!(coord, back, "round trip failed for {coord:?}");
            }
        }
    }

    #[test]
    fn pixel_to_axial_snaps_nearby_points_to_same_hex() {
        let coord = AxialCoord::new(2, -1);
        let (x, y) = axial_to_pixel(coord, 64.0, 64.0, 48.0);
        for (dx, dy) in [(1.0, 0.0), (-1.0, 1.0), (0.0, -2.0)] {
            assert_eq!(pixel_to_axial(x + dx, y + dy, 64.0, 64.0, 48.0), coord);
        }
    }

    #[test]
    fn direction_label_parses_all_six_and_rejects_unknown() {
        for dir in Direction::ALL {
            let label = match dir {
                Direction::L => "L",
                Direction::TL => "TL",
                Direction::TR => "TR",
                Direction::R => "R",
                Direction::BR => "BR",
                Direction::BL => "BL",
            };
            assert_eq!(Direction::from_label(label), Some(dir));
        }
        assert_eq!(Direction::from_label("NE"), None);
    }
}
