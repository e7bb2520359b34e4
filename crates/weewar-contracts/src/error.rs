//! Shared error taxonomy. See `spec.md` §7 "Error Handling Design".
//!
//! One enum covers every fallible boundary in the workspace. Individual
//! crates only ever construct the variants relevant to them; callers match
//! on kind, not on which crate raised it.

use std::fmt;

use crate::hex_grid::AxialCoord;

/// A single engine-level error. Validation variants are expected and
/// routine (a rejected move); data-integrity variants indicate a malformed
/// rules document; `InvariantViolated` should never fire in a correct
/// implementation and is the one kind debug builds additionally assert on
/// before returning.
#[derive(Debug, Clone, PartialEq)]
pub enum WeewarError {
    // --- Validation ---
    WrongTurn { expected: i32, got: i32 },
    UnitNotFound { coord: AxialCoord },
    TileNotFound { coord: AxialCoord },
    PositionOccupied { coord: AxialCoord },
    SameTeam { player: i32 },
    NotAdjacent { a: AxialCoord, b: AxialCoord },
    OutOfRange { distance: u32, min: u32, max: u32 },
    CannotAttackTarget { attacker_type: i32, defender_type: i32 },
    ImpassableTerrain { coord: AxialCoord },
    InsufficientMovement { needed: f64, available: f64 },
    ActionNotAllowed { action: String, step: i32 },
    AlreadyAtMaxHealth { coord: AxialCoord },
    InvalidCoord { coord: AxialCoord },
    NotReachable { coord: AxialCoord },

    // --- Data integrity ---
    UnknownUnitType { unit_type: i32 },
    UnknownTerrainType { tile_type: i32 },
    MissingRulesEntry { detail: String },

    // --- Internal ---
    InvariantViolated { detail: String },
}

impl fmt::Display for WeewarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongTurn { expected, got } => {
                write!(f, "wrong turn: expected player {expected}, got {got}")
            }
            Self::UnitNotFound { coord } => write!(f, "no unit at ({}, {})", coord.q, coord.r),
            Self::TileNotFound { coord } => write!(f, "no tile at ({}, {})", coord.q, coord.r),
            Self::PositionOccupied { coord } => {
                write!(f, "position ({}, {}) is occupied", coord.q, coord.r)
            }
            Self::SameTeam { player } => write!(f, "target belongs to player {player}, not an enemy"),
            Self::NotAdjacent { a, b } => write!(
                f,
                "({}, {}) and ({}, {}) are not adjacent",
                a.q, a.r, b.q, b.r
            ),
            Self::OutOfRange { distance, min, max } => write!(
                f,
                "distance {distance} is out of attack range [{min}, {max}]"
            ),
            Self::CannotAttackTarget {
                attacker_type,
                defender_type,
            } => write!(
                f,
                "unit type {attacker_type} cannot attack unit type {defender_type}"
            ),
            Self::ImpassableTerrain { coord } => {
                write!(f, "terrain at ({}, {}) is impassable", coord.q, coord.r)
            }
            Self::InsufficientMovement { needed, available } => write!(
                f,
                "insufficient movement: needed {needed}, have {available}"
            ),
            Self::ActionNotAllowed { action, step } => {
                write!(f, "action {action:?} not allowed at progression step {step}")
            }
            Self::AlreadyAtMaxHealth { coord } => {
                write!(f, "unit at ({}, {}) is already at max health", coord.q, coord.r)
            }
            Self::InvalidCoord { coord } => write!(f, "invalid coordinate ({}, {})", coord.q, coord.r),
            Self::NotReachable { coord } => {
                write!(f, "({}, {}) is not reachable within budget", coord.q, coord.r)
            }
            Self::UnknownUnitType { unit_type } => write!(f, "unknown unit type {unit_type}"),
            Self::UnknownTerrainType { tile_type } => write!(f, "unknown terrain type {tile_type}"),
            Self::MissingRulesEntry { detail } => write!(f, "missing rules entry: {detail}"),
            Self::InvariantViolated { detail } => write!(f, "invariant violated: {detail}"),
        }
    }
}

impl std::error::Error for WeewarError {}

/// Constructs an [`WeewarError::InvariantViolated`], asserting in debug
/// builds first (`spec.md` §7: "panic/assert in debug, return fatal in
/// release").
#[macro_export]
macro_rules! invariant_violated {
    ($($arg:tt)*) => {{
        let detail = format!($($arg)*);
        debug_assert!(false, "invariant violated: {detail}");
        $crate::error::WeewarError::InvariantViolated { detail }
    }};
}
