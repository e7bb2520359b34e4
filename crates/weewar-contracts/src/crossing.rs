//! Road/bridge overlays on a tile. See `spec.md` §3 "Crossing" and §4.2
//! "Crossings" for the legacy-tile-type migration this type exists to
//! replace.

use serde::{Deserialize, Serialize};

/// The kind of crossing overlaid on a tile, independent of the underlying
/// terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CrossingType {
    #[default]
    None,
    Road,
    Bridge,
}

/// A crossing overlay: its type, plus which of the tile's six neighbor
/// directions it connects to (indexed in the canonical `Direction::ALL`
/// order from `hex_grid`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crossing {
    pub crossing_type: CrossingType,
    pub connects_to: [bool; 6],
}

impl Crossing {
    #[must_use]
    pub fn none() -> Self {
        Self {
            crossing_type: CrossingType::None,
            connects_to: [false; 6],
        }
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.crossing_type != CrossingType::None
    }
}

impl Default for Crossing {
    fn default() -> Self {
        Self::none()
    }
}
