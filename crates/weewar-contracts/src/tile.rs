//! Tile and terrain-type data. See `spec.md` §3 "Tile".

use serde::{Deserialize, Serialize};

use crate::hex_grid::AxialCoord;

/// A single map tile. `player == 0` means neutral (unowned).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub coord: AxialCoord,
    pub tile_type: i32,
    #[serde(default)]
    pub player: i32,
    #[serde(default)]
    pub shortcut: String,
}

impl Tile {
    #[must_use]
    pub fn new(coord: AxialCoord, tile_type: i32) -> Self {
        Self {
            coord,
            tile_type,
            player: 0,
            shortcut: String::new(),
        }
    }

    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.player == 0
    }
}

/// Broad classification of a terrain/tile type — whether it is a natural
/// feature or something a player can own and build on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainClass {
    Nature,
    Player,
}

/// The fixed set of "nature" terrain types named in `spec.md` §3. These are
/// never owned by a player.
pub mod nature {
    pub const GRASS: i32 = 1;
    pub const WATER: i32 = 2;
    pub const MOUNTAIN: i32 = 3;
    pub const ROCK: i32 = 4;
    pub const DESERT: i32 = 5;
}

/// The fixed set of player-controllable tile types named in `spec.md` §3.
/// These are the tile types that can be captured (§4.4.3) and the subset
/// that produce income is a further restriction of this set (§4.5).
pub mod player_controllable {
    pub const LAND_BASE: i32 = 100;
    pub const NAVAL_BASE: i32 = 101;
    pub const AIRPORT: i32 = 102;
    pub const MISSILE_SILO: i32 = 103;
    pub const MINES: i32 = 104;
    pub const CITY: i32 = 105;
}
