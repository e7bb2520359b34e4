//! Wire formats for persisted state. See `spec.md` §6 "World save format"
//! and "Game save format". Loading/migration logic lives in
//! `weewar-persistence`; these are the shapes it reads and writes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::crossing::Crossing;
use crate::moves::PlayerState;
use crate::tile::Tile;
use crate::unit::Unit;

/// Lifecycle state of a Game aggregate. `spec.md` §3 "Game".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Paused,
    Ended,
}

/// `{name, tiles, units, crossings}`. `spec.md` §6 "World save format".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSave {
    pub name: String,
    pub tiles: Vec<Tile>,
    pub units: Vec<Unit>,
    #[serde(default)]
    pub crossings: Vec<(crate::hex_grid::AxialCoord, Crossing)>,
}

/// `{id, seed, turn_counter, current_player, status, world_id,
/// player_states}`. `spec.md` §6 "Game save format". Carries no RNG
/// internal state; a loader reseeds from `seed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSave {
    pub id: String,
    pub seed: u64,
    pub turn_counter: i32,
    pub current_player: i32,
    pub status: GameStatus,
    pub world_id: String,
    pub player_states: HashMap<i32, PlayerState>,
}
