//! Unit instances on the board. See `spec.md` §3 "Unit" and "AttackRecord".

use serde::{Deserialize, Serialize};

use crate::hex_grid::AxialCoord;

/// The maximum value of [`Unit::available_health`], expressed in "health
/// units" of 10 HP each (`spec.md` §3).
pub const MAX_HEALTH: i32 = 100;

/// One prior attack retained on a defender, used to compute the wound
/// bonus (`spec.md` §4.3.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRecord {
    pub attacker_coord: AxialCoord,
    pub is_ranged: bool,
}

/// A unit on the board. `player` is always `> 0` — units are never neutral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub coord: AxialCoord,
    pub player: i32,
    pub unit_type: i32,
    pub available_health: i32,
    pub distance_left: f64,
    #[serde(default)]
    pub progression_step: i32,
    #[serde(default)]
    pub chosen_alternative: String,
    #[serde(default)]
    pub attack_history: Vec<AttackRecord>,
    #[serde(default)]
    pub shortcut: String,
    #[serde(default)]
    pub last_acted_turn: i32,
    #[serde(default)]
    pub last_toppedup_turn: i32,
}

impl Unit {
    /// Creates a fresh full-health unit with no movement spent and no
    /// progression recorded, as produced by scenario setup or production.
    #[must_use]
    pub fn new(coord: AxialCoord, player: i32, unit_type: i32, movement_points: f64) -> Self {
        Self {
            coord,
            player,
            unit_type,
            available_health: MAX_HEALTH,
            distance_left: movement_points,
            progression_step: 0,
            chosen_alternative: String::new(),
            attack_history: Vec::new(),
            shortcut: String::new(),
            last_acted_turn: 0,
            last_toppedup_turn: 0,
        }
    }

    /// Health units, i.e. `available_health / 10` (`spec.md` §4.3.5). Used
    /// as the number of independent combat rolls an attack makes.
    #[must_use]
    pub fn health_units(&self) -> i32 {
        self.available_health / 10
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.available_health <= 0
    }

    /// Whether the attack from `attacker` against this unit is ranged
    /// (axial distance >= 2), per `spec.md` §4.3.6.
    #[must_use]
    pub fn is_ranged_attack_from(attacker: AxialCoord, defender: AxialCoord) -> bool {
        crate::hex_grid::distance(attacker, defender) >= 2
    }
}
