//! Wire types for submitting moves and observing their effects.
//! See `spec.md` §6 "GameMove (wire)" and "WorldChange (wire)".

use serde::{Deserialize, Serialize};

use crate::hex_grid::{self, AxialCoord, Direction};
use crate::unit::Unit;

/// A coordinate on the wire. `label`, when present, is a compass direction
/// (`"L"`, `"R"`, `"TL"`, `"TR"`, `"BL"`, `"BR"`) resolved relative to the
/// acting unit rather than an absolute `(q, r)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub q: i32,
    pub r: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Position {
    #[must_use]
    pub fn absolute(coord: AxialCoord) -> Self {
        Self {
            q: coord.q,
            r: coord.r,
            label: None,
        }
    }

    #[must_use]
    pub fn labeled(label: &str) -> Self {
        Self {
            q: 0,
            r: 0,
            label: Some(label.to_string()),
        }
    }

    /// Resolves this position to an absolute [`AxialCoord`]. When `label` is
    /// set and parses as a compass direction, the result is `base`'s
    /// neighbor in that direction; an absolute `(q, r)` and an unrecognized
    /// label both fall back to the literal `(q, r)` field.
    #[must_use]
    pub fn resolve(&self, base: AxialCoord) -> AxialCoord {
        match self.label.as_deref().and_then(Direction::from_label) {
            Some(dir) => hex_grid::neighbor(base, dir),
            None => AxialCoord::new(self.q, self.r),
        }
    }
}

/// A move submitted by the current player. See `spec.md` §4.4 for the
/// per-variant validation/application pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameMove {
    MoveUnit {
        from: Position,
        to: Position,
    },
    AttackUnit {
        attacker: Position,
        defender: Position,
    },
    CaptureBuilding {
        pos: Position,
    },
    HealUnit {
        pos: Position,
    },
    EndTurn,
    /// Scenario-setup move: not subject to turn/action-order checks.
    CreateUnit {
        pos: Position,
        unit_type: i32,
        player: i32,
    },
}

/// A submitted move paired with what it produced. `spec.md` §6: "After
/// processing, the move carries a `changes: Vec<WorldChange>` field."
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedMove {
    pub game_move: GameMove,
    pub changes: Vec<WorldChange>,
}

/// One effect of a processed move, in causal order (`spec.md` §5
/// "Ordering guarantees").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WorldChange {
    UnitMoved {
        prev: AxialCoord,
        updated: Unit,
    },
    UnitDamaged {
        target: AxialCoord,
        hp_before: i32,
        hp_after: i32,
        killed: bool,
    },
    UnitCreated {
        unit: Unit,
    },
    UnitDestroyed {
        coord: AxialCoord,
        player: i32,
        unit_type: i32,
    },
    TileOwnerChanged {
        coord: AxialCoord,
        prev_player: i32,
        new_player: i32,
    },
    ProgressionAdvanced {
        unit_coord: AxialCoord,
        new_step: i32,
        chosen_alternative: String,
    },
    CoinsChanged {
        player: i32,
        delta: i32,
        new_total: i32,
    },
    TurnEnded {
        new_current_player: i32,
        new_turn_counter: i32,
    },
}

/// Per-player economic/activity state (`spec.md` §3 "PlayerState").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub coins: i32,
    pub is_active: bool,
}

impl PlayerState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            coins: 0,
            is_active: true,
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processed_move_carries_its_changes() {
        let processed = ProcessedMove {
            game_move: GameMove::EndTurn,
            changes: vec![WorldChange::TurnEnded {
                new_current_player: 2,
                new_turn_counter: 1,
            }],
        };
        assert_eq!(processed.changes.len(), 1);
    }

    #[test]
    fn absolute_position_resolves_to_itself() {
        let pos = Position::absolute(AxialCoord::new(3, -2));
        assert_eq!(pos.resolve(AxialCoord::new(0, 0)), AxialCoord::new(3, -2));
    }

    #[test]
    fn labeled_position_resolves_relative_to_base() {
        let base = AxialCoord::new(5, 5);
        let pos = Position::labeled("R");
        assert_eq!(pos.resolve(base), hex_grid::neighbor(base, Direction::R));
    }

    #[test]
    fn unknown_label_falls_back_to_literal_coords() {
        let pos = Position {
            q: 7,
            r: 8,
            label: Some("NE".to_string()),
        };
        assert_eq!(pos.resolve(AxialCoord::new(0, 0)), AxialCoord::new(7, 8));
    }
}
