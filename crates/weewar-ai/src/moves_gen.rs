//! Enumerates the legal moves available to a player right now. Shared by
//! every strategy tier in `spec.md` §4.7 "AIAdvisor (C7, optional)".

use weewar_contracts::hex_grid::AxialCoord;
use weewar_contracts::moves::{GameMove, Position};
use weewar_contracts::unit::MAX_HEALTH;
use weewar_rules_engine::{combat, movement};
use weewar_simulation::Game;

/// All currently-legal moves for `player`, excluding `EndTurn` (every
/// tier appends that itself as the fallback when nothing better is
/// found).
#[must_use]
pub fn legal_moves(game: &Game, player: i32) -> Vec<GameMove> {
    let mut moves = Vec::new();
    for unit in game.get_units_for_player(player) {
        if unit.distance_left > 0.0 {
            let options = movement::movement_options(game.rules(), game.world(), &unit, unit.distance_left);
            for (coord, _cost) in options {
                moves.push(GameMove::MoveUnit {
                    from: Position::absolute(unit.coord),
                    to: Position::absolute(coord),
                });
            }
        }

        for target in combat::attack_options(game.rules(), game.world(), &unit) {
            moves.push(GameMove::AttackUnit {
                attacker: Position::absolute(unit.coord),
                defender: Position::absolute(target),
            });
        }

        if let Some(tile) = game.world().tile_at(unit.coord) {
            if tile.player != unit.player && is_player_controllable(tile.tile_type) {
                moves.push(GameMove::CaptureBuilding {
                    pos: Position::absolute(unit.coord),
                });
            }
        }

        if unit.available_health < MAX_HEALTH {
            moves.push(GameMove::HealUnit {
                pos: Position::absolute(unit.coord),
            });
        }
    }
    moves
}

fn is_player_controllable(tile_type: i32) -> bool {
    use weewar_contracts::tile::player_controllable as pc;
    matches!(tile_type, pc::LAND_BASE | pc::NAVAL_BASE | pc::AIRPORT | pc::MISSILE_SILO | pc::MINES | pc::CITY)
}

/// Estimated material value of the unit occupying `coord`, used by the
/// avoidance filter and move ordering. Falls back to `0` for an empty
/// tile or a unit type missing from the rules document.
#[must_use]
pub fn unit_value_at(game: &Game, coord: AxialCoord) -> f64 {
    game.get_unit_at(coord)
        .and_then(|unit| game.rules().unit_def(unit.unit_type).map(|def| f64::from(def.cost)))
        .unwrap_or(0.0)
}
