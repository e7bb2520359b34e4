//! Validates and applies a single non-`EndTurn` [`GameMove`]. `spec.md`
//! §4.4 "MoveProcessor (C4)".
//!
//! Every entry point here runs full validation (turn, existence,
//! action-order, rules) before touching `World`, so a rejected move never
//! leaves partial state behind — there is no push/pop dance per move. The
//! transactional `World` layer is reserved for its other stated purpose:
//! AI search and undo (`spec.md` §5 "Shared resource policy").

use rand::Rng;

use weewar_contracts::error::WeewarError;
use weewar_contracts::hex_grid::{self, AxialCoord};
use weewar_contracts::moves::{GameMove, Position, WorldChange};
use weewar_contracts::unit::Unit;
use weewar_rules_engine::{combat, movement, RulesEngine};
use weewar_world::World;

use crate::action_order;
use crate::config::EngineSettings;

fn literal_coord(pos: &Position) -> AxialCoord {
    AxialCoord::new(pos.q, pos.r)
}

fn require_unit(world: &World, coord: AxialCoord) -> Result<Unit, WeewarError> {
    world
        .unit_at(coord)
        .cloned()
        .ok_or(WeewarError::UnitNotFound { coord })
}

fn check_turn(unit: &Unit, current_player: i32) -> Result<(), WeewarError> {
    if unit.player == current_player {
        Ok(())
    } else {
        Err(WeewarError::WrongTurn {
            expected: current_player,
            got: unit.player,
        })
    }
}

/// Dispatches one move variant. Returns the emitted changes in causal
/// order, or an error if any validation step fails (in which case `world`
/// is left untouched — callers must not call this speculatively on a
/// `World` they still need unmodified on error; each branch below only
/// mutates after every check has already passed).
///
/// # Errors
/// See the per-variant helpers in this module.
pub fn apply<R: Rng + ?Sized>(
    world: &mut World,
    engine: &RulesEngine,
    rng: &mut R,
    settings: &EngineSettings,
    current_player: i32,
    game_move: &GameMove,
) -> Result<Vec<WorldChange>, WeewarError> {
    match game_move {
        GameMove::MoveUnit { from, to } => apply_move_unit(world, engine, settings, current_player, from, to),
        GameMove::AttackUnit { attacker, defender } => {
            apply_attack_unit(world, engine, rng, settings, current_player, attacker, defender)
        }
        GameMove::CaptureBuilding { pos } => apply_capture(world, engine, settings, current_player, pos),
        GameMove::HealUnit { pos } => apply_heal(world, engine, rng, settings, current_player, pos),
        GameMove::CreateUnit { pos, unit_type, player } => {
            apply_create_unit(world, engine, pos, *unit_type, *player)
        }
        GameMove::EndTurn => Err(WeewarError::InvariantViolated {
            detail: "EndTurn must be dispatched by Game, not MoveProcessor::apply".to_string(),
        }),
    }
}

fn apply_move_unit(
    world: &mut World,
    engine: &RulesEngine,
    settings: &EngineSettings,
    current_player: i32,
    from: &Position,
    to: &Position,
) -> Result<Vec<WorldChange>, WeewarError> {
    let from_coord = literal_coord(from);
    let mut unit = require_unit(world, from_coord)?;
    check_turn(&unit, current_player)?;

    let unit_def = engine.require_unit_def(unit.unit_type)?;
    action_order::check_action_allowed(engine, world, &unit, &unit_def.action_order, "move", settings.strict_action_order)?;

    let to_coord = to.resolve(from_coord);
    if world.unit_at(to_coord).is_some() {
        return Err(WeewarError::PositionOccupied { coord: to_coord });
    }
    let cost = movement::get_movement_cost(engine, world, &unit, to_coord)?;

    world.remove_unit(from_coord);
    unit.coord = to_coord;
    unit.distance_left -= cost;
    let unit_def = engine.require_unit_def(unit.unit_type)?;
    action_order::advance_progression(&mut unit, &unit_def.action_order, "move");
    world.add_unit(unit.clone());

    Ok(vec![WorldChange::UnitMoved {
        prev: from_coord,
        updated: unit,
    }])
}

fn apply_attack_unit<R: Rng + ?Sized>(
    world: &mut World,
    engine: &RulesEngine,
    rng: &mut R,
    settings: &EngineSettings,
    current_player: i32,
    attacker_pos: &Position,
    defender_pos: &Position,
) -> Result<Vec<WorldChange>, WeewarError> {
    let attacker_coord = literal_coord(attacker_pos);
    let mut attacker = require_unit(world, attacker_coord)?;
    check_turn(&attacker, current_player)?;

    let defender_coord = defender_pos.resolve(attacker_coord);
    let defender = require_unit(world, defender_coord)?;
    if defender.player == attacker.player {
        return Err(WeewarError::SameTeam { player: defender.player });
    }

    let attacker_def = engine.require_unit_def(attacker.unit_type)?;
    action_order::check_action_allowed(
        engine,
        world,
        &attacker,
        &attacker_def.action_order,
        "attack",
        settings.strict_action_order,
    )?;

    let distance = hex_grid::distance(attacker_coord, defender_coord);
    let (min_range, max_range) = attacker_def.attack_range;
    if distance < min_range || distance > max_range {
        return Err(WeewarError::OutOfRange {
            distance,
            min: min_range,
            max: max_range,
        });
    }

    let attacker_tile_type = world
        .tile_at(attacker_coord)
        .ok_or(WeewarError::TileNotFound { coord: attacker_coord })?
        .tile_type;
    let defender_tile_type = world
        .tile_at(defender_coord)
        .ok_or(WeewarError::TileNotFound { coord: defender_coord })?
        .tile_type;

    let bonus = combat::wound_bonus(&defender, attacker_coord);
    let ctx = combat::CombatContext {
        attacker: &attacker,
        defender: &defender,
        attacker_tile_type,
        defender_tile_type,
    };
    let damage = combat::simulate(engine, ctx, bonus, rng)?;

    let mut changes = Vec::new();
    let hp_before = defender.available_health;
    let hp_after = (hp_before - damage * 10).max(0);
    let killed = hp_after <= 0;

    if killed {
        world.remove_unit(defender_coord);
        changes.push(WorldChange::UnitDestroyed {
            coord: defender_coord,
            player: defender.player,
            unit_type: defender.unit_type,
        });
    } else {
        let mut updated_defender = defender.clone();
        updated_defender.available_health = hp_after;
        updated_defender.attack_history.push(weewar_contracts::unit::AttackRecord {
            attacker_coord,
            is_ranged: Unit::is_ranged_attack_from(attacker_coord, defender_coord),
        });
        world.add_unit(updated_defender);
    }
    changes.push(WorldChange::UnitDamaged {
        target: defender_coord,
        hp_before,
        hp_after,
        killed,
    });

    if attacker_def.splash_damage > 0 {
        let splash = combat::splash_targets(engine, world, &attacker, attacker_def.splash_damage, rng)?;
        for (coord, splash_damage_units) in splash {
            if coord == defender_coord {
                continue;
            }
            let Some(victim) = world.unit_at(coord).cloned() else {
                continue;
            };
            let splash_hp_before = victim.available_health;
            let splash_hp_after = (splash_hp_before - splash_damage_units * 10).max(0);
            let splash_killed = splash_hp_after <= 0;
            if splash_killed {
                world.remove_unit(coord);
                changes.push(WorldChange::UnitDestroyed {
                    coord,
                    player: victim.player,
                    unit_type: victim.unit_type,
                });
            } else {
                let mut updated = victim;
                updated.available_health = splash_hp_after;
                world.add_unit(updated);
            }
            changes.push(WorldChange::UnitDamaged {
                target: coord,
                hp_before: splash_hp_before,
                hp_after: splash_hp_after,
                killed: splash_killed,
            });
        }
    }

    let attacker_def = engine.require_unit_def(attacker.unit_type)?;
    action_order::advance_progression(&mut attacker, &attacker_def.action_order, "attack");
    world.add_unit(attacker);

    Ok(changes)
}

fn apply_capture(
    world: &mut World,
    engine: &RulesEngine,
    settings: &EngineSettings,
    current_player: i32,
    pos: &Position,
) -> Result<Vec<WorldChange>, WeewarError> {
    let coord = literal_coord(pos);
    let mut unit = require_unit(world, coord)?;
    check_turn(&unit, current_player)?;

    let unit_def = engine.require_unit_def(unit.unit_type)?;
    action_order::check_action_allowed(engine, world, &unit, &unit_def.action_order, "capture", settings.strict_action_order)?;

    let tile = world.tile_at(coord).ok_or(WeewarError::TileNotFound { coord })?;
    if !is_player_controllable(tile.tile_type) {
        return Err(WeewarError::ActionNotAllowed {
            action: "capture".to_string(),
            step: unit.progression_step,
        });
    }
    let prev_player = tile.player;
    if prev_player == unit.player {
        return Err(WeewarError::ActionNotAllowed {
            action: "capture".to_string(),
            step: unit.progression_step,
        });
    }

    world.set_tile_owner(coord, unit.player);

    let unit_def = engine.require_unit_def(unit.unit_type)?;
    action_order::advance_progression(&mut unit, &unit_def.action_order, "capture");
    let new_player = unit.player;
    world.add_unit(unit);

    Ok(vec![WorldChange::TileOwnerChanged {
        coord,
        prev_player,
        new_player,
    }])
}

fn is_player_controllable(tile_type: i32) -> bool {
    use weewar_contracts::tile::player_controllable as pc;
    matches!(tile_type, pc::LAND_BASE | pc::NAVAL_BASE | pc::AIRPORT | pc::MISSILE_SILO | pc::MINES | pc::CITY)
}

fn apply_heal<R: Rng + ?Sized>(
    world: &mut World,
    engine: &RulesEngine,
    rng: &mut R,
    settings: &EngineSettings,
    current_player: i32,
    pos: &Position,
) -> Result<Vec<WorldChange>, WeewarError> {
    let coord = literal_coord(pos);
    let mut unit = require_unit(world, coord)?;
    check_turn(&unit, current_player)?;

    let unit_def = engine.require_unit_def(unit.unit_type)?;
    action_order::check_action_allowed(engine, world, &unit, &unit_def.action_order, "heal", settings.strict_action_order)?;

    let hp_before = unit.available_health;
    if hp_before >= weewar_contracts::unit::MAX_HEALTH {
        return Err(WeewarError::AlreadyAtMaxHealth { coord });
    }

    let healed_units = combat::repair_amount(unit.health_units(), unit_def.fix_value, rng);
    let hp_after = combat::clamp_heal(hp_before, healed_units);
    unit.available_health = hp_after;

    let unit_def = engine.require_unit_def(unit.unit_type)?;
    action_order::advance_progression(&mut unit, &unit_def.action_order, "heal");
    world.add_unit(unit);

    Ok(vec![WorldChange::UnitDamaged {
        target: coord,
        hp_before,
        hp_after,
        killed: false,
    }])
}

fn apply_create_unit(
    world: &mut World,
    engine: &RulesEngine,
    pos: &Position,
    unit_type: i32,
    player: i32,
) -> Result<Vec<WorldChange>, WeewarError> {
    let coord = literal_coord(pos);
    let unit_def = engine.require_unit_def(unit_type)?;
    if world.unit_at(coord).is_some() {
        return Err(WeewarError::PositionOccupied { coord });
    }
    world
        .tile_at(coord)
        .ok_or(WeewarError::TileNotFound { coord })?;

    let unit = Unit::new(coord, player, unit_type, unit_def.movement_points);
    world.add_unit(unit.clone());
    Ok(vec![WorldChange::UnitCreated { unit }])
}
