//! End-of-turn processing: unit top-up, income accrual, player rotation,
//! and victory check. `spec.md` §4.5 "TurnEngine (C5)".

use std::collections::HashMap;

use weewar_contracts::hex_grid::AxialCoord;
use weewar_contracts::moves::{PlayerState, WorldChange};
use weewar_rules_engine::RulesEngine;
use weewar_world::World;

use crate::config::IncomeConfig;

/// Mutable view of the turn-relevant slice of `Game`, passed by reference
/// so `weewar-simulation::game` doesn't have to duplicate this logic.
pub struct TurnContext<'a> {
    pub world: &'a mut World,
    pub engine: &'a RulesEngine,
    pub income_config: &'a IncomeConfig,
    pub player_states: &'a mut HashMap<i32, PlayerState>,
    pub current_player: &'a mut i32,
    pub turn_counter: &'a mut i32,
}

/// Runs one atomic end-of-turn transition for the outgoing player.
/// `spec.md` §4.5 steps 1-4.
pub fn end_turn(ctx: TurnContext<'_>) -> Vec<WorldChange> {
    let outgoing_player = *ctx.current_player;
    let mut changes = Vec::new();

    top_up_units(ctx.world, ctx.engine, outgoing_player, *ctx.turn_counter, &mut changes);
    accrue_income(ctx.world, ctx.income_config, outgoing_player, ctx.player_states, &mut changes);

    let next_player = rotate_player(ctx.player_states, outgoing_player);
    let wrapped = next_player <= outgoing_player;
    if wrapped {
        *ctx.turn_counter += 1;
    }
    *ctx.current_player = next_player;
    tracing::info!(outgoing_player, next_player, turn_counter = *ctx.turn_counter, "turn rotated");

    changes.push(WorldChange::TurnEnded {
        new_current_player: next_player,
        new_turn_counter: *ctx.turn_counter,
    });
    changes
}

fn top_up_units(world: &mut World, engine: &RulesEngine, player: i32, turn_counter: i32, changes: &mut Vec<WorldChange>) {
    let coords: Vec<AxialCoord> = world.player_units(player).map(|u| u.coord).collect();
    for coord in coords {
        let Some(mut unit) = world.unit_at(coord).cloned() else {
            continue;
        };
        if unit.last_toppedup_turn >= turn_counter {
            continue;
        }
        let Some(unit_def) = engine.unit_def(unit.unit_type) else {
            continue;
        };
        unit.distance_left = unit_def.movement_points;
        unit.progression_step = 0;
        unit.chosen_alternative.clear();
        unit.last_toppedup_turn = turn_counter;
        world.add_unit(unit.clone());
        changes.push(WorldChange::ProgressionAdvanced {
            unit_coord: coord,
            new_step: 0,
            chosen_alternative: String::new(),
        });
    }
}

fn accrue_income(
    world: &World,
    income_config: &IncomeConfig,
    player: i32,
    player_states: &mut HashMap<i32, PlayerState>,
    changes: &mut Vec<WorldChange>,
) {
    let tile_income: i32 = world
        .tiles_by_coord()
        .into_iter()
        .filter(|tile| tile.player == player)
        .map(|tile| income_config.income_for_tile_type(tile.tile_type))
        .sum();
    let total = tile_income + income_config.flat_game_income();
    if total == 0 {
        return;
    }
    let state = player_states.entry(player).or_insert_with(PlayerState::new);
    state.coins += total;
    changes.push(WorldChange::CoinsChanged {
        player,
        delta: total,
        new_total: state.coins,
    });
}

/// The next `is_active` player after `outgoing`, wrapping around to the
/// lowest-numbered active player.
fn rotate_player(player_states: &HashMap<i32, PlayerState>, outgoing: i32) -> i32 {
    let mut active: Vec<i32> = player_states
        .iter()
        .filter(|(_, state)| state.is_active)
        .map(|(&id, _)| id)
        .collect();
    active.sort_unstable();
    if active.is_empty() {
        return outgoing;
    }
    let next = active.iter().find(|&&id| id > outgoing).copied();
    next.unwrap_or(active[0])
}

/// If only one player still has units on the board, returns that player
/// as the winner. `spec.md` §4.5 step 4.
#[must_use]
pub fn check_victory(world: &World, player_states: &HashMap<i32, PlayerState>) -> Option<i32> {
    let mut owners: Vec<i32> = player_states.keys().copied().collect();
    owners.sort_unstable();
    let mut with_units: Vec<i32> = Vec::new();
    for &player in &owners {
        if world.player_units(player).next().is_some() {
            with_units.push(player);
        }
    }
    match with_units.as_slice() {
        [only] => {
            tracing::info!(winner = only, "sole surviving player");
            Some(*only)
        }
        _ => None,
    }
}
