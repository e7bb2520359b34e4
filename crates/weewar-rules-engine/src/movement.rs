//! Movement cost lookup, Dijkstra reachability, and path validation.
//! See `spec.md` §4.3.1-4.3.3.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use weewar_contracts::crossing::CrossingType;
use weewar_contracts::error::WeewarError;
use weewar_contracts::hex_grid::{self, AxialCoord};
use weewar_contracts::unit::Unit;
use weewar_world::World;

use crate::engine::RulesEngine;

/// Roads halve the underlying terrain cost.
pub const ROAD_MULTIPLIER: f64 = 0.5;
/// Fixed cost a bridge imposes on otherwise-impassable terrain.
pub const BRIDGE_COST: f64 = 1.0;

/// `TerrainDefinition.base_move_cost <= 0.0` is this engine's data-driven
/// encoding of "impassable to every unit absent an override" (e.g. deep
/// water for land units): the terrain table carries no separate boolean
/// flag, so a non-positive base cost is read as "lookup fails" per
/// `spec.md` §4.3.2 ("skipped if the cost lookup fails").
fn base_unit_terrain_cost(engine: &RulesEngine, unit_type: i32, tile_type: i32) -> Option<f64> {
    if let Some(props) = engine.index.terrain_unit_props.get(&(tile_type, unit_type)) {
        if props.movement_cost > 0.0 {
            return Some(props.movement_cost);
        }
    }
    match engine.terrain_def(tile_type) {
        Some(terrain) if terrain.base_move_cost > 0.0 => Some(terrain.base_move_cost),
        Some(_) => None,
        None => Some(1.0),
    }
}

/// The cost for `unit_type` to enter a tile of `tile_type` at `coord`,
/// accounting for a road/bridge crossing if present. `spec.md` §4.3.1.
#[must_use]
pub fn unit_terrain_cost(
    engine: &RulesEngine,
    world: &World,
    unit_type: i32,
    tile_type: i32,
    coord: AxialCoord,
) -> Option<f64> {
    let base = base_unit_terrain_cost(engine, unit_type, tile_type);
    let crossing = world.crossing_at(coord).filter(|c| c.is_present());
    match (base, crossing.map(|c| c.crossing_type)) {
        (Some(cost), Some(CrossingType::Road)) => Some(cost * ROAD_MULTIPLIER),
        (None, Some(CrossingType::Bridge)) => Some(BRIDGE_COST),
        (Some(cost), _) => Some(cost),
        (None, _) => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapEntry {
    cost: f64,
    coord: AxialCoord,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-source shortest paths from `unit`'s coordinate, stopping once a
/// node's tentative cost would exceed `budget`. Returns `(distances,
/// parents)`. `spec.md` §4.3.2.
#[must_use]
pub fn dijkstra(
    engine: &RulesEngine,
    world: &World,
    unit: &Unit,
    budget: f64,
) -> (HashMap<AxialCoord, f64>, HashMap<AxialCoord, AxialCoord>) {
    let mut distances: HashMap<AxialCoord, f64> = HashMap::new();
    let mut parents: HashMap<AxialCoord, AxialCoord> = HashMap::new();
    let mut visited: std::collections::HashSet<AxialCoord> = std::collections::HashSet::new();
    let mut heap = BinaryHeap::new();

    distances.insert(unit.coord, 0.0);
    heap.push(HeapEntry {
        cost: 0.0,
        coord: unit.coord,
    });

    while let Some(HeapEntry { cost, coord }) = heap.pop() {
        if !visited.insert(coord) {
            continue;
        }
        if cost > *distances.get(&coord).unwrap_or(&f64::INFINITY) {
            continue;
        }
        for neighbor in hex_grid::neighbors(coord) {
            if visited.contains(&neighbor) {
                continue;
            }
            let Some(tile) = world.tile_at(neighbor) else {
                continue;
            };
            if let Some(occupant) = world.unit_at(neighbor) {
                if occupant.coord != unit.coord {
                    continue;
                }
            }
            let Some(step_cost) =
                unit_terrain_cost(engine, world, unit.unit_type, tile.tile_type, neighbor)
            else {
                continue;
            };
            let tentative = cost + step_cost;
            if tentative > budget {
                continue;
            }
            if tentative < *distances.get(&neighbor).unwrap_or(&f64::INFINITY) {
                distances.insert(neighbor, tentative);
                parents.insert(neighbor, coord);
                heap.push(HeapEntry {
                    cost: tentative,
                    coord: neighbor,
                });
            }
        }
    }

    tracing::debug!(
        unit_coord = ?unit.coord,
        budget,
        relaxed = distances.len(),
        "dijkstra settled"
    );
    (distances, parents)
}

/// Reachable, unoccupied tiles within `unit`'s remaining movement.
/// `spec.md` §4.3.2.
#[must_use]
pub fn movement_options(
    engine: &RulesEngine,
    world: &World,
    unit: &Unit,
    remaining: f64,
) -> Vec<(AxialCoord, f64)> {
    let (distances, _) = dijkstra(engine, world, unit, remaining);
    distances
        .into_iter()
        .filter(|&(coord, _)| coord != unit.coord && world.unit_at(coord).is_none())
        .collect()
}

/// # Errors
/// [`WeewarError::NotReachable`] if `to` is not reachable within
/// `unit.distance_left`.
pub fn get_movement_cost(
    engine: &RulesEngine,
    world: &World,
    unit: &Unit,
    to: AxialCoord,
) -> Result<f64, WeewarError> {
    let (distances, _) = dijkstra(engine, world, unit, unit.distance_left);
    distances.get(&to).copied().ok_or(WeewarError::NotReachable { coord: to })
}

/// Validates a multi-tile path step by step. `spec.md` §4.3.3.
///
/// # Errors
/// - [`WeewarError::InvalidCoord`] if `path` is empty or does not start at
///   the unit's current coordinate.
/// - [`WeewarError::NotAdjacent`] if a consecutive pair is not adjacent.
/// - [`WeewarError::TileNotFound`] if a step's destination tile is missing.
/// - [`WeewarError::PositionOccupied`] if a step's destination holds
///   another unit.
/// - [`WeewarError::ImpassableTerrain`] if a step's terrain cost lookup
///   fails.
/// - [`WeewarError::InsufficientMovement`] if the total cost exceeds
///   `unit.distance_left`.
pub fn is_valid_path(
    engine: &RulesEngine,
    world: &World,
    unit: &Unit,
    path: &[AxialCoord],
) -> Result<f64, WeewarError> {
    let Some(&first) = path.first() else {
        return Err(WeewarError::InvalidCoord { coord: unit.coord });
    };
    if first != unit.coord {
        return Err(WeewarError::InvalidCoord { coord: first });
    }

    let mut total_cost = 0.0;
    for pair in path.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if hex_grid::distance(from, to) != 1 {
            return Err(WeewarError::NotAdjacent { a: from, b: to });
        }
        let tile = world.tile_at(to).ok_or(WeewarError::TileNotFound { coord: to })?;
        if let Some(occupant) = world.unit_at(to) {
            if occupant.coord != unit.coord {
                return Err(WeewarError::PositionOccupied { coord: to });
            }
        }
        let step_cost = unit_terrain_cost(engine, world, unit.unit_type, tile.tile_type, to)
            .ok_or(WeewarError::ImpassableTerrain { coord: to })?;
        total_cost += step_cost;
    }

    if total_cost > unit.distance_left {
        return Err(WeewarError::InsufficientMovement {
            needed: total_cost,
            available: unit.distance_left,
        });
    }

    Ok(total_cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weewar_contracts::rules_data::{RulesDocument, TerrainDefinition, TerrainType, UnitDefinition, UnitTerrain};
    use weewar_contracts::tile::{nature, Tile};

    fn flat_engine() -> RulesEngine {
        let doc = RulesDocument {
            units: vec![UnitDefinition {
                id: 1,
                name: "Infantry".into(),
                unit_class: "infantry".into(),
                unit_terrain: UnitTerrain::Land,
                health: 100,
                movement_points: 3.0,
                attack_range: (1, 1),
                defense: 2.0,
                attack_vs_class: HashMap::new(),
                action_order: vec!["move|attack".into()],
                splash_damage: 0,
                fix_value: 0.0,
                cost: 100,
            }],
            terrains: vec![
                TerrainDefinition {
                    id: nature::GRASS,
                    name: "Grass".into(),
                    terrain_type: TerrainType::Nature,
                    base_move_cost: 1.0,
                    defense_bonus: 0.0,
                },
                TerrainDefinition {
                    id: nature::WATER,
                    name: "Water".into(),
                    terrain_type: TerrainType::Nature,
                    base_move_cost: 0.0,
                    defense_bonus: 0.0,
                },
            ],
            terrain_unit_properties: HashMap::new(),
            unit_unit_properties: HashMap::new(),
        };
        RulesEngine::load(&doc).unwrap()
    }

    fn grid(engine: &RulesEngine) -> World {
        let _ = engine;
        let mut world = World::new();
        for q in -3..=3 {
            for r in -3..=3 {
                world.add_tile(Tile::new(AxialCoord::new(q, r), nature::GRASS));
            }
        }
        world
    }

    #[test]
    fn water_is_impassable_without_a_bridge() {
        let engine = flat_engine();
        let world = grid(&engine);
        let cost = unit_terrain_cost(&engine, &world, 1, nature::WATER, AxialCoord::new(0, 0));
        assert_eq!(cost, None);
    }

    #[test]
    fn dijkstra_finds_grass_neighbors_within_budget() {
        let engine = flat_engine();
        let world = grid(&engine);
        let unit = Unit::new(AxialCoord::new(0, 0), 1, 1, 3.0);
        let (distances, _) = dijkstra(&engine, &world, &unit, 3.0);
        assert_eq!(distances.get(&AxialCoord::new(1, 0)), Some(&1.0));
        assert_eq!(distances.get(&AxialCoord::new(3, 0)), Some(&3.0));
    }

    #[test]
    fn movement_options_excludes_occupied_and_origin() {
        let engine = flat_engine();
        let mut world = grid(&engine);
        world.add_unit(Unit::new(AxialCoord::new(1, 0), 2, 1, 3.0));
        let unit = Unit::new(AxialCoord::new(0, 0), 1, 1, 3.0);
        let options = movement_options(&engine, &world, &unit, 3.0);
        assert!(!options.iter().any(|(c, _)| *c == AxialCoord::new(0, 0)));
        assert!(!options.iter().any(|(c, _)| *c == AxialCoord::new(1, 0)));
    }

    #[test]
    fn valid_path_accumulates_cost() {
        let engine = flat_engine();
        let world = grid(&engine);
        let unit = Unit::new(AxialCoord::new(0, 0), 1, 1, 3.0);
        let path = vec![AxialCoord::new(0, 0), AxialCoord::new(1, 0), AxialCoord::new(2, 0)];
        let cost = is_valid_path(&engine, &world, &unit, &path).unwrap();
        assert_eq!(cost, 2.0);
    }

    #[test]
    fn path_exceeding_budget_is_rejected() {
        let engine = flat_engine();
        let world = grid(&engine);
        let mut unit = Unit::new(AxialCoord::new(0, 0), 1, 1, 3.0);
        unit.distance_left = 1.0;
        let path = vec![AxialCoord::new(0, 0), AxialCoord::new(1, 0), AxialCoord::new(2, 0)];
        assert!(is_valid_path(&engine, &world, &unit, &path).is_err());
    }
}
