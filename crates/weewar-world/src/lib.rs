//! The transactional board store. See `spec.md` §4.2 "World (C2)".
//!
//! A `World` is a chain of delta layers. The root layer owns the full
//! board; every `push()` allocates a child that records only what changes
//! relative to its parent, so speculative mutation (AI search, combat
//! preview, undo) is just "push, mutate, inspect, pop".

use std::collections::{HashMap, HashSet};

use weewar_contracts::crossing::Crossing;
use weewar_contracts::hex_grid::AxialCoord;
use weewar_contracts::tile::Tile;
use weewar_contracts::unit::Unit;

/// Which kind of entity a shortcut resolves to, since tiles and units
/// share one shortcut namespace but live in separate maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutTarget {
    Tile(AxialCoord),
    Unit(AxialCoord),
}

/// The board store. See the module doc for the layering model.
#[derive(Debug, Clone)]
pub struct World {
    parent: Option<Box<World>>,

    tiles: HashMap<AxialCoord, Tile>,
    units: HashMap<AxialCoord, Unit>,
    crossings: HashMap<AxialCoord, Crossing>,

    tile_deleted: HashSet<AxialCoord>,
    unit_deleted: HashSet<AxialCoord>,

    units_added: i64,
    units_deleted: i64,

    by_shortcut: HashMap<String, ShortcutTarget>,
    /// Next numeric suffix to hand out per player letter.
    shortcut_counters: HashMap<i32, u32>,
}

/// Maps a 1-based player id to its shortcut letter (`spec.md` §4.2
/// "Shortcuts": `A1, A2, ..., B1, ...`). Letters beyond `Z` wrap to `AA`,
/// `AB`, ... in base-26, matching how spreadsheet columns extend.
#[must_use]
pub fn shortcut_letter(player: i32) -> String {
    let mut n = (player.max(1) - 1) as u32;
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

impl World {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            tiles: HashMap::new(),
            units: HashMap::new(),
            crossings: HashMap::new(),
            tile_deleted: HashSet::new(),
            unit_deleted: HashSet::new(),
            units_added: 0,
            units_deleted: 0,
            by_shortcut: HashMap::new(),
            shortcut_counters: HashMap::new(),
        }
    }

    // --- Transactional layering ---

    /// Allocates a child layer on top of `self`. All writes after this call
    /// land in the child; `pop()` discards them.
    #[must_use]
    pub fn push(self) -> World {
        let shortcut_counters = self.shortcut_counters.clone();
        World {
            parent: Some(Box::new(self)),
            tiles: HashMap::new(),
            units: HashMap::new(),
            crossings: HashMap::new(),
            tile_deleted: HashSet::new(),
            unit_deleted: HashSet::new(),
            units_added: 0,
            units_deleted: 0,
            by_shortcut: HashMap::new(),
            shortcut_counters,
        }
    }

    /// Discards this layer and returns its parent. Popping the root layer
    /// is a no-op: it returns itself, since there is nothing above it.
    #[must_use]
    pub fn pop(self) -> World {
        match self.parent {
            Some(parent) => *parent,
            None => World { ..self },
        }
    }

    #[must_use]
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    // --- Reads ---

    #[must_use]
    pub fn tile_at(&self, coord: AxialCoord) -> Option<&Tile> {
        if self.tile_deleted.contains(&coord) {
            return None;
        }
        match self.tiles.get(&coord) {
            Some(tile) => Some(tile),
            None => self.parent.as_ref().and_then(|p| p.tile_at(coord)),
        }
    }

    #[must_use]
    pub fn unit_at(&self, coord: AxialCoord) -> Option<&Unit> {
        if self.unit_deleted.contains(&coord) {
            return None;
        }
        match self.units.get(&coord) {
            Some(unit) => Some(unit),
            None => self.parent.as_ref().and_then(|p| p.unit_at(coord)),
        }
    }

    #[must_use]
    pub fn crossing_at(&self, coord: AxialCoord) -> Option<&Crossing> {
        if self.tile_deleted.contains(&coord) {
            return None;
        }
        match self.crossings.get(&coord) {
            Some(crossing) => Some(crossing),
            None => self.parent.as_ref().and_then(|p| p.crossing_at(coord)),
        }
    }

    #[must_use]
    pub fn resolve_shortcut(&self, shortcut: &str) -> Option<ShortcutTarget> {
        match self.by_shortcut.get(shortcut) {
            Some(target) => Some(*target),
            None => self.parent.as_ref().and_then(|p| p.resolve_shortcut(shortcut)),
        }
    }

    /// Count of live units across this layer and its ancestors. O(1) per
    /// layer, per `spec.md` §4.2.
    #[must_use]
    pub fn num_units(&self) -> i64 {
        let parent_count = self.parent.as_ref().map_or(0, |p| p.num_units());
        parent_count + self.units_added - self.units_deleted
    }

    /// Units owned by `player`, newest layer first, de-duplicated against
    /// ancestor layers and tombstones.
    pub fn player_units(&self, player: i32) -> impl Iterator<Item = &Unit> {
        self.units_by_coord()
            .into_iter()
            .filter(move |u| u.player == player)
    }

    /// All live units, local layer entries taking precedence over parent
    /// entries at the same coordinate.
    #[must_use]
    pub fn units_by_coord(&self) -> Vec<&Unit> {
        let mut seen: HashSet<AxialCoord> = HashSet::new();
        let mut out: Vec<&Unit> = Vec::new();
        for unit in self.units.values() {
            seen.insert(unit.coord);
            out.push(unit);
        }
        for coord in &self.unit_deleted {
            seen.insert(*coord);
        }
        if let Some(parent) = &self.parent {
            for unit in parent.units_by_coord() {
                if seen.insert(unit.coord) {
                    out.push(unit);
                }
            }
        }
        out
    }

    #[must_use]
    pub fn tiles_by_coord(&self) -> Vec<&Tile> {
        let mut seen: HashSet<AxialCoord> = HashSet::new();
        let mut out: Vec<&Tile> = Vec::new();
        for tile in self.tiles.values() {
            seen.insert(tile.coord);
            out.push(tile);
        }
        for coord in &self.tile_deleted {
            seen.insert(*coord);
        }
        if let Some(parent) = &self.parent {
            for tile in parent.tiles_by_coord() {
                if seen.insert(tile.coord) {
                    out.push(tile);
                }
            }
        }
        out
    }

    // --- Writes ---

    fn next_shortcut(&mut self, player: i32) -> String {
        let counter = self.shortcut_counters.entry(player).or_insert(0);
        *counter += 1;
        format!("{}{}", shortcut_letter(player), counter)
    }

    /// Inserts or overwrites a tile in the local layer, assigning it a
    /// shortcut if it has none and is player-owned.
    pub fn add_tile(&mut self, mut tile: Tile) {
        let coord = tile.coord;
        if tile.shortcut.is_empty() && tile.player > 0 {
            tile.shortcut = self.next_shortcut(tile.player);
        }
        if !tile.shortcut.is_empty() {
            self.by_shortcut
                .insert(tile.shortcut.clone(), ShortcutTarget::Tile(coord));
        }
        self.tile_deleted.remove(&coord);
        self.tiles.insert(coord, tile);
    }

    pub fn delete_tile(&mut self, coord: AxialCoord) {
        if let Some(shortcut) = self.tile_at(coord).map(|tile| tile.shortcut.clone()) {
            if !shortcut.is_empty() {
                self.by_shortcut.remove(&shortcut);
            }
        }
        self.tiles.remove(&coord);
        self.tile_deleted.insert(coord);
    }

    /// Updates a tile's `tile_type` in place, copy-on-write if the tile
    /// currently resolves from a parent layer.
    pub fn set_tile_type(&mut self, coord: AxialCoord, tile_type: i32) {
        if let Some(tile) = self.tiles.get_mut(&coord) {
            tile.tile_type = tile_type;
            return;
        }
        if let Some(parent_tile) = self.tile_at(coord) {
            let mut tile = parent_tile.clone();
            tile.tile_type = tile_type;
            self.tiles.insert(coord, tile);
        }
    }

    pub fn set_crossing(&mut self, coord: AxialCoord, crossing: Crossing) {
        self.crossings.insert(coord, crossing);
    }

    /// Transfers ownership of the tile at `coord` to `player`, copy-on-write
    /// if it currently resolves from a parent layer. Used by capture
    /// (`spec.md` §4.4.3).
    pub fn set_tile_owner(&mut self, coord: AxialCoord, player: i32) {
        if let Some(tile) = self.tiles.get_mut(&coord) {
            tile.player = player;
            return;
        }
        if let Some(parent_tile) = self.tile_at(coord) {
            let mut tile = parent_tile.clone();
            tile.player = player;
            self.tiles.insert(coord, tile);
        }
    }

    /// Inserts a unit at `unit.coord`, returning any unit it displaced.
    /// Assigns a shortcut if the unit has none.
    pub fn add_unit(&mut self, mut unit: Unit) -> Option<Unit> {
        let coord = unit.coord;
        let displaced = self.unit_at(coord).cloned();
        if unit.shortcut.is_empty() && unit.player > 0 {
            unit.shortcut = self.next_shortcut(unit.player);
        }
        if !unit.shortcut.is_empty() {
            self.by_shortcut
                .insert(unit.shortcut.clone(), ShortcutTarget::Unit(coord));
        }
        if displaced.is_none() {
            self.units_added += 1;
        }
        self.unit_deleted.remove(&coord);
        self.units.insert(coord, unit);
        displaced
    }

    /// Removes whichever unit currently occupies `coord`, if any.
    pub fn remove_unit(&mut self, coord: AxialCoord) -> Option<Unit> {
        let existing = self.unit_at(coord).cloned();
        if let Some(unit) = &existing {
            if !unit.shortcut.is_empty() {
                self.by_shortcut.remove(&unit.shortcut);
            }
            self.units.remove(&coord);
            self.unit_deleted.insert(coord);
            self.units_deleted += 1;
        }
        existing
    }

    /// Relocates the unit at `from` to `to`. Copy-on-write: if the unit
    /// only exists in a parent layer, it is cloned into this layer before
    /// mutation, so the parent layer is never aliased (`spec.md` §4.2).
    pub fn move_unit(&mut self, from: AxialCoord, to: AxialCoord) -> Option<Unit> {
        let mut unit = self.unit_at(from)?.clone();
        self.units.remove(&from);
        self.unit_deleted.insert(from);
        unit.coord = to;
        self.unit_deleted.remove(&to);
        self.units.insert(to, unit.clone());
        Some(unit)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weewar_contracts::tile::{nature, player_controllable};

    fn coord(q: i32, r: i32) -> AxialCoord {
        AxialCoord::new(q, r)
    }

    #[test]
    fn shortcut_letters_follow_spreadsheet_column_scheme() {
        assert_eq!(shortcut_letter(1), "A");
        assert_eq!(shortcut_letter(2), "B");
        assert_eq!(shortcut_letter(26), "Z");
        assert_eq!(shortcut_letter(27), "AA");
    }

    #[test]
    fn add_unit_assigns_sequential_shortcuts_per_player() {
        let mut world = World::new();
        world.add_unit(Unit::new(coord(0, 0), 1, 10, 3.0));
        world.add_unit(Unit::new(coord(1, 0), 1, 10, 3.0));
        world.add_unit(Unit::new(coord(2, 0), 2, 10, 3.0));
        assert_eq!(world.unit_at(coord(0, 0)).unwrap().shortcut, "A1");
        assert_eq!(world.unit_at(coord(1, 0)).unwrap().shortcut, "A2");
        assert_eq!(world.unit_at(coord(2, 0)).unwrap().shortcut, "B1");
    }

    #[test]
    fn child_layer_reads_fall_through_to_parent() {
        let mut root = World::new();
        root.add_tile(Tile::new(coord(0, 0), nature::GRASS));
        let child = root.push();
        assert_eq!(child.tile_at(coord(0, 0)).unwrap().tile_type, nature::GRASS);
    }

    #[test]
    fn child_layer_tombstone_hides_parent_entry() {
        let mut root = World::new();
        root.add_unit(Unit::new(coord(0, 0), 1, 10, 3.0));
        let mut child = root.push();
        child.remove_unit(coord(0, 0));
        assert!(child.unit_at(coord(0, 0)).is_none());
    }

    #[test]
    fn pop_discards_child_mutations() {
        let mut root = World::new();
        root.add_tile(Tile::new(coord(0, 0), nature::GRASS));
        let mut child = root.push();
        child.set_tile_type(coord(0, 0), nature::WATER);
        assert_eq!(child.tile_at(coord(0, 0)).unwrap().tile_type, nature::WATER);
        let popped = child.pop();
        assert_eq!(popped.tile_at(coord(0, 0)).unwrap().tile_type, nature::GRASS);
    }

    #[test]
    fn move_unit_copies_into_child_without_mutating_parent() {
        let mut root = World::new();
        root.add_unit(Unit::new(coord(0, 0), 1, 10, 3.0));
        let mut child = root.push();
        child.move_unit(coord(0, 0), coord(1, 0));
        assert!(child.unit_at(coord(1, 0)).is_some());
        assert!(root.unit_at(coord(0, 0)).is_some());
        assert!(root.unit_at(coord(1, 0)).is_none());
    }

    #[test]
    fn num_units_is_cheap_across_layers() {
        let mut root = World::new();
        root.add_unit(Unit::new(coord(0, 0), 1, 10, 3.0));
        root.add_unit(Unit::new(coord(1, 0), 1, 10, 3.0));
        let mut child = root.push();
        child.add_unit(Unit::new(coord(2, 0), 1, 10, 3.0));
        child.remove_unit(coord(0, 0));
        assert_eq!(child.num_units(), 2);
    }

    #[test]
    fn set_tile_owner_copies_into_child_layer() {
        let mut root = World::new();
        root.add_tile(Tile::new(coord(0, 0), nature::GRASS));
        let mut child = root.push();
        child.set_tile_owner(coord(0, 0), 3);
        assert_eq!(child.tile_at(coord(0, 0)).unwrap().player, 3);
        assert_eq!(root.tile_at(coord(0, 0)).unwrap().player, 0);
    }

    #[test]
    fn add_unit_returns_displaced_occupant() {
        let mut world = World::new();
        world.add_unit(Unit::new(coord(0, 0), 1, 10, 3.0));
        let displaced = world.add_unit(Unit::new(coord(0, 0), 2, 11, 2.0));
        assert_eq!(displaced.unwrap().player, 1);
    }

    #[test]
    fn remove_unit_drops_its_shortcut_from_the_index() {
        let mut world = World::new();
        world.add_unit(Unit::new(coord(0, 0), 1, 10, 3.0));
        let shortcut = world.unit_at(coord(0, 0)).unwrap().shortcut.clone();
        assert!(world.resolve_shortcut(&shortcut).is_some());

        world.remove_unit(coord(0, 0));
        assert!(world.resolve_shortcut(&shortcut).is_none());
    }

    #[test]
    fn delete_tile_drops_its_shortcut_from_the_index() {
        let mut world = World::new();
        let mut tile = Tile::new(coord(0, 0), player_controllable::LAND_BASE);
        tile.player = 1;
        world.add_tile(tile);
        let shortcut = world.tile_at(coord(0, 0)).unwrap().shortcut.clone();
        assert!(world.resolve_shortcut(&shortcut).is_some());

        world.delete_tile(coord(0, 0));
        assert!(world.resolve_shortcut(&shortcut).is_none());
    }
}
