//! World save loading and the legacy tile-type migration. `spec.md` §6:
//! "On load, the loader must migrate legacy tile types that encoded
//! roads/bridges into the underlying terrain + a crossing entry
//! (idempotent)."

use weewar_contracts::crossing::{Crossing, CrossingType};
use weewar_contracts::hex_grid::{self, AxialCoord, Direction};
use weewar_contracts::save::WorldSave;
use weewar_contracts::tile::nature;

use crate::error::{PersistenceError, FORMAT_VERSION};

/// Pre-crossing-overlay tile type ids. A legacy world file baked the
/// crossing into the tile itself instead of layering it over the
/// underlying terrain; these ids never appear in a post-migration
/// [`WorldSave`].
pub mod legacy_tile_type {
    pub const ROAD: i32 = 200;
    pub const BRIDGE: i32 = 201;
}

/// `{format_version, save}`. The wrapper that actually gets serialized;
/// `WorldSave` itself carries no version tag.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WorldSaveFile {
    pub format_version: u32,
    pub save: WorldSave,
}

impl WorldSaveFile {
    #[must_use]
    pub fn new(save: WorldSave) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            save,
        }
    }
}

/// Parses a RON-encoded world save and migrates any legacy road/bridge
/// tile types in place.
pub fn load_world_save(ron_str: &str) -> Result<WorldSave, PersistenceError> {
    let file: WorldSaveFile = ron::from_str(ron_str)?;
    if file.format_version > FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: file.format_version,
            max: FORMAT_VERSION,
        });
    }
    let mut save = file.save;
    migrate_legacy_crossings(&mut save);
    Ok(save)
}

#[must_use]
pub fn save_world_save(save: &WorldSave) -> Result<String, PersistenceError> {
    let file = WorldSaveFile::new(save.clone());
    Ok(ron::ser::to_string_pretty(&file, ron::ser::PrettyConfig::default())?)
}

/// Rewrites every `legacy_tile_type::{ROAD, BRIDGE}` tile into its
/// underlying terrain plus a [`Crossing`] entry. A tile connects to a
/// neighbor when that neighbor is itself a road/bridge tile (pre-
/// migration) or already carries a crossing (post-migration), so this
/// is safe to run on an already-migrated save: no tile still has a
/// legacy type, so the loop below finds nothing to rewrite.
pub fn migrate_legacy_crossings(save: &mut WorldSave) {
    let legacy: Vec<(AxialCoord, i32)> = save
        .tiles
        .iter()
        .filter(|t| matches!(t.tile_type, legacy_tile_type::ROAD | legacy_tile_type::BRIDGE))
        .map(|t| (t.coord, t.tile_type))
        .collect();
    if legacy.is_empty() {
        return;
    }
    tracing::warn!(count = legacy.len(), "migrating legacy road/bridge tile types");

    let has_crossing_or_legacy = |coord: AxialCoord| -> bool {
        legacy.iter().any(|(c, _)| *c == coord)
            || save.crossings.iter().any(|(c, crossing)| *c == coord && crossing.is_present())
    };

    for (coord, tile_type) in &legacy {
        let crossing_type = if *tile_type == legacy_tile_type::ROAD {
            CrossingType::Road
        } else {
            CrossingType::Bridge
        };
        let mut connects_to = [false; 6];
        for (i, dir) in Direction::ALL.iter().enumerate() {
            let neighbor = hex_grid::neighbor(*coord, *dir);
            connects_to[i] = has_crossing_or_legacy(neighbor);
        }
        save.crossings.retain(|(c, _)| c != coord);
        save.crossings.push((
            *coord,
            Crossing {
                crossing_type,
                connects_to,
            },
        ));
    }

    for tile in &mut save.tiles {
        match tile.tile_type {
            legacy_tile_type::ROAD => tile.tile_type = nature::GRASS,
            legacy_tile_type::BRIDGE => tile.tile_type = nature::WATER,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weewar_contracts::tile::Tile;

    fn road_at(q: i32, r: i32) -> Tile {
        Tile::new(AxialCoord::new(q, r), legacy_tile_type::ROAD)
    }

    #[test]
    fn migrates_isolated_road_tile_to_grass_with_no_connections() {
        let mut save = WorldSave {
            name: "legacy".into(),
            tiles: vec![road_at(0, 0)],
            units: Vec::new(),
            crossings: Vec::new(),
        };
        migrate_legacy_crossings(&mut save);
        assert_eq!(save.tiles[0].tile_type, nature::GRASS);
        let (_, crossing) = save.crossings.iter().find(|(c, _)| *c == AxialCoord::new(0, 0)).unwrap();
        assert_eq!(crossing.crossing_type, CrossingType::Road);
        assert_eq!(crossing.connects_to, [false; 6]);
    }

    #[test]
    fn two_adjacent_road_tiles_connect_to_each_other() {
        let a = AxialCoord::new(0, 0);
        let b = hex_grid::neighbor(a, Direction::ALL[0]);
        let mut save = WorldSave {
            name: "legacy".into(),
            tiles: vec![Tile::new(a, legacy_tile_type::ROAD), Tile::new(b, legacy_tile_type::ROAD)],
            units: Vec::new(),
            crossings: Vec::new(),
        };
        migrate_legacy_crossings(&mut save);
        let (_, crossing_a) = save.crossings.iter().find(|(c, _)| *c == a).unwrap();
        assert!(crossing_a.connects_to[0]);
    }

    #[test]
    fn migration_is_idempotent() {
        let mut save = WorldSave {
            name: "legacy".into(),
            tiles: vec![road_at(1, 1)],
            units: Vec::new(),
            crossings: Vec::new(),
        };
        migrate_legacy_crossings(&mut save);
        let once = save.clone();
        migrate_legacy_crossings(&mut save);
        assert_eq!(save.tiles, once.tiles);
        assert_eq!(save.crossings.len(), once.crossings.len());
    }

    #[test]
    fn bridge_migrates_to_water() {
        let mut save = WorldSave {
            name: "legacy".into(),
            tiles: vec![Tile::new(AxialCoord::new(2, 2), legacy_tile_type::BRIDGE)],
            units: Vec::new(),
            crossings: Vec::new(),
        };
        migrate_legacy_crossings(&mut save);
        assert_eq!(save.tiles[0].tile_type, nature::WATER);
    }
}
