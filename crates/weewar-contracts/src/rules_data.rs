//! The data-driven rules document: unit/terrain definitions and the two
//! property override tables. See `spec.md` §3 "UnitDefinition" through
//! "UnitUnitProperties" and §6 "Rules data format".
//!
//! This module only defines the shapes. Lookup/fallback semantics
//! (`spec.md` §4.3) live in `weewar-rules-engine`, which treats these
//! tables as read-only.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The movement domain of a unit — which terrain it can cross and which
/// attack tables it is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitTerrain {
    Land,
    Naval,
    Air,
}

/// Broad terrain classification used to key `TerrainDefinition.terrain_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainType {
    Nature,
    Player,
}

/// Static definition of a unit type, as loaded from the rules document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub id: i32,
    pub name: String,
    /// Designer-defined grouping used to key `attack_vs_class` (e.g.
    /// "infantry", "tank", "chopper").
    pub unit_class: String,
    pub unit_terrain: UnitTerrain,
    pub health: i32,
    pub movement_points: f64,
    /// Inclusive attack range `(min, max)` in axial hex distance.
    pub attack_range: (u32, u32),
    pub defense: f64,
    /// Base attack value against `(defender_class, defender_terrain)`.
    /// Absence of an entry means this unit cannot damage that
    /// class/terrain pairing at all (`spec.md` §4.3.5 step 1).
    #[serde(default)]
    pub attack_vs_class: HashMap<(String, UnitTerrain), f64>,
    /// The per-unit-type action-order state machine (`spec.md` §4.4.1).
    /// Each entry is either a single action name or a `"a|b"` alternation.
    pub action_order: Vec<String>,
    #[serde(default)]
    pub splash_damage: u32,
    /// Repair rate `F` used in the fix formula (`spec.md` §4.3.7).
    #[serde(default)]
    pub fix_value: f64,
    #[serde(default)]
    pub cost: i32,
}

/// Static definition of a terrain/tile type, as loaded from the rules
/// document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainDefinition {
    pub id: i32,
    pub name: String,
    pub terrain_type: TerrainType,
    pub base_move_cost: f64,
    #[serde(default)]
    pub defense_bonus: f64,
}

/// Override entry for a `(terrain_id, unit_id)` pair. Absence of an entry
/// means fall back to terrain/unit defaults (`spec.md` §4.3.1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TerrainUnitProperties {
    /// A non-positive or absent value means "use the terrain default".
    #[serde(default)]
    pub movement_cost: f64,
    #[serde(default)]
    pub attack_bonus: f64,
    #[serde(default)]
    pub defense_bonus: f64,
}

/// One contiguous band of the damage distribution, with its probability
/// mass (`spec.md` §3 "UnitUnitProperties").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageRange {
    pub min: i32,
    pub max: i32,
    pub prob: f64,
}

/// Analytical damage distribution for an attacker/defender pairing, as
/// produced by `combat_prediction` (`spec.md` §4.3.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DamageDistribution {
    pub min: i32,
    pub max: i32,
    pub expected: f64,
    pub ranges: Vec<DamageRange>,
}

/// Override entry for an `(attacker_id, defender_id)` pair. Absence of an
/// entry means the attacker cannot damage the defender at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitUnitProperties {
    pub damage: DamageDistribution,
}

/// The full rules document: every table needed to run the engine,
/// as loaded from the wire format described in `spec.md` §6.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesDocument {
    pub units: Vec<UnitDefinition>,
    pub terrains: Vec<TerrainDefinition>,
    /// Keyed by the composite string `"terrain_id:unit_id"` on the wire;
    /// see `weewar-rules-engine::loader` for the parse/format step.
    #[serde(default)]
    pub terrain_unit_properties: HashMap<String, TerrainUnitProperties>,
    /// Keyed by the composite string `"attacker_id:defender_id"` on the wire.
    #[serde(default)]
    pub unit_unit_properties: HashMap<String, UnitUnitProperties>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_document_has_empty_tables() {
        let doc = RulesDocument::default();
        assert!(doc.units.is_empty());
        assert!(doc.terrains.is_empty());
        assert!(doc.terrain_unit_properties.is_empty());
        assert!(doc.unit_unit_properties.is_empty());
    }

    #[test]
    fn terrain_unit_properties_default_signals_fall_through() {
        let props = TerrainUnitProperties::default();
        assert_eq!(props.movement_cost, 0.0);
    }
}
