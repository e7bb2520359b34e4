//! Parses the composite-key property tables and builds the cross-reference
//! indexes `RulesEngine` queries against. See `spec.md` §6 "Rules data
//! format".

use std::collections::HashMap;

use weewar_contracts::error::WeewarError;
use weewar_contracts::rules_data::{
    RulesDocument, TerrainDefinition, TerrainUnitProperties, UnitDefinition, UnitUnitProperties,
};

/// Parses a `"a:b"` composite key into `(a, b)`. Both sides are i32.
pub fn parse_composite_key(key: &str) -> Option<(i32, i32)> {
    let (a, b) = key.split_once(':')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

#[must_use]
pub fn format_composite_key(a: i32, b: i32) -> String {
    format!("{a}:{b}")
}

/// The indexes a loaded rules document resolves to. Built once at load
/// time so every query afterwards is O(1) hash lookups.
#[derive(Debug, Clone, Default)]
pub struct RulesIndex {
    pub units_by_id: HashMap<i32, UnitDefinition>,
    pub terrains_by_id: HashMap<i32, TerrainDefinition>,
    pub terrain_unit_props: HashMap<(i32, i32), TerrainUnitProperties>,
    pub unit_unit_props: HashMap<(i32, i32), UnitUnitProperties>,
}

/// Builds a [`RulesIndex`] from a raw document, deduplicating damage-range
/// entries and rejecting malformed composite keys.
///
/// # Errors
/// Returns [`WeewarError::MissingRulesEntry`] if a composite key does not
/// parse as `"int:int"`.
pub fn build_index(doc: &RulesDocument) -> Result<RulesIndex, WeewarError> {
    let mut index = RulesIndex {
        units_by_id: doc.units.iter().map(|u| (u.id, u.clone())).collect(),
        terrains_by_id: doc.terrains.iter().map(|t| (t.id, t.clone())).collect(),
        ..RulesIndex::default()
    };

    for (key, props) in &doc.terrain_unit_properties {
        let (terrain_id, unit_id) = parse_composite_key(key).ok_or_else(|| WeewarError::MissingRulesEntry {
            detail: format!("malformed terrain_unit_properties key {key:?}"),
        })?;
        index.terrain_unit_props.insert((terrain_id, unit_id), *props);
    }

    for (key, props) in &doc.unit_unit_properties {
        let (attacker_id, defender_id) = parse_composite_key(key).ok_or_else(|| WeewarError::MissingRulesEntry {
            detail: format!("malformed unit_unit_properties key {key:?}"),
        })?;
        let mut props = props.clone();
        dedup_damage_ranges(&mut props.damage.ranges);
        index.unit_unit_props.insert((attacker_id, defender_id), props);
    }

    Ok(index)
}

/// Removes duplicate `(min, max)` bands, keeping the last occurrence (the
/// one that would win a naive "later entries override" merge).
fn dedup_damage_ranges(ranges: &mut Vec<weewar_contracts::rules_data::DamageRange>) {
    let mut seen: HashMap<(i32, i32), usize> = HashMap::new();
    let mut deduped = Vec::with_capacity(ranges.len());
    for range in ranges.drain(..) {
        match seen.get(&(range.min, range.max)) {
            Some(&idx) => {
                tracing::warn!(min = range.min, max = range.max, "duplicate damage range band, keeping last");
                deduped[idx] = range;
            }
            None => {
                seen.insert((range.min, range.max), deduped.len());
                deduped.push(range);
            }
        }
    }
    *ranges = deduped;
}
