//! The rules engine proper: a read-only query service over a loaded
//! [`RulesDocument`]. See `spec.md` §4.3.

use weewar_contracts::error::WeewarError;
use weewar_contracts::rules_data::{RulesDocument, TerrainDefinition, UnitDefinition};

use crate::loader::{self, RulesIndex};

/// A loaded, indexed rules document. Construction is the only fallible
/// step; every query afterwards is infallible lookups over plain data.
#[derive(Debug, Clone)]
pub struct RulesEngine {
    pub(crate) index: RulesIndex,
}

impl RulesEngine {
    /// Indexes `doc`, deduplicating damage ranges and parsing composite
    /// keys. See `spec.md` §6 "Rules data format".
    ///
    /// # Errors
    /// See [`loader::build_index`].
    pub fn load(doc: &RulesDocument) -> Result<Self, WeewarError> {
        let index = loader::build_index(doc)?;
        Ok(Self { index })
    }

    #[must_use]
    pub fn unit_def(&self, unit_type: i32) -> Option<&UnitDefinition> {
        self.index.units_by_id.get(&unit_type)
    }

    #[must_use]
    pub fn terrain_def(&self, tile_type: i32) -> Option<&TerrainDefinition> {
        self.index.terrains_by_id.get(&tile_type)
    }

    /// # Errors
    /// [`WeewarError::UnknownUnitType`] if `unit_type` has no definition.
    pub fn require_unit_def(&self, unit_type: i32) -> Result<&UnitDefinition, WeewarError> {
        self.unit_def(unit_type)
            .ok_or(WeewarError::UnknownUnitType { unit_type })
    }

    /// # Errors
    /// [`WeewarError::UnknownTerrainType`] if `tile_type` has no definition.
    pub fn require_terrain_def(&self, tile_type: i32) -> Result<&TerrainDefinition, WeewarError> {
        self.terrain_def(tile_type)
            .ok_or(WeewarError::UnknownTerrainType { tile_type })
    }
}
