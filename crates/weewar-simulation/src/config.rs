//! Per-game configuration: income defaults, player roster, and policy
//! flags. Uses a partial-settings merge pattern (`Option<T>` per field,
//! lowest layer wins the gap) so callers can compose built-in defaults
//! with scenario overrides.

use serde::{Deserialize, Serialize};

use weewar_contracts::tile::player_controllable;

/// Per-tile-type income on end-turn, plus a flat per-player stipend.
/// `spec.md` §4.5 step 2. Fields left `None` fall back to
/// [`IncomeConfig::defaults`]; any tile type with no dedicated field
/// falls back to `default_income` (documented in `DESIGN.md`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct IncomeConfig {
    pub land_base: Option<i32>,
    pub naval_base: Option<i32>,
    pub airport: Option<i32>,
    pub missile_silo: Option<i32>,
    pub mines: Option<i32>,
    pub city: Option<i32>,
    /// Fallback for tile types with no dedicated field.
    pub default_income: Option<i32>,
    /// Flat stipend added once per player per turn, independent of tiles.
    pub game_income: Option<i32>,
}

impl IncomeConfig {
    /// The hardcoded defaults named in `spec.md` §4.5.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            land_base: Some(100),
            naval_base: Some(150),
            airport: Some(200),
            missile_silo: Some(300),
            mines: Some(50),
            city: Some(75),
            default_income: Some(0),
            game_income: Some(0),
        }
    }

    /// Fills every `None` field from `fallback`.
    #[must_use]
    pub fn merged_with(self, fallback: Self) -> Self {
        Self {
            land_base: self.land_base.or(fallback.land_base),
            naval_base: self.naval_base.or(fallback.naval_base),
            airport: self.airport.or(fallback.airport),
            missile_silo: self.missile_silo.or(fallback.missile_silo),
            mines: self.mines.or(fallback.mines),
            city: self.city.or(fallback.city),
            default_income: self.default_income.or(fallback.default_income),
            game_income: self.game_income.or(fallback.game_income),
        }
    }

    /// Income for one tile of `tile_type`, or `0` if it is not an
    /// income-producing type at all.
    #[must_use]
    pub fn income_for_tile_type(&self, tile_type: i32) -> i32 {
        let resolved = self.clone().merged_with(Self::defaults());
        let fallback = resolved.default_income.unwrap_or(0);
        match tile_type {
            player_controllable::LAND_BASE => resolved.land_base.unwrap_or(fallback),
            player_controllable::NAVAL_BASE => resolved.naval_base.unwrap_or(fallback),
            player_controllable::AIRPORT => resolved.airport.unwrap_or(fallback),
            player_controllable::MISSILE_SILO => resolved.missile_silo.unwrap_or(fallback),
            player_controllable::MINES => resolved.mines.unwrap_or(fallback),
            player_controllable::CITY => resolved.city.unwrap_or(fallback),
            _ => 0,
        }
    }

    #[must_use]
    pub fn flat_game_income(&self) -> i32 {
        self.game_income.unwrap_or(0)
    }
}

/// Engine-wide policy flags. `spec.md` §4.4.1 documents
/// `strict_action_order` as an open question resolved to "enforced" by
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub strict_action_order: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            strict_action_order: true,
        }
    }
}

/// The full per-game configuration bundle referenced by `Game.config` in
/// `spec.md` §3.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    pub income_config: IncomeConfig,
    pub player_count: i32,
    pub settings: EngineSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_income_matches_documented_values() {
        let config = IncomeConfig::default();
        assert_eq!(config.income_for_tile_type(player_controllable::LAND_BASE), 100);
        assert_eq!(config.income_for_tile_type(player_controllable::NAVAL_BASE), 150);
        assert_eq!(config.income_for_tile_type(player_controllable::AIRPORT), 200);
        assert_eq!(config.income_for_tile_type(player_controllable::MISSILE_SILO), 300);
    }

    #[test]
    fn mines_and_city_use_their_documented_defaults() {
        let config = IncomeConfig::default();
        assert_eq!(config.income_for_tile_type(player_controllable::MINES), 50);
        assert_eq!(config.income_for_tile_type(player_controllable::CITY), 75);
    }

    #[test]
    fn unlisted_tile_type_has_no_income() {
        let config = IncomeConfig::default();
        assert_eq!(config.income_for_tile_type(9999), 0);
    }

    #[test]
    fn override_wins_over_builtin_default() {
        let mut config = IncomeConfig::default();
        config.land_base = Some(999);
        assert_eq!(config.income_for_tile_type(player_controllable::LAND_BASE), 999);
    }
}
