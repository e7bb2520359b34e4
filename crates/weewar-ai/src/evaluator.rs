//! The weighted position evaluator. `spec.md` §4.7: "scores a position as
//! a weighted sum over four groups (material 40%, economic 35%, tactical
//! 15%, strategic 10%); each component is a normalized ratio of player
//! total to all-players total."

use weewar_contracts::tile::player_controllable as pc;
use weewar_simulation::Game;

/// The four scoring groups' relative importance. `Balanced` is the
/// document-specified split; the other three personalities bias it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub material: f64,
    pub economic: f64,
    pub tactical: f64,
    pub strategic: f64,
}

impl Weights {
    #[must_use]
    pub const fn balanced() -> Self {
        Self {
            material: 0.40,
            economic: 0.35,
            tactical: 0.15,
            strategic: 0.10,
        }
    }

    #[must_use]
    pub const fn aggressive() -> Self {
        Self {
            material: 0.35,
            economic: 0.15,
            tactical: 0.40,
            strategic: 0.10,
        }
    }

    #[must_use]
    pub const fn defensive() -> Self {
        Self {
            material: 0.40,
            economic: 0.20,
            tactical: 0.10,
            strategic: 0.30,
        }
    }

    #[must_use]
    pub const fn economic() -> Self {
        Self {
            material: 0.25,
            economic: 0.55,
            tactical: 0.10,
            strategic: 0.10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Personality {
    Balanced,
    Aggressive,
    Defensive,
    Economic,
}

impl Personality {
    #[must_use]
    pub fn weights(self) -> Weights {
        match self {
            Self::Balanced => Weights::balanced(),
            Self::Aggressive => Weights::aggressive(),
            Self::Defensive => Weights::defensive(),
            Self::Economic => Weights::economic(),
        }
    }
}

/// A normalized ratio: `player`'s share of `total` across all players.
/// `0.5` (neutral) when the total is zero, so an empty board never
/// divides by zero or biases the search.
fn ratio(player_total: f64, all_players_total: f64) -> f64 {
    if all_players_total <= 0.0 {
        0.5
    } else {
        player_total / all_players_total
    }
}

fn active_players(game: &Game) -> Vec<i32> {
    let mut players: Vec<i32> = game.player_states().keys().copied().collect();
    players.sort_unstable();
    players
}

fn material_total(game: &Game, player: i32) -> f64 {
    game.get_units_for_player(player)
        .iter()
        .map(|unit| {
            let value = game
                .rules()
                .unit_def(unit.unit_type)
                .map_or(0.0, |def| f64::from(def.cost));
            value * (f64::from(unit.available_health) / f64::from(weewar_contracts::unit::MAX_HEALTH))
        })
        .sum()
}

fn economic_total(game: &Game, player: i32) -> f64 {
    let coins = game.player_states().get(&player).map_or(0, |state| state.coins) as f64;
    let owned_income_tiles = game
        .world()
        .tiles_by_coord()
        .into_iter()
        .filter(|tile| tile.player == player && is_income_producing(tile.tile_type))
        .count() as f64;
    coins + owned_income_tiles * 50.0
}

fn is_income_producing(tile_type: i32) -> bool {
    matches!(
        tile_type,
        pc::LAND_BASE | pc::NAVAL_BASE | pc::AIRPORT | pc::MISSILE_SILO | pc::MINES | pc::CITY
    )
}

/// Sum, over this player's units, of nearby enemy unit value within
/// attack range (threat the player poses) minus nearby friendly units
/// within an enemy's range (threat the player is exposed to). A rough
/// proxy for tactical pressure, not a full combat simulation.
fn tactical_total(game: &Game, player: i32) -> f64 {
    let mut total = 0.0;
    for unit in game.get_units_for_player(player) {
        let options = weewar_rules_engine::combat::attack_options(game.rules(), game.world(), &unit);
        for target in options {
            total += crate::moves_gen::unit_value_at(game, target);
        }
    }
    total
}

fn strategic_total(game: &Game, player: i32) -> f64 {
    game.world()
        .tiles_by_coord()
        .into_iter()
        .filter(|tile| tile.player == player)
        .count() as f64
}

/// Scores `game` from `player`'s perspective. Higher is better for
/// `player`.
#[must_use]
pub fn score(game: &Game, player: i32, weights: Weights) -> f64 {
    let players = active_players(game);

    let material_all: f64 = players.iter().map(|&p| material_total(game, p)).sum();
    let economic_all: f64 = players.iter().map(|&p| economic_total(game, p)).sum();
    let tactical_all: f64 = players.iter().map(|&p| tactical_total(game, p)).sum();
    let strategic_all: f64 = players.iter().map(|&p| strategic_total(game, p)).sum();

    weights.material * ratio(material_total(game, player), material_all)
        + weights.economic * ratio(economic_total(game, player), economic_all)
        + weights.tactical * ratio(tactical_total(game, player), tactical_all)
        + weights.strategic * ratio(strategic_total(game, player), strategic_all)
}
