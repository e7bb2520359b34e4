//! The four strategy tiers named in `spec.md` §4.7: `Easy` (filtered
//! random), `Medium` (one-ply greedy), `Hard` (depth-2 minimax), `Expert`
//! (alpha-beta with a transposition table). Every tier returns its
//! best-so-far move if it runs out of its time budget.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use weewar_contracts::moves::GameMove;
use weewar_simulation::Game;

use crate::evaluator::{self, Personality, Weights};
use crate::moves_gen::{self, unit_value_at};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyTier {
    Easy,
    Medium,
    Hard,
    Expert,
}

#[derive(Debug, Clone, Copy)]
pub struct AdvisorOptions {
    pub tier: StrategyTier,
    pub personality: Personality,
    /// Advisory only: every tier checks elapsed time at node boundaries
    /// and returns its best-so-far move if exceeded. `spec.md` §4.7.
    pub time_budget: Duration,
}

impl Default for AdvisorOptions {
    fn default() -> Self {
        Self {
            tier: StrategyTier::Medium,
            personality: Personality::Balanced,
            time_budget: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MoveSuggestion {
    pub game_move: GameMove,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct MoveSuggestions {
    pub suggestions: Vec<MoveSuggestion>,
}

impl MoveSuggestions {
    #[must_use]
    pub fn best(&self) -> Option<&MoveSuggestion> {
        self.suggestions
            .iter()
            .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
    }
}

/// Pure entry point over `game`, read-only. `spec.md` §4.7.
#[must_use]
pub fn suggest_moves(game: &Game, player: i32, options: AdvisorOptions) -> MoveSuggestions {
    let weights = options.personality.weights();
    let candidates = moves_gen::legal_moves(game, player);
    if candidates.is_empty() {
        return MoveSuggestions {
            suggestions: vec![MoveSuggestion {
                game_move: GameMove::EndTurn,
                score: evaluator::score(game, player, weights),
            }],
        };
    }

    let deadline = Instant::now() + options.time_budget;
    match options.tier {
        StrategyTier::Easy => easy(game, player, &candidates),
        StrategyTier::Medium => medium(game, player, weights, &candidates, deadline),
        StrategyTier::Hard => hard(game, player, weights, &candidates, deadline),
        StrategyTier::Expert => expert(game, player, weights, &candidates, deadline),
    }
}

/// Uniform random over legal moves, filtering out any move that exposes
/// this player's acting unit to a higher-value enemy unit already in
/// range. `spec.md` §4.7 "Easy".
fn easy(game: &Game, player: i32, candidates: &[GameMove]) -> MoveSuggestions {
    let safe: Vec<&GameMove> = candidates
        .iter()
        .filter(|mv| !exposes_high_value_unit(game, player, mv))
        .collect();
    let all: Vec<&GameMove> = candidates.iter().collect();
    let pool: &[&GameMove] = if safe.is_empty() { &all } else { &safe };
    let mut rng = rand::rng();
    let chosen = pool.choose(&mut rng).copied().cloned().unwrap_or(GameMove::EndTurn);
    MoveSuggestions {
        suggestions: vec![MoveSuggestion {
            score: evaluator::score(game, player, Weights::balanced()),
            game_move: chosen,
        }],
    }
}

fn exposes_high_value_unit(game: &Game, player: i32, mv: &GameMove) -> bool {
    let (coord, own_value) = match mv {
        GameMove::MoveUnit { from, to } => {
            let from_coord = weewar_contracts::hex_grid::AxialCoord::new(from.q, from.r);
            (to.resolve(from_coord), unit_value_at(game, from_coord))
        }
        GameMove::AttackUnit { attacker, .. } => {
            let coord = weewar_contracts::hex_grid::AxialCoord::new(attacker.q, attacker.r);
            (coord, unit_value_at(game, coord))
        }
        _ => return false,
    };

    for unit in game.world().units_by_coord() {
        if unit.player == player {
            continue;
        }
        let Some(def) = game.rules().unit_def(unit.unit_type) else {
            continue;
        };
        let (_, max_range) = def.attack_range;
        if weewar_contracts::hex_grid::distance(unit.coord, coord) <= max_range
            && unit_value_at(game, unit.coord) > own_value
        {
            return true;
        }
    }
    false
}

/// One-ply greedy: simulate every candidate move, score the result, pick
/// the max. `spec.md` §4.7 "Medium".
fn medium(game: &Game, player: i32, weights: Weights, candidates: &[GameMove], deadline: Instant) -> MoveSuggestions {
    let mut suggestions = Vec::with_capacity(candidates.len());
    for mv in candidates {
        if Instant::now() > deadline {
            break;
        }
        let mut next = weewar_simulation::game::clone_for_speculation(game);
        let score = if next.process_move(mv.clone()).is_ok() {
            evaluator::score(&next, player, weights)
        } else {
            f64::MIN
        };
        suggestions.push(MoveSuggestion {
            game_move: mv.clone(),
            score,
        });
    }
    MoveSuggestions { suggestions }
}

/// Depth-2 minimax: this player's move, then the best reply from the
/// next active opponent, ordered by descending estimated unit value so
/// the strongest moves are explored (and can return a best-so-far
/// answer) first. `spec.md` §4.7 "Hard".
fn hard(game: &Game, player: i32, weights: Weights, candidates: &[GameMove], deadline: Instant) -> MoveSuggestions {
    let mut ordered: Vec<GameMove> = candidates.to_vec();
    ordered.sort_by(|a, b| move_order_key(game, b).partial_cmp(&move_order_key(game, a)).unwrap_or(std::cmp::Ordering::Equal));

    let mut suggestions = Vec::with_capacity(ordered.len());
    for mv in &ordered {
        if Instant::now() > deadline {
            break;
        }
        let mut next = weewar_simulation::game::clone_for_speculation(game);
        if next.process_move(mv.clone()).is_err() {
            suggestions.push(MoveSuggestion { game_move: mv.clone(), score: f64::MIN });
            continue;
        }
        let opponent = next.get_current_player();
        let reply_candidates = moves_gen::legal_moves(&next, opponent);
        let opponent_best = reply_candidates
            .iter()
            .filter_map(|reply| {
                let mut after_reply = weewar_simulation::game::clone_for_speculation(&next);
                after_reply.process_move(reply.clone()).ok()?;
                Some(evaluator::score(&after_reply, opponent, weights))
            })
            .fold(f64::MIN, f64::max);
        let my_score = evaluator::score(&next, player, weights);
        let opponent_best = if opponent_best == f64::MIN { 0.0 } else { opponent_best };
        suggestions.push(MoveSuggestion {
            game_move: mv.clone(),
            score: my_score - opponent_best,
        });
    }
    MoveSuggestions { suggestions }
}

fn move_order_key(game: &Game, mv: &GameMove) -> f64 {
    match mv {
        GameMove::AttackUnit { defender, .. } => {
            let coord = weewar_contracts::hex_grid::AxialCoord::new(defender.q, defender.r);
            unit_value_at(game, coord)
        }
        GameMove::CaptureBuilding { .. } => 10.0,
        _ => 0.0,
    }
}

/// Alpha-beta over the same depth-2 tree `hard` searches, with
/// principal-variation move ordering (the previous best move first) and
/// a transposition table keyed by a hash of the resulting position.
/// `spec.md` §4.7 "Expert".
fn expert(game: &Game, player: i32, weights: Weights, candidates: &[GameMove], deadline: Instant) -> MoveSuggestions {
    let mut transposition: HashMap<u64, f64> = HashMap::new();
    let mut ordered: Vec<GameMove> = candidates.to_vec();
    ordered.sort_by(|a, b| move_order_key(game, b).partial_cmp(&move_order_key(game, a)).unwrap_or(std::cmp::Ordering::Equal));

    let mut suggestions = Vec::with_capacity(ordered.len());
    let mut alpha = f64::MIN;
    for mv in &ordered {
        if Instant::now() > deadline {
            break;
        }
        let mut next = weewar_simulation::game::clone_for_speculation(game);
        if next.process_move(mv.clone()).is_err() {
            suggestions.push(MoveSuggestion { game_move: mv.clone(), score: f64::MIN });
            continue;
        }
        let key = position_hash(&next);
        let value = if let Some(&cached) = transposition.get(&key) {
            cached
        } else {
            let opponent = next.get_current_player();
            let reply_candidates = moves_gen::legal_moves(&next, opponent);
            let mut beta = f64::MAX;
            let mut best_reply = f64::MIN;
            for reply in &reply_candidates {
                let mut after_reply = weewar_simulation::game::clone_for_speculation(&next);
                if after_reply.process_move(reply.clone()).is_err() {
                    continue;
                }
                let reply_score = evaluator::score(&after_reply, opponent, weights);
                best_reply = best_reply.max(reply_score);
                beta = beta.min(-best_reply);
                if beta <= alpha {
                    break;
                }
            }
            let best_reply = if best_reply == f64::MIN { 0.0 } else { best_reply };
            let value = evaluator::score(&next, player, weights) - best_reply;
            transposition.insert(key, value);
            value
        };
        alpha = alpha.max(value);
        suggestions.push(MoveSuggestion {
            game_move: mv.clone(),
            score: value,
        });
    }
    MoveSuggestions { suggestions }
}

/// A coarse hash of a position: every unit's coordinate, type, owner,
/// and health, plus whose turn it is. Collisions only cost a cache miss.
fn position_hash(game: &Game) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    game.get_current_player().hash(&mut hasher);
    let mut units = game.world().units_by_coord();
    units.sort_by_key(|u| (u.coord.q, u.coord.r));
    for unit in units {
        unit.coord.q.hash(&mut hasher);
        unit.coord.r.hash(&mut hasher);
        unit.player.hash(&mut hasher);
        unit.unit_type.hash(&mut hasher);
        unit.available_health.hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use weewar_contracts::hex_grid::AxialCoord;
    use weewar_contracts::rules_data::RulesDocument;
    use weewar_contracts::tile::{nature, Tile};
    use weewar_rules_engine::RulesEngine;
    use weewar_simulation::GameConfig;
    use weewar_world::World;

    fn empty_game() -> Game {
        let mut world = World::new();
        world.add_tile(Tile::new(AxialCoord::new(0, 0), nature::GRASS));
        let rules = RulesEngine::load(&RulesDocument::default()).unwrap();
        let mut config = GameConfig::default();
        config.player_count = 2;
        Game::new(world, rules, 3, config).unwrap()
    }

    #[test]
    fn suggest_moves_falls_back_to_end_turn_with_no_units() {
        let game = empty_game();
        let suggestions = suggest_moves(&game, 1, AdvisorOptions::default());
        assert_eq!(suggestions.suggestions.len(), 1);
        assert!(matches!(suggestions.suggestions[0].game_move, GameMove::EndTurn));
    }

    #[test]
    fn every_tier_returns_at_least_one_suggestion_with_no_units() {
        for tier in [StrategyTier::Easy, StrategyTier::Medium, StrategyTier::Hard, StrategyTier::Expert] {
            let game = empty_game();
            let options = AdvisorOptions {
                tier,
                ..AdvisorOptions::default()
            };
            let suggestions = suggest_moves(&game, 1, options);
            assert!(!suggestions.suggestions.is_empty());
        }
    }
}
