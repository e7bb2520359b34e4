//! The optional advisory layer ("C7") that suggests moves for a player
//! without mutating `Game`. See `spec.md` §4.7 "AIAdvisor (C7, optional)".

pub mod evaluator;
pub mod moves_gen;
pub mod strategy;

pub use evaluator::{Personality, Weights};
pub use strategy::{suggest_moves, AdvisorOptions, MoveSuggestion, MoveSuggestions, StrategyTier};

use weewar_simulation::Game;

/// Stateless facade over [`strategy::suggest_moves`]. Holding a value is
/// never required; it exists so callers have a name to import and to
/// leave room for a future strategy tier to carry its own cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct AIAdvisor;

impl AIAdvisor {
    #[must_use]
    pub fn suggest_moves(&self, game: &Game, player: i32, options: AdvisorOptions) -> MoveSuggestions {
        suggest_moves(game, player, options)
    }
}
