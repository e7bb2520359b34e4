//! The top-level aggregate. `spec.md` §4.6 "Game (C6)".

use std::collections::HashMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use weewar_contracts::error::WeewarError;
use weewar_contracts::hex_grid::AxialCoord;
use weewar_contracts::moves::{GameMove, PlayerState, ProcessedMove};
use weewar_contracts::save::GameStatus;
use weewar_contracts::unit::Unit;
use weewar_rules_engine::RulesEngine;
use weewar_world::World;

use crate::config::GameConfig;
use crate::move_processor;
use crate::turn_engine::{self, TurnContext};

/// Owns `World`, `RulesEngine`, the seeded RNG, and per-player state.
/// `process_move` is the only public mutator (`spec.md` §4.6).
pub struct Game {
    id: Uuid,
    seed: u64,
    world: World,
    rules: RulesEngine,
    rng: ChaCha8Rng,
    current_player: i32,
    turn_counter: i32,
    status: GameStatus,
    player_states: HashMap<i32, PlayerState>,
    winner: Option<i32>,
    config: GameConfig,
}

impl Game {
    /// # Errors
    /// Never fails today; kept fallible so a future rules-validation pass
    /// (e.g. checking `config.player_count` against `player_states`) can
    /// return an error without breaking callers.
    pub fn new(world: World, rules: RulesEngine, seed: u64, config: GameConfig) -> Result<Self, WeewarError> {
        let mut player_states = HashMap::new();
        for player in 1..=config.player_count.max(1) {
            player_states.insert(player, PlayerState::new());
        }
        Ok(Self {
            id: Uuid::new_v4(),
            seed,
            world,
            rules,
            rng: ChaCha8Rng::seed_from_u64(seed),
            current_player: 1,
            turn_counter: 1,
            status: GameStatus::Playing,
            player_states,
            winner: None,
            config,
        })
    }

    /// The single public mutator. Dispatches `EndTurn` to the turn engine
    /// and everything else to the move processor, then runs the victory
    /// check. `spec.md` §4.4 steps 1-7.
    ///
    /// # Errors
    /// Whatever the underlying move-processor or turn-engine validation
    /// step rejects; on error `self` is left exactly as it was.
    pub fn process_move(&mut self, game_move: GameMove) -> Result<ProcessedMove, WeewarError> {
        if self.status == GameStatus::Ended {
            return Err(WeewarError::ActionNotAllowed {
                action: "process_move".to_string(),
                step: -1,
            });
        }

        let changes = match &game_move {
            GameMove::EndTurn => turn_engine::end_turn(TurnContext {
                world: &mut self.world,
                engine: &self.rules,
                income_config: &self.config.income_config,
                player_states: &mut self.player_states,
                current_player: &mut self.current_player,
                turn_counter: &mut self.turn_counter,
            }),
            other => move_processor::apply(
                &mut self.world,
                &self.rules,
                &mut self.rng,
                &self.config.settings,
                self.current_player,
                other,
            )?,
        };

        if let Some(winner) = turn_engine::check_victory(&self.world, &self.player_states) {
            self.status = GameStatus::Ended;
            self.winner = Some(winner);
        }

        Ok(ProcessedMove { game_move, changes })
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[must_use]
    pub fn rules(&self) -> &RulesEngine {
        &self.rules
    }

    #[must_use]
    pub fn get_current_player(&self) -> i32 {
        self.current_player
    }

    #[must_use]
    pub fn get_turn_number(&self) -> i32 {
        self.turn_counter
    }

    #[must_use]
    pub fn get_status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn get_winner(&self) -> Option<i32> {
        self.winner
    }

    #[must_use]
    pub fn get_units_for_player(&self, player: i32) -> Vec<Unit> {
        self.world.player_units(player).cloned().collect()
    }

    #[must_use]
    pub fn get_unit_at(&self, coord: AxialCoord) -> Option<Unit> {
        self.world.unit_at(coord).cloned()
    }

    #[must_use]
    pub fn player_states(&self) -> &HashMap<i32, PlayerState> {
        &self.player_states
    }
}

/// Produces an independent clone of `game`, including an RNG reseeded
/// from the clone point (re-derived deterministically from the current
/// RNG stream rather than the original seed, so repeated clones of the
/// same game diverge from one another). `spec.md` §5 "Shared resource
/// policy": cloning is explicit and never aliases the original's RNG.
#[must_use]
pub fn clone_for_speculation(game: &Game) -> Game {
    let mut rng_source = game.rng.clone();
    let reseed = rand::RngCore::next_u64(&mut rng_source);
    Game {
        id: Uuid::new_v4(),
        seed: game.seed,
        world: game.world.clone(),
        rules: game.rules.clone(),
        rng: ChaCha8Rng::seed_from_u64(reseed),
        current_player: game.current_player,
        turn_counter: game.turn_counter,
        status: game.status,
        player_states: game.player_states.clone(),
        winner: game.winner,
        config: game.config.clone(),
    }
}
