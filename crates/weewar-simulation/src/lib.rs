//! Move validation/application, turn progression, and the `Game`
//! aggregate. See `spec.md` §4.4 "MoveProcessor (C4)" through §4.6
//! "Game (C6)".

pub mod action_order;
pub mod config;
pub mod game;
pub mod move_processor;
pub mod turn_engine;

pub use config::{EngineSettings, GameConfig, IncomeConfig};
pub use game::Game;
