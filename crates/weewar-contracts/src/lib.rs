//! Shared contract types for the engine workspace: hex coordinates, board
//! entities (tiles, crossings, units), the data-driven rules document
//! shapes, the move/world-change wire types, and the common error
//! taxonomy. Each module corresponds to a data shape named in `spec.md`
//! §3 and §6; behavior over these shapes lives in the other crates.

pub mod crossing;
pub mod error;
pub mod hex_grid;
pub mod moves;
pub mod rules_data;
pub mod save;
pub mod tile;
pub mod unit;
