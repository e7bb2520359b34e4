//! The data-driven rules engine: a pure, read-only query service over
//! unit/terrain definition tables. See `spec.md` §4.3 "RulesEngine (C3)".
//!
//! `engine` holds the indexed document and its lookups; `movement` covers
//! terrain cost, Dijkstra reachability, and path validation; `combat`
//! covers attack enumeration, the damage formula, wound bonus, splash,
//! and repair; `loader` parses the wire rules document into `engine`'s
//! indexes.

pub mod combat;
pub mod engine;
pub mod loader;
pub mod movement;

pub use combat::CombatContext;
pub use engine::RulesEngine;
