//! Wire-format loaders for rules documents, world saves, and game saves,
//! plus the `SaveHandler` collaborator interface. `spec.md` §6:
//! "Memory, file, and browser variants are out-of-scope implementation
//! details; the core only consumes the interface" — so this crate
//! defines that interface and the format/migration logic behind it, and
//! stops there. No concrete backend lives here.

pub mod error;
pub mod game_save;
pub mod rules_loader;
pub mod save_handler;
pub mod world_save;

pub use error::PersistenceError;
pub use save_handler::SaveHandler;
