//! The `SaveHandler` collaborator interface. `spec.md` §6 names this as
//! an external collaborator: "Memory, file, and browser variants are
//! out-of-scope implementation details; the core only consumes the
//! interface." This module defines that interface only — no backend
//! implements it here.

use crate::error::PersistenceError;

/// A content-addressed or name-addressed blob store. `id` is opaque to
/// the core; callers that need a human-readable name encode it into the
/// bytes they save (e.g. `WorldSaveFile.name`).
pub trait SaveHandler {
    fn save(&mut self, bytes: Vec<u8>) -> Result<String, PersistenceError>;
    fn load(&self, id: &str) -> Result<Vec<u8>, PersistenceError>;
    fn list(&self) -> Result<Vec<String>, PersistenceError>;
    fn delete(&mut self, id: &str) -> Result<(), PersistenceError>;
}
