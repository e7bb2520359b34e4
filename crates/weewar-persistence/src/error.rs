//! Persistence error type. Mirrors the shape of a RON-backed save format:
//! serialize/deserialize failures plus a version gate.

use std::fmt;

/// Current save format version. Increment when `WorldSaveFile` or
/// `GameSaveFile`'s shape changes in a way older loaders can't read.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug)]
pub enum PersistenceError {
    Serialize(ron::Error),
    Deserialize(ron::error::SpannedError),
    UnsupportedVersion { found: u32, max: u32 },
    NotFound(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialize(e) => write!(f, "serialization error: {e}"),
            Self::Deserialize(e) => write!(f, "deserialization error: {e}"),
            Self::UnsupportedVersion { found, max } => {
                write!(f, "unsupported save format version {found} (max supported: {max})")
            }
            Self::NotFound(id) => write!(f, "no save found for id '{id}'"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<ron::Error> for PersistenceError {
    fn from(e: ron::Error) -> Self {
        Self::Serialize(e)
    }
}

impl From<ron::error::SpannedError> for PersistenceError {
    fn from(e: ron::error::SpannedError) -> Self {
        Self::Deserialize(e)
    }
}
