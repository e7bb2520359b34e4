//! Game save loading. `spec.md` §6 "Game save format": "A save contains
//! no RNG internal state; determinism is recovered by reseeding from
//! `seed` and replaying the move log if one is kept externally." This
//! module only round-trips the `GameSave` shape; replaying a move log is
//! the caller's responsibility.

use weewar_contracts::save::GameSave;

use crate::error::{PersistenceError, FORMAT_VERSION};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GameSaveFile {
    pub format_version: u32,
    pub save: GameSave,
}

impl GameSaveFile {
    #[must_use]
    pub fn new(save: GameSave) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            save,
        }
    }
}

pub fn load_game_save(ron_str: &str) -> Result<GameSave, PersistenceError> {
    let file: GameSaveFile = ron::from_str(ron_str)?;
    if file.format_version > FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: file.format_version,
            max: FORMAT_VERSION,
        });
    }
    Ok(file.save)
}

pub fn save_game_save(save: &GameSave) -> Result<String, PersistenceError> {
    let file = GameSaveFile::new(save.clone());
    Ok(ron::ser::to_string_pretty(&file, ron::ser::PrettyConfig::default())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use weewar_contracts::save::GameStatus;

    #[test]
    fn round_trips_through_ron() {
        let save = GameSave {
            id: "game-1".into(),
            seed: 42,
            turn_counter: 3,
            current_player: 2,
            status: GameStatus::Playing,
            world_id: "world-1".into(),
            player_states: HashMap::new(),
        };
        let encoded = save_game_save(&save).unwrap();
        let decoded = load_game_save(&encoded).unwrap();
        assert_eq!(decoded.id, save.id);
        assert_eq!(decoded.seed, save.seed);
        assert_eq!(decoded.turn_counter, save.turn_counter);
    }

    #[test]
    fn rejects_a_future_format_version() {
        let ron_str = format!(
            "(format_version: {}, save: (id: \"x\", seed: 1, turn_counter: 0, current_player: 1, status: Playing, world_id: \"w\", player_states: {{}}))",
            FORMAT_VERSION + 1
        );
        let err = load_game_save(&ron_str).unwrap_err();
        assert!(matches!(err, PersistenceError::UnsupportedVersion { .. }));
    }
}
