//! Session-scoped game state and the save-game container.
//!
//! [`GameState`] bundles the state registry with the handful of session
//! values actors read (current actor id, music flag). Save layout:
//!
//! ```text
//! version:i32  actor_id:u8  record_count:i16
//! record_count × { name:string  payload }
//! ```
//!
//! Only serializable records are written, in registry order.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::StateError;
use crate::file::StateFile;
use crate::record::{StateClass, StateRecord};
use crate::registry::StateRegistry;

/// Save format version written at the start of every save file.
pub const SAVE_VERSION: i32 = 0x1000;

/// Game-state facade shared by all actors of a session.
#[derive(Debug)]
pub struct GameState {
    /// Actor id of the character the player is controlling.
    actor_id: u8,
    /// Whether the island background music may play.
    music_enabled: bool,
    registry: StateRegistry,
}

impl GameState {
    /// Fresh state: actor 1, music on, no records.
    #[must_use]
    pub fn new() -> Self {
        Self {
            actor_id: 1,
            music_enabled: true,
            registry: StateRegistry::new(),
        }
    }

    /// Actor id of the active character.
    #[must_use]
    pub fn actor_id(&self) -> u8 {
        self.actor_id
    }

    /// Switch the active character.
    pub fn set_actor_id(&mut self, actor_id: u8) {
        self.actor_id = actor_id;
    }

    /// Whether background music may play.
    #[must_use]
    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }

    /// Turn background music on or off.
    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = enabled;
    }

    /// The session's state records.
    #[must_use]
    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    /// Mutable access to the session's state records.
    pub fn registry_mut(&mut self) -> &mut StateRegistry {
        &mut self.registry
    }

    /// Write the header and every serializable record to `file`.
    pub fn save(&mut self, file: &mut StateFile) -> Result<(), StateError> {
        let count = self
            .registry
            .iter()
            .filter(|r| r.class().is_serializable())
            .count();

        file.write_i32(SAVE_VERSION)?;
        file.write_u8(self.actor_id)?;
        // At most one record per class.
        file.write_i16(count as i16)?;

        for record in self
            .registry
            .iter_mut()
            .filter(|r| r.class().is_serializable())
        {
            file.write_string(record.name())?;
            record.transfer(file)?;
        }

        debug!(records = count, bytes = file.position(), "game state saved");
        Ok(())
    }

    /// Replace the serializable records with the ones stored in `file`.
    ///
    /// Records are decoded into a scratch registry first. Any error leaves
    /// the current state untouched, except [`StateError::TruncatedStream`]:
    /// the partly read record keeps its decoded entries, every serializable
    /// record the file did not reach is reset to its default, the result is
    /// applied and the error is returned so the caller can report it.
    /// Runtime-only records are always kept.
    pub fn load(&mut self, file: &mut StateFile) -> Result<(), StateError> {
        let version = file.read_i32()?;
        if version != SAVE_VERSION {
            return Err(StateError::VersionMismatch {
                expected: SAVE_VERSION,
                found: version,
            });
        }
        let actor_id = file.read_u8()?;
        let count = file.read_i16()?;

        let mut loaded = StateRegistry::new();
        let mut truncated = None;
        for _ in 0..count.max(0) {
            let name = file.read_string()?;
            let class = StateClass::from_name(&name)
                .filter(|class| class.is_serializable())
                .ok_or_else(|| StateError::UnknownState(name.clone()))?;

            if loaded.get_state(class.name()).is_err() {
                loaded.create_state(class.name())?;
            }
            let record = loaded.get_state_mut(class.name())?;
            match record.transfer(file) {
                Ok(()) => {}
                Err(err @ StateError::TruncatedStream { .. }) => {
                    warn!(state = %name, error = %err, "save file truncated");
                    truncated = Some(err);
                    break;
                }
                Err(err) => {
                    warn!(state = %name, error = %err, "failed to read state record");
                    return Err(err);
                }
            }
        }

        if truncated.is_some() {
            for record in self.registry.iter() {
                if record.class().is_serializable() && loaded.get_state(record.name()).is_err() {
                    debug!(state = record.name(), "record missing from save, reset");
                    loaded.insert(StateRecord::new(record.class()));
                }
            }
        }

        self.actor_id = actor_id;
        self.registry.retain(|r| !r.class().is_serializable());
        self.registry.merge(loaded);
        debug!(records = count, actor_id, "game state loaded");

        match truncated {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Save to a file on disk.
    pub fn save_to_path(&mut self, path: impl AsRef<Path>) -> Result<(), StateError> {
        let mut file = StateFile::writer();
        self.save(&mut file)?;
        file.save(&path)?;
        info!(path = %path.as_ref().display(), "saved game");
        Ok(())
    }

    /// Load from a file on disk.
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<(), StateError> {
        let mut file = StateFile::open(&path)?;
        self.load(&mut file)?;
        info!(path = %path.as_ref().display(), "loaded game");
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::act::{Act1State, HelicopterState};
    use crate::mission::{MissionEntry, PizzaMissionState, ENTRY_WIDTH};

    use super::*;

    fn populated() -> GameState {
        let mut state = GameState::new();
        state.set_actor_id(4);
        state.registry_mut().get_or_create::<Act1State>().mission = Act1State::PIZZA_MISSION;
        let mission = state.registry_mut().get_or_create::<PizzaMissionState>();
        let entry = mission.entry_mut(4).unwrap();
        entry.score = 3;
        entry.high_score = 7;
        state.registry_mut().get_or_create::<HelicopterState>().boarded = true;
        state
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut original = populated();
        let mut file = StateFile::writer();
        original.save(&mut file).unwrap();

        let mut restored = GameState::new();
        restored.load(&mut StateFile::reader(file.into_bytes())).unwrap();

        assert_eq!(restored.actor_id(), 4);
        assert_eq!(
            restored.registry().get::<Act1State>(),
            original.registry().get::<Act1State>()
        );
        assert_eq!(
            restored.registry().get::<PizzaMissionState>().unwrap().entries(),
            original.registry().get::<PizzaMissionState>().unwrap().entries()
        );
        // Runtime-only records are not written.
        assert!(restored.registry().get::<HelicopterState>().is_none());
    }

    #[test]
    fn test_load_keeps_runtime_records() {
        let mut saved = populated();
        let mut file = StateFile::writer();
        saved.save(&mut file).unwrap();

        let mut live = GameState::new();
        live.registry_mut().get_or_create::<HelicopterState>().boarded = true;
        live.load(&mut StateFile::reader(file.into_bytes())).unwrap();
        assert!(live.registry().get::<HelicopterState>().unwrap().boarded);
    }

    #[test]
    fn test_version_mismatch() {
        let mut file = StateFile::writer();
        file.write_i32(0x0999).unwrap();
        let mut state = GameState::new();
        assert!(matches!(
            state.load(&mut StateFile::reader(file.into_bytes())),
            Err(StateError::VersionMismatch { found: 0x0999, .. })
        ));
    }

    #[test]
    fn test_unknown_record_name() {
        let mut file = StateFile::writer();
        file.write_i32(SAVE_VERSION).unwrap();
        file.write_u8(1).unwrap();
        file.write_i16(1).unwrap();
        file.write_string("JukeBoxState").unwrap();
        let mut state = GameState::new();
        assert!(matches!(
            state.load(&mut StateFile::reader(file.into_bytes())),
            Err(StateError::UnknownState(name)) if name == "JukeBoxState"
        ));
    }

    #[test]
    fn test_truncated_save_reports_and_zero_fills() {
        let mut original = GameState::new();
        original.registry_mut().get_or_create::<PizzaMissionState>();
        let mut file = StateFile::writer();
        original.save(&mut file).unwrap();

        let mut bytes = file.into_bytes();
        bytes.truncate(bytes.len() - 2 * ENTRY_WIDTH);

        let mut restored = GameState::new();
        let result = restored.load(&mut StateFile::reader(bytes));
        assert!(matches!(
            result,
            Err(StateError::TruncatedStream { entries_read: 3, .. })
        ));
        let mission = restored.registry().get::<PizzaMissionState>().unwrap();
        let expected = original.registry().get::<PizzaMissionState>().unwrap();
        assert_eq!(mission.entries()[..3], expected.entries()[..3]);
        assert_eq!(mission.entries()[4], MissionEntry::default());
    }

    #[test]
    fn test_truncated_load_resets_records_not_reached() {
        let mut saved = GameState::new();
        saved.registry_mut().get_or_create::<PizzaMissionState>().entry_mut(2).unwrap().score = 2;
        saved.registry_mut().get_or_create::<Act1State>().mission = Act1State::PIZZA_MISSION;
        let mut file = StateFile::writer();
        saved.save(&mut file).unwrap();

        // Header, the mission record name and three full entries.
        let mut bytes = file.into_bytes();
        bytes.truncate(7 + 2 + "PizzaMissionState".len() + 3 * ENTRY_WIDTH);

        let mut live = populated();
        let result = live.load(&mut StateFile::reader(bytes));
        assert!(matches!(
            result,
            Err(StateError::TruncatedStream { entries_read: 3, .. })
        ));

        assert_eq!(live.actor_id(), 1);
        let mission = live.registry().get::<PizzaMissionState>().unwrap();
        let expected = saved.registry().get::<PizzaMissionState>().unwrap();
        assert_eq!(mission.entries()[..3], expected.entries()[..3]);
        assert_eq!(mission.entries()[4], MissionEntry::default());
        assert_eq!(
            live.registry().get::<Act1State>().unwrap().mission,
            Act1State::NO_MISSION
        );
        assert!(live.registry().get::<HelicopterState>().unwrap().boarded);
    }

    #[test]
    fn test_failed_load_leaves_state_untouched() {
        let mut file = StateFile::writer();
        file.write_i32(SAVE_VERSION).unwrap();
        file.write_u8(2).unwrap();
        file.write_i16(2).unwrap();
        file.write_string("Act1State").unwrap();
        file.write_u32(Act1State::NO_MISSION).unwrap();
        file.write_string("JukeBoxState").unwrap();

        let mut live = populated();
        assert!(live.load(&mut StateFile::reader(file.into_bytes())).is_err());
        assert_eq!(live.actor_id(), 4);
        assert_eq!(
            live.registry().get::<Act1State>().unwrap().mission,
            Act1State::PIZZA_MISSION
        );
        let mission = live.registry().get::<PizzaMissionState>().unwrap();
        assert_eq!(mission.entry(4).unwrap().score, 3);
        assert_eq!(live.registry().len(), 3);
    }
}
