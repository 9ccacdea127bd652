//! Pizza delivery mission state.
//!
//! The record keeps one [`MissionEntry`] per playable character in a fixed
//! array of [`MISSION_CAPACITY`] slots. The array layout is what lands in the
//! save file, so the capacity and field order are part of the format.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StateError;
use crate::file::StateFile;
use crate::record::{StateClass, StateRecord, StateType};

/// Number of entries in a mission record.
pub const MISSION_CAPACITY: usize = 5;

/// Serialized width of one [`MissionEntry`] in bytes.
pub const ENTRY_WIDTH: usize = 12;

/// Per-character mission progress.
///
/// Save layout, in order: `id:u8 color:u8 attempts:u16 score:i16
/// high_score:i16 timer:u32`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionEntry {
    /// Actor id of the character this entry tracks.
    pub id: u8,
    /// Score colour shown on the info board.
    pub color: u8,
    pub attempts: u16,
    pub score: i16,
    pub high_score: i16,
    /// Mission clock; [`MissionEntry::TIMER_UNSET`] when no run is active.
    pub timer: u32,
}

impl MissionEntry {
    /// Timer value of an entry with no run in progress.
    pub const TIMER_UNSET: u32 = 0x8000_0000;

    /// A fresh entry for the given actor id.
    #[must_use]
    pub fn new(id: u8) -> Self {
        Self {
            id,
            timer: Self::TIMER_UNSET,
            ..Self::default()
        }
    }

    fn read_from(file: &mut StateFile) -> Result<Self, StateError> {
        Ok(Self {
            id: file.read_u8()?,
            color: file.read_u8()?,
            attempts: file.read_u16()?,
            score: file.read_i16()?,
            high_score: file.read_i16()?,
            timer: file.read_u32()?,
        })
    }

    fn write_to(&self, file: &mut StateFile) -> Result<(), StateError> {
        file.write_u8(self.id)?;
        file.write_u8(self.color)?;
        file.write_u16(self.attempts)?;
        file.write_i16(self.score)?;
        file.write_i16(self.high_score)?;
        file.write_u32(self.timer)
    }
}

/// Mission progress for the pizza delivery game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PizzaMissionState {
    /// Whether a delivery run is in progress. Runtime only.
    pub active: bool,
    entries: [MissionEntry; MISSION_CAPACITY],
}

impl PizzaMissionState {
    /// Actor ids of the five playable characters, in slot order.
    pub const ACTOR_IDS: [u8; MISSION_CAPACITY] = [1, 2, 3, 4, 5];

    /// Build a record from explicit entries.
    #[must_use]
    pub fn from_entries(entries: [MissionEntry; MISSION_CAPACITY]) -> Self {
        Self {
            active: false,
            entries,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[MissionEntry; MISSION_CAPACITY] {
        &self.entries
    }

    /// Slot index of the entry for `id`, scanning the fixed capacity.
    #[must_use]
    pub fn entry_index(&self, id: u8) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    /// Entry for actor `id`, or `None` if no slot carries that id.
    #[must_use]
    pub fn entry(&self, id: u8) -> Option<&MissionEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entry_mut(&mut self, id: u8) -> Option<&mut MissionEntry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    /// Entry at a slot index.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&MissionEntry> {
        self.entries.get(index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut MissionEntry> {
        self.entries.get_mut(index)
    }

    /// Read or write the entry array, depending on the stream mode.
    ///
    /// On read, an entry is only decoded if a full [`ENTRY_WIDTH`] bytes
    /// remain. Otherwise that entry and every later one are zeroed and
    /// [`StateError::TruncatedStream`] is returned.
    pub fn transfer(&mut self, file: &mut StateFile) -> Result<(), StateError> {
        if file.is_write_mode() {
            for entry in &self.entries {
                entry.write_to(file)?;
            }
            return Ok(());
        }

        for index in 0..MISSION_CAPACITY {
            if file.remaining() < ENTRY_WIDTH {
                self.entries[index..].fill(MissionEntry::default());
                warn!(
                    record = Self::CLASS.name(),
                    entries_read = index,
                    remaining = file.remaining(),
                    "mission record truncated, zeroing remaining entries"
                );
                return Err(StateError::TruncatedStream {
                    record: Self::CLASS.name(),
                    entries_read: index,
                    expected: MISSION_CAPACITY,
                });
            }
            self.entries[index] = MissionEntry::read_from(file)?;
        }
        Ok(())
    }
}

impl Default for PizzaMissionState {
    fn default() -> Self {
        Self::from_entries(Self::ACTOR_IDS.map(MissionEntry::new))
    }
}

impl StateType for PizzaMissionState {
    const CLASS: StateClass = StateClass::PizzaMission;

    fn from_record(record: &StateRecord) -> Option<&Self> {
        match record {
            StateRecord::PizzaMission(state) => Some(state),
            _ => None,
        }
    }

    fn from_record_mut(record: &mut StateRecord) -> Option<&mut Self> {
        match record {
            StateRecord::PizzaMission(state) => Some(state),
            _ => None,
        }
    }

    fn into_record(self) -> StateRecord {
        StateRecord::PizzaMission(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> PizzaMissionState {
        let mut entries = [MissionEntry::default(); MISSION_CAPACITY];
        for (i, entry) in entries.iter_mut().enumerate() {
            let i = i as u8;
            *entry = MissionEntry {
                id: 10 + i,
                color: i,
                attempts: 300 + u16::from(i),
                score: -5 + i16::from(i),
                high_score: i16::MAX - i16::from(i),
                timer: 0xdead_0000 | u32::from(i),
            };
        }
        PizzaMissionState::from_entries(entries)
    }

    #[test]
    fn test_default_has_one_entry_per_actor() {
        let state = PizzaMissionState::default();
        for id in PizzaMissionState::ACTOR_IDS {
            let entry = state.entry(id).unwrap();
            assert_eq!(entry.timer, MissionEntry::TIMER_UNSET);
        }
    }

    #[test]
    fn test_lookup_miss_returns_none() {
        let state = PizzaMissionState::default();
        assert!(state.entry(0).is_none());
        assert!(state.entry(6).is_none());
        assert!(state.entry(u8::MAX).is_none());
        assert!(state.slot(MISSION_CAPACITY).is_none());
    }

    #[test]
    fn test_entry_mut_updates_slot() {
        let mut state = PizzaMissionState::default();
        state.entry_mut(3).unwrap().score = 42;
        assert_eq!(state.entry_index(3), Some(2));
        assert_eq!(state.slot(2).unwrap().score, 42);
    }

    #[test]
    fn test_write_then_read_is_identical() {
        let mut original = populated();
        let mut file = StateFile::writer();
        original.transfer(&mut file).unwrap();
        assert_eq!(file.as_bytes().len(), MISSION_CAPACITY * ENTRY_WIDTH);

        let mut restored = PizzaMissionState::default();
        let mut file = StateFile::reader(file.into_bytes());
        restored.transfer(&mut file).unwrap();
        assert_eq!(restored.entries(), original.entries());
    }

    #[test]
    fn test_truncated_stream_zeroes_remainder() {
        let mut original = populated();
        let mut file = StateFile::writer();
        original.transfer(&mut file).unwrap();

        // Two full entries plus half of the third.
        let mut bytes = file.into_bytes();
        bytes.truncate(2 * ENTRY_WIDTH + ENTRY_WIDTH / 2);

        let mut restored = PizzaMissionState::default();
        let mut file = StateFile::reader(bytes);
        match restored.transfer(&mut file) {
            Err(StateError::TruncatedStream {
                entries_read,
                expected,
                ..
            }) => {
                assert_eq!(entries_read, 2);
                assert_eq!(expected, MISSION_CAPACITY);
            }
            other => panic!("expected TruncatedStream, got {other:?}"),
        }

        assert_eq!(restored.entries()[..2], original.entries()[..2]);
        for entry in &restored.entries()[2..] {
            assert_eq!(*entry, MissionEntry::default());
        }
    }

    #[test]
    fn test_boundary_values_survive_the_codec() {
        let mut original = PizzaMissionState::from_entries([
            MissionEntry {
                id: 0,
                color: 0,
                attempts: 0,
                score: 0,
                high_score: 0,
                timer: 0,
            },
            MissionEntry {
                id: u8::MAX,
                color: u8::MAX,
                attempts: u16::MAX,
                score: i16::MIN,
                high_score: i16::MAX,
                timer: u32::MAX,
            },
            MissionEntry {
                id: 1,
                color: 0x80,
                attempts: 1,
                score: -1,
                high_score: i16::MIN,
                timer: MissionEntry::TIMER_UNSET,
            },
            MissionEntry {
                id: 0x7f,
                color: 1,
                attempts: 0x8000,
                score: i16::MAX,
                high_score: -1,
                timer: 1,
            },
            MissionEntry::new(5),
        ]);
        let mut file = StateFile::writer();
        original.transfer(&mut file).unwrap();

        let mut restored = PizzaMissionState::default();
        let mut file = StateFile::reader(file.into_bytes());
        restored.transfer(&mut file).unwrap();
        assert_eq!(restored.entries(), original.entries());
    }

    #[test]
    fn test_exact_length_consumes_the_stream() {
        let mut original = populated();
        let mut file = StateFile::writer();
        original.transfer(&mut file).unwrap();

        let mut file = StateFile::reader(file.into_bytes());
        assert_eq!(file.remaining(), MISSION_CAPACITY * ENTRY_WIDTH);
        let mut restored = PizzaMissionState::default();
        restored.transfer(&mut file).unwrap();
        assert_eq!(file.remaining(), 0);
        assert_eq!(restored.entries(), original.entries());
    }

    #[test]
    fn test_one_byte_short_loses_the_last_entry() {
        let mut original = populated();
        let mut file = StateFile::writer();
        original.transfer(&mut file).unwrap();

        let mut bytes = file.into_bytes();
        bytes.truncate(MISSION_CAPACITY * ENTRY_WIDTH - 1);

        let mut restored = PizzaMissionState::default();
        let mut file = StateFile::reader(bytes);
        assert!(matches!(
            restored.transfer(&mut file),
            Err(StateError::TruncatedStream { entries_read: 4, .. })
        ));
        assert_eq!(restored.entries()[..4], original.entries()[..4]);
        assert_eq!(restored.entries()[4], MissionEntry::default());
        assert_eq!(file.remaining(), ENTRY_WIDTH - 1);
    }

    #[test]
    fn test_empty_stream_zeroes_everything() {
        let mut state = populated();
        let mut file = StateFile::reader(Vec::new());
        assert!(state.transfer(&mut file).is_err());
        assert!(state.entries().iter().all(|e| *e == MissionEntry::default()));
    }

    #[test]
    fn test_json_view() {
        let state = PizzaMissionState::default();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["entries"].as_array().unwrap().len(), MISSION_CAPACITY);
    }
}
