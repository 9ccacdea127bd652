//! Act-wide progress and vehicle state records.

use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::file::StateFile;
use crate::record::{StateClass, StateRecord, StateType};

/// Progress through the first act of the island.
///
/// Save layout: `mission:u32`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Act1State {
    /// Mission currently running on the island, [`Act1State::NO_MISSION`]
    /// when free roaming.
    pub mission: u32,
}

impl Act1State {
    pub const NO_MISSION: u32 = 0;
    pub const PIZZA_MISSION: u32 = 3;

    pub fn transfer(&mut self, file: &mut StateFile) -> Result<(), StateError> {
        if file.is_read_mode() {
            self.mission = file.read_u32()?;
        } else {
            file.write_u32(self.mission)?;
        }
        Ok(())
    }
}

impl StateType for Act1State {
    const CLASS: StateClass = StateClass::Act1;

    fn from_record(record: &StateRecord) -> Option<&Self> {
        match record {
            StateRecord::Act1(state) => Some(state),
            _ => None,
        }
    }

    fn from_record_mut(record: &mut StateRecord) -> Option<&mut Self> {
        match record {
            StateRecord::Act1(state) => Some(state),
            _ => None,
        }
    }

    fn into_record(self) -> StateRecord {
        StateRecord::Act1(self)
    }
}

/// Flight phase of the helicopter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HelicopterPhase {
    #[default]
    Grounded,
    TakingOff,
    Flying,
    Landing,
}

/// Runtime state of the helicopter. Not written to save files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelicopterState {
    pub phase: HelicopterPhase,
    /// Whether the player is inside.
    pub boarded: bool,
}

impl StateType for HelicopterState {
    const CLASS: StateClass = StateClass::Helicopter;

    fn from_record(record: &StateRecord) -> Option<&Self> {
        match record {
            StateRecord::Helicopter(state) => Some(state),
            _ => None,
        }
    }

    fn from_record_mut(record: &mut StateRecord) -> Option<&mut Self> {
        match record {
            StateRecord::Helicopter(state) => Some(state),
            _ => None,
        }
    }

    fn into_record(self) -> StateRecord {
        StateRecord::Helicopter(self)
    }
}
