//! State classes and the record sum type.
//!
//! Records are a closed set, so the class tag is an enum rather than a
//! string compared at run time. [`StateClass::name`] gives the stable key
//! used by the registry and written into save files.

use serde::{Deserialize, Serialize};

use crate::act::{Act1State, HelicopterState};
use crate::error::StateError;
use crate::file::StateFile;
use crate::mission::PizzaMissionState;

/// Tag identifying a kind of state record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateClass {
    PizzaMission,
    Act1,
    Helicopter,
}

impl StateClass {
    pub const ALL: [StateClass; 3] = [Self::PizzaMission, Self::Act1, Self::Helicopter];

    /// Registry key and save-file name of the class.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PizzaMission => "PizzaMissionState",
            Self::Act1 => "Act1State",
            Self::Helicopter => "HelicopterState",
        }
    }

    /// Look up a class by its registry key.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.name() == name)
    }

    /// Whether records of this class are written to save files.
    #[must_use]
    pub const fn is_serializable(self) -> bool {
        !matches!(self, Self::Helicopter)
    }
}

/// A state record owned by the [`StateRegistry`](crate::StateRegistry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateRecord {
    PizzaMission(PizzaMissionState),
    Act1(Act1State),
    Helicopter(HelicopterState),
}

impl StateRecord {
    /// A default-initialised record of the given class.
    #[must_use]
    pub fn new(class: StateClass) -> Self {
        match class {
            StateClass::PizzaMission => Self::PizzaMission(PizzaMissionState::default()),
            StateClass::Act1 => Self::Act1(Act1State::default()),
            StateClass::Helicopter => Self::Helicopter(HelicopterState::default()),
        }
    }

    #[must_use]
    pub fn class(&self) -> StateClass {
        match self {
            Self::PizzaMission(_) => StateClass::PizzaMission,
            Self::Act1(_) => StateClass::Act1,
            Self::Helicopter(_) => StateClass::Helicopter,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.class().name()
    }

    /// Read or write the record payload, depending on the stream mode.
    pub fn transfer(&mut self, file: &mut StateFile) -> Result<(), StateError> {
        match self {
            Self::PizzaMission(state) => state.transfer(file),
            Self::Act1(state) => state.transfer(file),
            Self::Helicopter(_) => Ok(()),
        }
    }
}

/// Typed access to one variant of [`StateRecord`].
pub trait StateType: Default + Sized {
    /// The class tag of this record type.
    const CLASS: StateClass;

    fn from_record(record: &StateRecord) -> Option<&Self>;

    fn from_record_mut(record: &mut StateRecord) -> Option<&mut Self>;

    fn into_record(self) -> StateRecord;
}
