//! State registry — owns every state record for the session.
//!
//! Records are keyed by class name and created lazily: callers look a
//! record up first and create it on a miss. The lookup-then-create pair is
//! not atomic; the registry is only touched from the frame thread.

use tracing::{debug, error};

use crate::error::StateError;
use crate::record::{StateClass, StateRecord, StateType};

/// Registry of all state records, in creation order.
#[derive(Debug, Default)]
pub struct StateRegistry {
    records: Vec<StateRecord>,
}

impl StateRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    fn position(&self, class: StateClass) -> Option<usize> {
        self.records.iter().position(|r| r.class() == class)
    }

    /// Returns the record registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NotFound`] if no such record has been created.
    pub fn get_state(&self, name: &str) -> Result<&StateRecord, StateError> {
        StateClass::from_name(name)
            .and_then(|class| self.position(class))
            .map(|pos| &self.records[pos])
            .ok_or_else(|| StateError::NotFound(name.to_string()))
    }

    /// Mutable variant of [`StateRegistry::get_state`].
    pub fn get_state_mut(&mut self, name: &str) -> Result<&mut StateRecord, StateError> {
        let pos = StateClass::from_name(name)
            .and_then(|class| self.position(class))
            .ok_or_else(|| StateError::NotFound(name.to_string()))?;
        Ok(&mut self.records[pos])
    }

    /// Create and register a default-initialised record for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::UnknownState`] if `name` is not a known class,
    /// and [`StateError::AlreadyExists`] if the record was already created.
    pub fn create_state(&mut self, name: &str) -> Result<&mut StateRecord, StateError> {
        let class =
            StateClass::from_name(name).ok_or_else(|| StateError::UnknownState(name.to_string()))?;
        if self.position(class).is_some() {
            error!(state = name, "state created twice");
            return Err(StateError::AlreadyExists(name.to_string()));
        }

        debug!(state = name, "state created");
        self.records.push(StateRecord::new(class));
        let last = self.records.len() - 1;
        Ok(&mut self.records[last])
    }

    /// Returns the record of type `T`, if created.
    #[must_use]
    pub fn get<T: StateType>(&self) -> Option<&T> {
        self.position(T::CLASS)
            .and_then(|pos| T::from_record(&self.records[pos]))
    }

    /// Mutable variant of [`StateRegistry::get`].
    pub fn get_mut<T: StateType>(&mut self) -> Option<&mut T> {
        let pos = self.position(T::CLASS)?;
        T::from_record_mut(&mut self.records[pos])
    }

    /// Returns the record of type `T`, creating it first if absent.
    pub fn get_or_create<T: StateType>(&mut self) -> &mut T {
        let pos = match self.position(T::CLASS) {
            Some(pos) => pos,
            None => {
                debug!(state = T::CLASS.name(), "state created");
                self.records.push(T::default().into_record());
                self.records.len() - 1
            }
        };
        match T::from_record_mut(&mut self.records[pos]) {
            Some(state) => state,
            None => unreachable!("record at class position has a different variant"),
        }
    }

    /// Insert or replace the record of the same class.
    pub fn insert(&mut self, record: StateRecord) {
        match self.position(record.class()) {
            Some(pos) => self.records[pos] = record,
            None => self.records.push(record),
        }
    }

    /// Move every record of `other` in, replacing records of the same class.
    pub fn merge(&mut self, other: StateRegistry) {
        for record in other.records {
            self.insert(record);
        }
    }

    /// Drop every record for which `keep` returns `false`.
    pub fn retain(&mut self, keep: impl FnMut(&StateRecord) -> bool) {
        self.records.retain(keep);
    }

    /// Returns an iterator over all records in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &StateRecord> {
        self.records.iter()
    }

    /// Returns a mutable iterator over all records in creation order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StateRecord> {
        self.records.iter_mut()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
