//! # isle_state
//!
//! Persistent game state for the isle runtime.
//!
//! This crate provides:
//!
//! - [`file`] — [`StateFile`], the fixed-layout binary save stream.
//! - [`record`] — [`StateClass`] tags and the [`StateRecord`] sum type.
//! - [`mission`] — [`PizzaMissionState`] and its fixed-capacity entries.
//! - [`act`] — act-wide and vehicle state records.
//! - [`registry`] — [`StateRegistry`], the keyed owner of all records.
//! - [`game_state`] — [`GameState`], the session-scoped facade and save container.
//! - [`error`] — state-layer error types.

pub mod act;
pub mod error;
pub mod file;
pub mod game_state;
pub mod mission;
pub mod record;
pub mod registry;

pub use act::{Act1State, HelicopterPhase, HelicopterState};
pub use error::StateError;
pub use file::{FileMode, StateFile};
pub use game_state::{GameState, SAVE_VERSION};
pub use mission::{MissionEntry, PizzaMissionState, ENTRY_WIDTH, MISSION_CAPACITY};
pub use record::{StateClass, StateRecord, StateType};
pub use registry::StateRegistry;
