//! # isle_tickle
//!
//! The tickle scheduler. Clients register a key (usually an actor id) and
//! are called back once per frame pass, in registration order. The
//! scheduler never owns the clients themselves.
//!
//! - [`TickleManager`] — the registered-client list and the pass driver.
//! - [`TickleError`] — scheduler error types.

pub mod error;
pub mod manager;

pub use error::TickleError;
pub use manager::{TickleManager, DEFAULT_INTERVAL};
