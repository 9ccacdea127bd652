//! Actor handles.
//!
//! Actors never hold references to each other. Tickle registrations,
//! notifications and sibling links all name an actor by its [`ActorId`] and
//! the world resolves it when the actor is needed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle of an actor within one session. Ids start at 1 and are not reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Actor({})", self.0)
    }
}

/// Hands out actor ids in spawn order.
#[derive(Debug, Default)]
pub struct ActorAllocator {
    last: u32,
}

impl ActorAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The next unused id.
    pub fn allocate(&mut self) -> ActorId {
        self.last += 1;
        ActorId(self.last)
    }
}
