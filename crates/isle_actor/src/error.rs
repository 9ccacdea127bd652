//! Actor-layer error types.

use isle_state::StateError;

use crate::id::ActorId;

/// Errors that can occur while creating or running actors.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    /// The world lacks data the actor needs to bind itself.
    #[error("failed to create actor {name:?}: {reason}")]
    Creation {
        /// Scripted name of the actor.
        name: String,
        /// What was missing.
        reason: String,
    },

    /// No live actor has this id.
    #[error("unknown actor {0}")]
    UnknownActor(ActorId),

    /// The actor exists but is not of the requested type.
    #[error("{actor} is not a {expected}")]
    WrongClass {
        actor: ActorId,
        expected: &'static str,
    },

    /// No path with this name is registered in the world.
    #[error("unknown path {0:?}")]
    UnknownPath(String),

    /// Path data cannot be followed.
    #[error("invalid path {name:?}: {reason}")]
    InvalidPath { name: String, reason: String },

    /// The mission record has no slot for this actor id.
    #[error("no mission entry for actor id {0}")]
    MissingEntry(u8),

    /// A state lookup or save-file operation failed.
    #[error(transparent)]
    State(#[from] StateError),

    /// Failed to encode a script to MessagePack.
    #[error("failed to encode script: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Failed to decode a script from MessagePack.
    #[error("failed to decode script: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// Failed to parse a JSON script.
    #[error("failed to parse script: {0}")]
    Json(#[from] serde_json::Error),
}

impl ActorError {
    pub(crate) fn creation(name: &str, reason: impl Into<String>) -> Self {
        Self::Creation {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
