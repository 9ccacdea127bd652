//! Animation manager interface.
//!
//! Animation playback lives outside the runtime core. Actors issue
//! fire-and-forget commands through [`AnimationManager`]; completion comes
//! back later as an animation-end notification posted by the host.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::id::ActorId;

/// Identifier of a scripted animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u32);

/// Commands the runtime core sends to the animation system.
pub trait AnimationManager: std::fmt::Debug {
    /// Start `animation` on `actor`.
    fn play(&mut self, actor: ActorId, animation: AnimationId);

    /// Stop whatever `actor` is playing.
    fn stop(&mut self, actor: ActorId);

    /// Stop every running animation and clear queued ones.
    fn reset(&mut self);

    fn enable_camera_animations(&mut self, enabled: bool);

    /// Toggle background animations of ambient characters.
    fn enable_ambient_animations(&mut self, enabled: bool);
}

/// A command received by [`AnimationLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationCommand {
    Play { actor: ActorId, animation: AnimationId },
    Stop { actor: ActorId },
    Reset,
    CameraAnimations(bool),
    AmbientAnimations(bool),
}

/// An [`AnimationManager`] that records every command it receives.
#[derive(Debug, Default)]
pub struct AnimationLog {
    commands: Vec<AnimationCommand>,
}

impl AnimationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn commands(&self) -> &[AnimationCommand] {
        &self.commands
    }

    /// Remove and return all recorded commands.
    pub fn drain(&mut self) -> Vec<AnimationCommand> {
        std::mem::take(&mut self.commands)
    }

    fn record(&mut self, command: AnimationCommand) {
        trace!(?command, "animation command");
        self.commands.push(command);
    }
}

impl AnimationManager for AnimationLog {
    fn play(&mut self, actor: ActorId, animation: AnimationId) {
        self.record(AnimationCommand::Play { actor, animation });
    }

    fn stop(&mut self, actor: ActorId) {
        self.record(AnimationCommand::Stop { actor });
    }

    fn reset(&mut self) {
        self.record(AnimationCommand::Reset);
    }

    fn enable_camera_animations(&mut self, enabled: bool) {
        self.record(AnimationCommand::CameraAnimations(enabled));
    }

    fn enable_ambient_animations(&mut self, enabled: bool) {
        self.record(AnimationCommand::AmbientAnimations(enabled));
    }
}
