//! Per-call context handed to actors.

use isle_state::GameState;
use isle_tickle::TickleManager;

use crate::animation::AnimationManager;
use crate::id::ActorId;
use crate::notification::{Notification, NotificationQueue};
use crate::world::World;

/// Timing of the frame being processed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Number of frames started so far.
    pub tick: u64,
    /// Seconds since the previous frame.
    pub dt: f32,
    /// Seconds since the session started.
    pub elapsed: f32,
}

/// Everything an actor may touch while one of its hooks runs.
///
/// The actor itself is detached from `world` for the duration of the call,
/// so `world.find` does not return the caller.
pub struct ActorContext<'a> {
    pub world: &'a World,
    pub tickle: &'a mut TickleManager<ActorId>,
    pub game_state: &'a mut GameState,
    pub animations: &'a mut dyn AnimationManager,
    pub notifications: &'a mut NotificationQueue,
    pub frame: FrameTime,
}

impl ActorContext<'_> {
    /// Queue a notification for the next dispatch pass.
    pub fn post(&mut self, notification: Notification) {
        self.notifications.post(notification);
    }
}
