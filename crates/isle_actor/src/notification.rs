//! Notifications and the dispatch queue.
//!
//! Notifications are queued during a frame and delivered in FIFO order by a
//! dispatch pass. A pass only delivers what was queued before it started:
//! anything a handler posts lands in the next pass, so handlers never
//! recurse into each other within one call.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::actor::{Actor, EventResult};
use crate::animation::AnimationId;
use crate::context::ActorContext;
use crate::id::ActorId;

/// Control-panel buttons the player can press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    Takeoff,
    Land,
    Exit,
}

/// A control-manager event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlEvent {
    pub control: Control,
}

/// What happened on a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathEventKind {
    /// A trigger placed on the path was crossed.
    Trigger(u32),
    /// The end of the path was reached.
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEventParam {
    /// Name of the path the actor is on.
    pub path: String,
    pub kind: PathEventKind,
}

/// A scripted animation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndAnimParam {
    pub animation: AnimationId,
}

/// A scripted action finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndActionParam {
    pub object_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NotificationKind {
    Click,
    Control(ControlEvent),
    PathEvent(PathEventParam),
    AnimationEnd(EndAnimParam),
    EndAction(EndActionParam),
}

/// A notification addressed to one actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub target: ActorId,
    pub kind: NotificationKind,
}

impl Notification {
    #[must_use]
    pub fn click(target: ActorId) -> Self {
        Self {
            target,
            kind: NotificationKind::Click,
        }
    }

    #[must_use]
    pub fn control(target: ActorId, control: Control) -> Self {
        Self {
            target,
            kind: NotificationKind::Control(ControlEvent { control }),
        }
    }

    #[must_use]
    pub fn path_event(target: ActorId, path: impl Into<String>, kind: PathEventKind) -> Self {
        Self {
            target,
            kind: NotificationKind::PathEvent(PathEventParam {
                path: path.into(),
                kind,
            }),
        }
    }

    #[must_use]
    pub fn animation_end(target: ActorId, animation: AnimationId) -> Self {
        Self {
            target,
            kind: NotificationKind::AnimationEnd(EndAnimParam { animation }),
        }
    }

    #[must_use]
    pub fn end_action(target: ActorId, object_id: u32) -> Self {
        Self {
            target,
            kind: NotificationKind::EndAction(EndActionParam { object_id }),
        }
    }

    /// Invoke the handler matching this notification on `actor`, once.
    pub fn deliver(&self, actor: &mut dyn Actor, ctx: &mut ActorContext<'_>) -> EventResult {
        match &self.kind {
            NotificationKind::Click => actor.handle_click(ctx),
            NotificationKind::Control(event) => actor.handle_control_event(event, ctx),
            NotificationKind::PathEvent(param) => actor.handle_path_event(param, ctx),
            NotificationKind::AnimationEnd(param) => actor.handle_animation_end(param, ctx),
            NotificationKind::EndAction(param) => actor.handle_end_action(param, ctx),
        }
    }
}

/// FIFO queue of notifications waiting for the next dispatch pass.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: VecDeque<Notification>,
}

impl NotificationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, notification: Notification) {
        self.pending.push_back(notification);
    }

    /// Take everything queued so far, leaving the queue empty for handlers
    /// to post into.
    pub fn take_pending(&mut self) -> VecDeque<Notification> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.pending.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_pending_is_fifo_and_empties_queue() {
        let mut queue = NotificationQueue::new();
        queue.post(Notification::click(ActorId(1)));
        queue.post(Notification::end_action(ActorId(2), 7));

        let pending = queue.take_pending();
        assert!(queue.is_empty());
        let targets: Vec<_> = pending.iter().map(|n| n.target).collect();
        assert_eq!(targets, vec![ActorId(1), ActorId(2)]);

        queue.post(Notification::control(ActorId(3), Control::Land));
        assert_eq!(queue.len(), 1);
    }
}
