//! The [`Actor`] trait and the fields every actor shares.
//!
//! Event hooks default to [`EventResult::Unhandled`]; concrete actors
//! override the ones they care about.

use std::any::Any;

use isle_math::LocalToWorld;

use crate::class::ActorClass;
use crate::context::ActorContext;
use crate::error::ActorError;
use crate::id::ActorId;
use crate::notification::{ControlEvent, EndActionParam, EndAnimParam, PathEventParam};
use crate::script::ActionDescriptor;

/// Outcome of an event hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[must_use]
pub enum EventResult {
    /// The actor declined the event. Not an error.
    #[default]
    Unhandled,
    /// The actor reacted to the event.
    Consumed,
}

impl EventResult {
    #[must_use]
    pub fn is_consumed(self) -> bool {
        self == Self::Consumed
    }
}

/// Identity and placement shared by all actors.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorBase {
    pub id: ActorId,
    /// Scripted name, unique within its container.
    pub name: String,
    /// Script container the actor was created from.
    pub container: String,
    /// Object id of the creating action.
    pub object_id: u32,
    pub transform: LocalToWorld,
}

impl ActorBase {
    #[must_use]
    pub fn new(id: ActorId, action: &ActionDescriptor) -> Self {
        Self {
            id,
            name: action.name.clone(),
            container: action.container.clone(),
            object_id: action.object_id,
            transform: LocalToWorld::IDENTITY,
        }
    }
}

/// A polymorphic world entity.
pub trait Actor: std::fmt::Debug {
    fn base(&self) -> &ActorBase;

    fn class(&self) -> ActorClass;

    fn id(&self) -> ActorId {
        self.base().id
    }

    fn name(&self) -> &str {
        &self.base().name
    }

    fn transform(&self) -> &LocalToWorld {
        &self.base().transform
    }

    /// Returns `true` if this actor's class is `class` or derives from it.
    fn is_a(&self, class: ActorClass) -> bool {
        self.class().is_a(class)
    }

    /// Bind the actor to the world described by `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Creation`] if placement data is missing.
    fn create(
        &mut self,
        action: &ActionDescriptor,
        ctx: &mut ActorContext<'_>,
    ) -> Result<(), ActorError>;

    /// Per-frame update, called while the actor is registered for tickles.
    fn tickle(&mut self, _ctx: &mut ActorContext<'_>) -> Result<(), ActorError> {
        Ok(())
    }

    fn handle_click(&mut self, _ctx: &mut ActorContext<'_>) -> EventResult {
        EventResult::Unhandled
    }

    fn handle_control_event(
        &mut self,
        _event: &ControlEvent,
        _ctx: &mut ActorContext<'_>,
    ) -> EventResult {
        EventResult::Unhandled
    }

    /// Must return [`EventResult::Unhandled`], without side effects, for an
    /// animation the actor did not start.
    fn handle_animation_end(
        &mut self,
        _param: &EndAnimParam,
        _ctx: &mut ActorContext<'_>,
    ) -> EventResult {
        EventResult::Unhandled
    }

    fn handle_path_event(
        &mut self,
        _param: &PathEventParam,
        _ctx: &mut ActorContext<'_>,
    ) -> EventResult {
        EventResult::Unhandled
    }

    fn handle_end_action(
        &mut self,
        _param: &EndActionParam,
        _ctx: &mut ActorContext<'_>,
    ) -> EventResult {
        EventResult::Unhandled
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
