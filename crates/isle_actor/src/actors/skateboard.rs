//! The skateboard: a plain path actor.

use std::any::Any;

use tracing::debug;

use crate::actor::{Actor, ActorBase, EventResult};
use crate::class::ActorClass;
use crate::context::ActorContext;
use crate::error::ActorError;
use crate::id::ActorId;
use crate::path::{PathActor, PathProgress};
use crate::script::ActionDescriptor;

/// Rides its scripted path once per click, using the default path hooks.
#[derive(Debug, Clone)]
pub struct SkateBoard {
    path: PathActor,
    /// Path ridden when clicked.
    route: Option<String>,
}

impl SkateBoard {
    #[must_use]
    pub fn new(id: ActorId, action: &ActionDescriptor) -> Self {
        Self {
            path: PathActor::new(id, action),
            route: action.path.clone(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &PathActor {
        &self.path
    }
}

impl Actor for SkateBoard {
    fn base(&self) -> &ActorBase {
        &self.path.base
    }

    fn class(&self) -> ActorClass {
        ActorClass::SkateBoard
    }

    fn create(
        &mut self,
        action: &ActionDescriptor,
        ctx: &mut ActorContext<'_>,
    ) -> Result<(), ActorError> {
        self.path.bind(action, ctx.world)
    }

    fn tickle(&mut self, ctx: &mut ActorContext<'_>) -> Result<(), ActorError> {
        let progress =
            self.path
                .update(ctx.frame.dt, ctx.world, &mut (), ctx.notifications)?;
        if progress == PathProgress::Finished {
            debug!(actor = %self.id(), "ride finished");
            ctx.tickle.unregister(self.id());
        }
        Ok(())
    }

    fn handle_click(&mut self, ctx: &mut ActorContext<'_>) -> EventResult {
        let Some(route) = self.route.as_deref() else {
            return EventResult::Unhandled;
        };
        if self.path.is_following() || self.path.start_following(route, ctx.world).is_err() {
            return EventResult::Unhandled;
        }
        ctx.tickle.register(self.id());
        EventResult::Consumed
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
