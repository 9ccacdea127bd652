//! The frame session.
//!
//! A [`Session`] owns everything one running island needs: the world, the
//! tickle scheduler, the game state, the notification queue and the
//! animation manager. The host drives it one frame at a time through
//! [`Session::tick`], which runs a tickle pass followed by a dispatch pass.
//!
//! Actors are detached from the world while one of their hooks runs, so the
//! hook can be handed mutable access to the rest of the session.

use std::path::Path;

use isle_state::GameState;
use isle_tickle::TickleManager;
use tracing::{Span, debug, error, info, info_span, trace, warn};
use uuid::Uuid;

use crate::actor::Actor;
use crate::actors;
use crate::animation::{AnimationLog, AnimationManager};
use crate::context::{ActorContext, FrameTime};
use crate::error::ActorError;
use crate::id::ActorId;
use crate::notification::{Notification, NotificationQueue};
use crate::script::{ActionDescriptor, WorldScript};
use crate::world::World;

/// Outcome of one dispatch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Notifications handed to an actor.
    pub delivered: usize,
    /// Delivered notifications the actor reacted to.
    pub consumed: usize,
    /// Notifications whose target no longer exists.
    pub dropped: usize,
}

/// Outcome of one [`Session::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub frame: u64,
    /// Actors tickled in this frame.
    pub ticked: usize,
    pub dispatch: DispatchReport,
}

#[derive(Debug)]
pub struct Session<A: AnimationManager = AnimationLog> {
    id: Uuid,
    span: Span,
    world: World,
    tickle: TickleManager<ActorId>,
    game_state: GameState,
    animations: A,
    notifications: NotificationQueue,
    frame: FrameTime,
}

impl<A: AnimationManager> Session<A> {
    #[must_use]
    pub fn new(animations: A) -> Self {
        let id = Uuid::new_v4();
        let span = info_span!("session", %id);
        span.in_scope(|| info!("session started"));
        Self {
            id,
            span,
            world: World::new(),
            tickle: TickleManager::new(),
            game_state: GameState::new(),
            animations,
            notifications: NotificationQueue::new(),
            frame: FrameTime::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for placement data. Actors are added through
    /// [`Session::spawn`].
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[must_use]
    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    pub fn game_state_mut(&mut self) -> &mut GameState {
        &mut self.game_state
    }

    #[must_use]
    pub fn animations(&self) -> &A {
        &self.animations
    }

    pub fn animations_mut(&mut self) -> &mut A {
        &mut self.animations
    }

    #[must_use]
    pub fn tickle(&self) -> &TickleManager<ActorId> {
        &self.tickle
    }

    #[must_use]
    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    #[must_use]
    pub fn frame(&self) -> FrameTime {
        self.frame
    }

    /// Typed access to an attached actor.
    #[must_use]
    pub fn actor<T: Actor + 'static>(&self, id: ActorId) -> Option<&T> {
        self.world.get_as::<T>(id)
    }

    fn context(&mut self) -> ActorContext<'_> {
        ActorContext {
            world: &self.world,
            tickle: &mut self.tickle,
            game_state: &mut self.game_state,
            animations: &mut self.animations,
            notifications: &mut self.notifications,
            frame: self.frame,
        }
    }

    /// Register the placements of `script` and spawn its actions in order.
    ///
    /// # Errors
    ///
    /// Stops at the first invalid placement or failed action.
    pub fn load_script(&mut self, script: &WorldScript) -> Result<Vec<ActorId>, ActorError> {
        let span = self.span.clone();
        let _enter = span.enter();

        self.world.load_placements(script)?;
        let ids = script
            .actions
            .iter()
            .map(|action| self.spawn(action))
            .collect::<Result<Vec<_>, _>>()?;
        info!(actors = ids.len(), "script loaded");
        Ok(ids)
    }

    /// Instantiate and create the actor described by `action`.
    ///
    /// # Errors
    ///
    /// Returns the creation error of the actor. A failed actor is never
    /// attached and left unregistered.
    pub fn spawn(&mut self, action: &ActionDescriptor) -> Result<ActorId, ActorError> {
        let id = self.world.allocate_id();
        let mut actor = actors::instantiate(id, action)?;

        if let Err(err) = actor.create(action, &mut self.context()) {
            self.tickle.unregister(id);
            error!(%id, name = %action.name, error = %err, "actor creation failed");
            return Err(err);
        }

        self.world.insert(actor);
        info!(%id, class = %action.class, name = %action.name, "actor spawned");
        Ok(id)
    }

    /// Detach and drop an actor.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::UnknownActor`] if no such actor is attached.
    pub fn remove(&mut self, id: ActorId) -> Result<(), ActorError> {
        self.world.remove(id).ok_or(ActorError::UnknownActor(id))?;
        self.tickle.unregister(id);
        debug!(%id, "actor removed");
        Ok(())
    }

    /// Queue a notification for the next dispatch pass.
    pub fn post(&mut self, notification: Notification) {
        trace!(target_actor = %notification.target, kind = ?notification.kind, "notification posted");
        self.notifications.post(notification);
    }

    /// Call `f` on an attached actor of type `T`, with a context.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::UnknownActor`] if the actor is not attached and
    /// [`ActorError::WrongClass`] if it is not a `T`.
    pub fn invoke<T, R>(
        &mut self,
        id: ActorId,
        f: impl FnOnce(&mut T, &mut ActorContext<'_>) -> R,
    ) -> Result<R, ActorError>
    where
        T: Actor + 'static,
    {
        let mut actor = self.world.take(id).ok_or(ActorError::UnknownActor(id))?;
        let result = match actor.as_any_mut().downcast_mut::<T>() {
            Some(typed) => Ok(f(typed, &mut self.context())),
            None => Err(ActorError::WrongClass {
                actor: id,
                expected: std::any::type_name::<T>(),
            }),
        };
        self.world.restore(actor);
        result
    }

    /// Advance one frame of `dt` seconds: a tickle pass, then a dispatch
    /// pass.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let span = self.span.clone();
        let _enter = span.enter();

        self.frame.tick += 1;
        self.frame.dt = dt;
        self.frame.elapsed += dt;

        let ticked = self.tickle_pass();
        let dispatch = self.dispatch_notifications();

        let report = TickReport {
            frame: self.frame.tick,
            ticked,
            dispatch,
        };
        trace!(?report, "frame complete");
        report
    }

    /// Tickle every due actor once. A failing actor is logged and the pass
    /// goes on.
    fn tickle_pass(&mut self) -> usize {
        let Self {
            world,
            tickle,
            game_state,
            animations,
            notifications,
            frame,
            ..
        } = self;
        let frame = *frame;

        tickle.tickle_all(|tickle, id| {
            let Some(mut actor) = world.take(id) else {
                warn!(%id, "tickle client without actor");
                tickle.unregister(id);
                return;
            };

            let result = {
                let mut ctx = ActorContext {
                    world: &*world,
                    tickle,
                    game_state: &mut *game_state,
                    animations: &mut *animations,
                    notifications: &mut *notifications,
                    frame,
                };
                actor.tickle(&mut ctx)
            };
            world.restore(actor);

            if let Err(err) = result {
                warn!(%id, error = %err, "tickle failed");
            }
        })
    }

    /// Deliver every notification queued before this call, in FIFO order.
    /// Notifications posted by handlers wait for the next pass.
    pub fn dispatch_notifications(&mut self) -> DispatchReport {
        let mut report = DispatchReport::default();

        for notification in self.notifications.take_pending() {
            let Some(mut actor) = self.world.take(notification.target) else {
                warn!(target_actor = %notification.target, kind = ?notification.kind, "notification target missing, dropped");
                report.dropped += 1;
                continue;
            };

            let result = notification.deliver(actor.as_mut(), &mut self.context());
            self.world.restore(actor);

            report.delivered += 1;
            if result.is_consumed() {
                report.consumed += 1;
            }
        }

        if report.delivered + report.dropped > 0 {
            debug!(
                delivered = report.delivered,
                consumed = report.consumed,
                dropped = report.dropped,
                "dispatch pass complete"
            );
        }
        report
    }

    /// Write the game state to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::State`] if encoding or writing fails.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), ActorError> {
        let span = self.span.clone();
        let _enter = span.enter();
        self.game_state.save_to_path(path)?;
        Ok(())
    }

    /// Replace the saved parts of the game state with the contents of
    /// `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::State`] if the file cannot be read or decoded.
    /// A truncated file is still applied as far as it goes before
    /// [`StateError::TruncatedStream`] is returned.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), ActorError> {
        let span = self.span.clone();
        let _enter = span.enter();
        self.game_state.load_from_path(path)?;
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AnimationLog::new())
    }
}
