//! The pizza delivery mission giver.

use std::any::Any;

use isle_state::{Act1State, MissionEntry, PizzaMissionState};
use tracing::{debug, info};

use crate::actor::{Actor, ActorBase, EventResult};
use crate::animation::AnimationId;
use crate::class::ActorClass;
use crate::context::ActorContext;
use crate::error::ActorError;
use crate::id::ActorId;
use crate::notification::{EndActionParam, Notification, PathEventParam};
use crate::script::ActionDescriptor;

/// Starts and times pizza delivery runs for the current player character.
///
/// A run is started by the host through [`Pizza::start_mission`]. While it
/// is running the actor is registered for tickles and counts frames; once
/// the time limit is reached it ends the run and unregisters itself.
#[derive(Debug, Clone)]
pub struct Pizza {
    base: ActorBase,
    /// Sibling skateboard, if the container has one.
    skateboard: Option<ActorId>,
    /// Slot of the mission entry of the running delivery.
    entry: Option<usize>,
    /// Frames since the run started.
    mission_clock: u32,
    time_limit: u32,
}

impl Pizza {
    pub const SKATEBOARD_NAME: &'static str = "SkateBoard_Actor";

    /// Run length in frames when the action does not set one.
    pub const DEFAULT_TIME_LIMIT: u32 = 3600;

    /// Actor id of the character who delivers by skateboard.
    const SKATER: u8 = 1;

    #[must_use]
    pub fn new(id: ActorId, action: &ActionDescriptor) -> Self {
        Self {
            base: ActorBase::new(id, action),
            skateboard: None,
            entry: None,
            mission_clock: 0,
            time_limit: action.duration.unwrap_or(Self::DEFAULT_TIME_LIMIT),
        }
    }

    #[must_use]
    pub fn skateboard(&self) -> Option<ActorId> {
        self.skateboard
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.entry.is_some()
    }

    #[must_use]
    pub fn mission_clock(&self) -> u32 {
        self.mission_clock
    }

    #[must_use]
    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    fn intro_animation(&self) -> AnimationId {
        AnimationId(self.base.object_id)
    }

    /// Start a delivery run for the session's current character.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::MissingEntry`] if the mission record has no
    /// entry for the current character. Nothing is changed in that case.
    pub fn start_mission(&mut self, ctx: &mut ActorContext<'_>) -> Result<(), ActorError> {
        let actor_id = ctx.game_state.actor_id();
        let registry = ctx.game_state.registry_mut();
        let mission = registry.get_or_create::<PizzaMissionState>();
        let index = mission
            .entry_index(actor_id)
            .ok_or(ActorError::MissingEntry(actor_id))?;

        ctx.animations.reset();

        mission.active = true;
        if let Some(entry) = mission.slot_mut(index) {
            entry.attempts = entry.attempts.saturating_add(1);
            entry.timer = 0;
        }
        registry.get_or_create::<Act1State>().mission = Act1State::PIZZA_MISSION;

        ctx.game_state.set_music_enabled(false);
        ctx.animations.enable_camera_animations(false);
        ctx.animations.enable_ambient_animations(false);
        ctx.animations.play(self.id(), self.intro_animation());

        if actor_id == Self::SKATER
            && let Some(skateboard) = self.skateboard
        {
            ctx.post(Notification::click(skateboard));
        }

        self.entry = Some(index);
        self.mission_clock = 0;
        ctx.tickle.register(self.id());
        info!(actor = %self.id(), character = actor_id, limit = self.time_limit, "pizza mission started");
        Ok(())
    }

    fn stop_mission(&mut self, ctx: &mut ActorContext<'_>) {
        let Some(index) = self.entry.take() else {
            return;
        };

        let registry = ctx.game_state.registry_mut();
        let mission = registry.get_or_create::<PizzaMissionState>();
        mission.active = false;
        if let Some(entry) = mission.slot_mut(index) {
            entry.timer = MissionEntry::TIMER_UNSET;
        }
        registry.get_or_create::<Act1State>().mission = Act1State::NO_MISSION;

        ctx.game_state.set_music_enabled(true);
        ctx.animations.enable_camera_animations(true);
        ctx.animations.enable_ambient_animations(true);
        ctx.tickle.unregister(self.id());
        info!(actor = %self.id(), frames = self.mission_clock, "pizza mission over");
    }
}

impl Actor for Pizza {
    fn base(&self) -> &ActorBase {
        &self.base
    }

    fn class(&self) -> ActorClass {
        ActorClass::Pizza
    }

    fn create(
        &mut self,
        action: &ActionDescriptor,
        ctx: &mut ActorContext<'_>,
    ) -> Result<(), ActorError> {
        if let Some(location) = &action.location {
            self.base.transform = ctx.world.location(location).ok_or_else(|| {
                ActorError::creation(&action.name, format!("unknown location {location:?}"))
            })?;
        }

        let registry = ctx.game_state.registry_mut();
        registry.get_or_create::<PizzaMissionState>();
        registry.get_or_create::<Act1State>();

        self.skateboard = ctx.world.find_id(&self.base.container, Self::SKATEBOARD_NAME);
        if self.skateboard.is_none() {
            debug!(actor = %self.id(), container = %self.base.container, "no skateboard sibling");
        }
        Ok(())
    }

    fn tickle(&mut self, ctx: &mut ActorContext<'_>) -> Result<(), ActorError> {
        let Some(index) = self.entry else {
            ctx.tickle.unregister(self.id());
            return Ok(());
        };

        self.mission_clock += 1;
        if let Some(entry) = ctx
            .game_state
            .registry_mut()
            .get_mut::<PizzaMissionState>()
            .and_then(|mission| mission.slot_mut(index))
        {
            entry.timer = self.mission_clock;
        }

        if self.mission_clock >= self.time_limit {
            self.stop_mission(ctx);
        }
        Ok(())
    }

    fn handle_click(&mut self, _ctx: &mut ActorContext<'_>) -> EventResult {
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

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationCommand;
    use crate::script::WorldScript;
    use crate::session::Session;

    fn pizzeria(time_limit: u32) -> (Session, ActorId) {
        let script = WorldScript {
            actions: vec![
                ActionDescriptor::new(12, "isle", "Pizza_Actor", ActorClass::Pizza)
                    .with_duration(time_limit),
            ],
            ..WorldScript::default()
        };
        let mut session = Session::default();
        let ids = session.load_script(&script).unwrap();
        (session, ids[0])
    }

    fn start(session: &mut Session, pizza: ActorId) {
        session
            .invoke::<Pizza, _>(pizza, |pizza, ctx| pizza.start_mission(ctx))
            .unwrap()
            .unwrap();
    }

    #[test]
    fn test_stop_mission_restores_the_island() {
        let (mut session, pizza) = pizzeria(100);
        start(&mut session, pizza);
        assert!(session.actor::<Pizza>(pizza).unwrap().skateboard().is_none());
        assert!(session.notifications().is_empty());

        session
            .invoke::<Pizza, _>(pizza, |pizza, ctx| pizza.stop_mission(ctx))
            .unwrap();
        assert!(!session.actor::<Pizza>(pizza).unwrap().is_running());
        assert!(!session.tickle().is_registered(pizza));
        assert!(session.game_state().music_enabled());

        let registry = session.game_state().registry();
        assert_eq!(
            registry.get::<Act1State>().unwrap().mission,
            Act1State::NO_MISSION
        );
        let mission = registry.get::<PizzaMissionState>().unwrap();
        assert!(!mission.active);
        let entry = mission.entry(1).unwrap();
        assert_eq!(entry.timer, MissionEntry::TIMER_UNSET);
        assert_eq!(entry.attempts, 1);
        assert!(session.animations().commands().ends_with(&[
            AnimationCommand::CameraAnimations(true),
            AnimationCommand::AmbientAnimations(true),
        ]));

        // A second stop has nothing to end.
        let recorded = session.animations().commands().len();
        session
            .invoke::<Pizza, _>(pizza, |pizza, ctx| pizza.stop_mission(ctx))
            .unwrap();
        assert_eq!(session.animations().commands().len(), recorded);
    }

    #[test]
    fn test_zero_time_limit_ends_on_first_tickle() {
        let (mut session, pizza) = pizzeria(0);
        start(&mut session, pizza);
        assert!(session.tickle().is_registered(pizza));

        let report = session.tick(0.1);
        assert_eq!(report.ticked, 1);
        let actor = session.actor::<Pizza>(pizza).unwrap();
        assert!(!actor.is_running());
        assert_eq!(actor.mission_clock(), 1);
        assert!(!session.tickle().is_registered(pizza));
        let mission = session
            .game_state()
            .registry()
            .get::<PizzaMissionState>()
            .unwrap();
        assert_eq!(mission.entry(1).unwrap().timer, MissionEntry::TIMER_UNSET);
    }

    #[test]
    fn test_tickle_without_a_run_unregisters() {
        let (mut session, pizza) = pizzeria(10);
        session
            .invoke::<Pizza, _>(pizza, |pizza, ctx| {
                ctx.tickle.register(pizza.id());
            })
            .unwrap();
        session.tick(0.1);
        assert!(!session.tickle().is_registered(pizza));
        assert_eq!(session.actor::<Pizza>(pizza).unwrap().mission_clock(), 0);
    }
}
