//! The helicopter.
//!
//! Phases: grounded → taking off → flying → landing → grounded. Takeoff and
//! landing are driven by scripted animations; the phase only advances when
//! the matching animation-end notification arrives. While a transition
//! animation runs the transform is blended between the two end poses, and
//! while flying the helicopter follows its route and never drops below
//! [`Helicopter::MIN_ALTITUDE`].

use std::any::Any;
use std::f32::consts::TAU;

use isle_math::{LocalToWorld, Vec3};
use isle_state::{HelicopterPhase, HelicopterState};
use tracing::{debug, info, warn};

use crate::actor::{Actor, ActorBase, EventResult};
use crate::animation::AnimationId;
use crate::class::ActorClass;
use crate::context::ActorContext;
use crate::error::ActorError;
use crate::id::ActorId;
use crate::notification::{Control, ControlEvent, EndAnimParam, PathEventKind, PathEventParam};
use crate::path::{PathActor, PathHooks};
use crate::script::ActionDescriptor;
use crate::world::World;

/// Rotor speed at full power, radians per second.
const ROTOR_MAX_SPEED: f32 = 12.0;

/// Fraction of the rotor speed gap closed per second.
const ROTOR_RESPONSE: f32 = 2.0;

/// Takeoff, landing and rotor blending.
#[derive(Debug, Clone, PartialEq)]
struct Flight {
    phase: HelicopterPhase,
    /// Pose at the start of the running transition.
    from: LocalToWorld,
    /// Pose at the end of the running transition.
    to: LocalToWorld,
    /// Transition progress in `[0, 1]`.
    progress: f32,
    last_elapsed: f32,
    rotor_speed: f32,
    rotor_angle: f32,
}

impl Flight {
    fn new() -> Self {
        Self {
            phase: HelicopterPhase::Grounded,
            from: LocalToWorld::IDENTITY,
            to: LocalToWorld::IDENTITY,
            progress: 0.0,
            last_elapsed: 0.0,
            rotor_speed: 0.0,
            rotor_angle: 0.0,
        }
    }

    fn begin(&mut self, phase: HelicopterPhase, from: LocalToWorld, to: LocalToWorld) {
        self.phase = phase;
        self.from = from;
        self.to = to;
        self.progress = 0.0;
    }
}

impl PathHooks for Flight {
    fn animate(&mut self, elapsed: f32) {
        let dt = (elapsed - self.last_elapsed).max(0.0);
        self.last_elapsed = elapsed;

        let target = match self.phase {
            HelicopterPhase::Grounded => 0.0,
            HelicopterPhase::Landing => ROTOR_MAX_SPEED * 0.5,
            HelicopterPhase::TakingOff | HelicopterPhase::Flying => ROTOR_MAX_SPEED,
        };
        self.rotor_speed += (target - self.rotor_speed) * (ROTOR_RESPONSE * dt).min(1.0);
        self.rotor_angle = (self.rotor_angle + self.rotor_speed * dt).rem_euclid(TAU);

        if matches!(
            self.phase,
            HelicopterPhase::TakingOff | HelicopterPhase::Landing
        ) {
            self.progress = (self.progress + dt / Helicopter::TRANSITION_SECONDS).min(1.0);
        }
    }

    fn override_transform(&mut self, transform: &mut LocalToWorld) {
        match self.phase {
            HelicopterPhase::TakingOff | HelicopterPhase::Landing => {
                *transform = self.from.interpolate(&self.to, self.progress);
            }
            HelicopterPhase::Flying => {
                let position = transform.position();
                if position.y < Helicopter::MIN_ALTITUDE {
                    transform.set_position(Vec3::new(
                        position.x,
                        Helicopter::MIN_ALTITUDE,
                        position.z,
                    ));
                }
            }
            HelicopterPhase::Grounded => {}
        }
    }
}

/// The player-flown helicopter.
#[derive(Debug, Clone)]
pub struct Helicopter {
    path: PathActor,
    flight: Flight,
    /// Pose on the helipad, where landings end.
    pad: LocalToWorld,
    /// Route flown once airborne.
    route: Option<String>,
    /// Transition animation this actor started and is waiting on.
    pending_animation: Option<AnimationId>,
}

impl Helicopter {
    pub const TAKEOFF_ANIMATION: AnimationId = AnimationId(0x1d);
    pub const LANDING_ANIMATION: AnimationId = AnimationId(0x1e);

    /// Height above the pad reached by takeoff when there is no route.
    pub const HOVER_HEIGHT: f32 = 10.0;
    pub const MIN_ALTITUDE: f32 = 5.0;
    /// Duration over which takeoff and landing poses are blended.
    pub const TRANSITION_SECONDS: f32 = 2.0;

    #[must_use]
    pub fn new(id: ActorId, action: &ActionDescriptor) -> Self {
        Self {
            path: PathActor::new(id, action),
            flight: Flight::new(),
            pad: LocalToWorld::IDENTITY,
            route: action.path.clone(),
            pending_animation: None,
        }
    }

    #[must_use]
    pub fn path(&self) -> &PathActor {
        &self.path
    }

    #[must_use]
    pub fn pending_animation(&self) -> Option<AnimationId> {
        self.pending_animation
    }

    /// Current rotor angle in radians.
    #[must_use]
    pub fn rotor_angle(&self) -> f32 {
        self.flight.rotor_angle
    }

    /// Pose at the end of takeoff: the start of the route, or straight up.
    fn hover_pose(&self, world: &World) -> LocalToWorld {
        self.route
            .as_deref()
            .and_then(|route| world.path(route))
            .and_then(|path| {
                let (position, heading) = path.sample(0.0);
                LocalToWorld::from_position_direction_up(position, heading, Vec3::Y)
            })
            .unwrap_or_else(|| self.pad.translated(Vec3::new(0.0, Self::HOVER_HEIGHT, 0.0)))
    }

    fn exit(&mut self, state: &mut HelicopterState, ctx: &mut ActorContext<'_>) {
        state.boarded = false;
        state.phase = HelicopterPhase::Grounded;
        self.flight.phase = HelicopterPhase::Grounded;
        self.path.stop();
        ctx.animations.stop(self.id());
        ctx.animations.enable_camera_animations(true);
        info!(actor = %self.id(), "left helicopter");
    }
}

impl Actor for Helicopter {
    fn base(&self) -> &ActorBase {
        &self.path.base
    }

    fn class(&self) -> ActorClass {
        ActorClass::Helicopter
    }

    fn create(
        &mut self,
        action: &ActionDescriptor,
        ctx: &mut ActorContext<'_>,
    ) -> Result<(), ActorError> {
        self.path.bind(action, ctx.world)?;
        self.pad = self.path.base.transform;
        ctx.game_state
            .registry_mut()
            .get_or_create::<HelicopterState>();
        ctx.tickle.register(self.id());
        Ok(())
    }

    fn tickle(&mut self, ctx: &mut ActorContext<'_>) -> Result<(), ActorError> {
        self.flight.phase = ctx
            .game_state
            .registry_mut()
            .get_or_create::<HelicopterState>()
            .phase;
        self.path
            .update(ctx.frame.dt, ctx.world, &mut self.flight, ctx.notifications)?;
        Ok(())
    }

    fn handle_click(&mut self, ctx: &mut ActorContext<'_>) -> EventResult {
        let state = ctx
            .game_state
            .registry_mut()
            .get_or_create::<HelicopterState>();
        if state.boarded {
            return EventResult::Unhandled;
        }
        state.boarded = true;
        ctx.animations.enable_camera_animations(false);
        info!(actor = %self.id(), "boarded helicopter");
        EventResult::Consumed
    }

    fn handle_control_event(
        &mut self,
        event: &ControlEvent,
        ctx: &mut ActorContext<'_>,
    ) -> EventResult {
        let mut state = *ctx
            .game_state
            .registry_mut()
            .get_or_create::<HelicopterState>();

        let result = match (event.control, state.phase) {
            (Control::Takeoff, HelicopterPhase::Grounded) if state.boarded => {
                state.phase = HelicopterPhase::TakingOff;
                let to = self.hover_pose(ctx.world);
                self.flight
                    .begin(HelicopterPhase::TakingOff, self.path.base.transform, to);
                self.pending_animation = Some(Self::TAKEOFF_ANIMATION);
                ctx.animations.play(self.id(), Self::TAKEOFF_ANIMATION);
                EventResult::Consumed
            }
            (Control::Land, HelicopterPhase::Flying) => {
                state.phase = HelicopterPhase::Landing;
                self.path.stop();
                self.flight
                    .begin(HelicopterPhase::Landing, self.path.base.transform, self.pad);
                self.pending_animation = Some(Self::LANDING_ANIMATION);
                ctx.animations.play(self.id(), Self::LANDING_ANIMATION);
                EventResult::Consumed
            }
            (Control::Exit, HelicopterPhase::Grounded) if state.boarded => {
                self.exit(&mut state, ctx);
                EventResult::Consumed
            }
            _ => EventResult::Unhandled,
        };

        if result.is_consumed() {
            debug!(actor = %self.id(), control = ?event.control, phase = ?state.phase, "control handled");
            *ctx.game_state
                .registry_mut()
                .get_or_create::<HelicopterState>() = state;
        }
        result
    }

    fn handle_animation_end(
        &mut self,
        param: &EndAnimParam,
        ctx: &mut ActorContext<'_>,
    ) -> EventResult {
        if self.pending_animation != Some(param.animation) {
            return EventResult::Unhandled;
        }

        let state = ctx
            .game_state
            .registry_mut()
            .get_or_create::<HelicopterState>();
        match state.phase {
            HelicopterPhase::TakingOff => {
                state.phase = HelicopterPhase::Flying;
                self.flight.phase = HelicopterPhase::Flying;
                self.pending_animation = None;
                if let Some(route) = self.route.as_deref()
                    && let Err(err) = self.path.start_following(route, ctx.world)
                {
                    warn!(actor = %self.path.base.id, error = %err, "cannot follow flight route");
                }
                info!(actor = %self.path.base.id, "helicopter airborne");
                EventResult::Consumed
            }
            HelicopterPhase::Landing => {
                state.phase = HelicopterPhase::Grounded;
                self.flight.phase = HelicopterPhase::Grounded;
                self.pending_animation = None;
                self.path.base.transform = self.pad;
                info!(actor = %self.path.base.id, "helicopter landed");
                EventResult::Consumed
            }
            HelicopterPhase::Grounded | HelicopterPhase::Flying => EventResult::Unhandled,
        }
    }

    fn handle_path_event(
        &mut self,
        param: &PathEventParam,
        ctx: &mut ActorContext<'_>,
    ) -> EventResult {
        let flying = ctx
            .game_state
            .registry()
            .get::<HelicopterState>()
            .is_some_and(|state| state.phase == HelicopterPhase::Flying);
        if param.kind != PathEventKind::End
            || !flying
            || self.route.as_deref() != Some(param.path.as_str())
        {
            return EventResult::Unhandled;
        }

        // Keep circling the route until told to land.
        match self.path.start_following(&param.path, ctx.world) {
            Ok(()) => EventResult::Consumed,
            Err(_) => EventResult::Unhandled,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
