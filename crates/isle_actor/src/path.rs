//! Path following.
//!
//! A [`Path`] is a polyline with triggers at fixed distances. A
//! [`PathActor`] carries the progress cursor along one path and rebuilds
//! its transform every frame; the concrete actor plugs in a [`PathHooks`]
//! implementation to blend in its own animation and adjust the final
//! transform before it is committed.

use isle_math::{LocalToWorld, Vec3};
use tracing::{debug, trace};

use crate::actor::ActorBase;
use crate::error::ActorError;
use crate::id::ActorId;
use crate::notification::{Notification, NotificationQueue, PathEventKind};
use crate::script::ActionDescriptor;
use crate::world::World;

/// A followable polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    name: String,
    points: Vec<Vec3>,
    /// Distance from the start to each point.
    distances: Vec<f32>,
    /// `(id, distance)` pairs sorted by distance.
    triggers: Vec<(u32, f32)>,
}

impl Path {
    /// # Errors
    ///
    /// Returns [`ActorError::InvalidPath`] for fewer than two points or a
    /// zero total length.
    pub fn new(name: impl Into<String>, points: Vec<Vec3>) -> Result<Self, ActorError> {
        let name = name.into();
        if points.len() < 2 {
            return Err(ActorError::InvalidPath {
                name,
                reason: format!("needs at least 2 points, got {}", points.len()),
            });
        }

        let mut distances = Vec::with_capacity(points.len());
        let mut total = 0.0;
        distances.push(total);
        for pair in points.windows(2) {
            total += pair[0].distance(pair[1]);
            distances.push(total);
        }
        if total <= f32::EPSILON {
            return Err(ActorError::InvalidPath {
                name,
                reason: "zero length".to_string(),
            });
        }

        Ok(Self {
            name,
            points,
            distances,
            triggers: Vec::new(),
        })
    }

    /// Add a trigger at `distance` from the start.
    #[must_use]
    pub fn with_trigger(mut self, id: u32, distance: f32) -> Self {
        let pos = self.triggers.partition_point(|&(_, d)| d <= distance);
        self.triggers.insert(pos, (id, distance));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total length of the polyline.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.distances.last().copied().unwrap_or_default()
    }

    #[must_use]
    pub fn start(&self) -> Vec3 {
        self.points[0]
    }

    /// Position and unit heading at `distance` along the path, clamped to
    /// the path ends.
    #[must_use]
    pub fn sample(&self, distance: f32) -> (Vec3, Vec3) {
        let distance = distance.clamp(0.0, self.length());
        // Index of the segment containing `distance`, skipping zero-length ones.
        let mut segment = self
            .distances
            .partition_point(|&d| d <= distance)
            .saturating_sub(1)
            .min(self.points.len() - 2);
        while segment > 0 && self.distances[segment + 1] - self.distances[segment] <= f32::EPSILON {
            segment -= 1;
        }

        let (a, b) = (self.points[segment], self.points[segment + 1]);
        let span = self.distances[segment + 1] - self.distances[segment];
        let t = if span > f32::EPSILON {
            (distance - self.distances[segment]) / span
        } else {
            0.0
        };
        let heading = (b - a).try_normalize().unwrap_or(Vec3::Z);
        (a.lerp(b, t), heading)
    }

    /// Triggers with a distance in `(from, to]`. A step that leaves the
    /// start of the path covers `[0, to]`, so a trigger at 0 fires once.
    pub fn triggers_crossed(&self, from: f32, to: f32) -> impl Iterator<Item = u32> + '_ {
        let leaving_start = from <= 0.0 && to > from;
        self.triggers
            .iter()
            .filter(move |&&(_, d)| (d > from || (leaving_start && d >= from)) && d <= to)
            .map(|&(id, _)| id)
    }
}

/// Follow state of a path actor.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PathState {
    #[default]
    Idle,
    Following {
        path: String,
        /// Distance travelled along the path.
        distance: f32,
    },
}

/// Result of one [`PathActor::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathProgress {
    Idle,
    Moving,
    /// The end of the path was reached this frame; the actor is idle now.
    Finished,
}

/// Per-subtype customisation of path updates. Both hooks default to no-ops.
pub trait PathHooks {
    /// Blend a scalar-driven animation, given seconds since creation.
    fn animate(&mut self, _elapsed: f32) {}

    /// Adjust the transform before it is committed.
    fn override_transform(&mut self, _transform: &mut LocalToWorld) {}
}

impl PathHooks for () {}

/// Path-following core embedded in every path-driven actor.
#[derive(Debug, Clone, PartialEq)]
pub struct PathActor {
    pub base: ActorBase,
    state: PathState,
    /// World units per second.
    speed: f32,
    /// Seconds of updates so far.
    elapsed: f32,
    /// Translation applied by the last update.
    delta: Vec3,
}

impl PathActor {
    #[must_use]
    pub fn new(id: ActorId, action: &ActionDescriptor) -> Self {
        Self {
            base: ActorBase::new(id, action),
            state: PathState::Idle,
            speed: action.speed,
            elapsed: 0.0,
            delta: Vec3::ZERO,
        }
    }

    /// Resolve the starting placement from the world.
    ///
    /// A named location wins; otherwise the actor is put at the start of
    /// its path, facing along it.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Creation`] if the action names a location or
    /// path the world does not have, or names neither.
    pub fn bind(&mut self, action: &ActionDescriptor, world: &World) -> Result<(), ActorError> {
        let path = match &action.path {
            Some(name) => Some(world.path(name).ok_or_else(|| {
                ActorError::creation(&action.name, format!("unknown path {name:?}"))
            })?),
            None => None,
        };

        let transform = match (&action.location, path) {
            (Some(location), _) => world.location(location).ok_or_else(|| {
                ActorError::creation(&action.name, format!("unknown location {location:?}"))
            })?,
            (None, Some(path)) => {
                let (position, heading) = path.sample(0.0);
                LocalToWorld::from_position_direction_up(position, heading, Vec3::Y)
                    .unwrap_or_else(|| LocalToWorld::from_position(position))
            }
            (None, None) => {
                return Err(ActorError::creation(&action.name, "no placement data"));
            }
        };

        self.base.transform = transform;
        debug!(actor = %self.base.id, name = %self.base.name, "path actor placed");
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> &PathState {
        &self.state
    }

    #[must_use]
    pub fn is_following(&self) -> bool {
        matches!(self.state, PathState::Following { .. })
    }

    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Translation applied by the last update.
    #[must_use]
    pub fn delta(&self) -> Vec3 {
        self.delta
    }

    /// Start following `path` from its beginning.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::UnknownPath`] if the world has no such path.
    pub fn start_following(&mut self, path: &str, world: &World) -> Result<(), ActorError> {
        if world.path(path).is_none() {
            return Err(ActorError::UnknownPath(path.to_string()));
        }
        debug!(actor = %self.base.id, path, "start following path");
        self.state = PathState::Following {
            path: path.to_string(),
            distance: 0.0,
        };
        Ok(())
    }

    /// Stop following and stay where the actor is.
    pub fn stop(&mut self) {
        self.state = PathState::Idle;
    }

    /// Advance by `dt` seconds and commit a new transform.
    ///
    /// Crossed triggers and the path end are posted as path-event
    /// notifications to the actor itself.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::UnknownPath`] if the followed path disappeared
    /// from the world; the actor is left idle.
    pub fn update(
        &mut self,
        dt: f32,
        world: &World,
        hooks: &mut impl PathHooks,
        notifications: &mut NotificationQueue,
    ) -> Result<PathProgress, ActorError> {
        self.elapsed += dt;
        let mut transform = self.base.transform;
        let mut progress = PathProgress::Idle;

        if let PathState::Following { path, distance } = &mut self.state {
            let Some(followed) = world.path(path) else {
                let name = std::mem::take(path);
                self.state = PathState::Idle;
                return Err(ActorError::UnknownPath(name));
            };

            let from = *distance;
            let to = (from + self.speed * dt).min(followed.length());
            for trigger in followed.triggers_crossed(from, to) {
                notifications.post(Notification::path_event(
                    self.base.id,
                    path.as_str(),
                    PathEventKind::Trigger(trigger),
                ));
            }

            let (position, heading) = followed.sample(to);
            transform = LocalToWorld::from_position_direction_up(position, heading, Vec3::Y)
                .unwrap_or_else(|| {
                    LocalToWorld::from_position_rotation(position, transform.rotation())
                });
            *distance = to;

            progress = if to >= followed.length() {
                notifications.post(Notification::path_event(
                    self.base.id,
                    path.as_str(),
                    PathEventKind::End,
                ));
                PathProgress::Finished
            } else {
                PathProgress::Moving
            };
        }

        hooks.animate(self.elapsed);
        hooks.override_transform(&mut transform);
        let transform = transform.orthonormalized();

        self.delta = transform.position() - self.base.transform.position();
        self.base.transform = transform;
        if progress == PathProgress::Finished {
            trace!(actor = %self.base.id, "path finished");
            self.state = PathState::Idle;
        }
        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ActorClass;
    use crate::notification::NotificationKind;

    fn world_with_road() -> World {
        let mut world = World::new();
        let road = Path::new(
            "road",
            vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 10.0)],
        )
        .unwrap()
        .with_trigger(7, 5.0);
        world.add_path(road);
        world
    }

    fn board(world: &World) -> PathActor {
        let action = ActionDescriptor::new(1, "isle", "SkateBoard_Actor", ActorClass::SkateBoard)
            .with_path("road")
            .with_speed(4.0);
        let mut actor = PathActor::new(ActorId(1), &action);
        actor.bind(&action, world).unwrap();
        actor
    }

    #[derive(Default)]
    struct Recorder {
        animated: Vec<f32>,
        lift: f32,
    }

    impl PathHooks for Recorder {
        fn animate(&mut self, elapsed: f32) {
            self.animated.push(elapsed);
        }

        fn override_transform(&mut self, transform: &mut LocalToWorld) {
            *transform = transform.translated(Vec3::new(0.0, self.lift, 0.0));
        }
    }

    #[test]
    fn test_path_rejects_degenerate_input() {
        assert!(Path::new("p", vec![Vec3::ZERO]).is_err());
        assert!(Path::new("p", vec![Vec3::ONE, Vec3::ONE]).is_err());
    }

    #[test]
    fn test_sample_interpolates_and_clamps() {
        let world = world_with_road();
        let road = world.path("road").unwrap();
        assert_eq!(road.length(), 20.0);
        let (pos, heading) = road.sample(5.0);
        assert_eq!(pos, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(heading, Vec3::X);
        let (pos, heading) = road.sample(15.0);
        assert_eq!(pos, Vec3::new(10.0, 0.0, 5.0));
        assert_eq!(heading, Vec3::Z);
        assert_eq!(road.sample(99.0).0, Vec3::new(10.0, 0.0, 10.0));
    }

    #[test]
    fn test_bind_without_placement_fails() {
        let world = World::new();
        let action = ActionDescriptor::new(1, "isle", "Ghost", ActorClass::SkateBoard);
        let mut actor = PathActor::new(ActorId(1), &action);
        assert!(matches!(
            actor.bind(&action, &world),
            Err(ActorError::Creation { .. })
        ));

        let action = action.with_path("nowhere");
        assert!(matches!(
            actor.bind(&action, &world),
            Err(ActorError::Creation { .. })
        ));
    }

    #[test]
    fn test_follow_to_end_posts_events_and_goes_idle() {
        let world = world_with_road();
        let mut actor = board(&world);
        let mut queue = NotificationQueue::new();
        actor.start_following("road", &world).unwrap();

        // 4 units/s * 2s = 8 units: crosses the trigger at 5.
        let progress = actor.update(2.0, &world, &mut (), &mut queue).unwrap();
        assert_eq!(progress, PathProgress::Moving);
        assert_eq!(actor.transform_position(), Vec3::new(8.0, 0.0, 0.0));
        assert_eq!(actor.delta(), Vec3::new(8.0, 0.0, 0.0));
        assert_eq!(queue.len(), 1);

        let progress = actor.update(10.0, &world, &mut (), &mut queue).unwrap();
        assert_eq!(progress, PathProgress::Finished);
        assert_eq!(actor.state(), &PathState::Idle);

        let kinds: Vec<_> = queue.take_pending().into_iter().map(|n| n.kind).collect();
        assert!(matches!(
            &kinds[0],
            NotificationKind::PathEvent(p) if p.kind == PathEventKind::Trigger(7)
        ));
        assert!(matches!(
            &kinds[1],
            NotificationKind::PathEvent(p) if p.kind == PathEventKind::End && p.path == "road"
        ));
    }

    #[test]
    fn test_trigger_at_start_fires_once() {
        let road = Path::new("start", vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)])
            .unwrap()
            .with_trigger(1, 0.0)
            .with_trigger(2, 4.0);
        assert!(road.triggers_crossed(0.0, 0.0).next().is_none());
        assert_eq!(road.triggers_crossed(0.0, 4.0).collect::<Vec<_>>(), vec![1, 2]);
        assert!(road.triggers_crossed(4.0, 8.0).next().is_none());

        let mut world = world_with_road();
        world.add_path(road);
        let mut actor = board(&world);
        let mut queue = NotificationQueue::new();
        actor.start_following("start", &world).unwrap();
        actor.update(0.5, &world, &mut (), &mut queue).unwrap();
        actor.update(0.5, &world, &mut (), &mut queue).unwrap();

        let triggers: Vec<_> = queue
            .take_pending()
            .into_iter()
            .filter_map(|n| match n.kind {
                NotificationKind::PathEvent(p) => match p.kind {
                    PathEventKind::Trigger(id) => Some(id),
                    PathEventKind::End => None,
                },
                _ => None,
            })
            .collect();
        // 2 units per update: the start trigger fires on the first step only.
        assert_eq!(triggers, vec![1, 2]);
    }

    #[test]
    fn test_hooks_run_and_transform_stays_orthonormal() {
        let world = world_with_road();
        let mut actor = board(&world);
        let mut queue = NotificationQueue::new();
        let mut hooks = Recorder {
            lift: 2.0,
            ..Recorder::default()
        };
        actor.start_following("road", &world).unwrap();

        for _ in 0..8 {
            actor.update(0.5, &world, &mut hooks, &mut queue).unwrap();
            assert!(actor.base.transform.is_orthonormal());
        }
        assert_eq!(hooks.animated, vec![0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0]);
        assert_eq!(actor.transform_position().y, 2.0);
    }

    #[test]
    fn test_idle_update_keeps_position() {
        let world = world_with_road();
        let mut actor = board(&world);
        let before = actor.transform_position();
        let progress = actor
            .update(1.0, &world, &mut (), &mut NotificationQueue::new())
            .unwrap();
        assert_eq!(progress, PathProgress::Idle);
        assert_eq!(actor.transform_position(), before);
    }

    #[test]
    fn test_missing_path_stops_actor() {
        let world = world_with_road();
        let mut actor = board(&world);
        actor.start_following("road", &world).unwrap();
        let empty = World::new();
        assert!(matches!(
            actor.update(1.0, &empty, &mut (), &mut NotificationQueue::new()),
            Err(ActorError::UnknownPath(name)) if name == "road"
        ));
        assert!(!actor.is_following());
    }

    impl PathActor {
        fn transform_position(&self) -> Vec3 {
            self.base.transform.position()
        }
    }
}
