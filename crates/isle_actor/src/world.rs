//! World storage.
//!
//! The [`World`] owns every live actor and the placement data scripts refer
//! to (named paths and locations). Actors are looked up by id or by
//! `(container, name)`. While an actor's own hook runs it is detached from
//! the world, so lookups during that call do not see it.

use std::collections::HashMap;

use isle_math::LocalToWorld;
use tracing::{debug, warn};

use crate::actor::Actor;
use crate::error::ActorError;
use crate::id::{ActorAllocator, ActorId};
use crate::path::Path;
use crate::script::WorldScript;

#[derive(Debug)]
pub struct World {
    allocator: ActorAllocator,
    actors: HashMap<ActorId, Box<dyn Actor>>,
    /// `(container, name)` to actor id.
    names: HashMap<(String, String), ActorId>,
    paths: HashMap<String, Path>,
    locations: HashMap<String, LocalToWorld>,
}

impl World {
    #[must_use]
    pub fn new() -> Self {
        Self {
            allocator: ActorAllocator::new(),
            actors: HashMap::new(),
            names: HashMap::new(),
            paths: HashMap::new(),
            locations: HashMap::new(),
        }
    }

    /// Register the paths and locations of a script. Actions are spawned by
    /// the session.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::InvalidPath`] for an unusable path and
    /// [`ActorError::Creation`] for a location with a degenerate basis.
    pub fn load_placements(&mut self, script: &WorldScript) -> Result<(), ActorError> {
        for def in &script.paths {
            self.add_path(def.build()?);
        }
        for def in &script.locations {
            let transform = def
                .transform()
                .ok_or_else(|| ActorError::creation(&def.name, "degenerate location basis"))?;
            self.add_location(&def.name, transform);
        }
        debug!(
            paths = self.paths.len(),
            locations = self.locations.len(),
            "placements loaded"
        );
        Ok(())
    }

    pub fn add_path(&mut self, path: Path) {
        self.paths.insert(path.name().to_string(), path);
    }

    #[must_use]
    pub fn path(&self, name: &str) -> Option<&Path> {
        self.paths.get(name)
    }

    pub fn add_location(&mut self, name: &str, transform: LocalToWorld) {
        self.locations.insert(name.to_string(), transform);
    }

    #[must_use]
    pub fn location(&self, name: &str) -> Option<LocalToWorld> {
        self.locations.get(name).copied()
    }

    pub(crate) fn allocate_id(&mut self) -> ActorId {
        self.allocator.allocate()
    }

    /// Add a created actor. A previous actor with the same name in the same
    /// container is shadowed for name lookups.
    pub(crate) fn insert(&mut self, actor: Box<dyn Actor>) {
        let id = actor.id();
        let key = (actor.base().container.clone(), actor.name().to_string());
        if let Some(previous) = self.names.insert(key, id) {
            warn!(%id, %previous, name = actor.name(), "actor name shadowed");
        }
        self.actors.insert(id, actor);
    }

    /// Remove an actor for good.
    pub(crate) fn remove(&mut self, id: ActorId) -> Option<Box<dyn Actor>> {
        let actor = self.actors.remove(&id)?;
        self.names.retain(|_, v| *v != id);
        Some(actor)
    }

    /// Detach an actor for the duration of one of its hooks.
    pub(crate) fn take(&mut self, id: ActorId) -> Option<Box<dyn Actor>> {
        self.actors.remove(&id)
    }

    /// Re-attach an actor detached by [`World::take`].
    pub(crate) fn restore(&mut self, actor: Box<dyn Actor>) {
        self.actors.insert(actor.id(), actor);
    }

    /// Find a sibling actor by container and scripted name.
    #[must_use]
    pub fn find(&self, container: &str, name: &str) -> Option<&dyn Actor> {
        let id = self.find_id(container, name)?;
        self.get(id)
    }

    /// Id of the actor with this container and name, even while detached.
    #[must_use]
    pub fn find_id(&self, container: &str, name: &str) -> Option<ActorId> {
        self.names
            .get(&(container.to_string(), name.to_string()))
            .copied()
    }

    #[must_use]
    pub fn get(&self, id: ActorId) -> Option<&dyn Actor> {
        self.actors.get(&id).map(Box::as_ref)
    }

    /// Typed access to an actor.
    #[must_use]
    pub fn get_as<T: Actor + 'static>(&self, id: ActorId) -> Option<&T> {
        self.get(id)?.as_any().downcast_ref::<T>()
    }

    #[must_use]
    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    /// Returns the number of attached actors.
    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use isle_math::Vec3;

    use super::*;
    use crate::class::ActorClass;
    use crate::script::{LocationDef, PathDef};

    #[test]
    fn test_load_placements() {
        let script = WorldScript {
            paths: vec![PathDef {
                name: "road".into(),
                points: vec![Vec3::ZERO, Vec3::X],
                triggers: Vec::new(),
            }],
            locations: vec![LocationDef {
                name: "helipad".into(),
                position: Vec3::new(1.0, 0.0, 1.0),
                direction: Vec3::Z,
                up: Vec3::Y,
            }],
            actions: Vec::new(),
        };
        let mut world = World::new();
        world.load_placements(&script).unwrap();
        assert!(world.path("road").is_some());
        assert_eq!(
            world.location("helipad").unwrap().position(),
            Vec3::new(1.0, 0.0, 1.0)
        );
        assert!(world.location("dock").is_none());
    }

    #[test]
    fn test_degenerate_location_rejected() {
        let script = WorldScript {
            locations: vec![LocationDef {
                name: "bad".into(),
                position: Vec3::ZERO,
                direction: Vec3::Y,
                up: Vec3::Y,
            }],
            ..WorldScript::default()
        };
        assert!(World::new().load_placements(&script).is_err());
    }

    #[test]
    fn test_find_and_detach() {
        use crate::actors::SkateBoard;
        use crate::script::ActionDescriptor;

        let mut world = World::new();
        let id = world.allocate_id();
        let action = ActionDescriptor::new(3, "isle", "SkateBoard_Actor", ActorClass::SkateBoard);
        world.insert(Box::new(SkateBoard::new(id, &action)));

        assert_eq!(world.find_id("isle", "SkateBoard_Actor"), Some(id));
        assert!(world.find("isle", "SkateBoard_Actor").unwrap().is_a(ActorClass::PathActor));
        assert!(world.find("act2", "SkateBoard_Actor").is_none());
        assert!(world.get_as::<SkateBoard>(id).is_some());

        let actor = world.take(id).unwrap();
        assert!(world.find("isle", "SkateBoard_Actor").is_none());
        assert_eq!(world.find_id("isle", "SkateBoard_Actor"), Some(id));
        world.restore(actor);

        assert!(world.remove(id).is_some());
        assert_eq!(world.find_id("isle", "SkateBoard_Actor"), None);
        assert_eq!(world.actor_count(), 0);
    }
}
