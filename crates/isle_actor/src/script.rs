//! World scripts.
//!
//! A [`WorldScript`] is the data the host hands over to build a world:
//! named paths, named placements and the actions that create actors.
//! Compiled scripts are MessagePack; hand-written ones are JSON.

use isle_math::{LocalToWorld, Vec3};
use serde::{Deserialize, Serialize};

use crate::class::ActorClass;
use crate::error::ActorError;
use crate::path::Path;

fn default_speed() -> f32 {
    1.0
}

/// Instruction to create one actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub object_id: u32,
    /// Script container the actor belongs to.
    pub container: String,
    /// Name used by siblings to find this actor.
    pub name: String,
    pub class: ActorClass,
    /// Named placement to start at.
    #[serde(default)]
    pub location: Option<String>,
    /// Named path the actor follows.
    #[serde(default)]
    pub path: Option<String>,
    /// Movement speed along paths, in world units per second.
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Duration of the action in frames, where meaningful.
    #[serde(default)]
    pub duration: Option<u32>,
}

impl ActionDescriptor {
    #[must_use]
    pub fn new(
        object_id: u32,
        container: impl Into<String>,
        name: impl Into<String>,
        class: ActorClass,
    ) -> Self {
        Self {
            object_id,
            container: container.into(),
            name: name.into(),
            class,
            location: None,
            path: None,
            speed: default_speed(),
            duration: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, frames: u32) -> Self {
        self.duration = Some(frames);
        self
    }
}

/// A trigger at a fixed distance along a path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerDef {
    pub id: u32,
    pub distance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathDef {
    pub name: String,
    pub points: Vec<Vec3>,
    #[serde(default)]
    pub triggers: Vec<TriggerDef>,
}

impl PathDef {
    /// Build the followable path.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::InvalidPath`] for fewer than two points or a
    /// zero-length polyline.
    pub fn build(&self) -> Result<Path, ActorError> {
        let mut path = Path::new(&self.name, self.points.clone())?;
        for trigger in &self.triggers {
            path = path.with_trigger(trigger.id, trigger.distance);
        }
        Ok(path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDef {
    pub name: String,
    pub position: Vec3,
    pub direction: Vec3,
    #[serde(default = "LocationDef::default_up")]
    pub up: Vec3,
}

impl LocationDef {
    fn default_up() -> Vec3 {
        Vec3::Y
    }

    /// Resolve the placement transform, `None` for a degenerate basis.
    #[must_use]
    pub fn transform(&self) -> Option<LocalToWorld> {
        LocalToWorld::from_position_direction_up(self.position, self.direction, self.up)
    }
}

/// Everything needed to populate a world.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldScript {
    #[serde(default)]
    pub paths: Vec<PathDef>,
    #[serde(default)]
    pub locations: Vec<LocationDef>,
    #[serde(default)]
    pub actions: Vec<ActionDescriptor>,
}

impl WorldScript {
    /// Parse a JSON script.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Json`] if the text is not a valid script.
    pub fn from_json(text: &str) -> Result<Self, ActorError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode to MessagePack bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Encode`] if serialisation fails.
    pub fn encode(&self) -> Result<Vec<u8>, ActorError> {
        Ok(rmp_serde::to_vec(self)?)
    }

    /// Decode from MessagePack bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Decode`] if deserialisation fails.
    pub fn decode(bytes: &[u8]) -> Result<Self, ActorError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}
