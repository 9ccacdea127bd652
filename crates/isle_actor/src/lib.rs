//! # isle_actor
//!
//! The actor layer of the isle runtime.
//!
//! This crate provides:
//!
//! - [`Actor`] — the polymorphic actor trait, with default no-op event hooks.
//! - [`ActorClass`] — static class tags answering "is-a" queries.
//! - [`path`] — polyline paths and the [`PathActor`] follow behaviour.
//! - [`actors`] — the concrete actors: helicopter, pizza, skateboard.
//! - [`notification`] — notifications and the per-frame dispatch queue.
//! - [`World`] — actor storage, named lookup and placement data.
//! - [`Session`] — the context object driving one frame at a time.
//! - [`script`] — world scripts and their MessagePack/JSON codecs.

pub mod actor;
pub mod actors;
pub mod animation;
pub mod class;
pub mod context;
pub mod error;
pub mod id;
pub mod notification;
pub mod path;
pub mod script;
pub mod session;
pub mod world;

pub use actor::{Actor, ActorBase, EventResult};
pub use actors::{Helicopter, Pizza, SkateBoard};
pub use animation::{AnimationCommand, AnimationId, AnimationLog, AnimationManager};
pub use class::ActorClass;
pub use context::{ActorContext, FrameTime};
pub use error::ActorError;
pub use id::{ActorAllocator, ActorId};
pub use notification::{
    Control, ControlEvent, EndActionParam, EndAnimParam, Notification, NotificationKind,
    NotificationQueue, PathEventKind, PathEventParam,
};
pub use path::{Path, PathActor, PathHooks, PathProgress, PathState};
pub use script::{ActionDescriptor, LocationDef, PathDef, TriggerDef, WorldScript};
pub use session::{DispatchReport, Session, TickReport};
pub use world::World;
