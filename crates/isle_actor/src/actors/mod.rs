//! Concrete actors.

mod helicopter;
mod pizza;
mod skateboard;

pub use helicopter::Helicopter;
pub use pizza::Pizza;
pub use skateboard::SkateBoard;

use crate::actor::Actor;
use crate::class::ActorClass;
use crate::error::ActorError;
use crate::id::ActorId;
use crate::script::ActionDescriptor;

/// Instantiate the actor class named by `action`, not yet created.
///
/// # Errors
///
/// Returns [`ActorError::Creation`] for an abstract class.
pub fn instantiate(id: ActorId, action: &ActionDescriptor) -> Result<Box<dyn Actor>, ActorError> {
    match action.class {
        ActorClass::Helicopter => Ok(Box::new(Helicopter::new(id, action))),
        ActorClass::SkateBoard => Ok(Box::new(SkateBoard::new(id, action))),
        ActorClass::Pizza => Ok(Box::new(Pizza::new(id, action))),
        class @ (ActorClass::Actor | ActorClass::PathActor) => Err(ActorError::creation(
            &action.name,
            format!("{class} cannot be instantiated"),
        )),
    }
}
