//! Actor class tags.
//!
//! Every concrete actor reports an [`ActorClass`]. The tags form a static
//! single-inheritance chain, so "is-a" questions are answered by walking
//! parents instead of comparing class-name strings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorClass {
    /// Root of the hierarchy.
    Actor,
    /// Actors driven along world paths.
    PathActor,
    Helicopter,
    SkateBoard,
    Pizza,
}

impl ActorClass {
    /// The class this one specialises, `None` for the root.
    #[must_use]
    pub const fn parent(self) -> Option<ActorClass> {
        match self {
            Self::Actor => None,
            Self::PathActor | Self::Pizza => Some(Self::Actor),
            Self::Helicopter | Self::SkateBoard => Some(Self::PathActor),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Actor => "Actor",
            Self::PathActor => "PathActor",
            Self::Helicopter => "Helicopter",
            Self::SkateBoard => "SkateBoard",
            Self::Pizza => "Pizza",
        }
    }

    /// Returns `true` if `self` is `other` or derives from it.
    #[must_use]
    pub fn is_a(self, other: ActorClass) -> bool {
        let mut class = Some(self);
        while let Some(current) = class {
            if current == other {
                return true;
            }
            class = current.parent();
        }
        false
    }

    /// Whether actors of this class can be instantiated from a script.
    #[must_use]
    pub const fn is_concrete(self) -> bool {
        !matches!(self, Self::Actor | Self::PathActor)
    }
}

impl std::fmt::Display for ActorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_a_walks_parents() {
        assert!(ActorClass::Helicopter.is_a(ActorClass::Helicopter));
        assert!(ActorClass::Helicopter.is_a(ActorClass::PathActor));
        assert!(ActorClass::Helicopter.is_a(ActorClass::Actor));
        assert!(!ActorClass::Helicopter.is_a(ActorClass::SkateBoard));
        assert!(!ActorClass::Pizza.is_a(ActorClass::PathActor));
        assert!(!ActorClass::Actor.is_a(ActorClass::Pizza));
    }

    #[test]
    fn test_abstract_classes() {
        assert!(!ActorClass::Actor.is_concrete());
        assert!(!ActorClass::PathActor.is_concrete());
        assert!(ActorClass::Pizza.is_concrete());
    }
}
