//! Runtime object identification.
//!
//! Every card instance and every ability instance gets its own id when it is
//! created. Ids are never reused within a game, and instances are never
//! removed from the instance map, so an id stays resolvable for the whole game.
//!
//! Abilities refer back to their source card by [`InstanceId`] only. This
//! keeps abilities and cards independently relocatable: moving a card between
//! zones never invalidates the abilities that point at it.
//!
//! ```
//! use rust_mtg::core::{AbilityId, InstanceId};
//!
//! let card = InstanceId::new(7);
//! let ability = AbilityId::new(3);
//!
//! assert_eq!(card.raw(), 7);
//! assert_eq!(format!("{}", ability), "Ability(3)");
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of a card instance (one physical card in one game).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Create a new instance ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for InstanceId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}

/// Identifier of an ability instance.
///
/// Allocated when a card instance is created and its ability descriptors are
/// turned into abilities by the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AbilityId(pub u32);

impl AbilityId {
    /// Create a new ability ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for AbilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ability({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_id_basics() {
        let id = InstanceId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(InstanceId::from(42), id);
        assert_eq!(format!("{}", id), "Instance(42)");
    }

    #[test]
    fn test_ids_are_ordered() {
        assert!(InstanceId::new(1) < InstanceId::new(2));
        assert!(AbilityId::new(0) < AbilityId::new(9));
    }

    #[test]
    fn test_serialization() {
        let id = InstanceId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: InstanceId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
