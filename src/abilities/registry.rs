//! Ability registry.
//!
//! Card data names abilities by key (`"keyword"`, `"anthem"`,
//! `"dies_gain_life"`, ...). The registry maps each key to a factory that
//! builds the concrete [`Ability`] from the descriptor's parameters. It is
//! built once by the host and shared read-only by every game.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::{builtins, Ability};
use crate::cards::{AbilityDescriptor, Params};
use crate::core::{AbilityId, GameState, InstanceId, Result, RulesError};

/// Identity handed to a factory: the new ability's id and its source card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AbilityOrigin {
    pub id: AbilityId,
    pub source: InstanceId,
}

/// Builds an ability from descriptor parameters.
pub type AbilityFactory =
    Arc<dyn Fn(&Params, AbilityOrigin, &GameState) -> Result<Ability> + Send + Sync>;

/// Key -> factory map.
///
/// ```
/// use rust_mtg::abilities::AbilityRegistry;
///
/// let registry = AbilityRegistry::with_builtins();
/// assert!(registry.contains("anthem"));
/// assert!(!registry.contains("storm"));
/// ```
#[derive(Clone, Default)]
pub struct AbilityRegistry {
    factories: FxHashMap<String, AbilityFactory>,
}

impl AbilityRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in keys.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register_all(&mut registry);
        registry
    }

    /// Register a factory. A later registration for the same key replaces the
    /// earlier one.
    pub fn register<F>(&mut self, key: impl Into<String>, factory: F)
    where
        F: Fn(&Params, AbilityOrigin, &GameState) -> Result<Ability> + Send + Sync + 'static,
    {
        self.factories.insert(key.into(), Arc::new(factory));
    }

    /// Register a factory (builder pattern).
    #[must_use]
    pub fn with<F>(mut self, key: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Params, AbilityOrigin, &GameState) -> Result<Ability> + Send + Sync + 'static,
    {
        self.register(key, factory);
        self
    }

    /// Build the ability a descriptor describes.
    pub fn instantiate(
        &self,
        descriptor: &AbilityDescriptor,
        origin: AbilityOrigin,
        state: &GameState,
    ) -> Result<Ability> {
        let factory = self
            .factories
            .get(&descriptor.key)
            .ok_or_else(|| RulesError::UnknownAbilityKey(descriptor.key.clone()))?;
        factory(&descriptor.params, origin, state)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<_> = self.factories.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl std::fmt::Debug for AbilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbilityRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
