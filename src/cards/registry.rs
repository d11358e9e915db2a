//! Card catalog for definition lookup.
//!
//! The `CardCatalog` stores every card definition available to a game. It is
//! built once by the host (data loading lives outside this crate) and handed
//! to the engine as read-only context.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId};
use crate::core::error::{Reference, Result};

/// Catalog of card definitions.
///
/// ## Example
///
/// ```
/// use rust_mtg::cards::{CardCatalog, CardDefinition, CardId};
///
/// let mut catalog = CardCatalog::new();
/// catalog.register(CardDefinition::creature(CardId::new(1), "Grizzly Bears", 2, 2));
///
/// let found = catalog.get(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Grizzly Bears");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, Arc<CardDefinition>>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        self.cards.insert(card.id, Arc::new(card));
    }

    /// Register a card (builder pattern).
    #[must_use]
    pub fn with_card(mut self, card: CardDefinition) -> Self {
        self.register(card);
        self
    }

    /// Get a shared card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Arc<CardDefinition>> {
        self.cards.get(&id)
    }

    /// Get a card definition, or a `MalformedReference` error.
    pub fn lookup(&self, id: CardId) -> Result<Arc<CardDefinition>> {
        self.get(id)
            .cloned()
            .ok_or_else(|| Reference::Definition(id).into())
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values().map(|card| card.as_ref())
    }

    /// Find a card by exact name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Arc<CardDefinition>> {
        self.cards.values().find(|c| c.name == name)
    }
}
