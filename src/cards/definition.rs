//! Card definitions - static card data.
//!
//! `CardDefinition` holds the printed, immutable properties of a card:
//! "Grizzly Bears" costs {1}{G} and is a 2/2 Bear creature. Definitions are
//! loaded once and shared by `Arc` across every instance of the card.
//!
//! Abilities and spell effects are described as data: a key plus
//! [`Params`]. The ability registry turns ability descriptors into live
//! abilities when an instance is created; effect descriptors are built into
//! one-shot effects when an instant or sorcery resolves.

use serde::{Deserialize, Serialize};

use super::params::Params;
use crate::core::error::Result;
use crate::core::mana::ManaCost;

/// Unique identifier for a card definition.
///
/// This identifies the printed card, not a specific instance in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
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

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardType {
    Land,
    Creature,
    Artifact,
    Enchantment,
    Planeswalker,
    Instant,
    Sorcery,
}

impl CardType {
    /// Parse a type name, case-insensitively.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "land" => Some(CardType::Land),
            "creature" => Some(CardType::Creature),
            "artifact" => Some(CardType::Artifact),
            "enchantment" => Some(CardType::Enchantment),
            "planeswalker" => Some(CardType::Planeswalker),
            "instant" => Some(CardType::Instant),
            "sorcery" => Some(CardType::Sorcery),
            _ => None,
        }
    }
}

/// Keyword abilities the rules engine understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Flying,
    FirstStrike,
    DoubleStrike,
    Trample,
    Haste,
    Vigilance,
}

impl Keyword {
    /// Parse `"first_strike"`, `"first strike"`, `"First Strike"`, ...
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let normalized = text.to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "flying" => Some(Keyword::Flying),
            "first_strike" => Some(Keyword::FirstStrike),
            "double_strike" => Some(Keyword::DoubleStrike),
            "trample" => Some(Keyword::Trample),
            "haste" => Some(Keyword::Haste),
            "vigilance" => Some(Keyword::Vigilance),
            _ => None,
        }
    }
}

/// An ability as card data: registry key plus parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityDescriptor {
    pub key: String,
    pub params: Params,
}

/// A spell effect as card data: effect key plus parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    pub key: String,
    pub params: Params,
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use rust_mtg::cards::{CardDefinition, CardId, CardType, Params};
///
/// let bears = CardDefinition::creature(CardId::new(1), "Grizzly Bears", 2, 2)
///     .with_cost("{1}{G}")
///     .with_subtype("Bear");
///
/// assert!(bears.has_type(CardType::Creature));
/// assert!(bears.is_permanent());
/// assert_eq!(bears.mana_cost().unwrap().mana_value(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,

    pub name: String,

    /// Mana cost in brace notation, e.g. `"{1}{G}"`. Empty for lands.
    pub cost: String,

    pub types: Vec<CardType>,

    pub subtypes: Vec<String>,

    pub supertypes: Vec<String>,

    pub power: Option<i64>,

    pub toughness: Option<i64>,

    pub loyalty: Option<i64>,

    pub abilities: Vec<AbilityDescriptor>,

    /// Effects applied when this card resolves as an instant or sorcery.
    pub effects: Vec<EffectDescriptor>,
}

impl CardDefinition {
    /// Create a definition with no types.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            cost: String::new(),
            types: Vec::new(),
            subtypes: Vec::new(),
            supertypes: Vec::new(),
            power: None,
            toughness: None,
            loyalty: None,
            abilities: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Create a creature with base power and toughness.
    #[must_use]
    pub fn creature(id: CardId, name: impl Into<String>, power: i64, toughness: i64) -> Self {
        let mut def = Self::new(id, name).with_type(CardType::Creature);
        def.power = Some(power);
        def.toughness = Some(toughness);
        def
    }

    /// Create a basic land.
    #[must_use]
    pub fn land(id: CardId, name: impl Into<String>) -> Self {
        Self::new(id, name)
            .with_type(CardType::Land)
            .with_supertype("Basic")
    }

    #[must_use]
    pub fn with_cost(mut self, cost: impl Into<String>) -> Self {
        self.cost = cost.into();
        self
    }

    #[must_use]
    pub fn with_type(mut self, card_type: CardType) -> Self {
        if !self.types.contains(&card_type) {
            self.types.push(card_type);
        }
        self
    }

    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtypes.push(subtype.into());
        self
    }

    #[must_use]
    pub fn with_supertype(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    #[must_use]
    pub fn with_loyalty(mut self, loyalty: i64) -> Self {
        self.loyalty = Some(loyalty);
        self
    }

    /// Add an ability descriptor (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, key: impl Into<String>, params: Params) -> Self {
        self.abilities.push(AbilityDescriptor {
            key: key.into(),
            params,
        });
        self
    }

    /// Add a spell effect descriptor (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, key: impl Into<String>, params: Params) -> Self {
        self.effects.push(EffectDescriptor {
            key: key.into(),
            params,
        });
        self
    }

    #[must_use]
    pub fn has_type(&self, card_type: CardType) -> bool {
        self.types.contains(&card_type)
    }

    /// Instants and sorceries are not permanents.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        !self.has_type(CardType::Instant) && !self.has_type(CardType::Sorcery)
    }

    /// Parsed mana cost.
    pub fn mana_cost(&self) -> Result<ManaCost> {
        ManaCost::parse(&self.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_creature_builder() {
        let card = CardDefinition::creature(CardId::new(1), "Test Card", 3, 2)
            .with_cost("{2}{R}")
            .with_ability("keyword", Params::new().with("keyword", "haste"));

        assert_eq!(card.name, "Test Card");
        assert_eq!(card.power, Some(3));
        assert_eq!(card.toughness, Some(2));
        assert_eq!(card.abilities.len(), 1);
        assert_eq!(card.abilities[0].key, "keyword");
        assert_eq!(card.mana_cost().unwrap().mana_value(), 3);
    }

    #[test]
    fn test_land_builder() {
        let forest = CardDefinition::land(CardId::new(2), "Forest").with_subtype("Forest");

        assert!(forest.has_type(CardType::Land));
        assert!(forest.is_permanent());
        assert!(forest.mana_cost().unwrap().is_free());
        assert_eq!(forest.supertypes, vec!["Basic".to_string()]);
    }

    #[test]
    fn test_instant_is_not_permanent() {
        let spell = CardDefinition::new(CardId::new(3), "Healing Salve")
            .with_type(CardType::Instant)
            .with_effect("gain_life", Params::new().with("amount", 3));

        assert!(!spell.is_permanent());
        assert_eq!(spell.effects.len(), 1);
    }

    #[test]
    fn test_with_type_deduplicates() {
        let card = CardDefinition::new(CardId::new(4), "Thing")
            .with_type(CardType::Artifact)
            .with_type(CardType::Artifact);

        assert_eq!(card.types, vec![CardType::Artifact]);
    }

    #[test]
    fn test_keyword_parse() {
        assert_eq!(Keyword::parse("First Strike"), Some(Keyword::FirstStrike));
        assert_eq!(Keyword::parse("double-strike"), Some(Keyword::DoubleStrike));
        assert_eq!(Keyword::parse("trample"), Some(Keyword::Trample));
        assert_eq!(Keyword::parse("shroud"), None);
    }

    #[test]
    fn test_card_definition_serialization() {
        let card = CardDefinition::creature(CardId::new(1), "Test", 1, 1).with_cost("{W}");

        let json = serde_json::to_string(&card).unwrap();
        let deserialized: CardDefinition = serde_json::from_str(&json).unwrap();

        assert_eq!(card, deserialized);
    }
}
