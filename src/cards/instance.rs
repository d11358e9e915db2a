//! Card instances - runtime card state.
//!
//! `CardInstance` is one physical card in one game. It points at its shared
//! definition and tracks everything that can change: zone, controller, tapped,
//! damage, counters, and its instantiated abilities.
//!
//! ## Working characteristics
//!
//! `characteristics` holds the card's *derived* types, power, toughness and
//! keywords. The continuous effect processor is the only writer: it resets
//! them to the printed values and then reapplies every static ability in
//! layer order. Nothing else should edit them.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::{CardDefinition, CardId, CardType, Keyword};
use crate::abilities::{Ability, ActivatedAbility, StaticAbility, TriggeredAbility};
use crate::core::action::Targets;
use crate::core::config::ZoneId;
use crate::core::entity::{AbilityId, InstanceId};
use crate::core::player::PlayerId;

/// Counter kind for +1/+1 counters.
pub const PLUS_ONE: &str = "+1/+1";
/// Counter kind for -1/-1 counters.
pub const MINUS_ONE: &str = "-1/-1";

/// Derived characteristics, recomputed by the layer system.
///
/// `types` and `keywords` are multisets: an effect that adds a type or grants
/// a keyword pushes one entry, and removing the effect pops that entry again.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Characteristics {
    pub types: SmallVec<[CardType; 2]>,
    pub subtypes: Vec<String>,
    pub supertypes: Vec<String>,
    pub power: Option<i64>,
    pub toughness: Option<i64>,
    pub keywords: SmallVec<[Keyword; 2]>,
}

impl Characteristics {
    /// The printed values of a definition.
    #[must_use]
    pub fn printed(definition: &CardDefinition) -> Self {
        Self {
            types: definition.types.iter().copied().collect(),
            subtypes: definition.subtypes.clone(),
            supertypes: definition.supertypes.clone(),
            power: definition.power,
            toughness: definition.toughness,
            keywords: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn has_type(&self, card_type: CardType) -> bool {
        self.types.contains(&card_type)
    }

    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(&keyword)
    }
}

/// A card instance in a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    pub id: InstanceId,

    /// Shared printed definition.
    pub definition: Arc<CardDefinition>,

    /// Who started the game with this card.
    pub owner: PlayerId,

    /// Who currently controls it. Diverges from `owner` only while on the
    /// stack or battlefield.
    pub controller: PlayerId,

    pub zone: ZoneId,

    pub tapped: bool,

    /// Damage marked this turn.
    pub damage: i64,

    /// Counter kind -> count.
    #[serde(default)]
    pub counters: FxHashMap<String, u32>,

    /// Set when the permanent enters the battlefield; cleared at its
    /// controller's untap step.
    pub summoning_sick: bool,

    /// Turn number the card last entered the battlefield.
    pub entered_battlefield_turn: Option<u32>,

    /// Targets chosen when the card was cast.
    #[serde(default)]
    pub targets: Targets,

    /// Derived characteristics. Written only by the layer system.
    pub characteristics: Characteristics,

    pub static_abilities: Vec<StaticAbility>,
    pub triggered_abilities: Vec<TriggeredAbility>,
    pub activated_abilities: Vec<ActivatedAbility>,
}

impl CardInstance {
    /// Create an instance with no abilities.
    #[must_use]
    pub fn new(id: InstanceId, definition: Arc<CardDefinition>, owner: PlayerId, zone: ZoneId) -> Self {
        let characteristics = Characteristics::printed(&definition);
        Self {
            id,
            definition,
            owner,
            controller: owner,
            zone,
            tapped: false,
            damage: 0,
            counters: FxHashMap::default(),
            summoning_sick: false,
            entered_battlefield_turn: None,
            targets: Targets::new(),
            characteristics,
            static_abilities: Vec::new(),
            triggered_abilities: Vec::new(),
            activated_abilities: Vec::new(),
        }
    }

    /// Sort abilities into the three collections (builder pattern).
    #[must_use]
    pub fn with_abilities(mut self, abilities: impl IntoIterator<Item = Ability>) -> Self {
        for ability in abilities {
            match ability {
                Ability::Static(a) => self.static_abilities.push(a),
                Ability::Triggered(a) => self.triggered_abilities.push(a),
                Ability::Activated(a) => self.activated_abilities.push(a),
            }
        }
        self
    }

    #[must_use]
    pub fn card_id(&self) -> CardId {
        self.definition.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Is this a creature right now (derived types)?
    #[must_use]
    pub fn is_creature(&self) -> bool {
        self.characteristics.has_type(CardType::Creature)
    }

    /// Is this a land right now (derived types)?
    #[must_use]
    pub fn is_land(&self) -> bool {
        self.characteristics.has_type(CardType::Land)
    }

    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.characteristics.has_keyword(keyword)
    }

    /// Current power, 0 for non-creatures.
    #[must_use]
    pub fn power(&self) -> i64 {
        self.characteristics.power.unwrap_or(0)
    }

    /// Current toughness, 0 for non-creatures.
    #[must_use]
    pub fn toughness(&self) -> i64 {
        self.characteristics.toughness.unwrap_or(0)
    }

    /// Non-positive toughness, or marked damage at least equal to toughness.
    #[must_use]
    pub fn has_lethal_damage(&self) -> bool {
        let toughness = self.toughness();
        toughness <= 0 || self.damage >= toughness
    }

    /// Can this creature attack or pay {T} costs this turn?
    #[must_use]
    pub fn is_summoning_sick(&self) -> bool {
        self.summoning_sick && !self.has_keyword(Keyword::Haste)
    }

    /// Number of counters of one kind.
    #[must_use]
    pub fn counter(&self, kind: &str) -> u32 {
        self.counters.get(kind).copied().unwrap_or(0)
    }

    /// Add counters of one kind.
    pub fn add_counters(&mut self, kind: impl Into<String>, count: u32) {
        *self.counters.entry(kind.into()).or_insert(0) += count;
    }

    /// Reset derived characteristics to the printed values.
    pub fn reset_characteristics(&mut self) {
        self.characteristics = Characteristics::printed(&self.definition);
    }

    /// Find one of this card's activated abilities.
    #[must_use]
    pub fn activated(&self, ability: AbilityId) -> Option<&ActivatedAbility> {
        self.activated_abilities.iter().find(|a| a.id == ability)
    }

    /// Total number of instantiated abilities.
    #[must_use]
    pub fn ability_count(&self) -> usize {
        self.static_abilities.len() + self.triggered_abilities.len() + self.activated_abilities.len()
    }
}
